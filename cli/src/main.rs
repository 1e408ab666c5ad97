//! docmend CLI - apply annotation edit plans to documents

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use docmend::report::OutcomeStatus;
use docmend::{
    load_file, save_file, ApplyOptions, Document, EditPlan, EditSession, JsonFormat, RunReport,
    SectionAnchor, SectionReport, Strategy, TemplateConfig,
};

#[derive(Parser)]
#[command(name = "docmend")]
#[command(author = "iyulab")]
#[command(version)]
#[command(about = "Apply handwritten-annotation edit plans to templated documents", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply an edit plan to a document
    Apply {
        /// Input document (JSON)
        #[arg(value_name = "DOCUMENT")]
        document: PathBuf,

        /// Edit plan (JSON)
        #[arg(value_name = "PLAN")]
        plan: PathBuf,

        /// Template configuration with section specs
        #[arg(short, long, value_name = "FILE", env = "DOCMEND_CONFIG")]
        config: Option<PathBuf>,

        /// Output document (defaults to <DOCUMENT>.edited.json)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Write the run report as JSON
        #[arg(long, value_name = "FILE")]
        report: Option<PathBuf>,

        /// Write compact JSON
        #[arg(long)]
        compact: bool,

        /// Only accept verbatim matches
        #[arg(long)]
        exact: bool,

        /// Keep empty paragraphs left behind by dot point deletion
        #[arg(long)]
        no_cleanup: bool,
    },

    /// Show where each configured section is found
    Locate {
        /// Input document (JSON)
        #[arg(value_name = "DOCUMENT")]
        document: PathBuf,

        /// Template configuration with section specs
        #[arg(short, long, value_name = "FILE", env = "DOCMEND_CONFIG")]
        config: PathBuf,

        /// Only this section
        #[arg(value_name = "SECTION")]
        section: Option<String>,
    },

    /// Print a document as plain text
    Show {
        /// Input document (JSON)
        #[arg(value_name = "DOCUMENT")]
        document: PathBuf,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,

        /// Output compact JSON
        #[arg(long, requires = "json")]
        compact: bool,
    },

    /// Show document information
    Info {
        /// Input document (JSON)
        #[arg(value_name = "DOCUMENT")]
        document: PathBuf,
    },

    /// Show version information
    Version,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Apply {
            document,
            plan,
            config,
            output,
            report,
            compact,
            exact,
            no_cleanup,
        }) => cmd_apply(
            &document,
            &plan,
            config.as_deref(),
            output.as_deref(),
            report.as_deref(),
            compact,
            exact,
            no_cleanup,
        ),
        Some(Commands::Locate {
            document,
            config,
            section,
        }) => cmd_locate(&document, &config, section.as_deref()),
        Some(Commands::Show {
            document,
            json,
            compact,
        }) => cmd_show(&document, json, compact),
        Some(Commands::Info { document }) => cmd_info(&document),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            println!("{}", "Usage: docmend apply <DOCUMENT> <PLAN> [-c CONFIG]".yellow());
            println!("       docmend --help for more information");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn default_output(input: &Path) -> PathBuf {
    let stem = input.file_stem().unwrap_or_default().to_string_lossy();
    input.with_file_name(format!("{}.edited.json", stem))
}

fn write_json(path: &Path, json: &str) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, json)?;
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn cmd_apply(
    document: &Path,
    plan: &Path,
    config: Option<&Path>,
    output: Option<&Path>,
    report_path: Option<&Path>,
    compact: bool,
    exact: bool,
    no_cleanup: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut doc = load_file(document)?;
    let plan = EditPlan::load(plan)?;

    let mut config = match config {
        Some(path) => TemplateConfig::load(path)?,
        None => TemplateConfig::new(),
    };
    if exact {
        config.matching = config.matching.with_cascade(vec![Strategy::Exact]);
        config.validate()?;
    }
    let session = EditSession::with_config(config)
        .with_apply_options(ApplyOptions::new().with_cleanup(!no_cleanup));

    let pb = ProgressBar::new(plan.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );

    let report = session.apply_with_progress(&mut doc, &plan, |section| {
        pb.set_message(section.name.clone());
        pb.inc(1);
    });
    pb.finish_with_message("Done!");

    let output = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| default_output(document));
    if compact {
        write_json(&output, &docmend::render::to_json(&doc, JsonFormat::Compact)?)?;
    } else {
        save_file(&doc, &output)?;
    }

    if let Some(path) = report_path {
        write_json(path, &report.to_json(!compact)?)?;
    }

    print_summary(&report);
    println!("\n{} {}", "Saved to".green(), output.display());
    if let Some(path) = report_path {
        println!("{} {}", "Report".green(), path.display());
    }

    Ok(())
}

fn print_summary(report: &RunReport) {
    println!();
    println!("{}", "Edit Summary".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    let stats = &report.stats;
    println!("{}: {}", "Sections".bold(), stats.sections_processed);
    println!("{}: {}", "Changes".bold(), report.changes.len());
    println!(
        "{}: {} exact, {} similarity, {} keyword, {} structural",
        "Matched".bold(),
        stats.exact_matches,
        stats.similarity_matches,
        stats.keyword_matches,
        stats.structural_matches
    );
    println!("{}: {}", "Skipped".bold(), stats.skipped);
    println!("{}: {}", "Failed".bold(), stats.failed);

    for section in &report.sections {
        print_failures(section);
    }
}

fn print_failures(section: &SectionReport) {
    if let docmend::report::SectionStatus::NotFound { reason } = &section.status {
        println!("  {} {}: {}", "✗".red(), section.name.bold(), reason);
        return;
    }
    for outcome in &section.outcomes {
        if let OutcomeStatus::Failed { reason } = &outcome.status {
            println!(
                "  {} {} #{} {}: {}",
                "!".yellow(),
                section.name.bold(),
                outcome.index,
                outcome.kind,
                reason
            );
        }
    }
}

fn cmd_locate(
    document: &Path,
    config: &Path,
    section: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let doc = load_file(document)?;
    let config = TemplateConfig::load(config)?;

    let names: Vec<String> = match section {
        Some(name) => {
            if config.spec(name).is_none() {
                return Err(format!("Section {} is not configured", name).into());
            }
            vec![name.to_string()]
        }
        None => config.sections.keys().cloned().collect(),
    };

    let session = EditSession::with_config(config);
    for name in names {
        match session.locate(&doc, &name) {
            Ok(located) => {
                let place = match &located.anchor {
                    Some(SectionAnchor::TableRow { table, row }) => {
                        format!("table {} row {}", table, row)
                    }
                    Some(SectionAnchor::Paragraphs { paragraphs }) => {
                        format!("{} paragraphs", paragraphs.len())
                    }
                    None => "whole document".to_string(),
                };
                println!(
                    "{} {}: {} ({:?}, {} keywords)",
                    "✓".green(),
                    name.bold(),
                    place,
                    located.method,
                    located.matches
                );
            }
            Err(e) => println!("{} {}: {}", "✗".red(), name.bold(), e),
        }
    }

    Ok(())
}

fn cmd_show(document: &Path, json: bool, compact: bool) -> Result<(), Box<dyn std::error::Error>> {
    let doc = load_file(document)?;

    let out = if json {
        let format = if compact {
            JsonFormat::Compact
        } else {
            JsonFormat::Pretty
        };
        docmend::render::to_json(&doc, format)?
    } else {
        docmend::render::to_text(&doc)?
    };
    println!("{}", out);

    Ok(())
}

fn count_paragraphs(doc: &Document) -> (usize, usize, usize) {
    let refs = doc.paragraph_refs(&docmend::Scope::Document);
    let mut list_items = 0;
    let mut placeholders = 0;
    for at in &refs {
        if let Some(p) = doc.paragraph(at) {
            if p.is_placeholder_bullet() {
                placeholders += 1;
            } else if p.is_list_item() {
                list_items += 1;
            }
        }
    }
    (refs.len(), list_items, placeholders)
}

fn cmd_info(document: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let doc = load_file(document)?;

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), document.display());
    if let Some(ref title) = doc.metadata.title {
        println!("{}: {}", "Title".bold(), title);
    }
    if let Some(ref template) = doc.metadata.template {
        println!("{}: {}", "Template".bold(), template);
    }
    if let Some(ref author) = doc.metadata.author {
        println!("{}: {}", "Author".bold(), author);
    }
    if let Some(ref created) = doc.metadata.created {
        println!("{}: {}", "Created".bold(), created);
    }
    if let Some(ref modified) = doc.metadata.modified {
        println!("{}: {}", "Modified".bold(), modified);
    }

    println!();
    println!("{}", "Content Statistics".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    let (paragraphs, list_items, placeholders) = count_paragraphs(&doc);
    let rows: usize = doc.tables().map(|t| t.row_count()).sum();
    let text = doc.plain_text();

    println!("{}: {}", "Paragraphs".bold(), paragraphs);
    println!("{}: {}", "List items".bold(), list_items);
    println!("{}: {}", "Empty bullets".bold(), placeholders);
    println!("{}: {} ({} rows)", "Tables".bold(), doc.table_count(), rows);
    println!("{}: {}", "Words".bold(), text.split_whitespace().count());

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "docmend".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Annotation-driven document editing tool");
    println!();
    println!("License: MIT");
}
