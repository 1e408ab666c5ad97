//! Benchmarks for docmend matching and plan application.
//!
//! Run with: cargo bench
//!
//! These benchmarks use synthetic form documents with one section per row.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use docmend::{
    similarity, Document, EditIntent, EditPlan, EditSession, Paragraph, SectionEdits,
    SectionSpec, Table, TableCell, TableRow, TemplateConfig,
};

/// Creates a form document with `rows` section rows.
fn create_test_document(rows: usize) -> Document {
    let mut doc = Document::new();
    doc.add_paragraph(Paragraph::with_text("Record of advice"));

    let mut table = Table::with_header(1);
    table.add_row(TableRow::header(vec![
        TableCell::text("ITEMS DISCUSSED"),
        TableCell::text("ACTION TAKEN"),
    ]));
    for i in 0..rows {
        table.add_row(TableRow::new(vec![
            TableCell::with_content(vec![
                Paragraph::bullet(format!("Topic{} review of current position.", i), 0),
                Paragraph::bullet(format!("Topic{} detail one", i), 1),
                Paragraph::bullet(format!("Topic{} detail two", i), 1),
                Paragraph::placeholder_bullet(0),
            ]),
            TableCell::text(format!(
                "Adviser to follow up on item {}. Client to confirm. Send summary.",
                i
            )),
        ]));
    }
    doc.add_table(table);
    doc
}

fn create_config(rows: usize) -> TemplateConfig {
    (0..rows).fold(TemplateConfig::new(), |config, i| {
        config.with_section(
            SectionSpec::new(format!("s{}", i), [format!("topic{}", i)]).with_min_matches(1),
        )
    })
}

fn create_plan(rows: usize) -> EditPlan {
    (0..rows).fold(EditPlan::new(), |plan, i| {
        plan.with_section(
            format!("s{}", i),
            SectionEdits::new()
                .with(EditIntent::DeleteText {
                    text: "Client to confirm.".into(),
                })
                .with(EditIntent::ReplaceText {
                    original: "summary of current position".into(),
                    replacement: "revised position".into(),
                })
                .with(EditIntent::CascadeDeleteSubpoints {
                    text: format!("Topic{} review", i),
                }),
        )
    })
}

/// Benchmark the similarity score.
fn bench_similarity(c: &mut Criterion) {
    let a = "Maximising superannuation contributions this financial year";
    let b = "maximise super contributions this year";

    c.bench_function("similarity", |bench| {
        bench.iter(|| similarity(black_box(a), black_box(b)));
    });
}

/// Benchmark whole-plan application at various sizes.
fn bench_apply_plan(c: &mut Criterion) {
    let mut group = c.benchmark_group("apply_plan");

    for rows in [5, 20, 50].iter() {
        let doc = create_test_document(*rows);
        let session = EditSession::with_config(create_config(*rows));
        let plan = create_plan(*rows);

        group.bench_function(format!("{}_rows", rows), |b| {
            b.iter(|| {
                let mut doc = doc.clone();
                session.apply(black_box(&mut doc), black_box(&plan))
            });
        });
    }

    group.finish();
}

/// Benchmark section location alone.
fn bench_locate(c: &mut Criterion) {
    let doc = create_test_document(50);
    let session = EditSession::with_config(create_config(50));

    c.bench_function("locate_last_section", |b| {
        b.iter(|| session.locate(black_box(&doc), "s49"));
    });
}

criterion_group!(benches, bench_similarity, bench_apply_plan, bench_locate);
criterion_main!(benches);
