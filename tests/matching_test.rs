//! Integration tests for section location and target resolution.

use docmend::matching::{Profile, TextResolver};
use docmend::{
    similarity, Document, Error, LocateMethod, MatchOptions, Paragraph, ParagraphRef, Scope,
    SectionAnchor, SectionLocator, SectionSpec, Strategy, Table, TableCell, TableRow,
};

fn cell_doc(paragraphs: Vec<Paragraph>) -> Document {
    let mut doc = Document::new();
    let mut table = Table::new();
    table.add_row(TableRow::from_strings(["ITEMS DISCUSSED", "ACTION TAKEN"]));
    table.add_row(TableRow::new(vec![
        TableCell::with_content(paragraphs),
        TableCell::text("No action"),
    ]));
    doc.add_table(table);
    doc
}

fn left_box() -> Scope {
    Scope::Cell {
        table: 0,
        row: 1,
        cell: 0,
    }
}

#[test]
fn test_exact_match_wins_over_earlier_fuzzy_candidate() {
    let doc = cell_doc(vec![
        Paragraph::with_text("Fees reviewed annually by the adviser"),
        Paragraph::with_text("The adviser reviewed fees annually"),
    ]);
    let options = MatchOptions::default();
    let resolver = TextResolver::new(&options);

    let res = resolver
        .resolve(&doc, &left_box(), "reviewed fees annually", Profile::Standard)
        .unwrap();

    assert_eq!(res.strategy, Strategy::Exact);
    assert_eq!(
        res.at,
        ParagraphRef::Cell {
            table: 0,
            row: 1,
            cell: 0,
            paragraph: 1
        }
    );
    assert_eq!(&res.text[res.span.unwrap()], "reviewed fees annually");
}

#[test]
fn test_similarity_threshold_is_exclusive() {
    let doc = cell_doc(vec![Paragraph::with_text("client fees reviewed every year")]);
    let options = MatchOptions::new().with_cascade(vec![Strategy::Exact, Strategy::Similarity]);
    let resolver = TextResolver::new(&options);

    // 3 shared words of 5
    assert!((similarity("client fees reviewed every year", "year every fees") - 0.6).abs() < 1e-9);
    let err = resolver
        .resolve(&doc, &left_box(), "year every fees", Profile::Standard)
        .unwrap_err();
    assert!(matches!(err, Error::IntentUnresolved { .. }));

    // 4 shared words of 5
    let res = resolver
        .resolve(&doc, &left_box(), "year every fees client", Profile::Standard)
        .unwrap();
    assert_eq!(res.strategy, Strategy::Similarity);
    assert!(res.span.is_none());
}

#[test]
fn test_keyword_fallback_after_similarity() {
    let doc = cell_doc(vec![Paragraph::with_text(
        "We discussed consolidating your superannuation accounts into one fund",
    )]);
    let options = MatchOptions::default();
    let resolver = TextResolver::new(&options);

    let res = resolver
        .resolve(
            &doc,
            &left_box(),
            "consolidate superannuation accounts",
            Profile::Standard,
        )
        .unwrap();
    assert_eq!(res.strategy, Strategy::Keyword);
}

#[test]
fn test_truncated_target_matches_to_end() {
    let text = "Consider salary sacrifice contributions before June";
    let doc = cell_doc(vec![Paragraph::with_text(text)]);
    let options = MatchOptions::exact_only();
    let resolver = TextResolver::new(&options);

    let res = resolver
        .resolve(&doc, &left_box(), "salary sacrifice contri...", Profile::Standard)
        .unwrap();
    assert_eq!(res.span, Some(9..text.len()));

    // short prefixes are too ambiguous
    assert!(resolver
        .resolve(&doc, &left_box(), "salary...", Profile::Standard)
        .is_err());
}

#[test]
fn test_locate_prefers_highest_keyword_row() {
    let mut doc = Document::new();
    let mut table = Table::new();
    table.add_row(TableRow::from_strings(["Superannuation", "Reviewed"]));
    table.add_row(TableRow::from_strings([
        "Maximising superannuation contributions",
        "Salary sacrifice",
    ]));
    table.add_row(TableRow::from_strings(["Single cell row with superannuation contributions maximising"]));
    doc.add_table(table);

    let spec = SectionSpec::new("1_4", ["maximising", "superannuation", "contributions"]);
    let located = SectionLocator::new().locate(&doc, &spec).unwrap();

    assert_eq!(located.method, LocateMethod::Keywords);
    assert_eq!(located.matches, 3);
    assert_eq!(
        located.anchor,
        Some(SectionAnchor::TableRow { table: 0, row: 1 })
    );
}

#[test]
fn test_locate_best_effort_then_fallback() {
    let mut doc = Document::new();
    let mut table = Table::new();
    table.add_row(TableRow::from_strings(["Estate planning", "Refer to solicitor"]));
    table.add_row(TableRow::from_strings(["Other", "Nothing"]));
    doc.add_table(table);

    let spec = SectionSpec::new("4_3", ["estate", "wills"]);
    let located = SectionLocator::new().locate(&doc, &spec).unwrap();
    assert_eq!(located.method, LocateMethod::BestEffort);

    let spec = SectionSpec::new("4_4", ["aged", "care"]).with_fallback(0, 1);
    let located = SectionLocator::new().locate(&doc, &spec).unwrap();
    assert_eq!(located.method, LocateMethod::Fallback);
    assert_eq!(
        located.anchor,
        Some(SectionAnchor::TableRow { table: 0, row: 1 })
    );

    let spec = SectionSpec::new("4_5", ["aged", "care"]).with_fallback(3, 0);
    let err = SectionLocator::new().locate(&doc, &spec).unwrap_err();
    assert!(matches!(err, Error::SectionNotFound { .. }));
}

#[test]
fn test_paragraph_section_anchors_body_text() {
    let mut doc = Document::new();
    doc.add_paragraph(Paragraph::with_text("Next meeting: review in twelve months."));
    doc.add_paragraph(Paragraph::with_text("General advice warning."));
    doc.add_paragraph(Paragraph::with_text("We will review your meeting notes."));

    let spec = SectionSpec::new("4_5", ["meeting", "review"]).paragraphs();
    let located = SectionLocator::new().locate(&doc, &spec).unwrap();

    assert_eq!(
        located.anchor,
        Some(SectionAnchor::Paragraphs {
            paragraphs: vec![
                ParagraphRef::Body { block: 0 },
                ParagraphRef::Body { block: 2 }
            ]
        })
    );
}
