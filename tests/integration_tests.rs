// Integration tests for invoice2pdf.
//
// Everything here drives the public API. Filesystem fixtures are written
// into tempfile directories; the interactive prompts are driven with
// in-memory readers; PDF rendering uses a stub engine so no external
// binary is required.

use invoice2pdf::{
    confirm, export_records, find_files, load_records, parse_choice, parse_multi_choice,
    render_html, select_item, select_records, format_amount, GenerateError, GeneratorConfig,
    InvoiceRecord, LineItem, PdfEngine, Selection, SelectionError,
};
use serde_json::json;
use std::io::Cursor;
use std::path::{Path, PathBuf};

fn write_fixture(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

fn make_record(invoice_id: &str, amounts: &[&str]) -> InvoiceRecord {
    InvoiceRecord {
        invoice_id: invoice_id.into(),
        customer_name: None,
        date: None,
        items: amounts
            .iter()
            .map(|a| LineItem {
                amount: json!(a),
                ..Default::default()
            })
            .collect(),
    }
}

// ── Data loader: CSV ─────────────────────────────────────────────────────────

#[test]
fn csv_rows_sharing_invoice_id_merge_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_fixture(
        dir.path(),
        "invoices.csv",
        "invoice_id,customer_name,date,item_name,quantity,price,amount\n\
         B,Bob,2024-01-02,Widget,2,5,10\n\
         A,Alice,2024-01-01,Gadget,1,3,3\n\
         B,Bob,2024-01-02,Sprocket,1,7,7\n",
    );

    let records = load_records(&path).unwrap();

    // First-appearance order: B before A.
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].invoice_id, "B");
    assert_eq!(records[1].invoice_id, "A");

    // Rows merged into one record, row order preserved.
    assert_eq!(records[0].items.len(), 2);
    assert_eq!(records[0].items[0].item_name, json!("Widget"));
    assert_eq!(records[0].items[1].item_name, json!("Sprocket"));
    assert_eq!(records[0].customer_name.as_deref(), Some("Bob"));
}

#[test]
fn csv_absent_item_columns_take_loader_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_fixture(dir.path(), "thin.csv", "invoice_id,item_name\nA,Widget\n");

    let records = load_records(&path).unwrap();

    let item = &records[0].items[0];
    assert_eq!(item.quantity, json!(1));
    assert_eq!(item.price, json!(0));
    assert_eq!(item.amount, json!(0));
}

#[test]
fn csv_missing_invoice_id_column_is_a_data_format_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_fixture(dir.path(), "bad.csv", "customer_name,amount\nAlice,10\n");

    let err = load_records(&path).unwrap_err();
    assert!(matches!(err, GenerateError::DataFormat { .. }), "{err:?}");
}

// ── Data loader: JSON ────────────────────────────────────────────────────────

#[test]
fn json_flat_objects_group_like_csv_rows() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_fixture(
        dir.path(),
        "flat.json",
        r#"[
            {"invoice_id": "A", "customer_name": "Alice", "item_name": "Widget", "amount": 10},
            {"invoice_id": "A", "item_name": "Sprocket", "amount": 7}
        ]"#,
    );

    let records = load_records(&path).unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].items.len(), 2);
    assert_eq!(records[0].customer_name.as_deref(), Some("Alice"));
    // Flat objects missing quantity take the loader default.
    assert_eq!(records[0].items[1].quantity, json!(1));
}

#[test]
fn json_nested_items_are_kept_verbatim() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_fixture(
        dir.path(),
        "nested.json",
        r#"[{
            "invoice_id": "A",
            "items": [
                {"item_name": "Widget", "quantity": 2, "price": 5, "amount": 10},
                {"amount": "3.5"}
            ]
        }]"#,
    );

    let records = load_records(&path).unwrap();

    assert_eq!(records.len(), 1);
    let items = &records[0].items;
    assert_eq!(items.len(), 2);

    // Types survive: numbers stay numbers, strings stay strings.
    assert_eq!(items[0].quantity, json!(2));
    assert_eq!(items[1].amount, json!("3.5"));

    // A nested item that omits a field behaves like a rendered blank.
    assert_eq!(items[1].quantity, json!(0));
}

#[test]
fn json_nested_items_win_over_top_level_item_fields() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_fixture(
        dir.path(),
        "both.json",
        r#"[{
            "invoice_id": "A",
            "item_name": "ShouldBeDropped",
            "amount": 999,
            "items": [{"item_name": "Kept", "amount": 1}]
        }]"#,
    );

    let records = load_records(&path).unwrap();

    assert_eq!(records[0].items.len(), 1);
    assert_eq!(records[0].items[0].item_name, json!("Kept"));
}

#[test]
fn json_top_level_must_be_an_array() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_fixture(dir.path(), "obj.json", r#"{"invoice_id": "A"}"#);

    let err = load_records(&path).unwrap_err();
    assert!(matches!(err, GenerateError::DataFormat { .. }), "{err:?}");
}

#[test]
fn json_object_without_invoice_id_is_rejected_entirely() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_fixture(
        dir.path(),
        "missing.json",
        r#"[{"invoice_id": "A", "amount": 1}, {"amount": 2}]"#,
    );

    // No partial records: the whole load fails.
    let err = load_records(&path).unwrap_err();
    assert!(matches!(err, GenerateError::DataFormat { .. }), "{err:?}");
}

#[test]
fn unsupported_extension_is_rejected() {
    let err = load_records(Path::new("records.xml")).unwrap_err();
    assert!(
        matches!(err, GenerateError::UnsupportedExtension(ref ext) if ext == "xml"),
        "{err:?}"
    );
}

// ── Template renderer ────────────────────────────────────────────────────────

#[test]
fn single_token_is_replaced_and_nothing_else_changes() {
    let record = make_record("A1", &[]);
    let html = render_html("<p>Invoice {{ invoice_id }} — {{ unknown }}</p>", &record);
    assert_eq!(html, "<p>Invoice A1 — {{ unknown }}</p>");
}

#[test]
fn missing_header_fields_render_empty() {
    let record = make_record("A1", &[]);
    let html = render_html("[{{ customer_name }}][{{ date }}]", &record);
    assert_eq!(html, "[][]");
}

#[test]
fn item_rows_emit_four_columns_in_record_order() {
    let record = InvoiceRecord {
        invoice_id: "A1".into(),
        customer_name: None,
        date: None,
        items: vec![
            LineItem {
                item_name: json!("Widget"),
                quantity: json!("2"),
                price: json!("5"),
                amount: json!("10"),
            },
            LineItem::default(),
        ],
    };

    let html = render_html("{{ item_rows }}", &record);
    assert_eq!(
        html,
        "<tr><td>Widget</td><td>2</td><td>5</td><td>10</td></tr>\n\
         <tr><td></td><td>0</td><td>0</td><td>0</td></tr>\n"
    );
}

#[test]
fn total_amount_uses_space_as_thousands_separator() {
    let record = make_record("A1", &["1000", "234.5"]);
    assert_eq!(render_html("{{ total_amount }}", &record), "1 234.50");
}

#[test]
fn non_numeric_amounts_are_skipped_in_the_total() {
    let record = make_record("A1", &["x", "10"]);
    assert_eq!(render_html("{{ total_amount }}", &record), "10.00");
}

#[test]
fn format_amount_edge_cases() {
    assert_eq!(format_amount(0.0), "0.00");
    assert_eq!(format_amount(999.999), "1 000.00");
    assert_eq!(format_amount(1234567.891), "1 234 567.89");
    assert_eq!(format_amount(-1234.5), "-1 234.50");
}

// ── Selection parsing ────────────────────────────────────────────────────────

#[test]
fn parse_choice_accepts_only_one_in_range_number() {
    assert_eq!(parse_choice("2", 3), Ok(1));
    assert_eq!(parse_choice(" 3 \n", 3), Ok(2));
    assert!(matches!(parse_choice("0", 3), Err(SelectionError::OutOfRange { .. })));
    assert!(matches!(parse_choice("4", 3), Err(SelectionError::OutOfRange { .. })));
    assert!(matches!(parse_choice("two", 3), Err(SelectionError::NotANumber(_))));
    assert_eq!(parse_choice("", 3), Err(SelectionError::Empty));
}

#[test]
fn parse_multi_choice_all_is_case_insensitive() {
    assert_eq!(parse_multi_choice("all", 3), Ok(Selection::All));
    assert_eq!(parse_multi_choice("  ALL\n", 3), Ok(Selection::All));
}

#[test]
fn parse_multi_choice_dedups_and_sorts_ascending() {
    assert_eq!(
        parse_multi_choice("2,2,1", 3),
        Ok(Selection::Indices(vec![0, 1]))
    );
    assert_eq!(
        parse_multi_choice("3, 1", 3),
        Ok(Selection::Indices(vec![0, 2]))
    );
}

#[test]
fn parse_multi_choice_rejects_the_whole_input_on_a_bad_number() {
    let err = parse_multi_choice("1,5,6", 3).unwrap_err();
    match err {
        SelectionError::OutOfRange { bad, max } => {
            assert_eq!(bad, vec!["5".to_string(), "6".to_string()]);
            assert_eq!(max, 3);
        }
        other => panic!("expected OutOfRange, got {other:?}"),
    }

    assert!(matches!(
        parse_multi_choice("1,x", 3),
        Err(SelectionError::NotANumber(_))
    ));
    assert_eq!(parse_multi_choice("", 3), Err(SelectionError::Empty));
}

// ── Interactive prompt loops ─────────────────────────────────────────────────

#[test]
fn select_item_returns_none_for_an_empty_list_without_prompting() {
    let mut input = Cursor::new("1\n");
    let mut output = Vec::new();
    let items: Vec<String> = Vec::new();

    let choice = select_item(&mut input, &mut output, &items, "Pick", |s| s.clone()).unwrap();

    assert_eq!(choice, None);
    // Nothing was consumed from the input stream.
    assert_eq!(input.position(), 0);
}

#[test]
fn select_item_reprompts_until_the_input_is_valid() {
    let mut input = Cursor::new("abc\n0\n2\n");
    let mut output = Vec::new();
    let items = vec!["first".to_string(), "second".to_string()];

    let choice = select_item(&mut input, &mut output, &items, "Pick", |s| s.clone()).unwrap();

    assert_eq!(choice, Some(1));
    let transcript = String::from_utf8(output).unwrap();
    assert!(transcript.contains("1. first"));
    assert!(transcript.contains("Try again"));
}

#[test]
fn select_item_treats_eof_as_abort() {
    let mut input = Cursor::new("");
    let mut output = Vec::new();
    let items = vec!["only".to_string()];

    let choice = select_item(&mut input, &mut output, &items, "Pick", |s| s.clone()).unwrap();
    assert_eq!(choice, None);
}

#[test]
fn select_records_all_and_reprompt() {
    let records = vec![
        make_record("A", &[]),
        make_record("B", &[]),
        make_record("C", &[]),
    ];

    let mut input = Cursor::new("all\n");
    let mut output = Vec::new();
    let selected = select_records(&mut input, &mut output, &records).unwrap();
    assert_eq!(selected, vec![0, 1, 2]);

    // An out-of-range list is rejected as a whole, then re-prompted.
    let mut input = Cursor::new("5\n2,1\n");
    let mut output = Vec::new();
    let selected = select_records(&mut input, &mut output, &records).unwrap();
    assert_eq!(selected, vec![0, 1]);
}

#[test]
fn select_records_returns_empty_for_an_empty_list() {
    let mut input = Cursor::new("all\n");
    let mut output = Vec::new();
    let selected = select_records(&mut input, &mut output, &[]).unwrap();
    assert!(selected.is_empty());
    assert_eq!(input.position(), 0);
}

#[test]
fn confirm_accepts_y_and_yes_only() {
    for (answer, expected) in [("y\n", true), ("YES\n", true), ("n\n", false), ("ok\n", false)] {
        let mut input = Cursor::new(answer);
        let mut output = Vec::new();
        assert_eq!(
            confirm(&mut input, &mut output, "Open?").unwrap(),
            expected,
            "answer {answer:?}"
        );
    }

    // EOF means no.
    let mut input = Cursor::new("");
    let mut output = Vec::new();
    assert!(!confirm(&mut input, &mut output, "Open?").unwrap());
}

// ── Export pipeline ──────────────────────────────────────────────────────────

/// Stub engine: writes a marker file, or fails for one configured invoice.
struct StubEngine {
    fail_for: &'static str,
}

impl PdfEngine for StubEngine {
    fn render(&self, html: &str, output: &Path) -> invoice2pdf::Result<()> {
        if html.contains(self.fail_for) {
            return Err(GenerateError::Render("stub failure".into()));
        }
        std::fs::write(output, b"%PDF-1.4 stub")?;
        Ok(())
    }
}

fn temp_config(root: &Path) -> GeneratorConfig {
    GeneratorConfig {
        data_dir: root.join("data"),
        templates_dir: root.join("templates"),
        output_dir: root.join("output"),
        temp_dir: root.join("temp"),
        pdf_command: String::from("unused"),
    }
}

#[test]
fn export_continues_past_a_failing_record() {
    let dir = tempfile::tempdir().unwrap();
    let config = temp_config(dir.path());
    invoice2pdf::ensure_directories(&config).unwrap();

    let records = vec![
        make_record("A", &["1"]),
        make_record("B", &["2"]),
        make_record("C", &["3"]),
    ];
    let engine = StubEngine { fail_for: "B" };

    let summary = export_records(
        &records,
        &[0, 1, 2],
        "id={{ invoice_id }}",
        "invoice",
        &engine,
        &config,
    );

    assert_eq!(summary.success_count(), 2);
    assert_eq!(summary.failed, 1);
    assert!(config.output_dir.join("(A)_invoice.pdf").exists());
    assert!(!config.output_dir.join("(B)_invoice.pdf").exists());
    assert!(config.output_dir.join("(C)_invoice.pdf").exists());

    // The transient HTML for successful records is kept around.
    assert!(config.temp_dir.join("A_invoice.html").exists());
}

#[test]
fn export_names_outputs_after_invoice_id_and_template_stem() {
    let dir = tempfile::tempdir().unwrap();
    let config = temp_config(dir.path());
    invoice2pdf::ensure_directories(&config).unwrap();

    let records = vec![make_record("INV-7", &[])];
    let engine = StubEngine { fail_for: "\u{0}" };

    let summary = export_records(&records, &[0], "x", "fancy", &engine, &config);

    assert_eq!(
        summary.generated,
        vec![config.output_dir.join("(INV-7)_fancy.pdf")]
    );
}

// ── Discovery ────────────────────────────────────────────────────────────────

#[test]
fn find_files_is_recursive_sorted_and_case_insensitive() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir(dir.path().join("sub")).unwrap();
    write_fixture(dir.path(), "b.JSON", "[]");
    write_fixture(dir.path(), "notes.txt", "");
    write_fixture(&dir.path().join("sub"), "a.csv", "invoice_id\n");

    let found = find_files(dir.path(), &["csv", "json"]);

    assert_eq!(found.len(), 2);
    assert!(found[0].ends_with("b.JSON"));
    assert!(found[1].ends_with("sub/a.csv") || found[1].ends_with("sub\\a.csv"));
}

#[test]
fn find_files_on_a_missing_directory_is_empty() {
    assert!(find_files(Path::new("definitely/not/here"), &["csv"]).is_empty());
}

#[test]
fn ensure_directories_creates_the_working_layout() {
    let dir = tempfile::tempdir().unwrap();
    let config = temp_config(dir.path());

    invoice2pdf::ensure_directories(&config).unwrap();

    for path in [
        &config.data_dir,
        &config.templates_dir,
        &config.output_dir,
        &config.temp_dir,
    ] {
        assert!(path.is_dir());
    }
}

// ── Record helpers ───────────────────────────────────────────────────────────

#[test]
fn record_label_falls_back_to_na() {
    let record = make_record("A1", &[]);
    assert_eq!(record.label(), "ID: A1, Customer: N/A");

    let record = InvoiceRecord {
        customer_name: Some("Alice".into()),
        ..make_record("A1", &[])
    };
    assert_eq!(record.label(), "ID: A1, Customer: Alice");
}

// ── GenerateError display ────────────────────────────────────────────────────

#[test]
fn error_display_is_non_empty() {
    let errors: &[GenerateError] = &[
        GenerateError::NoInputFiles {
            kind: "data",
            dir: "data".into(),
        },
        GenerateError::DataFormat {
            file: "f.csv".into(),
            cause: "bad".into(),
        },
        GenerateError::UnsupportedExtension("xml".into()),
        GenerateError::TemplateRead {
            file: "t.html".into(),
            cause: "gone".into(),
        },
        GenerateError::Render("engine died".into()),
        GenerateError::OpenFile {
            file: "out.pdf".into(),
            cause: "no viewer".into(),
        },
    ];
    for e in errors {
        assert!(!e.to_string().is_empty(), "empty display for {e:?}");
    }
}
