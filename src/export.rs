use crate::engine::PdfEngine;
use crate::record::InvoiceRecord;
use crate::template::render_html;
use crate::{GeneratorConfig, Result};
use std::path::PathBuf;

// ── ExportSummary ────────────────────────────────────────────────────────────

/// Outcome of a best-effort export batch.
#[derive(Debug, Default)]
pub struct ExportSummary {
    /// Output paths of the successfully generated PDFs, in processing order.
    pub generated: Vec<PathBuf>,

    /// Number of selected records that failed and were skipped.
    pub failed: usize,
}

impl ExportSummary {
    pub fn success_count(&self) -> usize {
        self.generated.len()
    }
}

// ── Export pipeline ──────────────────────────────────────────────────────────

/// Export the selected records, one after another, in selection order.
///
/// Per record: render the HTML, keep a transient copy under the temp
/// directory, then hand the HTML to `engine` which writes
/// `({invoice_id})_{template_stem}.pdf` into the output directory.
///
/// The batch is best-effort: a record that fails at any step is reported
/// to stderr with its `invoice_id` and skipped — the remaining records are
/// still processed. There are no retries and no early termination.
pub fn export_records(
    records: &[InvoiceRecord],
    selected: &[usize],
    template: &str,
    template_stem: &str,
    engine: &dyn PdfEngine,
    config: &GeneratorConfig,
) -> ExportSummary {
    let mut summary = ExportSummary::default();

    for &index in selected {
        let Some(record) = records.get(index) else {
            eprintln!("invoice2pdf: warning: selection index {index} out of bounds, skipping");
            summary.failed += 1;
            continue;
        };

        match export_one(record, template, template_stem, engine, config) {
            Ok(path) => summary.generated.push(path),
            Err(e) => {
                eprintln!(
                    "invoice2pdf: warning: skipping invoice '{}': {e}",
                    record.invoice_id
                );
                summary.failed += 1;
            }
        }
    }

    summary
}

/// Render and export a single record; returns the output PDF path.
fn export_one(
    record: &InvoiceRecord,
    template: &str,
    template_stem: &str,
    engine: &dyn PdfEngine,
    config: &GeneratorConfig,
) -> Result<PathBuf> {
    let html = render_html(template, record);

    let html_path = config
        .temp_dir
        .join(format!("{}_{}.html", record.invoice_id, template_stem));
    std::fs::write(&html_path, &html)?;

    let pdf_path = config
        .output_dir
        .join(format!("({})_{}.pdf", record.invoice_id, template_stem));
    engine.render(&html, &pdf_path)?;

    Ok(pdf_path)
}
