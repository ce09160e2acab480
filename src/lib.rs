//! # invoice2pdf
//!
//! A small library (and interactive CLI) that turns tabular invoice records
//! into per-record PDF documents.
//!
//! ## What this crate does
//!
//! 1. **Load records** — parses a CSV or JSON file into a normalized list of
//!    [`InvoiceRecord`]s, grouping flat rows by `invoice_id`.
//! 2. **Render HTML** — substitutes record fields and computed totals into an
//!    HTML template via literal placeholder replacement.
//! 3. **Render PDF** — hands the finished HTML to an external engine
//!    (WeasyPrint by default) behind the [`PdfEngine`] trait.
//! 4. **Export best-effort** — processes a selected batch of records one by
//!    one, skipping and reporting failures instead of aborting.
//!
//! ## Quick example
//!
//! ```no_run
//! use invoice2pdf::{load_records, render_html, PdfEngine, WeasyPrintEngine};
//! use std::path::Path;
//!
//! # fn main() -> invoice2pdf::Result<()> {
//! let records = load_records(Path::new("data/invoices.csv"))?;
//! let template = std::fs::read_to_string("templates/invoice.html")?;
//!
//! let engine = WeasyPrintEngine::default();
//! for record in &records {
//!     let html = render_html(&template, record);
//!     let name = format!("output/({})_invoice.pdf", record.invoice_id);
//!     engine.render(&html, Path::new(&name))?;
//! }
//! # Ok(())
//! # }
//! ```

use std::path::PathBuf;
use thiserror::Error;

mod discovery;
mod engine;
mod export;
mod loader;
mod record;
mod select;
mod template;

pub use discovery::{ensure_directories, find_files};
pub use engine::{open_file, PdfEngine, WeasyPrintEngine};
pub use export::{export_records, ExportSummary};
pub use loader::load_records;
pub use record::{InvoiceRecord, LineItem};
pub use select::{
    confirm, parse_choice, parse_multi_choice, select_item, select_records, Selection,
    SelectionError,
};
pub use template::{format_amount, render_html};

// ── Configuration ────────────────────────────────────────────────────────────

/// Runtime configuration for the generation pipeline.
///
/// The defaults reproduce the fixed directory layout the CLI works with:
/// `data/` for input records, `templates/` for HTML templates, `output/` for
/// the produced PDFs and `temp/` for the transient HTML copies.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Directory scanned for `.csv` / `.json` input files.
    pub data_dir: PathBuf,

    /// Directory scanned for `.html` templates.
    pub templates_dir: PathBuf,

    /// Directory the finished PDFs are written to.
    pub output_dir: PathBuf,

    /// Directory for the intermediate HTML written before rendering.
    pub temp_dir: PathBuf,

    /// Command used to invoke the external HTML→PDF engine.
    pub pdf_command: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            templates_dir: PathBuf::from("templates"),
            output_dir: PathBuf::from("output"),
            temp_dir: PathBuf::from("temp"),
            pdf_command: String::from("weasyprint"),
        }
    }
}

// ── Error type ───────────────────────────────────────────────────────────────

/// Every error that this crate can produce.
#[derive(Error, Debug)]
pub enum GenerateError {
    /// A filesystem I/O error occurred (e.g. when creating directories or
    /// writing the transient HTML).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A scan of `data/` or `templates/` found no candidate files.
    #[error("No {kind} files found in '{dir}'")]
    NoInputFiles { kind: &'static str, dir: String },

    /// The input file is malformed or is missing a required field.
    /// No partial records are returned when this is raised.
    #[error("Failed to load '{file}': {cause}")]
    DataFormat { file: String, cause: String },

    /// The loader was handed a file it does not understand. Callers are
    /// expected to pre-filter by extension, so this is a guard.
    #[error("Unsupported data file extension: '{0}'")]
    UnsupportedExtension(String),

    /// The selected template could not be read.
    #[error("Failed to read template '{file}': {cause}")]
    TemplateRead { file: String, cause: String },

    /// The external PDF engine failed or could not be started.
    #[error("PDF rendering failed: {0}")]
    Render(String),

    /// The platform file-open helper failed. Never fatal.
    #[error("Could not open '{file}': {cause}")]
    OpenFile { file: String, cause: String },
}

/// Convenience alias used throughout this crate.
pub type Result<T> = std::result::Result<T, GenerateError>;
