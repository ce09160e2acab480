use crate::record::{display, InvoiceRecord, LineItem};
use crate::{GenerateError, Result};
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;

// ── Data loader ──────────────────────────────────────────────────────────────

/// Load a CSV or JSON file and normalize it into a list of
/// [`InvoiceRecord`]s.
///
/// Rows (CSV) or objects (JSON) sharing an `invoice_id` merge into one
/// record, appending to its `items` in source order; records keep their
/// first-appearance order. Any read or parse failure, including a missing
/// `invoice_id`, yields [`GenerateError::DataFormat`] and no partial
/// records.
///
/// The dispatch is by file extension (case-insensitive). Callers are
/// expected to have pre-filtered candidates via [`crate::find_files`];
/// anything else is rejected with
/// [`GenerateError::UnsupportedExtension`].
pub fn load_records(path: &Path) -> Result<Vec<InvoiceRecord>> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    match extension.as_str() {
        "csv" => load_csv(path),
        "json" => load_json(path),
        other => Err(GenerateError::UnsupportedExtension(other.into())),
    }
}

/// Create a data-format error with consistent context.
fn data_format(path: &Path, cause: impl ToString) -> GenerateError {
    GenerateError::DataFormat {
        file: path.display().to_string(),
        cause: cause.to_string(),
    }
}

// ── Grouping accumulator ─────────────────────────────────────────────────────

/// Groups incoming rows by `invoice_id` while preserving both the
/// first-appearance order of records and the row order of their items.
#[derive(Default)]
struct RecordAccumulator {
    records: Vec<InvoiceRecord>,
    index: HashMap<String, usize>,
}

impl RecordAccumulator {
    /// Return the record for `invoice_id`, creating it on first sight.
    /// The header fields are fixed by the first row of the group.
    fn entry(
        &mut self,
        invoice_id: &str,
        customer_name: Option<String>,
        date: Option<String>,
    ) -> &mut InvoiceRecord {
        let index = match self.index.get(invoice_id) {
            Some(&i) => i,
            None => {
                self.records.push(InvoiceRecord {
                    invoice_id: invoice_id.to_string(),
                    customer_name,
                    date,
                    items: Vec::new(),
                });
                let i = self.records.len() - 1;
                self.index.insert(invoice_id.to_string(), i);
                i
            }
        };
        &mut self.records[index]
    }

    fn into_records(self) -> Vec<InvoiceRecord> {
        self.records
    }
}

// ── CSV mode ─────────────────────────────────────────────────────────────────

/// Each row must carry `invoice_id`; the other columns are optional. Cells
/// that are present stay strings; item columns missing from the header take
/// the loader defaults (`quantity` → 1, `price` → 0, `amount` → 0).
fn load_csv(path: &Path) -> Result<Vec<InvoiceRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .from_path(path)
        .map_err(|e| data_format(path, e))?;

    let mut accumulator = RecordAccumulator::default();

    for row in reader.deserialize::<HashMap<String, String>>() {
        let row = row.map_err(|e| data_format(path, e))?;

        let invoice_id = row
            .get("invoice_id")
            .ok_or_else(|| data_format(path, "missing required field 'invoice_id'"))?
            .clone();

        let record = accumulator.entry(
            &invoice_id,
            row.get("customer_name").cloned(),
            row.get("date").cloned(),
        );
        record.items.push(LineItem {
            item_name: cell(&row, "item_name", Value::String(String::new())),
            quantity: cell(&row, "quantity", Value::from(1)),
            price: cell(&row, "price", Value::from(0)),
            amount: cell(&row, "amount", Value::from(0)),
        });
    }

    Ok(accumulator.into_records())
}

/// A present cell is carried as a string; an absent column takes `default`.
fn cell(row: &HashMap<String, String>, column: &str, default: Value) -> Value {
    match row.get(column) {
        Some(text) => Value::String(text.clone()),
        None => default,
    }
}

// ── JSON mode ────────────────────────────────────────────────────────────────

/// The input is an array of objects, each carrying `invoice_id`.
///
/// Two shapes are accepted per object:
/// - a nested `items` **array** — its elements are appended verbatim
///   (pre-grouped input);
/// - otherwise, the object's own item-shaped fields (`item_name`,
///   `quantity`, `price`, `amount`) form a single line item (flat input).
///
/// An object carrying both keeps the nested array and drops the top-level
/// item fields.
fn load_json(path: &Path) -> Result<Vec<InvoiceRecord>> {
    let text = std::fs::read_to_string(path).map_err(|e| data_format(path, e))?;
    let data: Value = serde_json::from_str(&text).map_err(|e| data_format(path, e))?;

    let entries = data
        .as_array()
        .ok_or_else(|| data_format(path, "top-level JSON value is not an array"))?;

    let mut accumulator = RecordAccumulator::default();

    for entry in entries {
        let object = entry
            .as_object()
            .ok_or_else(|| data_format(path, "array element is not an object"))?;

        let invoice_id = object
            .get("invoice_id")
            .map(display)
            .ok_or_else(|| data_format(path, "missing required field 'invoice_id'"))?;

        let record = accumulator.entry(
            &invoice_id,
            optional_string(object.get("customer_name")),
            optional_string(object.get("date")),
        );

        if let Some(Value::Array(items)) = object.get("items") {
            for item in items {
                let line: LineItem = serde_json::from_value(item.clone())
                    .map_err(|e| data_format(path, format!("malformed line item: {e}")))?;
                record.items.push(line);
            }
        } else {
            record.items.push(LineItem {
                item_name: field(object, "item_name", Value::String(String::new())),
                quantity: field(object, "quantity", Value::from(1)),
                price: field(object, "price", Value::from(0)),
                amount: field(object, "amount", Value::from(0)),
            });
        }
    }

    Ok(accumulator.into_records())
}

fn optional_string(value: Option<&Value>) -> Option<String> {
    value.filter(|v| !v.is_null()).map(display)
}

fn field(object: &serde_json::Map<String, Value>, key: &str, default: Value) -> Value {
    object.get(key).cloned().unwrap_or(default)
}
