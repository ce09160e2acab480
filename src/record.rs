use serde::Deserialize;
use serde_json::Value;

// ── InvoiceRecord ────────────────────────────────────────────────────────────

/// One logical invoice: all line items sharing an `invoice_id`, grouped
/// under that identifier in the order they appeared in the source file.
///
/// Produced by [`crate::load_records`]; immutable for the rest of the run.
#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceRecord {
    /// Unique key used for grouping and for naming the output PDF.
    pub invoice_id: String,

    /// Optional display name of the customer. Absent fields render empty.
    pub customer_name: Option<String>,

    /// Optional display date. Absent fields render empty.
    pub date: Option<String>,

    /// Line items in insertion order from the source file.
    pub items: Vec<LineItem>,
}

impl InvoiceRecord {
    /// Sum of all line-item amounts, with each value coerced to `f64`.
    /// Values that cannot be coerced (non-numeric strings, nulls, …) are
    /// skipped rather than aborting the sum.
    ///
    /// ```
    /// # use invoice2pdf::{InvoiceRecord, LineItem};
    /// # use serde_json::json;
    /// let record = InvoiceRecord {
    ///     invoice_id: "A1".into(),
    ///     customer_name: None,
    ///     date: None,
    ///     items: vec![
    ///         LineItem { amount: json!("1000"), ..Default::default() },
    ///         LineItem { amount: json!("x"), ..Default::default() },
    ///         LineItem { amount: json!(234.5), ..Default::default() },
    ///     ],
    /// };
    /// assert_eq!(record.total_amount(), 1234.5);
    /// ```
    pub fn total_amount(&self) -> f64 {
        self.items.iter().filter_map(LineItem::amount_as_f64).sum()
    }

    /// One-line label used by the interactive record list.
    pub fn label(&self) -> String {
        format!(
            "ID: {}, Customer: {}",
            self.invoice_id,
            self.customer_name.as_deref().unwrap_or("N/A")
        )
    }
}

// ── LineItem ─────────────────────────────────────────────────────────────────

/// One purchased item within an invoice.
///
/// Source data is untyped — CSV cells arrive as strings, JSON authors write
/// whatever they like — so every field is carried as a raw
/// [`serde_json::Value`] and only coerced when displayed or summed.
///
/// The `Deserialize` defaults are the render-time defaults (empty name,
/// zero numbers): a pre-grouped JSON item that omits a field behaves
/// exactly as if the renderer had filled the blank. Flat CSV/JSON rows get
/// the loader defaults (`quantity` → 1) from the loader itself.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LineItem {
    /// Item description.
    #[serde(default = "empty_string")]
    pub item_name: Value,

    /// Quantity purchased.
    #[serde(default = "zero")]
    pub quantity: Value,

    /// Unit price.
    #[serde(default = "zero")]
    pub price: Value,

    /// Line total; the only field the pipeline ever computes with.
    #[serde(default = "zero")]
    pub amount: Value,
}

impl Default for LineItem {
    fn default() -> Self {
        Self {
            item_name: empty_string(),
            quantity: zero(),
            price: zero(),
            amount: zero(),
        }
    }
}

impl LineItem {
    /// Lenient numeric coercion of the `amount` field: JSON numbers pass
    /// through, strings are parsed, everything else yields `None`.
    ///
    /// ```
    /// # use invoice2pdf::LineItem;
    /// # use serde_json::json;
    /// let item = LineItem { amount: json!("234.5"), ..Default::default() };
    /// assert_eq!(item.amount_as_f64(), Some(234.5));
    ///
    /// let item = LineItem { amount: json!("n/a"), ..Default::default() };
    /// assert_eq!(item.amount_as_f64(), None);
    /// ```
    pub fn amount_as_f64(&self) -> Option<f64> {
        coerce_f64(&self.amount)
    }
}

fn empty_string() -> Value {
    Value::String(String::new())
}

fn zero() -> Value {
    Value::from(0)
}

// ── Untyped value helpers ────────────────────────────────────────────────────

/// Coerce an untyped field to `f64` where possible.
pub(crate) fn coerce_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Render an untyped field for display: strings verbatim (unquoted),
/// null as empty, everything else via its JSON representation.
pub(crate) fn display(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
