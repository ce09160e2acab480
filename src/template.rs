use crate::record::{display, InvoiceRecord};
use std::fmt::Write as _;

// ── Template renderer ────────────────────────────────────────────────────────

/// Substitute one record into an HTML template. Pure: no I/O, no state.
///
/// Exactly five placeholders are recognized and replaced by literal text
/// substitution: `{{ invoice_id }}`, `{{ customer_name }}`, `{{ date }}`,
/// `{{ item_rows }}` and `{{ total_amount }}`. Anything else in the
/// template, recognized-looking or not, is left untouched.
///
/// ```
/// # use invoice2pdf::{render_html, InvoiceRecord};
/// let record = InvoiceRecord {
///     invoice_id: "A1".into(),
///     customer_name: None,
///     date: None,
///     items: vec![],
/// };
/// assert_eq!(render_html("<h1>{{ invoice_id }}</h1>", &record), "<h1>A1</h1>");
/// ```
pub fn render_html(template: &str, record: &InvoiceRecord) -> String {
    template
        .replace("{{ invoice_id }}", &record.invoice_id)
        .replace(
            "{{ customer_name }}",
            record.customer_name.as_deref().unwrap_or(""),
        )
        .replace("{{ date }}", record.date.as_deref().unwrap_or(""))
        .replace("{{ item_rows }}", &item_rows(record))
        .replace("{{ total_amount }}", &format_amount(record.total_amount()))
}

/// One fixed four-column table row per line item, in record order.
fn item_rows(record: &InvoiceRecord) -> String {
    let mut rows = String::new();
    for item in &record.items {
        let _ = writeln!(
            rows,
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            display(&item.item_name),
            display(&item.quantity),
            display(&item.price),
            display(&item.amount),
        );
    }
    rows
}

/// Format a monetary amount with exactly two decimal places and a space as
/// the thousands separator.
///
/// ```
/// # use invoice2pdf::format_amount;
/// assert_eq!(format_amount(1234.5), "1 234.50");
/// assert_eq!(format_amount(0.0), "0.00");
/// assert_eq!(format_amount(-1234567.891), "-1 234 567.89");
/// ```
pub fn format_amount(value: f64) -> String {
    let formatted = format!("{value:.2}");
    let (sign, unsigned) = match formatted.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", formatted.as_str()),
    };
    let (integer, fraction) = unsigned.split_once('.').unwrap_or((unsigned, "00"));

    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
    for (i, digit) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(digit);
    }

    format!("{sign}{grouped}.{fraction}")
}
