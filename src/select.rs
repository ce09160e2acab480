use crate::record::InvoiceRecord;
use std::io::{self, BufRead, Write};
use thiserror::Error;

// ── SelectionError ───────────────────────────────────────────────────────────

/// Recoverable errors from parsing interactive input. The prompt loops
/// report these to the console and ask again; they never abort a run.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SelectionError {
    /// A token could not be parsed as an integer.
    #[error("'{0}' is not a number")]
    NotANumber(String),

    /// One or more numbers fall outside `1..=max`. The whole input is
    /// rejected; valid entries are not partially accepted.
    #[error("invalid numbers in the list: {}; available numbers are 1 to {}", .bad.join(", "), .max)]
    OutOfRange { bad: Vec<String>, max: usize },

    /// Nothing was entered.
    #[error("nothing was entered")]
    Empty,
}

/// Outcome of parsing a multi-choice input.
#[derive(Debug, Clone, PartialEq)]
pub enum Selection {
    /// The literal token `all` (case-insensitive): every record.
    All,
    /// Deduplicated 0-based indices in ascending order.
    Indices(Vec<usize>),
}

// ── Pure parsing ─────────────────────────────────────────────────────────────

/// Parse a single 1-based choice against a list of `count` candidates.
/// Returns the 0-based index.
///
/// ```
/// # use invoice2pdf::{parse_choice, SelectionError};
/// assert_eq!(parse_choice("2", 3), Ok(1));
/// assert!(matches!(parse_choice("5", 3), Err(SelectionError::OutOfRange { .. })));
/// assert!(matches!(parse_choice("two", 3), Err(SelectionError::NotANumber(_))));
/// ```
pub fn parse_choice(input: &str, count: usize) -> std::result::Result<usize, SelectionError> {
    let token = input.trim();
    if token.is_empty() {
        return Err(SelectionError::Empty);
    }

    let number: i64 = token
        .parse()
        .map_err(|_| SelectionError::NotANumber(token.to_string()))?;

    if number >= 1 && number as usize <= count {
        Ok(number as usize - 1)
    } else {
        Err(SelectionError::OutOfRange {
            bad: vec![token.to_string()],
            max: count,
        })
    }
}

/// Parse a multi-choice input against a list of `count` candidates: either
/// the literal `all`, or comma-separated 1-based numbers.
///
/// Duplicates are removed and the resulting indices are ascending, so the
/// selected subset keeps the original list order regardless of input
/// order. Any out-of-range number rejects the entire input, naming every
/// bad token.
///
/// ```
/// # use invoice2pdf::{parse_multi_choice, Selection};
/// assert_eq!(parse_multi_choice("ALL", 3), Ok(Selection::All));
/// assert_eq!(parse_multi_choice("2,2,1", 3), Ok(Selection::Indices(vec![0, 1])));
/// assert!(parse_multi_choice("5", 3).is_err());
/// ```
pub fn parse_multi_choice(
    input: &str,
    count: usize,
) -> std::result::Result<Selection, SelectionError> {
    let trimmed = input.trim();
    if trimmed.eq_ignore_ascii_case("all") {
        return Ok(Selection::All);
    }
    if trimmed.is_empty() {
        return Err(SelectionError::Empty);
    }

    let mut indices = Vec::new();
    let mut bad = Vec::new();

    for token in trimmed.split(',') {
        let token = token.trim();
        let number: i64 = token
            .parse()
            .map_err(|_| SelectionError::NotANumber(token.to_string()))?;
        if number >= 1 && number as usize <= count {
            indices.push(number as usize - 1);
        } else {
            bad.push(token.to_string());
        }
    }

    if !bad.is_empty() {
        return Err(SelectionError::OutOfRange { bad, max: count });
    }

    indices.sort_unstable();
    indices.dedup();
    Ok(Selection::Indices(indices))
}

// ── Interactive loops ────────────────────────────────────────────────────────
//
// Generic over the input/output streams so tests can drive them with
// in-memory buffers. EOF on the input stream means "abort this step":
// re-prompting on a closed stream would spin forever.

/// Present a 1-indexed list and read one choice. Returns the 0-based index
/// of the chosen item, or `None` when the list is empty (no prompting) or
/// the input stream ends.
pub fn select_item<R, W, T, F>(
    input: &mut R,
    output: &mut W,
    items: &[T],
    title: &str,
    label: F,
) -> io::Result<Option<usize>>
where
    R: BufRead,
    W: Write,
    F: Fn(&T) -> String,
{
    writeln!(output, "\n--- {title} ---")?;
    if items.is_empty() {
        writeln!(output, "No files found. Check that they exist.")?;
        return Ok(None);
    }

    for (i, item) in items.iter().enumerate() {
        writeln!(output, "{}. {}", i + 1, label(item))?;
    }

    loop {
        write!(output, "Select a number (1-{}): ", items.len())?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Ok(None);
        }

        match parse_choice(&line, items.len()) {
            Ok(index) => return Ok(Some(index)),
            Err(e) => writeln!(output, "{e}. Try again.")?,
        }
    }
}

/// Present the record list and read a multi-choice selection. Returns the
/// selected 0-based indices in ascending order; empty when the record list
/// is empty (no prompting) or the input stream ends.
pub fn select_records<R, W>(
    input: &mut R,
    output: &mut W,
    records: &[InvoiceRecord],
) -> io::Result<Vec<usize>>
where
    R: BufRead,
    W: Write,
{
    writeln!(output, "\n--- Record selection ---")?;
    if records.is_empty() {
        writeln!(output, "No records available.")?;
        return Ok(Vec::new());
    }

    for (i, record) in records.iter().enumerate() {
        writeln!(output, "{}. {}", i + 1, record.label())?;
    }
    writeln!(
        output,
        "\nEnter a record number, several numbers separated by commas, or 'all' for every record."
    )?;

    loop {
        write!(output, "Your choice: ")?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Ok(Vec::new());
        }

        match parse_multi_choice(&line, records.len()) {
            Ok(Selection::All) => return Ok((0..records.len()).collect()),
            Ok(Selection::Indices(indices)) => return Ok(indices),
            Err(e) => writeln!(output, "{e}. Try again.")?,
        }
    }
}

/// Ask a yes/no question. `y` and `yes` (case-insensitive) mean yes;
/// everything else, including end of input, means no.
pub fn confirm<R, W>(input: &mut R, output: &mut W, question: &str) -> io::Result<bool>
where
    R: BufRead,
    W: Write,
{
    write!(output, "{question} (y/n): ")?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(false);
    }

    let answer = line.trim();
    Ok(answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes"))
}
