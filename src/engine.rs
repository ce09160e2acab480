use crate::{GenerateError, Result};
use std::io::Write as _;
use std::path::Path;
use std::process::{Command, Stdio};

// ── PdfEngine ────────────────────────────────────────────────────────────────

/// Boundary to the external HTML→PDF rendering collaborator.
///
/// The whole pipeline's view of PDF generation is this single call: a
/// complete HTML document goes in, a PDF lands at `output`, and any
/// failure surfaces as [`GenerateError::Render`]. The export pipeline and
/// the tests swap implementations through this seam.
pub trait PdfEngine {
    /// Render `html` and write the resulting PDF to `output`.
    fn render(&self, html: &str, output: &Path) -> Result<()>;
}

// ── WeasyPrintEngine ─────────────────────────────────────────────────────────

/// Renders by spawning the WeasyPrint command-line tool.
///
/// The HTML is streamed over stdin (`weasyprint - <output>`; the `-`
/// argument tells WeasyPrint to read the document from stdin), so no
/// intermediate file is required for rendering. A missing binary, a broken
/// pipe or a non-zero exit status all map to [`GenerateError::Render`]
/// with the engine's stderr in the message.
pub struct WeasyPrintEngine {
    /// The command to spawn. Defaults to `weasyprint`; override to point
    /// at a different binary or wrapper script.
    pub command: String,
}

impl Default for WeasyPrintEngine {
    fn default() -> Self {
        Self {
            command: String::from("weasyprint"),
        }
    }
}

impl WeasyPrintEngine {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }
}

impl PdfEngine for WeasyPrintEngine {
    fn render(&self, html: &str, output: &Path) -> Result<()> {
        let mut child = Command::new(&self.command)
            .arg("-")
            .arg(output)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                GenerateError::Render(format!("failed to start '{}': {e}", self.command))
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(html.as_bytes()).map_err(|e| {
                GenerateError::Render(format!("failed to send HTML to '{}': {e}", self.command))
            })?;
            // stdin drops here, closing the pipe so the engine can finish.
        }

        let result = child
            .wait_with_output()
            .map_err(|e| GenerateError::Render(e.to_string()))?;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            return Err(GenerateError::Render(format!(
                "'{}' exited with {}: {}",
                self.command,
                result.status,
                stderr.trim()
            )));
        }

        Ok(())
    }
}

// ── Platform file-open helper ────────────────────────────────────────────────

/// Best-effort launch of the platform's default viewer for `path`.
///
/// Failure is reported as [`GenerateError::OpenFile`] and is never fatal
/// to a run; callers report it and move on.
pub fn open_file(path: &Path) -> Result<()> {
    let open_error = |cause: String| GenerateError::OpenFile {
        file: path.display().to_string(),
        cause,
    };

    let status = viewer_command(path)
        .status()
        .map_err(|e| open_error(e.to_string()))?;

    if status.success() {
        Ok(())
    } else {
        Err(open_error(format!("viewer exited with {status}")))
    }
}

#[cfg(target_os = "windows")]
fn viewer_command(path: &Path) -> Command {
    let mut command = Command::new("cmd");
    // The empty string is the window title `start` expects before the path.
    command.args(["/C", "start", ""]).arg(path);
    command
}

#[cfg(target_os = "macos")]
fn viewer_command(path: &Path) -> Command {
    let mut command = Command::new("open");
    command.arg(path);
    command
}

#[cfg(not(any(target_os = "windows", target_os = "macos")))]
fn viewer_command(path: &Path) -> Command {
    let mut command = Command::new("xdg-open");
    command.arg(path);
    command
}
