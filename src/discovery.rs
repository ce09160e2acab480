use crate::GeneratorConfig;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

// ── Directory setup ──────────────────────────────────────────────────────────

/// Create the four working directories on startup if they are absent.
pub fn ensure_directories(config: &GeneratorConfig) -> io::Result<()> {
    for dir in [
        &config.data_dir,
        &config.templates_dir,
        &config.output_dir,
        &config.temp_dir,
    ] {
        fs::create_dir_all(dir)?;
    }
    Ok(())
}

// ── File discovery ───────────────────────────────────────────────────────────

/// Recursively collect every file under `dir` whose extension matches one
/// of `extensions` (case-insensitive, without the leading dot).
///
/// The result is sorted so the interactive menus are stable between runs.
/// A missing or unreadable directory yields an empty list; the caller
/// decides whether that aborts the run.
pub fn find_files(dir: &Path, extensions: &[&str]) -> Vec<PathBuf> {
    let mut found = Vec::new();
    collect_files(dir, extensions, &mut found);
    found.sort();
    found
}

fn collect_files(dir: &Path, extensions: &[&str], found: &mut Vec<PathBuf>) {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(_) => return,
    };

    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_files(&path, extensions, found);
        } else if matches_extension(&path, extensions) {
            found.push(path);
        }
    }
}

fn matches_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| extensions.iter().any(|wanted| e.eq_ignore_ascii_case(wanted)))
        .unwrap_or(false)
}
