//! Interactive CLI that turns CSV/JSON invoice records into PDF documents.
//!
//! The flow is a straight line: pick a data file, pick an HTML template,
//! pick the records, then render each one through the external PDF engine.
//! Per-record failures are reported and skipped; the batch never aborts.

use invoice2pdf::{
    confirm, ensure_directories, export_records, find_files, load_records, open_file, select_item,
    select_records, GenerateError, GeneratorConfig, WeasyPrintEngine,
};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::{env, fs, process};

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.contains(&"--help".to_string()) || args.contains(&"-h".to_string()) {
        print_usage(&args[0]);
        process::exit(0);
    }

    let mut config = GeneratorConfig::default();
    if let Some(position) = args.iter().position(|a| a == "--engine") {
        match args.get(position + 1) {
            Some(command) => config.pdf_command = command.clone(),
            None => {
                eprintln!("❌ --engine requires a command argument");
                print_usage(&args[0]);
                process::exit(1);
            }
        }
    }

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut output = io::stdout();

    match run(&config, &mut input, &mut output) {
        Ok(()) => {}
        Err(e) => {
            eprintln!("\n❌ Error: {e}");
            process::exit(1);
        }
    }
}

fn print_usage(program_name: &str) {
    println!("📄 invoice2pdf - Invoice PDF Generator");
    println!();
    println!("USAGE:");
    println!("    {program_name} [--engine <command>]");
    println!();
    println!("OPTIONS:");
    println!("    --engine <command>   HTML→PDF engine to invoke (default: 'weasyprint')");
    println!("    -h, --help           Show this help message");
    println!();
    println!("DIRECTORIES (created on startup if absent):");
    println!("    data/        input records (.csv / .json)");
    println!("    templates/   HTML templates (.html)");
    println!("    output/      generated PDFs");
    println!("    temp/        intermediate HTML");
    println!();
    println!("This tool will:");
    println!("  • Let you pick a data file and group its rows into invoices");
    println!("  • Let you pick an HTML template and the records to export");
    println!("  • Render one PDF per record, skipping records that fail");
    println!("  • Offer to open the first generated PDF");
}

fn run(
    config: &GeneratorConfig,
    input: &mut impl BufRead,
    output: &mut impl Write,
) -> invoice2pdf::Result<()> {
    ensure_directories(config)?;

    // 1. Data file
    let data_files = find_files(&config.data_dir, &["csv", "json"]);
    if data_files.is_empty() {
        return Err(GenerateError::NoInputFiles {
            kind: "data",
            dir: config.data_dir.display().to_string(),
        });
    }
    let Some(choice) = select_item(input, output, &data_files, "Select a data file", path_label)?
    else {
        return Ok(());
    };
    let data_path = &data_files[choice];

    let records = load_records(data_path)?;
    if records.is_empty() {
        writeln!(output, "No records could be loaded.")?;
        return Ok(());
    }

    // 2. Template
    let template_files = find_files(&config.templates_dir, &["html"]);
    if template_files.is_empty() {
        return Err(GenerateError::NoInputFiles {
            kind: "template",
            dir: config.templates_dir.display().to_string(),
        });
    }
    let Some(choice) = select_item(
        input,
        output,
        &template_files,
        "Select an HTML template",
        path_label,
    )?
    else {
        return Ok(());
    };
    let template_path = &template_files[choice];

    let template = fs::read_to_string(template_path).map_err(|e| GenerateError::TemplateRead {
        file: template_path.display().to_string(),
        cause: e.to_string(),
    })?;
    let template_stem = template_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("template");

    // 3. Records
    let selected = select_records(input, output, &records)?;
    if selected.is_empty() {
        writeln!(output, "No records selected. Exiting.")?;
        return Ok(());
    }

    // 4. Export
    writeln!(output, "\nGenerating PDFs...")?;
    let engine = WeasyPrintEngine::new(&config.pdf_command);
    let summary = export_records(
        &records,
        &selected,
        &template,
        template_stem,
        &engine,
        config,
    );

    for path in &summary.generated {
        writeln!(output, "  ✓ Created: {}", path.display())?;
    }
    if summary.failed > 0 {
        writeln!(
            output,
            "  ✗ {} record(s) failed and were skipped (see warnings above)",
            summary.failed
        )?;
    }

    // 5. Open the first PDF
    match summary.generated.first() {
        Some(first) => {
            writeln!(
                output,
                "\nGeneration finished: {} file(s) created.",
                summary.success_count()
            )?;
            if confirm(input, output, "Open the first generated PDF?")? {
                if let Err(e) = open_file(first) {
                    eprintln!("⚠ {e}");
                }
            }
        }
        None => writeln!(output, "\nNo files were generated.")?,
    }

    Ok(())
}

fn path_label(path: &PathBuf) -> String {
    path.display().to_string()
}
