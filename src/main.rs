//! qpress – command-line quotation → PDF renderer.
//!
//! Usage:
//!   qpress <request.json> [output.pdf] [--font metrics.ttf] [--outline]
//!   qpress --sample [output.pdf]
//!
//! The request file is a JSON `RenderRequest` (quotation, items, context,
//! selected terms). If `output.pdf` is omitted the document is written to
//! the current directory as `{quotation_number}_Quotation.pdf`.

use std::{env, fs, path::PathBuf, process};

use quote_press::fonts::TextMeasurer;
use quote_press::pipeline::{render_quotation_with, RenderRequest};
use quote_press::samples;

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    let mut input_path: Option<PathBuf> = None;
    let mut output_path: Option<PathBuf> = None;
    let mut font_path: Option<PathBuf> = None;
    let mut use_sample = false;
    let mut write_outline = false;
    let mut positional = 0usize;

    let mut iter = args.iter().skip(1).peekable();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--sample" | "-s" => use_sample = true,
            "--outline" => write_outline = true,
            "--font" | "-f" => match iter.next() {
                Some(v) => font_path = Some(PathBuf::from(v)),
                None => {
                    eprintln!("--font requires a path");
                    process::exit(1);
                }
            },
            "--help" | "-h" => {
                print_usage(&args[0]);
                process::exit(0);
            }
            other if other.starts_with('-') => {
                eprintln!("Unknown flag: {other}");
                print_usage(&args[0]);
                process::exit(1);
            }
            path => {
                if positional == 0 {
                    input_path = Some(PathBuf::from(path));
                } else if positional == 1 {
                    output_path = Some(PathBuf::from(path));
                } else {
                    eprintln!("Unexpected argument: {path}");
                    print_usage(&args[0]);
                    process::exit(1);
                }
                positional += 1;
            }
        }
    }

    // With --sample the first positional becomes the output path.
    if use_sample && output_path.is_none() {
        output_path = input_path.take();
    }

    let request: RenderRequest = if use_sample {
        samples::sample_request()
    } else {
        let input = match input_path {
            Some(p) => p,
            None => {
                eprintln!("Error: no request file specified.");
                print_usage(&args[0]);
                process::exit(1);
            }
        };
        let json = match fs::read_to_string(&input) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("Error reading '{}': {e}", input.display());
                process::exit(1);
            }
        };
        match serde_json::from_str(&json) {
            Ok(req) => req,
            Err(e) => {
                eprintln!("Error parsing '{}': {e}", input.display());
                process::exit(1);
            }
        }
    };

    let measurer = match font_path {
        Some(path) => {
            let bytes = match fs::read(&path) {
                Ok(b) => b,
                Err(e) => {
                    eprintln!("Error reading font '{}': {e}", path.display());
                    process::exit(1);
                }
            };
            match TextMeasurer::with_face(bytes) {
                Ok(m) => m,
                Err(e) => {
                    eprintln!("Error loading font '{}': {e}", path.display());
                    process::exit(1);
                }
            }
        }
        None => TextMeasurer::new(),
    };

    match render_quotation_with(&request, &measurer) {
        Ok(doc) => {
            let output = output_path.unwrap_or_else(|| PathBuf::from(&doc.file_name));
            if let Some(parent) = output.parent() {
                if !parent.as_os_str().is_empty() {
                    if let Err(e) = fs::create_dir_all(parent) {
                        eprintln!("Error creating output directory: {e}");
                        process::exit(1);
                    }
                }
            }
            if let Err(e) = fs::write(&output, &doc.bytes) {
                eprintln!("Error writing '{}': {e}", output.display());
                process::exit(1);
            }
            if write_outline {
                let mut outline_path = output.clone();
                outline_path.set_extension("outline.json");
                if let Err(e) = fs::write(&outline_path, doc.outline.to_json()) {
                    eprintln!("Error writing '{}': {e}", outline_path.display());
                    process::exit(1);
                }
            }
            let pages = doc.outline.page_count();
            eprintln!(
                "Wrote '{}' ({} bytes, {} page{})",
                output.display(),
                doc.bytes.len(),
                pages,
                if pages == 1 { "" } else { "s" }
            );
        }
        Err(e) => {
            eprintln!("Error generating quotation PDF: {e}");
            process::exit(1);
        }
    }
}

fn print_usage(prog: &str) {
    eprintln!("qpress – quotation to PDF renderer (quote-press)");
    eprintln!();
    eprintln!("Usage:");
    eprintln!("  {prog} <request.json> [output.pdf] [--font metrics.ttf] [--outline]");
    eprintln!("  {prog} --sample [output.pdf]");
    eprintln!();
    eprintln!("Arguments:");
    eprintln!("  <request.json>  Render request: quotation, line items, context, terms");
    eprintln!("  [output.pdf]    Output path  (default: <quotation_number>_Quotation.pdf)");
    eprintln!();
    eprintln!("Flags:");
    eprintln!("  --sample, -s    Render the built-in sample request");
    eprintln!("  --font, -f      TTF/OTF face used for text measurement");
    eprintln!("  --outline       Also write the structural outline JSON next to the PDF");
    eprintln!("  --help          Print this message");
}
