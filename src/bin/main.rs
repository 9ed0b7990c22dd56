/// API Blueprint parser CLI — parse a blueprint, emit the AST as JSON or
/// YAML.
///
/// Usage:
///   apib [file] [--format json|yaml] [--sourcemap] [--validate] [--require-name]
///
/// Reads the blueprint from `file`, or from stdin when no file (or `-`)
/// is given. Diagnostics are printed to stderr. Exit code 0 on success,
/// 1 when parsing produced a fatal error, 2 on invalid invocation.

use std::io::Read;

use apib_parser::{emit, parse, ParseOptions};

struct Invocation {
    input: Option<String>,
    format: Format,
    sourcemap: bool,
    validate: bool,
    require_name: bool,
}

#[derive(PartialEq)]
enum Format {
    Json,
    Yaml,
}

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let invocation = parse_args(&args).unwrap_or_else(|message| {
        eprintln!("{message}");
        print_usage();
        std::process::exit(2);
    });

    let source = match &invocation.input {
        Some(path) => std::fs::read_to_string(path).unwrap_or_else(|e| {
            eprintln!("Cannot read '{}': {}", path, e);
            std::process::exit(2);
        }),
        None => {
            let mut buffer = String::new();
            if let Err(e) = std::io::stdin().read_to_string(&mut buffer) {
                eprintln!("Cannot read stdin: {}", e);
                std::process::exit(2);
            }
            buffer
        }
    };

    let options = ParseOptions {
        export_sourcemap: invocation.sourcemap,
        require_blueprint_name: invocation.require_name,
    };
    let result = parse(&source, options);

    print_diagnostics(&result);

    if !invocation.validate {
        let value = emit::result_to_json(&result);
        let rendered = match invocation.format {
            Format::Json => emit::render_json(&value),
            Format::Yaml => emit::render_yaml(&value),
        };
        print!("{rendered}");
    }

    if result.report.error.is_some() {
        std::process::exit(1);
    }
}

fn parse_args(args: &[String]) -> Result<Invocation, String> {
    let mut invocation = Invocation {
        input: None,
        format: Format::Json,
        sourcemap: false,
        validate: false,
        require_name: false,
    };

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--format" => {
                let value = args
                    .get(i + 1)
                    .ok_or_else(|| "--format expects a value".to_string())?;
                invocation.format = match value.as_str() {
                    "json" => Format::Json,
                    "yaml" => Format::Yaml,
                    other => return Err(format!("Unknown format '{other}'. Use 'json' or 'yaml'.")),
                };
                i += 2;
            }
            "--sourcemap" => {
                invocation.sourcemap = true;
                i += 1;
            }
            "--validate" => {
                invocation.validate = true;
                i += 1;
            }
            "--require-name" => {
                invocation.require_name = true;
                i += 1;
            }
            "-h" | "--help" => {
                print_usage();
                std::process::exit(0);
            }
            "-" => {
                invocation.input = None;
                i += 1;
            }
            other if other.starts_with('-') => {
                return Err(format!("Unknown argument '{other}'"));
            }
            path => {
                if invocation.input.is_some() {
                    return Err("Only one input file is accepted".to_string());
                }
                invocation.input = Some(path.to_string());
                i += 1;
            }
        }
    }

    Ok(invocation)
}

fn print_usage() {
    eprintln!("API Blueprint parser");
    eprintln!();
    eprintln!("Usage:");
    eprintln!("  apib [file] [flags]        Parse a blueprint (stdin when no file)");
    eprintln!();
    eprintln!("Flags:");
    eprintln!("  --format json|yaml         Output format (default json)");
    eprintln!("  --sourcemap                Export the source-map side-tree");
    eprintln!("  --validate                 Parse only, print no output");
    eprintln!("  --require-name             Missing blueprint name is an error");
}

fn print_diagnostics(result: &apib_parser::ParseResult) {
    for warning in &result.report.warnings {
        eprintln!(
            "[warning] {}: {}{}",
            warning.code.as_str(),
            warning.message,
            format_ranges(&warning.ranges)
        );
    }
    if let Some(error) = &result.report.error {
        eprintln!(
            "[error] {}: {}{}",
            error.code.as_str(),
            error.message,
            format_ranges(&error.ranges)
        );
    }
}

fn format_ranges(ranges: &[apib_parser::span::CharRange]) -> String {
    if ranges.is_empty() {
        return String::new();
    }
    let parts: Vec<String> = ranges
        .iter()
        .map(|range| format!("{}:{}", range.location, range.length))
        .collect();
    format!(" ({})", parts.join(", "))
}
