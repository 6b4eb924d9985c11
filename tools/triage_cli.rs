//! Triage CLI
//!
//! Runs one structured record through rule evaluation and guideline
//! verification and prints the display-ready result as JSON.
//!
//! Usage:
//!   cargo run --bin triage_cli -- --record record.json
//!   cat record.json | cargo run --bin triage_cli -- --diagnosis flu --diagnosis pneumonia
//!   cargo run --bin triage_cli -- --record record.json --guidelines resources/guidelines.json

use std::env;
use std::fs;
use std::io::Read;
use std::path::PathBuf;

use carecompanion_lib::config;
use carecompanion_lib::triage::{
    evaluate, GuidelineStore, StructuredRecord, TriageDisplay, TriageEngine,
};

fn print_usage(program: &str) {
    eprintln!("Triage CLI");
    eprintln!();
    eprintln!("Usage: {} [options]", program);
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --record FILE       Structured record JSON (default: stdin, or '-')");
    eprintln!("  --guidelines FILE   Guideline table JSON (default: {})", config::guidelines_path().display());
    eprintln!("  --diagnosis NAME    Candidate diagnosis, repeatable, checked in order");
    eprintln!("  --raw               Skip guideline verification");
    eprintln!("  --help              Show this help");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  {}   Override the default guideline table path", config::GUIDELINES_ENV);
    eprintln!("  RUST_LOG                   Log filter (logs are written to stderr)");
}

fn read_record(source: Option<&str>) -> Result<StructuredRecord, Box<dyn std::error::Error>> {
    let json = match source {
        None | Some("-") => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
        Some(path) => fs::read_to_string(path)?,
    };
    Ok(StructuredRecord::from_json_str(&json)?)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    carecompanion_lib::init_tracing();

    let args: Vec<String> = env::args().collect();

    let mut record_path: Option<String> = None;
    let mut guidelines_path: Option<PathBuf> = None;
    let mut diagnoses: Vec<String> = Vec::new();
    let mut raw_only = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_usage(&args[0]);
                return Ok(());
            }
            "--record" => {
                i += 1;
                if i < args.len() {
                    record_path = Some(args[i].clone());
                }
            }
            "--guidelines" => {
                i += 1;
                if i < args.len() {
                    guidelines_path = Some(PathBuf::from(&args[i]));
                }
            }
            "--diagnosis" => {
                i += 1;
                if i < args.len() {
                    diagnoses.push(args[i].clone());
                }
            }
            "--raw" => raw_only = true,
            other => {
                eprintln!("Unknown argument: {}", other);
                print_usage(&args[0]);
                std::process::exit(2);
            }
        }
        i += 1;
    }

    let record = read_record(record_path.as_deref())?;

    let result = if raw_only {
        evaluate(&record)
    } else {
        let path = guidelines_path.unwrap_or_else(config::guidelines_path);
        let engine = TriageEngine::new(GuidelineStore::open(path).into());
        engine.triage(&record, &diagnoses)
    };

    let display = TriageDisplay::from(result);
    println!("{}", serde_json::to_string_pretty(&display)?);

    Ok(())
}
