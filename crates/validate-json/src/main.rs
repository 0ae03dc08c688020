//! validate-json - walk a directory of JSON Schema test cases
//!
//! Each subdirectory of the tests root is one case: a `main.json` schema plus
//! `data_success/*.json` instances expected to pass and `data_fail/*.json`
//! instances expected to fail. The tool prints a detail line per mismatching
//! file and a global summary, and exits non-zero when any case fails.

use anyhow::{Context, Result, bail};
use clap::Parser;
use quill_json_schema::{CompiledSchema, KeywordRegistry};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::process;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "validate-json")]
#[command(about = "Validate JSON documents against JSON Schema test directories", long_about = None)]
struct Args {
    /// Root directory containing one subdirectory per test case
    #[arg(default_value = "tests", value_name = "DIR")]
    tests_root: PathBuf,
}

/// Outcome of one data file (or of a schema that failed to load)
struct CaseResult {
    test_dir: String,
    data_file: String,
    passed: bool,
    detail: String,
}

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    match run() {
        Ok(failed) => {
            if failed > 0 {
                process::exit(1);
            }
        }
        Err(error) => {
            eprintln!("Error: {:#}", error);
            process::exit(1);
        }
    }
}

fn run() -> Result<usize> {
    let args = Args::parse();
    if !args.tests_root.is_dir() {
        bail!(
            "tests directory does not exist: {}",
            args.tests_root.display()
        );
    }

    let keywords = demo_keywords();

    let mut test_dirs: Vec<PathBuf> = fs::read_dir(&args.tests_root)
        .with_context(|| format!("failed to list {}", args.tests_root.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_dir())
        .collect();
    test_dirs.sort();

    let mut results = Vec::new();
    for dir in &test_dirs {
        results.extend(run_test_directory(dir, &keywords));
    }

    Ok(report(&results))
}

/// One demonstration custom keyword, so extension-keyword schemas exercise
/// the registration path: `"dividedBy": {"operator": N}` demands an exact
/// multiple of N.
fn demo_keywords() -> KeywordRegistry {
    let mut keywords = KeywordRegistry::new();
    keywords.register("dividedBy", |rules, value| {
        let Some(number) = value.as_f64() else {
            return Err("value is not a number".to_string());
        };
        let divisor = rules
            .as_object()
            .and_then(|rules| rules.get("operator"))
            .and_then(Value::as_i64)
            .ok_or_else(|| {
                "schema is wrong: expected \"dividedBy\": {\"operator\": number}".to_string()
            })?;
        if divisor != 0 && number % divisor as f64 == 0.0 {
            Ok(())
        } else {
            Err(format!("value {number} is not a multiple of {divisor}"))
        }
    });
    keywords
}

/// Load a case's `main.json` and check both data directories against it
fn run_test_directory(dir: &Path, keywords: &KeywordRegistry) -> Vec<CaseResult> {
    let test_dir = dir
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    let schema_path = dir.join("main.json");
    let schema = CompiledSchema::from_file(&schema_path.to_string_lossy(), keywords);
    if !schema.is_valid() {
        return vec![CaseResult {
            test_dir,
            data_file: "main.json".to_string(),
            passed: false,
            detail: "schema failed to load".to_string(),
        }];
    }

    let mut results = check_data_directory(&schema, &test_dir, &dir.join("data_success"), true);
    results.extend(check_data_directory(
        &schema,
        &test_dir,
        &dir.join("data_fail"),
        false,
    ));
    results
}

fn check_data_directory(
    schema: &CompiledSchema,
    test_dir: &str,
    data_dir: &Path,
    expect_pass: bool,
) -> Vec<CaseResult> {
    let Ok(entries) = fs::read_dir(data_dir) else {
        // A missing data directory simply contributes no cases
        return Vec::new();
    };

    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
        .collect();
    files.sort();

    let mut results = Vec::new();
    for file in files {
        let data_file = file
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        let value = match load_json(&file) {
            Ok(value) => value,
            Err(error) => {
                results.push(CaseResult {
                    test_dir: test_dir.to_string(),
                    data_file,
                    passed: false,
                    detail: format!("{error:#}"),
                });
                continue;
            }
        };

        let outcome = schema.validate(&value);
        let (passed, detail) = match (&outcome, expect_pass) {
            (Ok(()), true) | (Err(_), false) => (true, String::new()),
            (Ok(()), false) => (
                false,
                format!("'{data_file}' was accepted but was expected to fail"),
            ),
            (Err(error), true) => (
                false,
                format!("'{data_file}' was rejected but was expected to pass: {error}"),
            ),
        };
        results.push(CaseResult {
            test_dir: test_dir.to_string(),
            data_file,
            passed,
            detail,
        });
    }
    results
}

fn load_json(path: &Path) -> Result<Value> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("failed to parse {}", path.display()))
}

/// Print per-failure detail lines and the global summary; returns the number
/// of failed cases
fn report(results: &[CaseResult]) -> usize {
    let mut passed = 0;
    let mut failed = 0;
    for result in results {
        if result.passed {
            passed += 1;
        } else {
            failed += 1;
            println!(
                "[FAIL] - test: '{}' | file: '{}' | {}",
                result.test_dir,
                result.data_file,
                if result.detail.is_empty() {
                    "(unspecified)"
                } else {
                    result.detail.as_str()
                }
            );
        }
    }

    println!();
    println!("----- Summary -----");
    println!("passed: {passed}");
    println!("failed: {failed}");
    println!("-------------------");
    failed
}
