//! Output formatting for CLI commands.

use serde::{Deserialize, Serialize};

use crate::cli::args::{OutputFormat, TermsmithArgs};
use crate::error::Result;
use crate::term::classify::ValueKind;
use crate::term::encoder::TermValue;

/// Result structure for the encode command.
#[derive(Debug, Serialize)]
pub struct EncodeResult {
    pub kind: ValueKind,
    pub length: usize,
    pub term: String,
    pub value: TermValue,
}

/// One term of a converted entry.
#[derive(Debug, Serialize)]
pub struct TermOutput {
    pub field_id: u32,
    pub field: String,
    pub term: String,
    pub value: TermValue,
}

/// One committed entry.
#[derive(Debug, Serialize)]
pub struct EntryOutput {
    pub line: usize,
    pub boost: f32,
    pub terms: Vec<TermOutput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stored: Option<serde_json::Value>,
}

/// A document that failed to convert.
#[derive(Debug, Serialize, Deserialize)]
pub struct ConversionFailure {
    pub line: usize,
    pub error: String,
}

/// Result structure for the convert command.
#[derive(Debug, Default, Serialize)]
pub struct ConversionReport {
    pub documents: usize,
    pub committed: usize,
    pub skipped: usize,
    pub failed: usize,
    pub duration_ms: u64,
    pub entries: Vec<EntryOutput>,
    pub failures: Vec<ConversionFailure>,
}

/// Lower-case hex form of a term.
pub fn to_hex(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        out.push_str(&format!("{byte:02x}"));
    }
    out
}

/// Output a result in the specified format.
pub fn output_result<T: Serialize>(message: &str, result: &T, args: &TermsmithArgs) -> Result<()> {
    match args.output_format {
        OutputFormat::Human => output_human(message, result, args),
        OutputFormat::Json => output_json(result, args),
    }
}

/// Output in human-readable format.
fn output_human<T: Serialize>(message: &str, result: &T, args: &TermsmithArgs) -> Result<()> {
    if args.verbosity() > 0 {
        println!("{message}");
        println!();
    }

    let value = serde_json::to_value(result)?;

    match result {
        _ if std::any::type_name::<T>().contains("ConversionReport") => {
            output_conversion_report_human(&value, args)
        }
        _ => output_generic_human(&value, args),
    }
}

/// Output a conversion report in human format.
fn output_conversion_report_human(value: &serde_json::Value, args: &TermsmithArgs) -> Result<()> {
    let count = |key: &str| value.get(key).and_then(|v| v.as_u64()).unwrap_or(0);
    println!("Documents: {}", count("documents"));
    println!("Committed: {}", count("committed"));
    println!("Skipped:   {}", count("skipped"));
    println!("Failed:    {}", count("failed"));
    println!("Duration:  {}ms", count("duration_ms"));

    if args.verbosity() > 1
        && let Some(entries) = value.get("entries").and_then(|e| e.as_array())
    {
        for entry in entries {
            println!();
            println!(
                "Line {} (boost {})",
                format_value(&entry["line"]),
                format_value(&entry["boost"])
            );
            if let Some(terms) = entry.get("terms").and_then(|t| t.as_array()) {
                for term in terms {
                    println!(
                        "  {:>4} {:<20} {}",
                        format_value(&term["field_id"]),
                        format_value(&term["field"]),
                        format_value(&term["term"])
                    );
                }
            }
            if let Some(stored) = entry.get("stored") {
                println!("  stored: {stored}");
            }
        }
    }

    if let Some(failures) = value.get("failures").and_then(|f| f.as_array())
        && !failures.is_empty()
    {
        println!();
        println!("Failures:");
        for failure in failures {
            println!(
                "  line {}: {}",
                format_value(&failure["line"]),
                format_value(&failure["error"])
            );
        }
    }
    Ok(())
}

/// Output generic data in human format.
fn output_generic_human(value: &serde_json::Value, _args: &TermsmithArgs) -> Result<()> {
    match value {
        serde_json::Value::Object(obj) => {
            for (key, val) in obj {
                let formatted_val = format_value(val);
                println!("{key}: {formatted_val}");
            }
        }
        _ => {
            let formatted_value = format_value(value);
            println!("{formatted_value}");
        }
    }
    Ok(())
}

/// Output in JSON format.
fn output_json<T: Serialize>(result: &T, args: &TermsmithArgs) -> Result<()> {
    let json = if args.pretty {
        serde_json::to_string_pretty(result)?
    } else {
        serde_json::to_string(result)?
    };

    println!("{json}");
    Ok(())
}

fn format_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Null => "-".to_string(),
        other => other.to_string(),
    }
}
