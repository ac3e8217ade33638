use std::io::{self, BufRead, Write};

use serde_json::{json, Value};

use crate::cli::OutputFormat;

/// Output a success message in the appropriate format
pub fn output_success(output_format: &OutputFormat, message: &str, data: Option<Value>) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": true,
                "message": message
            });

            if let (Some(target), Some(Value::Object(extra))) = (response.as_object_mut(), data) {
                target.extend(extra);
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
        }
    }
    Ok(())
}

/// Output an error message in the appropriate format
pub fn output_error(output_format: &OutputFormat, message: &str, error_code: Option<&str>) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": false,
                "error": message
            });

            if let Some(code) = error_code {
                response["error_code"] = json!(code);
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            eprintln!("Error: {}", message);
        }
    }
    Ok(())
}

/// Print a value as JSON, or as `key: value` lines for text output.
pub fn output_record(output_format: &OutputFormat, title: &str, record: &Value) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(record)?),
        OutputFormat::Text => {
            println!("{}", title);
            if let Some(map) = record.as_object() {
                for (key, value) in map {
                    match value {
                        Value::String(s) => println!("  {}: {}", key, s),
                        Value::Null => {}
                        other => println!("  {}: {}", key, other),
                    }
                }
            } else {
                println!("  {}", record);
            }
        }
    }
    Ok(())
}

/// Print labelled counts, e.g. appointment stats.
pub fn output_counts(output_format: &OutputFormat, title: &str, counts: &Value) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(counts)?),
        OutputFormat::Text => {
            println!("{}", title);
            if let Some(map) = counts.as_object() {
                let width = map.keys().map(|k| k.len()).max().unwrap_or(0);
                for (key, value) in map {
                    println!("  {:width$}  {}", key, value, width = width);
                }
            }
        }
    }
    Ok(())
}

/// Read one line from stdin after printing `label`.
pub fn prompt(label: &str) -> anyhow::Result<String> {
    print!("{}: ", label);
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}
