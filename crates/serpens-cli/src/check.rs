//! # Check CLI — Validate a JSON document against a record type.
//!
//! Prints `ok` when the input loads, otherwise one line per problem and
//! exits with status 1. With `--many`, every list item is checked and each
//! message is prefixed with the item index.

use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use serde_json::Value;

use crate::{find_record, read_input, CatalogArgs};

/// Arguments for `serpens check`.
#[derive(Args, Debug)]
pub struct CheckArgs {
    #[command(flatten)]
    pub catalog: CatalogArgs,

    /// Record type to check the input against.
    #[arg(long)]
    pub record: String,

    /// The input is a list of records.
    #[arg(long)]
    pub many: bool,

    /// JSON input file, or `-` for standard input.
    pub input: PathBuf,
}

/// Execute `serpens check`.
pub fn run_check(args: &CheckArgs) -> Result<u8> {
    let stdout = std::io::stdout();
    write_check(args, &mut stdout.lock())
}

pub(crate) fn write_check(args: &CheckArgs, out: &mut dyn Write) -> Result<u8> {
    let catalog = args.catalog.open()?;
    let record_type = find_record(&catalog, &args.record)?;
    let input = read_input(&args.input)?;

    let mut messages = Vec::new();
    if args.many {
        match &input {
            Value::Array(items) => {
                for (i, item) in items.iter().enumerate() {
                    if let Err(e) = record_type.load(item) {
                        messages.extend(e.messages().into_iter().map(|m| format!("[{i}] {m}")));
                    }
                }
            }
            other => {
                // Let the engine produce its usual shape error.
                if let Err(e) = record_type.load_many(other) {
                    messages.extend(e.messages());
                }
            }
        }
    } else if let Err(e) = record_type.load(&input) {
        messages.extend(e.messages());
    }

    if messages.is_empty() {
        writeln!(out, "ok")?;
        return Ok(0);
    }
    tracing::info!(record = record_type.name(), problems = messages.len(), "check failed");
    for m in &messages {
        writeln!(out, "{m}")?;
    }
    Ok(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::*;

    fn check(record: &str, input: &str, many: bool) -> (u8, String) {
        let dir = tempfile::tempdir().unwrap();
        let args = CheckArgs {
            catalog: CatalogArgs {
                catalog: write_temp(&dir, "catalog.yml", CATALOG_YAML),
            },
            record: record.to_string(),
            many,
            input: write_temp(&dir, "input.json", input),
        };
        let mut out = Vec::new();
        let code = write_check(&args, &mut out).unwrap();
        (code, String::from_utf8(out).unwrap())
    }

    #[test]
    fn check_ok() {
        let (code, out) = check("PersonSchema", r#"{"name": "A", "age": 1}"#, false);
        assert_eq!(code, 0);
        assert_eq!(out, "ok\n");
    }

    #[test]
    fn check_reports_every_missing_field() {
        let (code, out) = check("PersonSchema", "{}", false);
        assert_eq!(code, 1);
        assert_eq!(out, "'name' is a required field\n'age' is a required field\n");
    }

    #[test]
    fn check_reports_type_errors() {
        let (code, out) = check("PersonSchema", r#"{"name": 1, "age": "x"}"#, false);
        assert_eq!(code, 1);
        assert_eq!(out, "'name' must be of type str\n'age' must be of type int\n");
    }

    #[test]
    fn check_many_prefixes_item_index() {
        let (code, out) = check(
            "PersonSchema",
            r#"[{"name": "A", "age": 1}, {"name": "B"}]"#,
            true,
        );
        assert_eq!(code, 1);
        assert_eq!(out, "[1] 'age' is a required field\n");
    }

    #[test]
    fn check_many_rejects_mapping() {
        let (code, out) = check("PersonSchema", r#"{"name": "A", "age": 1}"#, true);
        assert_eq!(code, 1);
        assert_eq!(out, "PersonSchema expects a list, got dict\n");
    }

    #[test]
    fn check_invalid_enum_value() {
        let (code, out) = check(
            "EmployeeSchema",
            r#"{"person": {"name": "A", "age": 1}, "salary": 1, "level": "boss"}"#,
            false,
        );
        assert_eq!(code, 1);
        assert_eq!(out, "\"boss\" is not a valid Level\n");
    }
}
