//! # Load CLI — Print the canonical dump of a JSON document.
//!
//! Loads the input through a catalog record type and writes the dump back
//! out, so special scalars come out normalised (UTC marker dropped, enum
//! values checked, decimals re-encoded).
//!
//! ```bash
//! serpens load --catalog staff.yaml --record EmployeeSchema employee.json
//! serpens load --catalog staff.yaml --record EmployeeSchema --many --decimal-as-string staff.json
//! ```

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use serde_json::Value;
use serpens_schema::dump::dump_many_with;
use serpens_schema::EncodeOptions;

use crate::{find_record, read_input, CatalogArgs};

/// Arguments for `serpens load`.
#[derive(Args, Debug)]
pub struct LoadArgs {
    #[command(flatten)]
    pub catalog: CatalogArgs,

    /// Record type to load the input as.
    #[arg(long)]
    pub record: String,

    /// The input is a list of records.
    #[arg(long)]
    pub many: bool,

    /// Emit decimals as exact strings instead of JSON numbers.
    #[arg(long)]
    pub decimal_as_string: bool,

    /// Pretty-print the output.
    #[arg(long)]
    pub pretty: bool,

    /// JSON input file, or `-` for standard input.
    pub input: PathBuf,
}

impl LoadArgs {
    fn encode_options(&self) -> EncodeOptions {
        if self.decimal_as_string {
            EncodeOptions::decimal_as_string()
        } else {
            EncodeOptions::default()
        }
    }
}

/// Execute `serpens load`.
pub fn run_load(args: &LoadArgs) -> Result<u8> {
    let stdout = std::io::stdout();
    write_load(args, &mut stdout.lock())
}

pub(crate) fn write_load(args: &LoadArgs, out: &mut dyn Write) -> Result<u8> {
    let catalog = args.catalog.open()?;
    let record_type = find_record(&catalog, &args.record)?;
    let input = read_input(&args.input)?;
    let opts = args.encode_options();

    let dumped: Value = if args.many {
        let records = record_type
            .load_many(&input)
            .with_context(|| format!("failed to load {} list", record_type.name()))?;
        tracing::debug!(count = records.len(), "loaded records");
        dump_many_with(&records, &opts)?
    } else {
        let record = record_type
            .load(&input)
            .with_context(|| format!("failed to load {}", record_type.name()))?;
        record.dump_with(&opts)?
    };

    let text = if args.pretty {
        serde_json::to_string_pretty(&dumped)?
    } else {
        serde_json::to_string(&dumped)?
    };
    writeln!(out, "{text}")?;
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::*;
    use serde_json::json;

    fn args(dir: &tempfile::TempDir, record: &str, input: &str) -> LoadArgs {
        LoadArgs {
            catalog: CatalogArgs {
                catalog: write_temp(dir, "catalog.yaml", CATALOG_YAML),
            },
            record: record.to_string(),
            many: false,
            decimal_as_string: false,
            pretty: false,
            input: write_temp(dir, "input.json", input),
        }
    }

    fn run(args: &LoadArgs) -> Value {
        let mut out = Vec::new();
        assert_eq!(write_load(args, &mut out).unwrap(), 0);
        serde_json::from_slice(&out).unwrap()
    }

    #[test]
    fn load_prints_canonical_dump() {
        let dir = tempfile::tempdir().unwrap();
        let a = args(
            &dir,
            "EmployeeSchema",
            r#"{"person": {"name": "John", "age": 30}, "salary": "6500.10", "level": "senior", "extra": 1}"#,
        );
        assert_eq!(
            run(&a),
            json!({
                "person": {"name": "John", "age": 30, "hobby": []},
                "salary": 6500.1,
                "level": "senior",
                "nickname": null
            })
        );
    }

    #[test]
    fn load_decimal_as_string() {
        let dir = tempfile::tempdir().unwrap();
        let mut a = args(
            &dir,
            "EmployeeSchema",
            r#"{"person": {"name": "John", "age": 30}, "salary": "6500.10", "level": "junior"}"#,
        );
        a.decimal_as_string = true;
        assert_eq!(run(&a)["salary"], json!("6500.10"));
    }

    #[test]
    fn load_many_preserves_order() {
        let dir = tempfile::tempdir().unwrap();
        let mut a = args(
            &dir,
            "PersonSchema",
            r#"[{"name": "A", "age": 1}, {"name": "B", "age": 2}]"#,
        );
        a.many = true;
        a.pretty = true;
        let v = run(&a);
        assert_eq!(v[0]["name"], json!("A"));
        assert_eq!(v[1]["name"], json!("B"));
    }

    #[test]
    fn load_reports_validation_errors() {
        let dir = tempfile::tempdir().unwrap();
        let a = args(&dir, "PersonSchema", r#"{"name": "A"}"#);
        let err = write_load(&a, &mut Vec::new()).unwrap_err();
        let text = format!("{err:#}");
        assert!(text.contains("failed to load PersonSchema"));
        assert!(text.contains("'age' is a required field"));
    }
}
