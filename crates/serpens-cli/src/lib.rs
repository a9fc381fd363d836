//! # serpens-cli — Command-Line Front End for the Schema Engine
//!
//! Provides the `serpens` binary. Record types come from a catalog document
//! (see [`serpens_schema::SchemaCatalog`]); input documents are plain JSON.
//!
//! ## Subcommands
//!
//! - `serpens load` — load a JSON document and print its canonical dump.
//! - `serpens check` — report `ok` or every validation message.
//! - `serpens types` — list the enums and records a catalog declares.
//!
//! ```bash
//! serpens load --catalog staff.yaml --record EmployeeSchema employee.json
//! serpens check --catalog staff.yaml --record EmployeeSchema --many staff.json
//! SERPENS_CATALOG=staff.yaml serpens types
//! ```

pub mod check;
pub mod load;
pub mod types;

use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use serde_json::Value;
use serpens_schema::{RecordType, SchemaCatalog};

/// Catalog selection shared by every subcommand.
#[derive(Args, Debug, Clone)]
pub struct CatalogArgs {
    /// Catalog document declaring enums and records (.yaml, .yml or .json).
    #[arg(long, env = "SERPENS_CATALOG")]
    pub catalog: PathBuf,
}

impl CatalogArgs {
    /// Read and parse the catalog document.
    pub fn open(&self) -> Result<SchemaCatalog> {
        let catalog = SchemaCatalog::from_path(&self.catalog)
            .with_context(|| format!("failed to load catalog {}", self.catalog.display()))?;
        tracing::info!(
            catalog = %self.catalog.display(),
            enums = catalog.enums().len(),
            records = catalog.records().len(),
            "loaded catalog"
        );
        Ok(catalog)
    }
}

/// Look up a record type, listing the declared names when it is missing.
pub fn find_record(catalog: &SchemaCatalog, name: &str) -> Result<Arc<RecordType>> {
    catalog.record(name).cloned().ok_or_else(|| {
        let available = catalog
            .records()
            .iter()
            .map(|r| r.name().to_string())
            .collect::<Vec<_>>()
            .join(", ");
        anyhow::anyhow!("record type '{name}' is not declared. Available: {available}")
    })
}

/// Read a JSON input document. `-` reads standard input.
pub fn read_input(path: &Path) -> Result<Value> {
    let text = if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read standard input")?;
        buf
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("failed to read input {}", path.display()))?
    };
    serde_json::from_str(&text)
        .with_context(|| format!("input {} is not valid JSON", path.display()))
}
