//! # Types CLI — List catalog declarations.

use std::io::Write;

use anyhow::Result;
use clap::Args;
use serpens_schema::SchemaCatalog;

use crate::CatalogArgs;

/// Arguments for `serpens types`.
#[derive(Args, Debug)]
pub struct TypesArgs {
    #[command(flatten)]
    pub catalog: CatalogArgs,
}

/// Execute `serpens types`.
pub fn run_types(args: &TypesArgs) -> Result<u8> {
    let catalog = args.catalog.open()?;
    let stdout = std::io::stdout();
    write_types(&catalog, &mut stdout.lock())?;
    Ok(0)
}

pub(crate) fn write_types(catalog: &SchemaCatalog, out: &mut dyn Write) -> Result<()> {
    for e in catalog.enums() {
        let members: Vec<&str> = e.member_names().collect();
        writeln!(out, "enum {}: {}", e.name(), members.join(", "))?;
    }
    for r in catalog.records() {
        writeln!(out, "record {}", r.name())?;
        for f in r.fields() {
            let marker = if f.is_required() { "" } else { " (optional)" };
            writeln!(out, "  {}: {}{marker}", f.name(), f.declared_type())?;
        }
    }
    Ok(())
}
