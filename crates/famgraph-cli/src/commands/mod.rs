pub mod check;
pub mod generations;
pub mod import_check;
pub mod kin;
pub mod layout;
pub mod validate;

use famgraph_core::exchange::{parse_document, ExportDocument};
use std::path::{Path, PathBuf};

/// Read and decode an export document
pub fn load_document(path: &Path) -> Result<ExportDocument, Box<dyn std::error::Error>> {
    let json = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read {}: {}", path.display(), e))?;
    let doc = parse_document(&json)?;
    tracing::debug!(
        path = %path.display(),
        persons = doc.data.persons.len(),
        relationships = doc.data.relationships.len(),
        "loaded document"
    );
    Ok(doc)
}

/// Write to the file if given, otherwise to stdout
pub fn emit(output: Option<&PathBuf>, text: &str) -> Result<(), Box<dyn std::error::Error>> {
    match output {
        Some(path) => {
            std::fs::write(path, text)?;
            eprintln!("✓ Written to {}", path.display());
        }
        None => println!("{}", text),
    }
    Ok(())
}
