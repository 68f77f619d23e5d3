//! Kin command
//!
//! Usage: famgraph kin <FILE> <PERSON_ID> [--json]

use clap::Args;
use famgraph_core::queries::kinship::{
    children_of, declared_siblings_of, parents_of, siblings_of, spouses_of,
};
use famgraph_core::Person;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct KinArgs {
    /// Export document to read
    pub file: PathBuf,

    /// Person to describe
    pub person_id: String,

    /// Print JSON instead of text
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct KinEntry {
    id: String,
    name: String,
}

#[derive(Debug, Serialize)]
struct KinReport {
    person: KinEntry,
    parents: Vec<KinEntry>,
    children: Vec<KinEntry>,
    spouses: Vec<KinEntry>,
    siblings: Vec<KinEntry>,
    declared_siblings: Vec<KinEntry>,
}

fn entry(person: &Person) -> KinEntry {
    KinEntry {
        id: person.id.clone(),
        name: person.full_name_with_maiden(),
    }
}

fn entries(persons: Vec<&Person>) -> Vec<KinEntry> {
    persons.into_iter().map(entry).collect()
}

/// Execute kin command
pub fn execute(args: KinArgs) -> Result<(), Box<dyn std::error::Error>> {
    let doc = super::load_document(&args.file)?;
    let snapshot = doc.to_snapshot();

    let person = snapshot
        .person(&args.person_id)
        .ok_or_else(|| format!("person '{}' not found", args.person_id))?;

    let report = KinReport {
        person: entry(person),
        parents: entries(parents_of(&snapshot, &person.id)),
        children: entries(children_of(&snapshot, &person.id)),
        spouses: entries(spouses_of(&snapshot, &person.id)),
        siblings: entries(siblings_of(&snapshot, &person.id)),
        declared_siblings: entries(declared_siblings_of(&snapshot, &person.id)),
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("{} ({})", report.person.name, report.person.id);
    for (label, list) in [
        ("Parents", &report.parents),
        ("Children", &report.children),
        ("Spouses", &report.spouses),
        ("Siblings", &report.siblings),
        ("Declared siblings", &report.declared_siblings),
    ] {
        let names: Vec<String> = list
            .iter()
            .map(|k| format!("{} ({})", k.name, k.id))
            .collect();
        if names.is_empty() {
            println!("  {}: -", label);
        } else {
            println!("  {}: {}", label, names.join(", "));
        }
    }

    Ok(())
}
