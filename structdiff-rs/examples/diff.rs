//! Example: structurally diff two XML documents
//!
//! Usage: cargo run --example diff <expected.xml> <actual.xml>

use std::env;

use xml_structdiff::xml::printer::element_snippet;
use xml_structdiff::{diff_files, DiffOptions, EditOp};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    if args.len() != 3 {
        eprintln!("Usage: {} <expected.xml> <actual.xml>", args[0]);
        std::process::exit(1);
    }

    let edits = diff_files(&args[1], &args[2], &DiffOptions::default())?;

    for edit in &edits {
        match edit.op {
            EditOp::Added => {
                let element = edit.actual.as_ref().expect("added edit has an actual");
                println!("Added    {}", element_snippet(element));
            }
            EditOp::Removed => {
                let element = edit.expected.as_ref().expect("removed edit has an expected");
                println!("Removed  {}", element_snippet(element));
            }
            EditOp::Modified => {
                let expected = edit.expected.as_ref().expect("modified edit has an expected");
                let actual = edit.actual.as_ref().expect("modified edit has an actual");
                println!(
                    "Modified {} -> {}",
                    element_snippet(expected),
                    element_snippet(actual)
                );
            }
        }
    }

    eprintln!("{} difference(s).", edits.len());
    Ok(())
}
