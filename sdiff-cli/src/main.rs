//! Structural XML Diff Tool CLI
//!
//! Compares two XML documents by structure rather than text: sibling order
//! is ignored, and each difference is reported as Added, Removed or
//! Modified with its source line numbers.

use std::collections::HashSet;
use std::fs::File;
use std::io::{self, BufWriter, Write};

use clap::Parser;
use xml_structdiff::xml::printer::element_snippet;
use xml_structdiff::{diff_elements, DiffOptions, EditOp, NodeEdit, XmlParser};

/// Structural XML Diff Tool
#[derive(Parser)]
#[command(name = "sdiff")]
#[command(version)]
#[command(about = "Structural XML diff tool", long_about = None)]
struct Cli {
    /// Expected (old) XML file
    expected: String,

    /// Actual (new) XML file
    actual: String,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<String>,

    /// Suppress added/removed reports for elements without content
    #[arg(long)]
    exclude_empty: bool,

    /// Element local names to leave out of the comparison
    #[arg(short, long, value_name = "NAME")]
    ignore: Vec<String>,
}

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("Parsing expected: {}", cli.expected);
    let expected = XmlParser::parse_file(&cli.expected)?;

    eprintln!("Parsing actual: {}", cli.actual);
    let actual = XmlParser::parse_file(&cli.actual)?;

    let mut options = DiffOptions::new().exclude_empty_nodes(cli.exclude_empty);
    if !cli.ignore.is_empty() {
        let ignored: HashSet<String> = cli.ignore.iter().cloned().collect();
        options = options.with_filter(move |el| !ignored.contains(el.local_name()));
    }

    eprintln!("Comparing...");
    let edits = diff_elements(&expected, &actual, &options);

    let mut output: Box<dyn Write> = match &cli.output {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(io::stdout()),
    };

    for edit in &edits {
        write_edit(&mut output, edit)?;
    }
    output.flush()?;

    eprintln!("{} difference(s).", edits.len());
    Ok(())
}

/// Writes one edit as a single line with its source positions.
fn write_edit<W: Write>(writer: &mut W, edit: &NodeEdit) -> io::Result<()> {
    match edit.op {
        EditOp::Added => {
            let element = edit.actual.as_ref().expect("added edit has an actual");
            writeln!(
                writer,
                "Added    {} (actual line {})",
                element_snippet(element),
                edit.actual_line()
            )
        }
        EditOp::Removed => {
            let element = edit.expected.as_ref().expect("removed edit has an expected");
            writeln!(
                writer,
                "Removed  {} (expected line {})",
                element_snippet(element),
                edit.expected_line()
            )
        }
        EditOp::Modified => {
            let expected = edit.expected.as_ref().expect("modified edit has an expected");
            let actual = edit.actual.as_ref().expect("modified edit has an actual");
            writeln!(
                writer,
                "Modified {} -> {} (expected line {}, actual line {})",
                element_snippet(expected),
                element_snippet(actual),
                edit.expected_line(),
                edit.actual_line()
            )
        }
    }
}
