//! Command-line argument parsing.

use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};

const USAGE: &str =
    "usage: qh-preview <doc-file> [--row N] [--height N] [--max-lines N] [--markdown]";

/// What to preview and on which simulated screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewArgs {
    pub doc_file: PathBuf,
    /// Screen row of the cursor.
    pub row: usize,
    /// Height of the viewport in rows.
    pub height: usize,
    /// Overrides `popup.max_lines` from the config file.
    pub max_lines: Option<usize>,
    /// Render markdown markup as plain text.
    pub markdown: bool,
}

/// Parse the process arguments.
pub fn parse_args() -> Result<PreviewArgs> {
    parse(std::env::args().skip(1))
}

fn parse(args: impl IntoIterator<Item = String>) -> Result<PreviewArgs> {
    let mut doc_file = None;
    let mut row = 10;
    let mut height = 80;
    let mut max_lines = None;
    let mut markdown = false;

    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--row" => row = parse_number(&arg, args.next())?,
            "--height" => height = parse_number(&arg, args.next())?,
            "--max-lines" => max_lines = Some(parse_number(&arg, args.next())?),
            "--markdown" => markdown = true,
            "-h" | "--help" => bail!(USAGE),
            flag if flag.starts_with("--") => bail!("unknown option {flag}\n{USAGE}"),
            path => {
                if doc_file.is_some() {
                    bail!("only one documentation file can be previewed\n{USAGE}");
                }
                doc_file = Some(PathBuf::from(path));
            }
        }
    }

    Ok(PreviewArgs {
        doc_file: doc_file.ok_or_else(|| anyhow!(USAGE))?,
        row,
        height,
        max_lines,
        markdown,
    })
}

fn parse_number(flag: &str, value: Option<String>) -> Result<usize> {
    let value = value.with_context(|| format!("{flag} needs a value"))?;
    value
        .parse()
        .with_context(|| format!("{flag} expects a number, got {value:?}"))
}
