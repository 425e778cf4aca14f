// src/builds.rs

use std::collections::HashMap;

use scraper::{ElementRef, Html, Node, Selector};
use tracing::{debug, info, instrument};

use crate::config::{BranchConfig, Config};
use crate::error::{Error, Result};

/// Cells per row of the builds listing.
pub const ROW_LEN: usize = 9;

/// One row of the builds listing, reduced to the cells we read.
/// Layout is `[major][minor][<wrapper>branch</wrapper>]` followed by six unused cells.
/// Cells stay optional until a row is actually used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildListingRow {
    /// Text of the first cell.
    pub version: Option<String>,
    /// Text inside the wrapper element of the third cell.
    pub branch: Option<String>,
}

fn text_of(node: &Node) -> Option<String> {
    match node {
        Node::Text(text) => Some((**text).to_owned()),
        _ => None,
    }
}

/// Text that is the first child of `cell`.
fn cell_text(cell: ElementRef<'_>) -> Option<String> {
    text_of(cell.first_child()?.value())
}

/// Text that is the first child of the first child of `cell`, i.e. one wrapper deep.
fn wrapped_text(cell: ElementRef<'_>) -> Option<String> {
    let wrapper = cell.first_child()?;
    if !wrapper.value().is_element() {
        return None;
    }
    text_of(wrapper.first_child()?.value())
}

/// Flatten every `td` inside the element with id `table_id` and regroup them into rows.
pub fn parse_build_rows(html: &str, table_id: &str) -> Result<Vec<BuildListingRow>> {
    let doc = Html::parse_document(html);
    let by_id = Selector::parse(&format!(r#"[id="{}"]"#, table_id))
        .map_err(|e| Error::Config(format!("table id {:?}: {:?}", table_id, e)))?;

    let table = doc.select(&by_id).next().ok_or_else(|| Error::MissingTable {
        id: table_id.to_string(),
    })?;

    let cell_sel = Selector::parse("td").expect("td selector should parse");
    let cells: Vec<ElementRef<'_>> = table.select(&cell_sel).collect();
    if cells.len() % ROW_LEN != 0 {
        return Err(Error::RaggedTable {
            cells: cells.len(),
            row_len: ROW_LEN,
        });
    }
    debug!(cells = cells.len(), rows = cells.len() / ROW_LEN, "build table");

    Ok(cells
        .chunks(ROW_LEN)
        .map(|group| BuildListingRow {
            version: cell_text(group[0]),
            branch: wrapped_text(group[2]),
        })
        .collect())
}

fn version_at(rows: &[BuildListingRow], row: usize) -> Result<&str> {
    rows[row]
        .version
        .as_deref()
        .ok_or(Error::EmptyCell { row, cell: 0 })
}

/// Pick the first build listed for each tracked branch.
///
/// The minor half of a build string is the first cell of the *following* row, so a build
/// reads `{row.version}.{next_row.version}`. This mirrors how the listing page was scraped
/// historically; keep it in step with the live page rather than "correcting" it.
///
/// Only rows that resolve a branch (and the row after them) are required to be complete.
pub fn resolve_builds(
    rows: &[BuildListingRow],
    branches: &[BranchConfig],
) -> Result<HashMap<String, String>> {
    let mut builds: HashMap<String, String> = HashMap::new();

    for (idx, row) in rows.iter().enumerate() {
        let Some(label) = row.branch.as_deref() else {
            continue;
        };
        let tracked = branches.iter().any(|b| b.name == label);
        if !tracked || builds.contains_key(label) {
            continue;
        }

        if idx + 1 >= rows.len() {
            return Err(Error::MissingMinor {
                branch: label.to_string(),
                row: idx,
            });
        }
        let build = format!("{}.{}", version_at(rows, idx)?, version_at(rows, idx + 1)?);
        info!(branch = %label, %build, "found build");
        builds.insert(label.to_string(), build);
    }

    Ok(builds)
}

/// Parse the builds page and resolve every tracked branch.
#[instrument(level = "info", skip_all)]
pub fn resolve(config: &Config, html: &str) -> Result<HashMap<String, String>> {
    let rows = parse_build_rows(html, &config.build_table_id)?;
    resolve_builds(&rows, &config.branches)
}
