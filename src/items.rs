// src/items.rs
use csv::{ReaderBuilder, StringRecord};
use tracing::{info, instrument, warn};

use crate::config::{BranchConfig, Config};
use crate::error::{Error, Result};

/// An item flagged as not disenchantable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemEntry {
    pub id: String,
    pub name: String,
}

impl ItemEntry {
    /// Lua table entry, name as a trailing comment.
    pub fn to_line(&self) -> String {
        format!("\t\t[{}] = true, -- {}\n", self.id, self.name)
    }
}

/// Matches for one branch, in export order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchItems {
    pub branch: String,
    pub entries: Vec<ItemEntry>,
}

impl BranchItems {
    pub fn count(&self) -> usize {
        self.entries.len()
    }

    pub fn lines(&self) -> impl Iterator<Item = String> + '_ {
        self.entries.iter().map(ItemEntry::to_line)
    }
}

fn field<'r>(
    record: &'r StringRecord,
    column: usize,
    branch: &BranchConfig,
) -> Result<&'r str> {
    record.get(column).ok_or_else(|| Error::ShortRecord {
        branch: branch.name.clone(),
        line: record.position().map(|p| p.line()).unwrap_or(0),
        len: record.len(),
        column,
    })
}

/// Keep the records whose flag column is exactly the configured flag value.
///
/// There is no header handling: a header row is read as data and simply doesn't match.
/// The comparison is on text, so `0x8000`, `032768` or `32768 ` are not matches.
#[instrument(level = "info", skip(csv_text, config, branch), fields(branch = %branch.name))]
pub fn filter_items(csv_text: &str, branch: &BranchConfig, config: &Config) -> Result<BranchItems> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(csv_text.as_bytes());

    let mut entries = Vec::new();
    let mut records = 0usize;
    for result in rdr.records() {
        let record = result.map_err(|source| Error::Csv {
            branch: branch.name.clone(),
            source,
        })?;
        records += 1;

        if field(&record, branch.flag_column, branch)? != config.flag_value {
            continue;
        }
        entries.push(ItemEntry {
            id: field(&record, config.id_column, branch)?.to_string(),
            name: field(&record, config.name_column, branch)?.to_string(),
        });
    }

    if entries.is_empty() {
        warn!(
            records,
            column = branch.flag_column,
            "no items matched; the flag column may have moved"
        );
    }
    info!(records, items = entries.len(), "found items");

    Ok(BranchItems {
        branch: branch.name.clone(),
        entries,
    })
}
