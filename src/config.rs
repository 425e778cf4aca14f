// src/config.rs

use std::{path::PathBuf, time::Duration};

use url::Url;

/// Opening line of a branch block in the generated Lua.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Guard {
    /// `if not CLASSIC then`
    NotClassic,
    /// `if CLASSIC then`
    Classic,
}

impl Guard {
    pub fn opening_line(self) -> &'static str {
        match self {
            Guard::NotClassic => "if not CLASSIC then",
            Guard::Classic => "if CLASSIC then",
        }
    }
}

/// A tracked game branch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchConfig {
    /// Label as it appears in the builds table.
    pub name: String,
    /// 0-based index of the Flags[0] column in this branch's itemsparse export.
    /// Has to be bumped by hand whenever the upstream schema gains columns.
    pub flag_column: usize,
    pub guard: Guard,
}

/// Everything a run needs. Built once, then only borrowed.
#[derive(Debug, Clone)]
pub struct Config {
    pub base_url: Url,
    pub builds_path: String,
    /// `id` attribute of the builds listing table.
    pub build_table_id: String,
    /// Name of the exported database table.
    pub export_table: String,
    pub user_agent: String,
    pub timeout: Duration,
    pub id_column: usize,
    pub name_column: usize,
    /// 0x8000 in Flags[0] marks an item as not disenchantable.
    pub flag_value: String,
    pub sentinel: String,
    pub output_path: PathBuf,
    /// Lua table the generated entries are assigned to.
    pub output_table: String,
    /// Processed in this order; blocks are written in this order too.
    pub branches: Vec<BranchConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: Url::parse("https://wow.tools/").expect("default base URL should parse"),
            builds_path: "builds".into(),
            build_table_id: "buildtable".into(),
            export_table: "itemsparse".into(),
            user_agent: "libprocessable".into(),
            timeout: Duration::from_secs(120),
            id_column: 0,
            name_column: 6,
            flag_value: "32768".into(),
            sentinel: "-- DO NOT REMOVE THIS LINE".into(),
            output_path: PathBuf::from("LibProcessable.lua"),
            output_table: "data.enchantingInvalidItems".into(),
            // Classic Era has no complete itemsparse export, so it is not tracked.
            branches: vec![
                BranchConfig {
                    name: "Retail".into(),
                    flag_column: 44,
                    guard: Guard::NotClassic,
                },
                BranchConfig {
                    name: "Classic".into(),
                    flag_column: 41,
                    guard: Guard::Classic,
                },
            ],
        }
    }
}

impl Config {
    pub fn branch(&self, name: &str) -> Option<&BranchConfig> {
        self.branches.iter().find(|b| b.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_track_retail_then_classic() {
        let config = Config::default();
        let names: Vec<_> = config.branches.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, ["Retail", "Classic"]);
        assert_eq!(config.branch("Retail").unwrap().flag_column, 44);
        assert_eq!(config.branch("Classic").unwrap().guard, Guard::Classic);
        assert!(config.branch("Classic Era").is_none());
        assert_eq!(config.sentinel, "-- DO NOT REMOVE THIS LINE");
    }
}
