// src/pipeline.rs

use std::path::PathBuf;
use std::time::Instant;

use tracing::{info, instrument};

use crate::builds;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::fetch::{export::fetch_export, PageSource};
use crate::items::{filter_items, BranchItems};
use crate::merge;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchSummary {
    pub branch: String,
    pub build: String,
    pub items: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub output: PathBuf,
    pub branches: Vec<BranchSummary>,
}

/// Scrape builds, download and filter each branch's export, rewrite the output file.
///
/// Every check that can fail runs before the output file is written, and the file is
/// only replaced once all branches have been generated.
#[instrument(level = "info", skip_all, fields(output = %config.output_path.display()))]
pub fn run(config: &Config, source: &impl PageSource) -> Result<RunSummary> {
    let start = Instant::now();

    // 1) the output file has to be mergeable before we download anything
    merge::read_preserved(&config.output_path, &config.sentinel)?;

    // 2) resolve builds
    info!("scraping builds page");
    let page = source.get(&config.builds_path)?;
    let found = builds::resolve(config, &page)?;

    let mut resolved = Vec::with_capacity(config.branches.len());
    for branch in &config.branches {
        let build = found
            .get(&branch.name)
            .cloned()
            .ok_or_else(|| Error::UnresolvedBranch {
                branch: branch.name.clone(),
            })?;
        resolved.push((branch, build));
    }

    // 3) export + filter, one branch after another
    let mut blocks = Vec::with_capacity(resolved.len());
    let mut summaries = Vec::with_capacity(resolved.len());
    for (branch, build) in resolved {
        info!(branch = %branch.name, %build, "downloading {}", config.export_table);
        let csv = fetch_export(source, &config.export_table, &build)?;

        info!(branch = %branch.name, "parsing {}", config.export_table);
        let items: BranchItems = filter_items(&csv, branch, config)?;

        blocks.push(merge::render_block(branch, &config.output_table, &items));
        summaries.push(BranchSummary {
            branch: branch.name.clone(),
            build,
            items: items.count(),
        });
    }

    // 4) write once, everything generated
    merge::merge(&config.output_path, &config.sentinel, &blocks)?;
    info!(elapsed = ?start.elapsed(), "done");

    Ok(RunSummary {
        output: config.output_path.clone(),
        branches: summaries,
    })
}
