//! Regenerates the enchanting "cannot be disenchanted" item tables in `LibProcessable.lua`
//! from the current itemsparse exports of each tracked game branch.

pub mod builds;
pub mod config;
pub mod error;
pub mod fetch;
pub mod items;
pub mod merge;
pub mod pipeline;

pub use config::{BranchConfig, Config, Guard};
pub use error::{Error, Result};
pub use pipeline::{run, RunSummary};
