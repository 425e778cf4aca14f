// src/error.rs

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("could not build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("GET {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("GET {url} returned {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("body of {url} is not valid UTF-8: {source}")]
    Decode {
        url: String,
        #[source]
        source: std::string::FromUtf8Error,
    },

    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("no element with id {id:?} in the builds page")]
    MissingTable { id: String },

    #[error("builds table has {cells} cells, not a multiple of {row_len}")]
    RaggedTable { cells: usize, row_len: usize },

    #[error("builds table row {row} has no text in cell {cell}")]
    EmptyCell { row: usize, cell: usize },

    #[error("builds table row {row} ({branch}) is the last row, no minor version follows it")]
    MissingMinor { branch: String, row: usize },

    #[error("no build found for branch {branch}")]
    UnresolvedBranch { branch: String },

    #[error("CSV parse error in {branch} export: {source}")]
    Csv {
        branch: String,
        #[source]
        source: csv::Error,
    },

    #[error("{branch} export line {line} has {len} fields, column {column} is needed")]
    ShortRecord {
        branch: String,
        line: u64,
        len: usize,
        column: usize,
    },

    #[error("sentinel {sentinel:?} not found in {path}")]
    MissingSentinel { path: PathBuf, sentinel: String },

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;
