// src/merge.rs

use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};

use tempfile::NamedTempFile;
use tracing::{debug, info, instrument};

use crate::config::BranchConfig;
use crate::error::{Error, Result};
use crate::items::BranchItems;

const NEWLINE: &str = "\n";

fn io_err(path: &Path) -> impl FnOnce(std::io::Error) -> Error + '_ {
    move |source| Error::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Everything before the first occurrence of `sentinel`, or `None` if it never occurs.
pub fn split_preserved<'a>(content: &'a str, sentinel: &str) -> Option<&'a str> {
    content.split_once(sentinel).map(|(before, _)| before)
}

/// Read `path` and return its hand-written part.
pub fn read_preserved(path: &Path, sentinel: &str) -> Result<String> {
    let content = fs::read_to_string(path).map_err(io_err(path))?;
    split_preserved(&content, sentinel)
        .map(str::to_owned)
        .ok_or_else(|| Error::MissingSentinel {
            path: path.to_path_buf(),
            sentinel: sentinel.to_string(),
        })
}

/// One guarded Lua block for a branch.
pub fn render_block(branch: &BranchConfig, table: &str, items: &BranchItems) -> String {
    let mut out = String::new();
    out.push_str(branch.guard.opening_line());
    out.push_str(NEWLINE);
    out.push_str(&format!("\t{} = {{{}", table, NEWLINE));
    for line in items.lines() {
        out.push_str(&line);
    }
    out.push_str(&format!("\t}}{}", NEWLINE));
    out.push_str(&format!("end{}", NEWLINE));
    out
}

/// Preserved prefix, sentinel line, then the blocks in order.
pub fn render_document(preserved: &str, sentinel: &str, blocks: &[String]) -> String {
    let mut out = String::with_capacity(
        preserved.len() + sentinel.len() + blocks.iter().map(String::len).sum::<usize>() + 1,
    );
    out.push_str(preserved);
    out.push_str(sentinel);
    out.push_str(NEWLINE);
    for block in blocks {
        out.push_str(block);
    }
    out
}

/// Replace `path` with `contents` through a temp file in the same directory.
/// Either the old file or the complete new one is on disk, never a partial write.
pub fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let dir: PathBuf = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };

    let mut tmp = NamedTempFile::new_in(&dir).map_err(io_err(&dir))?;
    tmp.write_all(contents.as_bytes()).map_err(io_err(tmp.path()))?;
    tmp.as_file().sync_all().map_err(io_err(tmp.path()))?;

    // keep the mode of the file being replaced
    if let Ok(meta) = fs::metadata(path) {
        tmp.as_file()
            .set_permissions(meta.permissions())
            .map_err(io_err(path))?;
    }

    tmp.persist(path).map_err(|e| Error::Io {
        path: path.to_path_buf(),
        source: e.error,
    })?;
    debug!(path = %path.display(), bytes = contents.len(), "replaced");
    Ok(())
}

/// Rewrite `path` as its preserved part, the sentinel line, and `blocks`.
/// Fails without touching the file when the sentinel is missing.
#[instrument(level = "info", skip(path, blocks), fields(path = %path.display()))]
pub fn merge(path: &Path, sentinel: &str, blocks: &[String]) -> Result<()> {
    let preserved = read_preserved(path, sentinel)?;
    let document = render_document(&preserved, sentinel, blocks);
    write_atomic(path, &document)?;
    info!(
        preserved = preserved.len(),
        generated = document.len() - preserved.len(),
        "wrote output"
    );
    Ok(())
}
