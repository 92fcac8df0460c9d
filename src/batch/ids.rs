use std::fmt;
use std::path::{Path, PathBuf};

use crate::foundation::error::TwainResult;

/// Sequential batch number; its directory name is zero-padded to three digits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BatchId(pub u64);

impl BatchId {
    pub fn dir_name(self) -> String {
        self.to_string()
    }
}

impl fmt::Display for BatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:03}", self.0)
    }
}

/// Hands out strictly increasing batch ids.
pub trait BatchIdAllocator {
    fn next_id(&mut self) -> TwainResult<BatchId>;
}

/// Allocates ids after the highest all-digit directory name under `root`.
///
/// The directory is rescanned on every allocation, so ids stay ahead of folders created by other
/// runs in the meantime.
#[derive(Debug)]
pub struct DirBatchIds {
    root: PathBuf,
    next: u64,
}

impl DirBatchIds {
    pub fn scan(root: impl Into<PathBuf>) -> TwainResult<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;
        let next = highest_numbered_dir(&root)?.map_or(1, |n| n + 1);
        Ok(Self { root, next })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The id the next call to `next_id` would return, ignoring concurrent changes on disk.
    pub fn peek(&self) -> BatchId {
        BatchId(self.next)
    }
}

impl BatchIdAllocator for DirBatchIds {
    fn next_id(&mut self) -> TwainResult<BatchId> {
        if let Some(n) = highest_numbered_dir(&self.root)? {
            self.next = self.next.max(n + 1);
        }
        let id = BatchId(self.next);
        self.next += 1;
        Ok(id)
    }
}

/// Counter-backed allocator for tests and dry runs.
#[derive(Debug, Clone)]
pub struct InMemoryBatchIds {
    next: u64,
}

impl InMemoryBatchIds {
    pub fn starting_at(first: u64) -> Self {
        Self { next: first }
    }
}

impl Default for InMemoryBatchIds {
    fn default() -> Self {
        Self::starting_at(1)
    }
}

impl BatchIdAllocator for InMemoryBatchIds {
    fn next_id(&mut self) -> TwainResult<BatchId> {
        let id = BatchId(self.next);
        self.next += 1;
        Ok(id)
    }
}

fn highest_numbered_dir(root: &Path) -> TwainResult<Option<u64>> {
    let mut highest = None;
    for entry in std::fs::read_dir(root)? {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };
        if name.is_empty() || !name.bytes().all(|b| b.is_ascii_digit()) {
            continue;
        }
        if let Ok(n) = name.parse::<u64>() {
            highest = highest.max(Some(n));
        }
    }
    Ok(highest)
}

#[cfg(test)]
#[path = "../../tests/unit/batch/ids.rs"]
mod tests;
