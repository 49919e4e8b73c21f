//! End-to-end runs: fetched records in, enriched records and rendered
//! artifacts out. Records are processed sequentially.

pub mod annual_report;
pub mod current_report;
pub mod insider;

use std::path::PathBuf;

/// Files written by a presentation step.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunArtifacts {
    pub files: Vec<PathBuf>,
}

impl RunArtifacts {
    pub fn push(&mut self, path: PathBuf) {
        self.files.push(path);
    }
}
