//! Offline jobs run by the `maintenance` binary against the configured database.

pub mod backup;
pub mod repair_images;
pub mod seed;

use std::fmt;

pub use backup::{BackupReport, run_backup};
pub use repair_images::{RepairReport, normalize_image_url, run_repair_images};
pub use seed::{SeedReport, run_seed};

/// Per-table tally printed at the end of a job.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TableReport {
    pub inserted: usize,
    pub updated: usize,
    pub skipped: usize,
}

impl fmt::Display for TableReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} inserted, {} updated, {} unchanged",
            self.inserted, self.updated, self.skipped
        )
    }
}
