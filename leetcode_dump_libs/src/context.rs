use crate::{
    pool::WorkerPool,
    site::{Region, SiteAdapter},
    stats::{Ledger, RunStats},
};
use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

/// Everything the tasks of one invocation share.
pub struct RunContext {
    pub site: Arc<dyn SiteAdapter>,
    pub pool: WorkerPool,
    pub stats: RunStats,
    pub ledger: Ledger,
    pub dump_dir: PathBuf,
}

impl RunContext {
    pub fn new(site: Arc<dyn SiteAdapter>, threads: usize, dump_dir: &Path) -> Self {
        Self {
            site,
            pool: WorkerPool::new(threads),
            stats: RunStats::default(),
            ledger: Ledger::default(),
            dump_dir: dump_dir.to_path_buf(),
        }
    }

    pub fn region(&self) -> Region {
        self.site.region()
    }
}
