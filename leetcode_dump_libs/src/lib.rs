pub mod archiver;
pub mod catalog;
pub mod context;
pub mod counter;
pub mod language;
pub mod pool;
pub mod site;
pub mod stats;

#[cfg(test)]
mod testing;

pub use archiver::{Outcome, SubmissionArchiver};
pub use catalog::{Catalog, CatalogBuilder};
pub use context::RunContext;
pub use counter::AtomicCounter;
pub use pool::WorkerPool;
pub use site::{Region, SiteAdapter, SiteError};
pub use stats::{Ledger, RunStats, RunSummary, Warning};
