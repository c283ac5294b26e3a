pub mod error;
pub mod executor;
pub mod models;
pub mod pagination;
pub mod reconcile;
pub mod snapshot;
pub mod traits;

pub use error::{Result, SyncError};
pub use executor::{Applier, DumpRecorder, RemoteApplier, SyncExecutor, SyncMode};
pub use models::*;
pub use pagination::{fetch_all_pages, DEFAULT_PAGE_SIZE};
pub use reconcile::{bad, missing, reconcile, wrong, Reconciliation};
pub use traits::{LabelHost, LabelRepository};
