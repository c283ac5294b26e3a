pub mod client;
pub mod error;
pub mod models;
mod trait_impl;


pub use client::{Auth, GitHubClient, DEFAULT_API_URL};
pub use error::{GitHubError, Result};
pub use models::*;
pub use trait_impl::GitHubRepository;

// Re-export labels-core types for convenience
pub use labels_core::{LabelHost, LabelRepository, SyncError};
