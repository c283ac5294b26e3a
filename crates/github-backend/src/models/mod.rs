pub mod label;
pub mod repo;

pub use label::*;
pub use repo::*;
