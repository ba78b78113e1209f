pub mod project;
pub mod types;

pub use project::{Project, ProjectListing, ProjectSource, ProjectWithContainers};
pub use types::*;
