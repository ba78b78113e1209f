//! Command implementations

pub mod config;
pub mod containers;
pub mod deploy;
pub mod files;
pub mod projects;
pub mod system;
pub mod version;
