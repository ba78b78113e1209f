//! Domain layer: pure parsing, validation and command construction.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All functions are synchronous and take data in, returning data out.

pub mod compose;
pub mod config;
pub mod deploy;
pub mod envfile;
pub mod error;
pub mod exec;
pub mod inspect;
pub mod inventory;
pub mod lines;
pub mod project;
pub mod stats;
pub mod system;
pub mod validate;

pub use config::{ConnectionParams, DockhandConfig, SshSettings};
pub use error::{CommandError, ConfigError, ConnectionError, NotFoundError, ValidationError};
pub use exec::ExecResult;
