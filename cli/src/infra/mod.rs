//! Infrastructure layer: concrete implementations of application port traits.
//!
//! This module contains all I/O-performing code: the ssh transport, the
//! configuration file and the manual project store.
//!
//! Imports from `crate::domain` and `crate::application` are allowed.
//! Imports from `crate::commands` or `crate::output` are forbidden.

pub mod config;
pub mod project_store;
pub mod ssh;
