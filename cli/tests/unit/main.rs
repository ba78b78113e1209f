//! Unit tests for the dockhand CLI
//!
//! These tests drive the application services through an in-memory
//! `RemoteExecutor` and run fast without ssh or docker.

mod architecture;
mod container_service;
mod deploy_service;
mod mocks;
mod project_service;
