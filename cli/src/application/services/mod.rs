//! Application services: use-case orchestration.
//!
//! Each service module implements a use-case by composing domain logic with
//! port trait calls. Services import only from `crate::domain` and
//! `crate::application`, never from `crate::infra`, `crate::commands`, or
//! `crate::output`.

pub mod compose;
pub mod containers;
pub mod deploy;
pub mod projects;
pub mod system;

#[cfg(test)]
pub(crate) mod test_support;
