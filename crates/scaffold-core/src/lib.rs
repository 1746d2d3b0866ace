//! Core library for the scaffold tool.
//!
//! Turns a zip template archive into a ready-to-use project directory in four
//! sequential stages, driven by [`pipeline::run`]:
//!
//! 1. [`fetch`]: download the archive to a temp file
//! 2. [`extract`]: unpack it, keeping paths and file modes
//! 3. [`templates`]: render every extracted file in place against the
//!    [`project::ProjectConfig`]
//! 4. [`finalize`]: rename the tree after the module's last path segment
//!
//! Every stage reports failures through [`error::ScaffoldError`]; the first
//! error stops the run.

pub mod config;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod finalize;
pub mod pipeline;
pub mod project;
pub mod templates;
