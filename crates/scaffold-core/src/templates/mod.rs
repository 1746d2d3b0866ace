//! Template system for project scaffolding.
//!
//! Files extracted from the template archive are rendered in place by
//! [`renderer::render`]; [`tree::render_tree`] walks the extracted directory
//! and applies it to every regular file.
//!
//! ## Template variables
//!
//! Placeholders are Go `text/template` field actions. Exactly three fields
//! are bound, all case-sensitive:
//! - `{{.BinFile}}`: name of the compiled binary (e.g., `blog`)
//! - `{{.Module}}`: module identifier (e.g., `github.com/acme/blog`)
//! - `{{.EnvironmentVariablesPrefix}}`: upper-cased env prefix (e.g., `APP`)
//!
//! Any other field fails the render, and any other action is a syntax error.

pub mod renderer;
pub mod tree;
