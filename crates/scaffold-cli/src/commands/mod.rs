//! CLI command implementations for scaffold.
//!
//! Each module corresponds to a subcommand (`scaffold <command>`).

pub mod new;
