//! scaffold CLI: create a new project from a zip template archive.
//!
//! `scaffold new` asks for the module identifier, binary name and
//! environment-variable prefix, downloads the template archive, extracts it,
//! renders every file against those values and renames the result after the
//! module's last path segment.
//!
//! The work itself is done by [`scaffold_core::pipeline::run`].

mod commands;
mod output;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "scaffold",
    about = "Scaffold a new project from a zip template archive",
    version,
    propagate_version = true
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new project from the template archive
    New(commands::new::NewArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::New(args) => commands::new::run(&args)?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_parse_new_with_flags() {
        let cli = Cli::try_parse_from([
            "scaffold",
            "-vv",
            "new",
            "--module",
            "github.com/acme/blog",
            "--bin",
            "blog",
            "--env-prefix",
            "app",
            "--output-dir",
            "/work",
            "--keep-archive",
            "--timeout",
            "10",
            "-y",
        ])
        .unwrap();

        assert_eq!(cli.verbose, 2);
        let Commands::New(args) = cli.command;
        assert_eq!(args.module.as_deref(), Some("github.com/acme/blog"));
        assert_eq!(args.bin_file.as_deref(), Some("blog"));
        assert_eq!(args.env_prefix.as_deref(), Some("app"));
        assert_eq!(args.output_dir, Some(PathBuf::from("/work")));
        assert!(args.keep_archive);
        assert_eq!(args.timeout, Some(10));
        assert!(args.yes);
    }

    #[test]
    fn test_parse_requires_subcommand() {
        assert!(Cli::try_parse_from(["scaffold"]).is_err());
    }
}
