//! Terminal output for the scaffold CLI.
//!
//! Colored status lines use the [`console`] crate; the download spinner uses
//! [`indicatif`].

use std::time::Duration;

use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use scaffold_core::finalize::FinalizeOutcome;
use scaffold_core::pipeline::ScaffoldOutcome;
use scaffold_core::project::ProjectConfig;

/// Print a bold cyan header with an underline separator.
pub fn print_header(text: &str) {
    println!("\n{}", style(text).bold().cyan());
    println!("{}", style("=".repeat(text.len())).dim());
}

/// Print a success message prefixed with green `[OK]`.
pub fn print_success(text: &str) {
    println!("{} {}", style("[OK]").green().bold(), text);
}

/// Print a warning message prefixed with yellow `[WARN]`.
pub fn print_warning(text: &str) {
    println!("{} {}", style("[WARN]").yellow().bold(), text);
}

/// Print a stage indicator like `[1/4] Downloading template archive...`.
pub fn print_step(step: u32, total: u32, text: &str) {
    println!("{} {}...", style(format!("[{step}/{total}]")).dim(), text);
}

/// Print a key-value pair with dimmed key formatting.
pub fn print_key_value(key: &str, value: &str) {
    println!("  {}: {}", style(key).dim(), value);
}

/// The collected project metadata, shown before confirmation.
pub fn print_project(project: &ProjectConfig) {
    print_key_value("Module", project.module());
    print_key_value("Binary", project.bin_file());
    print_key_value("Env prefix", project.env_prefix());
    print_key_value("Directory", project.project_name());
}

/// Summary after a successful run, including tolerated problems.
pub fn print_outcome(outcome: &ScaffoldOutcome) {
    for path in &outcome.render.skipped {
        print_warning(&format!("Left non-text file as is: {}", path.display()));
    }

    match &outcome.finalize {
        FinalizeOutcome::Renamed(dir) => {
            print_success(&format!("Project created at {}", dir.display()));
        }
        FinalizeOutcome::Skipped {
            left_at,
            target,
            reason,
        } => {
            print_warning(&format!(
                "Could not rename to {} ({reason})",
                target.display()
            ));
            print_success(&format!("Project created at {}", left_at.display()));
        }
    }

    print_key_value(
        "Files",
        &format!(
            "{} extracted, {} rendered",
            outcome.extraction.files,
            outcome.render.rendered.len()
        ),
    );
    print_key_value("Archive size", &format!("{} bytes", outcome.archive_bytes));
    if let Some(archive) = &outcome.kept_archive {
        print_key_value("Archive", &archive.display().to_string());
    }
}

/// A ticking spinner on stderr; indicatif hides it when stderr is not a terminal.
pub fn spinner(message: &str) -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("  {spinner:.cyan} {msg} [{elapsed}]") {
        bar.set_style(style);
    }
    bar.set_message(message.to_string());
    bar.enable_steady_tick(Duration::from_millis(100));
    bar
}
