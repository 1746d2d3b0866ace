use std::cell::RefCell;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;
use dialoguer::{Confirm, Input};
use indicatif::ProgressBar;

use scaffold_core::config::PipelineConfig;
use scaffold_core::error::ScaffoldError;
use scaffold_core::fetch;
use scaffold_core::pipeline::{self, Stage, StageObserver};
use scaffold_core::project::{self, ProjectConfig};

use crate::output;

/// Options of `scaffold new`.
#[derive(Args, Debug, Clone, Default)]
pub struct NewArgs {
    /// Module identifier, e.g. github.com/acme/blog (prompted if omitted)
    #[arg(long)]
    pub module: Option<String>,

    /// Name of the compiled binary, e.g. blog (prompted if omitted)
    #[arg(long = "bin")]
    pub bin_file: Option<String>,

    /// Environment variable prefix, e.g. APP (prompted if omitted)
    #[arg(long)]
    pub env_prefix: Option<String>,

    /// URL, file:// URL or path of the zip template
    #[arg(long, env = "SCAFFOLD_TEMPLATE_URL")]
    pub template_url: Option<String>,

    /// Top-level directory inside the template archive
    #[arg(long, env = "SCAFFOLD_ARCHIVE_ROOT")]
    pub archive_root: Option<String>,

    /// Directory to create the project in (default: current directory)
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// JSON file with template_url, archive_root, output_dir, keep_archive, timeout_secs
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Keep the downloaded archive in the temp directory
    #[arg(long)]
    pub keep_archive: bool,

    /// Download timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Do not ask for confirmation
    #[arg(short, long)]
    pub yes: bool,
}

/// Create a new project from the template archive.
///
/// Collects the project metadata (interactively for anything not passed as a
/// flag) before touching the network or the filesystem, then runs the
/// fetch/extract/render/finalize pipeline.
pub fn run(args: &NewArgs) -> Result<()> {
    output::print_header("scaffold new");

    let project = collect_project(args)?;
    output::print_project(&project);

    if !args.yes && !confirm()? {
        anyhow::bail!("aborted by user");
    }

    let config = resolve_config(args)?;
    tracing::debug!(?config, "resolved pipeline config");

    let fetcher = fetch::fetcher_for(
        &config.template_url,
        Duration::from_secs(config.timeout_secs),
        &std::env::temp_dir(),
    );
    let observer = CliObserver::new(&config.template_url);
    let outcome = pipeline::run(&config, &project, fetcher.as_ref(), &observer).map_err(report)?;
    drop(observer);

    output::print_outcome(&outcome);
    println!();
    println!("  Next steps:");
    println!("    cd {}", outcome.project_dir().display());
    println!();

    Ok(())
}

/// Gather the three project fields, prompting for the missing ones.
///
/// Each prompted answer is checked immediately, so an empty answer stops
/// the command before the next question.
fn collect_project(args: &NewArgs) -> Result<ProjectConfig> {
    let module = field(
        args.module.as_deref(),
        project::MODULE_FIELD,
        "Project module (e.g. github.com/jacexh/golang-ddd-template)",
    )?;
    let bin_file = field(
        args.bin_file.as_deref(),
        project::BIN_FILE_FIELD,
        "Binary file name (e.g. blog)",
    )?;
    let env_prefix = field(
        args.env_prefix.as_deref(),
        project::ENV_PREFIX_FIELD,
        "Environment variable prefix (e.g. APP)",
    )?;
    ProjectConfig::new(&module, &bin_file, &env_prefix).map_err(report)
}

fn field(given: Option<&str>, name: &'static str, prompt: &str) -> Result<String> {
    let raw = match given {
        Some(value) => value.to_string(),
        None => Input::<String>::new()
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()?,
    };
    project::require_field(name, &raw).map_err(report)
}

fn confirm() -> Result<bool> {
    Ok(Confirm::new()
        .with_prompt("Create the project with these settings?")
        .default(true)
        .interact()?)
}

/// Build the pipeline config: flag or env var, then config file, then default.
fn resolve_config(args: &NewArgs) -> Result<PipelineConfig> {
    let mut config = match &args.config {
        Some(path) => PipelineConfig::load(path)
            .with_context(|| format!("could not load {}", path.display()))?,
        None => PipelineConfig::default(),
    };

    if let Some(url) = &args.template_url {
        config.template_url = url.clone();
    }
    if let Some(root) = &args.archive_root {
        config.archive_root = root.clone();
    }
    if let Some(dir) = &args.output_dir {
        config.output_dir = dir.clone();
    }
    if args.keep_archive {
        config.keep_archive = true;
    }
    if let Some(timeout) = args.timeout {
        config.timeout_secs = timeout;
    }

    Ok(config)
}

/// Attach the failure category to the error message.
fn report(err: ScaffoldError) -> anyhow::Error {
    let kind = err.kind();
    anyhow::Error::new(err).context(format!("scaffolding failed ({kind} error)"))
}

/// Prints `[n/4]` steps and shows a spinner while downloading.
struct CliObserver {
    source: String,
    spinner: RefCell<Option<ProgressBar>>,
}

impl CliObserver {
    fn new(source: &str) -> Self {
        Self {
            source: source.to_string(),
            spinner: RefCell::new(None),
        }
    }

    fn clear_spinner(&self) {
        if let Some(bar) = self.spinner.borrow_mut().take() {
            bar.finish_and_clear();
        }
    }
}

impl StageObserver for CliObserver {
    fn stage_started(&self, stage: Stage) {
        output::print_step(stage.number(), Stage::ALL.len() as u32, &stage.to_string());
        if stage == Stage::Fetch {
            *self.spinner.borrow_mut() = Some(output::spinner(&self.source));
        }
    }

    fn stage_finished(&self, stage: Stage) {
        if stage == Stage::Fetch {
            self.clear_spinner();
        }
    }
}

impl Drop for CliObserver {
    fn drop(&mut self) {
        self.clear_spinner();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scaffold_core::error::ErrorKind;
    use std::fs;
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    fn write_template(path: &std::path::Path) {
        let mut zip = zip::ZipWriter::new(fs::File::create(path).unwrap());
        let options = SimpleFileOptions::default().unix_permissions(0o644);
        zip.add_directory("svc-template-main/", options).unwrap();
        zip.start_file("svc-template-main/go.mod", options).unwrap();
        zip.write_all(b"module {{.Module}}\n").unwrap();
        zip.start_file("svc-template-main/Makefile", options).unwrap();
        zip.write_all(b"BIN={{.BinFile}}\nPREFIX={{.EnvironmentVariablesPrefix}}\n")
            .unwrap();
        zip.finish().unwrap();
    }

    fn args(output_dir: &std::path::Path, template: &str) -> NewArgs {
        NewArgs {
            module: Some("github.com/acme/blog".into()),
            bin_file: Some("blog".into()),
            env_prefix: Some("app".into()),
            template_url: Some(template.into()),
            archive_root: Some("svc-template-main".into()),
            output_dir: Some(output_dir.to_path_buf()),
            yes: true,
            ..NewArgs::default()
        }
    }

    #[test]
    fn test_run_creates_project_from_local_template() {
        let dir = tempfile::tempdir().unwrap();
        let template = dir.path().join("template.zip");
        write_template(&template);
        let out = dir.path().join("out");
        fs::create_dir(&out).unwrap();

        run(&args(&out, &template.display().to_string())).unwrap();

        assert_eq!(
            fs::read_to_string(out.join("blog/go.mod")).unwrap(),
            "module github.com/acme/blog\n"
        );
        assert_eq!(
            fs::read_to_string(out.join("blog/Makefile")).unwrap(),
            "BIN=blog\nPREFIX=APP\n"
        );
    }

    #[test]
    fn test_run_rejects_empty_field_before_any_io() {
        let dir = tempfile::tempdir().unwrap();
        let mut args = args(dir.path(), "http://127.0.0.1:1/unreachable.zip");
        args.bin_file = Some("  \n".into());
        args.config = Some(dir.path().join("missing-config.json"));

        let err = run(&args).unwrap_err();

        let cause = err.downcast_ref::<ScaffoldError>().unwrap();
        assert_eq!(cause.kind(), ErrorKind::Input);
        // Neither the config file nor the network was consulted.
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_run_reports_error_category() {
        let dir = tempfile::tempdir().unwrap();
        let template = dir.path().join("template.zip");
        fs::write(&template, b"not a zip").unwrap();

        let err = run(&args(dir.path(), &template.display().to_string())).unwrap_err();

        assert!(err.to_string().contains("format error"));
        let cause = err.downcast_ref::<ScaffoldError>().unwrap();
        assert!(matches!(cause, ScaffoldError::InvalidArchive { .. }));
    }

    #[test]
    fn test_resolve_config_precedence() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scaffold.json");
        fs::write(
            &path,
            r#"{ "template_url": "file:///from/config.zip", "archive_root": "cfg-root", "timeout_secs": 9 }"#,
        )
        .unwrap();

        let args = NewArgs {
            config: Some(path),
            archive_root: Some("flag-root".into()),
            ..NewArgs::default()
        };
        let config = resolve_config(&args).unwrap();

        assert_eq!(config.template_url, "file:///from/config.zip");
        assert_eq!(config.archive_root, "flag-root");
        assert_eq!(config.timeout_secs, 9);
        assert_eq!(config.output_dir, PathBuf::from("."));
    }

    #[test]
    fn test_resolve_config_defaults() {
        let config = resolve_config(&NewArgs::default()).unwrap();
        assert_eq!(config, PipelineConfig::default());
    }
}
