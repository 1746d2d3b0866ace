use std::fmt;
use std::path::PathBuf;

use crate::config::PipelineConfig;
use crate::error::Result;
use crate::extract::{self, ExtractedTree, ExtractionSummary};
use crate::fetch::ArchiveFetcher;
use crate::finalize::{self, FinalizeOutcome};
use crate::project::ProjectConfig;
use crate::templates::tree::{self, RenderReport};

/// Pipeline stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Fetch,
    Extract,
    Render,
    Finalize,
}

impl Stage {
    pub const ALL: [Stage; 4] = [Stage::Fetch, Stage::Extract, Stage::Render, Stage::Finalize];

    /// 1-based position for `[n/4]` progress output.
    pub fn number(self) -> u32 {
        match self {
            Self::Fetch => 1,
            Self::Extract => 2,
            Self::Render => 3,
            Self::Finalize => 4,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Fetch => "Downloading template archive",
            Self::Extract => "Extracting archive",
            Self::Render => "Rendering templates",
            Self::Finalize => "Renaming project directory",
        };
        f.write_str(text)
    }
}

/// Receives stage notifications, e.g. to drive terminal output.
pub trait StageObserver {
    fn stage_started(&self, _stage: Stage) {}
    fn stage_finished(&self, _stage: Stage) {}
}

/// Observer that ignores every notification.
pub struct NoopObserver;

impl StageObserver for NoopObserver {}

/// Result of a successful run.
#[derive(Debug, Clone)]
pub struct ScaffoldOutcome {
    /// Size of the downloaded archive.
    pub archive_bytes: u64,
    /// Downloaded archive, when `keep_archive` was set.
    pub kept_archive: Option<PathBuf>,
    pub extraction: ExtractionSummary,
    pub render: RenderReport,
    pub finalize: FinalizeOutcome,
}

impl ScaffoldOutcome {
    pub fn project_dir(&self) -> &std::path::Path {
        self.finalize.project_dir()
    }
}

/// Fetch, extract, render and finalize, in that order.
///
/// Each stage must succeed before the next starts; the first error is
/// returned as is and nothing is cleaned up. Only the final rename is
/// allowed to fail, which is reported through [`FinalizeOutcome::Skipped`].
pub fn run(
    config: &PipelineConfig,
    project: &ProjectConfig,
    fetcher: &dyn ArchiveFetcher,
    observer: &dyn StageObserver,
) -> Result<ScaffoldOutcome> {
    // Stage 1: fetch
    observer.stage_started(Stage::Fetch);
    let archive = fetcher.fetch(&config.template_url)?;
    let archive_bytes = archive.size_bytes();
    observer.stage_finished(Stage::Fetch);

    // Stage 2: extract
    observer.stage_started(Stage::Extract);
    let extraction = extract::extract(archive.path(), &config.output_dir)?;
    let kept_archive = if config.keep_archive {
        let path = archive.keep()?;
        tracing::info!("kept template archive at {}", path.display());
        Some(path)
    } else {
        drop(archive);
        None
    };
    let tree = ExtractedTree::locate(config.extracted_root())?;
    observer.stage_finished(Stage::Extract);

    // Stage 3: render
    observer.stage_started(Stage::Render);
    let render = tree::render_tree(tree.root(), project)?;
    observer.stage_finished(Stage::Render);

    // Stage 4: finalize
    observer.stage_started(Stage::Finalize);
    let finalize = finalize::finalize(tree, &config.output_dir, project.module());
    observer.stage_finished(Stage::Finalize);

    Ok(ScaffoldOutcome {
        archive_bytes,
        kept_archive,
        extraction,
        render,
        finalize,
    })
}
