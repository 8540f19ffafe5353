//! Watch mode
//!
//! A `notify` watcher forwards relevant file system events over an unbounded
//! channel. A single consumer loop owns the pipeline: it never starts a run
//! while another is in flight, and every event that arrives during a run or
//! inside the debounce window folds into one follow-up run.

use crate::core::config_file::PipelineConfig;
use crate::core::errors::{error_chain, ForgeResult};
use crate::pipeline::sources::{self, WatchTarget};
use crate::pipeline::generate;
use notify::event::EventKind;
use notify::{Event, RecommendedWatcher, RecursiveMode, Watcher};
use std::future::Future;
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

/// A change to one or more source files
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceChange {
    pub paths: Vec<PathBuf>,
}

/// Outcome counters for a watch session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WatchStats {
    pub runs: usize,
    pub failures: usize,
}

fn is_content_change(kind: &EventKind) -> bool {
    matches!(
        kind,
        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
    )
}

/// Keep only events that touch a file matching the source pattern
pub fn relevant_change(event: &Event, pattern: &glob::Pattern) -> Option<SourceChange> {
    if !is_content_change(&event.kind) {
        return None;
    }
    let paths: Vec<PathBuf> = event
        .paths
        .iter()
        .filter(|path| sources::matches_pattern(pattern, path))
        .cloned()
        .collect();
    (!paths.is_empty()).then_some(SourceChange { paths })
}

/// Serialize and coalesce runs triggered by incoming changes
///
/// Returns when the channel closes or `shutdown` resolves. Shutdown is
/// observed between runs, never during one.
pub async fn run_serialized<F, Fut, S>(
    mut changes: mpsc::UnboundedReceiver<SourceChange>,
    debounce: Duration,
    mut run: F,
    shutdown: S,
) -> WatchStats
where
    F: FnMut() -> Fut,
    Fut: Future<Output = ForgeResult<()>>,
    S: Future<Output = ()>,
{
    tokio::pin!(shutdown);
    let mut stats = WatchStats::default();

    loop {
        let first = tokio::select! {
            biased;
            _ = &mut shutdown => break,
            change = changes.recv() => change,
        };
        let Some(first) = first else {
            break;
        };
        debug!("Change detected: {:?}", first.paths);

        // wait until the sources have been quiet for the debounce window
        let mut coalesced = 0;
        while let Ok(Some(change)) = tokio::time::timeout(debounce, changes.recv()).await {
            debug!("Coalescing change: {:?}", change.paths);
            coalesced += 1;
        }
        if coalesced > 0 {
            debug!("Coalesced {} additional changes into one run", coalesced);
        }

        stats.runs += 1;
        if let Err(e) = run().await {
            stats.failures += 1;
            error!("Icon font generation failed: {}", error_chain(&e));
        }
    }

    stats
}

/// Start a file watcher that forwards relevant changes under `target`
pub fn start_watcher(
    target: &WatchTarget,
    tx: mpsc::UnboundedSender<SourceChange>,
) -> ForgeResult<RecommendedWatcher> {
    let pattern = target.pattern.clone();
    let mut watcher = notify::recommended_watcher(move |result: notify::Result<Event>| {
        match result {
            Ok(event) => {
                if let Some(change) = relevant_change(&event, &pattern) {
                    // the receiver is gone only when watch mode is shutting down
                    let _ = tx.send(change);
                }
            }
            Err(e) => warn!("File watcher error: {}", e),
        }
    })?;

    let mode = if target.recursive {
        RecursiveMode::Recursive
    } else {
        RecursiveMode::NonRecursive
    };
    watcher.watch(&target.root, mode)?;
    debug!("Watching {} ({:?})", target.root.display(), mode);
    Ok(watcher)
}

/// Regenerate whenever a source file changes, until Ctrl-C
pub async fn watch(config: &PipelineConfig) -> ForgeResult<()> {
    let target = sources::watch_target(&config.source_pattern, &std::env::current_dir()?)?;
    let (tx, rx) = mpsc::unbounded_channel();
    let watcher = start_watcher(&target, tx)?;
    info!(
        "Watching {} for changes to {} (Ctrl-C to stop)",
        target.root.display(),
        config.source_pattern
    );

    let run_once = move || async move {
        let report = generate(config).await?;
        info!("{}", report.summary());
        Ok::<(), anyhow::Error>(())
    };

    // bring the outputs up to date before waiting for changes
    if let Err(e) = run_once().await {
        error!("Icon font generation failed: {}", error_chain(&e));
    }

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Unable to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };
    let stats = run_serialized(rx, config.debounce, run_once, shutdown).await;

    drop(watcher);
    info!(
        "Stopped watching after {} runs ({} failed)",
        stats.runs, stats.failures
    );
    Ok(())
}
