//! File watching and the rebuild loop.

use std::ffi::OsStr;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use jinpress_site::Builder;
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::debounce::RebuildDebouncer;
use crate::state::AppState;

/// Quiet window before a rebuild fires.
const DEBOUNCE_MS: u64 = 300;

/// How often the rebuild loop checks the debouncer.
const POLL_INTERVAL_MS: u64 = 50;

/// Extensions that affect the built site.
const RELEVANT_EXTENSIONS: &[&str] = &["md", "yml", "yaml", "html", "css", "js"];

/// Starts the watcher and rebuild loop.
///
/// Returns the watcher handle, which must be kept alive for watching
/// to continue. Rebuilds run via `spawn_blocking` and are awaited in
/// the poll loop, so at most one rebuild runs at a time; a failing
/// rebuild is logged and the previous output stays served.
pub(crate) fn start(
    builder: Arc<Builder>,
    state: Arc<AppState>,
) -> Result<RecommendedWatcher, notify::Error> {
    let (tx, mut rx) = mpsc::channel::<Event>(100);

    // Callback runs on the notify thread; blocking_send is fine there.
    let mut watcher = notify::recommended_watcher(move |res: Result<Event, notify::Error>| {
        if let Ok(event) = res {
            let _ = tx.blocking_send(event);
        }
    })?;

    for (root, mode) in watch_roots(&builder) {
        if root.exists() {
            watcher.watch(&root, mode)?;
            tracing::debug!(path = %root.display(), "watching");
        }
    }

    let debouncer = Arc::new(RebuildDebouncer::new(Duration::from_millis(DEBOUNCE_MS)));

    let recorder = Arc::clone(&debouncer);
    let project_root = builder.project_root().to_path_buf();
    let output_dir = builder.output_dir().to_path_buf();
    tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            if !matches!(
                event.kind,
                EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
            ) {
                continue;
            }
            if event
                .paths
                .iter()
                .any(|path| is_relevant(path, &project_root, &output_dir))
            {
                recorder.record();
            }
        }
    });

    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_millis(POLL_INTERVAL_MS));
        loop {
            interval.tick().await;
            if !debouncer.take_ready() {
                continue;
            }
            tracing::info!("change detected, rebuilding");
            let build = Arc::clone(&builder);
            match tokio::task::spawn_blocking(move || build.build(false)).await {
                Ok(result) => {
                    state.mark_rebuilt();
                    if result.success {
                        tracing::info!(
                            pages = result.pages_built,
                            elapsed_ms = result.duration_ms,
                            "rebuild complete"
                        );
                    } else {
                        tracing::error!(
                            errors = ?result.errors,
                            "rebuild failed, serving previous output"
                        );
                    }
                    for warning in &result.warnings {
                        tracing::warn!(warning = %warning, "rebuild warning");
                    }
                }
                Err(err) => tracing::error!(%err, "rebuild task failed"),
            }
        }
    });

    Ok(watcher)
}

/// Project paths worth watching: content, static files, templates,
/// and the directory holding the config file.
///
/// Editors replace files on save, which breaks file-level watches.
/// Watching the config file's parent directory (non-recursively)
/// survives the replace.
fn watch_roots(builder: &Builder) -> Vec<(PathBuf, RecursiveMode)> {
    let mut roots = vec![
        (builder.docs_dir().to_path_buf(), RecursiveMode::Recursive),
        (builder.static_dir().to_path_buf(), RecursiveMode::Recursive),
        (
            builder.project_root().join("templates"),
            RecursiveMode::Recursive,
        ),
    ];
    if let Some(parent) = builder
        .config()
        .config_path
        .as_deref()
        .and_then(Path::parent)
    {
        roots.push((parent.to_path_buf(), RecursiveMode::NonRecursive));
    }
    roots
}

/// Whether a changed path should trigger a rebuild.
///
/// Output-directory changes are ignored (our own writes), as are
/// hidden files and irrelevant extensions.
fn is_relevant(path: &Path, project_root: &Path, output_dir: &Path) -> bool {
    if path.starts_with(output_dir) {
        return false;
    }
    let relative = path.strip_prefix(project_root).unwrap_or(path);
    let hidden = relative.components().any(|component| {
        matches!(component, Component::Normal(name) if name.to_string_lossy().starts_with('.'))
    });
    if hidden {
        return false;
    }
    path.extension()
        .and_then(OsStr::to_str)
        .is_some_and(|ext| {
            RELEVANT_EXTENSIONS
                .iter()
                .any(|relevant| ext.eq_ignore_ascii_case(relevant))
        })
}
