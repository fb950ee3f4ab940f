//! Development server for JinPress.
//!
//! Serves the built site over HTTP with live reload:
//! - a file watcher records changes to relevant project files,
//! - changes are debounced into a single rebuild, run off the async
//!   runtime via `spawn_blocking`,
//! - served HTML pages get a polling script injected that asks
//!   `/__livereload__/check` whether a newer build exists and reloads
//!   the page when it does.
//!
//! All responses carry no-cache headers so the browser always sees the
//! latest build output.

mod app;
mod debounce;
mod reload;
mod state;
mod static_files;
mod watcher;

use std::net::SocketAddr;
use std::sync::Arc;

use jinpress_site::Builder;
use state::AppState;
use tokio::net::TcpListener;

/// How many consecutive ports to try when the requested one is busy.
const MAX_PORT_ATTEMPTS: u16 = 10;

/// Dev server options.
#[derive(Clone, Debug)]
pub struct ServeOptions {
    /// Host address to bind to.
    pub host: String,
    /// First port to try.
    pub port: u16,
    /// Open the site in the default browser after binding.
    pub open_browser: bool,
}

impl Default for ServeOptions {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 8000,
            open_browser: false,
        }
    }
}

/// Dev server errors.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// The initial full build failed; there is nothing to serve.
    #[error("Initial build failed: {0}")]
    InitialBuild(String),
    /// File watcher could not be started.
    #[error("File watcher error: {0}")]
    Watch(#[from] notify::Error),
    /// No bindable port in the probed range.
    #[error("No available port in range {start}-{end}")]
    NoAvailablePort { start: u16, end: u16 },
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Runs the dev server until Ctrl-C.
///
/// Performs an initial clean build (fatal on failure), starts the file
/// watcher and rebuild loop, then serves the output directory.
pub async fn run_server(builder: Arc<Builder>, options: ServeOptions) -> Result<(), ServerError> {
    let result = builder.build(true);
    if !result.success {
        return Err(ServerError::InitialBuild(result.errors.join("; ")));
    }
    for warning in &result.warnings {
        tracing::warn!(warning = %warning, "build warning");
    }
    tracing::info!(
        pages = result.pages_built,
        elapsed_ms = result.duration_ms,
        "initial build complete"
    );

    let state = Arc::new(AppState::new(builder.output_dir().to_path_buf()));

    // The watcher must stay alive for the lifetime of the server.
    let _watcher = watcher::start(Arc::clone(&builder), Arc::clone(&state))?;

    let (listener, addr) = bind_available_port(&options.host, options.port).await?;
    let app = app::create_router(state);

    let url = format!("http://{addr}/");
    tracing::info!(%url, "serving site");

    if options.open_browser
        && let Err(err) = open::that(&url)
    {
        tracing::warn!(%err, "failed to open browser");
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Binds the first free port starting at `port`, probing a bounded
/// number of successors when it is taken.
async fn bind_available_port(
    host: &str,
    port: u16,
) -> Result<(TcpListener, SocketAddr), ServerError> {
    for offset in 0..MAX_PORT_ATTEMPTS {
        let Some(candidate) = port.checked_add(offset) else {
            break;
        };
        match TcpListener::bind((host, candidate)).await {
            Ok(listener) => {
                let addr = listener.local_addr()?;
                if offset > 0 {
                    tracing::warn!(
                        requested = port,
                        bound = candidate,
                        "requested port busy, using next free port"
                    );
                }
                return Ok((listener, addr));
            }
            Err(err) if err.kind() == std::io::ErrorKind::AddrInUse => {}
            Err(err) => return Err(err.into()),
        }
    }
    Err(ServerError::NoAvailablePort {
        start: port,
        end: port.saturating_add(MAX_PORT_ATTEMPTS - 1),
    })
}

/// Wait for shutdown signal (Ctrl-C).
async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
    tracing::info!("Shutdown signal received, stopping server...");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_bind_probes_past_busy_port() {
        let first = TcpListener::bind(("127.0.0.1", 0)).await.unwrap();
        let busy_port = first.local_addr().unwrap().port();

        let (listener, addr) = bind_available_port("127.0.0.1", busy_port).await.unwrap();
        assert_ne!(addr.port(), busy_port);
        assert!(addr.port() > busy_port);
        drop(listener);
    }
}
