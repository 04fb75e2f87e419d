//! Cooperative shutdown and the serve loop with a bounded grace period.

use std::time::Duration;

use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio::task::JoinError;

use telemetry_core::error::{Result, TelemetryError};

/// Process-wide cancellation signal.
///
/// Cloned into every long-running task. Sync code polls
/// [`Shutdown::is_triggered`]; async code awaits [`Shutdown::wait`].
#[derive(Clone)]
pub struct Shutdown {
    tx: watch::Sender<bool>,
    rx: watch::Receiver<bool>,
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, rx) = watch::channel(false);
        Self { tx, rx }
    }

    pub fn trigger(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_triggered(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolves once [`Shutdown::trigger`] has been called (immediately if it already was).
    pub async fn wait(&self) {
        let mut rx = self.rx.clone();
        // Err means every sender is gone, which only happens after trigger.
        let _ = rx.wait_for(|triggered| *triggered).await;
    }
}

/// Bind `listen` or fail with a startup error.
pub async fn bind(listen: &str) -> Result<TcpListener> {
    TcpListener::bind(listen)
        .await
        .map_err(|e| TelemetryError::Startup(format!("bind {listen} failed: {e}")))
}

/// Serve `app` until `shutdown` fires, then give in-flight requests up to
/// `grace` to finish before abandoning them.
pub async fn serve(listener: TcpListener, app: Router, shutdown: Shutdown, grace: Duration) -> Result<()> {
    let drain = shutdown.clone();
    let mut server = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async move { drain.wait().await })
            .await
    });

    tokio::select! {
        res = &mut server => return flatten(res),
        _ = shutdown.wait() => {}
    }

    match tokio::time::timeout(grace, server).await {
        Ok(res) => {
            flatten(res)?;
            tracing::info!("http server drained");
            Ok(())
        }
        Err(_) => {
            tracing::warn!(grace_ms = grace.as_millis() as u64, "grace period elapsed, abandoning in-flight requests");
            Ok(())
        }
    }
}

fn flatten(res: std::result::Result<std::io::Result<()>, JoinError>) -> Result<()> {
    match res {
        Ok(Ok(())) => Ok(()),
        Ok(Err(e)) => Err(TelemetryError::Startup(format!("server failed: {e}"))),
        Err(e) => Err(TelemetryError::Startup(format!("server task failed: {e}"))),
    }
}

/// Resolves on SIGINT or SIGTERM.
pub async fn signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("signal received, starting graceful shutdown");
}

/// Trigger `shutdown` when the process receives a termination signal.
pub fn trigger_on_signal(shutdown: Shutdown) {
    tokio::spawn(async move {
        signal().await;
        shutdown.trigger();
    });
}
