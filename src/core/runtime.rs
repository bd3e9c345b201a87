//! Main runtime orchestration.
//!
//! The runtime owns the selector handle shared with the dispatch layer. When
//! reload is enabled it polls the configuration file and swaps in a new
//! snapshot whenever the file's contents change. Invalid files are logged and
//! ignored until they change again; the previous snapshot keeps serving.

use crate::control::selector::ExecutionCluster;
use crate::control::snapshot::SelectorHandle;
use crate::core::config::Config;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;

/// Outcome of a single reload poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReloadOutcome {
    /// File contents unchanged since the last poll.
    Unchanged,
    /// A new snapshot was installed with this generation.
    Swapped(u64),
}

/// Runtime holding the selector handle and reload state.
pub struct Runtime {
    /// Configuration currently in effect.
    config: Config,

    /// Path the configuration was loaded from.
    config_path: PathBuf,

    /// Contents last seen at `config_path`, valid or not.
    last_content: Option<String>,

    /// Snapshot handle shared with callers.
    handle: Arc<SelectorHandle>,

    /// Shutdown signal sender.
    shutdown_tx: watch::Sender<bool>,

    /// Shutdown signal receiver.
    shutdown_rx: watch::Receiver<bool>,
}

impl Runtime {
    /// Create a runtime from an already validated configuration.
    ///
    /// The current contents of `config_path` become the reload baseline.
    pub fn new(config: Config, config_path: impl Into<PathBuf>) -> Result<Self> {
        let config_path = config_path.into();
        let handle = SelectorHandle::from_config(&config.execution, config.routing.hash_version)
            .with_context(|| "failed to build execution cluster selector")?;
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        Ok(Self {
            config,
            last_content: std::fs::read_to_string(&config_path).ok(),
            config_path,
            handle: Arc::new(handle),
            shutdown_tx,
            shutdown_rx,
        })
    }

    /// Load and validate the file at `path`, then build the runtime.
    pub fn from_file(path: &Path) -> Result<Self> {
        let config = Config::from_file(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?;
        Self::new(config, path)
    }

    /// Shared selector handle for the dispatch layer.
    pub fn handle(&self) -> Arc<SelectorHandle> {
        Arc::clone(&self.handle)
    }

    /// Configuration currently in effect.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Re-read the configuration file and swap if its contents changed.
    pub async fn reload_once(&mut self) -> Result<ReloadOutcome> {
        let content = tokio::fs::read_to_string(&self.config_path)
            .await
            .with_context(|| {
                format!("failed to read config file: {}", self.config_path.display())
            })?;

        if self.last_content.as_deref() == Some(content.as_str()) {
            return Ok(ReloadOutcome::Unchanged);
        }
        // Remember invalid contents too, so a broken file is reported once.
        self.last_content = Some(content.clone());

        let mut config = Config::parse(&content)
            .with_context(|| format!("rejected config {}", self.config_path.display()))?;
        // Reload settings only take effect at startup, so the file's
        // [reload] section is neither applied nor validated.
        if config.reload != self.config.reload {
            tracing::warn!(
                config = %self.config_path.display(),
                "reload settings changed; they are ignored until restart"
            );
        }
        config.reload = self.config.reload.clone();
        config
            .validate()
            .with_context(|| format!("rejected config {}", self.config_path.display()))?;

        if config.routing.hash_version != self.config.routing.hash_version {
            tracing::warn!(
                from = %self.config.routing.hash_version,
                to = %config.routing.hash_version,
                "routing hash version changed; auto-routed executions will move"
            );
        }

        let generation = self
            .handle
            .reload(&config.execution, config.routing.hash_version)?;
        self.config = config;
        Ok(ReloadOutcome::Swapped(generation))
    }

    /// Trigger graceful shutdown.
    pub fn shutdown(&self) {
        tracing::info!("shutdown requested");
        let _ = self.shutdown_tx.send(true);
    }

    /// Sender that stops [`Runtime::run`] when `true` is sent.
    pub fn shutdown_sender(&self) -> watch::Sender<bool> {
        self.shutdown_tx.clone()
    }

    /// Run until Ctrl-C or shutdown, polling for reloads if enabled.
    pub async fn run(&mut self) -> Result<()> {
        tracing::info!(
            config = %self.config_path.display(),
            targets = self.handle.all_valid_targets().len(),
            reload = self.config.reload.enabled,
            "fleetroute runtime started"
        );

        let mut shutdown_rx = self.shutdown_rx.clone();
        let ctrl_c = tokio::signal::ctrl_c();
        tokio::pin!(ctrl_c);

        let mut ticker =
            tokio::time::interval(Duration::from_millis(self.config.reload.poll_interval_ms));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = &mut ctrl_c => {
                    tracing::warn!("shutdown signal received (SIGINT)");
                    break;
                }
                changed = shutdown_rx.changed() => {
                    if changed.is_err() || *shutdown_rx.borrow() {
                        tracing::info!("shutdown requested by component");
                        break;
                    }
                }
                _ = ticker.tick(), if self.config.reload.enabled => {
                    match self.reload_once().await {
                        Ok(ReloadOutcome::Unchanged) => {}
                        Ok(ReloadOutcome::Swapped(generation)) => {
                            tracing::info!(generation, "configuration reloaded");
                        }
                        Err(e) => {
                            tracing::warn!(error = %format!("{:#}", e), "configuration reload failed");
                        }
                    }
                }
            }
        }

        tracing::info!(generation = self.handle.generation(), "fleetroute runtime stopped");
        Ok(())
    }
}
