//! Configuration file watcher.
//!
//! # Design Decisions
//! - The parent directory is watched rather than the file, so editors that
//!   save by replacing the file keep being followed.
//! - A reload is published only when the decoded model differs from the
//!   last one published. Touches, rewrites with equal content and the
//!   several events one save produces collapse into at most one update.
//! - A file that fails to decode keeps the previous model and is logged.

use std::path::{Path, PathBuf};
use std::time::Duration;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::config::loader::load_config;
use crate::config::schema::ClientConfig;

/// A watcher that re-decodes a configuration file whenever it changes.
pub struct ConfigWatcher {
    reloader: Reloader,
}

impl ConfigWatcher {
    /// Returns the watcher and a receiver for changed configurations.
    ///
    /// The file is decoded once here. That model is the baseline later
    /// reloads are compared against and is not sent.
    pub fn new(path: &Path) -> (Self, mpsc::UnboundedReceiver<ClientConfig>) {
        let (update_tx, update_rx) = mpsc::unbounded_channel();
        let mut reloader = Reloader {
            path: path.to_path_buf(),
            last: None,
            update_tx,
        };
        match load_config(path) {
            Ok(config) => reloader.last = Some(config),
            Err(e) => tracing::warn!(path = %path.display(), error = %e, "Initial decode failed"),
        }
        (Self { reloader }, update_rx)
    }

    /// The model the next reload is compared against.
    pub fn current(&self) -> Option<&ClientConfig> {
        self.reloader.last.as_ref()
    }

    /// Start watching the file in a background thread.
    ///
    /// Watching stops when the returned handle is dropped.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let mut reloader = self.reloader;
        let dir = watch_dir(&reloader.path);
        let file_name = reloader.path.file_name().map(|name| name.to_os_string());

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) => {
                    if !(event.kind.is_modify() || event.kind.is_create()) {
                        return;
                    }
                    if event.paths.iter().any(|p| p.file_name() == file_name.as_deref()) {
                        reloader.reload();
                    }
                }
                Err(e) => tracing::error!(error = %e, "Watch error"),
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;

        watcher.watch(&dir, RecursiveMode::NonRecursive)?;

        tracing::info!(dir = %dir.display(), "Config watcher started");
        Ok(watcher)
    }
}

struct Reloader {
    path: PathBuf,
    last: Option<ClientConfig>,
    update_tx: mpsc::UnboundedSender<ClientConfig>,
}

impl Reloader {
    /// Decodes the file and publishes the model if it changed.
    ///
    /// Returns whether an update was sent.
    fn reload(&mut self) -> bool {
        let config = match load_config(&self.path) {
            Ok(config) => config,
            Err(e) => {
                tracing::error!(
                    path = %self.path.display(),
                    error = %e,
                    "Failed to reload config. Keeping current configuration."
                );
                return false;
            }
        };
        if self.last.as_ref() == Some(&config) {
            tracing::debug!(path = %self.path.display(), "Config unchanged");
            return false;
        }

        tracing::info!(
            path = %self.path.display(),
            proxies = config.proxies.len(),
            "Config file changed"
        );
        self.last = Some(config.clone());
        self.update_tx.send(config).is_ok()
    }
}

fn watch_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    }
}
