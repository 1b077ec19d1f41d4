//! File-backed cancellation token shared between a controller and a worker.
//!
//! The controller calls [`CancellationToken::request_cancellation`], which
//! creates an empty file under the system temp directory. Any token bound to
//! the same path (typically rebuilt in another process from a
//! [`TokenDescriptor`]) sees the file on its next non-throttled check.

use std::cell::Cell;
use std::env;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use log::{debug, trace};
use serde::{Serialize, Serializer};

use crate::config::{TokenConfig, DEFAULT_THROTTLE_INTERVAL};
use crate::descriptor::TokenDescriptor;
use crate::signal_fs::{DiskFs, SignalFs};

/// Prefix of every generated signal file name.
pub const FILE_PREFIX: &str = "tsc-";

/// Errors from token operations
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Invalid token descriptor: {0}")]
    Descriptor(String),
}

/// Returned by [`CancellationToken::throw_if_cancellation_requested`] once
/// cancellation is observed. Units of work propagate it with `?` and treat it
/// as a normal abort, not a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("Operation was cancelled")]
pub struct OperationCancelled;

/// Signal file path for an identity: `<temp_dir>/tsc-<identity>`.
///
/// Path separators in the identity are replaced so the file always lands
/// directly in the temp directory.
pub fn cancellation_file_path(identity: &str) -> PathBuf {
    let name: String = identity
        .chars()
        .map(|c| if c == '/' || c == '\\' { '_' } else { c })
        .collect();
    env::temp_dir().join(format!("{}{}", FILE_PREFIX, name))
}

fn generate_identity() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

#[derive(Debug)]
pub struct CancellationToken<F: SignalFs = DiskFs> {
    file_path: PathBuf,
    is_cancelled: Cell<bool>,
    last_check: Cell<Option<Instant>>,
    throttle: Duration,
    fs: F,
}

impl CancellationToken<DiskFs> {
    /// Fresh token with a random identity, not cancelled.
    pub fn new() -> Self {
        Self::with_identity(None, false)
    }

    /// Token for `identity` (random when `None`).
    ///
    /// `initial_cancelled` marks the token cancelled without looking at the
    /// filesystem.
    pub fn with_identity(identity: Option<&str>, initial_cancelled: bool) -> Self {
        let file_path = match identity {
            Some(id) => cancellation_file_path(id),
            None => cancellation_file_path(&generate_identity()),
        };
        Self::bound_to(file_path, initial_cancelled, DiskFs)
    }

    /// Rebuild a token from a descriptor produced by [`Self::to_descriptor`],
    /// usually in another process. The path is used verbatim.
    pub fn from_descriptor(descriptor: TokenDescriptor) -> Self {
        Self::bound_to(descriptor.file_path, descriptor.is_cancelled, DiskFs)
    }

    /// Parse a descriptor JSON string and rebuild the token.
    pub fn from_json(json: &str) -> Result<Self, TokenError> {
        let descriptor: TokenDescriptor =
            serde_json::from_str(json).map_err(|e| TokenError::Descriptor(e.to_string()))?;
        Ok(Self::from_descriptor(descriptor))
    }
}

impl Default for CancellationToken<DiskFs> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: SignalFs> CancellationToken<F> {
    fn bound_to(file_path: PathBuf, is_cancelled: bool, fs: F) -> Self {
        Self {
            file_path,
            is_cancelled: Cell::new(is_cancelled),
            last_check: Cell::new(None),
            throttle: DEFAULT_THROTTLE_INTERVAL,
            fs,
        }
    }

    /// Replace the filesystem capability, keeping path and state.
    pub fn with_fs<G: SignalFs>(self, fs: G) -> CancellationToken<G> {
        CancellationToken {
            file_path: self.file_path,
            is_cancelled: self.is_cancelled,
            last_check: self.last_check,
            throttle: self.throttle,
            fs,
        }
    }

    pub fn with_throttle(mut self, interval: Duration) -> Self {
        self.throttle = interval;
        self
    }

    pub fn with_config(self, config: &TokenConfig) -> Self {
        self.with_throttle(config.throttle_interval)
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    pub fn throttle_interval(&self) -> Duration {
        self.throttle
    }

    /// Snapshot of the last observed state. Does not re-check the file.
    pub fn to_descriptor(&self) -> TokenDescriptor {
        TokenDescriptor::new(self.file_path.clone(), self.is_cancelled.get())
    }

    pub fn to_json(&self) -> Result<String, TokenError> {
        serde_json::to_string(&self.to_descriptor())
            .map_err(|e| TokenError::Descriptor(e.to_string()))
    }

    /// Whether cancellation has been requested.
    ///
    /// Sticky once true. While not cancelled, the filesystem is consulted at
    /// most once per throttle interval; in between, the cached `false` is
    /// returned.
    pub fn is_cancellation_requested(&self) -> bool {
        if self.is_cancelled.get() {
            return true;
        }

        let now = Instant::now();
        if let Some(last) = self.last_check.get() {
            if now.saturating_duration_since(last) < self.throttle {
                return false;
            }
        }

        let cancelled = self.fs.exists(&self.file_path);
        trace!(
            "Checked {}: cancelled={}",
            self.file_path.display(),
            cancelled
        );
        self.last_check.set(Some(now));
        self.is_cancelled.set(cancelled);
        cancelled
    }

    /// `Err(OperationCancelled)` if cancellation has been requested.
    pub fn throw_if_cancellation_requested(&self) -> Result<(), OperationCancelled> {
        if self.is_cancellation_requested() {
            Err(OperationCancelled)
        } else {
            Ok(())
        }
    }

    /// Create the signal file and mark this token cancelled immediately.
    ///
    /// Safe to call repeatedly. If the file cannot be created the error is
    /// returned and the local state is left unchanged.
    pub fn request_cancellation(&self) -> Result<(), TokenError> {
        self.fs.create(&self.file_path)?;
        self.is_cancelled.set(true);
        debug!("Requested cancellation via {}", self.file_path.display());
        Ok(())
    }

    /// Remove the signal file and reset to not cancelled.
    ///
    /// A missing file is not an error. Other I/O errors are returned.
    pub fn cleanup_cancellation(&self) -> Result<(), TokenError> {
        match self.fs.remove(&self.file_path) {
            Ok(()) => debug!("Removed cancellation file {}", self.file_path.display()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
        self.is_cancelled.set(false);
        Ok(())
    }
}

impl<F: SignalFs> Serialize for CancellationToken<F> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_descriptor().serialize(serializer)
    }
}
