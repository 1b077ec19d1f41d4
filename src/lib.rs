//! Cross-process cancellation tokens.
//!
//! A controller creates a [`CancellationToken`], hands its
//! [`TokenDescriptor`] to a worker process, and later calls
//! [`CancellationToken::request_cancellation`]. The worker rebuilds the token
//! with [`CancellationToken::from_descriptor`] and checks it at safe points
//! with [`CancellationToken::throw_if_cancellation_requested`].

pub mod app;
pub mod cli;
pub mod config;
pub mod descriptor;
pub mod interrupt;
pub mod signal_fs;
pub mod token;

#[cfg(test)]
pub mod test_utils;

pub use config::{TokenConfig, DEFAULT_THROTTLE_INTERVAL};
pub use descriptor::TokenDescriptor;
pub use signal_fs::{DiskFs, MemoryFs, SignalFs};
pub use token::{cancellation_file_path, CancellationToken, OperationCancelled, TokenError};
