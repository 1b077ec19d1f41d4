//! Command handlers behind the `cancel-file` binary.

use std::io::{self, Write};
use std::thread;
use std::time::{Duration, Instant};

use log::{debug, info, warn};

use crate::cli::{Command, NewArgs, TargetArgs, WaitArgs};
use crate::config::TokenConfig;
use crate::interrupt;
use crate::signal_fs::SignalFs;
use crate::token::{CancellationToken, TokenError};

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Token(#[from] TokenError),
    #[error("Failed to write output: {0}")]
    Output(#[from] io::Error),
    #[error("Timed out after {0:?} waiting for cancellation")]
    Timeout(Duration),
    #[error("Interrupted while waiting for cancellation")]
    Interrupted,
}

/// Runs CLI commands against a filesystem, writing results to `out`.
pub struct App<F: SignalFs + Clone, W: Write> {
    fs: F,
    config: TokenConfig,
    out: W,
}

impl<F: SignalFs + Clone, W: Write> App<F, W> {
    pub fn new(fs: F, config: TokenConfig, out: W) -> Self {
        Self { fs, config, out }
    }

    pub fn into_output(self) -> W {
        self.out
    }

    pub fn run(&mut self, command: Command) -> Result<(), AppError> {
        match command {
            Command::New(args) => self.handle_new(args),
            Command::Request(args) => self.handle_request(args),
            Command::Cleanup(args) => self.handle_cleanup(args),
            Command::Status(args) => self.handle_status(args),
            Command::Wait(args) => self.handle_wait(args),
        }
    }

    /// A target is either descriptor JSON or a bare identity.
    fn resolve(&self, target: &TargetArgs) -> Result<CancellationToken<F>, TokenError> {
        let raw = target.target.trim();
        let token = if raw.starts_with('{') {
            CancellationToken::from_json(raw)?
        } else {
            CancellationToken::with_identity(Some(raw), false)
        };
        debug!("Resolved target to {}", token.file_path().display());
        Ok(token.with_fs(self.fs.clone()).with_config(&self.config))
    }

    fn handle_new(&mut self, args: NewArgs) -> Result<(), AppError> {
        let token = CancellationToken::with_identity(args.identity.as_deref(), false);
        writeln!(self.out, "{}", token.to_json()?)?;
        Ok(())
    }

    fn handle_request(&mut self, args: TargetArgs) -> Result<(), AppError> {
        let token = self.resolve(&args)?;
        token.request_cancellation()?;
        info!("Cancellation requested ({})", token.file_path().display());
        Ok(())
    }

    fn handle_cleanup(&mut self, args: TargetArgs) -> Result<(), AppError> {
        let token = self.resolve(&args)?;
        token.cleanup_cancellation()?;
        info!("Cancellation cleared ({})", token.file_path().display());
        Ok(())
    }

    fn handle_status(&mut self, args: TargetArgs) -> Result<(), AppError> {
        let token = self.resolve(&args)?;
        let state = if token.is_cancellation_requested() {
            "cancelled"
        } else {
            "active"
        };
        writeln!(self.out, "{}", state)?;
        Ok(())
    }

    fn handle_wait(&mut self, args: WaitArgs) -> Result<(), AppError> {
        let token = self.resolve(&args.target)?;
        let poll = Duration::from_millis(args.poll_ms);
        let timeout = args.timeout_ms.map(Duration::from_millis);
        let started = Instant::now();

        interrupt::register_handler();
        interrupt::reset();
        info!(
            "Waiting for cancellation of {}...",
            token.file_path().display()
        );

        while token.throw_if_cancellation_requested().is_ok() {
            if interrupt::is_interrupted() {
                warn!("Interrupted, no longer waiting");
                return Err(AppError::Interrupted);
            }
            if let Some(limit) = timeout {
                if started.elapsed() >= limit {
                    return Err(AppError::Timeout(limit));
                }
            }
            thread::sleep(poll);
        }

        writeln!(self.out, "cancelled")?;
        Ok(())
    }
}
