use clap::{ArgAction, Args, Parser, Subcommand};

/// Command line interface definition for cancel-file.
#[derive(Parser, Debug)]
#[command(name = "cancel-file")]
#[command(about = "Request, inspect and clear file-based cancellation signals")]
#[command(version)]
pub struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    pub verbosity: u8,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbosity")]
    pub quiet: bool,

    /// Minimum milliseconds between two filesystem checks
    /// (default: $CANCEL_FILE_THROTTLE_MS or 10)
    #[arg(long, value_name = "MS", global = true)]
    pub throttle_ms: Option<u64>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Print the descriptor of a new token without creating its file
    New(NewArgs),
    /// Signal cancellation to every process holding the token
    Request(TargetArgs),
    /// Remove the cancellation signal
    Cleanup(TargetArgs),
    /// Print "cancelled" or "active"
    Status(TargetArgs),
    /// Block until cancellation is requested
    Wait(WaitArgs),
}

#[derive(Args, Debug, Clone)]
pub struct NewArgs {
    /// Identity used to name the signal file (default: random)
    #[arg(long)]
    pub identity: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct TargetArgs {
    /// Descriptor JSON (`{"filePath":..,"isCancelled":..}`) or a bare identity
    #[arg(value_name = "TARGET")]
    pub target: String,
}

#[derive(Args, Debug, Clone)]
pub struct WaitArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Sleep between checks
    #[arg(long, value_name = "MS", default_value_t = 50)]
    pub poll_ms: u64,

    /// Give up after this long (default: wait forever)
    #[arg(long, value_name = "MS")]
    pub timeout_ms: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_wait() {
        let cli = Cli::try_parse_from([
            "cancel-file",
            "-vv",
            "--throttle-ms",
            "5",
            "wait",
            "job-1",
            "--timeout-ms",
            "100",
        ])
        .unwrap();

        assert_eq!(cli.verbosity, 2);
        assert_eq!(cli.throttle_ms, Some(5));
        match cli.command {
            Command::Wait(args) => {
                assert_eq!(args.target.target, "job-1");
                assert_eq!(args.poll_ms, 50);
                assert_eq!(args.timeout_ms, Some(100));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["cancel-file", "-q", "-v", "status", "x"]).is_err());
    }

    #[test]
    fn test_subcommand_required() {
        assert!(Cli::try_parse_from(["cancel-file"]).is_err());
    }
}
