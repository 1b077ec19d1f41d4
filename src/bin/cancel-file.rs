use clap::Parser;
use log::LevelFilter;

use cancel_file::app::App;
use cancel_file::cli::Cli;
use cancel_file::config::TokenConfig;
use cancel_file::signal_fs::DiskFs;

fn main() {
    let cli = Cli::parse();

    // Initialize logging based on verbosity flags
    let log_level = if cli.quiet {
        LevelFilter::Error
    } else {
        match cli.verbosity {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };
    env_logger::Builder::new()
        .filter_level(log_level)
        .format_target(false)
        .format_timestamp(None)
        .init();

    // Throttle from environment, then apply CLI override
    let config = TokenConfig::from_env().with_overrides(cli.throttle_ms);

    let mut app = App::new(DiskFs, config, std::io::stdout().lock());
    if let Err(err) = app.run(cli.command) {
        log::error!("{}", err);
        std::process::exit(1);
    }
}
