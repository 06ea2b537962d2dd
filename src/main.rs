use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, info, warn, LevelFilter};
use log4rs::append::console::{ConsoleAppender, Target};
use log4rs::append::file::FileAppender;
use log4rs::config::{Appender, Config as LogConfig, Root};
use log4rs::encode::pattern::PatternEncoder;
use log4rs::filter::threshold::ThresholdFilter;
use pgsnap::cli::Opt;
use pgsnap::command::{CommandRunner, DryRunRunner, SystemRunner};
use pgsnap::config::{self, ToolPaths};
use pgsnap::orchestrator::Orchestrator;

/// Log everything to the file, and progress (info and up) to stderr
fn init_logging(log_file: &Path) -> Result<()> {
    let logfile = FileAppender::builder()
        .encoder(Box::new(PatternEncoder::new("{d(%Y-%m-%d %H:%M:%S)} {l} {t} - {m}{n}")))
        .build(log_file)
        .with_context(|| format!("Failed to open log file {}", log_file.display()))?;

    let stderr = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new("{h({l})} {m}{n}")))
        .build();

    let log_config = LogConfig::builder()
        .appender(Appender::builder().build("logfile", Box::new(logfile)))
        .appender(
            Appender::builder()
                .filter(Box::new(ThresholdFilter::new(LevelFilter::Info)))
                .build("stderr", Box::new(stderr)),
        )
        .build(Root::builder().appender("logfile").appender("stderr").build(LevelFilter::Debug))?;

    log4rs::init_config(log_config)?;
    Ok(())
}

fn main() -> Result<()> {
    // Load environment variables from .env file before clap reads them
    config::load_env();

    let opt = Opt::parse();
    init_logging(&opt.log_file)?;
    info!("Starting pgsnap");

    let run_config = opt.into_config()?;
    let tools = ToolPaths::from_env();
    debug!("Tools: {:?}", tools);

    let mut runner: Box<dyn CommandRunner> = if run_config.dry_run {
        Box::new(DryRunRunner::new(SystemRunner))
    } else {
        Box::new(SystemRunner)
    };

    let report = Orchestrator::new(&run_config, &tools, runner.as_mut()).run()?;

    let failed = report.failed_steps().count();
    if failed > 0 {
        warn!(
            "{} command(s) exited non-zero; rerun with --strict to stop at the first failure",
            failed
        );
    }
    if run_config.create_container || run_config.import_data {
        info!("Local database: {}", run_config.connection_url_masked());
    }
    if let Some(version) = &report.postgres_version {
        info!("Container {} runs PostgreSQL {}", run_config.container_name, version);
    }
    info!("pgsnap finished");
    Ok(())
}
