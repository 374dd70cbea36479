use anyhow::{bail, Result};
use clap::Parser;
use goinject_module::{find_modules, require_module};
use pipeline::{Pipeline, PostSteps};
use report::RunReport;
use settings::Settings;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;

mod pipeline;
mod report;
mod settings;

fn print_stdout(text: &str) -> Result<()> {
    use std::io::Write;

    let mut stdout = io::stdout().lock();
    if let Err(err) = stdout
        .write_all(text.as_bytes())
        .and_then(|_| stdout.write_all(b"\n"))
        .and_then(|_| stdout.flush())
    {
        if err.kind() == io::ErrorKind::BrokenPipe {
            return Ok(());
        }
        return Err(err.into());
    }
    Ok(())
}

#[derive(Parser)]
#[command(name = "goinject")]
#[command(about = "Inject imports and init() statements into Go modules", long_about = None)]
#[command(version)]
struct Cli {
    /// Directory to process (a go module, or a tree of modules with --recursive)
    #[arg(long, default_value = ".")]
    dir: PathBuf,

    /// Path to the TOML configuration
    #[arg(long, default_value = "goinject.toml")]
    config: PathBuf,

    /// Process every go module below --dir
    #[arg(long)]
    recursive: bool,

    /// Run 'go fmt ./...' after editing
    #[arg(long)]
    fmt: bool,

    /// Run 'go mod tidy' after editing
    #[arg(long)]
    tidy: bool,

    /// Print a JSON report to stdout
    #[arg(long)]
    json: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors
    #[arg(long)]
    quiet: bool,
}

pub async fn main_entry() -> Result<()> {
    let mut cli = Cli::parse();

    // Keep stdout clean for JSON parsing
    if cli.json {
        cli.quiet = true;
    }

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    let settings = Settings::load(&cli.config)?;

    let modules = if cli.recursive {
        let modules = find_modules(&cli.dir);
        if modules.is_empty() {
            bail!("No go modules found under '{}'", cli.dir.display());
        }
        modules
    } else {
        require_module(&cli.dir)?;
        vec![cli.dir.clone()]
    };
    log::info!("Directory to process: {}", cli.dir.display());

    let post = PostSteps {
        fmt: cli.fmt,
        tidy: cli.tidy,
    };
    let pipeline = Arc::new(Pipeline::new(settings, post));
    let report = RunReport {
        root: cli.dir.clone(),
        modules: pipeline.run(modules).await,
    };

    if cli.json {
        print_stdout(&serde_json::to_string_pretty(&report)?)?;
    } else {
        report.log_summary();
    }

    let failed = report.failed_count();
    if failed > 0 {
        bail!("{failed} of {} modules failed", report.modules.len());
    }
    Ok(())
}
