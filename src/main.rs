//! gotestmatrix CLI - list Go tests or emit a CI shard matrix.

use std::io::{self, Write};
use std::num::NonZeroUsize;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{Level, debug};
use tracing_subscriber::FmtSubscriber;

use gotestmatrix::catalog::CatalogBuilder;
use gotestmatrix::render::{self, DEFAULT_FORMAT, JSON_FORMAT};
use gotestmatrix::syntax::BuildContext;
use gotestmatrix::{analyze_dir, distribute, resolve_dirs};

#[derive(Parser)]
#[command(name = "gotestmatrix")]
#[command(about = "Discover Go tests and distribute them across CI matrix shards", long_about = None)]
#[command(version)]
struct Cli {
    /// Output format: "json" or a row template like "{{.Pkg}} {{.Name}} {{.File}}"
    #[arg(short, long, default_value = DEFAULT_FORMAT)]
    format: String,

    /// Distribute tests into a matrix with this many shards instead of listing them
    #[arg(short, long, value_name = "SHARDS")]
    distribute: Option<NonZeroUsize>,

    /// Pin a matrix entry of |-joined suite names, excluded from automatic
    /// placement and appended verbatim (repeatable)
    #[arg(short = 'o', long = "override", value_name = "SUITES")]
    overrides: Vec<String>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Package directories to search; append /... to recurse
    #[arg(value_name = "PKG", required = true)]
    packages: Vec<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging; diagnostics go to stderr so stdout stays pipeable.
    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_writer(io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let dirs = resolve_dirs(&cli.packages)?;
    debug!("analyzing {} directories", dirs.len());

    let ctx = BuildContext::host();
    let mut builder = CatalogBuilder::new();
    for dir in &dirs {
        let batch = analyze_dir(dir, &ctx)
            .with_context(|| format!("failed to analyze {}", dir.display()))?;
        builder.add_batch(batch);
    }
    let catalog = builder.build()?;

    let output = if let Some(shards) = cli.distribute {
        render::render_matrix(&distribute(&catalog, shards, &cli.overrides))?
    } else if cli.format == JSON_FORMAT {
        render::render_json(&catalog)?
    } else {
        render::render_table(&catalog, &cli.format)?
    };

    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{output}")?;
    Ok(())
}
