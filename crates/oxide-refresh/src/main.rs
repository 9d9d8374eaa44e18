//! oxide-refresh CLI
//!
//! Command-line tool for refreshing tables from SQL models.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::{Level, debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

use oxide_refresh::config::CONFIG_FILE;
use oxide_refresh::prelude::*;

/// Refresh tables from SQL models without breaking their physical identity.
#[derive(Parser)]
#[command(name = "oxide-refresh")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Database URL (SQLite path or connection string).
    #[arg(short, long, env = "DATABASE_URL")]
    database: Option<String>,

    /// Project configuration file.
    #[arg(short, long, default_value = CONFIG_FILE)]
    config: PathBuf,

    /// Models directory (overrides the configuration file).
    #[arg(long)]
    models_dir: Option<PathBuf>,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,

    /// Keep refresh events out of the normal output.
    #[arg(short, long)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Refresh models.
    Run {
        /// Model to refresh (all if not specified). Repeatable.
        #[arg(short, long)]
        model: Vec<String>,
    },

    /// Show the statements a refresh would issue, without running them.
    Plan {
        /// Model to plan (all if not specified). Repeatable.
        #[arg(short, long)]
        model: Vec<String>,
    },

    /// Show the column diff between a model and its table.
    Diff {
        /// Model name.
        #[arg(short, long)]
        model: String,

        /// Print the diff as JSON.
        #[arg(long)]
        json: bool,
    },

    /// List the models of the project.
    Models,
}

const DEFAULT_DATABASE: &str = "sqlite:warehouse.db";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .without_time()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let mut config = RefreshConfig::load_or_default(&cli.config)?;
    if let Some(dir) = cli.models_dir {
        config.models_dir = dir;
    }
    if cli.quiet {
        config.announce = false;
    }
    let resolver = DirectoryResolver::new(config.models_dir.clone());

    if let Commands::Models = cli.command {
        let models = model_names(&config, &resolver, &[])?;
        if models.is_empty() {
            warn!("No models found in {}", resolver.root().display());
        }
        for model in models {
            let target = config.target_for(&config.model(&model));
            println!("{model} -> {target}");
        }
        return Ok(());
    }

    let database = cli
        .database
        .or_else(|| config.database.clone())
        .unwrap_or_else(|| DEFAULT_DATABASE.to_string());
    let store = SqliteStore::connect(&database, 1).await?;
    debug!(dialect = store.dialect().name(), "Connected to {database}");

    match cli.command {
        Commands::Run { model } => {
            let refresher = Refresher::new(&store).with_resolver(&resolver);
            let mut failed = 0usize;
            for name in model_names(&config, &resolver, &model)? {
                let ctx = context_for(&config, &name);
                match refresher.refresh(&ctx, &QuerySource::Model(name.clone())).await {
                    Ok(outcome) => info!(
                        model = %name,
                        strategy = %outcome.strategy,
                        columns = outcome.final_columns.len(),
                        kept_storage = outcome.strategy.preserves_identity(),
                        "Refreshed"
                    ),
                    Err(e) => {
                        failed += 1;
                        if e.is_interrupted() {
                            warn!(model = %name, "Target left without data; re-run this model");
                        }
                        error!(model = %name, "{e}");
                    }
                }
            }
            if failed > 0 {
                anyhow::bail!("{failed} model(s) failed to refresh");
            }
        }

        Commands::Plan { model } => {
            let refresher = Refresher::new(&store)
                .with_resolver(&resolver)
                .dry_run(true);
            for name in model_names(&config, &resolver, &model)? {
                let ctx = context_for(&config, &name);
                let outcome = refresher
                    .refresh(&ctx, &QuerySource::Model(name.clone()))
                    .await?;
                println!("-- {name}: {}", outcome.strategy);
                for sql in &outcome.statements {
                    println!("{sql};");
                }
                println!();
            }
        }

        Commands::Diff { model, json } => {
            let refresher = Refresher::new(&store).with_resolver(&resolver);
            let ctx = context_for(&config, &model);
            let plan = refresher.plan(&ctx, &QuerySource::Model(model.clone())).await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&plan.diff)?);
            } else {
                println!("\n{} ({})", ctx.target, plan.strategy);
                println!("{:-<60}", "");
                for name in plan.diff.columns_to_drop() {
                    println!(" - {name}");
                }
                for addition in plan.diff.columns_to_add() {
                    println!(" + {} {}", addition.name(), addition.definition);
                }
                if plan.diff.columns_match() {
                    println!(" (columns match)");
                }
                println!();
            }
        }

        Commands::Models => {}
    }

    Ok(())
}

/// Returns the models to work on: the requested ones, else the configured
/// ones, else every model file in the models directory.
fn model_names(
    config: &RefreshConfig,
    resolver: &DirectoryResolver,
    requested: &[String],
) -> oxide_refresh::error::Result<Vec<String>> {
    if !requested.is_empty() {
        return Ok(requested.to_vec());
    }
    if !config.models.is_empty() {
        return Ok(config.models.iter().map(|m| m.name.clone()).collect());
    }
    resolver.discover()
}

fn context_for(config: &RefreshConfig, model: &str) -> RefreshContext {
    RefreshContext::new(config.target_for(&config.model(model))).announce(config.announce)
}
