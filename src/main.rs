use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use cli::{Cli, Commands};
use ironlog::{
    db::open,
    types::{Config, OutputFmt},
};
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("IRONLOG_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let fmt = if cli.json { OutputFmt::Json } else { OutputFmt::Text };

    let result = match cli.cmd {
        // Config must work even when the configured database is unusable.
        Commands::Config(cmd) => commands::config::handle(cmd).await,
        cmd => run(cmd, fmt).await,
    };

    if let Err(e) = result {
        eprintln!("{} {:#}", "error:".red().bold(), e);
        std::process::exit(1);
    }
}

async fn run(cmd: Commands, fmt: OutputFmt) -> Result<()> {
    let cfg = Config::load(&Config::default_path()?)?;
    let db_path = cfg.db_path();
    anyhow::ensure!(!db_path.is_empty(), "config key `db` must not be empty");

    let pool = open(db_path).await?;
    tracing::debug!(db_path, "database ready");

    match cmd {
        Commands::Import { file, date, yes } => {
            commands::import::handle(&pool, file, date, yes, fmt).await?
        }
        Commands::Log { date } => commands::log::handle(&pool, &date, fmt).await?,
        Commands::History {
            exercise,
            graph,
            formula,
        } => {
            let formula = formula.unwrap_or_else(|| cfg.formula());
            commands::history::handle(&pool, &exercise.join(" "), graph, formula, fmt).await?
        }
        Commands::Sessions {
            search,
            period,
            sort,
        } => commands::sessions::handle(&pool, search, period, sort, fmt).await?,
        Commands::Feeling(cmd) => commands::feeling::handle(cmd, &pool, fmt).await?,
        Commands::Exercises => commands::exercises::handle(&pool, fmt).await?,
        Commands::Calendar { year, month } => commands::calendar::handle(&pool, year, month).await?,
        Commands::Context => commands::context::handle(&pool).await?,
        Commands::Db(cmd) => commands::db::handle(cmd, &pool).await?,
        Commands::Config(cmd) => commands::config::handle(cmd).await?,
    }

    Ok(())
}
