use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use parrainage_dashboard::chart::ChartOptions;
use parrainage_dashboard::config::{Config, ConfigOverrides};
use parrainage_dashboard::dashboard::Dashboard;
use parrainage_dashboard::data::load_from_path;
use parrainage_dashboard::output::csv::{candidates_to_csv, series_to_csv};
use parrainage_dashboard::output::json::render_json;
use parrainage_dashboard::output::table::{render_candidates_table, render_series_table};
use parrainage_dashboard::server::run_server;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
    Csv,
}

#[derive(Debug, Parser)]
#[command(
    name = "parrainage-dashboard",
    about = "Endorsement counts per presidential candidate over time"
)]
struct Cli {
    #[arg(short, long)]
    config: Option<PathBuf>,
    #[arg(short, long)]
    data: Option<PathBuf>,
    #[arg(short, long)]
    threshold: Option<usize>,
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    output: OutputFormat,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    Serve {
        #[arg(long)]
        host: Option<String>,
        #[arg(long)]
        port: Option<u16>,
    },
    Candidates,
    Series {
        #[arg(long)]
        candidat: Option<String>,
    },
    Figure {
        #[arg(long)]
        candidat: Option<String>,
    },
    Config {
        #[arg(long)]
        init: bool,
        #[arg(long)]
        show: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(Config::default_path);
    let mut config = Config::load(Some(&config_path))?;
    let (host, port) = match &cli.command {
        Some(Commands::Serve { host, port }) => (host.clone(), *port),
        _ => (None, None),
    };
    config.apply_overrides(ConfigOverrides {
        data_path: cli.data.clone(),
        min_endorsements: cli.threshold,
        host,
        port,
    });

    let command = cli.command.unwrap_or(Commands::Serve {
        host: None,
        port: None,
    });
    match command {
        Commands::Config { init, show } => {
            handle_config_command(init, show, &config, &config_path)?;
        }
        Commands::Serve { .. } => {
            let dashboard = load_dashboard(&config)?;
            let bind = config.bind_addr()?;
            info!(
                "{} candidates available, default selection {:?}",
                dashboard.candidates().len(),
                dashboard.default_selection()
            );
            run_server(dashboard, bind, &config.normalized_base_path()).await?;
        }
        Commands::Candidates => {
            let dashboard = load_dashboard(&config)?;
            match cli.output {
                OutputFormat::Table => {
                    println!("{}", render_candidates_table(dashboard.candidates()))
                }
                OutputFormat::Json => println!("{}", render_json(dashboard.candidates())?),
                OutputFormat::Csv => print!("{}", candidates_to_csv(dashboard.candidates())?),
            }
        }
        Commands::Series { candidat } => {
            let dashboard = load_dashboard(&config)?;
            let selection = dashboard
                .resolve_selection(candidat.as_deref())
                .unwrap_or_default();
            let series = dashboard.series(selection);
            match cli.output {
                OutputFormat::Table => {
                    println!("{selection}");
                    println!("{}", render_series_table(&series));
                }
                OutputFormat::Json => println!("{}", render_json(&series.to_long_format())?),
                OutputFormat::Csv => print!("{}", series_to_csv(&series.to_long_format())?),
            }
        }
        Commands::Figure { candidat } => {
            let dashboard = load_dashboard(&config)?;
            let selection = dashboard
                .resolve_selection(candidat.as_deref())
                .unwrap_or_default();
            println!("{}", render_json(&dashboard.update_graph(selection))?);
        }
    }

    Ok(())
}

fn load_dashboard(config: &Config) -> Result<Dashboard> {
    let data_path = config.resolved_data_path();
    let table = load_from_path(&data_path, config.data.delimiter)
        .with_context(|| format!("failed loading endorsements from {}", data_path.display()))?;
    let dashboard = Dashboard::new(
        table,
        config.data.min_endorsements,
        ChartOptions::from(&config.chart),
    );
    if dashboard.default_selection().is_none() {
        warn!(
            "no candidate has more than {} endorsements",
            config.data.min_endorsements
        );
    }
    Ok(dashboard)
}

fn handle_config_command(
    init: bool,
    show: bool,
    config: &Config,
    config_path: &PathBuf,
) -> Result<()> {
    if init {
        Config::write_template(config_path)?;
        println!("Wrote config template to {}", config_path.display());
    }
    if show || !init {
        println!("{}", render_json(config)?);
    }
    Ok(())
}
