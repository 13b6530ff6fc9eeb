use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bardo_dashboard::config::DashboardConfig;
use bardo_dashboard::dashboard::Dashboard;
use bardo_dashboard::models::MilestoneRow;
use bardo_dashboard::resourcing::{parse_day, render_resourcing, render_weekly, week_key};
use bardo_dashboard::store::{FileCache, LocalCache, MemoryCache, SqliteStore};
use bardo_dashboard::api;

#[derive(Parser)]
#[command(name = "bardo")]
#[command(about = "Milestones, weekly plans and resourcing for a small team")]
struct Cli {
    /// Document store path (overrides BARDO_DB_PATH)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the dashboard API server
    Serve {
        /// Port for HTTP API
        #[arg(short, long, default_value = "3000")]
        port: u16,
    },
    /// Replace milestones with rows from a JSON file
    Import {
        /// JSON array of rows with quarter, category, title, date, people,
        /// resourcing, progress and id fields
        file: PathBuf,

        /// Quarter for rows that do not name one
        #[arg(short, long)]
        quarter: Option<String>,
    },
    /// Recompute and print a quarter's resourcing table
    Resourcing {
        #[arg(short, long)]
        quarter: Option<String>,
    },
    /// Print a week's resourcing sums
    Weekly {
        #[arg(short, long)]
        quarter: Option<String>,

        /// Week key such as 2025-W45; the current week when omitted
        #[arg(short, long)]
        week: Option<String>,
    },
    /// Print the ISO week key for a date (YYYY-MM-DD), today by default
    WeekKey { date: Option<String> },
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG")
            .unwrap_or_else(|_| "bardo_dashboard=debug,tower_http=debug".into()),
    );

    // Logs go to stderr so command output on stdout stays clean
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn open_dashboard(
    config: &DashboardConfig,
    db: Option<PathBuf>,
    today: NaiveDate,
) -> anyhow::Result<Dashboard> {
    let path = match db.or_else(|| config.db_path.clone()) {
        Some(path) => path,
        None => SqliteStore::default_path()?,
    };
    let store = SqliteStore::open(path)?;
    store.migrate()?;

    let cache: Arc<dyn LocalCache> = match &config.cache_dir {
        Some(dir) => Arc::new(FileCache::new(dir)),
        None => Arc::new(MemoryCache::new()),
    };

    let quarter = config.current_quarter(today);
    Ok(Dashboard::open(Arc::new(store), cache, config.roster.clone(), &quarter))
}

async fn serve(dashboard: Dashboard, config: DashboardConfig, port: u16) -> anyhow::Result<()> {
    tracing::info!("Starting dashboard server on port {}", port);
    let app = api::create_router(dashboard, config);

    let listener = tokio::net::TcpListener::bind(format!("127.0.0.1:{}", port)).await?;
    tracing::info!("Dashboard listening on http://127.0.0.1:{}", port);

    axum::serve(listener, app).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let config = DashboardConfig::from_env();
    let today = Local::now().date_naive();

    match cli.command {
        Some(Commands::Serve { port }) => {
            let dashboard = open_dashboard(&config, cli.db, today)?;
            serve(dashboard, config, port).await?;
        }
        Some(Commands::Import { file, quarter }) => {
            let body = std::fs::read_to_string(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let rows: Vec<MilestoneRow> = serde_json::from_str(&body)
                .with_context(|| format!("Failed to parse rows in {}", file.display()))?;

            let quarter = quarter.unwrap_or_else(|| config.current_quarter(today));
            let dashboard = open_dashboard(&config, cli.db, today)?;
            let doc = dashboard.import_milestones(rows, &quarter);

            for (quarter, by_category) in &doc {
                let count: usize = by_category.values().map(Vec::len).sum();
                println!("{}: {} milestones", quarter, count);
            }
            print!("{}", render_resourcing(&dashboard.quarter_resourcing(&quarter)));
        }
        Some(Commands::Resourcing { quarter }) => {
            let quarter = quarter.unwrap_or_else(|| config.current_quarter(today));
            let dashboard = open_dashboard(&config, cli.db, today)?;
            println!("{}", quarter);
            print!("{}", render_resourcing(&dashboard.recompute_quarter(&quarter)));
        }
        Some(Commands::Weekly { quarter, week }) => {
            let quarter = quarter.unwrap_or_else(|| config.current_quarter(today));
            let week = week.unwrap_or_else(|| week_key(today));
            let dashboard = open_dashboard(&config, cli.db, today)?;
            println!("{} {}", quarter, week);
            print!("{}", render_weekly(&dashboard.weekly_resourcing(&quarter, &week)));
        }
        Some(Commands::WeekKey { date }) => {
            let date = match date {
                Some(s) => parse_day(&s)
                    .ok_or_else(|| anyhow::anyhow!("Invalid date {}, expected YYYY-MM-DD", s))?,
                None => today,
            };
            println!("{}", week_key(date));
        }
        None => {
            let dashboard = open_dashboard(&config, cli.db, today)?;
            serve(dashboard, config, 3000).await?;
        }
    }

    Ok(())
}
