use clap::Parser;
use marketpulse::cli::commands::{Cli, Commands};
use marketpulse::config::Config;
use marketpulse::domain::entities::news_item::NewsItem;
use marketpulse::domain::error::DomainError;
use marketpulse::domain::values::venue::Venue;
use marketpulse::MarketPulse;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,marketpulse=debug")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mp = match Config::from_env().and_then(MarketPulse::new) {
        Ok(mp) => mp,
        Err(e) => {
            eprintln!("Error initializing MarketPulse: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = run_command(mp, cli.command).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run_command(mp: MarketPulse, cmd: Commands) -> Result<(), Box<dyn std::error::Error>> {
    match cmd {
        Commands::Snapshot {
            venue,
            sector,
            movers,
        } => {
            let venue: Option<Venue> = venue.map(|v| v.parse()).transpose()?;

            match mp.force_refresh().await {
                Err(e) if !e.is_recoverable() => return Err(e.into()),
                Err(e) => eprintln!("Warning: refresh failed, serving last snapshot: {e}"),
                Ok(_) => {}
            }

            let state = mp.get_snapshot(venue, sector.as_deref());
            let mut out = serde_json::json!({
                "stale": state.stale,
                "last_error": state.last_error,
                "breadth": state.snapshot.breadth(),
                "snapshot": state.snapshot.as_ref(),
            });
            if let Some(n) = movers {
                out["movers"] = serde_json::to_value(state.snapshot.top_movers(n))?;
            }
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        Commands::Watch { cycles } => {
            let mut rx = mp.subscribe();
            let handle = mp.start_scheduler();
            let mut seen = 0usize;

            while rx.changed().await.is_ok() {
                let state = rx.borrow_and_update().clone();
                let breadth = state.snapshot.breadth();
                println!(
                    "cycle={} quotes={} failed={} adv={} dec={} stale={}{}",
                    state.snapshot.cycle,
                    state.snapshot.len(),
                    state.snapshot.failures.len(),
                    breadth.advancers,
                    breadth.decliners,
                    state.stale,
                    state
                        .last_error
                        .map(|e| format!(" error=\"{e}\""))
                        .unwrap_or_default()
                );

                seen += 1;
                if cycles.is_some_and(|max| seen >= max) {
                    break;
                }
            }
            handle.abort();
        }
        Commands::Predict { json } => {
            let item: NewsItem = serde_json::from_str(&json)
                .map_err(|e| DomainError::InvalidInput(format!("news item JSON: {e}")))?;
            let predictions = mp.predict(&item).await;
            println!("{}", serde_json::to_string_pretty(&predictions)?);
        }
        Commands::Summarize { json } => {
            let items: Vec<NewsItem> = serde_json::from_str(&json)
                .map_err(|e| DomainError::InvalidInput(format!("news items JSON: {e}")))?;
            let summary = mp.summarize(&items).await;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        Commands::Resolve { text, symbols } => {
            let resolution = mp.resolve_symbols(&text, &symbols);
            println!(
                "{} (via {:?})",
                resolution.symbols.join(", "),
                resolution.strategy
            );
        }
    }
    Ok(())
}
