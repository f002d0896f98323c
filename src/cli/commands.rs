use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "marketpulse", about = "Market snapshots and news-driven predictions")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Refresh once and print the snapshot
    Snapshot {
        /// Venue filter (nse, bse)
        #[arg(long)]
        venue: Option<String>,
        /// Sector filter, case-insensitive
        #[arg(long)]
        sector: Option<String>,
        /// Also print the top N gainers and losers
        #[arg(long)]
        movers: Option<usize>,
    },
    /// Run scheduled refreshes and print one line per published state
    Watch {
        /// Stop after this many states (default: run until interrupted)
        #[arg(long)]
        cycles: Option<usize>,
    },
    /// Predict from a news item
    Predict {
        /// JSON with headline, body, source, published_at, sentiment, symbols
        json: String,
    },
    /// Market-wide summary for a batch of news items
    Summarize {
        /// JSON array of news items
        json: String,
    },
    /// Show which symbols a piece of text resolves to
    Resolve {
        text: String,
        /// Explicit symbols, comma separated
        #[arg(long, value_delimiter = ',')]
        symbols: Vec<String>,
    },
}
