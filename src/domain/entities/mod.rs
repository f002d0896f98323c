pub mod instrument;
pub mod market_summary;
pub mod news_item;
pub mod prediction;
pub mod quote;
pub mod snapshot;
