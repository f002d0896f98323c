pub mod aggregator;
pub mod decoder;
pub mod heuristic;
pub mod inference;
pub mod predict;
pub mod quote_fetcher;
pub mod scheduler;
pub mod summarize;
pub mod symbol_resolver;
pub mod text;
