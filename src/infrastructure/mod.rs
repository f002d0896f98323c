pub mod inference;
pub mod quotes;
