pub mod confidence;
pub mod direction;
pub mod provenance;
pub mod recommendation;
pub mod risk_level;
pub mod sentiment;
pub mod venue;
