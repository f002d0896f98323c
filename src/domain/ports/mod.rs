pub mod inference_service;
pub mod quote_provider;
