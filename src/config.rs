//! Runtime configuration.
//!
//! Timings, limits and the inference backend come from `MARKETPULSE_*`
//! environment variables. Reference data (instrument universe, dictionaries,
//! keyword sets) ships with built-in defaults for the Indian equity market and
//! can be overridden per field by a JSON file named in `MARKETPULSE_CONFIG`.

use crate::domain::entities::instrument::Instrument;
use crate::domain::error::DomainError;
use crate::domain::values::risk_level::RiskLevel;
use crate::domain::values::venue::Venue;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub refresh_interval: Duration,
    pub fetch_timeout: Duration,
    pub inference_timeout: Duration,
    pub max_concurrent_fetches: usize,
    pub max_symbols_per_item: usize,
    /// Seed for the heuristic predictor's RNG. Unset means OS entropy.
    pub seed: Option<u64>,
    pub inference: InferenceConfig,
    pub reference: ReferenceData,
}

#[derive(Debug, Clone, Default)]
pub struct InferenceConfig {
    /// `openai` or `noop`.
    pub provider: String,
    pub api_key: String,
    pub model: Option<String>,
    pub base_url: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            refresh_interval: Duration::from_secs(60),
            fetch_timeout: Duration::from_millis(5_000),
            inference_timeout: Duration::from_millis(8_000),
            max_concurrent_fetches: 8,
            max_symbols_per_item: 3,
            seed: None,
            inference: InferenceConfig {
                provider: "noop".into(),
                ..Default::default()
            },
            reference: ReferenceData::default(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, DomainError> {
        let defaults = Config::default();

        let reference = match std::env::var("MARKETPULSE_CONFIG") {
            Ok(path) if !path.is_empty() => ReferenceData::from_file(Path::new(&path))?,
            _ => defaults.reference,
        };

        let config = Self {
            refresh_interval: Duration::from_secs(env_parse(
                "MARKETPULSE_REFRESH_SECS",
                defaults.refresh_interval.as_secs(),
            )?),
            fetch_timeout: Duration::from_millis(env_parse(
                "MARKETPULSE_FETCH_TIMEOUT_MS",
                defaults.fetch_timeout.as_millis() as u64,
            )?),
            inference_timeout: Duration::from_millis(env_parse(
                "MARKETPULSE_INFERENCE_TIMEOUT_MS",
                defaults.inference_timeout.as_millis() as u64,
            )?),
            max_concurrent_fetches: env_parse(
                "MARKETPULSE_MAX_CONCURRENT_FETCHES",
                defaults.max_concurrent_fetches,
            )?,
            max_symbols_per_item: env_parse(
                "MARKETPULSE_MAX_SYMBOLS_PER_ITEM",
                defaults.max_symbols_per_item,
            )?,
            seed: std::env::var("MARKETPULSE_SEED")
                .ok()
                .map(|s| {
                    s.parse::<u64>()
                        .map_err(|e| DomainError::Config(format!("MARKETPULSE_SEED: {e}")))
                })
                .transpose()?,
            inference: InferenceConfig {
                provider: std::env::var("MARKETPULSE_INFERENCE_PROVIDER")
                    .unwrap_or_else(|_| "noop".into()),
                api_key: std::env::var("MARKETPULSE_INFERENCE_API_KEY").unwrap_or_default(),
                model: std::env::var("MARKETPULSE_INFERENCE_MODEL").ok(),
                base_url: std::env::var("MARKETPULSE_INFERENCE_BASE_URL").ok(),
            },
            reference,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.refresh_interval.is_zero() {
            return Err(DomainError::Config("refresh interval must be > 0".into()));
        }
        if self.fetch_timeout.is_zero() || self.inference_timeout.is_zero() {
            return Err(DomainError::Config("timeouts must be > 0".into()));
        }
        if self.max_concurrent_fetches == 0 {
            return Err(DomainError::Config("max concurrent fetches must be > 0".into()));
        }
        if self.max_symbols_per_item == 0 {
            return Err(DomainError::Config("max symbols per item must be > 0".into()));
        }
        if self.reference.universe.is_empty() {
            return Err(DomainError::Config("instrument universe is empty".into()));
        }
        if self.reference.default_symbol.trim().is_empty() {
            return Err(DomainError::Config("default symbol is empty".into()));
        }
        Ok(())
    }
}

fn env_parse<T: FromStr>(key: &str, default: T) -> Result<T, DomainError>
where
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| DomainError::Config(format!("{key}: {e}"))),
        Err(_) => Ok(default),
    }
}

/// Static dictionaries shared by the resolver, the heuristic predictor and
/// the summary fallback.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReferenceData {
    pub universe: Vec<Instrument>,
    /// Lower-case company name -> symbol.
    pub company_names: BTreeMap<String, String>,
    /// Lower-case keyword or phrase -> representative symbol for that sector.
    pub sector_proxies: BTreeMap<String, String>,
    pub default_symbol: String,
    pub stop_words: Vec<String>,
    pub bullish_keywords: Vec<String>,
    pub bearish_keywords: Vec<String>,
    /// Sector -> baseline risk used by the heuristic predictor.
    pub sector_risk: BTreeMap<String, RiskLevel>,
}

impl ReferenceData {
    pub fn from_file(path: &Path) -> Result<Self, DomainError> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| DomainError::Config(format!("{}: {e}", path.display())))?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self, DomainError> {
        let mut data: Self = serde_json::from_str(raw)
            .map_err(|e| DomainError::Config(format!("reference data: {e}")))?;
        for instrument in &mut data.universe {
            instrument.symbol = Venue::canonical_symbol(&instrument.symbol);
        }
        Ok(data)
    }

    pub fn sector_of(&self, symbol: &str) -> Option<&str> {
        let symbol = Venue::canonical_symbol(symbol);
        self.universe
            .iter()
            .find(|i| i.symbol == symbol)
            .and_then(|i| i.sector.as_deref())
    }

    pub fn risk_for_sector(&self, sector: Option<&str>) -> RiskLevel {
        sector
            .and_then(|s| {
                self.sector_risk
                    .iter()
                    .find(|(k, _)| k.eq_ignore_ascii_case(s))
                    .map(|(_, r)| *r)
            })
            .unwrap_or_default()
    }
}

impl Default for ReferenceData {
    fn default() -> Self {
        use Venue::{Bse, Nse};

        let universe = [
            ("RELIANCE", "Reliance Industries", Nse, "Energy"),
            ("TCS", "Tata Consultancy Services", Nse, "IT"),
            ("HDFCBANK", "HDFC Bank", Nse, "Banking"),
            ("ICICIBANK", "ICICI Bank", Nse, "Banking"),
            ("INFY", "Infosys", Nse, "IT"),
            ("SBIN", "State Bank of India", Nse, "Banking"),
            ("BHARTIARTL", "Bharti Airtel", Nse, "Telecom"),
            ("HINDUNILVR", "Hindustan Unilever", Nse, "FMCG"),
            ("ITC", "ITC", Nse, "FMCG"),
            ("KOTAKBANK", "Kotak Mahindra Bank", Nse, "Banking"),
            ("LT", "Larsen & Toubro", Nse, "Infrastructure"),
            ("AXISBANK", "Axis Bank", Nse, "Banking"),
            ("BAJFINANCE", "Bajaj Finance", Nse, "Financial Services"),
            ("MARUTI", "Maruti Suzuki", Nse, "Auto"),
            ("M&M", "Mahindra & Mahindra", Nse, "Auto"),
            ("TATAMOTORS", "Tata Motors", Nse, "Auto"),
            ("SUNPHARMA", "Sun Pharmaceutical", Nse, "Pharma"),
            ("DRREDDY", "Dr. Reddy's Laboratories", Nse, "Pharma"),
            ("CIPLA", "Cipla", Nse, "Pharma"),
            ("TATASTEEL", "Tata Steel", Nse, "Metals"),
            ("JSWSTEEL", "JSW Steel", Nse, "Metals"),
            ("WIPRO", "Wipro", Nse, "IT"),
            ("HCLTECH", "HCL Technologies", Nse, "IT"),
            ("ULTRACEMCO", "UltraTech Cement", Nse, "Cement"),
            ("ASIANPAINT", "Asian Paints", Nse, "Consumer"),
            ("NESTLEIND", "Nestle India", Nse, "FMCG"),
            ("ADANIENT", "Adani Enterprises", Nse, "Conglomerate"),
            ("ONGC", "Oil and Natural Gas Corporation", Nse, "Energy"),
            ("NTPC", "NTPC", Nse, "Power"),
            ("POWERGRID", "Power Grid Corporation", Nse, "Power"),
            ("YESBANK", "Yes Bank", Bse, "Banking"),
            ("SUZLON", "Suzlon Energy", Bse, "Power"),
            ("IDEA", "Vodafone Idea", Bse, "Telecom"),
        ]
        .into_iter()
        .map(|(symbol, name, venue, sector)| Instrument::new(symbol, name, venue, Some(sector)))
        .collect();

        let company_names = [
            ("reliance", "RELIANCE"),
            ("tata consultancy", "TCS"),
            ("hdfc bank", "HDFCBANK"),
            ("hdfc", "HDFCBANK"),
            ("icici", "ICICIBANK"),
            ("infosys", "INFY"),
            ("state bank", "SBIN"),
            ("sbi", "SBIN"),
            ("airtel", "BHARTIARTL"),
            ("hindustan unilever", "HINDUNILVR"),
            ("itc", "ITC"),
            ("kotak", "KOTAKBANK"),
            ("larsen", "LT"),
            ("l&t", "LT"),
            ("axis bank", "AXISBANK"),
            ("bajaj finance", "BAJFINANCE"),
            ("maruti", "MARUTI"),
            ("mahindra", "M&M"),
            ("tata motors", "TATAMOTORS"),
            ("sun pharma", "SUNPHARMA"),
            ("dr reddy", "DRREDDY"),
            ("cipla", "CIPLA"),
            ("tata steel", "TATASTEEL"),
            ("jsw steel", "JSWSTEEL"),
            ("wipro", "WIPRO"),
            ("hcl tech", "HCLTECH"),
            ("ultratech", "ULTRACEMCO"),
            ("asian paints", "ASIANPAINT"),
            ("nestle", "NESTLEIND"),
            ("adani", "ADANIENT"),
            ("ongc", "ONGC"),
            ("ntpc", "NTPC"),
            ("power grid", "POWERGRID"),
            ("yes bank", "YESBANK"),
            ("suzlon", "SUZLON"),
            ("vodafone idea", "IDEA"),
        ];

        let sector_proxies = [
            ("banking", "HDFCBANK"),
            ("bank", "HDFCBANK"),
            ("banks", "HDFCBANK"),
            ("lenders", "HDFCBANK"),
            ("nbfc", "BAJFINANCE"),
            ("it sector", "TCS"),
            ("it services", "TCS"),
            ("software", "TCS"),
            ("technology", "TCS"),
            ("oil", "RELIANCE"),
            ("energy", "RELIANCE"),
            ("crude", "RELIANCE"),
            ("pharma", "SUNPHARMA"),
            ("pharmaceutical", "SUNPHARMA"),
            ("auto", "MARUTI"),
            ("automobile", "MARUTI"),
            ("telecom", "BHARTIARTL"),
            ("fmcg", "HINDUNILVR"),
            ("steel", "TATASTEEL"),
            ("metal", "TATASTEEL"),
            ("metals", "TATASTEEL"),
            ("cement", "ULTRACEMCO"),
            ("power", "NTPC"),
            ("infrastructure", "LT"),
        ];

        let stop_words = [
            "THE", "AND", "FOR", "ARE", "BUT", "NOT", "YOU", "ALL", "CAN", "HAS", "HAD", "WAS",
            "ONE", "OUR", "OUT", "NEW", "NOW", "WHO", "WHY", "HOW", "WITH", "FROM", "THIS",
            "THAT", "WILL", "HAVE", "BEEN", "INTO", "OVER", "AFTER", "ABOUT", "AMID", "SAYS",
            "NEWS", "STOCK", "STOCKS", "MARKET", "MARKETS", "SHARE", "SHARES", "PRICE", "TODAY",
            "WEEK", "YEAR", "BREAKING", "UPDATE", "LIVE", "RBI", "SEBI", "GDP", "IPO", "CEO",
            "CFO", "USD", "INR", "FII", "DII", "EPS", "YOY", "QOQ", "NSE", "BSE", "SENSEX",
            "ETF", "FED", "RATE", "RATES", "BANK", "PROFIT", "LOSS", "INDIA", "GOVT",
        ];

        let bullish = [
            "profit", "profits", "record", "growth", "surge", "surges", "surged", "rally",
            "rallies", "gain", "gains", "jump", "jumps", "soar", "soars", "beat", "beats",
            "upgrade", "upgraded", "outperform", "strong", "expansion", "expands", "buyback",
            "dividend", "bonus", "wins", "approval", "approved", "rise", "rises", "boost",
            "optimism", "recovery", "all time high",
        ];

        let bearish = [
            "loss", "losses", "decline", "declines", "fall", "falls", "fell", "drop", "drops",
            "plunge", "plunges", "slump", "crash", "downgrade", "downgraded", "underperform",
            "weak", "weakness", "pressure", "concern", "concerns", "probe", "fraud", "penalty",
            "miss", "misses", "cut", "cuts", "layoffs", "default", "selloff", "sell off",
            "slowdown", "resigns", "lawsuit", "ban",
        ];

        let sector_risk = [
            ("Banking", RiskLevel::Medium),
            ("Financial Services", RiskLevel::Medium),
            ("IT", RiskLevel::Medium),
            ("Energy", RiskLevel::Medium),
            ("Telecom", RiskLevel::Medium),
            ("FMCG", RiskLevel::Low),
            ("Consumer", RiskLevel::Low),
            ("Power", RiskLevel::Low),
            ("Pharma", RiskLevel::Medium),
            ("Auto", RiskLevel::Medium),
            ("Cement", RiskLevel::Medium),
            ("Infrastructure", RiskLevel::Medium),
            ("Metals", RiskLevel::High),
            ("Conglomerate", RiskLevel::High),
        ];

        Self {
            universe,
            company_names: to_map(&company_names),
            sector_proxies: to_map(&sector_proxies),
            default_symbol: "NIFTY".into(),
            stop_words: stop_words.iter().map(|s| s.to_string()).collect(),
            bullish_keywords: bullish.iter().map(|s| s.to_string()).collect(),
            bearish_keywords: bearish.iter().map(|s| s.to_string()).collect(),
            sector_risk: sector_risk
                .iter()
                .map(|(k, v)| (k.to_string(), *v))
                .collect(),
        }
    }
}

fn to_map(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}
