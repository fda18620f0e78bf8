//! Network URL constants for the candle feed.

/// Default oracle keeper base URL (V2 candle source).
pub const DEFAULT_ORACLE_URL: &str = "https://oracle.example.exchange";

/// Default legacy stats base URL (V1 candle source).
pub const DEFAULT_STATS_URL: &str = "https://stats.example.exchange";
