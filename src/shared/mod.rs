//! Shared newtypes and utilities used across all feed modules.
//!
//! These types are serialization-transparent: they serialize/deserialize
//! identically to the raw format the oracle and the charting widget use, so
//! they can be used directly in wire types without conversion overhead.

pub mod time;
pub mod transform;

pub use time::{current_candle_time, Clock, SystemClock};
pub use transform::{bar_time_to_millis, multiply_bar_values, parse_symbol_name, ParsedSymbol};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::str::FromStr;

// ─── ListenerId ──────────────────────────────────────────────────────────────

/// Opaque subscription token supplied by the charting widget.
///
/// The widget uses it to correlate a live bar subscription with its callback;
/// the adapter uses it as the registry key. Never parsed or interpreted.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ListenerId(String);

impl ListenerId {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ListenerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ListenerId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ListenerId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl FromStr for ListenerId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(ListenerId(s.to_string()))
    }
}

impl Serialize for ListenerId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for ListenerId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(ListenerId(s))
    }
}

// ─── ChainId ─────────────────────────────────────────────────────────────────

/// Numeric chain identifier (e.g. 42161 for Arbitrum).
///
/// Serializes transparently as a JSON number. Can be used as a HashMap key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChainId(pub u64);

impl ChainId {
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for ChainId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for ChainId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

// ─── ProductVersion ──────────────────────────────────────────────────────────

/// Which generation of the trade page the feed serves.
///
/// V1 reads from the legacy stats service, V2 from the oracle keeper. The
/// two also differ in which chart resolutions they support.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProductVersion {
    #[serde(rename = "v1")]
    V1,
    #[default]
    #[serde(rename = "v2")]
    V2,
}

impl ProductVersion {
    pub fn supported_resolutions(&self) -> &'static [Resolution] {
        match self {
            Self::V1 => &[
                Resolution::Minute5,
                Resolution::Minute15,
                Resolution::Hour1,
                Resolution::Hour4,
                Resolution::Day1,
            ],
            Self::V2 => &[
                Resolution::Minute1,
                Resolution::Minute5,
                Resolution::Minute15,
                Resolution::Hour1,
                Resolution::Hour4,
                Resolution::Day1,
                Resolution::Week1,
                Resolution::Month1,
            ],
        }
    }

    pub fn supports(&self, resolution: Resolution) -> bool {
        self.supported_resolutions().contains(&resolution)
    }
}

// ─── Resolution ──────────────────────────────────────────────────────────────

/// Chart candle resolution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Resolution {
    #[default]
    #[serde(rename = "1m")]
    Minute1,
    #[serde(rename = "5m")]
    Minute5,
    #[serde(rename = "15m")]
    Minute15,
    #[serde(rename = "1h")]
    Hour1,
    #[serde(rename = "4h")]
    Hour4,
    #[serde(rename = "1d")]
    Day1,
    #[serde(rename = "1w")]
    Week1,
    #[serde(rename = "1M")]
    Month1,
}

impl Resolution {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Minute1 => "1m",
            Self::Minute5 => "5m",
            Self::Minute15 => "15m",
            Self::Hour1 => "1h",
            Self::Hour4 => "4h",
            Self::Day1 => "1d",
            Self::Week1 => "1w",
            Self::Month1 => "1M",
        }
    }

    /// Duration of one candle in seconds. The one-month bucket is fixed at
    /// 30 days, matching the oracle's bucketing.
    pub fn seconds(&self) -> u64 {
        match self {
            Self::Minute1 => 60,
            Self::Minute5 => 300,
            Self::Minute15 => 900,
            Self::Hour1 => 3600,
            Self::Hour4 => 14400,
            Self::Day1 => 86400,
            Self::Week1 => 604800,
            Self::Month1 => 2592000,
        }
    }

    /// Resolution string in the charting widget's convention
    /// (minutes as bare numbers, larger buckets with a letter suffix).
    pub fn as_tv(&self) -> &'static str {
        match self {
            Self::Minute1 => "1",
            Self::Minute5 => "5",
            Self::Minute15 => "15",
            Self::Hour1 => "60",
            Self::Hour4 => "240",
            Self::Day1 => "1D",
            Self::Week1 => "1W",
            Self::Month1 => "1M",
        }
    }

    /// Parse a widget-convention resolution string.
    pub fn from_tv(s: &str) -> Option<Self> {
        match s {
            "1" => Some(Self::Minute1),
            "5" => Some(Self::Minute5),
            "15" => Some(Self::Minute15),
            "60" => Some(Self::Hour1),
            "240" => Some(Self::Hour4),
            "1D" => Some(Self::Day1),
            "1W" => Some(Self::Week1),
            "1M" => Some(Self::Month1),
            _ => None,
        }
    }
}

impl std::fmt::Display for Resolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listener_id_serde() {
        let id = ListenerId::from("pane-1_BTC_#_USD_1");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"pane-1_BTC_#_USD_1\"");
        let back: ListenerId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, back);
    }

    #[test]
    fn test_resolution_serde() {
        let r: Resolution = serde_json::from_str("\"4h\"").unwrap();
        assert_eq!(r, Resolution::Hour4);
        assert_eq!(r.seconds(), 14400);
        // "1m" and "1M" are distinct buckets
        let minute: Resolution = serde_json::from_str("\"1m\"").unwrap();
        let month: Resolution = serde_json::from_str("\"1M\"").unwrap();
        assert_eq!(minute, Resolution::Minute1);
        assert_eq!(month, Resolution::Month1);
    }

    #[test]
    fn test_resolution_tv_roundtrip() {
        for r in ProductVersion::V2.supported_resolutions() {
            assert_eq!(Resolution::from_tv(r.as_tv()), Some(*r));
        }
        assert_eq!(Resolution::from_tv("13"), None);
    }

    #[test]
    fn test_v1_resolutions_are_a_subset_of_v2() {
        for r in ProductVersion::V1.supported_resolutions() {
            assert!(ProductVersion::V2.supports(*r));
        }
        assert!(!ProductVersion::V1.supports(Resolution::Minute1));
        assert!(!ProductVersion::V1.supports(Resolution::Week1));
    }
}
