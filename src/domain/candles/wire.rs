//! Wire types for the two candle HTTP sources.

use serde::Deserialize;

use super::Bar;

/// One candle in the oracle keeper's compact array form:
/// `[time, open, high, low, close]`.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct WireCandle(pub u64, pub f64, pub f64, pub f64, pub f64);

impl From<WireCandle> for Bar {
    fn from(c: WireCandle) -> Self {
        Bar {
            time: c.0,
            open: c.1,
            high: c.2,
            low: c.3,
            close: c.4,
        }
    }
}

/// Oracle keeper `/prices/candles` response. Candles arrive newest-first.
#[derive(Debug, Clone, Deserialize)]
pub struct OracleCandlesResponse {
    pub period: String,
    pub candles: Vec<WireCandle>,
}

/// One candle in the legacy stats service's object form.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct StatsCandle {
    pub t: u64,
    pub o: f64,
    pub h: f64,
    pub l: f64,
    pub c: f64,
}

impl From<StatsCandle> for Bar {
    fn from(c: StatsCandle) -> Self {
        Bar {
            time: c.t,
            open: c.o,
            high: c.h,
            low: c.l,
            close: c.c,
        }
    }
}

/// Legacy stats `/api/candles/{symbol}` response. Prices arrive oldest-first.
#[derive(Debug, Clone, Deserialize)]
pub struct StatsPricesResponse {
    pub period: String,
    pub prices: Vec<StatsCandle>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_oracle_response_deserializes_array_candles() {
        let json = r#"{
            "period": "1m",
            "candles": [
                [1700000060, 2001.0, 2002.5, 2000.0, 2001.5],
                [1700000000, 2000.0, 2001.0, 1999.0, 2001.0]
            ]
        }"#;
        let resp: OracleCandlesResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.period, "1m");
        assert_eq!(resp.candles.len(), 2);
        let bar = Bar::from(resp.candles[0]);
        assert_eq!(bar.time, 1_700_000_060);
        assert_eq!(bar.high, 2002.5);
    }

    #[test]
    fn test_stats_response_deserializes_object_candles() {
        let json = r#"{
            "period": "1h",
            "prices": [
                {"t": 1700000000, "o": 1.0, "h": 2.0, "l": 0.5, "c": 1.5}
            ]
        }"#;
        let resp: StatsPricesResponse = serde_json::from_str(json).unwrap();
        let bar = Bar::from(resp.prices[0]);
        assert_eq!(bar.time, 1_700_000_000);
        assert_eq!(bar.close, 1.5);
    }
}
