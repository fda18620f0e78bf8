//! Pure bar/symbol transforms applied at the widget boundary.
//!
//! No async, no network calls. The visual multiplier is a display-only
//! scaling factor (e.g. showing sub-cent prices as whole numbers); it never
//! touches the raw bars the subscription timer tracks.

use crate::domain::candles::Bar;

/// Scale a bar's OHLC values by a symbol's visual multiplier.
pub fn multiply_bar_values(bar: Bar, multiplier: u32) -> Bar {
    let m = multiplier as f64;
    Bar {
        time: bar.time,
        open: bar.open * m,
        high: bar.high * m,
        low: bar.low * m,
        close: bar.close * m,
    }
}

/// Convert a bar's time from epoch seconds to epoch milliseconds.
///
/// The oracle speaks seconds, the charting widget expects milliseconds.
pub fn bar_time_to_millis(bar: Bar) -> Bar {
    Bar {
        time: bar.time * 1000,
        ..bar
    }
}

/// Full raw-to-widget transform: scale, then switch the time unit.
pub fn to_chart_bar(bar: Bar, multiplier: u32) -> Bar {
    bar_time_to_millis(multiply_bar_values(bar, multiplier))
}

// ─── Symbol name parsing ─────────────────────────────────────────────────────

/// Result of splitting a requested chart symbol into its base symbol and
/// visual multiplier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedSymbol {
    pub symbol: String,
    pub visual_multiplier: u32,
}

/// Parse an optional `*<multiplier>` suffix from a requested symbol name.
///
/// `"PEPE*1000"` parses to base `PEPE` with multiplier 1000; a bare `"BTC"`
/// (or a malformed suffix) yields multiplier 1 with the name untouched.
pub fn parse_symbol_name(name_with_multiplier: &str) -> ParsedSymbol {
    if let Some((base, suffix)) = name_with_multiplier.split_once('*') {
        if let Ok(multiplier) = suffix.parse::<u32>() {
            if multiplier >= 1 && !base.is_empty() {
                return ParsedSymbol {
                    symbol: base.to_string(),
                    visual_multiplier: multiplier,
                };
            }
        }
    }

    ParsedSymbol {
        symbol: name_with_multiplier.to_string(),
        visual_multiplier: 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(time: u64, v: f64) -> Bar {
        Bar {
            time,
            open: v,
            high: v + 1.0,
            low: v - 1.0,
            close: v + 0.5,
        }
    }

    #[test]
    fn test_multiply_bar_values() {
        let scaled = multiply_bar_values(bar(100, 2.0), 1000);
        assert_eq!(scaled.time, 100);
        assert_eq!(scaled.open, 2000.0);
        assert_eq!(scaled.high, 3000.0);
        assert_eq!(scaled.low, 1000.0);
        assert_eq!(scaled.close, 2500.0);
    }

    #[test]
    fn test_multiplier_of_one_is_identity() {
        let b = bar(100, 2.0);
        assert_eq!(multiply_bar_values(b.clone(), 1), b);
    }

    #[test]
    fn test_bar_time_to_millis() {
        let b = bar_time_to_millis(bar(1_700_000_000, 2.0));
        assert_eq!(b.time, 1_700_000_000_000);
        assert_eq!(b.open, 2.0);
    }

    #[test]
    fn test_parse_symbol_name_with_multiplier() {
        assert_eq!(
            parse_symbol_name("PEPE*1000"),
            ParsedSymbol {
                symbol: "PEPE".to_string(),
                visual_multiplier: 1000,
            }
        );
    }

    #[test]
    fn test_parse_symbol_name_bare() {
        assert_eq!(
            parse_symbol_name("BTC"),
            ParsedSymbol {
                symbol: "BTC".to_string(),
                visual_multiplier: 1,
            }
        );
    }

    #[test]
    fn test_parse_symbol_name_malformed_suffix() {
        // Non-numeric or empty pieces fall back to the untouched name.
        assert_eq!(parse_symbol_name("BTC*").symbol, "BTC*");
        assert_eq!(parse_symbol_name("BTC*x").visual_multiplier, 1);
        assert_eq!(parse_symbol_name("*1000").symbol, "*1000");
    }
}
