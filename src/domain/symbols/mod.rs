//! Symbol domain — per-chain token registry and resolved symbol metadata.
//!
//! The registry is a static table: which symbols exist on a chain, which are
//! stable (pegged) assets, which have chart data at the oracle, and which
//! carry a default visual multiplier. The native token doubles as the
//! fallback for symbols the chart cannot serve.

use lazy_static::lazy_static;
use serde::Serialize;
use std::collections::HashMap;

use crate::shared::ChainId;

/// Arbitrum One.
pub const ARBITRUM: ChainId = ChainId(42161);
/// Avalanche C-Chain.
pub const AVALANCHE: ChainId = ChainId(43114);

/// Static token registry entry.
#[derive(Debug, Clone)]
pub struct Token {
    pub symbol: &'static str,
    pub is_stable: bool,
    /// Whether the oracle serves candles for this token.
    pub has_chart_data: bool,
    /// Default display multiplier for sub-cent assets (1 = none).
    pub visual_multiplier: u32,
}

impl Token {
    const fn new(symbol: &'static str) -> Self {
        Self {
            symbol,
            is_stable: false,
            has_chart_data: true,
            visual_multiplier: 1,
        }
    }

    const fn stable(symbol: &'static str) -> Self {
        Self {
            symbol,
            is_stable: true,
            has_chart_data: true,
            visual_multiplier: 1,
        }
    }

    const fn scaled(symbol: &'static str, visual_multiplier: u32) -> Self {
        Self {
            symbol,
            is_stable: false,
            has_chart_data: true,
            visual_multiplier,
        }
    }

    const fn unlisted(symbol: &'static str) -> Self {
        Self {
            symbol,
            is_stable: false,
            has_chart_data: false,
            visual_multiplier: 1,
        }
    }
}

lazy_static! {
    static ref TOKENS: HashMap<ChainId, Vec<Token>> = {
        let mut m = HashMap::new();
        m.insert(
            ARBITRUM,
            vec![
                Token::new("ETH"),
                Token::new("BTC"),
                Token::new("SOL"),
                Token::new("LINK"),
                Token::new("ARB"),
                Token::new("UNI"),
                Token::scaled("PEPE", 1000),
                Token::scaled("BONK", 1000),
                Token::stable("USDC"),
                Token::stable("USDT"),
                Token::stable("DAI"),
                // listed for swaps but the oracle has no candle series
                Token::unlisted("wstETH"),
            ],
        );
        m.insert(
            AVALANCHE,
            vec![
                Token::new("AVAX"),
                Token::new("ETH"),
                Token::new("BTC"),
                Token::scaled("WIF", 1000),
                Token::stable("USDC"),
                Token::stable("USDT"),
            ],
        );
        m
    };
}

/// The chain's gas token, used as the chart fallback symbol.
pub fn native_token(chain: ChainId) -> &'static Token {
    let symbol = match chain {
        AVALANCHE => "AVAX",
        _ => "ETH",
    };
    // the native symbol is always present in its chain's table
    token_by_symbol(chain, symbol).unwrap_or(&FALLBACK_NATIVE)
}

static FALLBACK_NATIVE: Token = Token::new("ETH");

/// Look up a token by symbol on a chain.
pub fn token_by_symbol(chain: ChainId, symbol: &str) -> Option<&'static Token> {
    TOKENS
        .get(&chain)
        .and_then(|tokens| tokens.iter().find(|t| t.symbol == symbol))
}

/// Whether the chart can be drawn for this symbol on this chain.
pub fn is_chart_available(chain: ChainId, symbol: &str) -> bool {
    token_by_symbol(chain, symbol).is_some_and(|t| t.has_chart_data)
}

/// Display prefix for a scaled token (e.g. `"1000"` in `1000PEPE / USD`).
pub fn visual_multiplier_prefix(multiplier: u32) -> String {
    if multiplier == 1 {
        String::new()
    } else {
        multiplier.to_string()
    }
}

// ─── SymbolInfo ──────────────────────────────────────────────────────────────

/// Resolved identity for a tradeable pair, in the shape the charting widget
/// consumes. Built once per `resolve_symbol` call, immutable thereafter.
#[derive(Debug, Clone, Serialize)]
pub struct SymbolInfo {
    pub name: String,
    pub ticker: String,
    pub description: String,
    pub session: &'static str,
    pub timezone: &'static str,
    pub currency_code: &'static str,
    pub data_status: &'static str,
    pub minmov: u32,
    pub pricescale: u32,
    pub has_intraday: bool,
    pub has_daily: bool,
    /// Display-only scaling factor carried through to bar delivery.
    pub visual_multiplier: u32,
    /// Pegged assets chart as a constant and skip the candle source.
    pub is_stable: bool,
}

impl SymbolInfo {
    pub(crate) fn for_token(token: &Token, visual_multiplier: u32) -> Self {
        let prefix = visual_multiplier_prefix(visual_multiplier);
        Self {
            name: token.symbol.to_string(),
            ticker: token.symbol.to_string(),
            description: format!("{}{} / USD", prefix, token.symbol),
            session: "24x7",
            timezone: "Etc/UTC",
            currency_code: "USD",
            data_status: "streaming",
            minmov: 1,
            pricescale: if token.is_stable { 10 } else { 0 },
            has_intraday: true,
            has_daily: true,
            visual_multiplier,
            is_stable: token.is_stable,
        }
    }
}
