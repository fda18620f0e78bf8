//! Domain modules (vertical slices): types, wire types, capabilities.

pub mod candles;
pub mod symbols;
