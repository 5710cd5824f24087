//! Centralized column name constants
//!
//! Header names of the transfer export. They must match the file verbatim,
//! including the arrow in the metadata columns.

pub const ORIGIN_TIMESTAMP: &str = "origin_timestamp";
pub const FROM_ASSET_AMOUNT_USD: &str = "from_asset_amount_usd";
pub const FROM_CHAIN_NAME: &str = "from_chain_name";
pub const TO_CHAIN_NAME: &str = "to_chain_name";
pub const FROM_ASSET_SYMBOL: &str = "from_asset_symbol";

// Actor metadata
pub const MARKET_MAKER_INITIATOR: &str =
    "Market Maker Metadata - origin_initiator → Name";
pub const REBALANCER_INITIATOR: &str =
    "Rebalancers Metadata - origin_initiator → Name";

pub const MARKET_MAKER_BOT: &str = "Market Maker Bot";

/// Columns every aggregation reads regardless of configuration.
pub const REQUIRED: [&str; 5] = [
    ORIGIN_TIMESTAMP,
    FROM_ASSET_AMOUNT_USD,
    FROM_CHAIN_NAME,
    TO_CHAIN_NAME,
    FROM_ASSET_SYMBOL,
];
