//! Static reference list of well-known "smart money" wallets.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SmartMoneyEntry {
    pub address: &'static str,
    pub label: &'static str,
    pub description: &'static str,
}

pub const SMART_MONEY_ADDRESSES: &[SmartMoneyEntry] = &[
    SmartMoneyEntry {
        address: "FZLcJWN6X6X4DFzn97YT5jMQR8ZYKzkSreHT8DHMYGcB",
        label: "Alameda Research",
        description: "Investment firm focused on crypto trading and liquidity provision",
    },
    SmartMoneyEntry {
        address: "EsgSUx7XcFxBTUjmYMNMFyuCGmXPPR8YzFG1hQZDK4XL",
        label: "Jump Crypto",
        description: "Global trading firm focused on crypto markets",
    },
    SmartMoneyEntry {
        address: "DYeNRU3BktPQvGYo5gKCW9mcpTHX1TocuJP7vLaWFqZW",
        label: "Multicoin Capital",
        description: "Well-known venture firm investing in blockchain and crypto",
    },
    SmartMoneyEntry {
        address: "CKcEkNNTPCU7hZxfQkT8RJ3G9jQmzJQtWBZTRMU9DxW5",
        label: "Pantera Capital",
        description: "One of the first US venture firms focused on Bitcoin",
    },
    SmartMoneyEntry {
        address: "J7RagMKwSD5zJSbRQZU56ypHUtux8LRDkUpAPSKH4WPB",
        label: "Solana Foundation",
        description: "Official foundation of the Solana blockchain network",
    },
];

/// Entries whose address, label or description contains `term` (case-insensitive).
/// A missing or blank term matches everything.
pub fn search(term: Option<&str>) -> Vec<SmartMoneyEntry> {
    let needle = term.map(str::trim).unwrap_or_default().to_lowercase();
    SMART_MONEY_ADDRESSES
        .iter()
        .filter(|entry| {
            needle.is_empty()
                || entry.address.to_lowercase().contains(&needle)
                || entry.label.to_lowercase().contains(&needle)
                || entry.description.to_lowercase().contains(&needle)
        })
        .copied()
        .collect()
}
