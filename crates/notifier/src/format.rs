//! HTML message formatting for Telegram (`parse_mode = "HTML"`).

use chrono::{TimeZone, Utc};

use fundsentry_common::types::EnhancedTransaction;

const LAMPORTS_PER_SOL: f64 = 1_000_000_000.0;

/// Transfers listed per message; the rest are summarized as a count.
const MAX_TRANSFER_LINES: usize = 5;

/// Caps on remote-supplied text, applied before HTML escaping (which can grow text up to
/// five times). Together with the transfer cap they keep an alert below Telegram's
/// 4096-character message limit.
const MAX_DESCRIPTION_CHARS: usize = 300;
const MAX_LABEL_CHARS: usize = 64;

/// Escape the three characters Telegram's HTML parse mode treats specially.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}

pub fn test_message() -> String {
    "<b>FundSentry test message</b>\n\n\
     This is a test message. If you can read it, your Telegram notification settings are correct!"
        .to_string()
}

/// Shorten a base58 address to `abcd…wxyz` for display.
pub fn short_address(address: &str) -> String {
    let chars: Vec<char> = address.chars().collect();
    if chars.len() <= 12 {
        return address.to_string();
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}…{}", head, tail)
}

/// Cut `text` to at most `max` characters, marking the cut with `…`.
pub fn truncate_chars(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(1)).collect();
    format!("{}…", kept)
}

pub fn lamports_to_sol(lamports: u64) -> f64 {
    lamports as f64 / LAMPORTS_PER_SOL
}

/// Format an enhanced transaction delivered by the webhook into an alert message.
pub fn transaction_alert(tx: &EnhancedTransaction) -> String {
    let tx_type = tx.tx_type.as_deref().unwrap_or("UNKNOWN");
    let mut lines = vec![format!(
        "<b>🔔 {}</b>",
        escape_html(&truncate_chars(tx_type, MAX_LABEL_CHARS))
    )];

    if let Some(source) = tx.source.as_deref().filter(|s| !s.is_empty()) {
        lines.push(format!(
            "<b>Source:</b> {}",
            escape_html(&truncate_chars(source, MAX_LABEL_CHARS))
        ));
    }

    if let Some(description) = tx.description.as_deref().filter(|s| !s.is_empty()) {
        lines.push(escape_html(&truncate_chars(description, MAX_DESCRIPTION_CHARS)));
    }

    if let Some(fee_payer) = tx.fee_payer.as_deref() {
        lines.push(format!(
            "<b>Fee payer:</b> <code>{}</code>",
            escape_html(&truncate_chars(fee_payer, MAX_LABEL_CHARS))
        ));
    }

    let mut transfers: Vec<String> = Vec::new();
    for t in &tx.native_transfers {
        if t.amount == 0 {
            continue;
        }
        transfers.push(format!(
            "{} → {}: {:.4} SOL",
            escape_html(&short_address(t.from_user_account.as_deref().unwrap_or("?"))),
            escape_html(&short_address(t.to_user_account.as_deref().unwrap_or("?"))),
            lamports_to_sol(t.amount)
        ));
    }
    for t in &tx.token_transfers {
        transfers.push(format!(
            "{} → {}: {} of <code>{}</code>",
            escape_html(&short_address(t.from_user_account.as_deref().unwrap_or("?"))),
            escape_html(&short_address(t.to_user_account.as_deref().unwrap_or("?"))),
            t.token_amount,
            escape_html(&short_address(&t.mint))
        ));
    }

    if !transfers.is_empty() {
        lines.push(String::new());
        lines.push("<b>Transfers:</b>".to_string());
        let total = transfers.len();
        lines.extend(transfers.into_iter().take(MAX_TRANSFER_LINES));
        if total > MAX_TRANSFER_LINES {
            lines.push(format!("…and {} more", total - MAX_TRANSFER_LINES));
        }
    }

    lines.push(String::new());
    if let Some(ts) = tx.timestamp.and_then(|ts| Utc.timestamp_opt(ts, 0).single()) {
        lines.push(format!("<i>{}</i>", ts.format("%Y-%m-%d %H:%M:%S UTC")));
    }
    if !tx.signature.is_empty() {
        lines.push(format!(
            "<a href=\"https://solscan.io/tx/{}\">View on Solscan</a>",
            escape_html(&tx.signature)
        ));
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use fundsentry_common::types::{NativeTransfer, TokenTransfer};

    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("a < b & c > d"), "a &lt; b &amp; c &gt; d");
        assert_eq!(escape_html("plain"), "plain");
    }

    #[test]
    fn test_short_address() {
        assert_eq!(
            short_address("FZLcJWN6X6X4DFzn97YT5jMQR8ZYKzkSreHT8DHMYGcB"),
            "FZLc…YGcB"
        );
        assert_eq!(short_address("short"), "short");
    }

    #[test]
    fn test_transaction_alert_contents() {
        let tx = EnhancedTransaction {
            signature: "5sig".to_string(),
            tx_type: Some("SWAP".to_string()),
            source: Some("JUPITER".to_string()),
            description: Some("A swapped 1 SOL for <lots> of BONK".to_string()),
            timestamp: Some(1_700_000_000),
            fee_payer: Some("FZLcJWN6X6X4DFzn97YT5jMQR8ZYKzkSreHT8DHMYGcB".to_string()),
            fee: Some(5000),
            native_transfers: vec![NativeTransfer {
                from_user_account: Some("FZLcJWN6X6X4DFzn97YT5jMQR8ZYKzkSreHT8DHMYGcB".into()),
                to_user_account: Some("EsgSUx7XcFxBTUjmYMNMFyuCGmXPPR8YzFG1hQZDK4XL".into()),
                amount: 1_500_000_000,
            }],
            token_transfers: vec![TokenTransfer {
                from_user_account: None,
                to_user_account: Some("EsgSUx7XcFxBTUjmYMNMFyuCGmXPPR8YzFG1hQZDK4XL".into()),
                mint: "DezXAZ8z7PnrnRJjz3wXBoRgixCa6xjnB7YaB1pPB263".into(),
                token_amount: 42.5,
            }],
        };

        let msg = transaction_alert(&tx);
        assert!(msg.starts_with("<b>🔔 SWAP</b>"));
        assert!(msg.contains("<b>Source:</b> JUPITER"));
        assert!(msg.contains("&lt;lots&gt;"));
        assert!(msg.contains("FZLc…YGcB → EsgS…K4XL: 1.5000 SOL"));
        assert!(msg.contains("? → EsgS…K4XL: 42.5 of <code>DezX…B263</code>"));
        assert!(msg.contains("2023-11-14 22:13:20 UTC"));
        assert!(msg.contains("https://solscan.io/tx/5sig"));
    }

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("short", 10), "short");
        assert_eq!(truncate_chars("exactly10!", 10), "exactly10!");
        assert_eq!(truncate_chars("abcdefghijk", 5), "abcd…");
        assert_eq!(truncate_chars("ééééééé", 3), "éé…");
    }

    #[test]
    fn test_long_description_fits_telegram_limit() {
        let tx = EnhancedTransaction {
            signature: "5sig".to_string(),
            tx_type: Some("T".repeat(500)),
            source: Some("S".repeat(500)),
            description: Some("<&>".repeat(5000)),
            fee_payer: Some("FZLcJWN6X6X4DFzn97YT5jMQR8ZYKzkSreHT8DHMYGcB".to_string()),
            native_transfers: (0..20)
                .map(|i| NativeTransfer {
                    from_user_account: Some(format!("from{i}")),
                    to_user_account: Some(format!("to{i}")),
                    amount: 1,
                })
                .collect(),
            timestamp: Some(1_700_000_000),
            ..Default::default()
        };

        let msg = transaction_alert(&tx);
        assert!(msg.chars().count() <= 4096, "alert is {} chars", msg.chars().count());
        assert!(msg.contains("…"));
        assert!(msg.contains("https://solscan.io/tx/5sig"));
    }

    #[test]
    fn test_transfer_list_truncated() {
        let tx = EnhancedTransaction {
            signature: "s".to_string(),
            native_transfers: (0..8)
                .map(|i| NativeTransfer {
                    from_user_account: Some(format!("from{i}")),
                    to_user_account: Some(format!("to{i}")),
                    amount: 1,
                })
                .collect(),
            ..Default::default()
        };

        let msg = transaction_alert(&tx);
        assert!(msg.starts_with("<b>🔔 UNKNOWN</b>"));
        assert!(msg.contains("from4 → to4"));
        assert!(!msg.contains("from5 → to5"));
        assert!(msg.contains("…and 3 more"));
    }
}
