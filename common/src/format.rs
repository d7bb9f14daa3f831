use chrono::{DateTime, NaiveDate, Utc};

/// Timestamps above this are taken to be milliseconds rather than seconds.
const MILLIS_THRESHOLD: u64 = 1_000_000_000_000;

/// Shorten an address for display: `0x03ea...8FaC`.
pub fn shorten_address(address: &str) -> String {
    let chars: Vec<char> = address.chars().collect();
    if chars.len() <= 10 {
        return address.to_string();
    }
    let start: String = chars[..6].iter().collect();
    let end: String = chars[chars.len() - 4..].iter().collect();
    format!("{start}...{end}")
}

/// Format a Unix timestamp as `dd/mm/yyyy` (UTC), or `-` when unset.
pub fn format_date_from_seconds(ts: Option<u64>) -> String {
    let Some(ts) = ts.filter(|ts| *ts > 0) else {
        return "-".into();
    };
    let secs = if ts > MILLIS_THRESHOLD { ts / 1000 } else { ts };
    i64::try_from(secs)
        .ok()
        .and_then(|s| DateTime::<Utc>::from_timestamp(s, 0))
        .map(|dt| dt.format("%d/%m/%Y").to_string())
        .unwrap_or_else(|| "-".into())
}

/// Parse a `YYYY-MM-DD` form date into Unix seconds at UTC midnight.
pub fn to_timestamp(date: &str) -> Option<u64> {
    let date = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d").ok()?;
    let secs = date.and_hms_opt(0, 0, 0)?.and_utc().timestamp();
    u64::try_from(secs).ok()
}

/// Avatar initials for a product or person name.
pub fn initials(name: &str) -> String {
    let mut words = name.split_whitespace();
    match (words.next(), words.next()) {
        (None, _) => "?".into(),
        (Some(only), None) => only.chars().take(2).collect::<String>().to_uppercase(),
        (Some(first), Some(second)) => first
            .chars()
            .take(1)
            .chain(second.chars().take(1))
            .collect::<String>()
            .to_uppercase(),
    }
}

/// Format an on-chain price with `.` thousands separators, e.g. `150.000 VND`.
pub fn format_price(amount: u64) -> String {
    let digits = amount.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 4);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(c);
    }
    out.push_str(" VND");
    out
}
