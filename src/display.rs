//! Display formatting for prices, times, dates and carriers

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Airline name for an IATA carrier code; unknown codes are returned unchanged
pub fn airline_name(code: &str) -> &str {
    match code.trim() {
        "TK" => "Turkish Airlines",
        "UA" => "United Airlines",
        "AA" => "American Airlines",
        "DL" => "Delta Airlines",
        "BA" => "British Airways",
        "LH" => "Lufthansa",
        "AF" => "Air France",
        "KL" => "KLM",
        "EK" => "Emirates",
        "QR" => "Qatar Airways",
        "SQ" => "Singapore Airlines",
        "AC" => "Air Canada",
        "NH" => "All Nippon Airways",
        "JL" => "Japan Airlines",
        "CX" => "Cathay Pacific",
        "QF" => "Qantas",
        "EY" => "Etihad Airways",
        "OS" => "Austrian Airlines",
        "LX" => "SWISS",
        "SK" => "SAS",
        "AZ" => "ITA Airways",
        "IB" => "Iberia",
        "TP" => "TAP Air Portugal",
        "SN" => "Brussels Airlines",
        "LO" => "LOT Polish Airlines",
        "OK" => "Czech Airlines",
        "A3" => "Aegean Airlines",
        "TG" => "Thai Airways",
        "SV" => "Saudia",
        "MS" => "EgyptAir",
        "ET" => "Ethiopian Airlines",
        "WN" => "Southwest Airlines",
        "B6" => "JetBlue",
        "NK" => "Spirit Airlines",
        "F9" => "Frontier Airlines",
        "AS" => "Alaska Airlines",
        _ => code,
    }
}

fn format_amount(amount: f64) -> String {
    if amount.fract() == 0.0 {
        format!("{:.0}", amount)
    } else {
        format!("{:.2}", amount)
    }
}

/// Format a price with its currency, e.g. `$250` or `CHF 99.50`
pub fn format_price(amount: f64, currency: &str) -> String {
    let amount = if amount.is_finite() { amount } else { 0.0 };
    let code = currency.trim().to_uppercase();
    let symbol = match code.as_str() {
        "USD" | "$" => Some("$"),
        "EUR" | "€" => Some("€"),
        "GBP" | "£" => Some("£"),
        "JPY" | "¥" => Some("¥"),
        _ => None,
    };
    match symbol {
        Some(symbol) => format!("{}{}", symbol, format_amount(amount)),
        None => format!("{} {}", code, format_amount(amount)),
    }
}

/// Format an ISO timestamp as `07:05 AM`.
///
/// Empty input renders `N/A`; anything unparseable is returned unchanged.
pub fn format_time_display(time: &str) -> String {
    let time = time.trim();
    if time.is_empty() {
        return "N/A".to_string();
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(time) {
        return dt.format("%I:%M %p").to_string();
    }

    // Amadeus style local timestamps carry no offset
    let prefix = time.get(..16).unwrap_or(time);
    match NaiveDateTime::parse_from_str(prefix, "%Y-%m-%dT%H:%M") {
        Ok(dt) => dt.format("%I:%M %p").to_string(),
        Err(_) => time.to_string(),
    }
}

/// Format a `YYYY-MM-DD` date as `Aug 15, 2025`.
///
/// Empty input renders empty; anything unparseable is returned unchanged.
pub fn format_date_display(date: &str) -> String {
    let date = date.trim();
    if date.is_empty() {
        return String::new();
    }
    match NaiveDate::parse_from_str(date, "%Y-%m-%d") {
        Ok(d) => d.format("%b %d, %Y").to_string(),
        Err(_) => date.to_string(),
    }
}
