use crate::config::DISPLAY_DECIMAL_POINT;

/// Renders an atomic-unit amount with the network's decimal point
pub fn print_money(amount: u64) -> String {
    let mut s = amount.to_string();
    if s.len() < DISPLAY_DECIMAL_POINT + 1 {
        s.insert_str(0, &"0".repeat(DISPLAY_DECIMAL_POINT + 1 - s.len()));
    }
    s.insert(s.len() - DISPLAY_DECIMAL_POINT, '.');
    s
}

/// Parses a display-unit amount string into atomic units
///
/// Accepts an optional fractional part of up to `DISPLAY_DECIMAL_POINT`
/// digits (trailing zeros beyond that are tolerated). Returns `None` on
/// malformed input or overflow.
pub fn parse_money(amount: &str) -> Option<u64> {
    let mut amount = amount.trim().to_string();

    let fraction_size = if let Some(point_index) = amount.find('.') {
        let mut fraction_size = amount.len() - point_index - 1;
        while fraction_size > DISPLAY_DECIMAL_POINT && amount.ends_with('0') {
            amount.pop();
            fraction_size -= 1;
        }
        if fraction_size > DISPLAY_DECIMAL_POINT {
            return None;
        }
        amount.remove(point_index);
        fraction_size
    } else {
        0
    };

    if amount.is_empty() {
        return None;
    }

    amount.push_str(&"0".repeat(DISPLAY_DECIMAL_POINT - fraction_size));
    amount.parse().ok()
}
