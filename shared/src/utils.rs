// Display helpers shared by the engine shell and anything rendering a summary.

/// Formats a price with a fixed number of decimals.
pub fn format_price(value: f64, decimals: usize) -> String {
    format!("{:.decimals$}", value, decimals = decimals)
}

/// Formats a percentage change with an explicit sign, e.g. `+1.25%`.
pub fn format_change_pct(value: f64) -> String {
    format!("{:+.2}%", value)
}

/// Groups digits in thousands with commas, e.g. `1,234,567`.
pub fn format_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
