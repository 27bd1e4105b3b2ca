//! Small output formatting helpers shared by the runner and verification.

use std::time::Duration;

/// Format a count with thousands separators: 1234567 -> "1,234,567"
pub fn format_count(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Format a duration as seconds with one decimal: "12.3s"
pub fn format_secs(d: Duration) -> String {
    format!("{:.1}s", d.as_secs_f64())
}
