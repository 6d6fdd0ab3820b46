//! Byte-size humanization.

/// Unit suffixes in 1024-step order.
const UNITS: [&str; 6] = ["B", "K", "M", "G", "T", "P"];

/// Scales a byte count to a human-readable string.
///
/// Repeatedly divides by 1024, selecting the first unit in `B K M G T P`
/// where the remaining value is below 1024, formatted to two decimal places:
/// `humanize_bytes(1536)` is `"1.50K"`. Values of a petabyte scale or more
/// stay in `P`.
#[must_use]
pub fn humanize_bytes(bytes: u64) -> String {
    let mut value = bytes as f64;
    for unit in &UNITS[..UNITS.len() - 1] {
        if value < 1024.0 {
            return format!("{value:.2}{unit}");
        }
        value /= 1024.0;
    }
    format!("{value:.2}{}", UNITS[UNITS.len() - 1])
}
