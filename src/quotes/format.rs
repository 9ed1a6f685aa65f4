//! Bid price formatting.

/// Parses a raw bid and renders it with two decimal places.
///
/// Returns `None` when the bid is not a finite decimal number.
#[must_use]
pub fn format_bid(bid: &str) -> Option<String> {
    let value: f64 = bid.parse().ok()?;
    value.is_finite().then(|| format!("{value:.2}"))
}
