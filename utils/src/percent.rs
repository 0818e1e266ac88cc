//! Percentage formatting shared by justification and reason strings.

/// Format a ratio as a percentage with two decimals, e.g. `0.625` to
/// `"62.50%"`.
///
/// Every percentage embedded in a justification or reason string goes
/// through this function, so the text always round-trips to the numeric
/// fields reported next to it.
pub fn format_percent(ratio: f64) -> String {
    format!("{:.2}%", ratio * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_decimals() {
        assert_eq!(format_percent(0.5), "50.00%");
        assert_eq!(format_percent(0.625), "62.50%");
        assert_eq!(format_percent(0.0), "0.00%");
        assert_eq!(format_percent(1.0), "100.00%");
    }

    #[test]
    fn test_over_one_is_allowed() {
        // Ratios above 1 can occur when proxies inflate the numerator.
        assert_eq!(format_percent(1.25), "125.00%");
    }
}
