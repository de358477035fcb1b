//! Ticker symbol helpers

/// Normalize a user-supplied ticker: trim whitespace, drop one leading `$`,
/// uppercase.
///
/// ```
/// use findata_core::sanitize_ticker;
///
/// assert_eq!(sanitize_ticker("  $aapl "), "AAPL");
/// assert_eq!(sanitize_ticker("brk.b"), "BRK.B");
/// ```
pub fn sanitize_ticker(ticker: &str) -> String {
    let ticker = ticker.trim();
    ticker.strip_prefix('$').unwrap_or(ticker).to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_ticker() {
        assert_eq!(sanitize_ticker("msft"), "MSFT");
        assert_eq!(sanitize_ticker("$tsla"), "TSLA");
        assert_eq!(sanitize_ticker("\t$nvda\n"), "NVDA");
    }

    #[test]
    fn test_only_one_dollar_is_stripped() {
        assert_eq!(sanitize_ticker("$$x"), "$X");
    }

    #[test]
    fn test_empty_ticker_stays_empty() {
        assert_eq!(sanitize_ticker("   "), "");
    }
}
