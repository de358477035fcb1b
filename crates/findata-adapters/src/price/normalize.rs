//! Raw bar normalization

use super::PriceBar;
use super::source::RawBar;

/// Turn raw source bars into a clean, ascending, de-duplicated series.
///
/// - close falls back to adjusted close
/// - bars without a date or a close are dropped
/// - duplicate timestamps keep the last occurrence
/// - missing open/high/low fall back to close, missing volume to 0
pub fn normalize_bars(raw: Vec<RawBar>) -> Vec<PriceBar> {
    let mut bars: Vec<PriceBar> = raw
        .into_iter()
        .filter_map(|bar| {
            let date = bar.date?;
            let close = bar.close.or(bar.adj_close)?;
            Some(PriceBar {
                date,
                open: bar.open.unwrap_or(close),
                high: bar.high.unwrap_or(close),
                low: bar.low.unwrap_or(close),
                close,
                volume: bar.volume.unwrap_or(0),
            })
        })
        .collect();

    // Stable sort keeps arrival order among equal dates, so the last one wins
    bars.sort_by_key(|bar| bar.date);
    let mut deduped: Vec<PriceBar> = Vec::with_capacity(bars.len());
    for bar in bars {
        match deduped.last_mut() {
            Some(last) if last.date == bar.date => *last = bar,
            _ => deduped.push(bar),
        }
    }
    deduped
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};

    fn day(d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, d, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_adjusted_close_fallback() {
        let bars = normalize_bars(vec![RawBar {
            date: Some(day(3)),
            adj_close: Some(42.0),
            ..RawBar::default()
        }]);
        assert_eq!(bars.len(), 1);
        assert_eq!(bars[0].close, 42.0);
        assert_eq!(bars[0].open, 42.0);
        assert_eq!(bars[0].high, 42.0);
        assert_eq!(bars[0].low, 42.0);
        assert_eq!(bars[0].volume, 0);
    }

    #[test]
    fn test_drops_bars_without_date_or_close() {
        let bars = normalize_bars(vec![
            RawBar {
                close: Some(1.0),
                ..RawBar::default()
            },
            RawBar {
                date: Some(day(4)),
                ..RawBar::default()
            },
            RawBar::close_only(day(5), 2.0),
        ]);
        assert_eq!(bars.len(), 1);
        assert_eq!(bars[0].date, day(5));
    }

    #[test]
    fn test_sorted_ascending_and_last_duplicate_wins() {
        let bars = normalize_bars(vec![
            RawBar::close_only(day(7), 7.0),
            RawBar::close_only(day(5), 5.0),
            RawBar::close_only(day(7), 7.5),
            RawBar::close_only(day(6), 6.0),
        ]);
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        assert_eq!(closes, vec![5.0, 6.0, 7.5]);
    }

    #[test]
    fn test_all_dropped_is_empty() {
        assert!(normalize_bars(vec![RawBar::default(), RawBar::default()]).is_empty());
    }
}
