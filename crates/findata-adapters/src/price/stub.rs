//! Synthetic price history

use chrono::{Duration, NaiveDate, Utc};
use findata_core::StubGenerator;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{PriceBar, PriceFrame};

/// Bars generated per stub series
pub const STUB_BARS: usize = 30;

const DRIFT: f64 = 0.001;
const VOLATILITY: f64 = 0.02;

/// Seed derived from the ticker: first 8 bytes of its BLAKE3 hash
pub fn ticker_seed(ticker: &str) -> u64 {
    let hash = blake3::hash(ticker.as_bytes());
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&hash.as_bytes()[..8]);
    u64::from_le_bytes(bytes)
}

/// Geometric random walk of daily bars keyed by ticker.
///
/// The same ticker always yields the same closes and volumes; only the dates
/// move with the anchor day.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomWalkStub {
    anchor: Option<NaiveDate>,
}

impl RandomWalkStub {
    /// Series ending today (UTC)
    pub fn new() -> Self {
        Self::default()
    }

    /// Series ending on a fixed day
    pub fn anchored(end: NaiveDate) -> Self {
        Self { anchor: Some(end) }
    }

    fn end_date(&self) -> NaiveDate {
        self.anchor.unwrap_or_else(|| Utc::now().date_naive())
    }
}

fn normal(rng: &mut StdRng, mean: f64, std_dev: f64) -> f64 {
    // Box-Muller; u1 kept away from 0 so ln stays finite
    let u1: f64 = rng.gen_range(f64::EPSILON..1.0);
    let u2: f64 = rng.r#gen();
    let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
    mean + std_dev * z
}

impl StubGenerator<str> for RandomWalkStub {
    type Output = PriceFrame;

    fn generate(&self, ticker: &str, _reason: Option<&str>) -> PriceFrame {
        let seed = ticker_seed(ticker);
        let mut rng = StdRng::seed_from_u64(seed);
        let base = 100.0 + (seed % 200) as f64;
        let end = self.end_date();

        let mut log_return = 0.0;
        let bars = (0..STUB_BARS)
            .map(|i| {
                log_return += normal(&mut rng, DRIFT, VOLATILITY);
                let close = base * f64::exp(log_return);
                let date = end - Duration::days((STUB_BARS - 1 - i) as i64);
                PriceBar {
                    date: date.and_time(chrono::NaiveTime::MIN).and_utc(),
                    open: close * 0.99,
                    high: close * 1.01,
                    low: close * 0.98,
                    close,
                    volume: rng.gen_range(1_000_000..100_000_000),
                }
            })
            .collect();

        PriceFrame {
            ticker: ticker.to_string(),
            bars,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn anchor() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 30).unwrap()
    }

    #[test]
    fn test_stub_is_reproducible() {
        let stub = RandomWalkStub::anchored(anchor());
        let first = stub.generate("AAPL", None);
        let second = stub.generate("AAPL", Some("Timeout"));
        assert_eq!(first, second);
    }

    #[test]
    fn test_closes_do_not_depend_on_anchor() {
        let a = RandomWalkStub::anchored(anchor()).generate("MSFT", None);
        let b = RandomWalkStub::new().generate("MSFT", None);
        let closes = |f: &PriceFrame| f.bars.iter().map(|b| b.close).collect::<Vec<_>>();
        assert_eq!(closes(&a), closes(&b));
    }

    #[test]
    fn test_stub_shape() {
        let frame = RandomWalkStub::anchored(anchor()).generate("NVDA", None);
        assert_eq!(frame.ticker, "NVDA");
        assert_eq!(frame.bars.len(), STUB_BARS);
        assert_eq!(frame.bars.last().unwrap().date.date_naive(), anchor());
        assert!(frame.bars.windows(2).all(|w| w[0].date < w[1].date));

        for bar in &frame.bars {
            assert!(bar.close > 0.0);
            assert!((bar.open - bar.close * 0.99).abs() < 1e-9);
            assert!((bar.high - bar.close * 1.01).abs() < 1e-9);
            assert!((bar.low - bar.close * 0.98).abs() < 1e-9);
            assert!((1_000_000..100_000_000).contains(&bar.volume));
        }
    }

    #[test]
    fn test_different_tickers_differ() {
        let stub = RandomWalkStub::anchored(anchor());
        assert_ne!(stub.generate("AAPL", None), stub.generate("TSLA", None));
    }

    #[test]
    fn test_base_price_range() {
        let seed = ticker_seed("AAPL");
        let base = 100.0 + (seed % 200) as f64;
        assert!((100.0..300.0).contains(&base));
    }
}
