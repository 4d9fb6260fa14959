//! Pure functions over one or two OHLC series.
//!
//! These are the alignment, ratio, normalization, and volatility
//! primitives the synthesizer and classifier are built on. All of them
//! return new series; none mutate their inputs.

use chrono::{DateTime, Utc};
use market_data_feed::models::{bar::OhlcBar, series::OhlcSeries};

/// Timestamps present in every given series, ascending.
///
/// Returns an empty index when the slice is empty or any intersection is.
pub fn common_index(series: &[&OhlcSeries]) -> Vec<DateTime<Utc>> {
    let Some((first, rest)) = series.split_first() else {
        return Vec::new();
    };
    let mut index = first.timestamps();
    for s in rest {
        let theirs: std::collections::HashSet<_> = s.timestamps().into_iter().collect();
        index.retain(|ts| theirs.contains(ts));
        if index.is_empty() {
            break;
        }
    }
    index
}

/// Restricts a series to the bars whose timestamps appear in `index`.
///
/// `index` must be ascending (as produced by [`common_index`]).
pub fn align(series: &OhlcSeries, index: &[DateTime<Utc>]) -> OhlcSeries {
    let mut bars = Vec::with_capacity(index.len());
    let mut i = 0;
    for bar in &series.bars {
        if i == index.len() {
            break;
        }
        if bar.timestamp == index[i] {
            bars.push(*bar);
            i += 1;
        }
    }
    OhlcSeries {
        symbol: series.symbol.clone(),
        bars,
    }
}

/// Elementwise ratio of two series over the intersection of their
/// timestamps.
///
/// A denominator value of exactly zero makes that field undefined, and a
/// bar with any undefined field is dropped. An empty intersection yields
/// an empty series. For any zero-free series `X`, `divide(X, X)` is all
/// 1.0 on the full original index.
pub fn divide(numer: &OhlcSeries, denom: &OhlcSeries) -> OhlcSeries {
    let symbol = format!("{}/{}", numer.symbol, denom.symbol);
    let mut bars = Vec::new();
    let (mut i, mut j) = (0, 0);
    while i < numer.bars.len() && j < denom.bars.len() {
        let (n, d) = (&numer.bars[i], &denom.bars[j]);
        match n.timestamp.cmp(&d.timestamp) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                if d.open != 0.0 && d.high != 0.0 && d.low != 0.0 && d.close != 0.0 {
                    bars.push(OhlcBar {
                        timestamp: n.timestamp,
                        open: n.open / d.open,
                        high: n.high / d.high,
                        low: n.low / d.low,
                        close: n.close / d.close,
                    });
                }
                i += 1;
                j += 1;
            }
        }
    }
    OhlcSeries { symbol, bars }
}

/// Rescales a series so its first close equals `base`.
///
/// Every O/H/L/C value is multiplied by `base / first_close`. A zero
/// first close leaves the series unscaled; that is a defined edge case,
/// not an error.
pub fn normalize(series: &OhlcSeries, base: f64) -> OhlcSeries {
    let scale = match series.bars.first() {
        Some(first) if first.close != 0.0 => base / first.close,
        _ => 1.0,
    };
    let bars = series
        .bars
        .iter()
        .map(|b| OhlcBar {
            timestamp: b.timestamp,
            open: b.open * scale,
            high: b.high * scale,
            low: b.low * scale,
            close: b.close * scale,
        })
        .collect();
    OhlcSeries {
        symbol: series.symbol.clone(),
        bars,
    }
}

/// Average true range per bar, as a trailing simple moving average of the
/// true range over `period` bars.
///
/// True range is `max(high - low, |high - prev_close|, |low - prev_close|)`
/// with the first bar's previous close taken as its own close (so TR at
/// bar 0 is `high - low`). While fewer than `period` bars exist the
/// average shrinks to the available window, so the result is defined for
/// every bar.
pub fn average_true_range(series: &OhlcSeries, period: usize) -> Vec<f64> {
    let n = series.len();
    let mut tr = Vec::with_capacity(n);
    for (i, bar) in series.bars.iter().enumerate() {
        let prev_close = if i == 0 {
            bar.close
        } else {
            series.bars[i - 1].close
        };
        let hl = bar.high - bar.low;
        let hc = (bar.high - prev_close).abs();
        let lc = (bar.low - prev_close).abs();
        tr.push(hl.max(hc).max(lc));
    }

    let period = period.max(1);
    let mut atr = Vec::with_capacity(n);
    let mut window_sum = 0.0;
    for i in 0..n {
        window_sum += tr[i];
        if i >= period {
            window_sum -= tr[i - period];
        }
        let width = (i + 1).min(period);
        atr.push(window_sum / width as f64);
    }
    atr
}

/// Simple moving average of `values[..=i]` over a trailing `len` window,
/// or `None` while the window is not yet full.
pub fn trailing_sma(values: &[f64], i: usize, len: usize) -> Option<f64> {
    if len == 0 || i + 1 < len {
        return None;
    }
    let window = &values[i + 1 - len..=i];
    Some(window.iter().sum::<f64>() / len as f64)
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use proptest::prelude::*;

    use super::*;

    fn series(symbol: &str, rows: &[(i64, f64, f64, f64, f64)]) -> OhlcSeries {
        let bars = rows
            .iter()
            .map(|&(ts, open, high, low, close)| OhlcBar {
                timestamp: Utc.timestamp_opt(ts * 86_400, 0).unwrap(),
                open,
                high,
                low,
                close,
            })
            .collect();
        OhlcSeries::from_bars(symbol, bars)
    }

    #[test]
    fn common_index_is_the_intersection() {
        let a = series("A", &[(1, 1.0, 1.0, 1.0, 1.0), (2, 1.0, 1.0, 1.0, 1.0)]);
        let b = series("B", &[(2, 1.0, 1.0, 1.0, 1.0), (3, 1.0, 1.0, 1.0, 1.0)]);
        let idx = common_index(&[&a, &b]);
        assert_eq!(idx, vec![Utc.timestamp_opt(2 * 86_400, 0).unwrap()]);
    }

    #[test]
    fn disjoint_series_have_empty_intersection() {
        let a = series("A", &[(1, 1.0, 1.0, 1.0, 1.0)]);
        let b = series("B", &[(2, 1.0, 1.0, 1.0, 1.0)]);
        assert!(common_index(&[&a, &b]).is_empty());
        assert!(divide(&a, &b).is_empty());
    }

    #[test]
    fn divide_drops_bars_with_zero_denominator() {
        let n = series("N", &[(1, 2.0, 4.0, 1.0, 2.0), (2, 2.0, 4.0, 1.0, 2.0)]);
        let d = series("D", &[(1, 2.0, 2.0, 0.0, 2.0), (2, 2.0, 2.0, 1.0, 2.0)]);
        let out = divide(&n, &d);
        assert_eq!(out.len(), 1);
        assert_eq!(out.bars[0].low, 1.0);
        assert_eq!(out.symbol, "N/D");
    }

    #[test]
    fn normalize_sets_first_close_to_base() {
        let s = series("S", &[(1, 50.0, 60.0, 40.0, 50.0), (2, 55.0, 65.0, 45.0, 55.0)]);
        let out = normalize(&s, 100.0);
        assert!((out.bars[0].close - 100.0).abs() < 1e-12);
        assert!((out.bars[1].close - 110.0).abs() < 1e-12);
    }

    #[test]
    fn normalize_zero_first_close_is_a_noop() {
        let s = series("S", &[(1, 0.0, 0.0, 0.0, 0.0), (2, 5.0, 5.0, 5.0, 5.0)]);
        let out = normalize(&s, 100.0);
        assert_eq!(out, s);
    }

    #[test]
    fn atr_first_bar_is_high_minus_low() {
        let s = series("S", &[(1, 10.0, 12.0, 9.0, 11.0)]);
        let atr = average_true_range(&s, 14);
        assert_eq!(atr, vec![3.0]);
    }

    #[test]
    fn atr_uses_shrinking_window_before_period_fills() {
        // TR: [2, |12-10|=2 vs 12-10=2 vs .. , ...] keep it simple: flat 2-wide bars.
        let s = series(
            "S",
            &[
                (1, 10.0, 12.0, 10.0, 10.0),
                (2, 10.0, 12.0, 10.0, 10.0),
                (3, 10.0, 12.0, 10.0, 10.0),
            ],
        );
        let atr = average_true_range(&s, 2);
        assert_eq!(atr.len(), 3);
        assert!((atr[0] - 2.0).abs() < 1e-12);
        assert!((atr[1] - 2.0).abs() < 1e-12);
        assert!((atr[2] - 2.0).abs() < 1e-12);
    }

    #[test]
    fn trailing_sma_is_undefined_until_window_fills() {
        let values = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(trailing_sma(&values, 0, 2), None);
        assert_eq!(trailing_sma(&values, 1, 2), Some(1.5));
        assert_eq!(trailing_sma(&values, 3, 2), Some(3.5));
        assert_eq!(trailing_sma(&values, 3, 4), Some(2.5));
    }

    proptest! {
        #[test]
        fn divide_by_self_is_all_ones(
            closes in proptest::collection::vec(0.1f64..1e6, 1..40),
        ) {
            let rows: Vec<(i64, f64, f64, f64, f64)> = closes
                .iter()
                .enumerate()
                .map(|(i, &c)| (i as i64 + 1, c, c * 1.5, c * 0.5, c))
                .collect();
            let x = series("X", &rows);
            let out = divide(&x, &x);
            prop_assert_eq!(out.len(), x.len());
            for bar in &out.bars {
                prop_assert!((bar.open - 1.0).abs() < 1e-12);
                prop_assert!((bar.high - 1.0).abs() < 1e-12);
                prop_assert!((bar.low - 1.0).abs() < 1e-12);
                prop_assert!((bar.close - 1.0).abs() < 1e-12);
            }
        }

        #[test]
        fn normalize_pins_first_close(
            closes in proptest::collection::vec(0.1f64..1e6, 1..40),
            base in 1.0f64..1000.0,
        ) {
            let rows: Vec<(i64, f64, f64, f64, f64)> = closes
                .iter()
                .enumerate()
                .map(|(i, &c)| (i as i64 + 1, c, c, c, c))
                .collect();
            let out = normalize(&series("X", &rows), base);
            let first = out.bars.first().unwrap().close;
            prop_assert!((first - base).abs() < 1e-9 * base.max(1.0));
        }
    }
}
