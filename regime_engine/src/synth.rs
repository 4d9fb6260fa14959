//! Synthetic index construction from baskets of member series.
//!
//! Two composites are supported: an arithmetic equal-weight index over
//! normalized members (used for sub-industry baskets) and a geometric
//! composite (used for the broad-market benchmark basket). Both align
//! members to the intersection of their timestamps and degrade to an
//! empty series when nothing overlaps.

use indexmap::IndexMap;
use market_data_feed::models::{bar::OhlcBar, series::OhlcSeries};

use crate::algebra;

/// Equal-weight arithmetic composite of the non-empty member series.
///
/// Members are aligned to the intersection of all their timestamps and
/// each is normalized to `base` before averaging per bar and per field.
/// No members, or an empty intersection, yields an empty series.
pub fn equal_weight_index(
    name: &str,
    members: &IndexMap<String, OhlcSeries>,
    base: f64,
) -> OhlcSeries {
    let live: Vec<&OhlcSeries> = members.values().filter(|s| !s.is_empty()).collect();
    if live.is_empty() {
        return OhlcSeries::empty(name);
    }

    let index = algebra::common_index(&live);
    if index.is_empty() {
        return OhlcSeries::empty(name);
    }

    let normalized: Vec<OhlcSeries> = live
        .iter()
        .map(|s| algebra::normalize(&algebra::align(s, &index), base))
        .collect();

    let count = normalized.len() as f64;
    let bars = index
        .iter()
        .enumerate()
        .map(|(k, &timestamp)| OhlcBar {
            timestamp,
            open: normalized.iter().map(|s| s.bars[k].open).sum::<f64>() / count,
            high: normalized.iter().map(|s| s.bars[k].high).sum::<f64>() / count,
            low: normalized.iter().map(|s| s.bars[k].low).sum::<f64>() / count,
            close: normalized.iter().map(|s| s.bars[k].close).sum::<f64>() / count,
        })
        .collect();

    OhlcSeries {
        symbol: name.to_string(),
        bars,
    }
}

/// Geometric composite of the non-empty member series.
///
/// Per bar and per field the composite value is `exp(mean(ln(v)))` across
/// members. Logs need strictly positive inputs, so any bar where a
/// contributing field is zero or negative is dropped, not zeroed.
pub fn geometric_index(name: &str, members: &[OhlcSeries]) -> OhlcSeries {
    let live: Vec<&OhlcSeries> = members.iter().filter(|s| !s.is_empty()).collect();
    if live.is_empty() {
        return OhlcSeries::empty(name);
    }

    let index = algebra::common_index(&live);
    if index.is_empty() {
        return OhlcSeries::empty(name);
    }

    let aligned: Vec<OhlcSeries> = live.iter().map(|s| algebra::align(s, &index)).collect();

    let mut bars = Vec::with_capacity(index.len());
    'bars: for (k, &timestamp) in index.iter().enumerate() {
        let mut fields = [0.0f64; 4];
        for s in &aligned {
            let b = &s.bars[k];
            for (acc, v) in fields.iter_mut().zip([b.open, b.high, b.low, b.close]) {
                if v <= 0.0 {
                    continue 'bars;
                }
                *acc += v.ln();
            }
        }
        let count = aligned.len() as f64;
        bars.push(OhlcBar {
            timestamp,
            open: (fields[0] / count).exp(),
            high: (fields[1] / count).exp(),
            low: (fields[2] / count).exp(),
            close: (fields[3] / count).exp(),
        });
    }

    OhlcSeries {
        symbol: name.to_string(),
        bars,
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    fn series(symbol: &str, rows: &[(i64, f64)]) -> OhlcSeries {
        let bars = rows
            .iter()
            .map(|&(ts, close)| OhlcBar {
                timestamp: Utc.timestamp_opt(ts * 86_400, 0).unwrap(),
                open: close,
                high: close * 1.1,
                low: close * 0.9,
                close,
            })
            .collect();
        OhlcSeries::from_bars(symbol, bars)
    }

    #[test]
    fn equal_weight_of_identical_members_is_the_normalized_member() {
        let rows = [(1, 50.0), (2, 55.0), (3, 60.0)];
        let mut members = IndexMap::new();
        members.insert("A".to_string(), series("A", &rows));
        members.insert("B".to_string(), series("B", &rows));

        let index = equal_weight_index("AB", &members, 100.0);
        let expected = algebra::normalize(&series("A", &rows), 100.0);
        assert_eq!(index.len(), expected.len());
        for (got, want) in index.bars.iter().zip(&expected.bars) {
            assert!((got.close - want.close).abs() < 1e-12);
            assert!((got.high - want.high).abs() < 1e-12);
        }
    }

    #[test]
    fn equal_weight_skips_empty_members() {
        let mut members = IndexMap::new();
        members.insert("A".to_string(), series("A", &[(1, 50.0), (2, 55.0)]));
        members.insert("GHOST".to_string(), OhlcSeries::empty("GHOST"));

        let index = equal_weight_index("X", &members, 100.0);
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn equal_weight_with_no_overlap_is_empty() {
        let mut members = IndexMap::new();
        members.insert("A".to_string(), series("A", &[(1, 50.0)]));
        members.insert("B".to_string(), series("B", &[(2, 50.0)]));
        assert!(equal_weight_index("X", &members, 100.0).is_empty());
    }

    #[test]
    fn equal_weight_of_nothing_is_empty() {
        let members = IndexMap::new();
        assert!(equal_weight_index("X", &members, 100.0).is_empty());
    }

    #[test]
    fn geometric_mean_of_identical_members_is_the_member() {
        let rows = [(1, 50.0), (2, 55.0)];
        let members = vec![series("A", &rows), series("B", &rows)];
        let index = geometric_index("G", &members);
        assert_eq!(index.len(), 2);
        assert!((index.bars[0].close - 50.0).abs() < 1e-9);
        assert!((index.bars[1].close - 55.0).abs() < 1e-9);
    }

    #[test]
    fn geometric_index_averages_in_log_space() {
        let a = series("A", &[(1, 4.0)]);
        let b = series("B", &[(1, 16.0)]);
        let index = geometric_index("G", &[a, b]);
        // geometric mean of 4 and 16 is 8
        assert!((index.bars[0].close - 8.0).abs() < 1e-9);
    }

    #[test]
    fn geometric_index_drops_non_positive_bars() {
        let a = OhlcSeries::from_bars(
            "A",
            vec![
                OhlcBar {
                    timestamp: Utc.timestamp_opt(86_400, 0).unwrap(),
                    open: 1.0,
                    high: 1.0,
                    low: -1.0,
                    close: 1.0,
                },
                OhlcBar {
                    timestamp: Utc.timestamp_opt(2 * 86_400, 0).unwrap(),
                    open: 2.0,
                    high: 2.0,
                    low: 2.0,
                    close: 2.0,
                },
            ],
        );
        let b = series("B", &[(1, 3.0), (2, 3.0)]);
        let index = geometric_index("G", &[a, b]);
        assert_eq!(index.len(), 1);
        assert_eq!(index.bars[0].timestamp, Utc.timestamp_opt(2 * 86_400, 0).unwrap());
    }
}
