//! Strategy weight curves over an inclusive bin range.
//!
//! A weight is pure relative mass: only its ratio against the other
//! weights of the same distribution means anything. The anchored shapes
//! (peak and trough) take their magnitude from a [`WeightLimits`] set so
//! each calling pipeline can pick how much headroom its weights keep when
//! they are later divided by large fixed-point prices.

use {
    crate::{error::Error, strategy::StrategyType},
    serde::{Deserialize, Serialize},
};

/// Inclusive range of bin ids.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct BinRange {
    pub min: i32,
    pub max: i32,
}

impl BinRange {
    pub fn new(min: i32, max: i32) -> Self {
        Self { min, max }
    }

    /// Whether the id lies within the range.
    pub fn contains(&self, bin_id: i32) -> bool {
        (self.min..=self.max).contains(&bin_id)
    }

    fn ids(self) -> std::ops::RangeInclusive<i32> {
        self.min..=self.max
    }
}

/// Relative allocation mass assigned to one bin.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeightEntry {
    pub bin_id: i32,
    pub weight: u64,
}

/// Magnitude convention for the anchored curve shapes. `max` must exceed
/// `min`; both front-ends define their own fixed 10:1 set.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct WeightLimits {
    pub max: u64,
    pub min: u64,
}

fn distance(from: i32, to: i32) -> u64 {
    (i64::from(from) - i64::from(to)).unsigned_abs()
}

/// Every bin carries the same mass.
pub fn uniform(range: BinRange) -> Vec<WeightEntry> {
    range
        .ids()
        .map(|bin_id| WeightEntry { bin_id, weight: 1 })
        .collect()
}

/// Mass grows linearly from the low edge to the high edge.
pub fn ascending(range: BinRange) -> Vec<WeightEntry> {
    range
        .ids()
        .map(|bin_id| WeightEntry {
            bin_id,
            weight: distance(bin_id, range.min) + 1,
        })
        .collect()
}

/// Mass shrinks linearly from the low edge to the high edge.
pub fn descending(range: BinRange) -> Vec<WeightEntry> {
    range
        .ids()
        .map(|bin_id| WeightEntry {
            bin_id,
            weight: distance(range.max, bin_id) + 1,
        })
        .collect()
}

/// Mass peaks at the active bin and decays linearly toward both edges,
/// with an independent integer slope per side.
pub fn curve(
    range: BinRange,
    active_id: i32,
    limits: WeightLimits,
) -> Result<Vec<WeightEntry>, Error> {
    let (slope_below, slope_above) = edge_slopes(range, active_id, limits)?;
    Ok(range
        .ids()
        .map(|bin_id| {
            let weight = if bin_id < active_id {
                limits.max - distance(active_id, bin_id) * slope_below
            } else if bin_id > active_id {
                limits.max - distance(bin_id, active_id) * slope_above
            } else {
                limits.max
            };
            WeightEntry { bin_id, weight }
        })
        .collect())
}

/// Mass bottoms out at the active bin and grows linearly toward both
/// edges, mirroring [`curve`].
pub fn bid_ask(
    range: BinRange,
    active_id: i32,
    limits: WeightLimits,
) -> Result<Vec<WeightEntry>, Error> {
    let (slope_below, slope_above) = edge_slopes(range, active_id, limits)?;
    Ok(range
        .ids()
        .map(|bin_id| {
            let weight = if bin_id < active_id {
                limits.min + distance(active_id, bin_id) * slope_below
            } else if bin_id > active_id {
                limits.min + distance(bin_id, active_id) * slope_above
            } else {
                limits.min
            };
            WeightEntry { bin_id, weight }
        })
        .collect())
}

/// Whole-range curve for a strategy, anchored at the active bin. Curve and
/// BidAsk require the active bin to lie inside the range.
pub fn by_strategy(
    range: BinRange,
    active_id: i32,
    limits: WeightLimits,
    strategy: StrategyType,
) -> Result<Vec<WeightEntry>, Error> {
    match strategy {
        StrategyType::Spot => Ok(uniform(range)),
        StrategyType::Curve => curve(range, active_id, limits),
        StrategyType::BidAsk => bid_ask(range, active_id, limits),
    }
}

fn edge_slopes(
    range: BinRange,
    active_id: i32,
    limits: WeightLimits,
) -> Result<(u64, u64), Error> {
    if !range.contains(active_id) {
        return Err(Error::InvalidStrategyParams);
    }
    // Each side's slope divides the full spread by that side's width, so a
    // distance-times-slope product never exceeds the spread.
    let spread = limits.max - limits.min;
    let slope_below = if active_id > range.min {
        spread / distance(active_id, range.min)
    } else {
        0
    };
    let slope_above = if range.max > active_id {
        spread / distance(range.max, active_id)
    } else {
        0
    };
    Ok((slope_below, slope_above))
}

#[cfg(test)]
mod tests {
    use {super::*, itertools::Itertools};

    const LIMITS: WeightLimits = WeightLimits { max: 2_000, min: 200 };

    #[test]
    fn uniform_weighs_every_bin_once() {
        let weights = uniform(BinRange::new(-3, 3));
        assert_eq!(weights.len(), 7);
        assert!(weights.iter().all(|entry| entry.weight == 1));
        assert_eq!(weights.iter().map(|entry| entry.weight).sum::<u64>(), 7);
    }

    #[test]
    fn ascending_and_descending_mirror_each_other() {
        let up = ascending(BinRange::new(5, 8));
        let down = descending(BinRange::new(5, 8));
        assert_eq!(
            up.iter().map(|entry| entry.weight).collect_vec(),
            vec![1, 2, 3, 4]
        );
        assert_eq!(
            down.iter().map(|entry| entry.weight).collect_vec(),
            vec![4, 3, 2, 1]
        );
    }

    #[test]
    fn curve_peaks_at_the_active_bin() {
        let weights = curve(BinRange::new(-5, 10), 2, LIMITS).unwrap();
        let peak = weights.iter().find(|entry| entry.bin_id == 2).unwrap();
        assert_eq!(peak.weight, LIMITS.max);
        assert!(weights.iter().all(|entry| entry.weight <= LIMITS.max));
        assert!(weights.iter().all(|entry| entry.weight >= LIMITS.min));

        let (below, above): (Vec<_>, Vec<_>) =
            weights.iter().partition(|entry| entry.bin_id <= 2);
        assert!(
            below
                .iter()
                .tuple_windows()
                .all(|(a, b): (&&WeightEntry, &&WeightEntry)| a.weight <= b.weight)
        );
        assert!(
            above
                .iter()
                .tuple_windows()
                .all(|(a, b): (&&WeightEntry, &&WeightEntry)| a.weight >= b.weight)
        );
    }

    #[test]
    fn bid_ask_bottoms_out_at_the_active_bin() {
        let weights = bid_ask(BinRange::new(-5, 10), 2, LIMITS).unwrap();
        let trough = weights.iter().find(|entry| entry.bin_id == 2).unwrap();
        assert_eq!(trough.weight, LIMITS.min);
        assert!(weights.iter().all(|entry| entry.weight >= LIMITS.min));

        let (below, above): (Vec<_>, Vec<_>) =
            weights.iter().partition(|entry| entry.bin_id <= 2);
        assert!(
            below
                .iter()
                .tuple_windows()
                .all(|(a, b): (&&WeightEntry, &&WeightEntry)| a.weight >= b.weight)
        );
        assert!(
            above
                .iter()
                .tuple_windows()
                .all(|(a, b): (&&WeightEntry, &&WeightEntry)| a.weight <= b.weight)
        );
    }

    #[test]
    fn anchored_shapes_reject_an_active_bin_outside_the_range() {
        assert_eq!(
            curve(BinRange::new(0, 10), -1, LIMITS),
            Err(Error::InvalidStrategyParams)
        );
        assert_eq!(
            bid_ask(BinRange::new(0, 10), 11, LIMITS),
            Err(Error::InvalidStrategyParams)
        );
    }

    #[test]
    fn single_bin_range_collapses_to_the_anchor_weight() {
        let peaked = curve(BinRange::new(7, 7), 7, LIMITS).unwrap();
        assert_eq!(peaked, vec![WeightEntry { bin_id: 7, weight: LIMITS.max }]);
        let troughed = bid_ask(BinRange::new(7, 7), 7, LIMITS).unwrap();
        assert_eq!(
            troughed,
            vec![WeightEntry { bin_id: 7, weight: LIMITS.min }]
        );
    }

    #[test]
    fn every_shape_has_positive_mass() {
        let range = BinRange::new(-4, 9);
        let shapes = [
            uniform(range),
            ascending(range),
            descending(range),
            curve(range, 0, LIMITS).unwrap(),
            bid_ask(range, 0, LIMITS).unwrap(),
        ];
        for weights in shapes {
            assert!(weights.iter().map(|entry| entry.weight).sum::<u64>() > 0);
        }
    }

    #[test]
    fn by_strategy_picks_the_matching_shape() {
        let range = BinRange::new(0, 4);
        assert_eq!(
            by_strategy(range, 2, LIMITS, StrategyType::Spot).unwrap(),
            uniform(range)
        );
        assert_eq!(
            by_strategy(range, 2, LIMITS, StrategyType::Curve).unwrap(),
            curve(range, 2, LIMITS).unwrap()
        );
        assert_eq!(
            by_strategy(range, 2, LIMITS, StrategyType::BidAsk).unwrap(),
            bid_ask(range, 2, LIMITS).unwrap()
        );
    }

    #[test]
    fn weight_entries_serialize_with_camel_case_fields() {
        let entry = WeightEntry { bin_id: -7, weight: 42 };
        let json = serde_json::to_string(&entry).unwrap();
        assert_eq!(json, r#"{"binId":-7,"weight":42}"#);
        assert_eq!(serde_json::from_str::<WeightEntry>(&json).unwrap(), entry);
    }
}
