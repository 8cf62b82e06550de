//! # Rational Time Model
//!
//! PT charts place events on an absolute tick line with 192 ticks per
//! measure. BMS places them on an equal subdivision of each measure. This
//! module converts between the two exactly: a tick becomes a measure index
//! plus a reduced fraction of the measure, and the fractions of one measure
//! are unified on their least common multiple.
//!
//! All arithmetic is integer-only. A slot index computed from a
//! [`MeasurePosition`] is exact, never rounded.

use num_integer::Integer;

/// Ticks in one measure of the PT time base.
pub const TICKS_PER_MEASURE: u32 = 192;

/// A position within the chart as `measure + numerator / denominator`.
///
/// `numerator < denominator` and the fraction is in lowest terms, so the
/// denominator always divides [`TICKS_PER_MEASURE`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MeasurePosition {
    pub measure: u32,
    pub numerator: u32,
    pub denominator: u32,
}

impl MeasurePosition {
    /// Convert an absolute tick position.
    pub fn from_ticks(ticks: u32) -> Self {
        let measure = ticks / TICKS_PER_MEASURE;
        let offset = ticks % TICKS_PER_MEASURE;
        let divisor = offset.gcd(&TICKS_PER_MEASURE);
        MeasurePosition {
            measure,
            numerator: offset / divisor,
            denominator: TICKS_PER_MEASURE / divisor,
        }
    }

    /// Absolute tick position this measure position stands for.
    pub fn to_ticks(self) -> u32 {
        self.measure * TICKS_PER_MEASURE + self.numerator * TICKS_PER_MEASURE / self.denominator
    }

    /// Slot index of this position on a measure divided into `subdivision`
    /// equal parts. `subdivision` must be a multiple of the denominator.
    pub fn slot(self, subdivision: u32) -> usize {
        debug_assert_eq!(
            subdivision % self.denominator,
            0,
            "subdivision {} does not contain denominator {}",
            subdivision,
            self.denominator
        );
        (self.numerator * (subdivision / self.denominator)) as usize
    }
}

/// Least common multiple of all denominators; 1 when there are none.
///
/// Returns `None` when a denominator is zero or the result does not fit in
/// a `u32`. Denominators produced by [`MeasurePosition::from_ticks`] all
/// divide [`TICKS_PER_MEASURE`], so their multiple never overflows.
pub fn lcm_of<I>(denominators: I) -> Option<u32>
where
    I: IntoIterator<Item = u32>,
{
    denominators.into_iter().try_fold(1u32, |acc, denominator| {
        if denominator == 0 {
            return None;
        }
        // Two u32 operands cannot overflow a u64 lcm
        u32::try_from(u64::from(acc).lcm(&u64::from(denominator))).ok()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_measure_start_is_zero_over_one() {
        let pos = MeasurePosition::from_ticks(384);
        assert_eq!(
            pos,
            MeasurePosition {
                measure: 2,
                numerator: 0,
                denominator: 1
            }
        );
    }

    #[test]
    fn test_fraction_is_reduced() {
        // 48 / 192 = 1/4
        let pos = MeasurePosition::from_ticks(192 + 48);
        assert_eq!(pos.measure, 1);
        assert_eq!((pos.numerator, pos.denominator), (1, 4));

        // 64 / 192 = 1/3
        let pos = MeasurePosition::from_ticks(64);
        assert_eq!((pos.numerator, pos.denominator), (1, 3));

        // 1 / 192 stays as is
        let pos = MeasurePosition::from_ticks(1);
        assert_eq!((pos.numerator, pos.denominator), (1, 192));
    }

    #[test]
    fn test_lcm_examples() {
        assert_eq!(lcm_of(std::iter::empty()), Some(1));
        assert_eq!(lcm_of([2, 3]), Some(6));
        assert_eq!(lcm_of([4, 6, 8]), Some(24));
        assert_eq!(lcm_of([1, 1, 1]), Some(1));
        assert_eq!(lcm_of([64, 3]), Some(192));
    }

    #[test]
    fn test_lcm_of_large_coprimes() {
        // 65537 * 65539 is past u32::MAX
        assert_eq!(lcm_of([65537, 65539]), None);
        assert_eq!(lcm_of([65536, 65536 * 2]), Some(131_072));
        assert_eq!(lcm_of([71, 73, 79, 76, 139]), None);
        assert_eq!(lcm_of([71, 73, 79, 76]), Some(31_118_732));
    }

    #[test]
    fn test_lcm_of_zero_is_rejected() {
        assert_eq!(lcm_of([4, 0]), None);
    }

    #[test]
    fn test_slot_on_unified_grid() {
        let quarter = MeasurePosition::from_ticks(48);
        let third = MeasurePosition::from_ticks(64);
        let d = lcm_of([quarter.denominator, third.denominator]).unwrap();
        assert_eq!(d, 12);
        assert_eq!(quarter.slot(d), 3);
        assert_eq!(third.slot(d), 4);
    }

    proptest! {
        #[test]
        fn prop_ticks_round_trip(ticks in 0u32..200_000) {
            let pos = MeasurePosition::from_ticks(ticks);
            prop_assert!(pos.numerator < pos.denominator);
            prop_assert_eq!(TICKS_PER_MEASURE % pos.denominator, 0);
            prop_assert_eq!(pos.to_ticks(), ticks);
        }

        #[test]
        fn prop_lcm_is_common_multiple(ds in proptest::collection::vec(1u32..=192, 0..6)) {
            let exact = ds.iter().fold(1u128, |acc, &d| acc.lcm(&u128::from(d)));
            match lcm_of(ds.iter().copied()) {
                Some(l) => {
                    prop_assert!(l >= 1);
                    prop_assert_eq!(u128::from(l), exact);
                    for d in &ds {
                        prop_assert_eq!(l % d, 0);
                    }
                }
                None => prop_assert!(exact > u128::from(u32::MAX)),
            }
        }

        #[test]
        fn prop_tick_denominators_never_overflow(ticks in proptest::collection::vec(0u32..100_000, 0..64)) {
            let l = lcm_of(ticks.iter().map(|&t| MeasurePosition::from_ticks(t).denominator));
            prop_assert!(matches!(l, Some(l) if TICKS_PER_MEASURE % l == 0));
        }

        #[test]
        fn prop_distinct_ticks_get_distinct_slots(a in 0u32..192, b in 0u32..192) {
            prop_assume!(a != b);
            let pa = MeasurePosition::from_ticks(a);
            let pb = MeasurePosition::from_ticks(b);
            let d = lcm_of([pa.denominator, pb.denominator]).unwrap();
            prop_assert_ne!(pa.slot(d), pb.slot(d));
        }
    }
}
