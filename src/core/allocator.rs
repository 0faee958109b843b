use super::types::{Allocation, Instrument};

pub const MIN_LIQUIDITY: i32 = 1;
pub const MAX_LIQUIDITY: i32 = 10;

// Percentage splits at the two ends of the liquidity scale, in
// Instrument::ALL order (fd, rd, sip, mf). Each table sums to 100.
const LOW_LIQUIDITY_SPLIT: [f64; 4] = [40.0, 30.0, 20.0, 10.0];
const HIGH_LIQUIDITY_SPLIT: [f64; 4] = [10.0, 15.0, 40.0, 35.0];

/// Maps a liquidity preference to an integer percentage split across the
/// four instruments. Out-of-range preferences are clamped to [1, 10].
///
/// Rounding uses the largest-remainder method: raw interpolated values are
/// floored, then the leftover points go to the instruments with the biggest
/// fractional remainders. Equal remainders keep the canonical instrument
/// order (stable sort), so the result is fully deterministic.
pub fn allocate(liquidity_factor: i32) -> Allocation {
    let clamped = liquidity_factor.clamp(MIN_LIQUIDITY, MAX_LIQUIDITY);
    let t = (clamped - MIN_LIQUIDITY) as f64 / (MAX_LIQUIDITY - MIN_LIQUIDITY) as f64;

    let mut percents = [0u32; 4];
    let mut remainders = [(0usize, 0.0f64); 4];
    let mut floor_sum = 0u32;
    for idx in 0..Instrument::ALL.len() {
        let raw = LOW_LIQUIDITY_SPLIT[idx] + t * (HIGH_LIQUIDITY_SPLIT[idx] - LOW_LIQUIDITY_SPLIT[idx]);
        let floored = raw.floor();
        percents[idx] = floored as u32;
        remainders[idx] = (idx, raw - floored);
        floor_sum += percents[idx];
    }

    // The raw values sum to 100, so at most three points are left over.
    remainders.sort_by(|a, b| b.1.total_cmp(&a.1));
    let mut shortfall = 100u32.saturating_sub(floor_sum);
    for (idx, _) in remainders {
        if shortfall == 0 {
            break;
        }
        percents[idx] += 1;
        shortfall -= 1;
    }

    Allocation {
        fd: percents[0],
        rd: percents[1],
        sip: percents[2],
        mf: percents[3],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::{any, prop_assert, prop_assert_eq, proptest};

    #[test]
    fn lowest_liquidity_matches_low_endpoint_table() {
        let allocation = allocate(1);
        assert_eq!(
            allocation,
            Allocation {
                fd: 40,
                rd: 30,
                sip: 20,
                mf: 10
            }
        );
    }

    #[test]
    fn highest_liquidity_matches_high_endpoint_table() {
        let allocation = allocate(10);
        assert_eq!(
            allocation,
            Allocation {
                fd: 10,
                rd: 15,
                sip: 40,
                mf: 35
            }
        );
    }

    #[test]
    fn balanced_liquidity_distributes_leftover_points_by_remainder() {
        // t = 4/9: raw split is {26.67, 23.33, 28.89, 21.11}, floors sum to
        // 98, and the two leftover points go to sip (.89) then fd (.67).
        let allocation = allocate(5);
        assert_eq!(
            allocation,
            Allocation {
                fd: 27,
                rd: 23,
                sip: 29,
                mf: 21
            }
        );
    }

    #[test]
    fn every_liquidity_step_sums_to_exactly_one_hundred() {
        for liquidity in MIN_LIQUIDITY..=MAX_LIQUIDITY {
            let allocation = allocate(liquidity);
            assert_eq!(allocation.total(), 100, "liquidity {liquidity}");
        }
    }

    #[test]
    fn out_of_range_liquidity_is_clamped() {
        assert_eq!(allocate(0), allocate(MIN_LIQUIDITY));
        assert_eq!(allocate(-7), allocate(MIN_LIQUIDITY));
        assert_eq!(allocate(i32::MIN), allocate(MIN_LIQUIDITY));
        assert_eq!(allocate(11), allocate(MAX_LIQUIDITY));
        assert_eq!(allocate(i32::MAX), allocate(MAX_LIQUIDITY));
    }

    #[test]
    fn safer_instruments_shrink_as_liquidity_preference_rises() {
        let mut previous = allocate(MIN_LIQUIDITY);
        for liquidity in (MIN_LIQUIDITY + 1)..=MAX_LIQUIDITY {
            let current = allocate(liquidity);
            assert!(current.fd <= previous.fd, "fd rose at liquidity {liquidity}");
            assert!(current.rd <= previous.rd, "rd rose at liquidity {liquidity}");
            assert!(
                current.sip >= previous.sip,
                "sip fell at liquidity {liquidity}"
            );
            assert!(current.mf >= previous.mf, "mf fell at liquidity {liquidity}");
            previous = current;
        }
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(64))]

        #[test]
        fn prop_allocation_always_sums_to_one_hundred(liquidity in any::<i32>()) {
            let allocation = allocate(liquidity);
            prop_assert_eq!(allocation.total(), 100);
            for instrument in Instrument::ALL {
                prop_assert!(allocation.percent(instrument) <= 100);
            }
        }
    }
}
