//! Property tests: indexed grids respect the id-set minimum step and report
//! the level count of the progression they actually generate.

use evo_factor::{integer, ratio, BigRational, FactorError, IdSetSizes, RationalGrid};
use proptest::prelude::*;

fn arb_indexed_kind() -> impl Strategy<Value = &'static str> {
    prop_oneof![Just("fc"), Just("conv")]
}

proptest! {
    /// Whatever clamping happens, `level_count == |levels|`, the spacing is
    /// uniform and never below the minimum, and no point reaches `end + step`.
    #[test]
    fn clamped_grids_stay_consistent(
        kind in arb_indexed_kind(),
        id_set in 1usize..30,
        (sn, sd) in (0i64..20, 1i64..20),
        (wn, wd) in (1i64..40, 1i64..20),
        levels in 1usize..40,
    ) {
        let start = ratio(sn, sd).unwrap();
        let end = &start + ratio(wn, wd).unwrap();
        let sizes = IdSetSizes::new().with(kind, id_set);
        let minimum = ratio(1, id_set as i64).unwrap();

        match RationalGrid::new(kind, start.clone(), end.clone(), levels, &sizes) {
            Ok(grid) => {
                prop_assert_eq!(grid.level_count(), grid.levels().len());
                prop_assert!(grid.step() >= &minimum);
                prop_assert!(grid.levels()[0] >= minimum);
                let bound = grid.end() + grid.step();
                for level in grid.levels() {
                    prop_assert!(level < &bound);
                }
                for pair in grid.levels().windows(2) {
                    prop_assert_eq!(&(&pair[1] - &pair[0]), grid.step());
                }
            }
            Err(FactorError::InternalConsistency(_)) => {
                // Only possible when the raised start leaves no room below end + step.
                prop_assert!(minimum > end);
            }
            Err(other) => prop_assert!(false, "unexpected error: {}", other),
        }
    }

    /// A minimum step coarser than the requested spacing replaces it, and the
    /// level count follows the real progression length.
    #[test]
    fn coarse_minimum_overrides_requested_levels(
        id_set in 1usize..6,
        extra_levels in 1usize..30,
    ) {
        // Range [1, 2] with more levels than the id set allows.
        let levels = id_set + 1 + extra_levels;
        let sizes = IdSetSizes::new().with("fc", id_set);
        let grid = RationalGrid::new("fc", integer(1), integer(2), levels, &sizes).unwrap();
        let minimum = ratio(1, id_set as i64).unwrap();

        prop_assert_eq!(grid.step(), &minimum);
        prop_assert_eq!(grid.level_count(), id_set + 1);
        prop_assert_eq!(grid.levels().last(), Some(&integer(2)));
    }

    /// When the requested spacing already satisfies the minimum, nothing moves.
    #[test]
    fn fine_minimum_is_inert(
        id_set in 10usize..50,
        levels in 2usize..10,
    ) {
        let sizes = IdSetSizes::new().with("conv", id_set);
        let grid = RationalGrid::new("conv", integer(1), integer(2), levels, &sizes).unwrap();
        let natural: BigRational = integer(1) / integer(levels as i64 - 1);
        prop_assert_eq!(grid.step(), &natural);
        prop_assert_eq!(grid.level_count(), levels);
    }
}
