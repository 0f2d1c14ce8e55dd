//! Property-based tests for fanout_logger using proptest

use fanout_logger::prelude::*;
use proptest::prelude::*;

fn named_level() -> impl Strategy<Value = (Level, &'static str)> {
    prop_oneof![
        Just((Level::TRACE, "trace")),
        Just((Level::DEBUG, "debug")),
        Just((Level::INFO, "info")),
        Just((Level::WARN, "warn")),
        Just((Level::ERROR, "error")),
        Just((Level::FATAL, "fatal")),
    ]
}

/// Flip the case of each character according to `mask`
fn mixed_case(name: &str, mask: u32) -> String {
    name.chars()
        .enumerate()
        .map(|(i, c)| {
            if mask & (1 << i) != 0 {
                c.to_ascii_uppercase()
            } else {
                c
            }
        })
        .collect()
}

// ============================================================================
// Level Tests
// ============================================================================

proptest! {
    /// Any capitalisation of a level name resolves to that level
    #[test]
    fn test_lookup_is_case_insensitive((level, name) in named_level(), mask in any::<u32>()) {
        let spelled = mixed_case(name, mask);
        prop_assert_eq!(Level::lookup(&spelled), Some(level));
        prop_assert_eq!(spelled.parse::<Level>().ok(), Some(level));
    }

    /// Unknown names never change the level cell
    #[test]
    fn test_unknown_names_are_ignored(name in "[a-z]{1,12}", (start, _) in named_level()) {
        prop_assume!(Level::lookup(&name).is_none());

        let var = LevelVar::new(start);
        prop_assert!(!var.set_by_name(&name));
        prop_assert_eq!(var.get(), start);
    }

    /// Level ordering follows rank ordering
    #[test]
    fn test_level_ordering(a in -32i32..32, b in -32i32..32) {
        let (la, lb) = (Level::from_rank(a), Level::from_rank(b));
        prop_assert_eq!(la <= lb, a <= b);
        prop_assert_eq!(la < lb, a < b);
    }

    /// The gate passes exactly the levels at or above the floor
    #[test]
    fn test_gate_matches_rank(floor in -16i32..16, level in -16i32..16) {
        let var = LevelVar::new(Level::from_rank(floor));
        prop_assert_eq!(var.allows(Level::from_rank(level)), level >= floor);
    }

    /// Ranks beyond the extremes collapse to the extreme names
    #[test]
    fn test_extreme_ranks_collapse(below in -1000i32..=-8, above in 12i32..1000) {
        prop_assert_eq!(Level::from_rank(below).name(), "TRACE");
        prop_assert_eq!(Level::from_rank(above).name(), "FATAL");
    }

    /// Ranks between the named levels keep an offset name and never collapse
    #[test]
    fn test_intermediate_ranks_keep_offsets(rank in -7i32..12) {
        let level = Level::from_rank(rank);
        prop_assert_eq!(level.name(), level.native_name());
    }

    /// The rewriter only touches the top-level time and any level field
    #[test]
    fn test_rewriter_leaves_other_keys_alone(key in "[a-z_]{1,10}", value in any::<i64>()) {
        prop_assume!(key != "time" && key != "level");

        let rewriter = AttrRewriter::default();
        let attr = Attr::new(key.clone(), value);
        prop_assert_eq!(rewriter.rewrite(&[], attr.clone()), attr);
    }
}
