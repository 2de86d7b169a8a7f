mod property_edits;

/// Number of cases each `QuickCheck` property runs.
pub(crate) fn quickcheck_tests() -> u64 {
    if cfg!(feature = "test-fast") {
        50
    } else if is_ci::cached() {
        10_000
    } else {
        1_000
    }
}
