use proptest::prelude::*;

/// Strategy for generating input sequences of arbitrary length
pub fn items_strategy() -> impl Strategy<Value = Vec<u32>> {
    prop::collection::vec(any::<u32>(), 0..500)
}

/// Strategy for generating valid batch sizes
pub fn batch_size_strategy() -> impl Strategy<Value = usize> {
    prop_oneof![Just(1usize), 1usize..16, 16usize..600]
}

/// Strategy for generating run sizes together with a failure modulus
pub fn failing_run_strategy() -> impl Strategy<Value = (usize, u32)> {
    (0usize..300, 2u32..10)
}
