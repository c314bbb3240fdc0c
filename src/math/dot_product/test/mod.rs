//! Test utilities for dot product implementations.

#[cfg(test)]
mod tests {
    use crate::math::dot_product::check::closeness_check;
    use crate::math::dot_product::code::*;
    use crate::math::dot_product::verify;
    use crate::runtime::{scope, tile_count, PoolConfig, SumReducer, ThreadPool, Tiles};
    use crate::utils::bench::{iota, shuffle, shuffled_inputs};
    use proptest::prelude::*;
    use std::sync::OnceLock;

    /// Pool shared by tests that do not look at scheduling counters.
    fn shared_pool() -> &'static ThreadPool {
        static POOL: OnceLock<ThreadPool> = OnceLock::new();
        POOL.get_or_init(|| ThreadPool::new(PoolConfig::default().with_workers(4)).unwrap())
    }

    fn pool(workers: usize) -> ThreadPool {
        ThreadPool::new(PoolConfig::default().with_workers(workers)).unwrap()
    }

    #[test]
    fn test_sequential_basic() {
        let a = [1.0, 2.0, 3.0, 4.0];
        let b = [5.0, 6.0, 7.0, 8.0];
        // 1*5 + 2*6 + 3*7 + 4*8 = 5 + 12 + 21 + 32 = 70
        assert_eq!(dot_product_sequential(&a, &b), 70.0);
    }

    #[test]
    #[should_panic(expected = "Vectors must have the same length")]
    fn test_mismatched_lengths_panic() {
        dot_product_sequential(&[1.0, 2.0], &[1.0]);
    }

    #[test]
    fn test_empty_vectors_give_zero() {
        let pool = shared_pool();
        assert_eq!(dot_product_sequential(&[], &[]), 0.0);
        for variant in available_variants() {
            let result = pool.install(|| (variant.function)(&[], &[], 100));
            assert_eq!(result, 0.0, "variant {}", variant.name);
        }
    }

    #[test]
    fn test_four_elements_give_fourteen() {
        let pool = shared_pool();
        let a = iota(4).unwrap();
        let b = iota(4).unwrap();
        assert_eq!(dot_product_sequential(&a, &b), 14.0);
        for variant in available_variants() {
            for coarseness in [1, 2, 3, 100] {
                let result = pool.install(|| (variant.function)(&a, &b, coarseness));
                assert!(
                    closeness_check(14.0, result, 4),
                    "variant {} with coarseness {}: got {}",
                    variant.name,
                    coarseness,
                    result
                );
            }
        }
    }

    #[test]
    fn test_recursive_below_threshold_does_not_spawn() {
        let pool = pool(2);
        let (a, b) = shuffled_inputs(99, 3).unwrap();
        let before = pool.stats();
        let result = pool.install(|| dot_product_recursive(&a, &b, 100));
        assert_eq!(result, dot_product_sequential(&a, &b));
        assert_eq!(pool.stats().since(&before).spawned, 0);
    }

    #[test]
    fn test_recursive_spawns_once_per_internal_node() {
        let pool = pool(4);
        let (a, b) = shuffled_inputs(1000, 11).unwrap();
        let before = pool.stats();
        pool.install(|| dot_product_recursive(&a, &b, 100));
        // 1000 -> 2 x 500 -> 4 x 250 -> 8 x 125 -> leaves of 62 and 63.
        assert_eq!(recursive_spawn_count(1000, 100), 15);
        assert_eq!(pool.stats().since(&before).spawned, 15);
    }

    #[test]
    fn test_recursive_spawn_count_at_threshold() {
        assert_eq!(recursive_spawn_count(99, 100), 0);
        assert_eq!(recursive_spawn_count(100, 100), 1);
        assert_eq!(recursive_spawn_count(0, 1), 0);
        // Coarseness 1 behaves like 2: leaves hold a single element.
        assert_eq!(recursive_spawn_count(8, 1), 7);
    }

    #[test]
    fn test_coarseness_above_len_uses_one_tile() {
        let pool = pool(2);
        let (a, b) = shuffled_inputs(50, 5).unwrap();
        let expected = dot_product_sequential(&a, &b);
        assert_eq!(tile_count(a.len(), 64), 1);

        let before = pool.stats();
        let result = pool.install(|| dot_product_tiled(&a, &b, 64));
        assert_eq!(result, expected);
        assert_eq!(pool.stats().since(&before).spawned, 1);

        let before = pool.stats();
        let result = pool.install(|| dot_product_recursive(&a, &b, 64));
        assert_eq!(result, expected);
        assert_eq!(pool.stats().since(&before).spawned, 0);
    }

    #[test]
    fn test_tiled_spawns_one_task_per_tile() {
        let pool = pool(3);
        let (a, b) = shuffled_inputs(1050, 8).unwrap();
        let before = pool.stats();
        pool.install(|| dot_product_tiled(&a, &b, 100));
        assert_eq!(pool.stats().since(&before).spawned, 11);
    }

    #[test]
    fn test_strategies_outside_pool_use_global_pool() {
        let (a, b) = shuffled_inputs(5000, 13).unwrap();
        let expected = dot_product_sequential(&a, &b);
        for variant in available_variants() {
            let result = (variant.function)(&a, &b, 100);
            assert!(closeness_check(expected, result, a.len()));
        }
    }

    #[test]
    fn test_reducer_invariant_across_pool_sizes() {
        let (a, b) = shuffled_inputs(10_007, 21).unwrap();
        let expected = dot_product_sequential(&a, &b);
        for workers in [1, 2, 3, 8] {
            let pool = pool(workers);
            let result = pool.install(|| dot_product_hyperobject(&a, &b, 97));
            assert_eq!(result, expected, "{} workers", workers);
        }
    }

    #[test]
    fn test_reducer_invariant_under_task_order() {
        let pool = shared_pool();
        let (a, b) = shuffled_inputs(4000, 17).unwrap();
        let expected = dot_product_sequential(&a, &b);

        for seed in 0..5 {
            let mut tiles: Vec<_> = Tiles::new(a.len(), 64).collect();
            shuffle(&mut tiles, seed);

            let sum = SumReducer::new();
            let (a, b, sum_ref) = (&a, &b, &sum);
            pool.install(|| {
                scope(|s| {
                    for tile in tiles {
                        s.spawn(move |_| {
                            sum_ref.update(|view| {
                                for i in tile.range() {
                                    *view += a[i] * b[i];
                                }
                            })
                        });
                    }
                })
            });
            assert_eq!(sum.into_value(), expected, "seed {}", seed);
        }
    }

    #[test]
    fn test_verify_passes() {
        let pool = shared_pool();
        for coarseness in [1, 7, 100] {
            assert_eq!(verify(pool, coarseness), Ok(()));
        }
    }

    fn oracle(a: &[f64], b: &[f64]) -> f64 {
        let mut acc = 0.0;
        for i in 0..a.len() {
            acc += a[i] * b[i];
        }
        acc
    }

    fn pair_of_vectors() -> impl Strategy<Value = (Vec<f64>, Vec<f64>)> {
        (0usize..300).prop_flat_map(|n| {
            (
                prop::collection::vec(-1.0e6f64..1.0e6, n),
                prop::collection::vec(-1.0e6f64..1.0e6, n),
            )
        })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn prop_sequential_matches_left_to_right_sum((a, b) in pair_of_vectors()) {
            prop_assert_eq!(dot_product_sequential(&a, &b).to_bits(), oracle(&a, &b).to_bits());
        }

        #[test]
        fn prop_strategies_close_to_sequential(
            n in 0usize..5000,
            coarseness in 1usize..300,
            seed in any::<u64>()
        ) {
            let pool = shared_pool();
            let (a, b) = shuffled_inputs(n, seed).unwrap();
            let expected = dot_product_sequential(&a, &b);
            for variant in available_variants() {
                let result = pool.install(|| (variant.function)(&a, &b, coarseness));
                prop_assert!(
                    closeness_check(expected, result, n),
                    "variant {} n {} coarseness {}: expected {}, got {}",
                    variant.name, n, coarseness, expected, result
                );
            }
        }

        #[test]
        fn prop_tiles_partition_range(n in 0usize..10_000, grain in 1usize..500) {
            let tiles: Vec<_> = Tiles::new(n, grain).collect();
            prop_assert_eq!(tiles.len(), n.div_ceil(grain));
            prop_assert_eq!(tiles.iter().map(|t| t.len()).sum::<usize>(), n);
            if let Some(last) = tiles.last() {
                prop_assert!(last.len() > 0 && last.len() <= grain);
                prop_assert_eq!(last.len(), n - (tiles.len() - 1) * grain);
            }
        }
    }
}
