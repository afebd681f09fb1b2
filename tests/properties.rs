use bitvec::prelude::*;
use huffcode::{to_ascii, HuffmanTree};
use proptest::prelude::*;
use proptest::sample::Index;

/// Cheapest Σ weight·length over all length assignments satisfying Kraft's
/// inequality; every such assignment is realised by some prefix code.
fn brute_force_cost(weights: &[f64]) -> f64 {
    let n = weights.len();
    if n == 1 {
        return 0.0;
    }

    let max_len = (n - 1) as u32;
    let budget = 1u64 << max_len;
    let mut lengths = vec![1u32; n];
    let mut best = f64::INFINITY;

    loop {
        let kraft: u64 = lengths.iter().map(|&l| 1u64 << (max_len - l)).sum();
        if kraft <= budget {
            let cost: f64 = weights
                .iter()
                .zip(&lengths)
                .map(|(w, &l)| w * l as f64)
                .sum();
            best = best.min(cost);
        }

        // odometer over lengths 1..=max_len
        let mut i = 0;
        loop {
            if i == n {
                return best;
            }
            if lengths[i] < max_len {
                lengths[i] += 1;
                break;
            }
            lengths[i] = 1;
            i += 1;
        }
    }
}

fn codes(tree: &HuffmanTree<u8>) -> Vec<(u8, BitVec)> {
    tree.code_table()
        .iter()
        .map(|(s, c)| (*s, c.to_bitvec()))
        .collect()
}

#[test]
fn brute_force_reference() {
    assert_eq!(brute_force_cost(&[0.5, 0.25, 0.25]), 1.5);
    assert_eq!(brute_force_cost(&[1.0, 1.0, 1.0, 1.0]), 8.0);
}

#[test]
fn three_symbol_expected_length() {
    let tree = HuffmanTree::build(&[b'a', b'b', b'c'], &[0.5, 0.25, 0.25]).unwrap();
    let table = tree.code_table();

    let lengths: Vec<usize> = [b'a', b'b', b'c']
        .iter()
        .map(|s| table.get(s).unwrap().len())
        .collect();
    assert_eq!(lengths, vec![1, 2, 2]);
    assert_eq!(tree.weighted_path_length(), 1.5);

    let a = to_ascii(table.get(&b'a').unwrap());
    assert!(a == "0" || a == "1");
}

#[test]
fn skewed_weights_build_a_deep_tree() {
    let n = 40;
    let symbols: Vec<u8> = (0..n).collect();
    let weights: Vec<f64> = (0..n).map(|i| 2f64.powi(i as i32)).collect();
    let tree = HuffmanTree::build(&symbols, &weights).unwrap();

    assert_eq!(tree.max_depth(), n as usize - 1);

    let data: Vec<u8> = symbols.iter().rev().copied().collect();
    let (e, d) = tree.into_encoder_decoder_pair();
    let bits = e.encode(data.iter().copied()).unwrap();
    assert_eq!(d.decode(&bits), data);
}

proptest! {
    #[test]
    fn round_trip(
        weights in prop::collection::vec(0.0f64..1.0, 1..40),
        picks in prop::collection::vec(any::<Index>(), 0..200),
    ) {
        let symbols: Vec<u8> = (0..weights.len() as u8).collect();
        let data: Vec<u8> = picks.iter().map(|i| symbols[i.index(symbols.len())]).collect();

        let tree = HuffmanTree::build(&symbols, &weights).unwrap();
        let (e, d) = tree.into_encoder_decoder_pair();
        let bits = e.encode(data.iter().copied()).unwrap();

        prop_assert_eq!(d.decode(&bits), data);
    }

    #[test]
    fn prefix_free(weights in prop::collection::vec(0.0f64..10.0, 2..64)) {
        let symbols: Vec<u8> = (0..weights.len() as u8).collect();
        let tree = HuffmanTree::build(&symbols, &weights).unwrap();
        let table = codes(&tree);

        prop_assert_eq!(table.len(), weights.len());
        for (i, (_, a)) in table.iter().enumerate() {
            for (j, (_, b)) in table.iter().enumerate() {
                if i != j {
                    prop_assert!(!b.starts_with(a.as_bitslice()));
                }
            }
        }

        // a full binary tree meets Kraft's inequality with equality
        let kraft: f64 = table.iter().map(|(_, c)| 0.5f64.powi(c.len() as i32)).sum();
        prop_assert!((kraft - 1.0).abs() < 1e-9);
    }

    #[test]
    fn deterministic(weights in prop::collection::vec(0u8..4, 1..50)) {
        // few distinct weights so ties are common
        let weights: Vec<f64> = weights.into_iter().map(f64::from).collect();
        let symbols: Vec<u8> = (0..weights.len() as u8).collect();

        let first = HuffmanTree::build(&symbols, &weights).unwrap();
        let second = HuffmanTree::build(&symbols, &weights).unwrap();

        prop_assert_eq!(codes(&first), codes(&second));
    }

    #[test]
    fn optimal_against_brute_force(weights in prop::collection::vec(0u32..20, 1..=6)) {
        let weights: Vec<f64> = weights.into_iter().map(f64::from).collect();
        let symbols: Vec<u8> = (0..weights.len() as u8).collect();
        let tree = HuffmanTree::build(&symbols, &weights).unwrap();

        prop_assert!((tree.weighted_path_length() - brute_force_cost(&weights)).abs() < 1e-9);
    }

    #[test]
    fn cost_ignores_enumeration_order(
        weights in prop::collection::vec(0u32..5, 2..30),
        rotate in any::<Index>(),
    ) {
        let weights: Vec<f64> = weights.into_iter().map(f64::from).collect();
        let symbols: Vec<u8> = (0..weights.len() as u8).collect();
        let mut rotated = weights.clone();
        rotated.rotate_left(rotate.index(weights.len()));
        rotated.reverse();

        let a = HuffmanTree::build(&symbols, &weights).unwrap();
        let b = HuffmanTree::build(&symbols, &rotated).unwrap();

        prop_assert!((a.weighted_path_length() - b.weighted_path_length()).abs() < 1e-9);
    }
}
