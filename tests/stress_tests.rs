//! Stress tests that push the heaps with large seeded workloads
//!
//! These tests perform large numbers of operations in various patterns
//! to catch edge cases and verify correctness under load.

use mergeable_heaps::fibonacci::FibonacciHeap;
use mergeable_heaps::leftist::LeftistHeap;
use mergeable_heaps::pairing::PairingHeap;
use mergeable_heaps::skew::SkewHeap;
use mergeable_heaps::{DecreaseKeyHeap, Heap};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::collections::BTreeSet;

/// Test massive numbers of inserts and pops
fn test_massive_operations<H: Heap<i32, i32>>() {
    let mut heap = H::new();
    let mut values: Vec<i32> = (0..20_000).collect();
    values.shuffle(&mut StdRng::seed_from_u64(1));

    for &v in &values {
        heap.push(v, v);
    }
    assert_eq!(heap.len(), 20_000);

    for i in 0..20_000 {
        assert_eq!(heap.pop(), Some((i, i)));
    }
    assert!(heap.is_empty());
}

/// Many heaps merged pairwise down to one
fn test_merge_tournament<H: Heap<(), u32>>() {
    let mut rng = StdRng::seed_from_u64(2);
    let mut expected = Vec::new();
    let mut heaps: Vec<H> = (0..256)
        .map(|_| {
            let mut heap = H::new();
            for _ in 0..rng.gen_range(0..40) {
                let p = rng.gen_range(0..10_000);
                heap.push(p, ());
                expected.push(p);
            }
            heap
        })
        .collect();

    while heaps.len() > 1 {
        let mut next = Vec::with_capacity(heaps.len() / 2);
        let mut iter = heaps.into_iter();
        while let Some(mut a) = iter.next() {
            if let Some(b) = iter.next() {
                a.merge(b);
            }
            next.push(a);
        }
        heaps = next;
    }

    let mut heap = heaps.pop().unwrap();
    expected.sort_unstable();
    assert_eq!(heap.len(), expected.len());
    let popped: Vec<u32> = std::iter::from_fn(|| heap.pop().map(|(p, _)| p)).collect();
    assert_eq!(popped, expected);
}

/// Random decrease_key, update and delete checked against an ordered model
fn test_random_handle_workload<H: DecreaseKeyHeap<u32, i64>>(seed: u64) {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut heap = H::new();
    let mut handles = Vec::new();
    let mut model: BTreeSet<(i64, u32)> = BTreeSet::new();
    let mut current: Vec<Option<i64>> = Vec::new();

    for _ in 0..50_000 {
        match rng.gen_range(0..10) {
            0..=3 => {
                let p = rng.gen_range(0..1_000_000);
                let id = handles.len() as u32;
                handles.push(heap.push_with_handle(p, id));
                current.push(Some(p));
                model.insert((p, id));
            }
            4..=5 => {
                if let Some((p, id)) = heap.pop() {
                    assert_eq!(model.first().map(|&(mp, _)| mp), Some(p));
                    assert!(model.remove(&(p, id)));
                    current[id as usize] = None;
                }
            }
            6..=7 => {
                let id = rng.gen_range(0..handles.len().max(1));
                if let Some(Some(p)) = current.get(id).copied() {
                    let lowered = p - rng.gen_range(0..10_000);
                    heap.decrease_key(&handles[id], lowered).unwrap();
                    model.remove(&(p, id as u32));
                    model.insert((lowered, id as u32));
                    current[id] = Some(lowered);
                }
            }
            8 => {
                let id = rng.gen_range(0..handles.len().max(1));
                if let Some(Some(p)) = current.get(id).copied() {
                    let raised = p + rng.gen_range(0..10_000);
                    heap.update(&handles[id], raised).unwrap();
                    model.remove(&(p, id as u32));
                    model.insert((raised, id as u32));
                    current[id] = Some(raised);
                }
            }
            _ => {
                let id = rng.gen_range(0..handles.len().max(1));
                if let Some(Some(p)) = current.get(id).copied() {
                    assert_eq!(heap.delete(&handles[id]), Ok((p, id as u32)));
                    model.remove(&(p, id as u32));
                    current[id] = None;
                }
            }
        }
        assert_eq!(heap.len(), model.len());
    }

    let expected: Vec<i64> = model.iter().map(|&(p, _)| p).collect();
    let popped: Vec<i64> = std::iter::from_fn(|| heap.pop().map(|(p, _)| p)).collect();
    assert_eq!(popped, expected);
}

/// Long chains of decrease_key on a consolidated heap drive cascading cuts
fn test_decrease_everything<H: DecreaseKeyHeap<usize, i64>>() {
    let n = 10_000;
    let mut heap = H::new();
    let handles: Vec<_> = (0..n).map(|i| heap.push_with_handle(i as i64 + n as i64, i)).collect();
    heap.push(0, usize::MAX);
    assert_eq!(heap.pop(), Some((0, usize::MAX)));

    // Reverse order so every decrease lands under an already-cut ancestor
    for (i, handle) in handles.iter().enumerate().rev() {
        heap.decrease_key(handle, i as i64).unwrap();
    }
    for i in 0..n {
        assert_eq!(heap.pop(), Some((i as i64, i)));
    }
}

#[test]
fn test_fibonacci_massive() {
    test_massive_operations::<FibonacciHeap<i32, i32>>();
}

/// Tournament merge of heaps that each keep their handles, then every
/// handle is used on the single surviving heap
fn test_handles_through_tournament<H: DecreaseKeyHeap<usize, i64>>() {
    let mut rng = StdRng::seed_from_u64(3);
    let mut handles = Vec::new();
    let mut heaps: Vec<H> = (0..128)
        .map(|_| {
            let mut heap = H::new();
            for _ in 0..rng.gen_range(1..30) {
                let id = handles.len();
                handles.push(heap.push_with_handle(1_000_000 + id as i64, id));
            }
            heap
        })
        .collect();

    while heaps.len() > 1 {
        let mut next = Vec::with_capacity(heaps.len() / 2 + 1);
        let mut iter = heaps.into_iter();
        while let Some(mut a) = iter.next() {
            if let Some(b) = iter.next() {
                a.merge(b);
            }
            next.push(a);
        }
        heaps = next;
    }
    let mut heap = heaps.pop().unwrap();
    assert_eq!(heap.len(), handles.len());

    let mut order: Vec<usize> = (0..handles.len()).collect();
    order.shuffle(&mut rng);
    for (rank, &id) in order.iter().enumerate() {
        heap.decrease_key(&handles[id], rank as i64).unwrap();
    }
    for (rank, &id) in order.iter().enumerate().step_by(3) {
        assert_eq!(heap.delete(&handles[id]), Ok((rank as i64, id)));
    }
    for (rank, &id) in order.iter().enumerate() {
        if rank % 3 != 0 {
            assert_eq!(heap.pop(), Some((rank as i64, id)));
        }
    }
    assert!(heap.is_empty());
}

#[test]
fn test_pairing_massive() {
    test_massive_operations::<PairingHeap<i32, i32>>();
}

#[test]
fn test_leftist_massive() {
    test_massive_operations::<LeftistHeap<i32, i32>>();
}

#[test]
fn test_skew_massive() {
    test_massive_operations::<SkewHeap<i32, i32>>();
}

#[test]
fn test_fibonacci_merge_tournament() {
    test_merge_tournament::<FibonacciHeap<(), u32>>();
}

#[test]
fn test_pairing_merge_tournament() {
    test_merge_tournament::<PairingHeap<(), u32>>();
}

#[test]
fn test_leftist_merge_tournament() {
    test_merge_tournament::<LeftistHeap<(), u32>>();
}

#[test]
fn test_skew_merge_tournament() {
    test_merge_tournament::<SkewHeap<(), u32>>();
}

#[test]
fn test_fibonacci_random_handles() {
    for seed in 0..4 {
        test_random_handle_workload::<FibonacciHeap<u32, i64>>(seed);
    }
}

#[test]
fn test_pairing_random_handles() {
    for seed in 0..4 {
        test_random_handle_workload::<PairingHeap<u32, i64>>(seed);
    }
}

#[test]
fn test_fibonacci_decrease_everything() {
    test_decrease_everything::<FibonacciHeap<usize, i64>>();
}

#[test]
fn test_pairing_decrease_everything() {
    test_decrease_everything::<PairingHeap<usize, i64>>();
}

#[test]
fn test_fibonacci_handles_through_tournament() {
    test_handles_through_tournament::<FibonacciHeap<usize, i64>>();
}

#[test]
fn test_pairing_handles_through_tournament() {
    test_handles_through_tournament::<PairingHeap<usize, i64>>();
}
