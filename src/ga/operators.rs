//! Permutation operators for the genetic engine.
//!
//! - [`order_crossover`] (OX, Davis 1985): keeps a segment of one parent and
//!   the relative order of the other
//! - [`swap_mutation`]: exchanges two random positions
//! - [`tournament`]: index of the fittest of `k` random draws

use rand::Rng;

/// Order crossover on permutations of `0..n`.
///
/// 1. Pick a random segment `[start, end]`
/// 2. Copy it from the template parent into the child at the same positions
/// 3. Fill the rest from the other parent, starting after the segment and
///    wrapping around, skipping values already present
///
/// Parents must be permutations of the same `0..n`. Empty or single-element
/// parents are returned unchanged.
pub fn order_crossover<R: Rng>(
    parent1: &[usize],
    parent2: &[usize],
    rng: &mut R,
) -> (Vec<usize>, Vec<usize>) {
    let n = parent1.len();
    if n < 2 || parent2.len() != n {
        return (parent1.to_vec(), parent2.to_vec());
    }
    let (start, end) = random_segment(n, rng);
    (
        ox_child(parent1, parent2, start, end),
        ox_child(parent2, parent1, start, end),
    )
}

fn ox_child(template: &[usize], donor: &[usize], start: usize, end: usize) -> Vec<usize> {
    let n = template.len();
    let mut child = vec![usize::MAX; n];
    let mut taken = vec![false; n];
    for i in start..=end {
        child[i] = template[i];
        taken[template[i]] = true;
    }
    let mut pos = (end + 1) % n;
    for offset in 0..n {
        let gene = donor[(end + 1 + offset) % n];
        if !taken[gene] {
            child[pos] = gene;
            taken[gene] = true;
            pos = (pos + 1) % n;
        }
    }
    child
}

fn random_segment<R: Rng>(n: usize, rng: &mut R) -> (usize, usize) {
    let a = rng.random_range(0..n);
    let b = rng.random_range(0..n);
    (a.min(b), a.max(b))
}

/// Exchanges two random positions.
pub fn swap_mutation<R: Rng>(perm: &mut [usize], rng: &mut R) {
    let n = perm.len();
    if n < 2 {
        return;
    }
    let i = rng.random_range(0..n);
    let j = rng.random_range(0..n);
    perm.swap(i, j);
}

/// Tournament selection over fitness values (lower is better).
///
/// Works with any partially ordered fitness; incomparable values keep the
/// earlier draw.
///
/// # Panics
///
/// Panics if `fitness` is empty.
pub fn tournament<T: PartialOrd, R: Rng>(fitness: &[T], k: usize, rng: &mut R) -> usize {
    let n = fitness.len();
    let mut best = rng.random_range(0..n);
    for _ in 1..k.max(1) {
        let idx = rng.random_range(0..n);
        if fitness[idx] < fitness[best] {
            best = idx;
        }
    }
    best
}
