// Copyright 2025 the tuicore Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Deterministic integer-remainder distribution.
//!
//! Every proportional split in the layout engine (flex grow, flex shrink,
//! `justify: between/around/evenly`, scrollbar thumb sizing) goes through this
//! single routine so that results are bit-identical across platforms: no
//! floating-point rounding is allowed to influence a cell count.

use alloc::vec::Vec;

/// Distribute `total` non-negative units across `weights.len()` slots, weighted by `weights`.
///
/// Each slot first receives `floor(total * weight / sum_weights)`. The
/// leftover units (at most `weights.len() - 1`) are awarded one at a time to
/// the slots with the largest fractional remainder, ties broken by the lower
/// index. Slots with zero weight receive zero units (and never receive a
/// leftover) unless every weight is zero, in which case leftovers are
/// distributed evenly by index starting from zero.
#[must_use]
pub fn distribute(total: u32, weights: &[u32]) -> Vec<u32> {
    let n = weights.len();
    if n == 0 {
        return Vec::new();
    }
    let sum: u64 = weights.iter().map(|&w| u64::from(w)).sum();
    if sum == 0 {
        // No weights to distribute by: spread leftovers by ascending index.
        let mut out = alloc::vec![0u32; n];
        let base = total / n as u32;
        let mut leftover = total - base * n as u32;
        for slot in out.iter_mut() {
            *slot = base;
            if leftover > 0 {
                *slot += 1;
                leftover -= 1;
            }
        }
        return out;
    }

    let total64 = u64::from(total);
    let mut shares = Vec::with_capacity(n);
    let mut remainders = Vec::with_capacity(n);
    let mut distributed: u64 = 0;
    for &w in weights {
        let scaled = total64 * u64::from(w);
        let share = scaled / sum;
        let remainder = scaled - share * sum;
        shares.push(share as u32);
        remainders.push(remainder);
        distributed += share;
    }

    let mut leftover = total64 - distributed;
    // Order indices by descending remainder, ties broken by ascending index.
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| remainders[b].cmp(&remainders[a]).then(a.cmp(&b)));

    for &idx in &order {
        if leftover == 0 {
            break;
        }
        if weights[idx] == 0 {
            continue;
        }
        shares[idx] += 1;
        leftover -= 1;
    }

    shares
}

/// Re-clamp a set of grown/shrunk shares against per-slot `[min, max]` bounds,
/// returning the unspent pool to redistribute among slots that have not yet
/// hit their cap. Iterates until no further progress is possible.
///
/// `weights` must have the same length as `shares`/`bounds`. Slots that hit a
/// bound stop participating in further redistribution (their weight is
/// treated as zero on subsequent passes).
pub fn redistribute_with_bounds(
    mut pool: u32,
    weights: &[u32],
    bounds: &[(u32, u32)],
    base: &[u32],
) -> Vec<u32> {
    let n = weights.len();
    let mut shares: Vec<u32> = base.to_vec();
    let mut active_weights: Vec<u32> = weights.to_vec();

    loop {
        if pool == 0 {
            break;
        }
        let active_sum: u32 = active_weights.iter().sum();
        if active_sum == 0 {
            break;
        }
        let add = distribute(pool, &active_weights);
        let mut progressed = false;
        let mut remaining_pool = pool;
        for i in 0..n {
            if add[i] == 0 {
                continue;
            }
            let room = bounds[i].1.saturating_sub(shares[i]);
            let grant = add[i].min(room);
            if grant > 0 {
                shares[i] += grant;
                remaining_pool -= grant;
                progressed = true;
            }
            if grant < add[i] || room == 0 {
                active_weights[i] = 0;
            }
        }
        pool = remaining_pool;
        if !progressed {
            break;
        }
    }

    shares
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flex_grow_remainder_lands_on_lowest_index() {
        // Three equal-weight boxes splitting 100 cells: 34, 33, 33.
        let shares = distribute(100, &[1, 1, 1]);
        assert_eq!(shares, alloc::vec![34, 33, 33]);
    }

    #[test]
    fn zero_total_yields_all_zero_shares() {
        assert_eq!(distribute(0, &[1, 2, 3]), alloc::vec![0, 0, 0]);
    }

    #[test]
    fn zero_weights_spread_by_ascending_index() {
        assert_eq!(distribute(5, &[0, 0]), alloc::vec![3, 2]);
    }

    #[test]
    fn weighted_distribution_is_proportional() {
        let shares = distribute(10, &[1, 3]);
        assert_eq!(shares.iter().sum::<u32>(), 10);
        // weight 3 should receive roughly 3x weight 1's share.
        assert!(shares[1] >= shares[0]);
    }

    #[test]
    fn single_slot_receives_everything() {
        assert_eq!(distribute(7, &[1]), alloc::vec![7]);
    }
}
