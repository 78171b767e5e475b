//! Utility functions for the contiguous-arc test

use crate::types::Polarity;

/// Length of the longest circular run of values strictly above `threshold`
///
/// The scan is anchored at the smallest value. Unless every value passes,
/// that position breaks any run, so a single pass around the ring suffices.
#[inline]
pub fn longest_circular_run(values: &[f32], threshold: f32) -> usize {
    longest_signed_run(values, threshold, 1.0)
}

fn longest_signed_run(values: &[f32], threshold: f32, sign: f32) -> usize {
    let Some((min_idx, min_val)) = values
        .iter()
        .map(|v| sign * v)
        .enumerate()
        .min_by(|a, b| a.1.total_cmp(&b.1))
    else {
        return 0;
    };

    if min_val >= threshold {
        return values.len();
    }

    let n = values.len();
    let mut longest = 0;
    let mut current = 0;
    for offset in 0..n {
        if sign * values[(min_idx + offset) % n] > threshold {
            current += 1;
            longest = longest.max(current);
        } else {
            current = 0;
        }
    }
    longest
}

/// Direction of a long enough arc in the ring differences, brighter first
#[inline]
pub fn arc_polarity(diffs: &[f32], threshold: f32, min_run: usize) -> Option<Polarity> {
    if longest_signed_run(diffs, threshold, 1.0) >= min_run {
        Some(Polarity::Brighter)
    } else if longest_signed_run(diffs, threshold, -1.0) >= min_run {
        Some(Polarity::Darker)
    } else {
        None
    }
}
