// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Numeric helpers for score vectors: softmax and argmax.

/// Computes softmax over `values` in place:
/// `values[i] = exp(x[i] - max) / sum(exp(x - max))`.
///
/// Uses the numerically stable variant that subtracts the maximum value
/// before exponentiation to prevent overflow. An empty slice is a no-op.
pub fn softmax_in_place(values: &mut [f32]) {
    if values.is_empty() {
        return;
    }

    let max_val = values.iter().copied().fold(f32::NEG_INFINITY, f32::max);

    let mut sum = 0.0f32;
    for v in values.iter_mut() {
        *v = (*v - max_val).exp();
        sum += *v;
    }

    if sum > 0.0 {
        let inv_sum = 1.0 / sum;
        for v in values.iter_mut() {
            *v *= inv_sum;
        }
    }
}

/// Returns the index of the maximum value, or `None` for an empty slice.
///
/// Ties break to the lowest index (first occurrence), so the result is
/// deterministic regardless of how the scores were produced. NaN entries
/// never win a comparison and are effectively skipped.
pub fn argmax(values: &[f32]) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (i, &v) in values.iter().enumerate() {
        match best {
            Some((_, b)) if !(v > b) => {}
            _ if v.is_nan() => {}
            _ => best = Some((i, v)),
        }
    }
    // All-NaN input still selects index 0 to keep the result total.
    best.map(|(i, _)| i).or(if values.is_empty() { None } else { Some(0) })
}
