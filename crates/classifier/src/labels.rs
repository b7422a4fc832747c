// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The fixed class-name table.

/// Ordered class names. Index `i` of every score vector corresponds to
/// entry `i` here; the order is part of the artifact contract and must
/// never change independently of the trained model.
pub const LABELS: [&str; 4] = ["Cataract", "Diabetic Retinopathy", "Glaucoma", "Normal"];

/// Returns the class name for a score-vector index, or `None` if the index
/// is out of range.
pub fn label_name(index: usize) -> Option<&'static str> {
    LABELS.get(index).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_order() {
        assert_eq!(
            LABELS,
            ["Cataract", "Diabetic Retinopathy", "Glaucoma", "Normal"]
        );
    }

    #[test]
    fn test_label_name() {
        assert_eq!(label_name(0), Some("Cataract"));
        assert_eq!(label_name(3), Some("Normal"));
        assert_eq!(label_name(4), None);
    }
}
