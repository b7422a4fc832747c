// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The owned f32 tensor type.

use crate::{Shape, TensorError};

/// An owned, n-dimensional f32 tensor stored in contiguous row-major memory.
///
/// `Tensor` is the data carrier between the preprocessor and the model
/// backend. Its shape is fixed at construction; there is deliberately no
/// reshape — a tensor that does not match the backend's declared input
/// shape is an error, never silently coerced.
#[derive(Debug, Clone, PartialEq)]
pub struct Tensor {
    shape: Shape,
    data: Vec<f32>,
}

impl Tensor {
    /// Creates a new tensor filled with zeros.
    ///
    /// # Examples
    /// ```
    /// use tensor_core::{Tensor, Shape};
    /// let t = Tensor::zeros(Shape::scores(1, 4));
    /// assert_eq!(t.data(), &[0.0; 4]);
    /// ```
    pub fn zeros(shape: Shape) -> Self {
        let n = shape.num_elements();
        Self {
            shape,
            data: vec![0.0; n],
        }
    }

    /// Creates a tensor from a vector of elements.
    ///
    /// Returns an error if `data.len()` does not equal `shape.num_elements()`.
    pub fn from_vec(shape: Shape, data: Vec<f32>) -> Result<Self, TensorError> {
        let expected = shape.num_elements();
        if data.len() != expected {
            return Err(TensorError::ElementCountMismatch {
                expected,
                actual: data.len(),
                shape,
            });
        }
        Ok(Self { shape, data })
    }

    /// Returns the tensor's shape.
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Returns the elements as a flat slice in row-major order.
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Returns a mutable slice over the elements.
    pub fn data_mut(&mut self) -> &mut [f32] {
        &mut self.data
    }

    /// Consumes the tensor and returns its flat element vector.
    pub fn into_vec(self) -> Vec<f32> {
        self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zeros() {
        let t = Tensor::zeros(Shape::image(1, 2, 2, 3));
        assert_eq!(t.data().len(), 12);
        assert!(t.data().iter().all(|&x| x == 0.0));
    }

    #[test]
    fn test_from_vec() {
        let t = Tensor::from_vec(Shape::scores(1, 4), vec![0.7, 0.1, 0.1, 0.1]).unwrap();
        assert_eq!(t.shape(), &Shape::scores(1, 4));
        assert_eq!(t.data(), &[0.7, 0.1, 0.1, 0.1]);
    }

    #[test]
    fn test_from_vec_count_mismatch() {
        let result = Tensor::from_vec(Shape::scores(1, 4), vec![1.0; 3]);
        assert!(matches!(
            result,
            Err(TensorError::ElementCountMismatch {
                expected: 4,
                actual: 3,
                ..
            })
        ));
    }

    #[test]
    fn test_data_mut() {
        let mut t = Tensor::zeros(Shape::vector(3));
        t.data_mut()[1] = 5.0;
        assert_eq!(t.data(), &[0.0, 5.0, 0.0]);
    }

    #[test]
    fn test_into_vec() {
        let t = Tensor::from_vec(Shape::vector(2), vec![1.0, 2.0]).unwrap();
        assert_eq!(t.into_vec(), vec![1.0, 2.0]);
    }
}
