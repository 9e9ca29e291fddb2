//! Dense row-major float tensors.
//!
//! Observation and extras generators hand back per-agent feature arrays of
//! arbitrary rank.  A thin `Vec<f32>` + shape pair covers that without
//! pulling in an array crate: indexing is explicit, allocation happens once
//! per call, and consumers that want a flat view just take `data()`.

/// A dense row-major `f32` array with an explicit shape.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tensor {
    shape: Vec<usize>,
    data: Vec<f32>,
}

impl Tensor {
    /// All-zero tensor of the given shape.
    pub fn zeros(shape: &[usize]) -> Self {
        let len = shape.iter().product();
        Tensor {
            shape: shape.to_vec(),
            data: vec![0.0; len],
        }
    }

    /// Build from existing data.  The data length must match the shape's
    /// element count.
    pub fn from_data(shape: &[usize], data: Vec<f32>) -> Self {
        debug_assert_eq!(shape.iter().product::<usize>(), data.len());
        Tensor {
            shape: shape.to_vec(),
            data,
        }
    }

    #[inline]
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    #[inline]
    pub fn data_mut(&mut self) -> &mut [f32] {
        &mut self.data
    }

    /// Flat offset of a multi-dimensional index.
    ///
    /// # Panics
    ///
    /// In debug builds, if `index` has the wrong rank or is out of bounds.
    #[inline]
    pub fn offset(&self, index: &[usize]) -> usize {
        debug_assert_eq!(index.len(), self.shape.len());
        let mut flat = 0;
        for (k, &i) in index.iter().enumerate() {
            debug_assert!(i < self.shape[k]);
            flat = flat * self.shape[k] + i;
        }
        flat
    }

    #[inline]
    pub fn get(&self, index: &[usize]) -> f32 {
        self.data[self.offset(index)]
    }

    #[inline]
    pub fn set(&mut self, index: &[usize], value: f32) {
        let flat = self.offset(index);
        self.data[flat] = value;
    }

    /// Reinterpret the same data under a new shape with the same element
    /// count.
    pub fn reshape(mut self, shape: &[usize]) -> Self {
        debug_assert_eq!(shape.iter().product::<usize>(), self.data.len());
        self.shape = shape.to_vec();
        self
    }

    /// Stack `n` copies of `self` along a new leading axis, e.g. to
    /// broadcast one observation to every agent.
    pub fn tile(&self, n: usize) -> Tensor {
        let mut shape = Vec::with_capacity(self.shape.len() + 1);
        shape.push(n);
        shape.extend_from_slice(&self.shape);

        let mut data = Vec::with_capacity(self.data.len() * n);
        for _ in 0..n {
            data.extend_from_slice(&self.data);
        }
        Tensor { shape, data }
    }

    /// Borrow the `k`-th slice along the leading axis as a flat `&[f32]`.
    pub fn slice(&self, k: usize) -> &[f32] {
        let stride: usize = self.shape[1..].iter().product();
        &self.data[k * stride..(k + 1) * stride]
    }

    /// Mutable variant of [`slice`][Tensor::slice].
    pub fn slice_mut(&mut self, k: usize) -> &mut [f32] {
        let stride: usize = self.shape[1..].iter().product();
        &mut self.data[k * stride..(k + 1) * stride]
    }
}
