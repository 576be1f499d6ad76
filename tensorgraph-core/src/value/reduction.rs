use super::{Element, Value};
use crate::error::GraphError;

impl<T: Element> Value<T> {
    /// Sums every element into a scalar.
    pub fn sum_all(&self) -> Value<T> {
        Value::scalar(self.data.iter().fold(T::zero(), |acc, &x| acc + x))
    }

    /// Sums along `axis`, removing that dimension from the shape.
    ///
    /// # Errors
    /// `GraphError::AxisOutOfBounds` if `axis >= rank`.
    pub fn sum_axis(&self, axis: usize) -> Result<Value<T>, GraphError> {
        let (outer, len, inner) = self.split_at_axis(axis)?;
        let mut result = vec![T::zero(); outer * inner];
        for o in 0..outer {
            for k in 0..len {
                let base = (o * len + k) * inner;
                for i in 0..inner {
                    result[o * inner + i] = result[o * inner + i] + self.data[base + i];
                }
            }
        }
        let mut shape = self.shape.clone();
        shape.remove(axis);
        Ok(Value {
            shape,
            data: result,
        })
    }

    /// Inserts a new dimension of length `len` at `axis`, repeating the data
    /// along it. Inverse of [`Value::sum_axis`] with respect to shape.
    ///
    /// # Errors
    /// `GraphError::AxisOutOfBounds` if `axis > rank`.
    pub fn expand_axis(&self, axis: usize, len: usize) -> Result<Value<T>, GraphError> {
        if axis > self.rank() {
            return Err(GraphError::AxisOutOfBounds {
                axis,
                rank: self.rank(),
            });
        }
        let outer: usize = self.shape[..axis].iter().product();
        let inner: usize = self.shape[axis..].iter().product();
        let mut data = Vec::with_capacity(outer * len * inner);
        for o in 0..outer {
            let block = &self.data[o * inner..(o + 1) * inner];
            for _ in 0..len {
                data.extend_from_slice(block);
            }
        }
        let mut shape = self.shape.clone();
        shape.insert(axis, len);
        Ok(Value { shape, data })
    }

    /// Arithmetic mean of all elements. NaN for an empty value.
    pub fn mean(&self) -> T {
        let total = self.data.iter().fold(T::zero(), |acc, &x| acc + x);
        match T::from(self.numel()) {
            Some(n) => total / n,
            None => T::nan(),
        }
    }

    /// Splits the shape into (product before axis, axis length, product after axis).
    fn split_at_axis(&self, axis: usize) -> Result<(usize, usize, usize), GraphError> {
        if axis >= self.rank() {
            return Err(GraphError::AxisOutOfBounds {
                axis,
                rank: self.rank(),
            });
        }
        let outer = self.shape[..axis].iter().product();
        let inner = self.shape[axis + 1..].iter().product();
        Ok((outer, self.shape[axis], inner))
    }
}
