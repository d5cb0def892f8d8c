//! Size Estimation Module
//!
//! Best-effort byte size of cached values. Estimation never fails: anything
//! that cannot be measured counts as zero bytes.

use serde::Serialize;

// == Size Estimator ==
/// Estimates how many bytes a cached value occupies.
pub trait SizeEstimator<T>: Send + Sync {
    fn estimate(&self, value: &T) -> usize;
}

// == JSON Estimator ==
/// Measures the length of the value's JSON encoding.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonSizeEstimator;

impl<T: Serialize> SizeEstimator<T> for JsonSizeEstimator {
    fn estimate(&self, value: &T) -> usize {
        serde_json::to_vec(value).map(|bytes| bytes.len()).unwrap_or(0)
    }
}

// == Fixed Estimator ==
/// Charges the same size for every value. Useful for tests and for
/// values with no serialized form.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixedSizeEstimator(pub usize);

impl<T> SizeEstimator<T> for FixedSizeEstimator {
    fn estimate(&self, _value: &T) -> usize {
        self.0
    }
}

impl<T, F> SizeEstimator<T> for F
where
    F: Fn(&T) -> usize + Send + Sync,
{
    fn estimate(&self, value: &T) -> usize {
        self(value)
    }
}
