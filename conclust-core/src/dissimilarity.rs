//! Condensed pairwise dissimilarity input.
//!
//! Callers supply dissimilarities as the upper triangle of the symmetric
//! n×n matrix, flattened row by row: `d(0,1), d(0,2), …, d(0,n-1), d(1,2),
//! …, d(n-2,n-1)`. Computing dissimilarities from raw observations is the
//! caller's concern.

use tracing::warn;

use crate::error::DissimilarityError;

/// Validated condensed dissimilarity input over `n` observations.
///
/// # Examples
/// ```
/// use conclust_core::Dissimilarity;
///
/// let d = Dissimilarity::from_condensed(3, vec![1.0, 2.0, 4.0])?;
/// assert_eq!(d.len(), 3);
/// assert_eq!(d.get(0, 2), 2.0);
/// assert_eq!(d.get(2, 0), 2.0);
/// # Ok::<(), conclust_core::DissimilarityError>(())
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Dissimilarity {
    n: usize,
    values: Vec<f64>,
}

impl Dissimilarity {
    /// Builds an input from a condensed upper-triangle array.
    ///
    /// The array must hold at least `n(n-1)/2` values; a longer array is
    /// accepted with a warning and the excess ignored.
    ///
    /// # Errors
    /// Returns [`DissimilarityError::TooFewObservations`] when `n < 2`,
    /// [`DissimilarityError::TooShort`] when the array cannot cover every
    /// pair, and [`DissimilarityError::InvalidValue`] when a value is
    /// non-finite or negative.
    pub fn from_condensed(n: usize, mut values: Vec<f64>) -> Result<Self, DissimilarityError> {
        if n < 2 {
            return Err(DissimilarityError::TooFewObservations { n });
        }
        let expected = n * (n - 1) / 2;
        if values.len() < expected {
            return Err(DissimilarityError::TooShort {
                n,
                expected,
                got: values.len(),
            });
        }
        if values.len() > expected {
            warn!(
                n,
                expected,
                got = values.len(),
                "condensed array longer than required; ignoring the excess"
            );
            values.truncate(expected);
        }
        if let Some((index, &value)) = values
            .iter()
            .enumerate()
            .find(|(_, value)| !value.is_finite() || **value < 0.0)
        {
            return Err(DissimilarityError::InvalidValue { index, value });
        }
        Ok(Self { n, values })
    }

    /// Returns the number of observations.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.n
    }

    /// Returns whether the input is empty. Construction rejects `n < 2`, so
    /// this is always false; provided for container-convention symmetry.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// Returns the dissimilarity between observations `i` and `j`.
    ///
    /// # Panics
    /// Panics when `i == j` or either index is out of range; the engine only
    /// queries distinct valid pairs.
    #[must_use]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        let (low, high) = if i < j { (i, j) } else { (j, i) };
        assert!(low < high && high < self.n, "invalid pair ({i}, {j})");
        // Row-major upper triangle: row `low` starts after the rows above it.
        let offset = low * self.n - low * (low + 1) / 2;
        self.values[offset + high - low - 1]
    }

    /// Returns the condensed values in row-major upper-triangle order.
    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }
}
