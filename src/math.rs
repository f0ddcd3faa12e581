use ndarray::{Array1, ArrayBase, Data, Ix1};

/// Calculates the arithmetic mean of the values.
///
/// # Parameters
///
/// - `values` - Observed values stored in a 1D array
///
/// # Returns
///
/// - `f64` - Mean of the provided values (0.0 when the array is empty)
///
/// # Examples
/// ```rust
/// use deepnet::math::mean;
/// use ndarray::array;
///
/// let values = array![1.0, 2.0, 3.0];
/// assert!((mean(&values) - 2.0).abs() < 1e-12);
/// ```
#[inline]
pub fn mean<S>(values: &ArrayBase<S, Ix1>) -> f64
where
    S: Data<Elem = f64>,
{
    if values.is_empty() {
        return 0.0;
    }
    values.sum() / values.len() as f64
}

/// Calculates the sample variance of the values.
///
/// Uses Bessel's correction: the sum of squared deviations is divided by `n - 1`.
/// A single observation carries no spread, so arrays of length 0 or 1 yield 0.0.
///
/// # Parameters
///
/// - `values` - Observed values stored in a 1D array
///
/// # Returns
///
/// - `f64` - Sample variance of the provided values
///
/// # Examples
/// ```rust
/// use deepnet::math::variance;
/// use ndarray::array;
///
/// let values = array![1.0, 2.0, 3.0];
/// // Mean is 2.0, so variance = ((1-2)^2 + (3-2)^2) / (3 - 1) = 1.0
/// assert!((variance(&values) - 1.0).abs() < 1e-12);
/// assert_eq!(variance(&array![42.0]), 0.0);
/// ```
#[inline]
pub fn variance<S>(values: &ArrayBase<S, Ix1>) -> f64
where
    S: Data<Elem = f64>,
{
    let n = values.len();
    if n <= 1 {
        return 0.0;
    }
    let m = mean(values);
    let sum_squared_diff = values.fold(0.0, |acc, &x| {
        let diff = x - m;
        acc + diff * diff
    });
    sum_squared_diff / (n - 1) as f64
}

/// Calculates the sample standard deviation of the values.
///
/// # Returns
///
/// - `f64` - Square root of the sample variance
#[inline]
pub fn standard_deviation<S>(values: &ArrayBase<S, Ix1>) -> f64
where
    S: Data<Elem = f64>,
{
    variance(values).sqrt()
}

/// Standardizes values to zero mean and unit variance (z-score).
///
/// A standard deviation of zero is treated as 1.0 so that constant inputs map to
/// all zeros instead of NaN.
///
/// # Parameters
///
/// - `values` - Observed values stored in a 1D array
///
/// # Returns
///
/// - `Array1<f64>` - Standardized copy of the input
pub fn standardize<S>(values: &ArrayBase<S, Ix1>) -> Array1<f64>
where
    S: Data<Elem = f64>,
{
    let m = mean(values);
    let mut s = standard_deviation(values);
    if s == 0.0 {
        s = 1.0;
    }
    values.mapv(|x| (x - m) / s)
}

/// Scales values into the [0, 1] range via min/max normalization.
///
/// A degenerate range (max == min) yields all zeros.
///
/// # Parameters
///
/// - `values` - Observed values stored in a 1D array
///
/// # Returns
///
/// - `Array1<f64>` - Normalized copy of the input
pub fn normalize<S>(values: &ArrayBase<S, Ix1>) -> Array1<f64>
where
    S: Data<Elem = f64>,
{
    let lo = min(values);
    let hi = max(values);
    let range = hi - lo;
    if range == 0.0 {
        return Array1::zeros(values.len());
    }
    values.mapv(|x| (x - lo) / range)
}

/// Returns the smallest element, or NaN when the array is empty.
#[inline]
pub fn min<S>(values: &ArrayBase<S, Ix1>) -> f64
where
    S: Data<Elem = f64>,
{
    values.fold(f64::NAN, |acc, &x| if x < acc || acc.is_nan() { x } else { acc })
}

/// Returns the largest element, or NaN when the array is empty.
#[inline]
pub fn max<S>(values: &ArrayBase<S, Ix1>) -> f64
where
    S: Data<Elem = f64>,
{
    values.fold(f64::NAN, |acc, &x| if x > acc || acc.is_nan() { x } else { acc })
}

/// Returns the index of the largest element.
///
/// Ties are broken towards the earliest index; an empty array yields 0.
///
/// # Examples
/// ```rust
/// use deepnet::math::argmax;
/// use ndarray::array;
///
/// assert_eq!(argmax(&array![0.1, 0.7, 0.2]), 1);
/// // First occurrence wins on ties
/// assert_eq!(argmax(&array![3.0, 1.0, 3.0]), 0);
/// ```
#[inline]
pub fn argmax<S>(values: &ArrayBase<S, Ix1>) -> usize
where
    S: Data<Elem = f64>,
{
    let mut best = f64::NEG_INFINITY;
    let mut idx = 0;
    for (i, &x) in values.iter().enumerate() {
        if x > best {
            best = x;
            idx = i;
        }
    }
    idx
}

/// Signum: -1.0 for negative values, 1.0 for positive values, 0.0 otherwise.
#[inline]
pub fn sgn(x: f64) -> f64 {
    if x < 0.0 {
        -1.0
    } else if x > 0.0 {
        1.0
    } else {
        0.0
    }
}

/// Sum of the values.
#[inline]
pub fn sum<S>(values: &ArrayBase<S, Ix1>) -> f64
where
    S: Data<Elem = f64>,
{
    values.sum()
}

/// Computes the softmax of the values.
///
/// The maximum element is subtracted before exponentiation to keep the computation
/// numerically stable; the result is normalized by the sum of exponentials and is
/// always computed over the full vector, never per element.
///
/// # Parameters
///
/// - `values` - Input logits stored in a 1D array
///
/// # Returns
///
/// - `Array1<f64>` - Non-negative values summing to 1.0
///
/// # Examples
/// ```rust
/// use deepnet::math::softmax;
/// use ndarray::array;
///
/// let out = softmax(&array![1.0, 2.0, 3.0]);
/// assert!((out.sum() - 1.0).abs() < 1e-12);
/// ```
pub fn softmax<S>(values: &ArrayBase<S, Ix1>) -> Array1<f64>
where
    S: Data<Elem = f64>,
{
    let max_val = max(values);
    let mut out = values.mapv(|x| (x - max_val).exp());
    let total = out.sum();
    out.mapv_inplace(|x| x / total);
    out
}

/// Rounds to the nearest integer, halves away from negative infinity.
#[inline]
pub fn round_half_up(x: f64) -> f64 {
    (x + 0.5).floor()
}

/// Dot product of two equally sized vectors.
#[inline]
pub fn dot<S1, S2>(xx: &ArrayBase<S1, Ix1>, yy: &ArrayBase<S2, Ix1>) -> f64
where
    S1: Data<Elem = f64>,
    S2: Data<Elem = f64>,
{
    xx.iter().zip(yy.iter()).map(|(x, y)| x * y).sum()
}
