use rand::Rng;
use tracing::debug;

use crate::error::{NetworkError, Result};
use crate::math::matrix::Matrix;

/// Default lower bound for initial weights.
pub const DEFAULT_INIT_LOWER: f64 = -1.0;
/// Default (exclusive) upper bound for initial weights.
pub const DEFAULT_INIT_UPPER: f64 = 1.0;

/// Single-hidden-layer recurrent network.
///
/// Owns three weight matrices whose shapes are fixed at construction:
/// - `input_weights`  — input_size × hidden_size
/// - `hidden_weights` — hidden_size × hidden_size (the recurrent connection)
/// - `output_weights` — hidden_size × output_size
///
/// The only mutation after construction is the additive update applied by
/// [`GradientAscent::step`](crate::optim::GradientAscent::step).
#[derive(Debug, Clone, PartialEq)]
pub struct RecurrentNetwork {
    pub(crate) input_size: usize,
    pub(crate) hidden_size: usize,
    pub(crate) output_size: usize,
    pub(crate) input_weights: Matrix,
    pub(crate) hidden_weights: Matrix,
    pub(crate) output_weights: Matrix,
}

impl RecurrentNetwork {
    /// Random network with every weight uniform in `[-1, 1)`.
    pub fn initialize<R: Rng + ?Sized>(
        input_size: usize,
        hidden_size: usize,
        output_size: usize,
        rng: &mut R,
    ) -> Result<RecurrentNetwork> {
        Self::initialize_in_range(
            input_size,
            hidden_size,
            output_size,
            DEFAULT_INIT_LOWER,
            DEFAULT_INIT_UPPER,
            rng,
        )
    }

    /// Random network with every weight drawn independently from `[lower, upper)`.
    pub fn initialize_in_range<R: Rng + ?Sized>(
        input_size: usize,
        hidden_size: usize,
        output_size: usize,
        lower: f64,
        upper: f64,
        rng: &mut R,
    ) -> Result<RecurrentNetwork> {
        check_sizes(input_size, hidden_size, output_size)?;
        // Also rejects NaN bounds and spans too wide to sample from.
        if !(lower < upper) || !(upper - lower).is_finite() {
            return Err(NetworkError::InvalidRange { lower, upper });
        }

        debug!(
            input_size,
            hidden_size, output_size, lower, upper, "initializing recurrent network"
        );

        let input_weights = Matrix::random_uniform(input_size, hidden_size, lower, upper, rng);
        let output_weights = Matrix::random_uniform(hidden_size, output_size, lower, upper, rng);
        let hidden_weights = Matrix::random_uniform(hidden_size, hidden_size, lower, upper, rng);

        Ok(RecurrentNetwork {
            input_size,
            hidden_size,
            output_size,
            input_weights,
            hidden_weights,
            output_weights,
        })
    }

    /// Builds a network from explicit weights. Sizes are read off
    /// `input_weights`; the other two matrices must agree with them.
    pub fn from_weights(
        input_weights: Matrix,
        hidden_weights: Matrix,
        output_weights: Matrix,
    ) -> Result<RecurrentNetwork> {
        let (input_size, hidden_size) = input_weights.shape();
        let output_size = output_weights.cols;
        check_sizes(input_size, hidden_size, output_size)?;

        check_shape("input", &input_weights, (input_size, hidden_size))?;
        check_shape("hidden", &hidden_weights, (hidden_size, hidden_size))?;
        check_shape("output", &output_weights, (hidden_size, output_size))?;

        Ok(RecurrentNetwork {
            input_size,
            hidden_size,
            output_size,
            input_weights,
            hidden_weights,
            output_weights,
        })
    }

    pub fn input_size(&self) -> usize {
        self.input_size
    }

    pub fn hidden_size(&self) -> usize {
        self.hidden_size
    }

    pub fn output_size(&self) -> usize {
        self.output_size
    }

    pub fn input_weights(&self) -> &Matrix {
        &self.input_weights
    }

    pub fn hidden_weights(&self) -> &Matrix {
        &self.hidden_weights
    }

    pub fn output_weights(&self) -> &Matrix {
        &self.output_weights
    }
}

fn check_sizes(input: usize, hidden: usize, output: usize) -> Result<()> {
    if input == 0 || hidden == 0 || output == 0 {
        return Err(NetworkError::InvalidSize { input, hidden, output });
    }
    Ok(())
}

/// Checks the declared shape and that the backing rows really have it.
fn check_shape(name: &'static str, m: &Matrix, expected: (usize, usize)) -> Result<()> {
    if m.shape() != expected || m.data.len() != m.rows {
        return Err(NetworkError::ShapeMismatch {
            name,
            expected,
            actual: (m.data.len(), m.cols),
        });
    }
    if let Some(row) = m.data.iter().find(|row| row.len() != m.cols) {
        return Err(NetworkError::ShapeMismatch {
            name,
            expected,
            actual: (m.rows, row.len()),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck::{quickcheck, TestResult};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn initialize_allocates_expected_shapes() {
        let mut rng = StdRng::seed_from_u64(1);
        let net = RecurrentNetwork::initialize(2, 16, 1, &mut rng).unwrap();
        assert_eq!(net.input_weights().shape(), (2, 16));
        assert_eq!(net.hidden_weights().shape(), (16, 16));
        assert_eq!(net.output_weights().shape(), (16, 1));
    }

    #[test]
    fn initialize_is_reproducible_for_a_seed() {
        let a = RecurrentNetwork::initialize(2, 4, 1, &mut StdRng::seed_from_u64(9)).unwrap();
        let b = RecurrentNetwork::initialize(2, 4, 1, &mut StdRng::seed_from_u64(9)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn initialize_draws_independent_elements() {
        let mut rng = StdRng::seed_from_u64(3);
        let net = RecurrentNetwork::initialize(2, 8, 1, &mut rng).unwrap();
        let first_row = &net.input_weights().data[0];
        assert!(first_row.iter().any(|&w| w != first_row[0]));
    }

    #[test]
    fn custom_range_is_respected() {
        let mut rng = StdRng::seed_from_u64(4);
        let net = RecurrentNetwork::initialize_in_range(3, 5, 2, 0.0, 0.1, &mut rng).unwrap();
        for m in [net.input_weights(), net.hidden_weights(), net.output_weights()] {
            assert!(m.data.iter().flatten().all(|&w| (0.0..0.1).contains(&w)));
        }
    }

    #[test]
    fn rejects_zero_sizes_and_empty_ranges() {
        let mut rng = StdRng::seed_from_u64(5);
        assert!(matches!(
            RecurrentNetwork::initialize(0, 4, 1, &mut rng),
            Err(NetworkError::InvalidSize { input: 0, .. })
        ));
        assert!(matches!(
            RecurrentNetwork::initialize_in_range(2, 4, 1, 1.0, 1.0, &mut rng),
            Err(NetworkError::InvalidRange { .. })
        ));
        assert!(matches!(
            RecurrentNetwork::initialize_in_range(2, 4, 1, f64::NAN, 1.0, &mut rng),
            Err(NetworkError::InvalidRange { .. })
        ));
        assert!(matches!(
            RecurrentNetwork::initialize_in_range(2, 2, 1, -f64::MAX, f64::MAX, &mut rng),
            Err(NetworkError::InvalidRange { .. })
        ));
        assert!(matches!(
            RecurrentNetwork::initialize_in_range(2, 2, 1, f64::NEG_INFINITY, 0.0, &mut rng),
            Err(NetworkError::InvalidRange { .. })
        ));
    }

    #[test]
    fn from_weights_rejects_ragged_rows() {
        let err = RecurrentNetwork::from_weights(
            Matrix::from_data(vec![vec![1.0, 2.0], vec![1.0]]),
            Matrix::zeros(2, 2),
            Matrix::zeros(2, 1),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            NetworkError::ShapeMismatch { name: "input", expected: (2, 2), actual: (2, 1) }
        ));

        let mut hidden = Matrix::zeros(2, 2);
        hidden.data[1].push(0.0);
        let err = RecurrentNetwork::from_weights(Matrix::zeros(1, 2), hidden, Matrix::zeros(2, 1))
            .unwrap_err();
        assert!(matches!(err, NetworkError::ShapeMismatch { name: "hidden", .. }));
    }

    #[test]
    fn from_weights_checks_consistency() {
        let err = RecurrentNetwork::from_weights(
            Matrix::zeros(2, 3),
            Matrix::zeros(3, 2),
            Matrix::zeros(3, 1),
        )
        .unwrap_err();
        assert!(matches!(err, NetworkError::ShapeMismatch { name: "hidden", .. }));

        let net = RecurrentNetwork::from_weights(
            Matrix::zeros(2, 3),
            Matrix::zeros(3, 3),
            Matrix::zeros(3, 1),
        )
        .unwrap();
        assert_eq!((net.input_size(), net.hidden_size(), net.output_size()), (2, 3, 1));
    }

    quickcheck! {
        fn shapes_hold_for_any_positive_sizes(a: u8, b: u8, c: u8, seed: u64) -> TestResult {
            let (a, b, c) = (a as usize % 12, b as usize % 12, c as usize % 12);
            if a == 0 || b == 0 || c == 0 {
                return TestResult::discard();
            }
            let mut rng = StdRng::seed_from_u64(seed);
            let net = RecurrentNetwork::initialize(a, b, c, &mut rng).unwrap();
            TestResult::from_bool(
                net.input_weights().shape() == (a, b)
                    && net.output_weights().shape() == (b, c)
                    && net.hidden_weights().shape() == (b, b),
            )
        }
    }
}
