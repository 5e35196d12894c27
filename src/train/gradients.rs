use crate::math::matrix::Matrix;
use crate::network::network::RecurrentNetwork;

/// Per-call gradient storage, shaped like the network's weights.
///
/// Zeroed at the start of each training call, accumulated over every
/// timestep, applied once, then dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct GradientAccumulators {
    pub input: Matrix,
    pub hidden: Matrix,
    pub output: Matrix,
}

impl GradientAccumulators {
    pub fn zeros_like(network: &RecurrentNetwork) -> GradientAccumulators {
        let (input_rows, input_cols) = network.input_weights.shape();
        let (hidden_rows, hidden_cols) = network.hidden_weights.shape();
        let (output_rows, output_cols) = network.output_weights.shape();
        GradientAccumulators {
            input: Matrix::zeros(input_rows, input_cols),
            hidden: Matrix::zeros(hidden_rows, hidden_cols),
            output: Matrix::zeros(output_rows, output_cols),
        }
    }
}
