use crate::{network::network::RecurrentNetwork, train::gradients::GradientAccumulators};

/// Plain gradient step with a fixed learning rate.
///
/// Deltas are computed from `target - output`, so the accumulated gradients
/// already point toward lower error and are *added* to the weights.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientAscent {
    pub learning_rate: f64,
}

impl GradientAscent {
    pub fn new(learning_rate: f64) -> GradientAscent {
        GradientAscent { learning_rate }
    }

    /// Applies `weights += gradient * learning_rate` to all three matrices.
    pub fn step(&self, network: &mut RecurrentNetwork, gradients: &GradientAccumulators) {
        network.input_weights += &gradients.input.scale(self.learning_rate);
        network.output_weights += &gradients.output.scale(self.learning_rate);
        network.hidden_weights += &gradients.hidden.scale(self.learning_rate);
    }
}
