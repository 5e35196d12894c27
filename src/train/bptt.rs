use crate::{
    activation::{squash_derivative, squash_derivative_matrix},
    encoding::bits::BitSequence,
    error::{NetworkError, Result},
    math::matrix::Matrix,
    network::{forward::backward_bit_order, network::RecurrentNetwork},
    optim::ascent::GradientAscent,
    train::gradients::GradientAccumulators,
};

/// What one training call reports back.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainOutcome {
    /// Rounded prediction made during the forward phase, before the update.
    pub guess: BitSequence,
    /// Sum over timesteps of `|target - output|`, one entry per output unit.
    pub total_error: Vec<f64>,
}

/// Trains `network` on one example with truncated BPTT and applies a single
/// additive update at learning rate `learning_rate`.
pub fn train(
    network: &mut RecurrentNetwork,
    inputs: &[BitSequence],
    target: &BitSequence,
    dim: usize,
    learning_rate: f64,
) -> Result<TrainOutcome> {
    train_with(network, inputs, target, dim, &GradientAscent::new(learning_rate))
}

/// Same as [`train`] with an explicit optimizer.
pub fn train_with(
    network: &mut RecurrentNetwork,
    inputs: &[BitSequence],
    target: &BitSequence,
    dim: usize,
    optimizer: &GradientAscent,
) -> Result<TrainOutcome> {
    let (gradients, outcome) = compute_gradients(network, inputs, target, dim)?;
    optimizer.step(network, &gradients);
    Ok(outcome)
}

/// Forward and backward phases without touching the weights.
///
/// Every output unit is trained toward the same target bit; the guess is
/// read from unit 0.
pub fn compute_gradients(
    network: &RecurrentNetwork,
    inputs: &[BitSequence],
    target: &BitSequence,
    dim: usize,
) -> Result<(GradientAccumulators, TrainOutcome)> {
    if target.len() != dim {
        return Err(NetworkError::SequenceLength {
            expected: dim,
            actual: target.len(),
        });
    }

    // ── Forward phase ─────────────────────────────────────────────────────
    let trace = network.forward(inputs, dim)?;

    let mut total_error = vec![0.0; network.output_size];
    let mut output_deltas: Vec<Matrix> = Vec::with_capacity(dim);

    for (position, output) in trace.outputs.iter().enumerate() {
        let expected = f64::from(target.get(dim - position - 1));
        let output_error = output.map(|y| expected - y);
        for (acc, err) in total_error.iter_mut().zip(output_error.data[0].iter()) {
            *acc += err.abs();
        }
        let delta = Matrix::from_data(vec![output_error.data[0]
            .iter()
            .zip(output.data[0].iter())
            .map(|(err, &y)| err * squash_derivative(y))
            .collect()]);
        output_deltas.push(delta);
    }

    // ── Backward phase ────────────────────────────────────────────────────
    let mut gradients = GradientAccumulators::zeros_like(network);
    let hidden_weights_t = network.hidden_weights.transpose();
    let output_weights_t = network.output_weights.transpose();
    let mut future_hidden_delta = Matrix::zeros(1, network.hidden_size);

    for bit_index in backward_bit_order(dim) {
        let position = dim - bit_index - 1;
        let hidden = &trace.hidden_history[position + 1];
        let previous_hidden = &trace.hidden_history[position];
        let output_delta = &output_deltas[position];
        let x = &trace.inputs[position];

        let hidden_delta = (future_hidden_delta.dot(&hidden_weights_t)
            + output_delta.dot(&output_weights_t))
        .hadamard(&squash_derivative_matrix(hidden));

        gradients.output += &hidden.outer(output_delta);
        gradients.hidden += &previous_hidden.outer(&hidden_delta);
        gradients.input += &x.outer(&hidden_delta);

        future_hidden_delta = hidden_delta;
    }

    Ok((
        gradients,
        TrainOutcome {
            guess: trace.guess,
            total_error,
        },
    ))
}
