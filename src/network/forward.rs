use crate::activation::squash_matrix;
use crate::encoding::bits::{round_to_bit, BitSequence};
use crate::error::{NetworkError, Result};
use crate::math::matrix::Matrix;
use crate::network::network::RecurrentNetwork;

/// Bit indices in the order the forward pass visits them.
///
/// Sequences are stored most-significant bit first, but carries flow upward,
/// so position 0 reads bit index `dim - 1`.
pub fn forward_bit_order(dim: usize) -> impl DoubleEndedIterator<Item = usize> {
    (0..dim).map(move |position| dim - position - 1)
}

/// Bit indices in the order the backward pass visits them: the exact
/// reverse of [`forward_bit_order`].
pub fn backward_bit_order(dim: usize) -> impl DoubleEndedIterator<Item = usize> {
    forward_bit_order(dim).rev()
}

/// Everything one forward pass produces, indexed by forward position.
#[derive(Debug, Clone)]
pub struct ForwardTrace {
    /// Input row vector fed at each position.
    pub inputs: Vec<Matrix>,
    /// `dim + 1` hidden states; entry 0 is the all-zero initial state and
    /// entry `p + 1` is the state produced at position `p`.
    pub hidden_history: Vec<Matrix>,
    /// Squashed output row vector at each position.
    pub outputs: Vec<Matrix>,
    /// Rounded output unit 0, most-significant bit first.
    pub guess: BitSequence,
}

impl RecurrentNetwork {
    /// Runs the network over `dim` timesteps and returns the rounded
    /// prediction, most-significant bit first.
    ///
    /// Read-only: two calls with the same weights and inputs agree.
    pub fn predict(&self, inputs: &[BitSequence], dim: usize) -> Result<BitSequence> {
        Ok(self.forward(inputs, dim)?.guess)
    }

    /// Forward pass that keeps the full per-timestep history.
    pub fn forward(&self, inputs: &[BitSequence], dim: usize) -> Result<ForwardTrace> {
        self.check_inputs(inputs, dim)?;

        let mut trace = ForwardTrace {
            inputs: Vec::with_capacity(dim),
            hidden_history: Vec::with_capacity(dim + 1),
            outputs: Vec::with_capacity(dim),
            guess: BitSequence::zeros(dim),
        };
        trace.hidden_history.push(Matrix::zeros(1, self.hidden_size));

        for bit_index in forward_bit_order(dim) {
            let x = Matrix::row(
                inputs.iter().map(|seq| f64::from(seq.get(bit_index))).collect(),
            );
            let previous_hidden = &trace.hidden_history[trace.hidden_history.len() - 1];
            let (hidden, output) = self.step(&x, previous_hidden);

            trace.guess.set(bit_index, round_to_bit(output.data[0][0]));
            trace.inputs.push(x);
            trace.outputs.push(output);
            trace.hidden_history.push(hidden);
        }

        Ok(trace)
    }

    /// One timestep: returns the new hidden state and the output.
    pub(crate) fn step(&self, x: &Matrix, previous_hidden: &Matrix) -> (Matrix, Matrix) {
        let hidden = squash_matrix(
            &(x.dot(&self.input_weights) + previous_hidden.dot(&self.hidden_weights)),
        );
        let output = squash_matrix(&hidden.dot(&self.output_weights));
        (hidden, output)
    }

    pub(crate) fn check_inputs(&self, inputs: &[BitSequence], dim: usize) -> Result<()> {
        if dim == 0 {
            return Err(NetworkError::EmptySequence);
        }
        if inputs.len() != self.input_size {
            return Err(NetworkError::InputCount {
                expected: self.input_size,
                actual: inputs.len(),
            });
        }
        if let Some(seq) = inputs.iter().find(|seq| seq.len() != dim) {
            return Err(NetworkError::SequenceLength {
                expected: dim,
                actual: seq.len(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::bits::encode;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn random_net(seed: u64) -> RecurrentNetwork {
        RecurrentNetwork::initialize(2, 16, 1, &mut StdRng::seed_from_u64(seed)).unwrap()
    }

    #[test]
    fn orders_are_mirrors() {
        for dim in 0..20 {
            let forward: Vec<usize> = forward_bit_order(dim).collect();
            let mut backward: Vec<usize> = backward_bit_order(dim).collect();
            assert_eq!(forward.len(), dim);
            backward.reverse();
            assert_eq!(forward, backward);
        }
        assert_eq!(forward_bit_order(4).collect::<Vec<_>>(), vec![3, 2, 1, 0]);
        assert_eq!(backward_bit_order(4).collect::<Vec<_>>(), vec![0, 1, 2, 3]);
    }

    #[test]
    fn predict_is_deterministic() {
        let net = random_net(11);
        let inputs = [encode(37, 8).unwrap(), encode(90, 8).unwrap()];
        let first = net.predict(&inputs, 8).unwrap();
        let second = net.predict(&inputs, 8).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn predict_preserves_dimension() {
        let net = random_net(12);
        for dim in 1..12 {
            let inputs = [encode(1, dim).unwrap(), encode(0, dim).unwrap()];
            let guess = net.predict(&inputs, dim).unwrap();
            assert_eq!(guess.len(), dim);
            assert!(guess.bits().iter().all(|&b| b <= 1));
        }
    }

    #[test]
    fn zero_weights_predict_all_zero() {
        let net = RecurrentNetwork::from_weights(
            Matrix::zeros(2, 4),
            Matrix::zeros(4, 4),
            Matrix::zeros(4, 1),
        )
        .unwrap();
        let inputs = [encode(255, 8).unwrap(), encode(170, 8).unwrap()];
        let trace = net.forward(&inputs, 8).unwrap();
        assert!(trace.outputs.iter().all(|o| o.data[0][0] == 0.5));
        assert_eq!(trace.guess, BitSequence::zeros(8));
    }

    #[test]
    fn history_starts_at_zero_and_has_dim_plus_one_entries() {
        let net = random_net(13);
        let inputs = [encode(3, 8).unwrap(), encode(5, 8).unwrap()];
        let trace = net.forward(&inputs, 8).unwrap();
        assert_eq!(trace.hidden_history.len(), 9);
        assert!(trace.hidden_history[0].is_zero());
        assert_eq!(trace.inputs.len(), 8);
        assert_eq!(trace.outputs.len(), 8);
        // position 0 reads the least significant bits of 3 and 5
        assert_eq!(trace.inputs[0].data[0], vec![1.0, 1.0]);
        assert_eq!(trace.inputs[1].data[0], vec![1.0, 0.0]);
    }

    #[test]
    fn forward_does_not_touch_weights() {
        let net = random_net(14);
        let before = net.clone();
        let inputs = [encode(100, 8).unwrap(), encode(27, 8).unwrap()];
        net.predict(&inputs, 8).unwrap();
        assert_eq!(net, before);
    }

    #[test]
    fn rejects_malformed_inputs() {
        let net = random_net(15);
        let a = encode(1, 8).unwrap();
        assert!(matches!(
            net.predict(&[a.clone()], 8),
            Err(NetworkError::InputCount { expected: 2, actual: 1 })
        ));
        assert!(matches!(
            net.predict(&[a.clone(), encode(1, 4).unwrap()], 8),
            Err(NetworkError::SequenceLength { expected: 8, actual: 4 })
        ));
        assert!(matches!(net.predict(&[a.clone(), a], 0), Err(NetworkError::EmptySequence)));
    }
}
