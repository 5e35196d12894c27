use rand::Rng;

use crate::encoding::bits::{encode, BitSequence};
use crate::error::{NetworkError, Result};

/// One `a + b = sum` problem, encoded for the network.
#[derive(Debug, Clone, PartialEq)]
pub struct AdditionExample {
    pub a: u64,
    pub b: u64,
    pub sum: u64,
    /// `[encode(a), encode(b)]`, both `width` bits wide.
    pub inputs: Vec<BitSequence>,
    pub target: BitSequence,
}

impl AdditionExample {
    pub fn new(a: u64, b: u64, width: usize) -> Result<AdditionExample> {
        let sum = a
            .checked_add(b)
            .ok_or_else(|| NetworkError::Config(format!("{a} + {b} overflows u64")))?;
        Ok(AdditionExample {
            a,
            b,
            sum,
            inputs: vec![encode(a, width)?, encode(b, width)?],
            target: encode(sum, width)?,
        })
    }

    /// Draws both operands uniformly from `[0, max_operand(width)]`, so the
    /// sum always fits in `width` bits.
    pub fn sample<R: Rng + ?Sized>(rng: &mut R, width: usize) -> Result<AdditionExample> {
        let max = max_operand(width)?;
        let a = rng.gen_range(0..=max);
        let b = rng.gen_range(0..=max);
        AdditionExample::new(a, b, width)
    }

    pub fn width(&self) -> usize {
        self.target.len()
    }
}

/// Largest operand whose doubled value still fits in `width` bits.
pub fn max_operand(width: usize) -> Result<u64> {
    if width < 2 || width > 64 {
        return Err(NetworkError::Config(format!(
            "bit width must be between 2 and 64, got {width}"
        )));
    }
    Ok((1u64 << (width - 1)) - 1)
}

/// A held-out batch of `count` examples.
pub fn sample_batch<R: Rng + ?Sized>(
    rng: &mut R,
    width: usize,
    count: usize,
) -> Result<Vec<AdditionExample>> {
    (0..count).map(|_| AdditionExample::sample(rng, width)).collect()
}
