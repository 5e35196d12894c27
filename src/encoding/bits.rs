use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{NetworkError, Result};

/// Fixed-width bit vector, most-significant bit first.
///
/// Every element is `0` or `1`; the constructors enforce this.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<u8>", into = "Vec<u8>")]
pub struct BitSequence {
    bits: Vec<u8>,
}

impl BitSequence {
    pub fn zeros(dim: usize) -> BitSequence {
        BitSequence { bits: vec![0; dim] }
    }

    /// Validates that every element is a bit.
    pub fn from_bits(bits: Vec<u8>) -> Result<BitSequence> {
        if let Some((position, &value)) = bits.iter().enumerate().find(|&(_, &b)| b > 1) {
            return Err(NetworkError::InvalidBit { position, value });
        }
        Ok(BitSequence { bits })
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    pub fn bits(&self) -> &[u8] {
        &self.bits
    }

    /// Bit at storage index `index` (0 is the most significant).
    pub fn get(&self, index: usize) -> u8 {
        self.bits[index]
    }

    pub(crate) fn set(&mut self, index: usize, bit: u8) {
        debug_assert!(bit <= 1);
        self.bits[index] = bit;
    }
}

impl TryFrom<Vec<u8>> for BitSequence {
    type Error = NetworkError;

    fn try_from(bits: Vec<u8>) -> Result<Self> {
        BitSequence::from_bits(bits)
    }
}

impl From<BitSequence> for Vec<u8> {
    fn from(seq: BitSequence) -> Self {
        seq.bits
    }
}

impl fmt::Display for BitSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for bit in &self.bits {
            write!(f, "{bit}")?;
        }
        Ok(())
    }
}

/// Encodes `value` as a `width`-bit sequence, left-padded with zeros.
pub fn encode(value: u64, width: usize) -> Result<BitSequence> {
    if width == 0 {
        return Err(NetworkError::EmptySequence);
    }
    if width > 64 || (width < 64 && value >> width != 0) {
        return Err(NetworkError::ValueOutOfRange { value, width });
    }
    let bits = (0..width)
        .rev()
        .map(|shift| ((value >> shift) & 1) as u8)
        .collect();
    Ok(BitSequence { bits })
}

/// Inverse of [`encode`]. Sequences longer than 64 bits keep only the
/// low 64 bits.
pub fn decode(seq: &BitSequence) -> u64 {
    seq.bits
        .iter()
        .fold(0u64, |acc, &bit| acc.wrapping_shl(1) | u64::from(bit))
}

/// Converts a continuous output in (0, 1) into a bit.
///
/// Rounds half to even, so an output of exactly `0.5` becomes `0`; only
/// outputs strictly above one half produce `1`.
pub fn round_to_bit(y: f64) -> u8 {
    if y.round_ties_even() >= 1.0 { 1 } else { 0 }
}
