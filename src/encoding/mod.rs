pub mod bits;

pub use bits::{decode, encode, round_to_bit, BitSequence};
