pub mod forward;
pub mod network;

pub use forward::{backward_bit_order, forward_bit_order, ForwardTrace};
pub use network::RecurrentNetwork;
