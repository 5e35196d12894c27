pub mod ascent;

pub use ascent::GradientAscent;
