pub mod backprop;

pub use backprop::Backprop;
