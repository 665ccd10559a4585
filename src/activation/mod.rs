pub mod sigmoid;

pub use sigmoid::{sigmoid, sigmoid_in_place, sigmoid_prime};
