pub mod cost_kind;
pub mod cross_entropy;
pub mod quadratic;

pub use cost_kind::{l2_regularization_cost, CostKind};
pub use cross_entropy::CrossEntropyCost;
pub use quadratic::QuadraticCost;
