mod handler;
mod model;

pub use handler::{business_adjustment, create_adjustment};
pub use model::{AdjustmentRequest, AdjustmentResponse, validate_adjustment};
