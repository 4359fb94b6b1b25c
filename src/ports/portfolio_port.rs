//! Portfolio definition port.

use crate::domain::error::EvalError;
use crate::domain::weights::WeightVector;

pub trait PortfolioPort {
    /// Raw symbol weights in file order.
    fn load_weights(&self) -> Result<WeightVector, EvalError>;
}
