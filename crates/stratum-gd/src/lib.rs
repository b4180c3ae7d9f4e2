//! Plain gradient descent on differentiable objectives.
//!
//! Provides the [`Objective`] trait, an axis-aligned [`ShiftedQuadratic`]
//! test function, and a [`DescentConfig`] that records every iteration.

mod descent;
mod error;
mod objective;

pub use descent::{DescentConfig, DescentResult, DescentStep};
pub use error::GdError;
pub use objective::{Objective, ShiftedQuadratic};
