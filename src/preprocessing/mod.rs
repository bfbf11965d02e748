//! Data preprocessing module
//!
//! Column-wise feature scaling applied before anomaly detection, so that
//! wide-range features such as timestamps do not dominate the split choices.

mod scaler;

pub use scaler::{Scaler, ScalerType};
