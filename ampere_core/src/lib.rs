// ampere_core/src/lib.rs

//! Equivalent-circuit state estimation for a single battery cell.
//!
//! Pure computation only: the discretized two-RC circuit model, the EKF time
//! update, and the loop that threads a filter state through a sample series.

pub mod error;
pub mod estimation;
pub mod messages;
pub mod models;
pub mod prelude;
pub mod time;
pub mod types;
