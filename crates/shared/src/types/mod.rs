//! Common types used across the application.

pub mod id;
pub mod money;

pub use id::*;
pub use money::{
    MAX_AMOUNT, MONEY_TOLERANCE, amounts_match, checked_sum, exceeds_tolerance,
    within_amount_range,
};
