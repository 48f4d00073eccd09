//! Amount handling and the discount rule engine.
//!
//! This module provides the numeric formatting contract shared by every
//! monetary field and the reducer that decides which deductions apply.

pub mod amount;
pub mod discount;

pub use amount::{AmountParseError, format_amount, parse_amount};
pub use discount::{
    AmountField, Amounts, DiscountEvent, DiscountProjection, DiscountState, HiddenFields,
    SectionView, TransitionError, project, recompute_net, reduce,
};
