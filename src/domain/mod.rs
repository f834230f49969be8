//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, value objects)
//! - `survey` - Step registry, handlers and the step processor

pub mod foundation;
pub mod survey;
