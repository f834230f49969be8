//! Foundation value objects shared across the domain.

mod ids;
mod percentage;

pub use ids::SessionId;
pub use percentage::Percentage;
