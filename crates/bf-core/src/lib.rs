//! bf-core: stable foundation for branchflow.
//!
//! Contains:
//! - units (uom types for the mm / m / L/s / kPa system + water-column conversions)
//! - numeric (Real + tolerances + float helpers)
//! - ids (compact arena IDs for network objects)
//! - error (shared error types)

pub mod error;
pub mod ids;
pub mod numeric;
pub mod units;

// Re-exports: nice ergonomics for downstream crates
pub use error::{BfError, BfResult};
pub use ids::*;
pub use numeric::*;
pub use units::*;
