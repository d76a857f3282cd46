//! bf-hydraulics: hydraulic estimators for branchflow.
//!
//! Provides:
//! - Probable flow from fixture-unit weights
//! - Head-loss correlations (Hazen-Williams, Fair-Whipple-Hsiao)
//! - Mean velocity
//! - Equivalent-length tables for fittings
//!
//! Every estimator is a deterministic function of its inputs, suitable for
//! repeated evaluation during network propagation.
//!
//! # Example
//!
//! ```
//! use bf_hydraulics::{
//!     FlowParams, HeadLossCorrelation, HeadLossKind, HeadLossModel, HwCoefficients, Material,
//!     estimate_flow_lps,
//! };
//!
//! let q = estimate_flow_lps(9.0, FlowParams::default()); // 0.9 L/s
//! let model = HeadLossModel::select(
//!     HeadLossKind::HazenWilliams,
//!     Material::Pvc,
//!     &HwCoefficients::default(),
//! );
//! let j = model.gradient_kpa_per_m(q, 25.0);
//! assert!(j > 0.0);
//! ```

pub mod common;
pub mod error;
pub mod fair_whipple_hsiao;
pub mod fittings;
pub mod flow;
pub mod hazen_williams;
pub mod model;
pub mod traits;

// Re-exports
pub use common::velocity_mps;
pub use error::{HydraulicError, HydraulicResult};
pub use fair_whipple_hsiao::{FairWhippleHsiao, fair_whipple_hsiao_kpa_per_m};
pub use fittings::{FittingRow, FittingTable, ResolvedFittings};
pub use flow::{FlowParams, estimate_flow_lps};
pub use hazen_williams::{HazenWilliams, hazen_williams_kpa_per_m};
pub use model::{HeadLossKind, HeadLossModel, HwCoefficients, Material};
pub use traits::HeadLossCorrelation;
