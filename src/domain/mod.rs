//! Domain types for the uitriage analysis engine.
//! Defines the issue/result schema and the error taxonomy shared by the
//! orchestration and view-state layers.

pub mod analysis;
pub mod error;
pub mod issue;

pub use analysis::*;
pub use error::*;
pub use issue::*;
