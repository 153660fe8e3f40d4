//! ISO 20022 `auth.016.001.01` report assembly.
//!
//! Two assemblers share one envelope: [`ReportGenerator`] emits the
//! full ESMAUG-ordered transaction record per row, and
//! [`CustomOnlyGenerator`] emits only user-defined custom fields. Both
//! are deterministic given a pinned clock and never fail on incomplete
//! mappings.

pub mod common;
pub mod custom_only;
pub mod normalize;
pub mod report;
mod transaction;

pub use custom_only::CustomOnlyGenerator;
pub use report::ReportGenerator;
