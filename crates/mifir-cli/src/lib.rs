//! CLI library components for the MiFIR report generator.

pub mod ingest;
pub mod logging;
