//! CLI library components for the Panacea study-data tools.

pub mod logging;
