//! Core library for connprobe.
//!
//! Parses connection strings for managed document databases, runs
//! structural diagnostics over them, generates single-change variants and
//! probes each variant for connectivity.
//!
//! # Guarantees
//! - Passwords never appear in logs, errors or reports
//! - Parsing and analysis are pure and never fail on odd input
//! - Every probe is bounded by a timeout and always releases its client
//!
//! # Architecture
//! - `parser`: connection string decomposition
//! - `diagnostics`: total diagnostic analyzer
//! - `variations`: deterministic variant generation
//! - `probe`: `Prober` trait, sequential variant loop, MongoDB prober
//! - `config`, `models`, `error`, `security`, `logging`: ambient support

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod logging;
pub mod models;
pub mod parser;
pub mod probe;
pub mod security;
pub mod variations;

// Re-export commonly used types
pub use config::{AtSplit, ProbeConfig, ProbeOperation};
pub use diagnostics::{CheckValue, DiagnosticAnalyzer, DiagnosticReport};
pub use error::{ConnProbeError, Result};
pub use logging::{LogFormat, init_logging};
pub use models::{ProbeErrorKind, ProbeFailure, ProbeResult, RunReport, VariantSummary};
pub use parser::{ParsedConnectionString, parse_connection_string, parse_with_split};
pub use probe::{Prober, probe_variants};
pub use variations::{ConnectionVariant, VariantGenerator, VariantRule};

#[cfg(feature = "mongodb")]
pub use probe::MongoProber;
