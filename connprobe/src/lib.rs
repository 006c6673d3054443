//! Library module for connprobe.
//!
//! Holds the CLI definition, connection-string source resolution and the
//! probe run so they can be tested without spawning the binary. The binary
//! entry point is in main.rs.

pub mod output;

use clap::{Args, Parser, Subcommand, ValueEnum};
use connprobe_core::config::{
    AtSplit, DEFAULT_EXPECTED_HOST_SUFFIX, DEFAULT_EXPECTED_SCHEME, ProbeConfig, ProbeOperation,
};
use connprobe_core::error::{ConnProbeError, redact_connection_string};
use connprobe_core::{
    ConnectionVariant, DiagnosticAnalyzer, LogFormat, Prober, Result, RunReport,
    VariantGenerator, VariantRule, parse_with_split, probe_variants,
};
use serde::Serialize;
use std::env;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};

/// Environment variable holding the connection string.
pub const CONNECTION_STRING_ENV: &str = "MONGODB_URI";

/// CLI argument structure
#[derive(Parser)]
#[command(name = "connprobe")]
#[command(about = "Connection-string diagnostics and connectivity probing")]
#[command(version)]
#[command(long_about = "
connprobe - connection-string diagnostics for managed MongoDB deployments

Parses a connection string, reports structural defects (stray whitespace,
unencoded '@' in passwords, ports on SRV hosts, wrong domain), generates
single-change variants and probes each one to isolate connectivity failures.

The connection string is read from --uri, then MONGODB_URI, then --uri-file.
Passwords are masked in every log line and report.

EXAMPLES:
  connprobe analyze
  connprobe analyze --uri-file ./uri.txt --format json
  connprobe probe --variants --timeout-ms 3000
  connprobe env
")]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand)]
pub enum Command {
    /// Parse and run structural diagnostics
    Analyze(AnalyzeArgs),
    /// List the structural variants of the connection string
    Variants(VariantsArgs),
    /// Probe connectivity for the string or each of its variants
    Probe(ProbeArgs),
    /// Report whether the connection-string variable is set
    Env(EnvArgs),
}

#[derive(Args)]
pub struct GlobalArgs {
    /// Increase verbosity
    #[arg(
        short,
        long,
        global = true,
        action = clap::ArgAction::Count,
        help = "Increase verbosity (-v, -vv, -vvv)"
    )]
    pub verbose: u8,

    /// Suppress output
    #[arg(short, long, global = true, help = "Suppress all logs except errors")]
    pub quiet: bool,

    /// Log line format
    #[arg(long, global = true, value_enum, default_value_t = LogFormatArg::Text)]
    pub log_format: LogFormatArg,
}

/// Where the connection string comes from
#[derive(Args, Clone, Debug, Default)]
pub struct SourceArgs {
    /// Connection string given directly
    #[arg(long, help = "Connection string (prefer MONGODB_URI to keep it out of shell history)")]
    pub uri: Option<String>,

    /// File containing the connection string
    #[arg(long, value_name = "FILE")]
    pub uri_file: Option<PathBuf>,
}

/// What a well-formed string is expected to look like
#[derive(Args, Clone, Debug)]
pub struct ExpectationArgs {
    /// Expected scheme
    #[arg(long, default_value = DEFAULT_EXPECTED_SCHEME)]
    pub expected_scheme: String,

    /// Expected host domain suffix
    #[arg(long, env = "CONNPROBE_EXPECTED_SUFFIX", default_value = DEFAULT_EXPECTED_HOST_SUFFIX)]
    pub expected_suffix: String,

    /// Which '@' separates credentials from the host
    #[arg(long, value_enum, default_value_t = SplitArg::Last)]
    pub at_split: SplitArg,
}

impl Default for ExpectationArgs {
    fn default() -> Self {
        Self {
            expected_scheme: DEFAULT_EXPECTED_SCHEME.to_string(),
            expected_suffix: DEFAULT_EXPECTED_HOST_SUFFIX.to_string(),
            at_split: SplitArg::Last,
        }
    }
}

impl ExpectationArgs {
    /// Builds the probe configuration these expectations describe.
    pub fn to_config(&self) -> ProbeConfig {
        ProbeConfig::new()
            .with_expected_scheme(self.expected_scheme.clone())
            .with_expected_host_suffix(self.expected_suffix.clone())
            .with_at_split(self.at_split.into())
    }
}

/// Report rendering options
#[derive(Args, Clone, Debug, Default)]
pub struct OutputArgs {
    /// Report format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Write the report to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

#[derive(Args, Clone, Debug)]
pub struct AnalyzeArgs {
    #[command(flatten)]
    pub source: SourceArgs,
    #[command(flatten)]
    pub expectations: ExpectationArgs,
    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Args, Clone, Debug)]
pub struct VariantsArgs {
    #[command(flatten)]
    pub source: SourceArgs,
    #[command(flatten)]
    pub expectations: ExpectationArgs,
    #[command(flatten)]
    pub output: OutputArgs,

    /// Host literal for the alternate-host variant
    #[arg(long, value_name = "HOST")]
    pub alternate_host: Option<String>,
}

#[derive(Args, Clone, Debug)]
pub struct ProbeArgs {
    #[command(flatten)]
    pub source: SourceArgs,
    #[command(flatten)]
    pub expectations: ExpectationArgs,
    #[command(flatten)]
    pub output: OutputArgs,

    /// Per-probe timeout in milliseconds
    #[arg(long, env = "CONNPROBE_TIMEOUT_MS", default_value = "5000")]
    pub timeout_ms: u64,

    /// Operation run after connecting
    #[arg(long, value_enum, default_value_t = OperationArg::ListDatabases)]
    pub operation: OperationArg,

    /// Host literal for the alternate-host variant
    #[arg(long, value_name = "HOST")]
    pub alternate_host: Option<String>,

    /// Probe every generated variant instead of only the string itself
    #[arg(long)]
    pub variants: bool,
}

impl ProbeArgs {
    /// Builds and validates the probe configuration.
    ///
    /// # Errors
    /// Returns error if the timeout or alternate host is invalid.
    pub fn to_config(&self) -> Result<ProbeConfig> {
        let mut config = self
            .expectations
            .to_config()
            .with_timeout(Duration::from_millis(self.timeout_ms))
            .with_operation(self.operation.into());
        if let Some(host) = &self.alternate_host {
            config = config.with_alternate_host(host.clone());
        }
        config.validate()?;
        Ok(config)
    }
}

#[derive(Args, Clone, Debug)]
pub struct EnvArgs {
    #[command(flatten)]
    pub expectations: ExpectationArgs,
    #[command(flatten)]
    pub output: OutputArgs,
}

/// Report output formats
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Aligned human-readable text
    #[default]
    Text,
    /// Pretty JSON
    Json,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogFormatArg {
    Text,
    Json,
}

impl From<LogFormatArg> for LogFormat {
    fn from(value: LogFormatArg) -> Self {
        match value {
            LogFormatArg::Text => Self::Text,
            LogFormatArg::Json => Self::Json,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum SplitArg {
    First,
    Last,
}

impl From<SplitArg> for AtSplit {
    fn from(value: SplitArg) -> Self {
        match value {
            SplitArg::First => Self::First,
            SplitArg::Last => Self::Last,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OperationArg {
    Ping,
    ListDatabases,
}

impl From<OperationArg> for ProbeOperation {
    fn from(value: OperationArg) -> Self {
        match value {
            OperationArg::Ping => Self::Ping,
            OperationArg::ListDatabases => Self::ListDatabases,
        }
    }
}

/// Where a connection string was loaded from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionSource {
    /// `--uri`
    Argument,
    /// `MONGODB_URI`
    Environment,
    /// `--uri-file`
    File(PathBuf),
}

impl std::fmt::Display for ConnectionSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Argument => write!(f, "--uri argument"),
            Self::Environment => write!(f, "{CONNECTION_STRING_ENV} environment variable"),
            Self::File(path) => write!(f, "file {}", path.display()),
        }
    }
}

/// Loads the connection string once, from the first source that has one.
///
/// Order: `--uri`, then `MONGODB_URI`, then `--uri-file`. Values are
/// returned untrimmed so whitespace defects stay visible to diagnostics;
/// only the line ending of a file is dropped.
///
/// # Errors
/// Returns a configuration error if no source provides a non-blank string,
/// or if the file cannot be read.
pub fn resolve_connection_string(source: &SourceArgs) -> Result<(String, ConnectionSource)> {
    if let Some(uri) = &source.uri
        && !uri.trim().is_empty()
    {
        return Ok((uri.clone(), ConnectionSource::Argument));
    }

    if let Ok(uri) = env::var(CONNECTION_STRING_ENV)
        && !uri.trim().is_empty()
    {
        return Ok((uri, ConnectionSource::Environment));
    }

    if let Some(path) = &source.uri_file {
        let contents = std::fs::read_to_string(path).map_err(|e| ConnProbeError::Io {
            context: format!("Failed to read connection string file {}", path.display()),
            source: e,
        })?;
        let uri = contents.trim_end_matches(['\r', '\n']);
        if uri.trim().is_empty() {
            return Err(ConnProbeError::configuration(format!(
                "Connection string file {} is empty",
                path.display()
            )));
        }
        return Ok((uri.to_string(), ConnectionSource::File(path.clone())));
    }

    Err(ConnProbeError::configuration(format!(
        "Connection string required. Set {CONNECTION_STRING_ENV}, pass --uri, or use --uri-file."
    )))
}

/// Environment variable status, safe to print.
#[derive(Debug, Clone, Serialize)]
pub struct EnvStatus {
    /// Variable name
    pub variable: String,
    /// Whether the variable is set and non-blank
    pub is_set: bool,
    /// Length in characters, when set
    pub length: Option<usize>,
    /// Redacted value, when set
    pub redacted: Option<String>,
    /// Diagnostic warnings for the value, when set
    pub warnings: Vec<String>,
}

/// Inspects `MONGODB_URI` without exposing its password.
pub fn env_status(config: &ProbeConfig) -> EnvStatus {
    match env::var(CONNECTION_STRING_ENV) {
        Ok(value) if !value.trim().is_empty() => {
            let report = DiagnosticAnalyzer::from_config(config).analyze(&value);
            EnvStatus {
                variable: CONNECTION_STRING_ENV.to_string(),
                is_set: true,
                length: Some(report.length),
                redacted: Some(redact_connection_string(&value)),
                warnings: report.warnings,
            }
        }
        _ => EnvStatus {
            variable: CONNECTION_STRING_ENV.to_string(),
            is_set: false,
            length: None,
            redacted: None,
            warnings: Vec::new(),
        },
    }
}

/// Runs diagnostics on `raw`.
pub fn analyze(raw: &str, config: &ProbeConfig) -> RunReport {
    let diagnostics = DiagnosticAnalyzer::from_config(config).analyze(raw);
    for warning in &diagnostics.warnings {
        warn!("{}", warning);
    }
    RunReport::new(raw).with_diagnostics(diagnostics)
}

/// Generates the variants of `raw`.
///
/// # Errors
/// Returns [`ConnProbeError::MalformedUri`] if `raw` cannot be split.
pub fn generate_variants(raw: &str, config: &ProbeConfig) -> Result<Vec<ConnectionVariant>> {
    let base = parse_with_split(raw, config.at_split)?;
    Ok(VariantGenerator::new(&base)
        .with_alternate_host(config.alternate_host.as_deref())
        .iter()
        .collect())
}

/// Diagnoses `raw`, then probes it (or each variant) sequentially.
///
/// Without `all_variants` the string is probed exactly as given, even when
/// it cannot be parsed, so the driver's own verdict is reported.
///
/// # Errors
/// Returns [`ConnProbeError::MalformedUri`] only when `all_variants` is set
/// and `raw` cannot be split into parts.
pub async fn run_probes(
    prober: &dyn Prober,
    raw: &str,
    config: &ProbeConfig,
    all_variants: bool,
) -> Result<RunReport> {
    let report = analyze(raw, config);

    let variants = if all_variants {
        generate_variants(raw, config)?
    } else {
        vec![ConnectionVariant {
            rule: VariantRule::Original,
            candidate: raw.to_string(),
        }]
    };

    info!(
        "Probing {} candidate(s) with {} ms timeout ({})",
        variants.len(),
        config.timeout.as_millis(),
        config.operation
    );

    let probes = probe_variants(prober, variants.iter().cloned(), config.timeout).await;
    Ok(report.with_variants(&variants).with_probes(probes))
}
