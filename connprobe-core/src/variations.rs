//! Structural variants of a base connection string.
//!
//! Each variant applies exactly one transformation to the base so a
//! connectivity failure can be pinned to a single structural feature. Rules
//! run in a fixed order and a rule that would not change the string is
//! skipped, so the same base always yields the same labeled sequence.

use crate::parser::ParsedConnectionString;
use crate::security::Credentials;
use percent_encoding::percent_decode_str;

/// Percent-encoded form of `@`.
const ENCODED_AT: &str = "%40";

/// Transformation that produced a variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VariantRule {
    /// The base string, unchanged, used as a control
    Original,
    /// Database segment removed
    WithoutDatabase,
    /// Raw `@` in credentials replaced by `%40`
    EncodedAt,
    /// `%40` in credentials replaced by a raw `@`
    DecodedAt,
    /// `+srv` scheme modifier removed
    WithoutSrv,
    /// Host replaced by the configured alternate literal
    AlternateHost,
    /// Trailing `/` added to the path
    WithTrailingSlash,
    /// Trailing `/` removed from the path
    WithoutTrailingSlash,
}

impl VariantRule {
    /// Stable label used in reports.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Original => "original",
            Self::WithoutDatabase => "without-database",
            Self::EncodedAt => "encoded-at",
            Self::DecodedAt => "decoded-at",
            Self::WithoutSrv => "without-srv",
            Self::AlternateHost => "alternate-host",
            Self::WithTrailingSlash => "with-trailing-slash",
            Self::WithoutTrailingSlash => "without-trailing-slash",
        }
    }
}

impl std::fmt::Display for VariantRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A labeled candidate connection string.
///
/// `Debug` shows the candidate with its password masked.
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectionVariant {
    /// Rule that produced this variant
    pub rule: VariantRule,
    /// Candidate connection string
    pub candidate: String,
}

impl ConnectionVariant {
    /// Label of the producing rule.
    pub const fn label(&self) -> &'static str {
        self.rule.label()
    }

    /// Candidate with the password masked, safe for logs and reports.
    pub fn redacted(&self) -> String {
        crate::error::redact_connection_string(&self.candidate)
    }
}

impl std::fmt::Debug for ConnectionVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionVariant")
            .field("rule", &self.rule)
            .field("candidate", &self.redacted())
            .finish()
    }
}

/// Rule slots in generation order. The `@` and trailing-slash slots pick
/// one direction depending on the base.
#[derive(Debug, Clone, Copy)]
enum Step {
    Original,
    WithoutDatabase,
    ToggleAtEncoding,
    WithoutSrv,
    AlternateHost,
    ToggleTrailingSlash,
}

const STEPS: [Step; 6] = [
    Step::Original,
    Step::WithoutDatabase,
    Step::ToggleAtEncoding,
    Step::WithoutSrv,
    Step::AlternateHost,
    Step::ToggleTrailingSlash,
];

/// Generates variants of a parsed base connection string.
///
/// Holds no iteration state: every call to [`Self::iter`] starts over.
///
/// # Example
/// ```rust
/// use connprobe_core::parser::parse_connection_string;
/// use connprobe_core::variations::VariantGenerator;
///
/// let base = parse_connection_string("mongodb+srv://u:p@cluster0.mongodb.net/db")?;
/// let labels: Vec<&str> = VariantGenerator::new(&base).iter().map(|v| v.label()).collect();
/// assert_eq!(labels[..2], ["original", "without-database"]);
/// # Ok::<(), connprobe_core::ConnProbeError>(())
/// ```
#[derive(Debug, Clone)]
pub struct VariantGenerator<'a> {
    base: &'a ParsedConnectionString,
    alternate_host: Option<&'a str>,
}

impl<'a> VariantGenerator<'a> {
    /// Creates a generator over `base`.
    pub const fn new(base: &'a ParsedConnectionString) -> Self {
        Self {
            base,
            alternate_host: None,
        }
    }

    /// Enables the `alternate-host` rule.
    #[must_use]
    pub fn with_alternate_host(mut self, host: Option<&'a str>) -> Self {
        self.alternate_host = host;
        self
    }

    /// Lazily yields variants in rule order.
    pub fn iter(&self) -> Variants<'a> {
        Variants {
            generator: self.clone(),
            next_step: 0,
        }
    }

    fn apply(&self, step: Step) -> Option<ConnectionVariant> {
        let base = self.base;
        let (rule, candidate) = match step {
            Step::Original => (VariantRule::Original, base.clone()),
            Step::WithoutDatabase => {
                if base.database.is_empty() {
                    return None;
                }
                let mut next = base.clone();
                next.database.clear();
                // Options need the separator: `host/?opts`
                next.path_separator = next.query.is_some();
                (VariantRule::WithoutDatabase, next)
            }
            Step::ToggleAtEncoding => {
                let credentials = base.credentials.as_ref()?;
                let username = credentials.username();
                let password = credentials.password();
                let (rule, username, password) =
                    if username.contains('@') || password.contains('@') {
                        (
                            VariantRule::EncodedAt,
                            username.replace('@', ENCODED_AT),
                            password.replace('@', ENCODED_AT),
                        )
                    } else if contains_encoded_at(username) || contains_encoded_at(password) {
                        (
                            VariantRule::DecodedAt,
                            decode_at(username),
                            decode_at(password),
                        )
                    } else {
                        return None;
                    };
                let mut next = base.clone();
                next.credentials = Some(Credentials::new(
                    username,
                    credentials.has_password().then_some(password),
                ));
                (rule, next)
            }
            Step::WithoutSrv => {
                let scheme = base.scheme.strip_suffix("+srv")?;
                let mut next = base.clone();
                next.scheme = scheme.to_string();
                (VariantRule::WithoutSrv, next)
            }
            Step::AlternateHost => {
                let host = self.alternate_host?;
                if host == base.host {
                    return None;
                }
                let mut next = base.clone();
                next.host = host.to_string();
                (VariantRule::AlternateHost, next)
            }
            Step::ToggleTrailingSlash => {
                let mut next = base.clone();
                let rule = if let Some(database) = base.database.strip_suffix('/') {
                    next.database = database.to_string();
                    next.path_separator = !database.is_empty() || base.query.is_some();
                    VariantRule::WithoutTrailingSlash
                } else if base.path_separator && base.database.is_empty() {
                    if base.query.is_some() {
                        // `host?opts` is not accepted by every driver; keep the slash
                        return None;
                    }
                    next.path_separator = false;
                    VariantRule::WithoutTrailingSlash
                } else if base.path_separator {
                    next.database.push('/');
                    VariantRule::WithTrailingSlash
                } else {
                    next.path_separator = true;
                    VariantRule::WithTrailingSlash
                };
                (rule, next)
            }
        };

        Some(ConnectionVariant {
            rule,
            candidate: candidate.to_connection_string(),
        })
    }
}

/// Iterator over the variants of one generator.
#[derive(Debug, Clone)]
pub struct Variants<'a> {
    generator: VariantGenerator<'a>,
    next_step: usize,
}

impl Iterator for Variants<'_> {
    type Item = ConnectionVariant;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(step) = STEPS.get(self.next_step).copied() {
            self.next_step = self.next_step.saturating_add(1);
            if let Some(variant) = self.generator.apply(step) {
                return Some(variant);
            }
        }
        None
    }
}

fn contains_encoded_at(s: &str) -> bool {
    s.to_ascii_lowercase().contains(ENCODED_AT)
}

/// Decodes only `%40`, leaving every other escape untouched.
fn decode_at(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(idx) = rest.find('%') {
        let (head, tail) = rest.split_at(idx);
        out.push_str(head);
        match tail.get(..3) {
            Some(escape) if escape.eq_ignore_ascii_case(ENCODED_AT) => {
                out.push_str(&percent_decode_str(escape).decode_utf8_lossy());
                rest = tail.get(3..).unwrap_or_default();
            }
            _ => {
                out.push('%');
                rest = tail.get(1..).unwrap_or_default();
            }
        }
    }
    out.push_str(rest);
    out
}
