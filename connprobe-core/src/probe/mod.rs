//! Connectivity probing.
//!
//! A [`Prober`] turns one candidate connection string into a
//! [`ProbeResult`]. Implementations must be total: DNS, authentication,
//! TLS, timeout and driver-rejection failures all come back as a failed
//! result, never as an error or panic.
//!
//! Variant runs are strictly sequential so the output order matches the
//! generation order and each result is reported before the next probe
//! starts.
//!
//! # Module Structure
//! - `mongodb`: driver-backed prober (feature `mongodb`)

#[cfg(feature = "mongodb")]
pub mod mongodb;

#[cfg(feature = "mongodb")]
pub use self::mongodb::MongoProber;

use crate::models::ProbeResult;
use crate::variations::ConnectionVariant;
use async_trait::async_trait;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Opens, exercises and closes one connection per call.
///
/// # Object Safety
/// This trait is object-safe, allowing `Box<dyn Prober>` so the variant
/// loop can run against a scripted prober in tests.
#[async_trait]
pub trait Prober: Send + Sync {
    /// Probes `candidate`, bounded by `timeout`.
    ///
    /// The returned result carries `label` unchanged.
    async fn probe(&self, label: &str, candidate: &str, timeout: Duration) -> ProbeResult;
}

/// Probes each variant in order, one at a time.
///
/// Every variant gets a result, whatever the outcome of the others.
pub async fn probe_variants<I>(
    prober: &dyn Prober,
    variants: I,
    timeout: Duration,
) -> Vec<ProbeResult>
where
    I: IntoIterator<Item = ConnectionVariant>,
{
    let mut results = Vec::new();

    for variant in variants {
        debug!(label = variant.label(), target = %variant.redacted(), "Probing variant");
        let result = prober.probe(variant.label(), &variant.candidate, timeout).await;
        log_result(&result);
        results.push(result);
    }

    info!(
        "Probed {} variants, {} succeeded",
        results.len(),
        results.iter().filter(|r| r.success).count()
    );

    results
}

fn log_result(result: &ProbeResult) {
    if result.success {
        info!(label = %result.label, elapsed_ms = result.elapsed_ms, "✓ Probe succeeded");
    } else {
        warn!(
            label = %result.label,
            elapsed_ms = result.elapsed_ms,
            error = result.error_name().unwrap_or_default(),
            "Probe failed: {}",
            result.error_message().unwrap_or_default()
        );
    }
}

/// Milliseconds elapsed since `start`, saturating.
pub(crate) fn elapsed_ms(start: Instant) -> u64 {
    u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX)
}
