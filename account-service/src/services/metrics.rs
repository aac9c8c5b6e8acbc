use prometheus::{Encoder, IntCounterVec, Opts, Registry, TextEncoder};
use std::sync::OnceLock;

static REGISTRY: OnceLock<Registry> = OnceLock::new();

static INVITATIONS_TOTAL: OnceLock<IntCounterVec> = OnceLock::new();
static QUOTA_REJECTIONS_TOTAL: OnceLock<IntCounterVec> = OnceLock::new();

/// Register the account counters. Safe to call more than once.
pub fn init_metrics() {
    if REGISTRY.get().is_some() {
        return;
    }

    let registry = Registry::new();

    let invitations = match IntCounterVec::new(
        Opts::new("account_invitations_total", "Member invitations by outcome"),
        &["outcome"],
    ) {
        Ok(metric) => metric,
        Err(e) => {
            tracing::error!("Failed to create account_invitations_total metric: {}", e);
            return;
        }
    };

    let quota_rejections = match IntCounterVec::new(
        Opts::new(
            "account_quota_rejections_total",
            "Operations rejected by a plan seat limit",
        ),
        &["seat"],
    ) {
        Ok(metric) => metric,
        Err(e) => {
            tracing::error!(
                "Failed to create account_quota_rejections_total metric: {}",
                e
            );
            return;
        }
    };

    for collector in [invitations.clone(), quota_rejections.clone()] {
        if let Err(e) = registry.register(Box::new(collector)) {
            tracing::error!("Failed to register account collector: {}", e);
            return;
        }
    }

    let _ = REGISTRY.set(registry);
    let _ = INVITATIONS_TOTAL.set(invitations);
    let _ = QUOTA_REJECTIONS_TOTAL.set(quota_rejections);
}

pub fn record_invitation(outcome: &str) {
    if let Some(counter) = INVITATIONS_TOTAL.get() {
        counter.with_label_values(&[outcome]).inc();
    }
}

pub fn record_quota_rejection(seat: &str) {
    if let Some(counter) = QUOTA_REJECTIONS_TOTAL.get() {
        counter.with_label_values(&[seat]).inc();
    }
}

pub fn get_metrics() -> String {
    let registry = match REGISTRY.get() {
        Some(r) => r,
        None => return "# Metrics registry not initialized\n".to_string(),
    };

    let mut buffer = Vec::new();
    if let Err(e) = TextEncoder::new().encode(&registry.gather(), &mut buffer) {
        tracing::error!("Failed to encode metrics: {}", e);
        return format!("# Failed to encode metrics: {}\n", e);
    }

    String::from_utf8(buffer).unwrap_or_else(|e| format!("# Invalid UTF-8 in metrics: {}\n", e))
}
