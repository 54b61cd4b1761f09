use std::sync::atomic::{AtomicU64, Ordering};

static NEXT: AtomicU64 = AtomicU64::new(1);

pub const RULE: &str = "rule-";
pub const PEER: &str = "peer-";
pub const PORT: &str = "port-";
pub const EXCEPTION: &str = "exception-";

/// Mints a process-unique list-identity key.
pub fn unique(prefix: &str) -> String {
    format!("{prefix}{}", NEXT.fetch_add(1, Ordering::Relaxed))
}
