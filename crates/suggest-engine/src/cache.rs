//! Process-lifetime suggestion cache
//!
//! Entries are keyed by a fingerprint derived from the issue content and
//! live until process restart — no eviction, no TTL. The cache is a
//! cost-saving optimization, not a consistency mechanism: edits to the
//! heuristic table only take effect after a restart.

use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

use a11y_types::Issue;
use sha2::{Digest, Sha256};

/// Element text is capped before hashing so pathological payloads do not
/// dominate fingerprint cost.
const DIGEST_INPUT_CAP: usize = 500;

/// Hex characters kept from the content digest.
const DIGEST_LEN: usize = 12;

/// Mutex-guarded suggestion cache shared across requests.
///
/// Handed to the components that need it rather than reached for as a
/// global, so the locking discipline stays behind this interface.
#[derive(Debug, Default)]
pub struct SuggestionCache {
    entries: Mutex<HashMap<String, String>>,
}

impl SuggestionCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, fingerprint: &str) -> Option<String> {
        self.lock().get(fingerprint).cloned()
    }

    pub fn put(&self, fingerprint: impl Into<String>, text: impl Into<String>) {
        self.lock().insert(fingerprint.into(), text.into());
    }

    /// Return the cached text for `fingerprint`, computing and storing it
    /// via `compute` on a miss. `compute` runs at most once per fingerprint,
    /// which makes idempotence observable through call counting.
    pub fn get_or_insert_with(&self, fingerprint: &str, compute: impl FnOnce() -> String) -> String {
        let mut entries = self.lock();
        entries
            .entry(fingerprint.to_string())
            .or_insert_with(compute)
            .clone()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Fingerprint for the heuristic path: category, issue type and a content
/// digest of the element text.
pub fn heuristic_fingerprint(issue: &Issue) -> String {
    format!(
        "{}:{}:{}",
        issue.category,
        issue.issue_type,
        content_digest(&issue.element)
    )
}

/// Fingerprint for AI-sourced entries. Extends the heuristic key with the
/// severity, a digest of the context mapping, and the screen number, so a
/// suggestion generated for one educational context never leaks into
/// another.
pub fn ai_fingerprint(issue: &Issue) -> String {
    let context = issue
        .context
        .as_ref()
        .map(context_digest)
        .unwrap_or_else(|| "none".to_string());
    let screen = issue
        .screen_info
        .as_ref()
        .map(|info| info.screen_number.to_string())
        .unwrap_or_else(|| "0".to_string());

    format!(
        "ai:{}:{}:{}:{}",
        heuristic_fingerprint(issue),
        issue.severity,
        context,
        screen
    )
}

fn content_digest(text: &str) -> String {
    let capped: String = text.chars().take(DIGEST_INPUT_CAP).collect();
    let digest = Sha256::digest(capped.as_bytes());
    let mut hex = String::with_capacity(DIGEST_LEN);
    for byte in digest.iter().take(DIGEST_LEN / 2) {
        hex.push_str(&format!("{:02x}", byte));
    }
    hex
}

// Context maps arrive as unordered JSON objects; serialize through a
// BTreeMap so identical contexts always digest identically.
fn context_digest(context: &HashMap<String, serde_json::Value>) -> String {
    let ordered: BTreeMap<&String, &serde_json::Value> = context.iter().collect();
    let serialized = serde_json::to_string(&ordered).unwrap_or_default();
    content_digest(&serialized)
}
