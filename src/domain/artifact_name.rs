use std::fmt;

use chrono::Utc;
use rand::Rng;

/// Generated name of a staged artifact. Only the extension of the client's
/// declared filename ever reaches the name; everything else is produced
/// server-side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactName(String);

impl ArtifactName {
    pub fn generate(field_tag: &str, original_name: &str) -> Self {
        let timestamp = Utc::now().timestamp_millis();
        let suffix: u32 = rand::thread_rng().gen_range(0..1_000_000_000);
        match extension_of(original_name) {
            Some(ext) => Self(format!("{}-{}-{}.{}", field_tag, timestamp, suffix, ext)),
            None => Self(format!("{}-{}-{}", field_tag, timestamp, suffix)),
        }
    }

    /// Accepts a caller-supplied name only if it cannot escape the managed
    /// directory: no path separators, no dot-segments, no hidden files.
    pub fn parse(raw: &str) -> Option<Self> {
        if raw.is_empty() || raw.starts_with('.') {
            return None;
        }
        if raw.contains('/') || raw.contains('\\') || raw.contains("..") {
            return None;
        }
        Some(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ArtifactName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn extension_of(original_name: &str) -> Option<String> {
    let (stem, ext) = original_name.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() || !ext.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}
