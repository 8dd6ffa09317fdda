use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use stockbrief_core::{EnvelopeMeta, ValidationError};
use uuid::Uuid;

/// Request identifier (UUID v4) for end-to-end request tracking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(Uuid);

impl RequestId {
    pub fn new_v4() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Display for RequestId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

/// Envelope metadata for one command run.
pub fn envelope_meta(
    source: &str,
    latency_ms: u64,
    warnings: Vec<String>,
) -> Result<EnvelopeMeta, ValidationError> {
    let mut meta = EnvelopeMeta::new(RequestId::new_v4().to_string(), source, latency_ms)?;
    for warning in warnings {
        meta.push_warning(warning);
    }
    Ok(meta)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_ids_are_unique_hyphenated_uuids() {
        let first = RequestId::new_v4().to_string();
        let second = RequestId::new_v4().to_string();

        assert_eq!(first.len(), 36);
        assert_ne!(first, second);
    }

    #[test]
    fn meta_carries_warnings() {
        let meta = envelope_meta("yahoo", 42, vec![String::from("news unavailable")])
            .expect("meta should be valid");

        assert_eq!(meta.latency_ms, 42);
        assert_eq!(meta.warnings, vec!["news unavailable"]);
    }
}
