//! The one artifact exposed to external consumers.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// A calibrated, stability-classified weight reading.
///
/// Wire shape (REST/WS/MQTT payload):
/// `{"grams": <float>, "ts": <ISO-8601 string>, "stable": <bool>}`.
/// `grams` follows the two-decimal display convention; `ts` is the
/// sampling-loop wall-clock time, monotonically ordered across readings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub grams: f64,
    #[serde(serialize_with = "ser_iso8601")]
    pub ts: DateTime<Utc>,
    pub stable: bool,
}

impl Reading {
    /// Build a reading stamped now, rounding grams for display.
    #[must_use]
    pub fn now(grams: f64, stable: bool) -> Self {
        Self {
            grams: round2(grams),
            ts: Utc::now(),
            stable,
        }
    }
}

/// Round to the two-decimal display convention.
#[inline]
#[must_use]
pub fn round2(grams: f64) -> f64 {
    (grams * 100.0).round() / 100.0
}

fn ser_iso8601<S: serde::Serializer>(ts: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&ts.to_rfc3339_opts(SecondsFormat::Millis, true))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_shape_is_exact() {
        let r = Reading {
            grams: 512.345,
            ts: DateTime::parse_from_rfc3339("2026-08-23T10:15:00.250Z")
                .unwrap()
                .with_timezone(&Utc),
            stable: true,
        };
        let json = serde_json::to_value(&r).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "grams": 512.345,
                "ts": "2026-08-23T10:15:00.250Z",
                "stable": true
            })
        );
    }

    #[test]
    fn now_rounds_to_two_decimals() {
        let r = Reading::now(12.3449, false);
        assert_eq!(r.grams, 12.34);
        let r = Reading::now(-3.456, false);
        assert_eq!(r.grams, -3.46);
    }
}
