use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_types::{ShiftId, UserId};

/// Identity claims carried by a trust token.
///
/// Serialized field names are frozen. Unknown fields are ignored on decode
/// so later releases may add claims without breaking older readers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    pub shift_id: ShiftId,
    #[serde(rename = "worker_uuid")]
    pub worker_id: UserId,
    #[serde(rename = "workplace")]
    pub employer: String,
    #[serde(with = "timestamp")]
    pub start_time: DateTime<Utc>,
    #[serde(with = "timestamp")]
    pub issued_at: DateTime<Utc>,
}

impl TokenClaims {
    pub fn new(
        shift_id: ShiftId,
        worker_id: UserId,
        employer: impl Into<String>,
        start_time: DateTime<Utc>,
        issued_at: DateTime<Utc>,
    ) -> Self {
        Self {
            shift_id,
            worker_id,
            employer: employer.into(),
            start_time,
            issued_at,
        }
    }
}

/// RFC 3339 on output. On input also accepts zone-less ISO timestamps,
/// read as UTC, which older tokens carry.
mod timestamp {
    use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::AutoSi, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.with_timezone(&Utc))
            .or_else(|_| {
                NaiveDateTime::parse_from_str(&raw, "%Y-%m-%dT%H:%M:%S%.f").map(|n| n.and_utc())
            })
            .map_err(|e| serde::de::Error::custom(format!("invalid timestamp {raw:?}: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn field_names_are_frozen() {
        let at = Utc.with_ymd_and_hms(2024, 4, 4, 8, 0, 0).unwrap();
        let claims = TokenClaims::new(ShiftId::new(), UserId::new(), "CafeX", at, at);
        let value = serde_json::to_value(&claims).unwrap();
        let mut keys: Vec<&str> = value.as_object().unwrap().keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(
            keys,
            vec!["issued_at", "shift_id", "start_time", "worker_uuid", "workplace"]
        );
        assert_eq!(value["start_time"], "2024-04-04T08:00:00Z");
    }

    #[test]
    fn accepts_zoneless_timestamps() {
        let json = format!(
            r#"{{"shift_id":"{}","worker_uuid":"{}","workplace":"CafeX",
                "start_time":"2024-04-04T08:00:00.123456","issued_at":"2024-04-04T08:00:01"}}"#,
            ShiftId::new(),
            UserId::new()
        );
        let claims: TokenClaims = serde_json::from_str(&json).unwrap();
        assert_eq!(claims.start_time.timestamp_subsec_micros(), 123456);
        assert_eq!(claims.issued_at, Utc.with_ymd_and_hms(2024, 4, 4, 8, 0, 1).unwrap());
    }

    #[test]
    fn ignores_unknown_fields() {
        let json = format!(
            r#"{{"shift_id":"{}","worker_uuid":"{}","workplace":"CafeX",
                "start_time":"2024-04-04T08:00:00Z","issued_at":"2024-04-04T08:00:00Z","v":2}}"#,
            ShiftId::new(),
            UserId::new()
        );
        assert!(serde_json::from_str::<TokenClaims>(&json).is_ok());
    }
}
