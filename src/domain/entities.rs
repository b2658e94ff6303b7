//! Domain entities: constituent rows as delivered by the record store

use std::fmt;

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};

/// Display name substituted for rows without a usable name.
pub const UNNAMED_PLACEHOLDER: &str = "(unnamed)";

/// Prefix of synthetic identities given to rows without one.
/// Store identities never start with `~`, so no referrer can target them.
pub const PLACEHOLDER_ID_PREFIX: &str = "~row-";

/// Opaque identity of a constituent.
///
/// Store primary keys arrive either as strings (uuid) or integers (bigint),
/// both normalize to the same textual identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "RawId", into = "String")]
pub struct RecordId(String);

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Signed(i64),
    Unsigned(u64),
}

impl From<RawId> for RecordId {
    fn from(raw: RawId) -> Self {
        match raw {
            RawId::Text(s) => Self(s.trim().to_string()),
            RawId::Signed(n) => Self(n.to_string()),
            RawId::Unsigned(n) => Self(n.to_string()),
        }
    }
}

impl From<RecordId> for String {
    fn from(id: RecordId) -> Self {
        id.0
    }
}

impl RecordId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Synthetic identity for the row at `row` (0-based input position).
    pub fn placeholder(row: usize) -> Self {
        Self(format!("{PLACEHOLDER_ID_PREFIX}{row}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }

    pub fn is_placeholder(&self) -> bool {
        self.0.starts_with(PLACEHOLDER_ID_PREFIX)
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for RecordId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Electoral standing of a constituent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Won,
    Undecided,
    Lost,
    Pending,
    /// Missing or unrecognized status on the source row
    #[serde(other)]
    Unknown,
}

impl Status {
    pub const ALL: [Status; 5] = [
        Status::Won,
        Status::Undecided,
        Status::Lost,
        Status::Pending,
        Status::Unknown,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Status::Won => "won",
            Status::Undecided => "undecided",
            Status::Lost => "lost",
            Status::Pending => "pending",
            Status::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

/// One constituent row, scoped to a single tenant by the caller.
///
/// Every field is optional and decoded on its own: a field of the wrong type
/// reads as absent, so the rest of the row survives and is repaired with
/// placeholders when indexed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstituentRecord {
    #[serde(default, deserialize_with = "lenient")]
    pub id: Option<RecordId>,
    #[serde(default, alias = "full_name", deserialize_with = "lenient")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub status: Option<Status>,
    /// Identity of the person who recruited this constituent
    #[serde(
        default,
        alias = "referrer_id",
        alias = "referred_by",
        deserialize_with = "lenient"
    )]
    pub referrer: Option<RecordId>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Lenient<T> {
    Valid(Option<T>),
    Mistyped(IgnoredAny),
}

/// Decode an optional field, mapping a value of the wrong type to None.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(match Lenient::<T>::deserialize(deserializer)? {
        Lenient::Valid(value) => value,
        Lenient::Mistyped(_) => None,
    })
}

impl ConstituentRecord {
    pub fn new(id: impl Into<RecordId>, name: impl Into<String>, status: Status) -> Self {
        Self {
            id: Some(id.into()),
            name: Some(name.into()),
            status: Some(status),
            referrer: None,
        }
    }

    pub fn referred_by(mut self, referrer: impl Into<RecordId>) -> Self {
        self.referrer = Some(referrer.into());
        self
    }

    /// Referrer identity, treating a blank reference as absent.
    pub fn referrer_id(&self) -> Option<&RecordId> {
        self.referrer.as_ref().filter(|r| !r.is_blank())
    }

    /// Identity used for this row: its own, or the placeholder for `row`.
    pub fn identity(&self, row: usize) -> RecordId {
        match &self.id {
            Some(id) if !id.is_blank() => id.clone(),
            _ => RecordId::placeholder(row),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_numeric_and_text_ids_when_deserializing_then_both_become_text() {
        let rows: Vec<ConstituentRecord> =
            serde_json::from_str(r#"[{"id": 42, "referrer_id": "7"}, {"id": "abc"}]"#).unwrap();
        assert_eq!(rows[0].id, Some(RecordId::new("42")));
        assert_eq!(rows[0].referrer, Some(RecordId::new("7")));
        assert_eq!(rows[1].id, Some(RecordId::new("abc")));
    }

    #[test]
    fn given_unrecognized_status_when_deserializing_then_unknown() {
        let row: ConstituentRecord =
            serde_json::from_str(r#"{"id": "1", "status": "abstained"}"#).unwrap();
        assert_eq!(row.status, Some(Status::Unknown));
    }

    #[test]
    fn given_null_fields_when_deserializing_then_none() {
        let row: ConstituentRecord =
            serde_json::from_str(r#"{"id": "1", "name": null, "status": null, "referred_by": null}"#)
                .unwrap();
        assert_eq!(row.name, None);
        assert_eq!(row.status, None);
        assert_eq!(row.referrer, None);
    }

    #[test]
    fn given_mistyped_fields_when_deserializing_then_only_those_absent() {
        let row: ConstituentRecord = serde_json::from_str(
            r#"{"id": "a", "name": 42, "status": 1, "referrer_id": {"id": "r"}}"#,
        )
        .unwrap();
        assert_eq!(row.id, Some(RecordId::new("a")));
        assert_eq!(row.name, None);
        assert_eq!(row.status, None);
        assert_eq!(row.referrer, None);

        let row: ConstituentRecord =
            serde_json::from_str(r#"{"id": ["x"], "name": "Ana", "referred_by": 7}"#).unwrap();
        assert_eq!(row.id, None);
        assert_eq!(row.name.as_deref(), Some("Ana"));
        assert_eq!(row.referrer, Some(RecordId::new("7")));
    }

    #[test]
    fn given_blank_referrer_when_resolving_then_absent() {
        let row = ConstituentRecord::new("1", "Ana", Status::Won).referred_by("  ");
        assert!(row.referrer_id().is_none());
    }

    #[test]
    fn given_missing_id_when_taking_identity_then_placeholder() {
        let row = ConstituentRecord::default();
        let id = row.identity(3);
        assert_eq!(id.as_str(), "~row-3");
        assert!(id.is_placeholder());
    }
}
