//! Numeric identifiers with lenient JSON decoding.
//!
//! Stored records may carry ids as JSON numbers or numeric strings
//! (form selects produce strings). Both decode; ids always encode as numbers.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Project identity: creation timestamp in epoch milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct ProjectId(pub i64);

/// Checklist item identity, unique across a project's lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct ChecklistItemId(pub i64);

/// Reference into the collaborator directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct CollaboratorId(pub u32);

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Number(i64),
    Text(String),
}

fn decode_i64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
    match NumberOrText::deserialize(deserializer)? {
        NumberOrText::Number(value) => Ok(Some(value)),
        NumberOrText::Text(text) if text.trim().is_empty() => Ok(None),
        NumberOrText::Text(text) => text
            .trim()
            .parse::<i64>()
            .map(Some)
            .map_err(|_| D::Error::custom(format!("expected numeric id, got `{text}`"))),
    }
}

fn require<E: serde::de::Error>(value: Option<i64>) -> Result<i64, E> {
    value.ok_or_else(|| E::custom("id cannot be blank"))
}

impl<'de> Deserialize<'de> for ProjectId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        decode_i64(deserializer).and_then(require).map(Self)
    }
}

impl<'de> Deserialize<'de> for ChecklistItemId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        decode_i64(deserializer).and_then(require).map(Self)
    }
}

impl<'de> Deserialize<'de> for CollaboratorId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = decode_i64(deserializer).and_then(require)?;
        u32::try_from(raw)
            .map(Self)
            .map_err(|_| D::Error::custom(format!("collaborator id out of range: {raw}")))
    }
}

/// Decodes an optional collaborator reference; `null` and `""` mean unassigned.
pub(crate) fn deserialize_optional_collaborator<'de, D>(
    deserializer: D,
) -> Result<Option<CollaboratorId>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<NumberOrText>::deserialize(deserializer)?;
    let value = match raw {
        None => None,
        Some(NumberOrText::Number(value)) => Some(value),
        Some(NumberOrText::Text(text)) if text.trim().is_empty() => None,
        Some(NumberOrText::Text(text)) => Some(text.trim().parse::<i64>().map_err(|_| {
            D::Error::custom(format!("expected numeric collaborator id, got `{text}`"))
        })?),
    };
    value
        .map(|raw| {
            u32::try_from(raw)
                .map(CollaboratorId)
                .map_err(|_| D::Error::custom(format!("collaborator id out of range: {raw}")))
        })
        .transpose()
}

impl FromStr for CollaboratorId {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        value
            .trim()
            .parse::<u32>()
            .map(CollaboratorId)
            .map_err(|_| format!("invalid collaborator id `{value}`"))
    }
}

impl FromStr for ProjectId {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        value
            .trim()
            .parse::<i64>()
            .map(ProjectId)
            .map_err(|_| format!("invalid project id `{value}`"))
    }
}

impl FromStr for ChecklistItemId {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        value
            .trim()
            .parse::<i64>()
            .map(ChecklistItemId)
            .map_err(|_| format!("invalid task id `{value}`"))
    }
}

impl Display for ProjectId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Display for ChecklistItemId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Display for CollaboratorId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::{ChecklistItemId, CollaboratorId, ProjectId};

    #[test]
    fn ids_decode_from_numbers_and_numeric_strings() {
        let id: ProjectId = serde_json::from_str("1718000000000").unwrap();
        assert_eq!(id, ProjectId(1_718_000_000_000));
        let id: ChecklistItemId = serde_json::from_str("\"7\"").unwrap();
        assert_eq!(id, ChecklistItemId(7));
        let id: CollaboratorId = serde_json::from_str("\"2\"").unwrap();
        assert_eq!(id, CollaboratorId(2));
    }

    #[test]
    fn ids_reject_non_numeric_text() {
        assert!(serde_json::from_str::<ProjectId>("\"abc\"").is_err());
        assert!(serde_json::from_str::<ProjectId>("\"\"").is_err());
        assert!(serde_json::from_str::<CollaboratorId>("-1").is_err());
    }

    #[test]
    fn ids_encode_as_numbers() {
        assert_eq!(serde_json::to_string(&ChecklistItemId(3)).unwrap(), "3");
    }
}
