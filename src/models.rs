//! Wire types for the customization flow.

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{AppError, Result};

/// A reference to a trinket attached to a pen.
///
/// Clients historically sent either a bare identifier (`"T1"`) or an object
/// (`{"id": "T1", "name": "Star"}`), so deserialization accepts both. The
/// display name is optional and only used for the order log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrinketRef {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl TrinketRef {
    /// Label used in log rows: the display name, or the id when unnamed.
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }
}

impl<'de> Deserialize<'de> for TrinketRef {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Bare(String),
            Full { id: String, name: Option<String> },
        }

        Ok(match Repr::deserialize(deserializer)? {
            Repr::Bare(id) => TrinketRef { id, name: None },
            Repr::Full { id, name } => TrinketRef { id, name },
        })
    }
}

/// Comma-joined trinket labels for a log row.
pub fn joined_labels(trinkets: &[TrinketRef]) -> String {
    trinkets
        .iter()
        .map(TrinketRef::label)
        .collect::<Vec<_>>()
        .join(", ")
}

/// A validated customization: base pen variant plus its trinkets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customization {
    pub pen: String,
    pub trinkets: Vec<TrinketRef>,
}

/// Pre-validation wire shape of a customization. Both fields are required
/// but clients routinely omit them, so rejection happens here with a message
/// naming what was missing rather than in the JSON extractor.
#[derive(Debug, Clone, Deserialize)]
pub struct CustomizationDraft {
    pub pen: Option<String>,
    pub trinkets: Option<Vec<TrinketRef>>,
}

impl CustomizationDraft {
    /// An empty trinket list is accepted; an empty pen id is not.
    pub fn validate(self) -> Result<Customization> {
        let pen_missing = self.pen.as_deref().map(str::is_empty).unwrap_or(true);
        let trinkets_missing = self.trinkets.is_none();

        match (pen_missing, trinkets_missing) {
            (false, false) => Ok(Customization {
                pen: self.pen.unwrap_or_default(),
                trinkets: self.trinkets.unwrap_or_default(),
            }),
            (true, false) => Err(AppError::Validation("pen".into())),
            (false, true) => Err(AppError::Validation("trinkets".into())),
            (true, true) => Err(AppError::Validation("pen and trinkets".into())),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TempSaveResponse {
    pub temp_order_id: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookRequest {
    pub temp_order_id: String,
    pub payment_status: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct WebhookResponse {
    pub message: String,
}
