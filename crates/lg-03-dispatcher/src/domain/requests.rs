//! Request envelope and per-action payloads.

use super::errors::DispatchError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use shared_types::VersionToken;

/// Body of a call to the action endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActionRequest {
    #[serde(default)]
    pub action: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
    /// Expected version for `update-data`. When set the write is a strict
    /// compare-and-swap with no retry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<VersionToken>,
}

impl ActionRequest {
    pub fn new(action: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            secret: Some(secret.into()),
            data: None,
            version: None,
        }
    }

    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn with_version(mut self, version: VersionToken) -> Self {
        self.version = Some(version);
        self
    }

    /// Whether a non-null payload was sent.
    pub fn has_payload(&self) -> bool {
        !matches!(self.data, None | Some(serde_json::Value::Null))
    }

    /// Decode the payload into the action's typed shape.
    pub fn payload<T: DeserializeOwned>(&self, action: &'static str) -> Result<T, DispatchError> {
        let data = match &self.data {
            None | Some(serde_json::Value::Null) => {
                return Err(DispatchError::MissingPayload(action))
            }
            Some(data) => data.clone(),
        };
        serde_json::from_value(data).map_err(|e| DispatchError::InvalidPayload(e.to_string()))
    }

    /// Decode an optional payload; absent means `T::default()`.
    pub fn payload_or_default<T: DeserializeOwned + Default>(
        &self,
        action: &'static str,
    ) -> Result<T, DispatchError> {
        if self.has_payload() {
            self.payload(action)
        } else {
            Ok(T::default())
        }
    }
}

impl std::fmt::Display for ActionRequest {
    // Never prints the secret.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "action={} has_secret={} has_data={}",
            self.action,
            self.secret.is_some(),
            self.has_payload()
        )
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NotificationPayload {
    pub message: String,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RegisterTeamPayload {
    pub name: String,
    #[serde(default)]
    pub owner: String,
    #[serde(default)]
    pub group: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveTeamPayload {
    pub team_id: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleMatchPayload {
    pub home_team_id: String,
    pub away_team_id: String,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub stage: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordResultPayload {
    pub match_id: String,
    pub home_score: u32,
    pub away_score: u32,
    #[serde(default)]
    pub confirmed: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmResultPayload {
    pub match_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewsPayload {
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub pinned: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StandingsQuery {
    #[serde(default)]
    pub group: Option<String>,
}
