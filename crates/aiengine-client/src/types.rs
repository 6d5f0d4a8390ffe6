//! Request and response types for the engine API.
//!
//! These types mirror the service's wire contract. Field names follow the
//! service, which mixes camelCase (function groups, sessions) and snake_case
//! (credits, chat payloads).

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ─────────────────────────────────────────────────────────────────────────────
// Function groups
// ─────────────────────────────────────────────────────────────────────────────

/// A named collection of callable remote functions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionGroup {
    /// Group id.
    pub uuid: String,
    /// Display name.
    pub name: String,
    /// Whether only the owner (and users it was shared with) can see the group.
    pub is_private: bool,
}

/// Request to create a function group.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFunctionGroupRequest {
    /// Group name.
    pub name: String,
    /// Visibility flag.
    pub is_private: bool,
}

/// Permission action granted when sharing a function group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PermissionAction {
    /// Read access to the group and its functions.
    Retrieve,
}

/// Request to share a function group with another user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShareFunctionGroupRequest {
    /// Email of the user receiving access.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_email_to_add_permission: Option<String>,
    /// Id of the user receiving access.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id_to_add_permission: Option<String>,
    /// Granted permission.
    pub action: PermissionAction,
}

// ─────────────────────────────────────────────────────────────────────────────
// Functions
// ─────────────────────────────────────────────────────────────────────────────

/// A remote function registered with the engine.
///
/// Only the commonly used fields are typed; everything else the service
/// returns is kept in `extra`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Function {
    /// Function id.
    #[serde(default)]
    pub uuid: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Human readable description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Address of the agent serving the function.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent: Option<String>,
    /// Function type (PRIMARY, SECONDARY, ...).
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub function_type: Option<String>,
    /// Remaining fields as returned by the service.
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

/// Argument declaration of a function.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionArgument {
    /// Argument name.
    pub name: String,
    /// Whether the argument must be supplied.
    pub required: bool,
    /// Argument type name (e.g. "str").
    #[serde(rename = "type")]
    pub arg_type: String,
    /// Argument description.
    pub description: String,
}

/// Request to register a function.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFunctionRequest {
    /// Address of the agent serving the function.
    pub agent: String,
    /// Function name.
    pub name: String,
    /// Function description.
    pub description: String,
    /// Digest of the agent protocol.
    pub protocol_digest: String,
    /// Digest of the request model.
    pub model_digest: String,
    /// Name of the request model.
    pub model_name: String,
    /// Declared arguments.
    #[serde(default)]
    pub arguments: Vec<FunctionArgument>,
    /// Function type (PRIMARY, SECONDARY).
    #[serde(rename = "type")]
    pub function_type: String,
    /// Whether the function is a dialogue.
    pub is_dialogue: bool,
}

// ─────────────────────────────────────────────────────────────────────────────
// Credits & models
// ─────────────────────────────────────────────────────────────────────────────

/// Account credit balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditBalance {
    /// Credits granted in total.
    pub total_credits: i64,
    /// Credits already consumed.
    pub used_credits: i64,
    /// Credits still available.
    pub available_credits: i64,
}

/// Raw credit info as returned by the service.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct CreditInfoResponse {
    pub total_credit: i64,
    pub used_credit: i64,
    pub available_credit: i64,
}

impl From<CreditInfoResponse> for CreditBalance {
    fn from(raw: CreditInfoResponse) -> Self {
        Self {
            total_credits: raw.total_credit,
            used_credits: raw.used_credit,
            available_credits: raw.available_credit,
        }
    }
}

/// Remaining tokens per model.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct RemainingTokensResponse {
    #[serde(default)]
    pub model_tokens: HashMap<String, i64>,
}

/// A model together with the caller's remaining credits for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Model {
    /// Model id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Remaining credits.
    pub credits: i64,
}

// ─────────────────────────────────────────────────────────────────────────────
// Sessions
// ─────────────────────────────────────────────────────────────────────────────

/// Options for creating a chat session.
#[derive(Debug, Clone, Default)]
pub struct SessionOptions {
    /// Email of the user the session belongs to.
    pub email: Option<String>,
    /// Model id to use (defaults to the catalogue default).
    pub model: Option<String>,
}

impl SessionOptions {
    /// Set the user email.
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Set the model id.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }
}

/// Request to create a chat session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreateSessionRequest {
    pub email: String,
    pub function_group: String,
    pub preferences_enabled: bool,
    pub request_model: String,
}

/// Response from creating a chat session.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct CreateSessionResponse {
    pub session_id: String,
}

/// Response from polling for new messages.
///
/// Each element is a JSON document encoded as a string.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct NewMessagesResponse {
    #[serde(default)]
    pub agent_response: Vec<String>,
}

/// Query for polling new messages.
#[derive(Debug, Default, Serialize)]
pub(crate) struct NewMessagesQuery<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_message_id: Option<&'a str>,
}

/// Envelope for every message submitted to a session.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct SubmitRequest {
    pub payload: SubmitPayload,
}

/// Selected options sent in reply to a task selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSelection {
    /// Selection kind, mirroring the lower-cased task selection type.
    #[serde(rename = "type")]
    pub kind: String,
    /// Chosen option keys.
    pub selection: Vec<String>,
}

/// Outgoing payload, discriminated by its `type` field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SubmitPayload {
    /// Kick off a conversation with an objective.
    Start {
        session_id: String,
        message_id: String,
        objective: String,
        context: String,
        bucket_id: String,
    },
    /// Structured reply (task selection).
    UserJson {
        session_id: String,
        message_id: String,
        referral_id: String,
        user_json: UserSelection,
    },
    /// Free-text reply (answers, confirmations and rejections).
    UserMessage {
        session_id: String,
        message_id: String,
        referral_id: String,
        user_message: String,
    },
    /// Run specific functions directly.
    ExecuteFunctions {
        session_id: String,
        message_id: String,
        functions: Vec<String>,
        objective: String,
        context: String,
    },
}

impl SubmitPayload {
    /// Id of the outgoing message.
    pub fn message_id(&self) -> &str {
        match self {
            SubmitPayload::Start { message_id, .. }
            | SubmitPayload::UserJson { message_id, .. }
            | SubmitPayload::UserMessage { message_id, .. }
            | SubmitPayload::ExecuteFunctions { message_id, .. } => message_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_function_group_wire_names() {
        let group: FunctionGroup = serde_json::from_value(json!({
            "uuid": "g1",
            "name": "Fetch Verified",
            "isPrivate": false
        }))
        .unwrap();
        assert_eq!(group.uuid, "g1");
        assert!(!group.is_private);
    }

    #[test]
    fn test_share_request_serialization() {
        let request = ShareFunctionGroupRequest {
            user_email_to_add_permission: Some("a@b.c".to_string()),
            user_id_to_add_permission: None,
            action: PermissionAction::Retrieve,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({"user_email_to_add_permission": "a@b.c", "action": "RETRIEVE"})
        );
    }

    #[test]
    fn test_function_keeps_unknown_fields() {
        let function: Function = serde_json::from_value(json!({
            "uuid": "f1",
            "name": "Flights",
            "type": "PRIMARY",
            "isDialogue": false
        }))
        .unwrap();
        assert_eq!(function.function_type.as_deref(), Some("PRIMARY"));
        assert_eq!(function.extra.get("isDialogue"), Some(&json!(false)));
    }

    #[test]
    fn test_create_session_request_wire_names() {
        let request = CreateSessionRequest {
            email: String::new(),
            function_group: "g1".to_string(),
            preferences_enabled: false,
            request_model: "talkative-01".to_string(),
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["functionGroup"], "g1");
        assert_eq!(value["preferencesEnabled"], false);
        assert_eq!(value["requestModel"], "talkative-01");
    }

    #[test]
    fn test_submit_payload_tagging() {
        let payload = SubmitPayload::UserMessage {
            session_id: "s1".to_string(),
            message_id: "m2".to_string(),
            referral_id: "m1".to_string(),
            user_message: "confirm".to_string(),
        };
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["type"], "user_message");
        assert_eq!(value["referral_id"], "m1");
        assert_eq!(payload.message_id(), "m2");

        let payload = SubmitPayload::ExecuteFunctions {
            session_id: "s1".to_string(),
            message_id: "m3".to_string(),
            functions: vec!["f1".to_string()],
            objective: String::new(),
            context: String::new(),
        };
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["type"], "execute_functions");
    }

    #[test]
    fn test_new_messages_tolerates_missing_list() {
        let response: NewMessagesResponse = serde_json::from_value(json!({})).unwrap();
        assert!(response.agent_response.is_empty());
    }
}
