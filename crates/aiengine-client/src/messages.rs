//! Message taxonomy for engine chat sessions.
//!
//! The service delivers heterogeneous JSON documents. [`classify`] turns one
//! [`RawMessage`] into exactly one typed [`Message`], or reports why it could
//! not. Classification is pure; the session decides what to do with failures.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Text marker the service uses for confirmations that carry no structured type.
///
/// Content sniffing is a fallback only: explicit types are always checked first.
pub const CONFIRMATION_MARKER: &str = "Please confirm";

// ─────────────────────────────────────────────────────────────────────────────
// Raw wire messages
// ─────────────────────────────────────────────────────────────────────────────

/// A message exactly as received from the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawMessage {
    /// Message id, unique within the session.
    pub message_id: String,
    /// ISO-8601 timestamp.
    #[serde(default)]
    pub timestamp: String,
    /// Top-level discriminant (`agent_json`, `agent_message`, `agent_info`, `stop`).
    #[serde(rename = "type", default)]
    pub message_type: String,
    /// All other fields.
    #[serde(flatten)]
    pub body: Map<String, Value>,
}

impl RawMessage {
    /// Decode one element of a poll response (a JSON document encoded as a string).
    pub fn decode(item: &str) -> serde_json::Result<Self> {
        serde_json::from_str(item)
    }
}

/// Why a raw message could not be classified.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClassifyError {
    /// Top-level `type` is not part of the taxonomy.
    #[error("unknown message type '{0}'")]
    UnknownType(String),

    /// `agent_json.type` is not recognised and the text is not a confirmation.
    #[error("unknown agent_json type '{0}'")]
    UnknownAgentJsonType(String),

    /// A field required by the detected variant is absent.
    #[error("missing field '{0}'")]
    MissingField(&'static str),

    /// A field is present but has the wrong shape.
    #[error("malformed field '{field}': {reason}")]
    Malformed {
        /// Offending field.
        field: &'static str,
        /// Decoder message.
        reason: String,
    },
}

// ─────────────────────────────────────────────────────────────────────────────
// Typed messages
// ─────────────────────────────────────────────────────────────────────────────

/// One option of a [`TaskSelection`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskOption {
    /// Option key, unique within its selection.
    pub key: String,
    /// Display title.
    pub title: String,
}

/// Flavour of a task selection, echoed back in the reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionKind {
    /// A list of tasks to run.
    TaskList,
    /// Generic options.
    Options,
}

impl SelectionKind {
    /// Wire name used in `user_json.type`.
    pub fn as_str(&self) -> &'static str {
        match self {
            SelectionKind::TaskList => "task_list",
            SelectionKind::Options => "options",
        }
    }
}

/// Shape of data requested by a [`DataRequest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataRequestKind {
    /// A calendar date.
    Date,
}

/// Informational note from the engine; no reply expected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineInfo {
    pub id: String,
    pub timestamp: String,
    pub text: String,
}

/// Question or statement from the agent; may be answered with free text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentUtterance {
    pub id: String,
    pub timestamp: String,
    pub text: String,
}

/// The caller must pick one or more options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskSelection {
    pub id: String,
    pub timestamp: String,
    pub selection_kind: SelectionKind,
    pub text: String,
    /// Options keyed by [`TaskOption::key`].
    pub options: IndexMap<String, TaskOption>,
}

impl TaskSelection {
    /// Look up an offered option.
    pub fn option(&self, key: &str) -> Option<&TaskOption> {
        self.options.get(key)
    }
}

/// The caller must reply with data of the requested kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataRequest {
    pub id: String,
    pub timestamp: String,
    pub subtype: DataRequestKind,
    pub text: String,
}

/// The caller must confirm or reject a pending function call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Confirmation {
    pub id: String,
    pub timestamp: String,
    pub text: String,
    /// Digest of the model the call will use.
    pub model: String,
    /// Arguments of the call.
    pub payload: Map<String, Value>,
}

/// The session has concluded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stop {
    pub id: String,
    pub timestamp: String,
}

/// Discriminant of a [`Message`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    EngineInfo,
    AgentUtterance,
    TaskSelection,
    DataRequest,
    Confirmation,
    Stop,
}

/// A classified session message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Message {
    EngineInfo(EngineInfo),
    AgentUtterance(AgentUtterance),
    TaskSelection(TaskSelection),
    DataRequest(DataRequest),
    Confirmation(Confirmation),
    Stop(Stop),
}

impl Message {
    /// Message id.
    pub fn id(&self) -> &str {
        match self {
            Message::EngineInfo(m) => &m.id,
            Message::AgentUtterance(m) => &m.id,
            Message::TaskSelection(m) => &m.id,
            Message::DataRequest(m) => &m.id,
            Message::Confirmation(m) => &m.id,
            Message::Stop(m) => &m.id,
        }
    }

    /// ISO-8601 timestamp.
    pub fn timestamp(&self) -> &str {
        match self {
            Message::EngineInfo(m) => &m.timestamp,
            Message::AgentUtterance(m) => &m.timestamp,
            Message::TaskSelection(m) => &m.timestamp,
            Message::DataRequest(m) => &m.timestamp,
            Message::Confirmation(m) => &m.timestamp,
            Message::Stop(m) => &m.timestamp,
        }
    }

    /// Variant discriminant.
    pub fn kind(&self) -> MessageKind {
        match self {
            Message::EngineInfo(_) => MessageKind::EngineInfo,
            Message::AgentUtterance(_) => MessageKind::AgentUtterance,
            Message::TaskSelection(_) => MessageKind::TaskSelection,
            Message::DataRequest(_) => MessageKind::DataRequest,
            Message::Confirmation(_) => MessageKind::Confirmation,
            Message::Stop(_) => MessageKind::Stop,
        }
    }

    /// Whether this message ends the session.
    pub fn is_stop(&self) -> bool {
        matches!(self, Message::Stop(_))
    }
}

/// A message that can be answered with free text.
pub trait FreeTextPrompt {
    /// Id of the message being answered.
    fn message_id(&self) -> &str;
}

impl FreeTextPrompt for AgentUtterance {
    fn message_id(&self) -> &str {
        &self.id
    }
}

impl FreeTextPrompt for DataRequest {
    fn message_id(&self) -> &str {
        &self.id
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Classification
// ─────────────────────────────────────────────────────────────────────────────

/// Structured types carried in `agent_json.type`, compared upper-cased.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AgentJsonType {
    TaskList,
    Options,
    Confirmation,
    Date,
}

impl AgentJsonType {
    fn parse(raw: &str) -> Option<Self> {
        match raw.to_ascii_uppercase().as_str() {
            "TASK_LIST" => Some(Self::TaskList),
            "OPTIONS" => Some(Self::Options),
            "CONFIRMATION" | "CONTEXT_JSON" => Some(Self::Confirmation),
            "DATE" => Some(Self::Date),
            _ => None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct AgentJson {
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    options: Option<Vec<WireOption>>,
    #[serde(default)]
    context_json: Option<ContextJson>,
}

#[derive(Debug, Deserialize)]
struct WireOption {
    key: Value,
    value: String,
}

#[derive(Debug, Deserialize)]
struct ContextJson {
    digest: String,
    #[serde(default)]
    args: Map<String, Value>,
}

/// Classify a raw message into exactly one [`Message`] variant.
pub fn classify(raw: &RawMessage) -> Result<Message, ClassifyError> {
    let id = raw.message_id.clone();
    let timestamp = raw.timestamp.clone();

    match raw.message_type.as_str() {
        "agent_json" => classify_agent_json(raw, id, timestamp),
        "agent_info" => Ok(Message::EngineInfo(EngineInfo {
            id,
            timestamp,
            text: string_field(raw, "agent_info")?,
        })),
        "agent_message" => Ok(Message::AgentUtterance(AgentUtterance {
            id,
            timestamp,
            text: string_field(raw, "agent_message")?,
        })),
        "stop" => Ok(Message::Stop(Stop { id, timestamp })),
        other => Err(ClassifyError::UnknownType(other.to_string())),
    }
}

fn classify_agent_json(
    raw: &RawMessage,
    id: String,
    timestamp: String,
) -> Result<Message, ClassifyError> {
    let value = raw
        .body
        .get("agent_json")
        .ok_or(ClassifyError::MissingField("agent_json"))?;
    let agent_json: AgentJson =
        serde_json::from_value(value.clone()).map_err(|e| ClassifyError::Malformed {
            field: "agent_json",
            reason: e.to_string(),
        })?;

    let explicit = agent_json.kind.as_deref().and_then(AgentJsonType::parse);
    let detected = match explicit {
        Some(kind) => kind,
        None if agent_json
            .text
            .as_deref()
            .is_some_and(|t| t.contains(CONFIRMATION_MARKER)) =>
        {
            AgentJsonType::Confirmation
        }
        None => {
            return Err(ClassifyError::UnknownAgentJsonType(
                agent_json.kind.unwrap_or_default(),
            ));
        }
    };

    let text = agent_json
        .text
        .ok_or(ClassifyError::MissingField("agent_json.text"))?;

    match detected {
        AgentJsonType::TaskList | AgentJsonType::Options => {
            let wire = agent_json
                .options
                .ok_or(ClassifyError::MissingField("agent_json.options"))?;
            let selection_kind = if detected == AgentJsonType::TaskList {
                SelectionKind::TaskList
            } else {
                SelectionKind::Options
            };
            Ok(Message::TaskSelection(TaskSelection {
                id,
                timestamp,
                selection_kind,
                text,
                options: index_options(wire),
            }))
        }
        AgentJsonType::Confirmation => {
            let context = agent_json
                .context_json
                .ok_or(ClassifyError::MissingField("agent_json.context_json"))?;
            Ok(Message::Confirmation(Confirmation {
                id,
                timestamp,
                text,
                model: context.digest,
                payload: context.args,
            }))
        }
        AgentJsonType::Date => Ok(Message::DataRequest(DataRequest {
            id,
            timestamp,
            subtype: DataRequestKind::Date,
            text,
        })),
    }
}

/// Re-key wire options by their string-coerced key. Duplicate keys: last one wins.
fn index_options(wire: Vec<WireOption>) -> IndexMap<String, TaskOption> {
    let mut options = IndexMap::with_capacity(wire.len());
    for option in wire {
        let key = match option.key {
            Value::String(s) => s,
            other => other.to_string(),
        };
        options.insert(
            key.clone(),
            TaskOption {
                key,
                title: option.value,
            },
        );
    }
    options
}

fn string_field(raw: &RawMessage, field: &'static str) -> Result<String, ClassifyError> {
    match raw.body.get(field) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(_) => Err(ClassifyError::Malformed {
            field,
            reason: "expected a string".to_string(),
        }),
        None => Err(ClassifyError::MissingField(field)),
    }
}
