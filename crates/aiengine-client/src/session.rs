//! Chat session protocol.
//!
//! A [`Session`] polls the service's append-only message log, drops
//! re-delivered messages, classifies the rest and submits typed replies.
//!
//! ```text
//! Created ──start/execute_functions──▶ Started ──poll sees Stop──▶ Ended
//!    └──────────────┴────────────── delete ──────────────┴──▶ Deleted
//! ```
//!
//! Polling mutates the session, so [`Session::poll`] takes `&mut self`; one
//! session cannot be polled concurrently with itself.

use std::collections::HashSet;
use std::time::Duration;

use uuid::Uuid;

use crate::client::EngineClient;
use crate::error::{Error, Result};
use crate::messages::{
    Confirmation, FreeTextPrompt, Message, RawMessage, TaskSelection, classify,
};
use crate::types::{
    NewMessagesQuery, NewMessagesResponse, SubmitPayload, SubmitRequest, UserSelection,
};

/// Reply used to accept a [`Confirmation`].
pub const CONFIRM_TOKEN: &str = "confirm";

/// Default delay between polls.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(1500);

/// Default number of consecutive empty polls before giving up.
pub const DEFAULT_MAX_EMPTY_POLLS: u32 = 12;

/// Lifecycle state of a session, as observed by this client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    /// Created on the server; nothing submitted yet.
    Created,
    /// An objective or function execution was submitted.
    Started,
    /// A Stop message was received.
    Ended,
    /// Deleted on the server; no further operations are valid.
    Deleted,
}

/// Caller-side pacing for [`Session::next_messages`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    /// Delay between two polls.
    pub interval: Duration,
    /// Consecutive empty polls after which waiting stops.
    pub max_empty_polls: u32,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            max_empty_polls: DEFAULT_MAX_EMPTY_POLLS,
        }
    }
}

/// One conversation with the engine, bound to a function group.
///
/// Created by [`SessionsApi::create`](crate::api::SessionsApi::create). The
/// server-side session is only removed by [`Session::delete`].
pub struct Session {
    client: EngineClient,
    session_id: String,
    function_group: String,
    status: SessionStatus,
    /// Every raw message received, in receipt order. Drives the poll cursor.
    history: Vec<RawMessage>,
    seen: HashSet<String>,
}

impl Session {
    pub(crate) fn new(
        client: EngineClient,
        session_id: impl Into<String>,
        function_group: impl Into<String>,
    ) -> Self {
        Self {
            client,
            session_id: session_id.into(),
            function_group: function_group.into(),
            status: SessionStatus::Created,
            history: Vec::new(),
            seen: HashSet::new(),
        }
    }

    /// Server-assigned session id.
    pub fn id(&self) -> &str {
        &self.session_id
    }

    /// Function group the session was created with.
    pub fn function_group(&self) -> &str {
        &self.function_group
    }

    /// Current lifecycle state.
    pub fn status(&self) -> SessionStatus {
        self.status
    }

    /// Whether a Stop message has been received.
    pub fn is_ended(&self) -> bool {
        self.status == SessionStatus::Ended
    }

    /// All raw messages received so far, including unclassifiable ones.
    pub fn history(&self) -> &[RawMessage] {
        &self.history
    }

    /// Number of distinct message ids received.
    pub fn seen_count(&self) -> usize {
        self.seen.len()
    }

    /// Poll cursor: id of the most recently stored message.
    pub fn last_message_id(&self) -> Option<&str> {
        self.history.last().map(|m| m.message_id.as_str())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Kick-off
    // ─────────────────────────────────────────────────────────────────────────

    /// Start the conversation with an objective.
    pub async fn start(&mut self, objective: &str, context: Option<&str>) -> Result<String> {
        self.ensure_not_deleted()?;
        let payload = SubmitPayload::Start {
            session_id: self.session_id.clone(),
            message_id: new_message_id(),
            objective: objective.to_string(),
            context: context.unwrap_or_default().to_string(),
            bucket_id: self.function_group.clone(),
        };
        let message_id = self.submit(payload).await?;
        self.mark_started();
        Ok(message_id)
    }

    /// Ask the engine to run specific functions instead of planning from an objective.
    pub async fn execute_functions<I, S>(
        &mut self,
        function_ids: I,
        objective: &str,
        context: Option<&str>,
    ) -> Result<String>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ensure_not_deleted()?;
        let payload = SubmitPayload::ExecuteFunctions {
            session_id: self.session_id.clone(),
            message_id: new_message_id(),
            functions: function_ids.into_iter().map(Into::into).collect(),
            objective: objective.to_string(),
            context: context.unwrap_or_default().to_string(),
        };
        let message_id = self.submit(payload).await?;
        self.mark_started();
        Ok(message_id)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Polling
    // ─────────────────────────────────────────────────────────────────────────

    /// Fetch messages newer than the cursor.
    ///
    /// Returns newly received, classifiable messages in receipt order.
    /// Re-delivered ids are dropped. Unclassifiable messages are logged and
    /// recorded in the history but not returned.
    pub async fn poll(&mut self) -> Result<Vec<Message>> {
        self.ensure_not_deleted()?;

        let path = format!("engine/chat/sessions/{}/new-messages", self.session_id);
        let query = NewMessagesQuery {
            last_message_id: self.last_message_id(),
        };
        let response: NewMessagesResponse = self.client.get_with_query(&path, &query).await?;

        let mut fresh = Vec::new();
        for item in response.agent_response {
            let raw = match RawMessage::decode(&item) {
                Ok(raw) => raw,
                Err(e) => {
                    tracing::warn!(
                        session_id = %self.session_id,
                        error = %e,
                        "Skipping undecodable message"
                    );
                    continue;
                }
            };

            if !self.seen.insert(raw.message_id.clone()) {
                tracing::debug!(
                    session_id = %self.session_id,
                    message_id = %raw.message_id,
                    "Dropping re-delivered message"
                );
                continue;
            }

            tracing::debug!(
                session_id = %self.session_id,
                message_id = %raw.message_id,
                message_type = %raw.message_type,
                "Message received"
            );

            match classify(&raw) {
                Ok(message) => {
                    if message.is_stop() {
                        self.status = SessionStatus::Ended;
                    }
                    fresh.push(message);
                }
                Err(e) => {
                    tracing::warn!(
                        session_id = %self.session_id,
                        message_id = %raw.message_id,
                        error = %e,
                        "Unclassifiable message"
                    );
                }
            }
            self.history.push(raw);
        }

        Ok(fresh)
    }

    /// Poll until a non-empty batch arrives or the policy's empty-poll limit is hit.
    ///
    /// An empty result means the limit was reached. Errors are returned as soon
    /// as they occur.
    pub async fn next_messages(&mut self, policy: &PollPolicy) -> Result<Vec<Message>> {
        let mut empty_polls = 0;
        loop {
            let batch = self.poll().await?;
            if !batch.is_empty() {
                return Ok(batch);
            }

            empty_polls += 1;
            if empty_polls >= policy.max_empty_polls {
                tracing::debug!(
                    session_id = %self.session_id,
                    empty_polls,
                    "Giving up after consecutive empty polls"
                );
                return Ok(batch);
            }
            tokio::time::sleep(policy.interval).await;
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Replies
    // ─────────────────────────────────────────────────────────────────────────

    /// Answer a task selection with one or more offered option keys.
    pub async fn submit_task_selection<I>(
        &self,
        selection: &TaskSelection,
        chosen: I,
    ) -> Result<String>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        self.ensure_not_deleted()?;
        self.ensure_received(&selection.id)?;

        let mut keys = Vec::new();
        for key in chosen {
            let key = key.as_ref();
            if selection.option(key).is_none() {
                return Err(Error::InvalidSelection {
                    message_id: selection.id.clone(),
                    key: key.to_string(),
                });
            }
            keys.push(key.to_string());
        }
        if keys.is_empty() {
            return Err(Error::EmptySelection(selection.id.clone()));
        }

        let payload = SubmitPayload::UserJson {
            session_id: self.session_id.clone(),
            message_id: new_message_id(),
            referral_id: selection.id.clone(),
            user_json: UserSelection {
                kind: selection.selection_kind.as_str().to_string(),
                selection: keys,
            },
        };
        self.submit(payload).await
    }

    /// Answer an agent question or data request with free text.
    pub async fn submit_response<P>(&self, prompt: &P, text: impl Into<String>) -> Result<String>
    where
        P: FreeTextPrompt + ?Sized,
    {
        self.reply_text(prompt.message_id(), text.into()).await
    }

    /// Accept a pending confirmation.
    pub async fn submit_confirmation(&self, confirmation: &Confirmation) -> Result<String> {
        self.reply_text(&confirmation.id, CONFIRM_TOKEN.to_string())
            .await
    }

    /// Reject a pending confirmation, explaining why.
    pub async fn reject_confirmation(
        &self,
        confirmation: &Confirmation,
        reason: impl Into<String>,
    ) -> Result<String> {
        self.reply_text(&confirmation.id, reason.into()).await
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Teardown
    // ─────────────────────────────────────────────────────────────────────────

    /// Delete the session on the server. Every later call fails with [`Error::SessionDeleted`].
    pub async fn delete(&mut self) -> Result<()> {
        self.ensure_not_deleted()?;
        self.client
            .delete(&format!("engine/chat/sessions/{}", self.session_id))
            .await?;
        self.status = SessionStatus::Deleted;
        tracing::info!(session_id = %self.session_id, "Deleted session");
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Internals
    // ─────────────────────────────────────────────────────────────────────────

    async fn reply_text(&self, referral_id: &str, text: String) -> Result<String> {
        self.ensure_not_deleted()?;
        self.ensure_received(referral_id)?;
        let payload = SubmitPayload::UserMessage {
            session_id: self.session_id.clone(),
            message_id: new_message_id(),
            referral_id: referral_id.to_string(),
            user_message: text,
        };
        self.submit(payload).await
    }

    async fn submit(&self, payload: SubmitPayload) -> Result<String> {
        let message_id = payload.message_id().to_string();
        tracing::debug!(
            session_id = %self.session_id,
            message_id = %message_id,
            "Submitting message"
        );
        self.client
            .post_no_content(
                &format!("engine/chat/sessions/{}/submit", self.session_id),
                &SubmitRequest { payload },
            )
            .await?;
        Ok(message_id)
    }

    fn mark_started(&mut self) {
        if self.status == SessionStatus::Created {
            self.status = SessionStatus::Started;
        }
    }

    fn ensure_not_deleted(&self) -> Result<()> {
        if self.status == SessionStatus::Deleted {
            return Err(Error::SessionDeleted(self.session_id.clone()));
        }
        Ok(())
    }

    fn ensure_received(&self, message_id: &str) -> Result<()> {
        if self.seen.contains(message_id) {
            Ok(())
        } else {
            Err(Error::UnknownMessage {
                session_id: self.session_id.clone(),
                message_id: message_id.to_string(),
            })
        }
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("session_id", &self.session_id)
            .field("function_group", &self.function_group)
            .field("status", &self.status)
            .field("history_len", &self.history.len())
            .finish()
    }
}

fn new_message_id() -> String {
    Uuid::new_v4().to_string()
}
