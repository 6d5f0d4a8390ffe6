//! Chat sessions API.

use crate::client::EngineClient;
use crate::error::Result;
use crate::models::DEFAULT_MODEL_ID;
use crate::session::Session;
use crate::types::{CreateSessionRequest, CreateSessionResponse, SessionOptions};

/// Sessions API client.
pub struct SessionsApi {
    client: EngineClient,
}

impl SessionsApi {
    pub(crate) fn new(client: EngineClient) -> Self {
        Self { client }
    }

    /// Create a chat session bound to a function group.
    pub async fn create(&self, function_group: &str, options: SessionOptions) -> Result<Session> {
        let request = CreateSessionRequest {
            email: options.email.unwrap_or_default(),
            function_group: function_group.to_string(),
            preferences_enabled: false,
            request_model: options
                .model
                .unwrap_or_else(|| DEFAULT_MODEL_ID.to_string()),
        };
        let response: CreateSessionResponse =
            self.client.post("engine/chat/sessions", &request).await?;

        tracing::info!(
            session_id = %response.session_id,
            function_group,
            model = %request.request_model,
            "Created session"
        );
        Ok(Session::new(
            self.client.clone(),
            response.session_id,
            function_group,
        ))
    }
}
