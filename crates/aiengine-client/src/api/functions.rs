//! Functions API.

use std::collections::BTreeMap;

use crate::client::EngineClient;
use crate::error::Result;
use crate::types::{CreateFunctionRequest, Function, FunctionGroup};

/// Free-form query parameters for listing functions.
#[derive(Debug, Default, Clone, serde::Serialize)]
#[serde(transparent)]
pub struct ListFunctionsQuery {
    params: BTreeMap<String, String>,
}

impl ListFunctionsQuery {
    /// Create an empty query.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a parameter.
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Whether no parameters were added.
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}

/// Functions API client.
pub struct FunctionsApi {
    client: EngineClient,
}

impl FunctionsApi {
    pub(crate) fn new(client: EngineClient) -> Self {
        Self { client }
    }

    /// List the caller's functions.
    pub async fn list(&self) -> Result<Vec<Function>> {
        self.client.get("functions/").await
    }

    /// List functions with query parameters.
    pub async fn list_with_query(&self, query: &ListFunctionsQuery) -> Result<Vec<Function>> {
        self.client.get_with_query("functions/", query).await
    }

    /// Register a function.
    pub async fn create(&self, request: &CreateFunctionRequest) -> Result<Function> {
        self.client.post("functions/", request).await
    }

    /// List the groups a function belongs to.
    pub async fn groups(&self, function_id: &str) -> Result<Vec<FunctionGroup>> {
        self.client
            .get(&format!("function/{}/groups", function_id))
            .await
    }
}
