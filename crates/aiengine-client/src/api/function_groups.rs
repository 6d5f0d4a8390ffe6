//! Function groups API.

use crate::client::EngineClient;
use crate::error::{Error, Result};
use crate::types::{
    CreateFunctionGroupRequest, Function, FunctionGroup, PermissionAction,
    ShareFunctionGroupRequest,
};

/// Function groups API client.
pub struct FunctionGroupsApi {
    client: EngineClient,
}

impl FunctionGroupsApi {
    pub(crate) fn new(client: EngineClient) -> Self {
        Self { client }
    }

    /// List every visible group: private groups first, then public ones.
    ///
    /// Both listings are requested concurrently.
    pub async fn list(&self) -> Result<Vec<FunctionGroup>> {
        let (mut private, public) = tokio::try_join!(self.list_private(), self.list_public())?;
        private.extend(public);
        Ok(private)
    }

    /// List groups owned by (or shared with) the caller.
    pub async fn list_private(&self) -> Result<Vec<FunctionGroup>> {
        self.client.get("function-groups/").await
    }

    /// List public groups.
    pub async fn list_public(&self) -> Result<Vec<FunctionGroup>> {
        self.client.get("function-groups/public/").await
    }

    /// Find a visible group by exact name.
    pub async fn find_by_name(&self, name: &str) -> Result<Option<FunctionGroup>> {
        Ok(self.list().await?.into_iter().find(|g| g.name == name))
    }

    /// Create a group.
    pub async fn create(&self, name: impl Into<String>, is_private: bool) -> Result<FunctionGroup> {
        let request = CreateFunctionGroupRequest {
            name: name.into(),
            is_private,
        };
        self.client.post("function-groups/", &request).await
    }

    /// Delete a group.
    pub async fn delete(&self, id: &str) -> Result<()> {
        self.client.delete(&format!("function-groups/{}/", id)).await
    }

    /// Grant another user read access to a group.
    ///
    /// At least one of `user_id` or `email` must be given.
    pub async fn share(
        &self,
        id: &str,
        user_id: Option<&str>,
        email: Option<&str>,
    ) -> Result<serde_json::Value> {
        if user_id.is_none() && email.is_none() {
            return Err(Error::MissingShareTarget);
        }
        let request = ShareFunctionGroupRequest {
            user_email_to_add_permission: email.map(str::to_string),
            user_id_to_add_permission: user_id.map(str::to_string),
            action: PermissionAction::Retrieve,
        };
        self.client
            .put(&format!("function-groups/{}/permissions/", id), &request)
            .await
    }

    /// Create a group and share it with a user in one step.
    pub async fn create_and_share(
        &self,
        name: impl Into<String>,
        is_private: bool,
        email: &str,
    ) -> Result<FunctionGroup> {
        let group = self.create(name, is_private).await?;
        self.share(&group.uuid, None, Some(email)).await?;
        Ok(group)
    }

    /// List the functions of a group.
    pub async fn functions(&self, id: &str) -> Result<Vec<Function>> {
        self.client
            .get(&format!("function-groups/{}/functions/", id))
            .await
    }
}
