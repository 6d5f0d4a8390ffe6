//! Credits and models API.

use futures::future::try_join_all;

use crate::client::EngineClient;
use crate::error::{Error, Result};
use crate::models::{DEFAULT_MODEL_IDS, ModelRef, model_name};
use crate::types::{CreditBalance, CreditInfoResponse, Model, RemainingTokensResponse};

/// Query for remaining tokens of one model.
#[derive(Debug, serde::Serialize)]
struct RemainingTokensQuery<'a> {
    models: &'a str,
}

/// Credits API client.
pub struct CreditsApi {
    client: EngineClient,
}

impl CreditsApi {
    pub(crate) fn new(client: EngineClient) -> Self {
        Self { client }
    }

    /// Get the account credit balance.
    pub async fn balance(&self) -> Result<CreditBalance> {
        let raw: CreditInfoResponse = self.client.get("engine/credit/info").await?;
        Ok(raw.into())
    }

    /// Remaining credits for one model (0 when the service reports none).
    pub async fn model_credits<M>(&self, model: &M) -> Result<i64>
    where
        M: ModelRef + ?Sized,
    {
        let model_id = model.model_id();
        let response: RemainingTokensResponse = self
            .client
            .get_with_query(
                "engine/credit/remaining_tokens",
                &RemainingTokensQuery { models: model_id },
            )
            .await?;
        Ok(response.model_tokens.get(model_id).copied().unwrap_or(0))
    }

    /// Catalogue models with their remaining credits, fetched concurrently.
    pub async fn models(&self) -> Result<Vec<Model>> {
        let requested: Vec<&str> = DEFAULT_MODEL_IDS.to_vec();
        let credits = try_join_all(requested.iter().map(|id| self.model_credits(*id))).await?;
        pair_credits(&requested, credits)
    }
}

/// Pair requested model ids with their fetched credits, in request order.
fn pair_credits(requested: &[&str], credits: Vec<i64>) -> Result<Vec<Model>> {
    if credits.len() != requested.len() {
        return Err(Error::CreditMismatch {
            expected: requested.len(),
            actual: credits.len(),
        });
    }

    Ok(requested
        .iter()
        .zip(credits)
        .map(|(id, credits)| Model {
            id: id.to_string(),
            name: model_name(id).to_string(),
            credits,
        })
        .collect())
}
