//! Endpoint accessors built on top of [`ApiClient`].
//!
//! Each service owns a client handle and wraps one endpoint family:
//! supporter search/upsert/delete and the account metrics endpoint.

use serde_json::{json, Value};

use crate::client::{ApiClient, Method};
use crate::errors::{ApiError, ResultExt};
use crate::models::{Model, Supporter};
use crate::response::ResponseEnvelope;

const SUPPORTERS_ENDPOINT: &str = "api/integration/ext/v1/supporters";
const SUPPORTERS_SEARCH_ENDPOINT: &str = "api/integration/ext/v1/supporters/search";
const METRICS_ENDPOINT: &str = "api/integration/ext/v1/metrics";

/// Identifier types accepted by the supporter search endpoint.
const EMAIL_ADDRESS: &str = "EMAIL_ADDRESS";
const SUPPORTER_ID: &str = "SUPPORTER_ID";
const EXTERNAL_ID: &str = "EXTERNAL_ID";

pub struct SupporterService {
    client: ApiClient,
}

impl SupporterService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Searches supporters by email addresses.
    pub async fn search_by_emails(&self, emails: &[String]) -> Result<ResponseEnvelope, ApiError> {
        self.search(emails, EMAIL_ADDRESS).await
    }

    /// Searches supporters by a single email address.
    pub async fn search_by_email(&self, email: &str) -> Result<ResponseEnvelope, ApiError> {
        self.search_by_emails(&[email.to_string()]).await
    }

    /// Searches supporters by supporter IDs.
    pub async fn search_by_ids(&self, ids: &[String]) -> Result<ResponseEnvelope, ApiError> {
        self.search(ids, SUPPORTER_ID).await
    }

    /// Searches supporters by a single supporter ID.
    pub async fn search_by_id(&self, id: &str) -> Result<ResponseEnvelope, ApiError> {
        self.search_by_ids(&[id.to_string()]).await
    }

    /// Searches supporters by external system IDs.
    pub async fn search_by_external_ids(
        &self,
        ids: &[String],
    ) -> Result<ResponseEnvelope, ApiError> {
        self.search(ids, EXTERNAL_ID).await
    }

    /// Searches supporters by a single external system ID.
    pub async fn search_by_external_id(&self, id: &str) -> Result<ResponseEnvelope, ApiError> {
        self.search_by_external_ids(&[id.to_string()]).await
    }

    /// Adds or updates multiple supporters in one call.
    pub async fn upsert_batch(
        &self,
        supporters: &[Supporter],
    ) -> Result<ResponseEnvelope, ApiError> {
        let batch = supporters
            .iter()
            .map(|supporter| supporter.to_serializable().map(Value::Object))
            .collect::<Result<Vec<_>, _>>()
            .context("serializing supporter batch")?;
        tracing::info!("Upserting {} supporter(s)", batch.len());

        let body = json!({"payload": {"supporters": batch}});
        let text = self
            .client
            .send(SUPPORTERS_ENDPOINT, Method::JsonPut, Some(&body))
            .await?;
        ResponseEnvelope::parse(&text).context("parsing supporter upsert response")
    }

    /// Adds or updates a single supporter.
    pub async fn upsert(&self, supporter: &Supporter) -> Result<ResponseEnvelope, ApiError> {
        self.upsert_batch(std::slice::from_ref(supporter)).await
    }

    /// Deletes multiple supporters. Supporters without a `supporterId` are
    /// silently skipped; only the ID travels on the wire.
    pub async fn delete_batch(
        &self,
        supporters: &[Supporter],
    ) -> Result<ResponseEnvelope, ApiError> {
        let batch: Vec<Value> = supporters
            .iter()
            .filter_map(Supporter::supporter_id)
            .map(|id| json!({"supporterId": id}))
            .collect();
        tracing::info!("Deleting {} supporter(s)", batch.len());

        let body = json!({"payload": {"supporters": batch}});
        let text = self
            .client
            .send(SUPPORTERS_ENDPOINT, Method::JsonDelete, Some(&body))
            .await?;
        ResponseEnvelope::parse(&text).context("parsing supporter delete response")
    }

    /// Deletes a single supporter.
    pub async fn delete(&self, supporter: &Supporter) -> Result<ResponseEnvelope, ApiError> {
        self.delete_batch(std::slice::from_ref(supporter)).await
    }

    async fn search(
        &self,
        identifiers: &[String],
        identifier_type: &str,
    ) -> Result<ResponseEnvelope, ApiError> {
        tracing::info!(
            "Searching supporters by {} ({} identifier(s))",
            identifier_type,
            identifiers.len()
        );
        let body = json!({
            "payload": {
                "identifiers": identifiers,
                "identifierType": identifier_type,
            }
        });
        let text = self
            .client
            .send(SUPPORTERS_SEARCH_ENDPOINT, Method::JsonPost, Some(&body))
            .await?;
        ResponseEnvelope::parse(&text).context("parsing supporter search response")
    }
}

pub struct MetricsService {
    client: ApiClient,
}

impl MetricsService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Fetches API call metrics for the configured account.
    pub async fn get(&self) -> Result<ResponseEnvelope, ApiError> {
        let text = self.client.send(METRICS_ENDPOINT, Method::Get, None).await?;
        ResponseEnvelope::parse(&text).context("parsing metrics response")
    }
}
