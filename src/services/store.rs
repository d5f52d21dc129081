use crate::models::{Scheme, User};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when talking to the document store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),

    #[error("Unauthorized: invalid API key")]
    Unauthorized,

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

/// Collection names in the document database
#[derive(Debug, Clone)]
pub struct StoreCollections {
    pub users: String,
    pub students: String,
    pub teachers: String,
    pub institutions: String,
    pub schemes: String,
}

/// Document database client (MongoDB Atlas Data API)
///
/// Every operation is a POST to an action endpoint (findOne, find,
/// insertOne, updateOne, deleteOne, aggregate) carrying the data source,
/// database and collection alongside the filter. Dates travel as RFC 3339
/// strings, which order lexicographically, so range filters on
/// applicationEndDate work server side.
pub struct StoreClient {
    base_url: String,
    api_key: String,
    data_source: String,
    database: String,
    client: Client,
    pub collections: StoreCollections,
}

impl StoreClient {
    pub fn new(
        base_url: String,
        api_key: String,
        data_source: String,
        database: String,
        collections: StoreCollections,
    ) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url,
            api_key,
            data_source,
            database,
            client,
            collections,
        }
    }

    /// POST one Data API action and return the response body
    async fn action(&self, action: &str, collection: &str, mut payload: Value) -> Result<Value, StoreError> {
        let url = format!("{}/action/{}", self.base_url.trim_end_matches('/'), action);

        if let Some(body) = payload.as_object_mut() {
            body.insert("dataSource".to_string(), json!(self.data_source));
            body.insert("database".to_string(), json!(self.database));
            body.insert("collection".to_string(), json!(collection));
        }

        let response = self
            .client
            .post(&url)
            .header("api-key", &self.api_key)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(StoreError::Unauthorized);
        }
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read body".to_string());
            return Err(StoreError::ApiError(format!("{}: {}", status, body)));
        }

        Ok(response.json().await?)
    }

    /// Fetch a single document matching the filter
    pub async fn find_one<T: DeserializeOwned>(
        &self,
        collection: &str,
        filter: Value,
    ) -> Result<Option<T>, StoreError> {
        let result = self
            .action("findOne", collection, json!({ "filter": filter }))
            .await?;

        match result.get("document") {
            None | Some(Value::Null) => Ok(None),
            Some(doc) => serde_json::from_value(doc.clone())
                .map(Some)
                .map_err(|e| StoreError::InvalidResponse(format!("Failed to parse document: {}", e))),
        }
    }

    /// Fetch documents matching the filter, optionally sorted
    pub async fn find<T: DeserializeOwned>(
        &self,
        collection: &str,
        filter: Value,
        sort: Option<Value>,
        limit: i64,
    ) -> Result<Vec<T>, StoreError> {
        let mut payload = json!({ "filter": filter, "limit": limit });
        if let Some(sort) = sort {
            payload["sort"] = sort;
        }

        let result = self.action("find", collection, payload).await?;

        let documents = result
            .get("documents")
            .and_then(|d| d.as_array())
            .ok_or_else(|| StoreError::InvalidResponse("Missing documents array".into()))?;

        // Documents that fail to parse are dropped rather than failing
        // the whole listing
        let parsed: Vec<T> = documents
            .iter()
            .filter_map(|doc| serde_json::from_value(doc.clone()).ok())
            .collect();

        if parsed.len() < documents.len() {
            tracing::warn!(
                "Dropped {} unparseable documents from {}",
                documents.len() - parsed.len(),
                collection
            );
        }

        Ok(parsed)
    }

    /// Insert a document and return its id
    pub async fn insert_one<T: Serialize>(
        &self,
        collection: &str,
        document: &T,
    ) -> Result<String, StoreError> {
        let document = serde_json::to_value(document)
            .map_err(|e| StoreError::InvalidResponse(format!("Unserializable document: {}", e)))?;

        let result = self
            .action("insertOne", collection, json!({ "document": document }))
            .await?;

        result
            .get("insertedId")
            .and_then(|id| id.as_str())
            .map(str::to_owned)
            .ok_or_else(|| StoreError::InvalidResponse("Missing insertedId".into()))
    }

    /// Apply a $set update to the document with the given id.
    /// Returns false when no document matched.
    pub async fn update_one(
        &self,
        collection: &str,
        id: &str,
        mut fields: Value,
    ) -> Result<bool, StoreError> {
        // The id is immutable; never let a client payload overwrite it
        if let Some(obj) = fields.as_object_mut() {
            obj.remove("_id");
            obj.insert("updatedAt".to_string(), json!(chrono::Utc::now()));
        }

        let payload = json!({
            "filter": { "_id": id },
            "update": { "$set": fields }
        });

        let result = self.action("updateOne", collection, payload).await?;

        let matched = result
            .get("matchedCount")
            .and_then(|c| c.as_u64())
            .ok_or_else(|| StoreError::InvalidResponse("Missing matchedCount".into()))?;

        Ok(matched > 0)
    }

    /// Remove the document with the given id. Returns false when absent.
    pub async fn delete_one(&self, collection: &str, id: &str) -> Result<bool, StoreError> {
        let result = self
            .action("deleteOne", collection, json!({ "filter": { "_id": id } }))
            .await?;

        let deleted = result
            .get("deletedCount")
            .and_then(|c| c.as_u64())
            .ok_or_else(|| StoreError::InvalidResponse("Missing deletedCount".into()))?;

        Ok(deleted > 0)
    }

    /// Run an aggregation pipeline
    pub async fn aggregate(&self, collection: &str, pipeline: Value) -> Result<Vec<Value>, StoreError> {
        let result = self
            .action("aggregate", collection, json!({ "pipeline": pipeline }))
            .await?;

        result
            .get("documents")
            .and_then(|d| d.as_array())
            .cloned()
            .ok_or_else(|| StoreError::InvalidResponse("Missing documents array".into()))
    }

    /// Count documents matching the filter
    pub async fn count(&self, collection: &str, filter: Value) -> Result<u64, StoreError> {
        let pipeline = json!([
            { "$match": filter },
            { "$count": "count" }
        ]);

        let documents = self.aggregate(collection, pipeline).await?;

        // An empty pipeline result means zero matches
        Ok(documents
            .first()
            .and_then(|d| d.get("count"))
            .and_then(|c| c.as_u64())
            .unwrap_or(0))
    }

    /// Fetch a user account by id
    pub async fn get_user(&self, id: &str) -> Result<Option<User>, StoreError> {
        self.find_one(&self.collections.users, json!({ "_id": id }))
            .await
    }

    /// Fetch a user account by email, password hash included
    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        self.find_one(
            &self.collections.users,
            json!({ "email": email.to_lowercase() }),
        )
        .await
    }

    /// Active schemes whose application window is still open,
    /// soonest deadline first
    pub async fn active_schemes(
        &self,
        now: chrono::DateTime<chrono::Utc>,
    ) -> Result<Vec<Scheme>, StoreError> {
        self.find(
            &self.collections.schemes,
            json!({
                "isActive": true,
                "applicationEndDate": { "$gte": now }
            }),
            Some(json!({ "applicationEndDate": 1 })),
            500,
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collections() -> StoreCollections {
        StoreCollections {
            users: "users".to_string(),
            students: "students".to_string(),
            teachers: "teachers".to_string(),
            institutions: "institutions".to_string(),
            schemes: "schemes".to_string(),
        }
    }

    #[test]
    fn test_store_client_creation() {
        let client = StoreClient::new(
            "https://data.mongodb-api.example/app/sis/endpoint/data/v1".to_string(),
            "test_key".to_string(),
            "Cluster0".to_string(),
            "sis".to_string(),
            collections(),
        );

        assert_eq!(client.database, "sis");
        assert_eq!(client.collections.schemes, "schemes");
    }
}
