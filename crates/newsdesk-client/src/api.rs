use async_trait::async_trait;
use log::{debug, info};
use newsdesk_engine::wire::{DocumentPayload, DocumentSummary, RemoteDocument};
use reqwest::{Method, RequestBuilder};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use crate::envelope::{ApiResponse, record_id};
use crate::save::DocumentStore;
use crate::upload::{EncodedImage, ImageUploader};
use crate::ApiError;

/// Thin client for the content API.
///
/// Every endpoint answers with `{ success, data?, error? }`. No timeouts or
/// retries are configured; one call is one request.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum UploadData {
    Record { url: String },
    Url(String),
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, token: Option<String>) -> Self {
        Self::with_http_client(reqwest::Client::new(), base_url, token)
    }

    pub fn with_http_client(
        http: reqwest::Client,
        base_url: impl Into<String>,
        token: Option<String>,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http,
            base_url,
            token: token.filter(|t| !t.is_empty()),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = self.url(path);
        debug!("{method} {url}");
        let request = self.http.request(method, url);
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<Option<T>, ApiError> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        let envelope: ApiResponse<T> =
            serde_json::from_str(&body).map_err(|err| ApiError::InvalidResponse {
                status: status.as_u16(),
                reason: err.to_string(),
            })?;
        let data = envelope.into_result()?;

        if !status.is_success() {
            return Err(ApiError::InvalidResponse {
                status: status.as_u16(),
                reason: "request failed".to_string(),
            });
        }
        Ok(data)
    }

    /// `GET /{resource}`
    pub async fn list_documents(&self, resource: &str) -> Result<Vec<DocumentSummary>, ApiError> {
        let rows: Option<Vec<DocumentSummary>> =
            self.send(self.request(Method::GET, resource)).await?;
        Ok(rows.unwrap_or_default())
    }

    /// `GET /{resource}/{id}`
    pub async fn fetch_document(&self, resource: &str, id: &str) -> Result<RemoteDocument, ApiError> {
        let path = format!("{resource}/{id}");
        self.send::<RemoteDocument>(self.request(Method::GET, &path))
            .await?
            .ok_or(ApiError::MissingData("document"))
    }

    /// `POST /{resource}`; returns the new document's id when the backend sends it
    pub async fn create_document(
        &self,
        resource: &str,
        payload: &DocumentPayload,
    ) -> Result<Option<String>, ApiError> {
        let created: Option<Value> = self
            .send(self.request(Method::POST, resource).json(payload))
            .await?;
        let id = created.as_ref().and_then(record_id);
        info!("created {resource} {}", id.as_deref().unwrap_or("(no id returned)"));
        Ok(id)
    }

    /// `PUT /{resource}/{id}`
    pub async fn update_document(
        &self,
        resource: &str,
        id: &str,
        payload: &DocumentPayload,
    ) -> Result<(), ApiError> {
        let path = format!("{resource}/{id}");
        self.send::<Value>(self.request(Method::PUT, &path).json(payload))
            .await?;
        Ok(())
    }

    /// `DELETE /{resource}/{id}`
    pub async fn delete_document(&self, resource: &str, id: &str) -> Result<(), ApiError> {
        let path = format!("{resource}/{id}");
        self.send::<Value>(self.request(Method::DELETE, &path)).await?;
        info!("deleted {resource} {id}");
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for ApiClient {
    async fn create(
        &self,
        resource: &str,
        payload: &DocumentPayload,
    ) -> Result<Option<String>, ApiError> {
        self.create_document(resource, payload).await
    }

    async fn update(
        &self,
        resource: &str,
        id: &str,
        payload: &DocumentPayload,
    ) -> Result<(), ApiError> {
        self.update_document(resource, id, payload).await
    }
}

#[async_trait]
impl ImageUploader for ApiClient {
    /// `POST /upload` with `{ file, folder }`
    async fn upload_image(&self, image: &EncodedImage, folder: &str) -> Result<String, ApiError> {
        let body = json!({ "file": image.data_uri(), "folder": folder });
        let data: Option<UploadData> = self
            .send(self.request(Method::POST, "upload").json(&body))
            .await?;

        match data {
            Some(UploadData::Record { url }) | Some(UploadData::Url(url)) => Ok(url),
            None => Err(ApiError::MissingData("upload URL")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joining() {
        let client = ApiClient::new("https://api.example.org/api/", None);
        assert_eq!(client.base_url(), "https://api.example.org/api");
        assert_eq!(client.url("news"), "https://api.example.org/api/news");
        assert_eq!(client.url("/pages/3"), "https://api.example.org/api/pages/3");
    }

    #[test]
    fn test_empty_token_is_dropped() {
        let client = ApiClient::new("http://localhost", Some(String::new()));
        assert!(client.token.is_none());
    }
}
