//! HTTP client for snapshot fetches and mutation calls
//!
//! Every request carries the bearer token (when configured) and an
//! `x-client-version` compatibility header. Mutation calls are
//! fire-and-request: their local effect arrives back through the event
//! channel, never by touching the store directly.

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;

use crate::{ClientConfig, ClientError, ClientResult};
use shared::models::{Order, OrderCreate, OrderStatus, OrderUpdateStatus};
use shared::response::ApiResponse;

/// Compatibility header sent with every request
const CLIENT_VERSION_HEADER: &str = "x-client-version";

/// HTTP client for the order server API
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl HttpClient {
    /// Create a new HTTP client from configuration
    pub fn new(config: &ClientConfig) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url: config.base_url.clone(),
            token: config.token.clone(),
        }
    }

    /// Set the authentication token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Get the current token
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    fn decorate(&self, mut request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request = request.header(CLIENT_VERSION_HEADER, env!("CARGO_PKG_VERSION"));
        if let Some(token) = &self.token {
            request = request.header(reqwest::header::AUTHORIZATION, format!("Bearer {}", token));
        }
        request
    }

    /// Make a GET request
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let request = self.decorate(self.client.get(self.url(path)));
        let response = request.send().await?;
        Self::handle_response(response).await
    }

    /// Make a POST request with JSON body
    pub async fn post<T: DeserializeOwned, B: serde::Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let request = self.decorate(self.client.post(self.url(path)).json(body));
        let response = request.send().await?;
        Self::handle_response(response).await
    }

    /// Make a PATCH request with JSON body
    pub async fn patch<T: DeserializeOwned, B: serde::Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let request = self.decorate(self.client.patch(self.url(path)).json(body));
        let response = request.send().await?;
        Self::handle_response(response).await
    }

    /// Make a DELETE request
    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let request = self.decorate(self.client.delete(self.url(path)));
        let response = request.send().await?;
        Self::handle_response(response).await
    }

    /// Handle the HTTP response
    async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> ClientResult<T> {
        let status = response.status();

        if !status.is_success() {
            let text = response.text().await?;
            return match status {
                StatusCode::UNAUTHORIZED => Err(ClientError::Unauthorized),
                StatusCode::FORBIDDEN => Err(ClientError::Forbidden(text)),
                StatusCode::NOT_FOUND => Err(ClientError::NotFound(text)),
                StatusCode::BAD_REQUEST => Err(ClientError::Validation(text)),
                _ => Err(ClientError::Internal(text)),
            };
        }

        response.json().await.map_err(Into::into)
    }

    /// Unwrap an envelope that must carry data
    fn unwrap_data<T>(resp: ApiResponse<T>) -> ClientResult<T> {
        if !resp.is_success() {
            return Err(ClientError::Api {
                code: resp.code,
                message: resp.message,
            });
        }
        resp.data
            .ok_or_else(|| ClientError::InvalidResponse("Missing data".to_string()))
    }

    /// Unwrap an envelope whose data does not matter
    fn expect_success(resp: ApiResponse<serde_json::Value>) -> ClientResult<()> {
        if !resp.is_success() {
            return Err(ClientError::Api {
                code: resp.code,
                message: resp.message,
            });
        }
        Ok(())
    }

    // ========== Snapshot API ==========

    /// Fetch the full counter-order collection (snapshot read)
    pub async fn fetch_orders(&self) -> ClientResult<Vec<Order>> {
        Self::unwrap_data(self.get::<ApiResponse<Vec<Order>>>("/api/orders").await?)
    }

    /// Fetch the full table-order collection (snapshot read)
    pub async fn fetch_table_orders(&self) -> ClientResult<Vec<Order>> {
        Self::unwrap_data(
            self.get::<ApiResponse<Vec<Order>>>("/api/table-orders")
                .await?,
        )
    }

    // ========== Order mutations ==========

    /// Create an order; the server assigns the id
    pub async fn create_order(&self, payload: &OrderCreate) -> ClientResult<Order> {
        Self::unwrap_data(
            self.post::<ApiResponse<Order>, _>("/api/orders", payload)
                .await?,
        )
    }

    /// Update a counter order's status
    pub async fn update_order_status(&self, id: i64, status: OrderStatus) -> ClientResult<Order> {
        let body = OrderUpdateStatus { status };
        Self::unwrap_data(
            self.patch::<ApiResponse<Order>, _>(&format!("/api/orders/{}/status", id), &body)
                .await?,
        )
    }

    /// Delete a counter order
    pub async fn delete_order(&self, id: i64) -> ClientResult<()> {
        Self::expect_success(
            self.delete::<ApiResponse<serde_json::Value>>(&format!("/api/orders/{}", id))
                .await?,
        )
    }

    /// Update a table order's status
    pub async fn update_table_order_status(
        &self,
        id: i64,
        status: OrderStatus,
    ) -> ClientResult<Order> {
        let body = OrderUpdateStatus { status };
        Self::unwrap_data(
            self.patch::<ApiResponse<Order>, _>(&format!("/api/table-orders/{}/status", id), &body)
                .await?,
        )
    }

    /// Delete a table order
    pub async fn delete_table_order(&self, id: i64) -> ClientResult<()> {
        Self::expect_success(
            self.delete::<ApiResponse<serde_json::Value>>(&format!("/api/table-orders/{}", id))
                .await?,
        )
    }
}
