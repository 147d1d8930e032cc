//! NexaPro REST client
//!
//! Every request carries the stored access token as a bearer header. A 401
//! on a request that has not been replayed yet triggers exactly one refresh
//! through `/auth/token/refresh/`; on success the request is replayed with
//! the new token, otherwise the session is expired: both tokens are cleared,
//! the user is told, and the login screen is opened once the notice has been
//! shown.

use super::request::{ApiRequest, RequestBody};
use crate::config::Config;
use crate::error::{AppError, Result};
use crate::router::{RouteName, RouteTarget};
use crate::session::TokenStore;
use crate::telemetry::metrics::{HTTP_REQUESTS_TOTAL, SESSION_EXPIRED_TOTAL, TOKEN_REFRESH_TOTAL};
use crate::ui::{Notice, Ui};
use metrics::counter;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

pub const SESSION_EXPIRED_MESSAGE: &str = "Your session has expired. Please log in again.";

pub(crate) const REFRESH_PATH: &str = "/auth/token/refresh/";

pub(crate) const NO_REFRESH_TOKEN: &str = "No refresh token available";

/// Successful backend response
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: StatusCode,
    /// Parsed JSON body; `Null` for empty bodies, a string for non-JSON text
    pub body: Value,
    pub content_type: Option<String>,
    /// Raw body bytes, for binary downloads such as generated contracts
    pub raw: Vec<u8>,
}

impl ApiResponse {
    pub fn json<T: DeserializeOwned>(self) -> Result<T> {
        Ok(serde_json::from_value(self.body)?)
    }

    async fn read(response: reqwest::Response) -> Result<Self> {
        let status = response.status();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        let raw = response.bytes().await?.to_vec();
        let body = if raw.is_empty() {
            Value::Null
        } else {
            match serde_json::from_slice(&raw) {
                Ok(value) => value,
                Err(_) => Value::String(String::from_utf8_lossy(&raw).into_owned()),
            }
        };

        Ok(Self {
            status,
            body,
            content_type,
            raw,
        })
    }
}

/// Configured request pipeline shared by every resource client
#[derive(Clone)]
pub struct ApiClient {
    config: Arc<Config>,
    http_client: Client,
    tokens: TokenStore,
    ui: Ui,
}

impl ApiClient {
    pub fn new(config: Arc<Config>, tokens: TokenStore, ui: Ui) -> Result<Self> {
        let http_client = Client::builder().timeout(config.request_timeout).build()?;

        Ok(Self {
            config,
            http_client,
            tokens,
            ui,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn tokens(&self) -> &TokenStore {
        &self.tokens
    }

    pub fn ui(&self) -> &Ui {
        &self.ui
    }

    /// Send a request through the refresh-retry pipeline.
    pub async fn send(&self, mut request: ApiRequest) -> Result<ApiResponse> {
        loop {
            let response = self.dispatch(&request).await?;
            let status = response.status();
            counter!(
                HTTP_REQUESTS_TOTAL,
                "method" => request.method.to_string(),
                "status" => status.as_u16().to_string()
            )
            .increment(1);

            if status == StatusCode::UNAUTHORIZED && !request.is_retried() {
                tracing::debug!(path = %request.path, "Access token rejected, refreshing");
                match self.refresh_access_token().await {
                    Ok(access_token) => {
                        request.mark_retried(access_token);
                        continue;
                    }
                    Err(e) => {
                        tracing::warn!(path = %request.path, error = %e, "Token refresh failed");
                        self.expire_session().await;
                        return Err(AppError::SessionExpired);
                    }
                }
            }

            let response = ApiResponse::read(response).await?;
            if status.is_success() {
                return Ok(response);
            }
            tracing::debug!(path = %request.path, status = %status, "Request failed");
            return Err(AppError::from_response(status, response.body));
        }
    }

    /// Send a request and decode the JSON body.
    pub async fn send_json<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T> {
        self.send(request).await?.json()
    }

    async fn dispatch(&self, request: &ApiRequest) -> Result<reqwest::Response> {
        let url = self.config.endpoint(&request.path);
        let mut builder = self.http_client.request(request.method.clone(), &url);

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }

        let token = match &request.bearer_override {
            Some(token) => Some(token.clone()),
            None => self.tokens.access_token().await?,
        };
        if let Some(token) = token {
            builder = builder.bearer_auth(token);
        }

        builder = match &request.body {
            Some(RequestBody::Json(body)) => builder.json(body),
            Some(RequestBody::Multipart(form)) => builder.multipart(form.to_form()?),
            None => builder,
        };

        Ok(builder.send().await?)
    }

    /// Exchange the stored refresh token for a new access token and persist it.
    ///
    /// Sent directly, outside the retry pipeline. Concurrent callers each
    /// refresh independently; the last access token written wins.
    pub async fn refresh_access_token(&self) -> Result<String> {
        let Some(refresh_token) = self.tokens.refresh_token().await? else {
            counter!(TOKEN_REFRESH_TOTAL, "result" => "missing").increment(1);
            return Err(AppError::Unauthorized(NO_REFRESH_TOKEN.into()));
        };

        let response = self
            .http_client
            .post(self.config.endpoint(REFRESH_PATH))
            .json(&json!({ "refresh": refresh_token }))
            .send()
            .await
            .inspect_err(|_| {
                counter!(TOKEN_REFRESH_TOTAL, "result" => "error").increment(1);
            })?;

        if !response.status().is_success() {
            counter!(TOKEN_REFRESH_TOTAL, "result" => "rejected").increment(1);
            let status = response.status();
            let body = ApiResponse::read(response).await?.body;
            return Err(AppError::from_response(status, body));
        }

        #[derive(Deserialize)]
        struct RefreshResponse {
            access: String,
        }

        let RefreshResponse { access } = response.json().await?;
        self.tokens.set_access_token(&access).await?;
        counter!(TOKEN_REFRESH_TOTAL, "result" => "success").increment(1);
        tracing::info!("Access token refreshed");

        Ok(access)
    }

    /// Forced logout after an unrecoverable refresh failure.
    ///
    /// Clears both tokens, shows the expiry notice and opens the login screen
    /// after the notice duration.
    pub async fn expire_session(&self) {
        counter!(SESSION_EXPIRED_TOTAL).increment(1);
        tracing::warn!("Session expired, redirecting to login");

        if let Err(e) = self.tokens.clear().await {
            tracing::error!("Failed to clear session: {}", e);
        }

        let delay = self.config.session_notice_duration;
        self.ui
            .notify(Notice::error(SESSION_EXPIRED_MESSAGE).with_duration(delay));

        let ui = self.ui.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            ui.navigate(RouteTarget::named(RouteName::Login));
        });
    }
}
