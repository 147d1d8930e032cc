//! Token endpoints

use crate::error::Result;
use crate::http::{ApiClient, ApiRequest, REFRESH_PATH};
use crate::session::TokenStore;
use serde::{Deserialize, Serialize};
use serde_json::json;

/// Tokens issued by `POST /auth/token/`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

#[derive(Debug, Deserialize)]
struct AccessToken {
    access: String,
}

/// Token endpoints. None of them enter the refresh-retry cycle: a 401 here
/// means bad credentials.
#[derive(Clone)]
pub struct AuthApi {
    client: ApiClient,
}

impl AuthApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub fn tokens(&self) -> &TokenStore {
        self.client.tokens()
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<TokenPair> {
        let request = ApiRequest::post("/auth/token/")
            .json(&json!({ "username": username, "password": password }))?
            .without_refresh();
        self.client.send_json(request).await
    }

    /// Exchange a refresh token for a new access token.
    pub async fn refresh(&self, refresh_token: &str) -> Result<String> {
        let request = ApiRequest::post(REFRESH_PATH)
            .json(&json!({ "refresh": refresh_token }))?
            .without_refresh();
        let AccessToken { access } = self.client.send_json(request).await?;
        Ok(access)
    }

    pub async fn verify(&self, token: &str) -> Result<()> {
        let request = ApiRequest::post("/auth/token/verify/")
            .json(&json!({ "token": token }))?
            .without_refresh();
        self.client.send(request).await?;
        Ok(())
    }
}
