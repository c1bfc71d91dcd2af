//! REST-backed [`PermissionSource`].

use access_control_sdk::{FetchError, PermissionSource, PermissionsResponse, RolesResponse};
use async_trait::async_trait;
use portal_http::{HttpClient, HttpError};
use portal_security::{AccessToken, NameSet};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use url::Url;

use crate::config::{AccessControlConfig, ConfigError, Endpoints};

/// Fetches permission and role names from the portal backend:
///
/// - `GET {base}/api/auth/user-permissions` -> `{"permissions": [...]}`
/// - `GET {base}/api/auth/user-roles` -> `{"roles": [...]}`
///
/// Both requests carry `Authorization: Bearer <token>`.
#[derive(Debug, Clone)]
pub struct HttpPermissionSource {
    client: HttpClient,
    endpoints: Endpoints,
}

impl HttpPermissionSource {
    #[must_use]
    pub fn new(client: HttpClient, endpoints: Endpoints) -> Self {
        Self { client, endpoints }
    }

    /// # Errors
    /// Returns `ConfigError` if the endpoint URLs cannot be resolved.
    pub fn from_config(config: &AccessControlConfig, client: HttpClient) -> Result<Self, ConfigError> {
        Ok(Self::new(client, config.endpoints()?))
    }

    #[must_use]
    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &Url,
        token: &AccessToken,
    ) -> Result<T, FetchError> {
        self.client
            .get(url.as_str())
            .bearer_auth(token.expose())
            .send()
            .await
            .map_err(to_fetch_error)?
            .json::<T>()
            .await
            .map_err(to_fetch_error)
    }
}

#[async_trait]
impl PermissionSource for HttpPermissionSource {
    async fn fetch_permissions(&self, token: &AccessToken) -> Result<NameSet, FetchError> {
        let body: PermissionsResponse = self.get_json(&self.endpoints.permissions, token).await?;
        Ok(body.permissions.into())
    }

    async fn fetch_roles(&self, token: &AccessToken) -> Result<NameSet, FetchError> {
        let body: RolesResponse = self.get_json(&self.endpoints.roles, token).await?;
        Ok(body.roles.into())
    }
}

/// Laravel error bodies look like `{"message": "Unauthenticated."}`.
#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

fn to_fetch_error(err: HttpError) -> FetchError {
    match err {
        HttpError::Timeout(after) => FetchError::Timeout(after),
        HttpError::HttpStatus {
            status,
            body_preview,
        } => {
            let message = serde_json::from_str::<ErrorBody>(&body_preview)
                .map_or(body_preview, |body| body.message);
            FetchError::status(status.as_u16(), message)
        }
        HttpError::Json(e) => FetchError::Decode(e.to_string()),
        HttpError::BodyTooLarge { limit } => {
            FetchError::Decode(format!("response body exceeds {limit} bytes"))
        }
        other => FetchError::Transport(other.to_string()),
    }
}
