use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use shared::{
    domain::{SpecialtyId, UserId},
    error::ApiErrorBody,
    protocol::{SpecialtySummary, UpdateSpecialtyRequest, UpdateUserRequest, UserSummary},
};
use tracing::{debug, warn};
use url::Url;

use crate::error::ClientError;

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const SPECIALTIES_PATH: &str = "especialidades";
const USERS_PATH: &str = "usuarios";

/// The REST operations the admin screens depend on.
#[async_trait]
pub trait AdminBackend: Send + Sync {
    async fn list_specialties(&self) -> Result<Vec<SpecialtySummary>, ClientError>;
    /// Returns the backend's representation of the updated specialty, or
    /// `None` when the response carried no usable body.
    async fn update_specialty(
        &self,
        id: SpecialtyId,
        request: &UpdateSpecialtyRequest,
    ) -> Result<Option<SpecialtySummary>, ClientError>;
    async fn list_users(&self) -> Result<Vec<UserSummary>, ClientError>;
    async fn update_user(&self, id: UserId, request: &UpdateUserRequest)
        -> Result<(), ClientError>;
    async fn delete_user(&self, id: UserId) -> Result<(), ClientError>;
}

pub struct HttpAdminClient {
    http: Client,
    base_url: Url,
    bearer_token: Option<String>,
}

impl HttpAdminClient {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        Self::with_timeout(base_url, DEFAULT_REQUEST_TIMEOUT)
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: normalize_base_url(base_url)?,
            bearer_token: None,
        })
    }

    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        let token = token.into();
        self.bearer_token = (!token.trim().is_empty()).then_some(token);
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        Ok(self.base_url.join(path)?)
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, ClientError> {
        let url = self.endpoint(path)?;
        debug!(method = %method, url = %url, "admin backend request");
        let builder = self.http.request(method, url);
        Ok(match &self.bearer_token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        })
    }
}

#[async_trait]
impl AdminBackend for HttpAdminClient {
    async fn list_specialties(&self) -> Result<Vec<SpecialtySummary>, ClientError> {
        let response = self.request(Method::GET, SPECIALTIES_PATH)?.send().await?;
        let body = success_body(response).await?;
        decode(&body)
    }

    async fn update_specialty(
        &self,
        id: SpecialtyId,
        request: &UpdateSpecialtyRequest,
    ) -> Result<Option<SpecialtySummary>, ClientError> {
        let response = self
            .request(Method::PUT, &format!("{SPECIALTIES_PATH}/{id}"))?
            .json(request)
            .send()
            .await?;
        let body = success_body(response).await?;
        if is_blank(&body) {
            return Ok(None);
        }
        match decode::<SpecialtySummary>(&body) {
            Ok(updated) => Ok(Some(updated)),
            Err(err) => {
                warn!(
                    record_id = %id,
                    error = %err,
                    "specialty update response was not a specialty"
                );
                Ok(None)
            }
        }
    }

    async fn list_users(&self) -> Result<Vec<UserSummary>, ClientError> {
        let response = self.request(Method::GET, USERS_PATH)?.send().await?;
        let body = success_body(response).await?;
        if is_blank(&body) {
            return Ok(Vec::new());
        }
        let users: Option<Vec<UserSummary>> = decode(&body)?;
        Ok(users.unwrap_or_default())
    }

    async fn update_user(
        &self,
        id: UserId,
        request: &UpdateUserRequest,
    ) -> Result<(), ClientError> {
        let response = self
            .request(Method::PUT, &format!("{USERS_PATH}/{id}"))?
            .json(request)
            .send()
            .await?;
        success_body(response).await?;
        Ok(())
    }

    async fn delete_user(&self, id: UserId) -> Result<(), ClientError> {
        let response = self
            .request(Method::DELETE, &format!("{USERS_PATH}/{id}"))?
            .send()
            .await?;
        success_body(response).await?;
        Ok(())
    }
}

/// Appends a trailing slash so relative joins extend the base path
/// instead of replacing its last segment.
fn normalize_base_url(raw: &str) -> Result<Url, ClientError> {
    let mut url = Url::parse(raw.trim())?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

async fn success_body(response: Response) -> Result<Vec<u8>, ClientError> {
    let status = response.status();
    let body = response.bytes().await?;
    if status.is_success() {
        return Ok(body.to_vec());
    }

    let message = serde_json::from_slice::<ApiErrorBody>(&body)
        .ok()
        .and_then(|body| body.text().map(str::to_owned));
    Err(ClientError::Status {
        status: status.as_u16(),
        message,
    })
}

fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T, ClientError> {
    serde_json::from_slice(body).map_err(|err| ClientError::Decode(err.to_string()))
}

fn is_blank(body: &[u8]) -> bool {
    body.iter().all(u8::is_ascii_whitespace)
}

#[cfg(test)]
#[path = "tests/client_tests.rs"]
mod tests;
