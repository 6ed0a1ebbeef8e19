//! Shared JSON-over-HTTP plumbing for the REST backend.
//!
//! Request paths are given as segments, never as preformatted strings. Each segment is
//! percent-encoded on its own, so an id containing `/`, `?` or `..` cannot reach a different
//! backend route.

use lmn_core::{AuthProvider, CollaboratorError, CoreConfig};
use reqwest::{Method, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;

/// A `reqwest` client bound to the backend base URL, with a fixed request timeout and an
/// optional bearer token source.
#[derive(Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: Url,
    auth: Option<Arc<dyn AuthProvider>>,
}

impl ApiClient {
    /// Fails if the base URL does not parse or the HTTP client cannot be built with the
    /// configured timeout.
    pub fn new(
        cfg: &CoreConfig,
        auth: Option<Arc<dyn AuthProvider>>,
    ) -> Result<Self, CollaboratorError> {
        let base_url = Url::parse(cfg.api_base_url()).map_err(|e| {
            CollaboratorError::InvalidRequest(format!(
                "invalid backend base URL '{}': {e}",
                cfg.api_base_url()
            ))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(CollaboratorError::InvalidRequest(format!(
                "backend base URL '{base_url}' cannot carry a path"
            )));
        }
        let client = reqwest::Client::builder()
            .timeout(cfg.request_timeout())
            .build()
            .map_err(|e| CollaboratorError::Unavailable(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url,
            auth,
        })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// Appends `segments` to the base URL, encoding each one as a single path segment.
    fn url(&self, segments: &[&str]) -> Result<Url, CollaboratorError> {
        if let Some(bad) = segments
            .iter()
            .find(|segment| matches!(segment.trim(), "" | "." | ".."))
        {
            return Err(CollaboratorError::InvalidRequest(format!(
                "'{bad}' is not a valid path segment"
            )));
        }
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                CollaboratorError::InvalidRequest(format!(
                    "backend base URL '{}' cannot carry a path",
                    self.base_url
                ))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn request(&self, method: Method, segments: &[&str]) -> Result<RequestBuilder, CollaboratorError> {
        let builder = self.client.request(method, self.url(segments)?);
        Ok(match &self.auth {
            Some(auth) => match auth.access_token().await {
                Some(token) => builder.bearer_auth(token),
                None => builder,
            },
            None => builder,
        })
    }

    pub async fn get_json<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T, CollaboratorError> {
        let builder = self.request(Method::GET, segments).await?;
        decode(send(builder).await?).await
    }

    pub async fn get_json_with_query<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        query: &[(&str, &str)],
    ) -> Result<T, CollaboratorError> {
        let builder = self.request(Method::GET, segments).await?.query(query);
        decode(send(builder).await?).await
    }

    pub async fn send_json<B, T>(
        &self,
        method: Method,
        segments: &[&str],
        body: &B,
    ) -> Result<T, CollaboratorError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let builder = self.request(method, segments).await?.json(body);
        decode(send(builder).await?).await
    }

    /// Sends a request whose response body is ignored.
    pub async fn send_unit<B>(
        &self,
        method: Method,
        segments: &[&str],
        body: Option<&B>,
    ) -> Result<(), CollaboratorError>
    where
        B: Serialize + ?Sized,
    {
        let mut builder = self.request(method, segments).await?;
        if let Some(body) = body {
            builder = builder.json(body);
        }
        send(builder).await.map(|_| ())
    }
}

async fn send(builder: RequestBuilder) -> Result<Response, CollaboratorError> {
    let response = builder.send().await.map_err(|e| {
        tracing::warn!(error = %e, "backend request failed");
        CollaboratorError::Network(e.to_string())
    })?;

    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    tracing::warn!(status = status.as_u16(), body = %body, "backend returned an error");
    Err(match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => CollaboratorError::Unauthenticated,
        StatusCode::NOT_FOUND => CollaboratorError::NotFound(body),
        _ => CollaboratorError::Status {
            status: status.as_u16(),
            body,
        },
    })
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, CollaboratorError> {
    response
        .json()
        .await
        .map_err(|e| CollaboratorError::Decode(e.to_string()))
}
