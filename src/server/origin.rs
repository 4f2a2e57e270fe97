use axum::extract::{FromRequestParts, Host};
use axum::response::{IntoResponse, Response};
use http::request::Parts;
use url::Url;

use crate::error::Result;

/// Scheme and authority the client used to reach us.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Origin {
  pub scheme: String,
  pub host: String,
}

impl Origin {
  /// Absolute url for `path` on this origin. A port that is the default
  /// for the scheme is dropped.
  pub fn url(&self, path: &str) -> Result<Url> {
    let mut url = Url::parse(&format!("{}://{}", self.scheme, self.host))?;
    url.set_path(path);
    Ok(url)
  }
}

#[async_trait::async_trait]
impl<S: Send + Sync> FromRequestParts<S> for Origin {
  type Rejection = Response;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &S,
  ) -> Result<Self, Self::Rejection> {
    let Host(host) = Host::from_request_parts(parts, state)
      .await
      .map_err(IntoResponse::into_response)?;

    // TLS is terminated in front of us, the proxy tells the real scheme
    let scheme = parts
      .headers
      .get("x-forwarded-proto")
      .and_then(|v| v.to_str().ok())
      .and_then(|v| v.split(',').next())
      .map(|v| v.trim().to_ascii_lowercase())
      .filter(|v| !v.is_empty())
      .or_else(|| parts.uri.scheme_str().map(str::to_owned))
      .unwrap_or_else(|| "http".to_owned());

    Ok(Origin { scheme, host })
  }
}
