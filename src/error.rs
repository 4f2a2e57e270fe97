use axum::response::{IntoResponse, Response};
use http::StatusCode;
use tracing::error;

use crate::client::UpstreamError;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
  #[error("missing {0}")]
  MissingParam(&'static str),

  #[error("invalid {0}")]
  InvalidParam(&'static str),

  #[error("Could not retrieve the list's posts: {0}")]
  Upstream(#[from] UpstreamError),

  #[error("IO error: {0}")]
  Io(#[from] std::io::Error),

  #[error("XML writer error {0:?}")]
  Xml(#[from] quick_xml::Error),

  #[error("Invalid URL {0}")]
  InvalidUrl(#[from] url::ParseError),

  #[error("Reqwest client error {0:?}")]
  Reqwest(#[from] reqwest::Error),

  #[error("restarting after serving {0} requests")]
  RestartRequested(usize),

  #[error("{0}")]
  Message(String),
}

impl Error {
  pub fn status_code(&self) -> StatusCode {
    match self {
      Error::MissingParam(_) | Error::InvalidParam(_) | Error::Upstream(_) => {
        StatusCode::BAD_REQUEST
      }
      _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }
}

impl IntoResponse for Error {
  fn into_response(self) -> Response {
    let status = self.status_code();
    if status.is_server_error() {
      error!("failed to serve feed: {self:?}");
    }
    (status, self.to_string()).into_response()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_client_errors_map_to_bad_request() {
    let missing = Error::MissingParam("bearerToken");
    assert_eq!(missing.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(missing.to_string(), "missing bearerToken");

    let upstream = Error::from(UpstreamError::Api("List not found".into()));
    assert_eq!(upstream.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(
      upstream.to_string(),
      "Could not retrieve the list's posts: List not found"
    );
  }

  #[test]
  fn test_internal_errors_map_to_server_error() {
    let err = Error::Message("boom".into());
    assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
  }

  #[test]
  fn test_io_error_keeps_cause() {
    let err = Error::from(std::io::Error::other("address in use"));
    assert_eq!(err.to_string(), "IO error: address in use");
    assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
  }
}
