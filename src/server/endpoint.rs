use std::collections::HashMap;

use axum::extract::{Path, Query};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Extension, Router};
use http::header::CONTENT_TYPE;
use http::{StatusCode, Uri};
use tower_http::compression::CompressionLayer;
use tracing::info;
use url::Url;

use crate::client::{CredentialSet, OAuthCredentials};
use crate::error::{Error, Result};

use super::Variant;
use super::feed_service::{FeedRequest, FeedService};
use super::origin::Origin;

const PATH_LIST_ID: &str = "listId";

const PARAM_BEARER_TOKEN: &str = "bearerToken";
const PARAM_OAUTH_CONSUMER_KEY: &str = "oAuthConsumerKey";
const PARAM_OAUTH_CONSUMER_SECRET: &str = "oAuthConsumerSecret";
const PARAM_OAUTH_ACCESS_TOKEN: &str = "oAuthAccessToken";
const PARAM_OAUTH_ACCESS_TOKEN_SECRET: &str = "oAuthAccessTokenSecret";

pub fn router(service: FeedService) -> Router {
  Router::new()
    .route("/", get(handle_missing_list_id))
    .route("/:list_id", get(handle_feed))
    .fallback(handle_usage)
    .layer(Extension(service))
    .layer(CompressionLayer::new().gzip(true))
}

async fn handle_feed(
  Extension(service): Extension<FeedService>,
  origin: Origin,
  Path(list_id): Path<String>,
  Query(query): Query<HashMap<String, String>>,
  uri: Uri,
) -> Result<Response> {
  let request = parse_request(service.variant(), list_id, &query, &origin, uri.path())?;
  info!("serving feed for list {}", request.list_id);

  let feed = service.build_feed(&request).await?;
  let format = request.credentials.feed_format();
  let xml = feed.serialize(format)?;
  service.record_served();

  Ok(([(CONTENT_TYPE, format.content_type())], xml).into_response())
}

async fn handle_missing_list_id() -> Error {
  Error::MissingParam(PATH_LIST_ID)
}

// without a Host header the hint falls back to a relative path
async fn handle_usage(
  Extension(service): Extension<FeedService>,
  origin: Option<Origin>,
) -> (StatusCode, String) {
  let base = origin
    .map(|origin| format!("{}://{}", origin.scheme, origin.host))
    .unwrap_or_default();
  let usage = format!(
    "Usage: {base}/<{PATH_LIST_ID}>?{}",
    usage_query(service.variant())
  );
  (StatusCode::NOT_FOUND, usage)
}

fn usage_query(variant: Variant) -> String {
  credential_params(variant)
    .iter()
    .map(|name| format!("{name}=<{name}>"))
    .collect::<Vec<_>>()
    .join("&")
}

fn credential_params(variant: Variant) -> &'static [&'static str] {
  match variant {
    Variant::Bearer => &[PARAM_BEARER_TOKEN],
    Variant::Oauth1 => &[
      PARAM_OAUTH_CONSUMER_KEY,
      PARAM_OAUTH_CONSUMER_SECRET,
      PARAM_OAUTH_ACCESS_TOKEN,
      PARAM_OAUTH_ACCESS_TOKEN_SECRET,
    ],
  }
}

fn parse_request(
  variant: Variant,
  list_id: String,
  query: &HashMap<String, String>,
  origin: &Origin,
  path: &str,
) -> Result<FeedRequest> {
  if list_id.is_empty() {
    return Err(Error::MissingParam(PATH_LIST_ID));
  }
  if variant == Variant::Oauth1 && list_id.parse::<u64>().is_err() {
    return Err(Error::InvalidParam(PATH_LIST_ID));
  }

  let credentials = parse_credentials(variant, query)?;
  let self_link = self_link(origin, path, &credentials)?;

  Ok(FeedRequest {
    list_id,
    credentials,
    self_link,
  })
}

fn parse_credentials(
  variant: Variant,
  query: &HashMap<String, String>,
) -> Result<CredentialSet> {
  let param = |name: &'static str| {
    query
      .get(name)
      .filter(|value| !value.is_empty())
      .cloned()
      .ok_or(Error::MissingParam(name))
  };

  let credentials = match variant {
    Variant::Bearer => CredentialSet::Bearer(param(PARAM_BEARER_TOKEN)?),
    Variant::Oauth1 => CredentialSet::OAuth1(OAuthCredentials {
      consumer_key: param(PARAM_OAUTH_CONSUMER_KEY)?,
      consumer_secret: param(PARAM_OAUTH_CONSUMER_SECRET)?,
      access_token: param(PARAM_OAUTH_ACCESS_TOKEN)?,
      access_token_secret: param(PARAM_OAUTH_ACCESS_TOKEN_SECRET)?,
    }),
  };
  Ok(credentials)
}

/// The feed's own url. OAuth credentials are put back into the query so
/// a reader can poll the link as is.
fn self_link(origin: &Origin, path: &str, credentials: &CredentialSet) -> Result<Url> {
  let mut url = origin.url(path)?;

  if let CredentialSet::OAuth1(creds) = credentials {
    url.query_pairs_mut().extend_pairs([
      (PARAM_OAUTH_CONSUMER_KEY, &creds.consumer_key),
      (PARAM_OAUTH_CONSUMER_SECRET, &creds.consumer_secret),
      (PARAM_OAUTH_ACCESS_TOKEN, &creds.access_token),
      (PARAM_OAUTH_ACCESS_TOKEN_SECRET, &creds.access_token_secret),
    ]);
  }

  Ok(url)
}
