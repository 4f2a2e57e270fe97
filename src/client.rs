mod credentials;
mod oauth;
mod v1;
mod v2;

use chrono::{DateTime, Utc};
use reqwest::StatusCode;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use serde::Deserialize;
use tracing::{debug, warn};
use url::Url;

use crate::error::{Error, Result};
use crate::feed::Post;
use crate::util::date::parse_date;

pub use credentials::{CredentialSet, OAuthCredentials};

pub const DEFAULT_API_BASE: &str = "https://api.twitter.com";

/// Number of posts requested from the list timeline.
const PAGE_SIZE: usize = 50;

#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
  #[error("{0}")]
  Transport(#[from] reqwest::Error),

  #[error("{message} (HTTP {status})")]
  Status { status: StatusCode, message: String },

  #[error("{0}")]
  Api(String),

  #[error("malformed response: {0}")]
  Payload(#[from] serde_json::Error),

  #[error("malformed response: {0}")]
  Malformed(String),
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
  api_base: Url,
  user_agent: Option<String>,
}

impl ClientConfig {
  pub fn new(api_base: Url) -> Self {
    Self {
      api_base,
      user_agent: None,
    }
  }

  pub fn user_agent(mut self, user_agent: Option<String>) -> Self {
    self.user_agent = user_agent;
    self
  }

  fn to_builder(&self) -> reqwest::ClientBuilder {
    let user_agent = self
      .user_agent
      .as_deref()
      .unwrap_or(crate::util::USER_AGENT);

    reqwest::Client::builder().user_agent(user_agent)
  }

  pub fn build(&self) -> Result<Client> {
    if self.api_base.cannot_be_a_base() {
      return Err(Error::Message(format!(
        "API base {} cannot have a path",
        self.api_base
      )));
    }

    let client = self.to_builder().build()?;
    Ok(Client {
      client,
      api_base: self.api_base.clone(),
    })
  }
}

/// Fetches list timelines. Cheap to clone, clones share one connection
/// pool.
#[derive(Clone, Debug)]
pub struct Client {
  client: reqwest::Client,
  api_base: Url,
}

impl Client {
  /// Fetch one page of the list's most recent posts, newest first,
  /// without reposts and replies.
  pub async fn fetch_posts(
    &self,
    list_id: &str,
    credentials: &CredentialSet,
  ) -> Result<Vec<Post>, UpstreamError> {
    debug!("checking for new posts in list {list_id}");

    let result = match credentials {
      CredentialSet::Bearer(token) => self.fetch_v2(list_id, token).await,
      CredentialSet::OAuth1(creds) => self.fetch_v1(list_id, creds).await,
    };

    match result {
      Ok(posts) => {
        match posts.first() {
          None => debug!("no posts in list {list_id}"),
          Some(newest) => debug!(
            "fetched {} posts from list {list_id}, newest {}",
            posts.len(),
            newest.id()
          ),
        }
        Ok(
          posts
            .into_iter()
            .filter(|post| !post.is_repost_or_reply())
            .collect(),
        )
      }
      Err(e) => {
        warn!("could not retrieve posts of list {list_id}: {e:?}");
        Err(e)
      }
    }
  }

  async fn fetch_v2(
    &self,
    list_id: &str,
    token: &str,
  ) -> Result<Vec<Post>, UpstreamError> {
    let url = self.endpoint(&v2::path(list_id), &v2::query());
    let resp = self
      .client
      .get(url)
      .bearer_auth(token)
      .header(ACCEPT, "application/json")
      .send()
      .await?;

    v2::parse_timeline(&read_body(resp).await?)
  }

  async fn fetch_v1(
    &self,
    list_id: &str,
    creds: &OAuthCredentials,
  ) -> Result<Vec<Post>, UpstreamError> {
    let url = self.endpoint(&v1::PATH, &v1::query(list_id));
    let authorization = oauth::authorization_header(creds, "GET", &url);
    let resp = self
      .client
      .get(url)
      .header(AUTHORIZATION, authorization)
      .header(ACCEPT, "application/json")
      .send()
      .await?;

    v1::parse_statuses(&read_body(resp).await?)
  }

  fn endpoint(&self, segments: &[&str], query: &[(&str, String)]) -> Url {
    let mut url = self.api_base.clone();
    // the base was checked to have a path in ClientConfig::build
    if let Ok(mut path) = url.path_segments_mut() {
      path.pop_if_empty().extend(segments);
    }
    url.query_pairs_mut().extend_pairs(query);
    url
  }
}

async fn read_body(resp: reqwest::Response) -> Result<String, UpstreamError> {
  let status = resp.status();
  let body = resp.text().await?;

  if !status.is_success() {
    let message = provider_message(&body).unwrap_or_else(|| {
      status.canonical_reason().unwrap_or("unknown error").to_owned()
    });
    return Err(UpstreamError::Status { status, message });
  }

  Ok(body)
}

/// Error shapes used by both API versions, e.g. v1.1's
/// `{"errors":[{"code":34,"message":"..."}]}` or v2's
/// `{"title":"...","detail":"..."}`.
#[derive(Deserialize, Debug, Default)]
struct ApiError {
  message: Option<String>,
  detail: Option<String>,
  title: Option<String>,
  error: Option<String>,
}

impl ApiError {
  fn text(&self) -> Option<&str> {
    self
      .message
      .as_deref()
      .or(self.detail.as_deref())
      .or(self.title.as_deref())
      .or(self.error.as_deref())
  }

  fn describe(&self) -> String {
    self.text().unwrap_or("unknown error").to_owned()
  }
}

#[derive(Deserialize, Debug, Default)]
struct ErrorBody {
  #[serde(default)]
  errors: Vec<ApiError>,
  #[serde(flatten)]
  top_level: ApiError,
}

fn provider_message(body: &str) -> Option<String> {
  let body: ErrorBody = serde_json::from_str(body).ok()?;
  body
    .errors
    .iter()
    .find_map(ApiError::text)
    .or(body.top_level.text())
    .map(str::to_owned)
}

fn parse_created_at(s: &str) -> Result<DateTime<Utc>, UpstreamError> {
  parse_date(s)
    .map(|date| date.with_timezone(&Utc))
    .ok_or_else(|| UpstreamError::Malformed(format!("invalid date {s:?}")))
}
