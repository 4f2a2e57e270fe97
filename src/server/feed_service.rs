use std::sync::Arc;

use tracing::warn;
use url::Url;

use crate::client::{Client, CredentialSet};
use crate::error::Result;
use crate::feed::{Feed, Post};

use super::Variant;
use super::restart::RestartValve;

/// Everything needed to answer one feed request.
#[derive(Debug, Clone)]
pub struct FeedRequest {
  pub list_id: String,
  pub credentials: CredentialSet,
  pub self_link: Url,
}

#[derive(Clone)]
pub struct FeedService {
  inner: Arc<Inner>,
}

struct Inner {
  client: Client,
  variant: Variant,
  include_text: bool,
  restart: Option<Arc<RestartValve>>,
}

impl FeedService {
  pub fn new(client: Client, variant: Variant, include_text: bool) -> Self {
    Self::with_restart(client, variant, include_text, None)
  }

  pub fn with_restart(
    client: Client,
    variant: Variant,
    include_text: bool,
    restart: Option<Arc<RestartValve>>,
  ) -> Self {
    let inner = Inner {
      client,
      variant,
      include_text,
      restart,
    };

    Self {
      inner: Arc::new(inner),
    }
  }

  pub fn variant(&self) -> Variant {
    self.inner.variant
  }

  pub fn restart_valve(&self) -> Option<&Arc<RestartValve>> {
    self.inner.restart.as_ref()
  }

  pub async fn build_feed(&self, request: &FeedRequest) -> Result<Feed> {
    let mut posts = self
      .inner
      .client
      .fetch_posts(&request.list_id, &request.credentials)
      .await?;

    if !self.inner.include_text {
      posts = posts.into_iter().map(Post::without_text).collect();
    }

    let title = format!("Twitter list {}", request.list_id);
    Ok(Feed::new(title, request.self_link.clone(), posts))
  }

  pub fn record_served(&self) {
    let Some(valve) = &self.inner.restart else {
      return;
    };
    if valve.record_served() {
      warn!("served {} feeds, shutting down for a restart", valve.served());
    }
  }
}
