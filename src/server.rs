mod endpoint;
mod feed_service;
mod origin;
mod restart;

use std::future::Future;
use std::num::NonZeroUsize;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;
use tracing::{info, warn};
use url::Url;

pub use endpoint::router;
pub use feed_service::{FeedRequest, FeedService};
pub use restart::RestartValve;

use crate::client::{ClientConfig, CredentialSet, DEFAULT_API_BASE};
use crate::error::{Error, Result};

/// Which credential scheme, upstream API version and feed format a
/// deployment serves.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum Variant {
  /// `?bearerToken=`, Twitter API v2, Atom feeds
  Bearer,
  /// `?oAuthConsumerKey=&...`, Twitter API v1.1, RSS feeds
  Oauth1,
}

impl Variant {
  pub fn of(credentials: &CredentialSet) -> Self {
    match credentials {
      CredentialSet::Bearer(_) => Variant::Bearer,
      CredentialSet::OAuth1(_) => Variant::Oauth1,
    }
  }
}

#[derive(Parser, Debug)]
pub struct ServerConfig {
  /// Address to listen on
  #[clap(long, short, default_value = "0.0.0.0")]
  bind: String,
  #[clap(long, short, env = "PORT", default_value_t = 8080)]
  port: u16,
  #[clap(long, env = "FEED_VARIANT", value_enum, default_value_t = Variant::Bearer)]
  variant: Variant,
  /// Leave the post text out of the feeds
  #[clap(long)]
  no_text: bool,
  #[clap(long, env = "TWITTER_API_BASE", default_value = DEFAULT_API_BASE)]
  api_base: Url,
  /// User agent for upstream requests
  #[clap(long)]
  user_agent: Option<String>,
  /// Shut down with a non-zero status after serving this many feeds
  #[clap(long, env = "MAX_REQUESTS_BEFORE_RESTART")]
  max_requests_before_restart: Option<NonZeroUsize>,
}

impl ServerConfig {
  pub async fn run(self) -> Result<()> {
    let client = ClientConfig::new(self.api_base)
      .user_agent(self.user_agent)
      .build()?;
    let restart = self
      .max_requests_before_restart
      .map(|limit| Arc::new(RestartValve::new(limit)));
    let service =
      FeedService::with_restart(client, self.variant, !self.no_text, restart);

    let addr = format!("{}:{}", self.bind, self.port);
    info!("listening on {addr} ({:?} variant)", self.variant);
    let listener = TcpListener::bind(&addr).await?;

    serve(listener, service).await
  }
}

pub async fn serve(listener: TcpListener, service: FeedService) -> Result<()> {
  serve_with_shutdown(listener, service, shutdown_signal()).await
}

/// Serve until `signal` resolves or the restart valve trips, letting
/// in-flight requests finish either way.
async fn serve_with_shutdown(
  listener: TcpListener,
  service: FeedService,
  signal: impl Future<Output = ()> + Send + 'static,
) -> Result<()> {
  let valve = service.restart_valve().cloned();
  let app = router(service);

  let shutdown = {
    let valve = valve.clone();
    async move {
      match valve {
        Some(valve) => tokio::select! {
          _ = valve.tripped() => {}
          _ = signal => {}
        },
        None => signal.await,
      }
    }
  };

  info!("starting server");
  axum::serve(listener, app)
    .with_graceful_shutdown(shutdown)
    .await?;

  match valve {
    Some(valve) if valve.is_tripped() => {
      Err(Error::RestartRequested(valve.served()))
    }
    _ => Ok(()),
  }
}

async fn shutdown_signal() {
  let interrupt = async {
    if let Err(e) = tokio::signal::ctrl_c().await {
      warn!("cannot listen for SIGINT: {e}");
      std::future::pending::<()>().await;
    }
  };

  #[cfg(unix)]
  let terminate = async {
    use tokio::signal::unix::{SignalKind, signal};

    match signal(SignalKind::terminate()) {
      Ok(mut sigterm) => {
        sigterm.recv().await;
      }
      Err(e) => {
        warn!("cannot listen for SIGTERM: {e}");
        std::future::pending::<()>().await;
      }
    }
  };
  #[cfg(not(unix))]
  let terminate = std::future::pending::<()>();

  tokio::select! {
    _ = interrupt => info!("Received SIGINT, shutting down..."),
    _ = terminate => info!("Received SIGTERM, shutting down..."),
  }
}
