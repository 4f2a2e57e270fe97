use clap::Parser;
use url::Url;

use crate::client::{
  ClientConfig, CredentialSet, DEFAULT_API_BASE, OAuthCredentials,
};
use crate::error::{Error, Result};
use crate::feed::FeedFormat;
use crate::server::{FeedRequest, FeedService, ServerConfig, Variant};

#[derive(Parser)]
#[clap(version, about)]
pub struct Cli {
  #[clap(subcommand)]
  subcmd: SubCommand,
}

#[derive(Parser)]
enum SubCommand {
  /// Serve feeds over HTTP
  Server(ServerConfig),
  /// Fetch a list once and print its feed
  // boxed because of the clippy::large_enum_variant warning
  Fetch(Box<FetchConfig>),
}

#[derive(Parser)]
struct FetchConfig {
  /// The list to fetch
  list_id: String,
  #[clap(long, env = "TWITTER_BEARER_TOKEN", hide_env_values = true)]
  bearer_token: Option<String>,
  #[clap(long, env = "TWITTER_OAUTH_CONSUMER_KEY", hide_env_values = true)]
  oauth_consumer_key: Option<String>,
  #[clap(long, env = "TWITTER_OAUTH_CONSUMER_SECRET", hide_env_values = true)]
  oauth_consumer_secret: Option<String>,
  #[clap(long, env = "TWITTER_OAUTH_ACCESS_TOKEN", hide_env_values = true)]
  oauth_access_token: Option<String>,
  #[clap(
    long,
    env = "TWITTER_OAUTH_ACCESS_TOKEN_SECRET",
    hide_env_values = true
  )]
  oauth_access_token_secret: Option<String>,
  /// Feed format, defaults to the one served for the credential scheme
  #[clap(long, short, value_enum)]
  format: Option<FeedFormat>,
  /// Leave the post text out of the feed
  #[clap(long)]
  no_text: bool,
  /// The feed's own link, defaults to a local server's url for the list
  #[clap(long)]
  self_link: Option<Url>,
  #[clap(long, env = "TWITTER_API_BASE", default_value = DEFAULT_API_BASE)]
  api_base: Url,
}

impl FetchConfig {
  fn credentials(&self) -> Result<CredentialSet> {
    if let Some(token) = &self.bearer_token {
      return Ok(CredentialSet::Bearer(token.clone()));
    }

    let required = |value: &Option<String>, flag: &'static str| {
      value.clone().ok_or(Error::MissingParam(flag))
    };

    Ok(CredentialSet::OAuth1(OAuthCredentials {
      consumer_key: required(&self.oauth_consumer_key, "--oauth-consumer-key")?,
      consumer_secret: required(
        &self.oauth_consumer_secret,
        "--oauth-consumer-secret",
      )?,
      access_token: required(&self.oauth_access_token, "--oauth-access-token")?,
      access_token_secret: required(
        &self.oauth_access_token_secret,
        "--oauth-access-token-secret",
      )?,
    }))
  }

  fn self_link(&self) -> Result<Url> {
    match &self.self_link {
      Some(link) => Ok(link.clone()),
      None => Ok(Url::parse(&format!("http://localhost:8080/{}", self.list_id))?),
    }
  }

  fn to_feed_request(&self) -> Result<FeedRequest> {
    Ok(FeedRequest {
      list_id: self.list_id.clone(),
      credentials: self.credentials()?,
      self_link: self.self_link()?,
    })
  }
}

impl Cli {
  pub async fn run(self) -> Result<()> {
    match self.subcmd {
      SubCommand::Server(server_config) => server_config.run().await,
      SubCommand::Fetch(fetch_config) => fetch(&fetch_config).await,
    }
  }
}

async fn fetch(config: &FetchConfig) -> Result<()> {
  let request = config.to_feed_request()?;
  let client = ClientConfig::new(config.api_base.clone()).build()?;
  let variant = Variant::of(&request.credentials);
  let service = FeedService::new(client, variant, !config.no_text);

  let feed = service.build_feed(&request).await?;
  let format = config
    .format
    .unwrap_or_else(|| request.credentials.feed_format());
  println!("{}", feed.serialize(format)?);
  Ok(())
}
