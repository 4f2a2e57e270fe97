use std::fmt;

use crate::feed::FeedFormat;

const REDACTED: &str = "<redacted>";

/// Caller-supplied credentials. Passed through to the upstream API on
/// every request and never stored or logged.
#[derive(Clone, PartialEq, Eq)]
pub enum CredentialSet {
  Bearer(String),
  OAuth1(OAuthCredentials),
}

#[derive(Clone, PartialEq, Eq)]
pub struct OAuthCredentials {
  pub consumer_key: String,
  pub consumer_secret: String,
  pub access_token: String,
  pub access_token_secret: String,
}

impl CredentialSet {
  /// The feed format each credential scheme is served with.
  pub fn feed_format(&self) -> FeedFormat {
    match self {
      CredentialSet::Bearer(_) => FeedFormat::Atom,
      CredentialSet::OAuth1(_) => FeedFormat::Rss,
    }
  }
}

impl fmt::Debug for CredentialSet {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      CredentialSet::Bearer(_) => f.debug_tuple("Bearer").field(&REDACTED).finish(),
      CredentialSet::OAuth1(creds) => f.debug_tuple("OAuth1").field(creds).finish(),
    }
  }
}

impl fmt::Debug for OAuthCredentials {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("OAuthCredentials")
      .field("consumer_key", &REDACTED)
      .field("consumer_secret", &REDACTED)
      .field("access_token", &REDACTED)
      .field("access_token_secret", &REDACTED)
      .finish()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_debug_output_hides_secrets() {
    let bearer = CredentialSet::Bearer("AAAA-token-value".into());
    let oauth = CredentialSet::OAuth1(OAuthCredentials {
      consumer_key: "ck-value".into(),
      consumer_secret: "cs-value".into(),
      access_token: "at-value".into(),
      access_token_secret: "ats-value".into(),
    });

    for creds in [bearer, oauth] {
      let debug = format!("{creds:?}");
      assert!(!debug.contains("-value"), "leaked: {debug}");
      assert!(debug.contains(REDACTED));
    }
  }

  #[test]
  fn test_feed_format_per_scheme() {
    assert_eq!(
      CredentialSet::Bearer("t".into()).feed_format(),
      FeedFormat::Atom
    );
  }
}
