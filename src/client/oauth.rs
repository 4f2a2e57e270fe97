//! OAuth 1.0a request signing (HMAC-SHA1).

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use chrono::Utc;
use hmac::{Hmac, Mac};
use rand::RngCore;
use sha1::Sha1;
use url::Url;

use super::OAuthCredentials;

type HmacSha1 = Hmac<Sha1>;

/// `Authorization` header value for a request with no body parameters.
pub(super) fn authorization_header(
  creds: &OAuthCredentials,
  method: &str,
  url: &Url,
) -> String {
  let timestamp = Utc::now().timestamp().to_string();
  Signer::new(creds, generate_nonce(), timestamp).authorization(method, url, &[])
}

fn generate_nonce() -> String {
  let mut buffer = [0u8; 16];
  rand::rng().fill_bytes(&mut buffer);
  buffer.iter().map(|b| format!("{b:02x}")).collect()
}

// RFC 3986 unreserved characters pass through, everything else is escaped.
fn encode(s: &str) -> String {
  urlencoding::encode(s).into_owned()
}

struct Signer<'a> {
  creds: &'a OAuthCredentials,
  nonce: String,
  timestamp: String,
}

impl<'a> Signer<'a> {
  fn new(creds: &'a OAuthCredentials, nonce: String, timestamp: String) -> Self {
    Self {
      creds,
      nonce,
      timestamp,
    }
  }

  fn oauth_params(&self) -> Vec<(&'static str, &str)> {
    vec![
      ("oauth_consumer_key", self.creds.consumer_key.as_str()),
      ("oauth_nonce", self.nonce.as_str()),
      ("oauth_signature_method", "HMAC-SHA1"),
      ("oauth_timestamp", self.timestamp.as_str()),
      ("oauth_token", self.creds.access_token.as_str()),
      ("oauth_version", "1.0"),
    ]
  }

  /// `params` are the request parameters not already in the url's
  /// query, e.g. form-encoded body fields.
  fn base_string(&self, method: &str, url: &Url, params: &[(&str, &str)]) -> String {
    let mut pairs: Vec<(String, String)> = url
      .query_pairs()
      .map(|(k, v)| (encode(&k), encode(&v)))
      .chain(params.iter().map(|(k, v)| (encode(k), encode(v))))
      .chain(self.oauth_params().into_iter().map(|(k, v)| (encode(k), encode(v))))
      .collect();
    pairs.sort();

    let param_string = pairs
      .iter()
      .map(|(k, v)| format!("{k}={v}"))
      .collect::<Vec<_>>()
      .join("&");

    let mut base_url = url.clone();
    base_url.set_query(None);
    base_url.set_fragment(None);

    format!(
      "{}&{}&{}",
      method.to_ascii_uppercase(),
      encode(base_url.as_str()),
      encode(&param_string)
    )
  }

  fn signature(&self, method: &str, url: &Url, params: &[(&str, &str)]) -> String {
    let key = format!(
      "{}&{}",
      encode(&self.creds.consumer_secret),
      encode(&self.creds.access_token_secret)
    );
    let mut mac = HmacSha1::new_from_slice(key.as_bytes())
      .expect("HMAC accepts keys of any length");
    mac.update(self.base_string(method, url, params).as_bytes());
    STANDARD.encode(mac.finalize().into_bytes())
  }

  fn authorization(&self, method: &str, url: &Url, params: &[(&str, &str)]) -> String {
    let signature = self.signature(method, url, params);
    let mut fields = self.oauth_params();
    fields.push(("oauth_signature", signature.as_str()));
    fields.sort();

    let fields = fields
      .iter()
      .map(|(k, v)| format!("{k}=\"{}\"", encode(v)))
      .collect::<Vec<_>>()
      .join(", ");
    format!("OAuth {fields}")
  }
}
