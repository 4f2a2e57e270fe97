//! Twitter API v1.1 list statuses, signed with OAuth 1.0a.

use serde::Deserialize;

use crate::feed::Post;

use super::{UpstreamError, parse_created_at};

pub(super) const PATH: [&str; 3] = ["1.1", "lists", "statuses.json"];

pub(super) fn query(list_id: &str) -> Vec<(&'static str, String)> {
  vec![
    ("list_id", list_id.to_owned()),
    ("count", super::PAGE_SIZE.to_string()),
    ("tweet_mode", "extended".into()),
  ]
}

#[derive(Deserialize, Debug)]
struct Status {
  id_str: String,
  created_at: String,
  full_text: Option<String>,
  text: Option<String>,
  user: User,
  retweeted_status: Option<serde_json::Value>,
  in_reply_to_status_id_str: Option<String>,
  #[serde(default)]
  is_quote_status: bool,
}

#[derive(Deserialize, Debug)]
struct User {
  screen_name: String,
}

impl Status {
  fn references_other_post(&self) -> bool {
    self.retweeted_status.is_some()
      || self.in_reply_to_status_id_str.is_some()
      || self.is_quote_status
  }
}

pub(super) fn parse_statuses(body: &str) -> Result<Vec<Post>, UpstreamError> {
  let statuses: Vec<Status> = serde_json::from_str(body)?;

  statuses
    .into_iter()
    .map(|status| {
      let created_at = parse_created_at(&status.created_at)?;
      let is_repost_or_reply = status.references_other_post();
      Ok(Post::new(
        status.id_str,
        status.user.screen_name,
        created_at,
        status.full_text.or(status.text),
        is_repost_or_reply,
      ))
    })
    .collect()
}
