//! Twitter API v2 list timeline, authenticated with a bearer token.

use std::collections::HashMap;

use serde::Deserialize;

use crate::feed::Post;

use super::{ApiError, UpstreamError, parse_created_at};

pub(super) fn path(list_id: &str) -> [&str; 4] {
  ["2", "lists", list_id, "tweets"]
}

pub(super) fn query() -> Vec<(&'static str, String)> {
  vec![
    ("max_results", super::PAGE_SIZE.to_string()),
    (
      "tweet.fields",
      "author_id,created_at,referenced_tweets,text".into(),
    ),
    ("expansions", "author_id".into()),
    ("user.fields", "id,name,username".into()),
  ]
}

#[derive(Deserialize, Debug)]
struct TimelineResponse {
  // absent when the list has no posts
  #[serde(default)]
  data: Vec<Tweet>,
  #[serde(default)]
  includes: Includes,
  #[serde(default)]
  errors: Vec<ApiError>,
}

#[derive(Deserialize, Debug, Default)]
struct Includes {
  #[serde(default)]
  users: Vec<User>,
}

#[derive(Deserialize, Debug)]
struct Tweet {
  id: String,
  created_at: String,
  author_id: String,
  text: Option<String>,
  referenced_tweets: Option<Vec<serde_json::Value>>,
}

#[derive(Deserialize, Debug)]
struct User {
  id: String,
  username: String,
}

pub(super) fn parse_timeline(body: &str) -> Result<Vec<Post>, UpstreamError> {
  let TimelineResponse {
    data,
    includes,
    errors,
  } = serde_json::from_str(body)?;

  if data.is_empty() {
    if let Some(error) = errors.first() {
      return Err(UpstreamError::Api(error.describe()));
    }
  }

  let usernames: HashMap<&str, &str> = includes
    .users
    .iter()
    .map(|user| (user.id.as_str(), user.username.as_str()))
    .collect();

  data
    .into_iter()
    .map(|tweet| {
      let username = usernames.get(tweet.author_id.as_str()).ok_or_else(|| {
        UpstreamError::Malformed(format!("unknown author id {}", tweet.author_id))
      })?;
      let created_at = parse_created_at(&tweet.created_at)?;
      Ok(Post::new(
        tweet.id,
        *username,
        created_at,
        tweet.text,
        tweet.referenced_tweets.is_some(),
      ))
    })
    .collect()
}
