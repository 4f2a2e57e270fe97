use axum::Router;
use url::Url;

/// Serve `router` on an ephemeral local port, standing in for the
/// Twitter API. Returns the base url to point a client at.
pub async fn spawn_upstream(router: Router) -> Url {
  let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
    .await
    .expect("failed to bind mock upstream");
  let addr = listener.local_addr().expect("no local address");

  tokio::spawn(async move {
    axum::serve(listener, router)
      .await
      .expect("mock upstream failed");
  });

  Url::parse(&format!("http://{addr}/")).expect("invalid mock upstream url")
}

/// A v2 list timeline page: three posts, the middle one a repost.
pub const V2_TIMELINE: &str = r#"{
  "data": [
    {
      "id": "1477000000000000003",
      "author_id": "11",
      "created_at": "2022-01-03T10:00:00.000Z",
      "text": "Third post"
    },
    {
      "id": "1477000000000000002",
      "author_id": "12",
      "created_at": "2022-01-02T10:00:00.000Z",
      "text": "RT @someone: a repost",
      "referenced_tweets": [{ "type": "retweeted", "id": "1476" }]
    },
    {
      "id": "1477000000000000001",
      "author_id": "12",
      "created_at": "2022-01-01T00:00:00.000Z",
      "text": "First post"
    }
  ],
  "includes": {
    "users": [
      { "id": "11", "name": "Alice", "username": "alice" },
      { "id": "12", "name": "Bob", "username": "bob" }
    ]
  },
  "meta": { "result_count": 3 }
}"#;

/// The same page as returned by v1.1 `lists/statuses`.
pub const V1_STATUSES: &str = r#"[
  {
    "id": 1477000000000000003,
    "id_str": "1477000000000000003",
    "created_at": "Mon Jan 03 10:00:00 +0000 2022",
    "full_text": "Third post",
    "user": { "id_str": "11", "screen_name": "alice" },
    "in_reply_to_status_id_str": null,
    "is_quote_status": false
  },
  {
    "id": 1477000000000000002,
    "id_str": "1477000000000000002",
    "created_at": "Sun Jan 02 10:00:00 +0000 2022",
    "full_text": "RT @someone: a repost",
    "user": { "id_str": "12", "screen_name": "bob" },
    "retweeted_status": { "id_str": "1476" },
    "is_quote_status": false
  },
  {
    "id": 1477000000000000001,
    "id_str": "1477000000000000001",
    "created_at": "Sat Jan 01 00:00:00 +0000 2022",
    "full_text": "First post & more",
    "user": { "id_str": "12", "screen_name": "bob" },
    "is_quote_status": false
  }
]"#;
