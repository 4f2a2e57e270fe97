mod atom;
mod rss;

use std::borrow::Cow;

use chrono::{DateTime, Utc};
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use url::Url;

use crate::error::Result;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Post {
  id: String,
  url: String,
  text: Option<String>,
  created_at: DateTime<Utc>,
  author_handle: String,
  is_repost_or_reply: bool,
}

impl Post {
  pub fn new(
    id: impl Into<String>,
    author_handle: impl Into<String>,
    created_at: DateTime<Utc>,
    text: Option<String>,
    is_repost_or_reply: bool,
  ) -> Self {
    let id = id.into();
    let author_handle = author_handle.into();
    Self {
      url: post_url(&author_handle, &id),
      id,
      text,
      created_at,
      author_handle,
      is_repost_or_reply,
    }
  }

  pub fn without_text(self) -> Self {
    Self { text: None, ..self }
  }

  pub fn id(&self) -> &str {
    &self.id
  }

  pub fn url(&self) -> &str {
    &self.url
  }

  pub fn text(&self) -> Option<&str> {
    self.text.as_deref()
  }

  pub fn created_at(&self) -> &DateTime<Utc> {
    &self.created_at
  }

  pub fn author_handle(&self) -> &str {
    &self.author_handle
  }

  pub fn is_repost_or_reply(&self) -> bool {
    self.is_repost_or_reply
  }
}

fn post_url(author_handle: &str, id: &str) -> String {
  format!("https://twitter.com/{author_handle}/status/{id}")
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum FeedFormat {
  /// RSS 2.0
  Rss,
  /// Atom 1.0
  Atom,
}

impl FeedFormat {
  pub fn content_type(&self) -> &'static str {
    match self {
      FeedFormat::Rss => "application/rss+xml; charset=utf-8",
      FeedFormat::Atom => "application/atom+xml; charset=utf-8",
    }
  }
}

#[derive(Clone, Debug)]
pub struct Feed {
  title: String,
  self_link: Url,
  posts: Vec<Post>,
}

impl Feed {
  /// Reposts and replies never make it into a feed. The remaining posts
  /// keep the order they were given in.
  pub fn new(title: impl Into<String>, self_link: Url, posts: Vec<Post>) -> Self {
    let posts = posts
      .into_iter()
      .filter(|post| !post.is_repost_or_reply())
      .collect();

    Self {
      title: title.into(),
      self_link,
      posts,
    }
  }

  pub fn title(&self) -> &str {
    &self.title
  }

  pub fn self_link(&self) -> &Url {
    &self.self_link
  }

  pub fn posts(&self) -> &[Post] {
    &self.posts
  }

  pub fn serialize(&self, format: FeedFormat) -> Result<String> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    match format {
      FeedFormat::Rss => rss::write_channel(&mut writer, self)?,
      FeedFormat::Atom => atom::write_feed(&mut writer, self)?,
    }

    let buffer = writer.into_inner();
    Ok(String::from_utf8_lossy(&buffer).into_owned())
  }
}

type XmlWriter = Writer<Vec<u8>>;

fn start(writer: &mut XmlWriter, tag: BytesStart<'_>) -> Result<()> {
  writer.write_event(Event::Start(tag))?;
  Ok(())
}

fn end(writer: &mut XmlWriter, name: &str) -> Result<()> {
  writer.write_event(Event::End(BytesEnd::new(name)))?;
  Ok(())
}

fn empty(writer: &mut XmlWriter, tag: BytesStart<'_>) -> Result<()> {
  writer.write_event(Event::Empty(tag))?;
  Ok(())
}

// the text stays on the same line as its tags
fn text_element(
  writer: &mut XmlWriter,
  name: &str,
  attrs: &[(&str, &str)],
  text: &str,
) -> Result<()> {
  let tag = BytesStart::new(name).with_attributes(attrs.iter().copied());
  start(writer, tag)?;
  let text = sanitize_xml_text(text);
  writer.write_event(Event::Text(BytesText::new(&text)))?;
  end(writer, name)
}

/// XML 1.0 cannot carry most C0 controls or U+FFFE/U+FFFF, not even as
/// character references, so they are dropped from text content.
fn sanitize_xml_text(text: &str) -> Cow<'_, str> {
  if text.chars().all(is_xml_char) {
    return Cow::Borrowed(text);
  }
  Cow::Owned(text.chars().filter(|c| is_xml_char(*c)).collect())
}

fn is_xml_char(c: char) -> bool {
  matches!(
    c,
    '\t' | '\n' | '\r'
      | '\u{20}'..='\u{D7FF}'
      | '\u{E000}'..='\u{FFFD}'
      | '\u{10000}'..='\u{10FFFF}'
  )
}

#[cfg(test)]
mod tests {
  use super::*;

  fn date(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
  }

  pub(crate) fn sample_feed() -> Feed {
    let posts = vec![
      Post::new(
        "1003",
        "alice",
        date("2022-01-03T10:00:00Z"),
        Some("Fish & chips <3".into()),
        false,
      ),
      Post::new(
        "1002",
        "bob",
        date("2022-01-02T09:30:00Z"),
        Some("RT @alice: hello".into()),
        true,
      ),
      Post::new("1001", "carol", date("2022-01-01T00:00:00Z"), None, false),
    ];
    let self_link = Url::parse("http://localhost:8080/42").unwrap();
    Feed::new("Twitter list 42", self_link, posts)
  }

  #[test]
  fn test_post_url_is_derived_from_handle_and_id() {
    let post = Post::new("20", "jack", Utc::now(), None, false);
    assert_eq!(post.url(), "https://twitter.com/jack/status/20");
  }

  #[test]
  fn test_feed_drops_reposts_and_keeps_order() {
    let feed = sample_feed();
    let ids: Vec<_> = feed.posts().iter().map(|p| p.id()).collect();
    assert_eq!(ids, vec!["1003", "1001"]);
    assert!(feed.posts().iter().all(|p| !p.is_repost_or_reply()));
  }

  #[test]
  fn test_serialize_is_deterministic() {
    let feed = sample_feed();
    for format in [FeedFormat::Rss, FeedFormat::Atom] {
      let first = feed.serialize(format).unwrap();
      let second = feed.clone().serialize(format).unwrap();
      assert_eq!(first, second);
    }
  }

  pub(crate) fn feed_with_control_chars() -> Feed {
    let posts = vec![Post::new(
      "2001",
      "dave",
      date("2022-02-01T12:00:00Z"),
      Some("tab\tvt\u{0B}esc\u{1B}nul\u{0}end\u{FFFF}".into()),
      false,
    )];
    let self_link = Url::parse("http://localhost:8080/43").unwrap();
    Feed::new("Twitter list 4\u{7}3", self_link, posts)
  }

  #[test]
  fn test_sanitize_xml_text() {
    assert!(matches!(sanitize_xml_text("plain & <ok>"), Cow::Borrowed(_)));
    assert_eq!(sanitize_xml_text("a\u{0B}b\u{1B}c\u{FFFE}d"), "abcd");
    assert_eq!(sanitize_xml_text("line\nbreak\ttab\r"), "line\nbreak\ttab\r");
    assert_eq!(sanitize_xml_text("emoji \u{1F426}"), "emoji \u{1F426}");
  }

  #[test]
  fn test_control_chars_never_reach_output() {
    let feed = feed_with_control_chars();
    for format in [FeedFormat::Rss, FeedFormat::Atom] {
      let xml = feed.serialize(format).unwrap();
      for c in ['\u{0}', '\u{7}', '\u{0B}', '\u{1B}', '\u{FFFF}'] {
        assert!(!xml.contains(c), "{format:?} output contains {c:?}");
      }
      assert!(xml.contains("tab\tvtescnulend"), "{xml}");
    }
  }

  #[test]
  fn test_content_types() {
    assert_eq!(
      FeedFormat::Rss.content_type(),
      "application/rss+xml; charset=utf-8"
    );
    assert_eq!(
      FeedFormat::Atom.content_type(),
      "application/atom+xml; charset=utf-8"
    );
  }
}
