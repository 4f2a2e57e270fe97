use quick_xml::events::BytesStart;

use crate::error::Result;
use crate::util::date::format_updated;

use super::{Feed, Post, XmlWriter, empty, end, start, text_element};

const ATOM_NS: &str = "http://www.w3.org/2005/Atom";

pub(super) fn write_feed(writer: &mut XmlWriter, feed: &Feed) -> Result<()> {
  start(writer, BytesStart::new("feed").with_attributes([("xmlns", ATOM_NS)]))?;

  let self_link = feed.self_link().as_str();
  text_element(writer, "title", &[], feed.title())?;
  text_element(writer, "id", &[], self_link)?;
  empty(
    writer,
    BytesStart::new("link").with_attributes([("rel", "self"), ("href", self_link)]),
  )?;

  // the epoch keeps an empty feed's output stable
  let updated = feed
    .posts()
    .iter()
    .map(|post| *post.created_at())
    .max()
    .unwrap_or_default();
  text_element(writer, "updated", &[], &format_updated(&updated))?;

  for post in feed.posts() {
    write_entry(writer, post)?;
  }

  end(writer, "feed")
}

fn write_entry(writer: &mut XmlWriter, post: &Post) -> Result<()> {
  start(writer, BytesStart::new("entry"))?;
  text_element(writer, "title", &[], &format!("@{}", post.author_handle()))?;
  text_element(writer, "id", &[], post.url())?;
  empty(writer, BytesStart::new("link").with_attributes([("href", post.url())]))?;
  text_element(writer, "updated", &[], &format_updated(post.created_at()))?;
  if let Some(text) = post.text() {
    text_element(writer, "content", &[("type", "text")], text)?;
  }
  end(writer, "entry")
}
