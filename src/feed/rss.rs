use quick_xml::events::BytesStart;

use crate::error::Result;
use crate::util::date::format_pub_date;

use super::{Feed, Post, XmlWriter, end, start, text_element};

/// Feed readers may poll once an hour.
const TTL_MINUTES: &str = "60";

pub(super) fn write_channel(writer: &mut XmlWriter, feed: &Feed) -> Result<()> {
  start(writer, BytesStart::new("rss").with_attributes([("version", "2.0")]))?;
  start(writer, BytesStart::new("channel"))?;

  text_element(writer, "title", &[], feed.title())?;
  text_element(writer, "description", &[], feed.title())?;
  text_element(writer, "link", &[], feed.self_link().as_str())?;
  text_element(writer, "ttl", &[], TTL_MINUTES)?;

  for post in feed.posts() {
    write_item(writer, post)?;
  }

  end(writer, "channel")?;
  end(writer, "rss")
}

fn write_item(writer: &mut XmlWriter, post: &Post) -> Result<()> {
  start(writer, BytesStart::new("item"))?;
  text_element(writer, "link", &[], post.url())?;
  text_element(writer, "guid", &[("isPermaLink", "true")], post.url())?;
  text_element(writer, "pubDate", &[], &format_pub_date(post.created_at()))?;
  if let Some(text) = post.text() {
    text_element(writer, "description", &[], text)?;
  }
  end(writer, "item")
}

#[cfg(test)]
mod tests {
  use crate::feed::FeedFormat;
  use crate::feed::tests::{feed_with_control_chars, sample_feed};

  fn render() -> String {
    sample_feed().serialize(FeedFormat::Rss).unwrap()
  }

  #[test]
  fn test_rss_layout() {
    let expected = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>Twitter list 42</title>
    <description>Twitter list 42</description>
    <link>http://localhost:8080/42</link>
    <ttl>60</ttl>
    <item>
      <link>https://twitter.com/alice/status/1003</link>
      <guid isPermaLink="true">https://twitter.com/alice/status/1003</guid>
      <pubDate>Mon, 3 Jan 2022 10:00:00 Z</pubDate>
      <description>Fish &amp; chips &lt;3</description>
    </item>
    <item>
      <link>https://twitter.com/carol/status/1001</link>
      <guid isPermaLink="true">https://twitter.com/carol/status/1001</guid>
      <pubDate>Sat, 1 Jan 2022 00:00:00 Z</pubDate>
    </item>
  </channel>
</rss>"#;

    assert_eq!(render(), expected);
  }

  #[test]
  fn test_rss_parses_back() {
    let xml = render();
    let channel = ::rss::Channel::read_from(xml.as_bytes()).unwrap();

    assert_eq!(channel.title(), "Twitter list 42");
    assert_eq!(channel.description(), "Twitter list 42");
    assert_eq!(channel.ttl(), Some("60"));

    let links: Vec<_> = channel.items().iter().filter_map(|i| i.link()).collect();
    assert_eq!(
      links,
      vec![
        "https://twitter.com/alice/status/1003",
        "https://twitter.com/carol/status/1001"
      ]
    );

    let first = &channel.items()[0];
    assert_eq!(first.description(), Some("Fish & chips <3"));
    assert!(first.guid().unwrap().is_permalink());
    assert_eq!(channel.items()[1].description(), None);
  }

  #[test]
  fn test_rss_with_control_chars_is_well_formed() {
    let xml = feed_with_control_chars().serialize(FeedFormat::Rss).unwrap();
    let channel = ::rss::Channel::read_from(xml.as_bytes()).unwrap();

    assert_eq!(channel.title(), "Twitter list 43");
    assert_eq!(
      channel.items()[0].description(),
      Some("tab\tvtescnulend")
    );
  }
}
