//! RSS 2.0 projection, with the `content:encoded` extension.
//!
//! Field requirements follow <https://www.rssboard.org/rss-specification>:
//! `title`, `link` and `description` are always written on the channel and
//! on every item, everything else is omitted when empty.

use quick_xml::Writer;
use std::io::Write;

use super::model::{Feed, Item};
use crate::export::xml::{
    cdata_element, empty_element, end_element, optional_text_element, start_element, text_element,
};
use crate::export::{ExportError, XmlDocument};
use crate::util::{any_time_format, TimeFormat};

pub const RSS_VERSION: &str = "2.0";
pub const CONTENT_NAMESPACE: &str = "http://purl.org/rss/1.0/modules/content/";

/// `<rss>` wrapper around the channel.
#[derive(Debug, Clone, PartialEq)]
pub struct RssEnvelope {
    pub version: String,
    pub content_namespace: String,
    pub channel: RssFeed,
}

/// The `<channel>` element.
#[derive(Debug, Clone, PartialEq)]
pub struct RssFeed {
    pub title: String,
    pub link: String,
    pub description: String,
    pub copyright: String,
    /// `email (name)`; RSS has no structured author.
    pub managing_editor: String,
    /// Created, falling back to updated.
    pub pub_date: String,
    /// Updated only.
    pub last_build_date: String,
    pub image: Option<RssImage>,
    pub items: Vec<RssItem>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RssItem {
    pub title: String,
    pub link: String,
    pub description: String,
    /// Raw HTML written as CDATA under `content:encoded`.
    pub content: Option<String>,
    pub author: String,
    pub enclosure: Option<RssEnclosure>,
    pub guid: String,
    pub pub_date: String,
    pub source: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RssImage {
    pub url: String,
    pub title: String,
    pub link: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RssEnclosure {
    pub url: String,
    pub length: String,
    pub enclosure_type: String,
}

impl From<RssFeed> for RssEnvelope {
    fn from(channel: RssFeed) -> Self {
        RssEnvelope {
            version: RSS_VERSION.to_string(),
            content_namespace: CONTENT_NAMESPACE.to_string(),
            channel,
        }
    }
}

impl From<&Feed> for RssFeed {
    fn from(feed: &Feed) -> Self {
        let managing_editor = match &feed.author {
            Some(a) if !a.email.is_empty() && !a.name.is_empty() => {
                format!("{} ({})", a.email, a.name)
            }
            Some(a) => a.email.clone(),
            None => String::new(),
        };

        RssFeed {
            title: feed.title.clone(),
            link: feed.link.as_ref().map(|l| l.href.clone()).unwrap_or_default(),
            description: feed.description.clone(),
            copyright: feed.copyright.clone(),
            managing_editor,
            pub_date: any_time_format(TimeFormat::Rfc1123Z, &[feed.created, feed.updated]),
            last_build_date: any_time_format(TimeFormat::Rfc1123Z, &[feed.updated]),
            image: feed.image.as_ref().map(|i| RssImage {
                url: i.url.clone(),
                title: i.title.clone(),
                link: i.link.clone(),
                width: i.width,
                height: i.height,
            }),
            items: feed.items.iter().map(RssItem::from).collect(),
        }
    }
}

impl From<&Item> for RssItem {
    fn from(item: &Item) -> Self {
        let enclosure = match &item.enclosure {
            Some(e) if !e.enclosure_type.is_empty() && !e.length.is_empty() => Some(RssEnclosure {
                url: e.url.clone(),
                length: e.length.clone(),
                enclosure_type: e.enclosure_type.clone(),
            }),
            Some(e) => {
                tracing::debug!(url = %e.url, "Dropping enclosure without type and length");
                None
            }
            None => None,
        };

        RssItem {
            title: item.title.clone(),
            link: item.link.as_ref().map(|l| l.href.clone()).unwrap_or_default(),
            description: item.description.clone(),
            content: (!item.content.is_empty()).then(|| item.content.clone()),
            author: item.author.as_ref().map(|a| a.name.clone()).unwrap_or_default(),
            enclosure,
            guid: item.id.clone(),
            pub_date: any_time_format(TimeFormat::Rfc1123Z, &[item.created, item.updated]),
            source: item.source.as_ref().map(|s| s.href.clone()).unwrap_or_default(),
        }
    }
}

impl XmlDocument for RssEnvelope {
    fn write_root<W: Write>(&self, writer: &mut Writer<W>) -> Result<(), ExportError> {
        start_element(
            writer,
            "rss",
            &[
                ("version", self.version.as_str()),
                ("xmlns:content", self.content_namespace.as_str()),
            ],
        )?;
        self.channel.write(writer)?;
        end_element(writer, "rss")
    }
}

impl RssFeed {
    fn write<W: Write>(&self, writer: &mut Writer<W>) -> Result<(), ExportError> {
        start_element(writer, "channel", &[])?;
        text_element(writer, "title", &self.title)?;
        text_element(writer, "link", &self.link)?;
        text_element(writer, "description", &self.description)?;
        optional_text_element(writer, "copyright", &self.copyright)?;
        optional_text_element(writer, "managingEditor", &self.managing_editor)?;
        optional_text_element(writer, "pubDate", &self.pub_date)?;
        optional_text_element(writer, "lastBuildDate", &self.last_build_date)?;
        if let Some(image) = &self.image {
            image.write(writer)?;
        }
        for item in &self.items {
            item.write(writer)?;
        }
        end_element(writer, "channel")
    }
}

impl RssItem {
    fn write<W: Write>(&self, writer: &mut Writer<W>) -> Result<(), ExportError> {
        start_element(writer, "item", &[])?;
        text_element(writer, "title", &self.title)?;
        text_element(writer, "link", &self.link)?;
        text_element(writer, "description", &self.description)?;
        if let Some(content) = &self.content {
            cdata_element(writer, "content:encoded", content)?;
        }
        optional_text_element(writer, "author", &self.author)?;
        if let Some(enclosure) = &self.enclosure {
            empty_element(
                writer,
                "enclosure",
                &[
                    ("url", enclosure.url.as_str()),
                    ("length", enclosure.length.as_str()),
                    ("type", enclosure.enclosure_type.as_str()),
                ],
                &["url", "length", "type"],
            )?;
        }
        optional_text_element(writer, "guid", &self.guid)?;
        optional_text_element(writer, "pubDate", &self.pub_date)?;
        optional_text_element(writer, "source", &self.source)?;
        end_element(writer, "item")
    }
}

impl RssImage {
    fn write<W: Write>(&self, writer: &mut Writer<W>) -> Result<(), ExportError> {
        start_element(writer, "image", &[])?;
        text_element(writer, "url", &self.url)?;
        text_element(writer, "title", &self.title)?;
        text_element(writer, "link", &self.link)?;
        if let Some(width) = self.width {
            text_element(writer, "width", &width.to_string())?;
        }
        if let Some(height) = self.height {
            text_element(writer, "height", &height.to_string())?;
        }
        end_element(writer, "image")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::{to_xml_string, ExportOptions};
    use crate::feed::{Author, Enclosure, Image, Link};
    use chrono::DateTime;
    use pretty_assertions::assert_eq;

    fn ts(s: &str) -> crate::feed::Timestamp {
        Some(DateTime::parse_from_rfc3339(s).unwrap())
    }

    fn feed_with_author(author: Option<Author>) -> Feed {
        Feed {
            title: "Blog".to_string(),
            author,
            ..Feed::default()
        }
    }

    fn compact(feed: &Feed) -> String {
        to_xml_string(&feed.to_rss(), &ExportOptions { indent: 0 }).unwrap()
    }

    #[test]
    fn test_managing_editor_email_and_name() {
        let rss = RssFeed::from(&feed_with_author(Some(Author::new("Jane", "j@x.com"))));
        assert_eq!(rss.managing_editor, "j@x.com (Jane)");
    }

    #[test]
    fn test_managing_editor_email_only() {
        let rss = RssFeed::from(&feed_with_author(Some(Author::new("", "j@x.com"))));
        assert_eq!(rss.managing_editor, "j@x.com");
    }

    #[test]
    fn test_managing_editor_absent() {
        assert_eq!(RssFeed::from(&feed_with_author(None)).managing_editor, "");
        let name_only = RssFeed::from(&feed_with_author(Some(Author::new("Jane", ""))));
        assert_eq!(name_only.managing_editor, "");
    }

    #[test]
    fn test_dates_fallback_order() {
        let feed = Feed {
            created: ts("2020-01-02T03:04:05Z"),
            updated: ts("2021-01-02T03:04:05Z"),
            ..Feed::default()
        };
        let rss = RssFeed::from(&feed);
        assert_eq!(rss.pub_date, "Thu, 02 Jan 2020 03:04:05 +0000");
        assert_eq!(rss.last_build_date, "Sat, 02 Jan 2021 03:04:05 +0000");

        let updated_only = Feed {
            updated: ts("2021-01-02T03:04:05Z"),
            ..Feed::default()
        };
        let rss = RssFeed::from(&updated_only);
        assert_eq!(rss.pub_date, "Sat, 02 Jan 2021 03:04:05 +0000");

        let created_only = Feed {
            created: ts("2020-01-02T03:04:05Z"),
            ..Feed::default()
        };
        assert_eq!(RssFeed::from(&created_only).last_build_date, "");
    }

    #[test]
    fn test_item_pub_date_prefers_created() {
        let item = Item {
            created: ts("2020-01-02T03:04:05Z"),
            updated: ts("2021-01-02T03:04:05Z"),
            ..Item::default()
        };
        assert_eq!(
            RssItem::from(&item).pub_date,
            "Thu, 02 Jan 2020 03:04:05 +0000"
        );
    }

    #[test]
    fn test_guid_is_verbatim() {
        let item = Item {
            link: Some(Link::new("http://example.com/a")),
            created: ts("2020-01-02T00:00:00Z"),
            ..Item::default()
        };
        assert_eq!(RssItem::from(&item).guid, "");
    }

    #[test]
    fn test_partial_enclosure_dropped() {
        let item = Item {
            enclosure: Some(Enclosure {
                url: "http://example.com/a.mp3".to_string(),
                ..Enclosure::default()
            }),
            ..Item::default()
        };
        assert!(RssItem::from(&item).enclosure.is_none());

        let mut feed = Feed::default();
        feed.add(item);
        assert!(!compact(&feed).contains("<enclosure"));
    }

    #[test]
    fn test_type_without_length_dropped() {
        let item = Item {
            enclosure: Some(Enclosure {
                url: "http://example.com/a.mp3".to_string(),
                enclosure_type: "audio/mpeg".to_string(),
                ..Enclosure::default()
            }),
            ..Item::default()
        };
        assert!(RssItem::from(&item).enclosure.is_none());
    }

    #[test]
    fn test_full_enclosure_written_as_attributes() {
        let mut feed = Feed::default();
        feed.add(Item {
            enclosure: Some(Enclosure {
                url: "http://example.com/a.mp3".to_string(),
                length: "1234".to_string(),
                enclosure_type: "audio/mpeg".to_string(),
            }),
            ..Item::default()
        });
        assert!(compact(&feed).contains(
            r#"<enclosure url="http://example.com/a.mp3" length="1234" type="audio/mpeg"/>"#
        ));
    }

    #[test]
    fn test_content_and_description_both_written() {
        let mut feed = Feed::default();
        feed.add(Item {
            title: "Post".to_string(),
            description: "Summary".to_string(),
            content: "<p>Full & body</p>".to_string(),
            ..Item::default()
        });
        let xml = compact(&feed);
        assert!(xml.contains("<description>Summary</description>"));
        assert!(xml.contains("<content:encoded><![CDATA[<p>Full & body</p>]]></content:encoded>"));
    }

    #[test]
    fn test_no_content_no_encoded_element() {
        let mut feed = Feed::default();
        feed.add(Item::default());
        let xml = compact(&feed);
        assert!(!xml.contains("content:encoded>"));
        assert!(xml.contains("<item><title></title><link></link><description></description></item>"));
    }

    #[test]
    fn test_envelope_attributes() {
        let xml = compact(&Feed::default());
        assert!(xml.contains(
            r#"<rss version="2.0" xmlns:content="http://purl.org/rss/1.0/modules/content/"><channel>"#
        ));
        assert!(xml.ends_with("</channel></rss>"));
    }

    #[test]
    fn test_image_copied() {
        let feed = Feed {
            image: Some(Image {
                url: "http://example.com/logo.png".to_string(),
                title: "Logo".to_string(),
                link: "http://example.com".to_string(),
                width: Some(88),
                height: None,
            }),
            ..Feed::default()
        };
        let rss = RssFeed::from(&feed);
        assert_eq!(
            rss.image,
            Some(RssImage {
                url: "http://example.com/logo.png".to_string(),
                title: "Logo".to_string(),
                link: "http://example.com".to_string(),
                width: Some(88),
                height: None,
            })
        );
        let xml = compact(&feed);
        assert!(xml.contains("<width>88</width>"));
        assert!(!xml.contains("<height>"));

        assert!(RssFeed::from(&Feed::default()).image.is_none());
    }

    #[test]
    fn test_item_author_and_source() {
        let item = Item {
            author: Some(Author::new("Jane", "j@x.com")),
            source: Some(Link::new("http://origin.example/feed")),
            ..Item::default()
        };
        let rss = RssItem::from(&item);
        assert_eq!(rss.author, "Jane");
        assert_eq!(rss.source, "http://origin.example/feed");
    }
}
