//! JSON Feed v1 projection. See <https://jsonfeed.org/version/1>.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use super::model::{Feed, Item};

pub const JSON_FEED_VERSION: &str = "https://jsonfeed.org/version/1";

/// Top-level JSON Feed object. Optional members are omitted, never `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonFeed {
    pub version: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub home_page_url: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<JsonAuthor>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<JsonItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonItem {
    /// Always serialized, even when empty.
    pub id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub url: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub external_url: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub title: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub content_html: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub summary: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_published: Option<DateTime<FixedOffset>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_modified: Option<DateTime<FixedOffset>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<JsonAuthor>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<JsonAttachment>,
}

/// JSON Feed authors carry no email.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonAuthor {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
}

/// Related resource, e.g. the audio file of a podcast episode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonAttachment {
    pub url: String,
    pub mime_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size_in_bytes: Option<u64>,
}

impl From<&Feed> for JsonFeed {
    fn from(feed: &Feed) -> Self {
        JsonFeed {
            version: JSON_FEED_VERSION.to_string(),
            title: feed.title.clone(),
            home_page_url: feed.link.as_ref().map(|l| l.href.clone()).unwrap_or_default(),
            description: feed.description.clone(),
            author: feed.author.as_ref().map(|a| JsonAuthor {
                name: a.name.clone(),
            }),
            items: feed.items.iter().map(JsonItem::from).collect(),
        }
    }
}

impl From<&Item> for JsonItem {
    fn from(item: &Item) -> Self {
        let mut image = String::new();
        let mut attachments = Vec::new();
        if let Some(enclosure) = &item.enclosure {
            if enclosure.enclosure_type.starts_with("image/") {
                image = enclosure.url.clone();
            } else {
                attachments.push(JsonAttachment {
                    url: enclosure.url.clone(),
                    mime_type: enclosure.enclosure_type.clone(),
                    size_in_bytes: enclosure.length.trim().parse().ok(),
                });
            }
        }

        JsonItem {
            id: item.id.clone(),
            url: item.link.as_ref().map(|l| l.href.clone()).unwrap_or_default(),
            external_url: item.source.as_ref().map(|s| s.href.clone()).unwrap_or_default(),
            title: item.title.clone(),
            content_html: item.content.clone(),
            summary: item.description.clone(),
            image,
            date_published: item.created,
            date_modified: item.updated,
            author: item.author.as_ref().map(|a| JsonAuthor {
                name: a.name.clone(),
            }),
            attachments,
        }
    }
}
