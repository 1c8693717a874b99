use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Timestamp carried by the generic model. `None` means "not set".
pub type Timestamp = Option<DateTime<FixedOffset>>;

/// The generic, format-neutral feed.
///
/// Build one of these, then project it with [`Feed::to_atom`],
/// [`Feed::to_rss`], or [`Feed::to_json_feed`]. Projection only borrows the
/// feed, so the same value can be exported any number of times.
///
/// Empty strings mean "absent"; values that are present or absent as a
/// whole (`link`, `author`, `image`) are `Option`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Feed {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<Link>,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<Author>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated: Timestamp,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Timestamp,
    pub id: String,
    pub subtitle: String,
    pub items: Vec<Item>,
    pub copyright: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<Image>,
}

/// A single entry of a [`Feed`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Item {
    /// GUID in RSS, `id` in Atom and JSON Feed. May be empty.
    pub id: String,
    pub title: String,
    /// HTML-safe summary. `description` in RSS, `summary` in Atom.
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<Link>,
    /// Where the item was syndicated from.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<Link>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<Author>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Timestamp,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated: Timestamp,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enclosure: Option<Enclosure>,
    /// Full HTML body, distinct from `description`.
    pub content: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Link {
    pub href: String,
    pub rel: String,
    #[serde(rename = "type")]
    pub link_type: String,
    pub length: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Author {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Image {
    pub url: String,
    pub title: String,
    pub link: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
}

/// Media attachment (podcast audio, video, images).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Enclosure {
    pub url: String,
    /// Size in bytes, kept as text the way RSS carries it.
    pub length: String,
    #[serde(rename = "type")]
    pub enclosure_type: String,
}

impl Link {
    pub fn new(href: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            ..Self::default()
        }
    }
}

impl Author {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }
}

impl Feed {
    /// Appends an item, keeping insertion order.
    pub fn add(&mut self, item: Item) {
        self.items.push(item);
    }

    /// Stable-sorts items with a caller-supplied comparator.
    ///
    /// Items that compare equal keep their relative order.
    ///
    /// ```
    /// use feedsmith::{Feed, Item};
    ///
    /// let mut feed = Feed::default();
    /// feed.add(Item { title: "b".into(), ..Item::default() });
    /// feed.add(Item { title: "a".into(), ..Item::default() });
    /// feed.sort(|a, b| a.title.cmp(&b.title));
    /// assert_eq!(feed.items[0].title, "a");
    /// ```
    pub fn sort<F>(&mut self, compare: F)
    where
        F: FnMut(&Item, &Item) -> Ordering,
    {
        self.items.sort_by(compare);
    }
}
