//! Generic feed model and its projections onto the three wire formats.
//!
//! A [`Feed`] is format-neutral. Each projector reads it and builds an
//! independent output tree:
//!
//! - [`atom`] - `Feed` -> [`AtomFeed`], including tag-URI id synthesis
//! - [`rss`] - `Feed` -> [`RssEnvelope`] (`<rss>` around an [`RssFeed`])
//! - [`json`] - `Feed` -> [`JsonFeed`]
//!
//! Projections only borrow the feed and never fail. The same `&Feed` can be
//! projected repeatedly, or from several threads at once; the output trees
//! share nothing with it.
//!
//! # Example
//!
//! ```
//! use feedsmith::{Feed, Item, Link};
//!
//! let mut feed = Feed {
//!     title: "Release notes".into(),
//!     link: Some(Link::new("https://example.com/")),
//!     ..Feed::default()
//! };
//! feed.add(Item {
//!     id: "v1".into(),
//!     title: "1.0 released".into(),
//!     ..Item::default()
//! });
//!
//! assert_eq!(feed.to_atom().entries.len(), 1);
//! assert_eq!(feed.to_rss().channel.items[0].guid, "v1");
//! assert_eq!(feed.to_json_feed().items[0].id, "v1");
//! ```

pub mod atom;
pub mod json;
mod model;
pub mod rss;

pub use atom::{AtomEntry, AtomFeed, AtomLink, AtomPerson, AtomText};
pub use json::{JsonAttachment, JsonAuthor, JsonFeed, JsonItem};
pub use model::{Author, Enclosure, Feed, Image, Item, Link, Timestamp};
pub use rss::{RssEnclosure, RssEnvelope, RssFeed, RssImage, RssItem};

impl Feed {
    /// Projects this feed onto the Atom schema.
    pub fn to_atom(&self) -> AtomFeed {
        AtomFeed::from(self)
    }

    /// Projects this feed onto RSS 2.0, wrapped in its `<rss>` envelope.
    pub fn to_rss(&self) -> RssEnvelope {
        RssEnvelope::from(RssFeed::from(self))
    }

    /// Projects this feed onto JSON Feed v1.
    pub fn to_json_feed(&self) -> JsonFeed {
        JsonFeed::from(self)
    }
}
