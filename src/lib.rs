//! Build one generic syndication feed and export it as Atom, RSS 2.0, or
//! JSON Feed.
//!
//! - [`feed`] - the generic model and the three projectors
//! - [`export`] - XML/JSON serialization of projected documents
//! - [`source`] - loading feed definitions from TOML or JSON files
//! - [`config`] - optional `config.toml` for the `feedsmith` binary

pub mod config;
pub mod export;
pub mod feed;
pub mod source;
pub mod util;

pub use feed::{Author, Enclosure, Feed, Image, Item, Link};
