//! Serialization of projected documents.
//!
//! Projection ([`crate::feed`]) never fails; this is the only layer that can.
//! XML documents get an `<?xml version="1.0" encoding="UTF-8"?>` declaration
//! and indentation, JSON Feed documents are pretty-printed with a trailing
//! newline. Encoding errors are returned as-is, never retried.
//!
//! # Example
//!
//! ```
//! use feedsmith::export::{render, ExportOptions, FeedFormat};
//! use feedsmith::{Feed, Link};
//!
//! let feed = Feed {
//!     title: "Example".into(),
//!     link: Some(Link::new("https://example.com/")),
//!     ..Feed::default()
//! };
//! let xml = render(&feed, FeedFormat::Rss, &ExportOptions::default()).unwrap();
//! assert!(xml.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
//! ```

mod file;
pub(crate) mod xml;

use clap::ValueEnum;
use quick_xml::events::{BytesDecl, Event};
use quick_xml::Writer;
use serde::{Deserialize, Serialize};
use std::io::Write;
use thiserror::Error;

use crate::feed::{Feed, JsonFeed};

pub use file::export_to_file;

/// Errors surfaced while encoding a projected document.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Failed to write output: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON encoding error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Generated document contains invalid UTF-8")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// The closed set of wire formats a [`Feed`] can be exported as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FeedFormat {
    #[default]
    Atom,
    Rss,
    Json,
}

impl FeedFormat {
    pub const ALL: [FeedFormat; 3] = [FeedFormat::Atom, FeedFormat::Rss, FeedFormat::Json];

    /// Conventional file extension for `--out-dir` output.
    pub fn extension(self) -> &'static str {
        match self {
            FeedFormat::Atom => "atom",
            FeedFormat::Rss => "rss",
            FeedFormat::Json => "json",
        }
    }
}

/// Knobs for the writer layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOptions {
    /// Spaces per nesting level. 0 writes compact output.
    pub indent: usize,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self { indent: 2 }
    }
}

/// A projected tree that knows how to emit itself as XML elements.
///
/// Implemented by [`crate::feed::AtomFeed`] and [`crate::feed::RssEnvelope`].
pub trait XmlDocument {
    /// Writes the root element and everything under it. The declaration is
    /// written by [`write_xml`].
    fn write_root<W: Write>(&self, writer: &mut Writer<W>) -> Result<(), ExportError>;
}

/// Writes `doc` as an XML document, declaration first.
pub fn write_xml<D, W>(doc: &D, out: W, options: &ExportOptions) -> Result<(), ExportError>
where
    D: XmlDocument,
    W: Write,
{
    let mut writer = if options.indent == 0 {
        Writer::new(out)
    } else {
        Writer::new_with_indent(out, b' ', options.indent)
    };
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    doc.write_root(&mut writer)?;
    Ok(())
}

pub fn to_xml_string<D: XmlDocument>(doc: &D, options: &ExportOptions) -> Result<String, ExportError> {
    let mut buf = Vec::new();
    write_xml(doc, &mut buf, options)?;
    Ok(String::from_utf8(buf)?)
}

/// Writes a JSON Feed document followed by a newline.
pub fn write_json<W: Write>(
    feed: &JsonFeed,
    mut out: W,
    options: &ExportOptions,
) -> Result<(), ExportError> {
    if options.indent == 0 {
        serde_json::to_writer(&mut out, feed)?;
    } else {
        let indent = vec![b' '; options.indent];
        let formatter = serde_json::ser::PrettyFormatter::with_indent(&indent);
        let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
        feed.serialize(&mut serializer)?;
    }
    out.write_all(b"\n")?;
    Ok(())
}

pub fn to_json_string(feed: &JsonFeed, options: &ExportOptions) -> Result<String, ExportError> {
    let mut buf = Vec::new();
    write_json(feed, &mut buf, options)?;
    Ok(String::from_utf8(buf)?)
}

/// Projects `feed` into `format` and serializes the result.
pub fn render(feed: &Feed, format: FeedFormat, options: &ExportOptions) -> Result<String, ExportError> {
    tracing::debug!(?format, items = feed.items.len(), "Rendering feed");
    match format {
        FeedFormat::Atom => to_xml_string(&feed.to_atom(), options),
        FeedFormat::Rss => to_xml_string(&feed.to_rss(), options),
        FeedFormat::Json => to_json_string(&feed.to_json_feed(), options),
    }
}
