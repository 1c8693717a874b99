//! Atom (RFC 4287) projection.

use quick_xml::Writer;
use std::io::Write;
use url::Url;

use super::model::{Feed, Item};
use crate::export::xml::{
    empty_element, end_element, optional_text_element, start_element, text_element,
    text_element_with_attributes,
};
use crate::export::{ExportError, XmlDocument};
use crate::util::{any_time_format, TimeFormat};

pub const ATOM_NAMESPACE: &str = "http://www.w3.org/2005/Atom";

/// Path used in synthesized tag URIs when the item link can't be parsed.
const INVALID_PATH: &str = "/invalid.html";

/// `<feed>` root. `title`, `id` and `updated` are required by the schema and
/// always written, even when empty.
#[derive(Debug, Clone, PartialEq)]
pub struct AtomFeed {
    pub xmlns: String,
    pub title: String,
    pub id: String,
    pub updated: String,
    pub rights: String,
    pub subtitle: String,
    pub link: Option<AtomLink>,
    pub author: Option<AtomPerson>,
    pub entries: Vec<AtomEntry>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AtomEntry {
    pub title: String,
    pub updated: String,
    pub id: String,
    pub content: Option<AtomText>,
    pub published: String,
    /// Several links with different `rel` may coexist.
    pub links: Vec<AtomLink>,
    pub summary: Option<AtomText>,
    pub author: Option<AtomPerson>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AtomLink {
    pub href: String,
    pub rel: String,
    pub link_type: String,
    pub length: String,
}

/// Text construct used for `<summary>` and `<content>`.
#[derive(Debug, Clone, PartialEq)]
pub struct AtomText {
    pub content: String,
    pub text_type: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AtomPerson {
    pub name: String,
    pub email: String,
}

impl AtomText {
    fn html(content: &str) -> Self {
        Self {
            content: content.to_string(),
            text_type: "html".to_string(),
        }
    }
}

impl From<&Feed> for AtomFeed {
    fn from(feed: &Feed) -> Self {
        let link = feed.link.as_ref();
        AtomFeed {
            xmlns: ATOM_NAMESPACE.to_string(),
            title: feed.title.clone(),
            id: link.map(|l| l.href.clone()).unwrap_or_default(),
            updated: any_time_format(TimeFormat::Rfc3339, &[feed.updated, feed.created]),
            rights: feed.copyright.clone(),
            subtitle: feed.description.clone(),
            link: link.map(|l| AtomLink {
                href: l.href.clone(),
                rel: l.rel.clone(),
                ..AtomLink::default()
            }),
            author: feed.author.as_ref().map(|a| AtomPerson {
                name: a.name.clone(),
                email: a.email.clone(),
            }),
            entries: feed.items.iter().map(AtomEntry::from).collect(),
        }
    }
}

impl From<&Item> for AtomEntry {
    fn from(item: &Item) -> Self {
        let id = if item.id.is_empty() {
            synthesize_tag_id(item)
        } else {
            item.id.clone()
        };

        let rel = match item.link.as_ref() {
            Some(link) if !link.rel.is_empty() => link.rel.as_str(),
            _ => "alternate",
        };

        let mut links = Vec::with_capacity(2);
        if let Some(link) = &item.link {
            links.push(AtomLink {
                href: link.href.clone(),
                rel: rel.to_string(),
                link_type: link.link_type.clone(),
                ..AtomLink::default()
            });
        }
        if let Some(enclosure) = item.enclosure.as_ref().filter(|_| rel != "enclosure") {
            links.push(AtomLink {
                href: enclosure.url.clone(),
                rel: "enclosure".to_string(),
                link_type: enclosure.enclosure_type.clone(),
                length: enclosure.length.clone(),
            });
        }

        let author = item
            .author
            .as_ref()
            .filter(|a| !a.name.is_empty() || !a.email.is_empty())
            .map(|a| AtomPerson {
                name: a.name.clone(),
                email: a.email.clone(),
            });

        AtomEntry {
            title: item.title.clone(),
            updated: any_time_format(TimeFormat::Rfc3339, &[item.updated, item.created]),
            id,
            content: (!item.content.is_empty()).then(|| AtomText::html(&item.content)),
            published: any_time_format(TimeFormat::Rfc3339, &[item.created]),
            links,
            summary: Some(AtomText::html(&item.description)),
            author,
        }
    }
}

/// Builds a `tag:{host},{date}:{path}` identifier for an item without one.
///
/// Needs a non-empty link href and at least one timestamp; otherwise the id
/// stays empty. Two such items will share the empty id.
fn synthesize_tag_id(item: &Item) -> String {
    let href = match item.link.as_ref() {
        Some(link) if !link.href.is_empty() => link.href.as_str(),
        _ => return String::new(),
    };
    if item.updated.is_none() && item.created.is_none() {
        return String::new();
    }

    let date = any_time_format(TimeFormat::Date, &[item.updated, item.created]);
    let (host, path) = match split_link(href) {
        Ok(parts) => parts,
        Err(e) => {
            tracing::debug!(
                href = %href,
                error = %e,
                "Unparseable item link, using fallback tag path"
            );
            (href.to_string(), INVALID_PATH.to_string())
        }
    };
    format!("tag:{host},{date}:{path}")
}

/// Splits a link into its host (with any port, as written) and its decoded
/// path. Relative references have an empty host and keep the whole reference
/// as path. Opaque URLs such as `mailto:` have neither.
fn split_link(href: &str) -> Result<(String, String), url::ParseError> {
    let url = match Url::parse(href) {
        Ok(url) => url,
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            return Ok((String::new(), decode_path(strip_query(href))));
        }
        Err(e) => return Err(e),
    };
    if url.cannot_be_a_base() {
        return Ok((String::new(), String::new()));
    }

    // `Url` normalizes host case, default ports and empty paths, so both
    // parts are read back from the href as written.
    let rest = href.get(url.scheme().len() + 1..).unwrap_or_default();
    let Some(after_slashes) = rest.strip_prefix("//") else {
        let path = if rest.starts_with('/') {
            decode_path(strip_query(rest))
        } else {
            String::new()
        };
        return Ok((String::new(), path));
    };
    let end = after_slashes
        .find(['/', '?', '#'])
        .unwrap_or(after_slashes.len());
    let (authority, tail) = after_slashes.split_at(end);
    let host = authority.rsplit('@').next().unwrap_or_default();
    Ok((host.to_string(), decode_path(strip_query(tail))))
}

fn strip_query(reference: &str) -> &str {
    let end = reference.find(['?', '#']).unwrap_or(reference.len());
    &reference[..end]
}

fn decode_path(path: &str) -> String {
    urlencoding::decode(path)
        .map(|decoded| decoded.into_owned())
        .unwrap_or_else(|_| path.to_string())
}

impl XmlDocument for AtomFeed {
    fn write_root<W: Write>(&self, writer: &mut Writer<W>) -> Result<(), ExportError> {
        start_element(writer, "feed", &[("xmlns", self.xmlns.as_str())])?;
        text_element(writer, "title", &self.title)?;
        text_element(writer, "id", &self.id)?;
        text_element(writer, "updated", &self.updated)?;
        optional_text_element(writer, "rights", &self.rights)?;
        optional_text_element(writer, "subtitle", &self.subtitle)?;
        if let Some(link) = &self.link {
            link.write(writer)?;
        }
        if let Some(author) = &self.author {
            author.write(writer)?;
        }
        for entry in &self.entries {
            entry.write(writer)?;
        }
        end_element(writer, "feed")
    }
}

impl AtomEntry {
    fn write<W: Write>(&self, writer: &mut Writer<W>) -> Result<(), ExportError> {
        start_element(writer, "entry", &[])?;
        text_element(writer, "title", &self.title)?;
        text_element(writer, "updated", &self.updated)?;
        text_element(writer, "id", &self.id)?;
        if let Some(content) = &self.content {
            content.write(writer, "content")?;
        }
        optional_text_element(writer, "published", &self.published)?;
        for link in &self.links {
            link.write(writer)?;
        }
        if let Some(summary) = &self.summary {
            summary.write(writer, "summary")?;
        }
        if let Some(author) = &self.author {
            author.write(writer)?;
        }
        end_element(writer, "entry")
    }
}

impl AtomLink {
    fn write<W: Write>(&self, writer: &mut Writer<W>) -> Result<(), ExportError> {
        empty_element(
            writer,
            "link",
            &[
                ("href", self.href.as_str()),
                ("rel", self.rel.as_str()),
                ("type", self.link_type.as_str()),
                ("length", self.length.as_str()),
            ],
            &["href"],
        )
    }
}

impl AtomText {
    fn write<W: Write>(&self, writer: &mut Writer<W>, name: &str) -> Result<(), ExportError> {
        text_element_with_attributes(
            writer,
            name,
            &[("type", self.text_type.as_str())],
            &self.content,
        )
    }
}

impl AtomPerson {
    fn write<W: Write>(&self, writer: &mut Writer<W>) -> Result<(), ExportError> {
        start_element(writer, "author", &[])?;
        optional_text_element(writer, "name", &self.name)?;
        optional_text_element(writer, "email", &self.email)?;
        end_element(writer, "author")
    }
}
