//! Decoding sitemap and sitemap index XML.
//!
//! Both shapes are a root element containing a flat list of entries, each
//! with a `<loc>` (and, for indexes, an optional `<lastmod>`):
//!
//! ```xml
//! <sitemapindex>                      <urlset>
//!   <sitemap>                           <url>
//!     <loc>…/sitemap-1.xml.gz</loc>       <loc>https://example.com/</loc>
//!     <lastmod>2024-01-01</lastmod>     </url>
//!   </sitemap>                        </urlset>
//! </sitemapindex>
//! ```
//!
//! Elements are matched on local name, so namespace prefixes don't matter.
//! Anything else (`<changefreq>`, `<image:image>`, extension namespaces) is
//! skipped. The declared encoding (or BOM) is honoured; without one the
//! input is read as UTF-8.

use crate::Document;
use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use quick_xml::events::Event;
use quick_xml::reader::Reader;
use std::io::BufRead;

/// One `<sitemap>` of a sitemap index.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IndexEntry {
    pub loc: String,
    /// Passed through as written; not validated.
    pub lastmod: Option<String>,
}

/// One `<url>` of a sitemap.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UrlEntry {
    pub loc: String,
}

/// Decode a `<sitemapindex>` document, in document order.
pub fn decode_index<R: BufRead>(input: R) -> Result<Vec<IndexEntry>> {
    let entries = Walker::new(Document::Index).run(input)?;
    Ok(entries.into_iter().map(|fields| IndexEntry { loc: fields.loc, lastmod: fields.lastmod }).collect())
}

/// Decode a `<urlset>` document, in document order.
///
/// ```
/// use sitemapped_sitemap::decode_leaf;
///
/// let xml = b"<urlset><url><loc> https://a.test/1 </loc></url></urlset>";
/// let urls = decode_leaf(&xml[..]).unwrap();
/// assert_eq!(urls[0].loc, "https://a.test/1");
/// ```
pub fn decode_leaf<R: BufRead>(input: R) -> Result<Vec<UrlEntry>> {
    let entries = Walker::new(Document::Leaf).run(input)?;
    Ok(entries.into_iter().map(|fields| UrlEntry { loc: fields.loc }).collect())
}

fn entry_element(document: Document) -> &'static [u8] {
    match document {
        Document::Index => b"sitemap",
        Document::Leaf => b"url",
    }
}

#[derive(Clone, Copy)]
enum Field {
    Loc,
    Lastmod,
}

#[derive(Default)]
struct Fields {
    loc: String,
    lastmod: Option<String>,
}

/// Tracks where in the document we are. Depth 1 is inside the root, 2 inside
/// an entry, 3 inside one of the entry's fields.
struct Walker {
    document: Document,
    depth: usize,
    seen_root: bool,
    entry: Option<Fields>,
    field: Option<Field>,
    text: String,
    entries: Vec<Fields>,
}

impl Walker {
    fn new(document: Document) -> Self {
        Self {
            document,
            depth: 0,
            seen_root: false,
            entry: None,
            field: None,
            text: String::new(),
            entries: Vec::new(),
        }
    }

    fn run<R: BufRead>(mut self, input: R) -> Result<Vec<Fields>> {
        let mut reader = Reader::from_reader(input);
        let mut buf = Vec::new();
        loop {
            match reader.read_event_into(&mut buf).or_raise(|| ErrorKind::Malformed)? {
                Event::Start(element) => self.open(element.local_name().as_ref())?,
                Event::Empty(element) => {
                    self.open(element.local_name().as_ref())?;
                    self.close();
                },
                Event::End(_) => self.close(),
                Event::Text(text) if self.field.is_some() => {
                    self.text.push_str(&text.unescape().or_raise(|| ErrorKind::Malformed)?);
                },
                Event::CData(data) if self.field.is_some() => {
                    self.text.push_str(&data.decode().or_raise(|| ErrorKind::Malformed)?);
                },
                Event::Eof => break,
                _ => {},
            }
            buf.clear();
        }
        if !self.seen_root {
            exn::bail!(ErrorKind::MissingRoot);
        }
        if self.depth > 0 {
            tracing::debug!(depth = self.depth, "Input ended with elements still open");
            exn::bail!(ErrorKind::Malformed);
        }
        Ok(self.entries)
    }

    fn open(&mut self, name: &[u8]) -> Result<()> {
        match self.depth {
            // A second top-level element.
            0 if self.seen_root => exn::bail!(ErrorKind::Malformed),
            0 if name != self.document.root_element().as_bytes() => exn::bail!(ErrorKind::UnexpectedRoot {
                expected: self.document.root_element(),
                found: String::from_utf8_lossy(name).into_owned(),
            }),
            0 => self.seen_root = true,
            1 if name == entry_element(self.document) => self.entry = Some(Fields::default()),
            2 if self.entry.is_some() => {
                self.field = match name {
                    b"loc" => Some(Field::Loc),
                    b"lastmod" => Some(Field::Lastmod),
                    _ => None,
                };
                self.text.clear();
            },
            _ => {},
        }
        self.depth += 1;
        Ok(())
    }

    fn close(&mut self) {
        self.depth = self.depth.saturating_sub(1);
        match self.depth {
            2 => {
                if let (Some(entry), Some(field)) = (self.entry.as_mut(), self.field.take()) {
                    let value = self.text.trim().to_string();
                    match field {
                        Field::Loc => entry.loc = value,
                        Field::Lastmod => entry.lastmod = Some(value),
                    }
                }
            },
            1 => {
                if let Some(entry) = self.entry.take() {
                    self.entries.push(entry);
                }
            },
            _ => {},
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn locs(xml: &[u8]) -> Vec<String> {
        decode_leaf(xml).unwrap().into_iter().map(|entry| entry.loc).collect()
    }

    #[test]
    fn test_leaf_in_document_order() {
        let xml = br#"<?xml version="1.0" encoding="UTF-8"?>
            <urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
                <url><loc>https://a.test/2</loc><changefreq>daily</changefreq></url>
                <url><loc>https://a.test/1</loc></url>
                <url><loc>https://a.test/3</loc><priority>0.5</priority></url>
            </urlset>"#;
        assert_eq!(locs(xml), ["https://a.test/2", "https://a.test/1", "https://a.test/3"]);
    }

    #[test]
    fn test_loc_is_trimmed() {
        let xml = b"<urlset><url><loc>\n\t  https://a.test/1\n  </loc></url></urlset>";
        assert_eq!(locs(xml), ["https://a.test/1"]);
    }

    #[test]
    fn test_entities_and_cdata_are_decoded() {
        let xml = b"<urlset>\
            <url><loc>https://a.test/?a=1&amp;b=2</loc></url>\
            <url><loc><![CDATA[https://a.test/?c=3&d=4]]></loc></url>\
            <url><loc>https://a.test/&#x41;</loc></url>\
        </urlset>";
        assert_eq!(locs(xml), ["https://a.test/?a=1&b=2", "https://a.test/?c=3&d=4", "https://a.test/A"]);
    }

    #[test]
    fn test_namespace_prefixes_are_ignored() {
        let xml = br#"<sm:urlset xmlns:sm="http://www.sitemaps.org/schemas/sitemap/0.9">
            <sm:url><sm:loc>https://a.test/1</sm:loc></sm:url>
        </sm:urlset>"#;
        assert_eq!(locs(xml), ["https://a.test/1"]);
    }

    #[test]
    fn test_extension_locs_are_not_page_urls() {
        let xml = br#"<urlset xmlns:image="http://www.google.com/schemas/sitemap-image/1.1">
            <url>
                <loc>https://a.test/page</loc>
                <image:image><image:loc>https://a.test/photo.jpg</image:loc></image:image>
            </url>
        </urlset>"#;
        assert_eq!(locs(xml), ["https://a.test/page"]);
    }

    #[rstest]
    #[case(b"<urlset/>")]
    #[case(b"<urlset></urlset>")]
    #[case(b"<?xml version=\"1.0\"?><!-- nothing yet --><urlset>\n</urlset>")]
    fn test_empty_leaf(#[case] xml: &[u8]) {
        assert!(decode_leaf(xml).unwrap().is_empty());
    }

    #[test]
    fn test_url_without_loc_has_empty_loc() {
        let xml = b"<urlset><url><lastmod>2024-01-01</lastmod></url><url><loc/></url></urlset>";
        assert_eq!(locs(xml), ["", ""]);
    }

    #[test]
    fn test_index_entries() {
        let xml = br#"<?xml version="1.0" encoding="UTF-8"?>
            <sitemapindex xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
                <sitemap><loc>https://a.test/a.xml</loc><lastmod>2024-05-01T10:00:00+00:00</lastmod></sitemap>
                <sitemap><loc>https://a.test/b.xml.gz</loc></sitemap>
            </sitemapindex>"#;
        let entries = decode_index(&xml[..]).unwrap();
        assert_eq!(entries, [
            IndexEntry {
                loc: "https://a.test/a.xml".to_string(),
                lastmod: Some("2024-05-01T10:00:00+00:00".to_string()),
            },
            IndexEntry { loc: "https://a.test/b.xml.gz".to_string(), lastmod: None },
        ]);
    }

    #[test]
    fn test_leaf_rejects_index_root() {
        let err = decode_leaf(&b"<sitemapindex></sitemapindex>"[..]).unwrap_err();
        assert_eq!(*err, ErrorKind::UnexpectedRoot { expected: "urlset", found: "sitemapindex".to_string() });
    }

    #[test]
    fn test_index_rejects_leaf_root() {
        let err = decode_index(&b"<urlset><url><loc>x</loc></url></urlset>"[..]).unwrap_err();
        assert_eq!(*err, ErrorKind::UnexpectedRoot { expected: "sitemapindex", found: "urlset".to_string() });
    }

    #[rstest]
    #[case(b"")]
    #[case(b"   \n")]
    #[case(b"<?xml version=\"1.0\"?>")]
    #[case(b"<!-- only a comment -->")]
    fn test_missing_root(#[case] xml: &[u8]) {
        assert_eq!(*decode_leaf(xml).unwrap_err(), ErrorKind::MissingRoot);
    }

    #[rstest]
    #[case::unclosed(b"<urlset><url><loc>https://a.test/1</loc></url>")]
    #[case::mismatched(b"<urlset><url><loc>https://a.test/1</url></loc></urlset>")]
    #[case::second_root(b"<urlset></urlset><urlset></urlset>")]
    #[case::broken_tag(b"<urlset><url><loc>https://a.test/1</loc></url></urlset")]
    fn test_malformed(#[case] xml: &[u8]) {
        assert_eq!(*decode_leaf(xml).unwrap_err(), ErrorKind::Malformed);
    }

    #[test]
    fn test_declared_latin1_is_decoded() {
        let xml = b"<?xml version=\"1.0\" encoding=\"ISO-8859-1\"?>\
            <urlset><url><loc>https://a.test/caf\xE9</loc></url></urlset>";
        assert_eq!(locs(xml), ["https://a.test/caf\u{e9}"]);
    }

    #[test]
    fn test_utf8_bom() {
        let xml = b"\xEF\xBB\xBF<urlset><url><loc>https://a.test/\xC3\xA9</loc></url></urlset>";
        assert_eq!(locs(xml), ["https://a.test/\u{e9}"]);
    }
}
