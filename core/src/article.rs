//! Decoding of `<page>` elements from a MediaWiki XML export stream.

use std::io::BufRead;
use std::str;

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::error::XmlError;

/// One `<page>` element, decoded to the fields the rest of the pipeline needs.
#[derive(Debug, Clone, Default)]
pub struct Article {
    pub id: u64,
    pub namespace: i64,
    pub title: String,
    /// Target title of the `<redirect title="...">` element, if this page is a redirect.
    pub redirect: Option<String>,
    /// The revision's wikitext body.
    pub text: String,
}

/// Streams `Article`s out of a MediaWiki export document, skipping everything
/// that isn't a `<page>`.
pub struct ArticleReader<R: BufRead> {
    reader: Reader<R>,
    buf: Vec<u8>,
    text_buf: Vec<u8>,
}

impl<R: BufRead> ArticleReader<R> {
    pub fn new(source: R) -> Self {
        let mut reader = Reader::from_reader(source);
        reader.trim_text(false);
        ArticleReader {
            reader,
            buf: Vec::new(),
            text_buf: Vec::new(),
        }
    }

    /// Decode the next `<page>` element. Returns `Ok(None)` at end of stream.
    pub fn next_article(&mut self) -> Result<Option<Article>, XmlError> {
        let mut article = Article::default();
        let mut in_page = false;
        let mut in_revision = false;

        loop {
            self.buf.clear();
            match self.reader.read_event(&mut self.buf) {
                Ok(Event::Start(ref tag)) => match tag.name() {
                    b"page" => {
                        in_page = true;
                        article = Article::default();
                    }
                    b"revision" if in_page => in_revision = true,
                    b"title" if in_page && !in_revision => {
                        article.title = self
                            .reader
                            .read_text(b"title", &mut self.text_buf)
                            .map_err(XmlError::from)?;
                    }
                    b"ns" if in_page && !in_revision => {
                        let ns_text = self
                            .reader
                            .read_text(b"ns", &mut self.text_buf)
                            .map_err(XmlError::from)?;
                        article.namespace = ns_text.trim().parse().unwrap_or(0);
                    }
                    b"id" if in_page && !in_revision => {
                        let id_text = self
                            .reader
                            .read_text(b"id", &mut self.text_buf)
                            .map_err(XmlError::from)?;
                        article.id = id_text.trim().parse().unwrap_or(0);
                    }
                    b"text" if in_revision => {
                        article.text = self
                            .reader
                            .read_text(b"text", &mut self.text_buf)
                            .map_err(XmlError::from)?;
                    }
                    _ => (),
                },
                Ok(Event::Empty(ref tag)) => {
                    if tag.name() == b"redirect" {
                        article.redirect = extract_redirect_title(tag);
                    }
                }
                Ok(Event::End(ref tag)) => match tag.name() {
                    b"revision" => in_revision = false,
                    b"page" => {
                        if in_page {
                            return Ok(Some(article));
                        }
                    }
                    _ => (),
                },
                Ok(Event::Eof) => return Ok(None),
                Ok(_) => (),
                Err(e) => return Err(XmlError::from(e)),
            }
        }
    }
}

/// Pull the `title` attribute off a `<redirect .../>` empty element.
fn extract_redirect_title(tag: &quick_xml::events::BytesStart) -> Option<String> {
    tag.attributes().filter_map(Result::ok).find_map(|attr| {
        if attr.key == b"title" {
            str::from_utf8(&attr.value).ok().map(str::to_owned)
        } else {
            None
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn read_all(xml: &str) -> Vec<Article> {
        let mut reader = ArticleReader::new(Cursor::new(xml.as_bytes()));
        let mut out = Vec::new();
        while let Some(a) = reader.next_article().unwrap() {
            out.push(a);
        }
        out
    }

    #[test]
    fn decodes_a_simple_page() {
        let xml = r#"<mediawiki>
          <page>
            <title>Sandbox</title>
            <ns>0</ns>
            <id>42</id>
            <revision>
              <id>100</id>
              <text>[[War and Peace]]</text>
            </revision>
          </page>
        </mediawiki>"#;
        let arts = read_all(xml);
        assert_eq!(arts.len(), 1);
        assert_eq!(arts[0].id, 42);
        assert_eq!(arts[0].title, "Sandbox");
        assert_eq!(arts[0].text, "[[War and Peace]]");
        assert!(arts[0].redirect.is_none());
    }

    #[test]
    fn revision_id_does_not_clobber_page_id() {
        let xml = r#"<mediawiki>
          <page>
            <title>A</title>
            <ns>0</ns>
            <id>7</id>
            <revision>
              <id>999999</id>
              <text>body</text>
            </revision>
          </page>
        </mediawiki>"#;
        let arts = read_all(xml);
        assert_eq!(arts[0].id, 7);
    }

    #[test]
    fn decodes_a_redirect() {
        let xml = r#"<mediawiki>
          <page>
            <title>E</title>
            <ns>0</ns>
            <id>3</id>
            <redirect title="B" />
            <revision>
              <id>1</id>
              <text>#REDIRECT [[B]]</text>
            </revision>
          </page>
        </mediawiki>"#;
        let arts = read_all(xml);
        assert_eq!(arts[0].redirect.as_deref(), Some("B"));
    }

    #[test]
    fn multiple_pages_are_each_emitted() {
        let xml = r#"<mediawiki>
          <page><title>A</title><ns>0</ns><id>1</id><revision><id>1</id><text>x</text></revision></page>
          <page><title>B</title><ns>0</ns><id>2</id><revision><id>2</id><text>y</text></revision></page>
        </mediawiki>"#;
        let arts = read_all(xml);
        assert_eq!(arts.len(), 2);
        assert_eq!(arts[1].title, "B");
    }
}
