//! The `.wpindex` artifact: a gzip-compressed stream of bincode-encoded
//! article records, produced once by the index builder and loaded directly
//! into memory at query time.

use std::io::{Read, Write};

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use serde::{Deserialize, Serialize};

use crate::error::WpindexError;

/// An article stripped down to exactly what the query engine needs: no
/// wikitext, just the link graph shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrippedArticle {
    pub id: u64,
    pub title: String,
    pub is_redirect: bool,
    /// Set only when `is_redirect` is true: the title this page redirects to.
    pub redirect_target: Option<String>,
    /// Outgoing article-namespace links, already extracted and filtered.
    pub links: Vec<String>,
}

const HAS_NEXT: u8 = 1;
const NO_MORE: u8 = 0;

/// Appends `StrippedArticle` records to a gzip stream, terminated by an
/// explicit end marker rather than relying on the underlying reader's EOF.
pub struct WpindexWriter<W: Write> {
    enc: GzEncoder<W>,
}

impl<W: Write> WpindexWriter<W> {
    pub fn new(w: W) -> Self {
        WpindexWriter {
            enc: GzEncoder::new(w, Compression::fast()),
        }
    }

    pub fn write_article(&mut self, article: &StrippedArticle) -> Result<(), WpindexError> {
        self.enc.write_all(&[HAS_NEXT])?;
        bincode::serialize_into(&mut self.enc, article)?;
        Ok(())
    }

    /// Write the terminator and flush the gzip stream to the underlying writer.
    pub fn finish(mut self) -> Result<W, WpindexError> {
        self.enc.write_all(&[NO_MORE])?;
        Ok(self.enc.finish()?)
    }
}

/// Reads `StrippedArticle` records back out of a `.wpindex` stream.
pub struct WpindexReader<R: Read> {
    dec: GzDecoder<R>,
}

impl<R: Read> WpindexReader<R> {
    pub fn new(r: R) -> Self {
        WpindexReader {
            dec: GzDecoder::new(r),
        }
    }

    /// Decode the next record, or `Ok(None)` once the end marker is hit.
    pub fn read_article(&mut self) -> Result<Option<StrippedArticle>, WpindexError> {
        let mut marker = [0u8; 1];
        self.dec.read_exact(&mut marker)?;
        if marker[0] == NO_MORE {
            return Ok(None);
        }
        let article = bincode::deserialize_from(&mut self.dec)?;
        Ok(Some(article))
    }

    /// Drain every remaining record into a `Vec`.
    pub fn read_all(mut self) -> Result<Vec<StrippedArticle>, WpindexError> {
        let mut out = Vec::new();
        while let Some(article) = self.read_article()? {
            out.push(article);
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(id: u64, title: &str) -> StrippedArticle {
        StrippedArticle {
            id,
            title: title.to_owned(),
            is_redirect: false,
            redirect_target: None,
            links: vec!["Other".to_owned()],
        }
    }

    #[test]
    fn round_trips_a_handful_of_articles() {
        let mut buf = Vec::new();
        {
            let mut w = WpindexWriter::new(&mut buf);
            w.write_article(&sample(1, "A")).unwrap();
            w.write_article(&sample(2, "B")).unwrap();
            w.finish().unwrap();
        }
        let reader = WpindexReader::new(&buf[..]);
        let articles = reader.read_all().unwrap();
        assert_eq!(articles.len(), 2);
        assert_eq!(articles[0].title, "A");
        assert_eq!(articles[1].title, "B");
    }

    #[test]
    fn empty_stream_round_trips_to_no_articles() {
        let mut buf = Vec::new();
        let w: WpindexWriter<&mut Vec<u8>> = WpindexWriter::new(&mut buf);
        w.finish().unwrap();
        let reader = WpindexReader::new(&buf[..]);
        assert!(reader.read_all().unwrap().is_empty());
    }

    #[test]
    fn preserves_redirect_fields() {
        let mut buf = Vec::new();
        let mut article = sample(3, "C");
        article.is_redirect = true;
        article.redirect_target = Some("A".to_owned());
        article.links.clear();
        {
            let mut w = WpindexWriter::new(&mut buf);
            w.write_article(&article).unwrap();
            w.finish().unwrap();
        }
        let reader = WpindexReader::new(&buf[..]);
        let got = reader.read_all().unwrap();
        assert_eq!(got[0], article);
    }
}
