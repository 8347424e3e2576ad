//! Parallel ingest of a bzip2 multistream XML dump into a `.wpindex` stream.
//!
//! Each distinct offset in the accompanying stream index marks the start of
//! one self-contained bzip2 block. Blocks are independent, so a pool of
//! worker threads can decompress and parse them concurrently; a single
//! thread on the caller's side serializes the resulting records out to the
//! `.wpindex` writer in whatever order they complete.

use std::fs::{self, File};
use std::io::{self, BufReader, Read, Seek, SeekFrom};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread;

use bzip2::read::BzDecoder;
use crossbeam_channel::unbounded;

use crate::article::ArticleReader;
use crate::error::LoadError;
use crate::errorcontext::ErrorContext;
use crate::extract::extract_links;
use crate::offsets::{self, StreamRange};
use crate::wpindex::{StrippedArticle, WpindexWriter};

/// The article namespace. Everything else (Category:, File:, Talk:, ...)
/// is parsed but discarded: the link graph only covers ns 0 pages.
const ARTICLE_NAMESPACE: i64 = 0;

/// A `Read` adapter that stops after `remaining` bytes, used to hand each
/// worker exactly its own bzip2 block out of the shared dump file.
struct BoundedReader<R> {
    inner: R,
    remaining: u64,
}

impl<R> BoundedReader<R> {
    fn new(inner: R, len: u64) -> Self {
        BoundedReader { inner, remaining: len }
    }
}

impl<R: Read> Read for BoundedReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.remaining == 0 {
            return Ok(0);
        }
        let cap = buf.len().min(self.remaining as usize);
        let n = self.inner.read(&mut buf[..cap])?;
        self.remaining -= n as u64;
        Ok(n)
    }
}

fn open_range(dump_path: &Path, range: StreamRange) -> io::Result<BoundedReader<BufReader<File>>> {
    let mut file = File::open(dump_path)?;
    file.seek(SeekFrom::Start(range.start))?;
    Ok(BoundedReader::new(BufReader::new(file), range.end - range.start))
}

/// Decompress and parse the one bzip2 block covering `range`, returning
/// every ns-0 page in it as a [`StrippedArticle`].
fn parse_range(dump_path: &Path, range: StreamRange) -> Result<Vec<StrippedArticle>, LoadError> {
    let bounded = open_range(dump_path, range)?;
    let bz = BzDecoder::new(bounded);
    let mut pages = ArticleReader::new(BufReader::new(bz));

    let mut out = Vec::new();
    while let Some(page) = pages.next_article()? {
        if page.namespace != ARTICLE_NAMESPACE {
            continue;
        }
        let is_redirect = page.redirect.is_some();
        let links = if is_redirect {
            Vec::new()
        } else {
            extract_links(&page.text)
        };
        out.push(StrippedArticle {
            id: page.id,
            title: page.title,
            is_redirect,
            redirect_target: page.redirect,
            links,
        });
    }
    Ok(out)
}

/// Build a `.wpindex` stream from `dump_path` (a bzip2 multistream XML dump)
/// and `index_path` (its `offset:id:title` stream index), fanning the work
/// out over `workers` threads. `on_progress(done, total)` is called once per
/// completed block, from the calling thread only.
///
/// Returns the number of articles written. If any worker hits an error, the
/// rest are cancelled cooperatively and the first error observed is
/// returned; partial output already written to `writer` is the caller's to
/// discard.
pub fn build_wpindex<W, F>(
    dump_path: &Path,
    index_path: &Path,
    writer: &mut WpindexWriter<W>,
    workers: usize,
    on_progress: F,
) -> Result<u64, LoadError>
where
    W: io::Write,
    F: Fn(u64, u64) + Sync,
{
    let workers = if workers == 0 { num_cpus::get() } else { workers };

    let index_text = fs::read_to_string(index_path)?;
    let entries = offsets::parse_index(index_text.lines())?;
    let dump_len = fs::metadata(dump_path)?.len();
    let ranges = offsets::stream_ranges(&entries, dump_len);
    let total = ranges.len() as u64;
    log::info!("building wpindex: {total} streams across {workers} workers");

    let (work_tx, work_rx) = unbounded();
    for range in &ranges {
        work_tx.send(*range).expect("receiver outlives this send loop");
    }
    drop(work_tx);

    let (result_tx, result_rx) = unbounded::<Vec<StrippedArticle>>();
    let ctx = ErrorContext::new(workers);
    let completed = AtomicU64::new(0);

    thread::scope(|scope| {
        for _ in 0..workers {
            let work_rx = work_rx.clone();
            let result_tx = result_tx.clone();
            let ctx = &ctx;
            let completed = &completed;
            let on_progress = &on_progress;
            scope.spawn(move || {
                for range in work_rx.iter() {
                    if ctx.is_cancelled() {
                        break;
                    }
                    match parse_range(dump_path, range) {
                        Ok(articles) => {
                            let done = completed.fetch_add(1, Ordering::SeqCst) + 1;
                            on_progress(done, total);
                            if result_tx.send(articles).is_err() {
                                break;
                            }
                        }
                        Err(e) => {
                            log::error!("stream at offset {} failed: {e}", range.start);
                            ctx.cancel(e);
                            break;
                        }
                    }
                }
                ctx.worker_done();
            });
        }
        drop(result_tx);

        let mut written = 0u64;
        for batch in result_rx.iter() {
            for article in &batch {
                writer.write_article(article)?;
                written += 1;
            }
        }
        Ok::<u64, LoadError>(written)
    })
    .and_then(|written| match ctx.wait() {
        Some(err) => Err(LoadError::Cancelled(err.to_string())),
        None => Ok(written),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    fn bzip2_block(xml: &str) -> Vec<u8> {
        use bzip2::write::BzEncoder;
        use bzip2::Compression;
        let mut enc = BzEncoder::new(Vec::new(), Compression::fast());
        enc.write_all(xml.as_bytes()).unwrap();
        enc.finish().unwrap()
    }

    #[test]
    fn builds_an_index_from_two_blocks() {
        let block_a = bzip2_block(
            r#"<mediawiki><page><title>A</title><ns>0</ns><id>1</id><revision><id>1</id><text>[[B]]</text></revision></page></mediawiki>"#,
        );
        let block_b = bzip2_block(
            r#"<mediawiki><page><title>B</title><ns>0</ns><id>2</id><revision><id>2</id><text>no links here</text></revision></page></mediawiki>"#,
        );

        let dir = tempfile::tempdir().unwrap();
        let dump_path = dir.path().join("dump.xml.bz2");
        let mut dump = File::create(&dump_path).unwrap();
        dump.write_all(&block_a).unwrap();
        dump.write_all(&block_b).unwrap();
        drop(dump);

        let index_path = dir.path().join("index.txt");
        let mut index = File::create(&index_path).unwrap();
        writeln!(index, "0:1:A").unwrap();
        writeln!(index, "{}:2:B", block_a.len()).unwrap();
        drop(index);

        let mut buf = Vec::new();
        let count = {
            let mut w = WpindexWriter::new(&mut buf);
            let n = build_wpindex(&dump_path, &index_path, &mut w, 2, |_, _| {}).unwrap();
            w.finish().unwrap();
            n
        };
        assert_eq!(count, 2);

        let articles = crate::wpindex::WpindexReader::new(&buf[..]).read_all().unwrap();
        let titles: Vec<&str> = articles.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(titles, vec!["A", "B"]);
        assert_eq!(articles[0].links, vec!["B".to_string()]);
    }

    #[test]
    fn bounded_reader_stops_at_the_limit() {
        let data = b"0123456789";
        let mut reader = BoundedReader::new(&data[..], 4);
        let mut out = Vec::new();
        reader.read_to_end(&mut out).unwrap();
        assert_eq!(out, b"0123");
    }
}
