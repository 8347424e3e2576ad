//! Parsing of the `offset:id:title` multistream index that accompanies a
//! bzip2 multistream XML dump.

use crate::error::OffsetLineError;

/// One line of the stream-offset index: the byte offset of the bzip2
/// sub-stream a page lives in, its page id, and its title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OffsetEntry {
    pub offset: u64,
    pub page_id: u64,
    pub title: String,
}

/// A contiguous byte range `[start, end)` of the dump file holding exactly
/// one bzip2 sub-stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamRange {
    pub start: u64,
    pub end: u64,
}

/// Parse one `offset:id:title` line. The title itself may contain `:`, so
/// only the first two separators are significant.
pub fn parse_index_line(line: &str) -> Result<OffsetEntry, OffsetLineError> {
    let mut parts = line.splitn(3, ':');
    let offset_s = parts.next().ok_or(OffsetLineError::WrongFieldCount(0))?;
    let id_s = parts.next().ok_or(OffsetLineError::WrongFieldCount(1))?;
    let title = parts.next().ok_or(OffsetLineError::WrongFieldCount(2))?;

    let offset = offset_s
        .parse()
        .map_err(|_| OffsetLineError::InvalidOffset(offset_s.to_owned()))?;
    let page_id = id_s
        .parse()
        .map_err(|_| OffsetLineError::InvalidId(id_s.to_owned()))?;
    if title.is_empty() {
        return Err(OffsetLineError::EmptyTitle);
    }
    Ok(OffsetEntry {
        offset,
        page_id,
        title: title.to_owned(),
    })
}

/// Parse the full index, returning one entry per line in file order.
pub fn parse_index<'a, I: IntoIterator<Item = &'a str>>(
    lines: I,
) -> Result<Vec<OffsetEntry>, OffsetLineError> {
    lines
        .into_iter()
        .filter(|l| !l.is_empty())
        .map(parse_index_line)
        .collect()
}

/// Collapse a flat list of index entries into the distinct byte ranges of
/// the sub-streams they point into. Entries sharing an offset collapse to
/// one range; `dump_len` closes off the final range, which has no
/// successor offset to bound it.
pub fn stream_ranges(entries: &[OffsetEntry], dump_len: u64) -> Vec<StreamRange> {
    let mut offsets: Vec<u64> = entries.iter().map(|e| e.offset).collect();
    offsets.dedup();
    offsets.sort_unstable();
    offsets.dedup();

    let mut ranges = Vec::with_capacity(offsets.len());
    for (i, &start) in offsets.iter().enumerate() {
        let end = offsets.get(i + 1).copied().unwrap_or(dump_len);
        ranges.push(StreamRange { start, end });
    }
    ranges
}
