use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use anyhow::Context;
use indicatif::{ProgressBar, ProgressStyle};
use wikipath_core::{build_wpindex, WpindexWriter};

/// Build a `.wpindex` artifact from a bzip2 multistream dump and its
/// accompanying stream-offset index.
pub fn run(dump: &Path, stream_index: &Path, out: &Path, workers: usize) -> anyhow::Result<()> {
    log::info!(
        "building index from {} (streams: {}) -> {}",
        dump.display(),
        stream_index.display(),
        out.display()
    );

    let progress = ProgressBar::new(0);
    progress.set_style(
        ProgressStyle::with_template("{spinner} {pos}/{len} streams ({per_sec}, eta {eta})")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );

    let file = File::create(out).with_context(|| format!("creating {}", out.display()))?;
    let mut writer = WpindexWriter::new(BufWriter::new(file));

    let count = build_wpindex(dump, stream_index, &mut writer, workers, |done, total| {
        progress.set_length(total);
        progress.set_position(done);
    })
    .context("building wpindex")?;

    writer.finish().context("flushing wpindex")?;
    progress.finish_and_clear();

    log::info!("wrote {} articles to {}", count, out.display());
    Ok(())
}
