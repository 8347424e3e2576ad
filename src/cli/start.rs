use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use wikipath_core::{Index, WpindexReader};

use crate::web;

/// Load a `.wpindex` file fully into memory and serve shortest-path queries
/// over it until the process is killed.
pub async fn run(wpindex: &Path, listen_addr: &str, workers: usize, max_depth: Option<usize>) -> anyhow::Result<()> {
    log::info!("loading {}", wpindex.display());
    let started = Instant::now();

    let file = File::open(wpindex).with_context(|| format!("opening {}", wpindex.display()))?;
    let articles = WpindexReader::new(BufReader::new(file))
        .read_all()
        .context("reading wpindex")?;
    let count = articles.len();
    let index = Arc::new(Index::build(articles, workers));

    log::info!(
        "loaded {} articles into {} graph nodes in {:.2?}",
        count,
        index.len(),
        started.elapsed()
    );

    web::serve(index, listen_addr, max_depth).await
}
