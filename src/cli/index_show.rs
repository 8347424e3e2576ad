use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::Context;
use wikipath_core::index::normalize_title;
use wikipath_core::WpindexReader;

/// Scan a `.wpindex` file for the article matching `title` and print its
/// canonical title followed by its links, one per line.
pub fn run(wpindex: &Path, title: &str) -> anyhow::Result<()> {
    let file = File::open(wpindex).with_context(|| format!("opening {}", wpindex.display()))?;
    let mut reader = WpindexReader::new(BufReader::new(file));

    println!("Searching {}...", wpindex.display());

    let wanted = normalize_title(title);
    while let Some(article) = reader.read_article().context("reading wpindex record")? {
        if normalize_title(&article.title) == wanted {
            println!("{}", article.title);
            for link in &article.links {
                println!("  {link}");
            }
            break;
        }
    }

    Ok(())
}
