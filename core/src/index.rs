//! The in-memory link graph and bidirectional shortest-path search over it.
//!
//! Articles live in a flat arena (`Vec<IndexItemData>`) addressed by stable
//! `usize` indices rather than pointers, so the graph can be shared as
//! `&Index` across concurrently-running queries: each query keeps its own
//! visited-state locally and only ever takes the fine-grained per-item locks
//! to read adjacency lists, never to mutate shared traversal state.

use std::collections::HashMap;
use std::sync::RwLock;

use parking_lot::Mutex;
use rand::Rng;

use crate::error::QueryError;
use crate::wpindex::StrippedArticle;

/// Title comparisons are ASCII-lowercase only; a title differing only by
/// non-ASCII case folding (e.g. Turkish dotless i) will not match. This
/// mirrors the original tool's behavior rather than pulling in full Unicode
/// case folding for a corpus that is overwhelmingly ASCII-titled.
pub fn normalize_title(title: &str) -> String {
    title.to_ascii_lowercase()
}

struct IndexItemData {
    id: u64,
    title: String,
    forward: Mutex<Vec<usize>>,
    reverse: Mutex<Vec<usize>>,
}

/// Which adjacency list to follow: `Forward` walks outgoing links (towards
/// the target), `Backward` walks incoming links (towards the source).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Forward,
    Backward,
}

/// The full link graph, loaded once from a `.wpindex` stream and then
/// queried many times.
pub struct Index {
    items: Vec<IndexItemData>,
    /// Normalized title -> arena index. Includes both canonical article
    /// titles and single-hop redirect aliases pointing at the same index.
    titles: RwLock<HashMap<String, usize>>,
    /// Every key of `titles`, kept alongside it for O(1) uniform random
    /// selection (a `HashMap` doesn't support that directly).
    title_list: Vec<String>,
}

impl Index {
    /// Build the graph from a flat list of stripped articles.
    ///
    /// Proceeds in three passes: canonical (non-redirect) articles are
    /// registered first so every valid link target has an arena slot, then
    /// forward/reverse edges are resolved in parallel across `workers`
    /// threads, and finally redirects are resolved serially as one-hop
    /// aliases onto their target's arena slot. A link (or redirect) whose
    /// target exists only as a redirect-only title will not resolve: redirect
    /// aliases aren't registered until after edge resolution runs. This
    /// matches upstream behavior and is an accepted limitation rather than a
    /// bug: such dangling links are simply dropped.
    pub fn build(articles: Vec<StrippedArticle>, workers: usize) -> Index {
        let workers = if workers == 0 { num_cpus::get() } else { workers };
        let mut items = Vec::with_capacity(articles.len());
        let mut titles = HashMap::with_capacity(articles.len());
        let mut redirects = Vec::new();

        for article in &articles {
            if article.is_redirect {
                continue;
            }
            let idx = items.len();
            titles.insert(normalize_title(&article.title), idx);
            items.push(IndexItemData {
                id: article.id,
                title: article.title.clone(),
                forward: Mutex::new(Vec::new()),
                reverse: Mutex::new(Vec::new()),
            });
        }
        log::debug!("registered {} canonical articles", items.len());

        let index = Index {
            items,
            titles: RwLock::new(titles),
            title_list: Vec::new(),
        };

        index.resolve_links(&articles, workers);

        for article in articles {
            if article.is_redirect {
                redirects.push(article);
            }
        }
        log::debug!("resolving {} redirects", redirects.len());
        index.resolve_redirects(redirects);

        let title_list: Vec<String> = index.titles.read().unwrap().keys().cloned().collect();
        Index { title_list, ..index }
    }

    fn resolve_links(&self, articles: &[StrippedArticle], workers: usize) {
        let canonical: Vec<&StrippedArticle> = articles.iter().filter(|a| !a.is_redirect).collect();
        if canonical.is_empty() {
            return;
        }
        let chunk_size = (canonical.len() + workers - 1) / workers;

        std::thread::scope(|scope| {
            for chunk in canonical.chunks(chunk_size.max(1)) {
                scope.spawn(move || {
                    for article in chunk {
                        let from = match self.titles.read().unwrap().get(&normalize_title(&article.title)) {
                            Some(&idx) => idx,
                            None => continue,
                        };
                        for link in &article.links {
                            let to = match self.titles.read().unwrap().get(&normalize_title(link)) {
                                Some(&idx) => idx,
                                None => continue,
                            };
                            self.items[from].forward.lock().push(to);
                            self.items[to].reverse.lock().push(from);
                        }
                    }
                });
            }
        });
    }

    fn resolve_redirects(&self, redirects: Vec<StrippedArticle>) {
        let mut titles = self.titles.write().unwrap();
        for redirect in redirects {
            let target = match redirect.redirect_target.as_deref() {
                Some(t) => t,
                None => continue,
            };
            let idx = match titles.get(&normalize_title(target)) {
                Some(&idx) => idx,
                None => continue,
            };
            titles.insert(normalize_title(&redirect.title), idx);
        }
    }

    /// Look up the arena index for a title (canonical or redirect alias).
    fn resolve(&self, title: &str) -> Option<usize> {
        self.titles.read().unwrap().get(&normalize_title(title)).copied()
    }

    /// Number of canonical (non-redirect) articles in the graph.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Pick a title uniformly at random among every registered title,
    /// canonical or redirect. Because popular articles accrue more redirect
    /// aliases, this weights selection towards them, matching the original
    /// tool's notion of a "random article".
    pub fn random_title(&self) -> Option<&str> {
        if self.title_list.is_empty() {
            return None;
        }
        let i = rand::thread_rng().gen_range(0..self.title_list.len());
        Some(self.title_list[i].as_str())
    }

    fn expand(
        &self,
        frontier: &[usize],
        parents: &mut HashMap<usize, usize>,
        other: &HashMap<usize, usize>,
        dir: Direction,
    ) -> (Vec<usize>, Option<usize>) {
        let mut next = Vec::new();
        let mut meeting = None;
        for &node in frontier {
            let neighbors: Vec<usize> = match dir {
                Direction::Forward => self.items[node].forward.lock().clone(),
                Direction::Backward => self.items[node].reverse.lock().clone(),
            };
            for n in neighbors {
                if parents.contains_key(&n) {
                    continue;
                }
                parents.insert(n, node);
                if meeting.is_none() && other.contains_key(&n) {
                    meeting = Some(n);
                }
                next.push(n);
            }
        }
        (next, meeting)
    }

    /// Find a shortest path from `source` to `target` by title, expanding a
    /// breadth-first frontier from both ends and always growing whichever
    /// side is currently smaller. `max_depth`, if set, bounds the number of
    /// expansion rounds and causes the search to give up (returning
    /// `Ok((None, touched))`) rather than run unbounded over a disconnected
    /// or very distant pair.
    ///
    /// Alongside the path, returns the number of distinct articles touched
    /// by either frontier over the course of the search.
    pub fn find_path(
        &self,
        source: &str,
        target: &str,
        max_depth: Option<usize>,
    ) -> Result<(Option<Vec<String>>, usize), QueryError> {
        let src = self
            .resolve(source)
            .ok_or_else(|| QueryError::ArticleNotFound(source.to_owned()))?;
        let dst = self
            .resolve(target)
            .ok_or_else(|| QueryError::ArticleNotFound(target.to_owned()))?;

        if src == dst {
            return Ok((Some(vec![self.items[src].title.clone()]), 1));
        }

        let mut forward_parent = HashMap::new();
        let mut backward_parent = HashMap::new();
        forward_parent.insert(src, src);
        backward_parent.insert(dst, dst);
        let mut forward_frontier = vec![src];
        let mut backward_frontier = vec![dst];

        let mut depth = 0usize;
        loop {
            if forward_frontier.is_empty() || backward_frontier.is_empty() {
                return Ok((None, touched_count(&forward_parent, &backward_parent)));
            }
            if let Some(limit) = max_depth {
                if depth >= limit {
                    return Ok((None, touched_count(&forward_parent, &backward_parent)));
                }
            }
            depth += 1;

            let meeting = if forward_frontier.len() <= backward_frontier.len() {
                let (next, meeting) =
                    self.expand(&forward_frontier, &mut forward_parent, &backward_parent, Direction::Forward);
                forward_frontier = next;
                meeting
            } else {
                let (next, meeting) =
                    self.expand(&backward_frontier, &mut backward_parent, &forward_parent, Direction::Backward);
                backward_frontier = next;
                meeting
            };

            if let Some(meet) = meeting {
                let touched = touched_count(&forward_parent, &backward_parent);
                let path = join_paths(meet, src, dst, &forward_parent, &backward_parent);
                return Ok((Some(path.into_iter().map(|i| self.items[i].title.clone()).collect()), touched));
            }
        }
    }
}

/// Count the distinct articles visited by either search frontier, deduping
/// the meeting node where both parent maps overlap.
fn touched_count(forward_parent: &HashMap<usize, usize>, backward_parent: &HashMap<usize, usize>) -> usize {
    let mut seen: std::collections::HashSet<usize> = forward_parent.keys().copied().collect();
    seen.extend(backward_parent.keys().copied());
    seen.len()
}

/// Stitch the source-side and target-side parent maps together at the
/// meeting node into one arena-index path from `src` to `dst`.
fn join_paths(
    meet: usize,
    src: usize,
    dst: usize,
    forward_parent: &HashMap<usize, usize>,
    backward_parent: &HashMap<usize, usize>,
) -> Vec<usize> {
    let mut front = vec![meet];
    let mut cur = meet;
    while cur != src {
        cur = forward_parent[&cur];
        front.push(cur);
    }
    front.reverse();

    let mut back = Vec::new();
    let mut cur = meet;
    while cur != dst {
        cur = backward_parent[&cur];
        back.push(cur);
    }

    front.extend(back);
    front
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article(id: u64, title: &str, links: &[&str]) -> StrippedArticle {
        StrippedArticle {
            id,
            title: title.to_owned(),
            is_redirect: false,
            redirect_target: None,
            links: links.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn redirect(id: u64, title: &str, target: &str) -> StrippedArticle {
        StrippedArticle {
            id,
            title: title.to_owned(),
            is_redirect: true,
            redirect_target: Some(target.to_owned()),
            links: Vec::new(),
        }
    }

    #[test]
    fn trivial_path_is_a_single_node() {
        let idx = Index::build(vec![article(1, "A", &[])], 2);
        let (path, touched) = idx.find_path("A", "A", None).unwrap();
        assert_eq!(path.unwrap(), vec!["A".to_string()]);
        assert_eq!(touched, 1);
    }

    #[test]
    fn finds_a_direct_link() {
        let idx = Index::build(vec![article(1, "A", &["B"]), article(2, "B", &[])], 2);
        let (path, touched) = idx.find_path("A", "B", None).unwrap();
        assert_eq!(path.unwrap(), vec!["A".to_string(), "B".to_string()]);
        assert_eq!(touched, 2);
    }

    #[test]
    fn finds_a_multi_hop_path_bidirectionally() {
        let idx = Index::build(
            vec![
                article(1, "A", &["B"]),
                article(2, "B", &["C"]),
                article(3, "C", &["D"]),
                article(4, "D", &[]),
            ],
            2,
        );
        let (path, touched) = idx.find_path("A", "D", None).unwrap();
        assert_eq!(path.unwrap(), vec!["A", "B", "C", "D"]);
        assert!(touched >= 4);
    }

    #[test]
    fn returns_none_when_no_path_exists() {
        let idx = Index::build(vec![article(1, "A", &[]), article(2, "B", &[])], 2);
        let (path, _touched) = idx.find_path("A", "B", None).unwrap();
        assert_eq!(path, None);
    }

    #[test]
    fn max_depth_bounds_the_search() {
        let idx = Index::build(
            vec![
                article(1, "A", &["B"]),
                article(2, "B", &["C"]),
                article(3, "C", &[]),
            ],
            2,
        );
        assert_eq!(idx.find_path("A", "C", Some(1)).unwrap().0, None);
        assert!(idx.find_path("A", "C", Some(2)).unwrap().0.is_some());
    }

    #[test]
    fn unknown_title_is_an_error() {
        let idx = Index::build(vec![article(1, "A", &[])], 2);
        assert!(matches!(
            idx.find_path("Nope", "A", None),
            Err(QueryError::ArticleNotFound(_))
        ));
    }

    #[test]
    fn redirects_resolve_to_their_target_as_one_hop_aliases() {
        let idx = Index::build(
            vec![
                article(1, "Dog", &["Canine"]),
                article(2, "Canine", &[]),
                redirect(3, "Doggo", "Dog"),
            ],
            2,
        );
        let (path, _touched) = idx.find_path("Doggo", "Canine", None).unwrap();
        assert_eq!(path.unwrap(), vec!["Dog", "Canine"]);
    }

    #[test]
    fn links_into_redirect_only_titles_are_dropped_not_followed() {
        let idx = Index::build(
            vec![
                article(1, "A", &["Alias"]),
                article(2, "Real", &[]),
                redirect(3, "Alias", "Real"),
            ],
            2,
        );
        assert_eq!(idx.find_path("A", "Real", None).unwrap().0, None);
    }

    #[test]
    fn title_lookup_is_ascii_case_insensitive() {
        let idx = Index::build(vec![article(1, "Rust", &[])], 2);
        assert!(idx.find_path("rUsT", "RUST", None).unwrap().0.is_some());
    }


    #[test]
    fn random_title_draws_from_every_registered_title() {
        let idx = Index::build(
            vec![article(1, "A", &[]), redirect(2, "Alias", "A")],
            2,
        );
        let picked = idx.random_title().unwrap();
        assert!(picked == "a" || picked == "alias");
    }
}
