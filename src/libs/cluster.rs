//! Connected components over links.
//!
//! Every ID appearing in a link is a node, and all members of a link are connected.
//! Components are walked with petgraph's [`Dfs`], which keeps its own stack, so long
//! transitive chains don't hit any recursion limit.

use crate::libs::links::Link;
use indexmap::IndexSet;
use itertools::Itertools;
use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::{Dfs, VisitMap};
use std::io::Write;

/// Undirected graph of IDs, nodes numbered in order of first appearance.
#[derive(Debug, Default)]
pub struct LinkGraph {
    ids: IndexSet<String>,
    graph: UnGraph<(), ()>,
}

impl LinkGraph {
    pub fn new() -> Self {
        Default::default()
    }

    fn node(&mut self, id: &str) -> NodeIndex {
        match self.ids.get_index_of(id) {
            Some(idx) => NodeIndex::new(idx),
            None => {
                self.ids.insert(id.to_string());
                self.graph.add_node(())
            }
        }
    }

    /// Connects the members of `link` through its first member.
    pub fn add_link(&mut self, link: &[String]) {
        let Some((first, rest)) = link.split_first() else {
            return;
        };
        let hub = self.node(first);
        for id in rest {
            let other = self.node(id);
            if other != hub {
                self.graph.add_edge(hub, other, ());
            }
        }
    }

    pub fn extend<'a>(&mut self, links: impl IntoIterator<Item = &'a Link>) {
        for link in links {
            self.add_link(link);
        }
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// One sorted member list per component, components in order of their first node.
    pub fn clusters(&self) -> Vec<Vec<String>> {
        let mut clusters = vec![];
        let mut dfs = Dfs::empty(&self.graph);

        for start in self.graph.node_indices() {
            if dfs.discovered.is_visited(&start) {
                continue;
            }

            dfs.move_to(start);
            let mut members: Vec<String> = vec![];
            while let Some(node) = dfs.next(&self.graph) {
                if let Some(id) = self.ids.get_index(node.index()) {
                    members.push(id.clone());
                }
            }
            members.sort();
            clusters.push(members);
        }

        clusters
    }
}

/// Merges all link lists into clusters.
///
/// ```
/// use cnehg::libs::cluster::merge_links;
///
/// let to_links = |v: &[&[&str]]| -> Vec<Vec<String>> {
///     v.iter().map(|l| l.iter().map(|s| s.to_string()).collect()).collect()
/// };
/// let pairwise = to_links(&[&["A1", "B1"], &["B1", "C1"]]);
/// let threeway = to_links(&[&["C1", "D1"]]);
///
/// let clusters = merge_links(&[pairwise, threeway]);
/// assert_eq!(clusters, vec![vec!["A1", "B1", "C1", "D1"]]);
/// ```
pub fn merge_links(lists: &[Vec<Link>]) -> Vec<Vec<String>> {
    let mut graph = LinkGraph::new();
    for links in lists {
        graph.extend(links);
    }

    let clusters = graph.clusters();
    log::info!(
        "{} nodes, {} edges, {} clusters",
        graph.node_count(),
        graph.edge_count(),
        clusters.len()
    );

    clusters
}

/// One cluster per line, members joined by `sep`.
pub fn write_clusters(clusters: &[Vec<String>], sep: &str, writer: &mut dyn Write) -> std::io::Result<()> {
    for members in clusters {
        writeln!(writer, "{}", members.iter().join(sep))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn links(v: &[&[&str]]) -> Vec<Link> {
        v.iter()
            .map(|l| l.iter().map(|s| s.to_string()).collect())
            .collect()
    }

    #[test]
    fn test_transitive_merge() {
        let clusters = merge_links(&[
            links(&[&["A1", "B1"], &["B1", "C1"]]),
            links(&[&["C1", "D1"]]),
        ]);
        assert_eq!(clusters, vec![vec!["A1", "B1", "C1", "D1"]]);
    }

    #[test]
    fn test_partition() {
        let input = links(&[
            &["b_cne_2", "a_cne_1"],
            &["c_cne_5", "d_cne_1"],
            &["a_cne_1", "c_cne_9", "e_cne_3"],
            &["f_cne_1", "f_cne_1"],
            &["g_cne_4"],
            &["d_cne_1", "h_cne_2"],
        ]);
        let clusters = merge_links(&[input.clone()]);

        assert_eq!(
            clusters,
            vec![
                vec!["a_cne_1", "b_cne_2", "c_cne_9", "e_cne_3"],
                vec!["c_cne_5", "d_cne_1", "h_cne_2"],
                vec!["f_cne_1"],
                vec!["g_cne_4"],
            ]
        );

        // every linked ID lands in exactly one cluster
        let all: HashSet<&String> = input.iter().flatten().collect();
        let mut seen: HashSet<&String> = HashSet::new();
        for id in clusters.iter().flatten() {
            assert!(seen.insert(id), "{} appears twice", id);
        }
        assert_eq!(seen, all);
    }

    #[test]
    fn test_empty_input() {
        assert!(merge_links(&[]).is_empty());
        assert!(merge_links(&[vec![], vec![vec![]]]).is_empty());
    }

    #[test]
    fn test_long_chain() {
        let chain: Vec<Link> = (0..200_000)
            .map(|i| vec![format!("n{}", i), format!("n{}", i + 1)])
            .collect();
        let clusters = merge_links(&[chain]);
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].len(), 200_001);
    }

    #[test]
    fn test_deterministic() {
        let input = links(&[&["x2", "y1"], &["z3", "x2"], &["q1", "r1"]]);
        let first = merge_links(&[input.clone()]);
        let second = merge_links(&[input]);
        assert_eq!(first, second);

        let mut buf = vec![];
        write_clusters(&first, ",", &mut buf).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "x2,y1,z3\nq1,r1\n");
    }
}
