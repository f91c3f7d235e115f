//! Best-first search core shared by A*, Dijkstra and JPS. Successors are generated with the
//! parent in view, which JPS needs for pruning; A* and Dijkstra ignore it. The open list orders
//! by estimated total cost and prefers the deeper node on ties, and every outcome carries the
//! number of expanded nodes whether or not the goal was reached.
use fxhash::FxBuildHasher;
use indexmap::map::Entry::{Occupied, Vacant};
use indexmap::IndexMap;
use num_traits::Zero;
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::hash::Hash;

type FxIndexMap<K, V> = IndexMap<K, V, FxBuildHasher>;

/// Open-list entry pointing into the node table by index.
struct OpenNode<C> {
    f: C,
    g: C,
    index: usize,
}

impl<C: PartialEq> Eq for OpenNode<C> {}

impl<C: PartialEq> PartialEq for OpenNode<C> {
    fn eq(&self, other: &Self) -> bool {
        self.f == other.f && self.g == other.g
    }
}

impl<C: Ord> PartialOrd for OpenNode<C> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<C: Ord> Ord for OpenNode<C> {
    /// Max-heap order: smaller `f` ranks higher, then larger `g`.
    fn cmp(&self, other: &Self) -> Ordering {
        other.f.cmp(&self.f).then_with(|| self.g.cmp(&other.g))
    }
}

/// Walks parent indices back from `index` to the root and returns the nodes root first.
fn trace_back<N: Clone, C>(nodes: &FxIndexMap<N, (usize, C)>, index: usize) -> Vec<N> {
    let mut path: Vec<N> = std::iter::successors(Some(index), |&i| {
        nodes.get_index(i).map(|(_, &(parent, _))| parent)
    })
    .map_while(|i| nodes.get_index(i).map(|(node, _)| node.clone()))
    .collect();
    path.reverse();
    path
}

/// Outcome of [astar_jps]: the path with its cost if the goal was reached, and the number of
/// nodes that were expanded either way.
pub struct SearchOutcome<N, C> {
    pub path: Option<(Vec<N>, C)>,
    pub expanded: usize,
}

pub fn astar_jps<N, C, FN, IN, FH, FS>(
    start: &N,
    mut successors: FN,
    mut heuristic: FH,
    mut success: FS,
) -> SearchOutcome<N, C>
where
    N: Eq + Hash + Clone,
    C: Zero + Ord + Copy,
    FN: FnMut(&Option<&N>, &N) -> IN,
    IN: IntoIterator<Item = (N, C)>,
    FH: FnMut(&N) -> C,
    FS: FnMut(&N) -> bool,
{
    // Node table: parent index and best known cost. The root's parent is usize::MAX.
    let mut nodes: FxIndexMap<N, (usize, C)> = FxIndexMap::default();
    nodes.insert(start.clone(), (usize::MAX, Zero::zero()));
    let mut open = BinaryHeap::new();
    open.push(OpenNode {
        f: Zero::zero(),
        g: Zero::zero(),
        index: 0,
    });
    let mut expanded = 0;
    while let Some(OpenNode { g, index, .. }) = open.pop() {
        let next = {
            let Some((node, &(parent_index, best))) = nodes.get_index(index) else {
                continue;
            };
            // Stale entry, the node was reached more cheaply after this was pushed.
            if g > best {
                continue;
            }
            expanded += 1;
            if success(node) {
                return SearchOutcome {
                    path: Some((trace_back(&nodes, index), g)),
                    expanded,
                };
            }
            let parent = nodes.get_index(parent_index).map(|(p, _)| p);
            successors(&parent, node)
        };
        for (successor, step) in next {
            let new_g = g + step;
            let (h, successor_index) = match nodes.entry(successor) {
                Vacant(e) => {
                    let h = heuristic(e.key());
                    let ix = e.index();
                    e.insert((index, new_g));
                    (h, ix)
                }
                Occupied(mut e) if new_g < e.get().1 => {
                    let h = heuristic(e.key());
                    let ix = e.index();
                    e.insert((index, new_g));
                    (h, ix)
                }
                Occupied(_) => continue,
            };
            open.push(OpenNode {
                f: new_g + h,
                g: new_g,
                index: successor_index,
            });
        }
    }
    SearchOutcome {
        path: None,
        expanded,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_cheapest_route_on_small_graph() {
        // 0 -> 1 (5), 0 -> 2 (1), 2 -> 1 (1)
        let edges = |n: &u32| -> Vec<(u32, u32)> {
            match n {
                0 => vec![(1, 5), (2, 1)],
                2 => vec![(1, 1)],
                _ => vec![],
            }
        };
        let outcome = astar_jps(&0u32, |_, n| edges(n), |_| 0u32, |n| *n == 1);
        let (path, cost) = outcome.path.unwrap();
        assert_eq!(path, vec![0, 2, 1]);
        assert_eq!(cost, 2);
        assert_eq!(outcome.expanded, 3);
    }

    #[test]
    fn exhausted_frontier_reports_expansions() {
        let outcome = astar_jps(
            &0u32,
            |_, n| if *n < 3 { vec![(n + 1, 1u32)] } else { vec![] },
            |_| 0,
            |n| *n == 10,
        );
        assert!(outcome.path.is_none());
        assert_eq!(outcome.expanded, 4);
    }
}
