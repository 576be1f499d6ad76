use crate::graph::Graph;
use crate::value::Element;

/// Nodes lying on at least one directed path from a backward seed to one of the targets.
///
/// Backward accumulation only consults consumers inside this set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestrictionSet {
    members: Vec<bool>,
}

impl RestrictionSet {
    pub fn contains(&self, index: usize) -> bool {
        self.members.get(index).copied().unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.members.iter().filter(|&&m| m).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Member indices in arena order.
    pub fn indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.members
            .iter()
            .enumerate()
            .filter_map(|(i, &m)| if m { Some(i) } else { None })
    }
}

/// Computes the restriction set for a backward pass seeded at `seed`.
///
/// Two linear passes: everything the seed depends on (walking inputs), intersected with
/// everything that depends on some target (walking consumers). On a DAG this is exactly the
/// union of the vertices of all simple paths from the seed to the targets.
pub(crate) fn restriction_set<T: Element>(graph: &Graph<T>, seed: usize, targets: &[usize]) -> RestrictionSet {
    let ancestors_of_seed = reach(graph.nodes.len(), &[seed], move |i| &graph.nodes[i].inputs);
    let descendants_of_targets = reach(graph.nodes.len(), targets, move |i| &graph.nodes[i].outputs);
    let members = ancestors_of_seed
        .iter()
        .zip(descendants_of_targets.iter())
        .map(|(&a, &d)| a && d)
        .collect();
    RestrictionSet { members }
}

/// Iterative DFS marking every node reachable from `starts` (inclusive) through `next`.
fn reach<'a, F>(len: usize, starts: &[usize], next: F) -> Vec<bool>
where
    F: Fn(usize) -> &'a Vec<usize>,
{
    let mut seen = vec![false; len];
    let mut stack: Vec<usize> = starts.to_vec();
    while let Some(index) = stack.pop() {
        if seen[index] {
            continue;
        }
        seen[index] = true;
        stack.extend(next(index).iter().copied().filter(|&n| !seen[n]));
    }
    seen
}

#[cfg(test)]
#[path = "restriction_test.rs"]
mod tests;
