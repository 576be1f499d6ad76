use std::collections::HashMap;

/// Direction of an [`Edge`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdgeDirection {
    /// Input to consumer: `A -> B` where B reads A as an argument.
    Forward,
    /// Consumer to input: the paired `B -> A` walked during backprop.
    Backward,
}

/// A tagged graph edge between two arena indices.
///
/// `arg` is the positional argument index at which the consumer receives the input;
/// both edges of a pair carry the same tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Edge {
    pub from: usize,
    pub to: usize,
    pub arg: usize,
    pub direction: EdgeDirection,
}

/// Edge storage for a graph: every connection is stored as a forward/backward pair.
///
/// A side index keyed by `(consumer, input)` answers "at which argument positions did
/// `consumer` receive `input`?" without scanning the edge list. More than one position is
/// possible when a node is passed twice to the same consumer (e.g. `x * x`).
#[derive(Debug, Default, Clone)]
pub(crate) struct EdgeSet {
    edges: Vec<Edge>,
    positions: HashMap<(usize, usize), Vec<usize>>,
}

impl EdgeSet {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Wires `input -> consumer` at argument position `arg`, together with its backward twin.
    pub(crate) fn connect(&mut self, input: usize, consumer: usize, arg: usize) {
        self.edges.push(Edge {
            from: input,
            to: consumer,
            arg,
            direction: EdgeDirection::Forward,
        });
        self.edges.push(Edge {
            from: consumer,
            to: input,
            arg,
            direction: EdgeDirection::Backward,
        });
        self.positions.entry((consumer, input)).or_default().push(arg);
    }

    /// Argument positions at which `consumer` reads `input`. Empty if they are not connected.
    pub(crate) fn argument_positions(&self, consumer: usize, input: usize) -> &[usize] {
        self.positions
            .get(&(consumer, input))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &Edge> {
        self.edges.iter()
    }

    pub(crate) fn len(&self) -> usize {
        self.edges.len()
    }

    /// Checks that every forward edge has exactly one backward twin with the same tag.
    pub(crate) fn is_paired(&self) -> bool {
        let mut balance: HashMap<(usize, usize, usize), i64> = HashMap::new();
        for edge in &self.edges {
            match edge.direction {
                EdgeDirection::Forward => *balance.entry((edge.from, edge.to, edge.arg)).or_default() += 1,
                EdgeDirection::Backward => *balance.entry((edge.to, edge.from, edge.arg)).or_default() -= 1,
            }
        }
        balance.values().all(|&count| count == 0)
    }
}
