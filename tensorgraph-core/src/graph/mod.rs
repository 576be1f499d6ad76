//! # Computation Graph (`graph`)
//!
//! [`Graph`] owns every node in a dense arena and the tagged edge set that connects them.
//! Callers hold [`NodeId`] handles; nodes never point back at the graph.
//!
//! Typical lifecycle:
//!
//! 1. Build once: [`Graph::add_source_node`], [`Graph::add_operation_node`],
//!    [`Graph::add_terminal_node`].
//! 2. Per cycle: [`Graph::evaluate`] with a feed, optionally
//!    [`Graph::backward`](crate::graph::Graph::backward), then [`Graph::reset`].
//!
//! Inputs of an operation node must already exist when the node is added, so edges always
//! point from an older node to a newer one and the graph is acyclic by construction.

use crate::error::GraphError;
use crate::ops::{OpConfig, Operation};
use crate::value::{Element, Value};
use log::{debug, trace};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

pub mod edge;
pub mod node;

pub use edge::{Edge, EdgeDirection};
pub use node::{NodeId, NodeVariant};

use edge::EdgeSet;
use node::{Node, NodeKind};

/// Source-name to value bindings for one evaluation cycle.
pub type Feed<T = f64> = HashMap<String, Value<T>>;

static NEXT_GRAPH_ID: AtomicU64 = AtomicU64::new(0);

/// Ordered argument list of an operation node.
///
/// Lets [`Graph::add_operation_node`] accept either a single node or a list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeInputs(Vec<NodeId>);

impl From<NodeId> for NodeInputs {
    fn from(id: NodeId) -> Self {
        NodeInputs(vec![id])
    }
}

impl From<Vec<NodeId>> for NodeInputs {
    fn from(ids: Vec<NodeId>) -> Self {
        NodeInputs(ids)
    }
}

impl From<&[NodeId]> for NodeInputs {
    fn from(ids: &[NodeId]) -> Self {
        NodeInputs(ids.to_vec())
    }
}

impl<const N: usize> From<[NodeId; N]> for NodeInputs {
    fn from(ids: [NodeId; N]) -> Self {
        NodeInputs(ids.to_vec())
    }
}

/// What [`Graph::evaluate`] should compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Targets {
    /// Every registered terminal, in registration order.
    #[default]
    All,
    /// One node (terminal or not).
    Node(NodeId),
}

impl From<NodeId> for Targets {
    fn from(id: NodeId) -> Self {
        Targets::Node(id)
    }
}

/// Result of [`Graph::evaluate`].
#[derive(Debug, Clone, PartialEq)]
pub enum Evaluation<T = f64> {
    /// Value of a single requested node.
    Single(Value<T>),
    /// `(terminal name, value)` for every terminal.
    Named(Vec<(String, Value<T>)>),
}

impl<T: Element> Evaluation<T> {
    /// The value of a single-target evaluation, `None` for a multi-target one.
    pub fn into_single(self) -> Option<Value<T>> {
        match self {
            Evaluation::Single(value) => Some(value),
            Evaluation::Named(_) => None,
        }
    }

    /// The `(name, value)` pairs of a multi-target evaluation, `None` for a single target.
    pub fn into_named(self) -> Option<Vec<(String, Value<T>)>> {
        match self {
            Evaluation::Named(pairs) => Some(pairs),
            Evaluation::Single(_) => None,
        }
    }

    /// Looks up a terminal value by name in a multi-target result.
    pub fn get(&self, name: &str) -> Option<&Value<T>> {
        match self {
            Evaluation::Named(pairs) => pairs.iter().find(|(n, _)| n == name).map(|(_, v)| v),
            Evaluation::Single(_) => None,
        }
    }
}

/// A computation graph over values of element type `T`.
#[derive(Debug)]
pub struct Graph<T: Element = f64> {
    id: u64,
    pub(crate) nodes: Vec<Node<T>>,
    pub(crate) edges: EdgeSet,
    source_nodes: Vec<usize>,
    terminal_nodes: Vec<usize>,
    feed: Feed<T>,
}

impl<T: Element> Default for Graph<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Element> Graph<T> {
    pub fn new() -> Self {
        Graph {
            id: NEXT_GRAPH_ID.fetch_add(1, Ordering::Relaxed),
            nodes: Vec::new(),
            edges: EdgeSet::new(),
            source_nodes: Vec::new(),
            terminal_nodes: Vec::new(),
            feed: Feed::new(),
        }
    }

    // --- Construction ---

    /// Registers a source node named `name`. Names need not be unique; sources sharing a
    /// name read the same feed entry.
    pub fn add_source_node(&mut self, name: impl Into<String>) -> NodeId {
        let name = name.into();
        let index = self.push_node(Node::source(name));
        self.source_nodes.push(index);
        debug!("Graph {}: added source node #{} ('{}')", self.id, index, self.nodes[index].name);
        self.handle(index)
    }

    /// Adds an operation node reading `inputs` in order.
    ///
    /// `inputs` may be a single [`NodeId`] or a list. One forward/backward edge pair is wired
    /// per input, tagged with its argument position, and the new node is appended to each
    /// input's consumer list. `config` is bound into every `apply`/`gradient` call of the node.
    ///
    /// # Errors
    /// `GraphError::UnregisteredNode` if any input was created by a different graph.
    pub fn add_operation_node<O, I>(&mut self, op: O, inputs: I, config: OpConfig) -> Result<NodeId, GraphError>
    where
        O: Operation<T> + 'static,
        I: Into<NodeInputs>,
    {
        let NodeInputs(inputs) = inputs.into();
        let input_indices = inputs
            .iter()
            .map(|&id| self.resolve(id))
            .collect::<Result<Vec<_>, _>>()?;

        let index = self.push_node(Node::operation(Box::new(op), config, input_indices.clone()));
        for (arg, &input) in input_indices.iter().enumerate() {
            self.wire(input, index, arg);
        }
        debug!(
            "Graph {}: added operation node #{} ('{}') with inputs {:?}",
            self.id, index, self.nodes[index].name, input_indices
        );
        Ok(self.handle(index))
    }

    /// Shorthand for [`Graph::add_operation_node`] with a default [`OpConfig`].
    pub fn add_op<O, I>(&mut self, op: O, inputs: I) -> Result<NodeId, GraphError>
    where
        O: Operation<T> + 'static,
        I: Into<NodeInputs>,
    {
        self.add_operation_node(op, inputs, OpConfig::default())
    }

    /// Wraps `node` in a terminal named `name` and registers it for whole-graph evaluation.
    ///
    /// # Errors
    /// `GraphError::UnregisteredNode` if `node` was created by a different graph.
    pub fn add_terminal_node(&mut self, node: NodeId, name: impl Into<String>) -> Result<NodeId, GraphError> {
        let wrapped = self.resolve(node)?;
        let index = self.push_node(Node::terminal(name.into(), wrapped));
        self.wire(wrapped, index, 0);
        self.terminal_nodes.push(index);
        debug!(
            "Graph {}: added terminal node #{} ('{}') wrapping #{}",
            self.id, index, self.nodes[index].name, wrapped
        );
        Ok(self.handle(index))
    }

    fn push_node(&mut self, node: Node<T>) -> usize {
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    fn wire(&mut self, input: usize, consumer: usize, arg: usize) {
        self.edges.connect(input, consumer, arg);
        self.nodes[input].outputs.push(consumer);
    }

    fn handle(&self, index: usize) -> NodeId {
        NodeId { graph: self.id, index }
    }

    /// Maps a handle to its arena index, rejecting handles from other graphs.
    pub(crate) fn resolve(&self, id: NodeId) -> Result<usize, GraphError> {
        if id.graph != self.id || id.index >= self.nodes.len() {
            return Err(GraphError::UnregisteredNode {
                index: id.index,
                expected_graph: self.id,
                actual_graph: id.graph,
            });
        }
        Ok(id.index)
    }

    // --- Evaluation ---

    /// Replaces the feed, then evaluates `targets`.
    ///
    /// Returns [`Evaluation::Single`] for [`Targets::Node`] and [`Evaluation::Named`] with one
    /// `(name, value)` pair per terminal for [`Targets::All`].
    ///
    /// Cached outputs from earlier calls are reused until [`Graph::reset`]; call it before
    /// evaluating with a different feed.
    pub fn evaluate(&mut self, feed: Feed<T>, targets: impl Into<Targets>) -> Result<Evaluation<T>, GraphError> {
        self.bind_feed(feed);
        match targets.into() {
            Targets::Node(id) => {
                let index = self.resolve(id)?;
                Ok(Evaluation::Single(self.forward_index(index)?))
            }
            Targets::All => {
                let terminals = self.terminal_nodes.clone();
                let mut results = Vec::with_capacity(terminals.len());
                for index in terminals {
                    let value = self.forward_index(index)?;
                    results.push((self.nodes[index].name.clone(), value));
                }
                Ok(Evaluation::Named(results))
            }
        }
    }

    /// Evaluates a single terminal (or any node) under `feed` and returns its value.
    pub fn eval_terminal(&mut self, terminal: NodeId, feed: Feed<T>) -> Result<Value<T>, GraphError> {
        self.bind_feed(feed);
        self.forward(terminal)
    }

    /// Replaces the feed without evaluating anything.
    pub fn bind_feed(&mut self, feed: Feed<T>) {
        debug!("Graph {}: binding feed with {} source value(s)", self.id, feed.len());
        self.feed = feed;
    }

    /// Looks up the value bound to source `name` in the current feed.
    ///
    /// # Errors
    /// `GraphError::MissingSourceBinding` if the current feed has no entry for `name`.
    pub fn get_source_value(&self, name: &str) -> Result<&Value<T>, GraphError> {
        self.feed.get(name).ok_or_else(|| GraphError::MissingSourceBinding {
            name: name.to_string(),
        })
    }

    /// Forward-evaluates `node` under the current feed, memoized.
    pub fn forward(&mut self, node: NodeId) -> Result<Value<T>, GraphError> {
        let index = self.resolve(node)?;
        self.forward_index(index)
    }

    /// Memoized forward recursion: a cached output is returned as is; otherwise the inputs
    /// are forced in order, the node's own logic runs once and the result is cached.
    ///
    /// Sources are not cached: they read the current feed on every call.
    pub(crate) fn forward_index(&mut self, index: usize) -> Result<Value<T>, GraphError> {
        if matches!(self.nodes[index].kind, NodeKind::Source) {
            return self.get_source_value(&self.nodes[index].name).cloned();
        }
        if let Some(cached) = &self.nodes[index].output {
            return Ok(cached.clone());
        }

        let inputs = self.nodes[index].inputs.clone();
        let args = inputs
            .iter()
            .map(|&input| self.forward_index(input))
            .collect::<Result<Vec<_>, _>>()?;

        let node = &self.nodes[index];
        let value = match &node.kind {
            NodeKind::Source => self.get_source_value(&node.name)?.clone(),
            NodeKind::Operation { op, config } => op.apply(&args, config)?,
            NodeKind::Terminal => args.into_iter().next().ok_or_else(|| GraphError::ArityMismatch {
                operation: node.name.clone(),
                expected: 1,
                actual: 0,
            })?,
        };
        trace!("forward #{} ('{}') -> shape {:?}", index, node.name, value.shape());

        self.nodes[index].output = Some(value.clone());
        Ok(value)
    }

    // --- Lifecycle ---

    /// Clears the cached output and both gradient caches of every node.
    ///
    /// The feed is left in place; the next [`Graph::evaluate`] replaces it.
    pub fn reset(&mut self) {
        for node in self.nodes.iter_mut() {
            node.reset();
        }
        debug!("Graph {}: reset {} node(s)", self.id, self.nodes.len());
    }

    // --- Introspection ---

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn source_nodes(&self) -> Vec<NodeId> {
        self.source_nodes.iter().map(|&i| self.handle(i)).collect()
    }

    pub fn terminal_nodes(&self) -> Vec<NodeId> {
        self.terminal_nodes.iter().map(|&i| self.handle(i)).collect()
    }

    pub fn node_name(&self, node: NodeId) -> Result<&str, GraphError> {
        Ok(&self.nodes[self.resolve(node)?].name)
    }

    pub fn node_variant(&self, node: NodeId) -> Result<NodeVariant, GraphError> {
        Ok(self.nodes[self.resolve(node)?].variant())
    }

    /// Ordered arguments of `node`.
    pub fn input_nodes(&self, node: NodeId) -> Result<Vec<NodeId>, GraphError> {
        let index = self.resolve(node)?;
        Ok(self.nodes[index].inputs.iter().map(|&i| self.handle(i)).collect())
    }

    /// Consumers of `node`, in the order they were added.
    pub fn output_nodes(&self, node: NodeId) -> Result<Vec<NodeId>, GraphError> {
        let index = self.resolve(node)?;
        Ok(self.nodes[index].outputs.iter().map(|&i| self.handle(i)).collect())
    }

    /// Output cached by the last forward evaluation, if any since the last reset.
    /// Always `None` for sources, which read the feed directly.
    pub fn cached_output(&self, node: NodeId) -> Result<Option<&Value<T>>, GraphError> {
        Ok(self.nodes[self.resolve(node)?].output.as_ref())
    }

    /// Accumulated self gradient ("grads_self") since the last reset.
    pub fn self_gradient(&self, node: NodeId) -> Result<Option<&Value<T>>, GraphError> {
        Ok(self.nodes[self.resolve(node)?].grads_self.as_ref())
    }

    /// Accumulated input gradients ("grads_input") since the last reset.
    pub fn input_gradients(&self, node: NodeId) -> Result<Option<&[Value<T>]>, GraphError> {
        Ok(self.nodes[self.resolve(node)?].grads_input.as_deref())
    }

    /// Argument positions at which `consumer` reads `input`, from the backward edge tags.
    pub fn argument_positions(&self, consumer: NodeId, input: NodeId) -> Result<Vec<usize>, GraphError> {
        let consumer = self.resolve(consumer)?;
        let input = self.resolve(input)?;
        Ok(self.edges.argument_positions(consumer, input).to_vec())
    }

    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.iter()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// True if every forward edge has a backward twin carrying the same argument index.
    pub fn edges_paired(&self) -> bool {
        self.edges.is_paired()
    }
}

#[cfg(test)]
#[path = "graph_test.rs"]
mod tests;
