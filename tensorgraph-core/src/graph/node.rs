use crate::error::GraphError;
use crate::ops::{LocalGradient, OpConfig, Operation};
use crate::value::{add_op, Element, Value};
use std::fmt;

/// Handle to a node stored in a [`Graph`](super::Graph).
///
/// Handles are cheap copies. They carry the id of the graph that created them so a
/// graph can reject handles that belong to another graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    pub(crate) graph: u64,
    pub(crate) index: usize,
}

impl NodeId {
    /// Position of the node in its graph's arena (creation order).
    pub fn index(&self) -> usize {
        self.index
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.index)
    }
}

/// The three node variants, without their payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeVariant {
    Source,
    Operation,
    Terminal,
}

pub(crate) enum NodeKind<T: Element> {
    /// Reads its value from the graph's feed under the node name.
    Source,
    /// Delegates to a boxed operation, with its construction-time config.
    Operation {
        op: Box<dyn Operation<T>>,
        config: OpConfig,
    },
    /// Pass-through wrapper marking an evaluation / differentiation root.
    Terminal,
}

impl<T: Element> fmt::Debug for NodeKind<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKind::Source => write!(f, "Source"),
            NodeKind::Operation { op, config } => f
                .debug_struct("Operation")
                .field("op", op)
                .field("config", config)
                .finish(),
            NodeKind::Terminal => write!(f, "Terminal"),
        }
    }
}

/// A vertex of the computation graph together with its caches.
#[derive(Debug)]
pub(crate) struct Node<T: Element> {
    pub(crate) name: String,
    pub(crate) kind: NodeKind<T>,
    /// Ordered arguments.
    pub(crate) inputs: Vec<usize>,
    /// Consumers, append-only. A consumer appears once per argument slot it uses.
    pub(crate) outputs: Vec<usize>,
    pub(crate) output: Option<Value<T>>,
    pub(crate) grads_self: Option<Value<T>>,
    pub(crate) grads_input: Option<Vec<Value<T>>>,
}

impl<T: Element> Node<T> {
    fn with_kind(name: String, kind: NodeKind<T>, inputs: Vec<usize>) -> Self {
        Node {
            name,
            kind,
            inputs,
            outputs: Vec::new(),
            output: None,
            grads_self: None,
            grads_input: None,
        }
    }

    pub(crate) fn source(name: String) -> Self {
        Self::with_kind(name, NodeKind::Source, Vec::new())
    }

    pub(crate) fn operation(op: Box<dyn Operation<T>>, config: OpConfig, inputs: Vec<usize>) -> Self {
        let name = op.name().to_string();
        Self::with_kind(name, NodeKind::Operation { op, config }, inputs)
    }

    pub(crate) fn terminal(name: String, wrapped: usize) -> Self {
        Self::with_kind(name, NodeKind::Terminal, vec![wrapped])
    }

    pub(crate) fn variant(&self) -> NodeVariant {
        match self.kind {
            NodeKind::Source => NodeVariant::Source,
            NodeKind::Operation { .. } => NodeVariant::Operation,
            NodeKind::Terminal => NodeVariant::Terminal,
        }
    }

    /// Local gradient rule of this node.
    ///
    /// Sources and terminals pass the upstream gradient through as their single
    /// input gradient. For a source this is the gradient with respect to its fed value.
    pub(crate) fn local_gradient(
        &self,
        inputs: &[Value<T>],
        upstream: &Value<T>,
    ) -> Result<LocalGradient<T>, GraphError> {
        match &self.kind {
            NodeKind::Source | NodeKind::Terminal => Ok(LocalGradient::new(vec![upstream.clone()])),
            NodeKind::Operation { op, config } => {
                let local = op.gradient(inputs, upstream, config)?;
                if local.input_grads.len() != inputs.len() {
                    return Err(GraphError::GradientArityMismatch {
                        node: self.name.clone(),
                        expected: inputs.len(),
                        actual: local.input_grads.len(),
                    });
                }
                Ok(local)
            }
        }
    }

    /// Merges a freshly computed local gradient into the cached accumulators.
    pub(crate) fn accumulate(&mut self, local: &LocalGradient<T>) -> Result<(), GraphError> {
        if let Some(grad) = &local.self_grad {
            self.grads_self = Some(match self.grads_self.take() {
                Some(existing) => add_op(&existing, grad)?,
                None => grad.clone(),
            });
        }
        self.grads_input = Some(match self.grads_input.take() {
            Some(existing) => existing
                .iter()
                .zip(local.input_grads.iter())
                .map(|(a, b)| add_op(a, b))
                .collect::<Result<Vec<_>, _>>()?,
            None => local.input_grads.clone(),
        });
        Ok(())
    }

    /// Drops the cached output and both gradient accumulators.
    pub(crate) fn reset(&mut self) {
        self.output = None;
        self.grads_self = None;
        self.grads_input = None;
    }
}
