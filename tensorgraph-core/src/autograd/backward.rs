use crate::autograd::restriction::{restriction_set, RestrictionSet};
use crate::error::GraphError;
use crate::graph::node::NodeKind;
use crate::graph::{Graph, NodeId};
use crate::value::{add_op, Element, Value};
use log::{debug, trace, warn};
use std::collections::HashMap;

/// Gradients returned by [`Graph::backward`]: one list per requested target.
pub type Gradients<T = f64> = Vec<Vec<Value<T>>>;

/// State of a single backward call.
struct BackwardPass<T> {
    seed: usize,
    restriction: RestrictionSet,
    /// Input-gradient lists already computed during this call.
    computed: HashMap<usize, Vec<Value<T>>>,
}

impl<T: Element> Graph<T> {
    /// Reverse-mode differentiation of `terminal` with respect to `targets`.
    ///
    /// The backward pass is seeded with `1.0` at the terminal and only walks nodes on some
    /// path from the terminal to a target. For each target, in order, returns the gradient
    /// list flowing from that target into its own inputs. A source target yields a
    /// one-element list: the gradient with respect to its fed value.
    ///
    /// Forward evaluation under the current feed is triggered as needed. Every visited
    /// node's `grads_self` / `grads_input` caches are additively merged, so several backward
    /// calls before [`Graph::reset`] accumulate there; the returned lists only cover this call.
    ///
    /// # Errors
    /// * `GraphError::UnregisteredNode` if a handle belongs to another graph.
    /// * `GraphError::NotATerminal` if `terminal` is not a terminal node.
    /// * `GraphError::UnreachableTarget` if a target has no path from `terminal`.
    /// * Any error raised by forward evaluation or by a gradient rule.
    pub fn backward(&mut self, terminal: NodeId, targets: &[NodeId]) -> Result<Gradients<T>, GraphError> {
        let seed = self.resolve(terminal)?;
        if !matches!(self.nodes[seed].kind, NodeKind::Terminal) {
            return Err(GraphError::NotATerminal {
                index: seed,
                name: self.nodes[seed].name.clone(),
            });
        }
        let target_indices = targets
            .iter()
            .map(|&t| self.resolve(t))
            .collect::<Result<Vec<_>, _>>()?;
        if target_indices.is_empty() {
            warn!("backward called on terminal '{}' with no targets", self.nodes[seed].name);
            return Ok(Vec::new());
        }

        let restriction = restriction_set(self, seed, &target_indices);
        if let Some(&target) = target_indices.iter().find(|&&t| !restriction.contains(t)) {
            return Err(GraphError::UnreachableTarget {
                seed,
                target,
                name: self.nodes[target].name.clone(),
            });
        }
        debug!(
            "backward from terminal #{} ('{}') to {:?}: {} node(s) in restriction set",
            seed,
            self.nodes[seed].name,
            target_indices,
            restriction.len()
        );

        let mut pass = BackwardPass {
            seed,
            restriction,
            computed: HashMap::new(),
        };
        target_indices
            .iter()
            .map(|&target| self.backward_index(target, &mut pass))
            .collect()
    }

    /// Nodes a backward pass from `terminal` to `targets` would visit.
    pub fn restriction(&self, terminal: NodeId, targets: &[NodeId]) -> Result<RestrictionSet, GraphError> {
        let seed = self.resolve(terminal)?;
        let target_indices = targets
            .iter()
            .map(|&t| self.resolve(t))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(restriction_set(self, seed, &target_indices))
    }

    /// Gradient of `terminal` with respect to each source in `sources`, one value per source.
    pub fn source_gradients(&mut self, terminal: NodeId, sources: &[NodeId]) -> Result<Vec<Value<T>>, GraphError> {
        let gradients = self.backward(terminal, sources)?;
        gradients
            .into_iter()
            .zip(sources.iter())
            .map(|(grads, &source)| {
                let produced = grads.len();
                grads.into_iter().next().ok_or_else(|| GraphError::GradientArityMismatch {
                    node: self.nodes[source.index()].name.clone(),
                    expected: 1,
                    actual: produced,
                })
            })
            .collect()
    }

    /// Computes (once per pass) the gradient list a node sends to its inputs.
    fn backward_index(&mut self, index: usize, pass: &mut BackwardPass<T>) -> Result<Vec<Value<T>>, GraphError> {
        if let Some(grads) = pass.computed.get(&index) {
            return Ok(grads.clone());
        }

        let inputs = self.nodes[index].inputs.clone();
        let args = inputs
            .iter()
            .map(|&input| self.forward_index(input))
            .collect::<Result<Vec<_>, _>>()?;

        let upstream = if index == pass.seed {
            Value::scalar(T::one())
        } else {
            self.upstream_gradient(index, pass)?
        };

        let local = self.nodes[index].local_gradient(&args, &upstream)?;
        self.nodes[index].accumulate(&local)?;
        trace!(
            "backward #{} ('{}'): {} input gradient(s)",
            index,
            self.nodes[index].name,
            local.input_grads.len()
        );

        pass.computed.insert(index, local.input_grads.clone());
        Ok(local.input_grads)
    }

    /// Sums, over every consumer inside the restriction set, the gradient component that
    /// consumer sends back at each argument position where it reads `index`.
    fn upstream_gradient(&mut self, index: usize, pass: &mut BackwardPass<T>) -> Result<Value<T>, GraphError> {
        let mut consumers: Vec<usize> = self.nodes[index]
            .outputs
            .iter()
            .copied()
            .filter(|&c| pass.restriction.contains(c))
            .collect();
        consumers.sort_unstable();
        consumers.dedup();

        let mut total: Option<Value<T>> = None;
        for consumer in consumers {
            let consumer_grads = self.backward_index(consumer, pass)?;
            for &arg in self.edges.argument_positions(consumer, index) {
                let component = consumer_grads.get(arg).ok_or_else(|| GraphError::GradientArityMismatch {
                    node: self.nodes[consumer].name.clone(),
                    expected: arg + 1,
                    actual: consumer_grads.len(),
                })?;
                total = Some(match total {
                    Some(acc) => add_op(&acc, component)?,
                    None => component.clone(),
                });
            }
        }

        // Every non-seed member of the restriction set has a consumer inside it.
        total.ok_or_else(|| GraphError::UnreachableTarget {
            seed: pass.seed,
            target: index,
            name: self.nodes[index].name.clone(),
        })
    }
}

#[cfg(test)]
#[path = "backward_test.rs"]
mod tests;
