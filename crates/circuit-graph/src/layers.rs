//! Parametrized layers for batched differentiation.
//!
//! A layer groups trainable operations that can be perturbed at the same time:
//! no member depends on another, directly or through intermediate operations.
//! Layers are built greedily in parameter order. A parameter joins the open
//! layer unless one of the layer's operations is among its owner's ancestors.

use petgraph::Direction;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::dag::{CircuitGraph, NodeIndex};
use crate::operator::{Generator, Operator};

/// A group of mutually independent parametrized operations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layer {
    /// Queue indices of the operations, in queue order.
    pub ops: Vec<usize>,
    /// Flattened indices of the trainable parameters the operations contribute.
    pub param_inds: Vec<usize>,
}

impl Layer {
    /// Generator of each operation in the layer.
    pub fn generators<O: Operator>(&self, graph: &CircuitGraph<O>) -> Vec<Option<Generator>> {
        self.ops
            .iter()
            .map(|&idx| graph.get(idx).and_then(Operator::generator))
            .collect()
    }
}

/// A layer together with the nodes before and after it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerData {
    /// Nodes preceding any operation of the layer, in queue order.
    pub pre_ops: Vec<usize>,
    /// Operations of the layer, in queue order.
    pub ops: Vec<usize>,
    /// Flattened trainable parameter indices of the layer.
    pub param_inds: Vec<usize>,
    /// Nodes following any operation of the layer, in queue order.
    pub post_ops: Vec<usize>,
}

impl<O: Operator> CircuitGraph<O> {
    /// Partition the trainable parameters of the operations into layers.
    ///
    /// Observable parameters never belong to a layer. Returns an empty vector
    /// if no operation parameter is trainable.
    pub fn parametrized_layers(&self) -> Vec<Layer> {
        let mut layers: Vec<Layer> = Vec::new();

        for (idx, info) in self.par_info().iter().enumerate() {
            if !self.trainable_params().contains(&idx) {
                continue;
            }
            if self.node(info.node).is_none_or(|n| !n.is_operation()) {
                continue;
            }

            match layers.last_mut() {
                // Further parameters of the operation that opened or last joined the layer.
                Some(layer) if layer.ops.last() == Some(&info.node) => {
                    layer.param_inds.push(idx);
                    continue;
                }
                _ => {}
            }

            let ancestors =
                self.reachable_from(&[NodeIndex::new(info.node)], Direction::Incoming);
            let depends_on_open_layer = layers
                .last()
                .is_none_or(|layer| layer.ops.iter().any(|op| ancestors.contains(op)));

            if depends_on_open_layer {
                layers.push(Layer::default());
            }
            if let Some(layer) = layers.last_mut() {
                layer.ops.push(info.node);
                layer.param_inds.push(idx);
            }
        }

        debug!(layers = layers.len(), "Computed parametrized layers");
        layers
    }

    /// Iterate over the parametrized layers with their preceding and
    /// succeeding nodes.
    ///
    /// The iterator is finite and each call starts a fresh pass.
    pub fn iterate_parametrized_layers(&self) -> LayerIter<'_, O> {
        LayerIter {
            graph: self,
            layers: self.parametrized_layers().into_iter(),
        }
    }
}

/// Iterator over [`LayerData`], computed one layer at a time.
pub struct LayerIter<'a, O> {
    graph: &'a CircuitGraph<O>,
    layers: std::vec::IntoIter<Layer>,
}

impl<O> Clone for LayerIter<'_, O> {
    fn clone(&self) -> Self {
        Self {
            graph: self.graph,
            layers: self.layers.clone(),
        }
    }
}

impl<O: Operator> Iterator for LayerIter<'_, O> {
    type Item = LayerData;

    fn next(&mut self) -> Option<Self::Item> {
        let layer = self.layers.next()?;
        let members = layer
            .ops
            .iter()
            .map(|&idx| NodeIndex::new(idx))
            .collect::<Vec<_>>();

        Some(LayerData {
            pre_ops: self
                .graph
                .reachable_from(&members, Direction::Incoming)
                .into_iter()
                .collect(),
            post_ops: self
                .graph
                .reachable_from(&members, Direction::Outgoing)
                .into_iter()
                .collect(),
            ops: layer.ops,
            param_inds: layer.param_inds,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.layers.size_hint()
    }
}

impl<O: Operator> ExactSizeIterator for LayerIter<'_, O> {}
