//! Wire labels and the wire index.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{GraphError, GraphResult};

/// Label of a wire an operator acts on.
///
/// Wires are opaque: integer and string labels can be mixed freely within
/// one circuit. Serialized untagged, so `0` and `"a"` are both valid JSON
/// wires.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Wire {
    /// An integer label.
    Index(i64),
    /// A string label.
    Label(String),
}

impl fmt::Display for Wire {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Wire::Index(i) => write!(f, "{i}"),
            Wire::Label(l) => write!(f, "{l}"),
        }
    }
}

impl From<i32> for Wire {
    fn from(id: i32) -> Self {
        Wire::Index(i64::from(id))
    }
}

impl From<i64> for Wire {
    fn from(id: i64) -> Self {
        Wire::Index(id)
    }
}

impl From<u32> for Wire {
    fn from(id: u32) -> Self {
        Wire::Index(i64::from(id))
    }
}

impl From<&str> for Wire {
    fn from(label: &str) -> Self {
        Wire::Label(label.to_string())
    }
}

impl From<String> for Wire {
    fn from(label: String) -> Self {
        Wire::Label(label)
    }
}

/// An ordered list of wires.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Wires(Vec<Wire>);

impl Wires {
    /// Create a wire list from anything convertible into wires.
    pub fn new<W: Into<Wire>>(wires: impl IntoIterator<Item = W>) -> Self {
        Self(wires.into_iter().map(Into::into).collect())
    }

    /// Number of wires in the list.
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if the list is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Check if the list contains a wire.
    pub fn contains(&self, wire: &Wire) -> bool {
        self.0.contains(wire)
    }

    /// Iterate over the wires in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Wire> {
        self.0.iter()
    }

    /// The wires as a slice.
    #[inline]
    pub fn as_slice(&self) -> &[Wire] {
        &self.0
    }

    /// The first wire that appears more than once, if any.
    pub fn first_duplicate(&self) -> Option<&Wire> {
        let mut seen = rustc_hash::FxHashSet::default();
        self.0.iter().find(|w| !seen.insert(*w))
    }
}

impl fmt::Display for Wires {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, wire) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{wire}")?;
        }
        write!(f, "]")
    }
}

impl<T: Into<Wire>, const N: usize> From<[T; N]> for Wires {
    fn from(wires: [T; N]) -> Self {
        Self::new(wires)
    }
}

impl From<Vec<Wire>> for Wires {
    fn from(wires: Vec<Wire>) -> Self {
        Self(wires)
    }
}

impl IntoIterator for Wires {
    type Item = Wire;
    type IntoIter = std::vec::IntoIter<Wire>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Wires {
    type Item = &'a Wire;
    type IntoIter = std::slice::Iter<'a, Wire>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Maps wire labels to compact positions and back.
///
/// The set of wires is fixed once the index is built.
#[derive(Debug, Clone, Default)]
pub struct WireIndex {
    labels: Vec<Wire>,
    positions: FxHashMap<Wire, usize>,
}

impl WireIndex {
    /// Build an index from a declared wire set, preserving declared order.
    pub fn new(wires: &Wires) -> GraphResult<Self> {
        let mut index = Self::default();
        for wire in wires {
            if !index.insert(wire) {
                return Err(GraphError::DuplicateWire {
                    wire: wire.clone(),
                    operation: None,
                });
            }
        }
        Ok(index)
    }

    /// Build an index from the wires used by a queue, in first-seen order.
    pub fn from_queue<'a>(wire_lists: impl IntoIterator<Item = &'a Wires>) -> Self {
        let mut index = Self::default();
        for wires in wire_lists {
            for wire in wires {
                index.insert(wire);
            }
        }
        index
    }

    fn insert(&mut self, wire: &Wire) -> bool {
        if self.positions.contains_key(wire) {
            return false;
        }
        self.positions.insert(wire.clone(), self.labels.len());
        self.labels.push(wire.clone());
        true
    }

    /// Position of a wire label.
    #[inline]
    pub fn position(&self, wire: &Wire) -> Option<usize> {
        self.positions.get(wire).copied()
    }

    /// Label at a position.
    #[inline]
    pub fn label(&self, position: usize) -> Option<&Wire> {
        self.labels.get(position)
    }

    /// Check if the index knows a wire.
    pub fn contains(&self, wire: &Wire) -> bool {
        self.positions.contains_key(wire)
    }

    /// Number of wires.
    #[inline]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Check if the index has no wires.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Iterate over wire labels in position order.
    pub fn iter(&self) -> std::slice::Iter<'_, Wire> {
        self.labels.iter()
    }

    /// The indexed wires as an ordered list.
    pub fn to_wires(&self) -> Wires {
        Wires(self.labels.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_display() {
        assert_eq!(format!("{}", Wire::from(0)), "0");
        assert_eq!(format!("{}", Wire::from("q1")), "q1");
        assert_eq!(format!("{}", Wires::new([Wire::from("a"), Wire::from(3)])), "[a, 3]");
    }

    #[test]
    fn test_wire_serde_untagged() {
        let wires = Wires::new([Wire::from("a"), Wire::from(3)]);
        let json = serde_json::to_string(&wires).unwrap();
        assert_eq!(json, r#"["a",3]"#);
        let back: Wires = serde_json::from_str(&json).unwrap();
        assert_eq!(back, wires);
    }

    #[test]
    fn test_index_declared_order() {
        let index = WireIndex::new(&Wires::new([Wire::from("a"), Wire::from("q1"), Wire::from(3)]))
            .unwrap();
        assert_eq!(index.len(), 3);
        assert_eq!(index.position(&Wire::from("q1")), Some(1));
        assert_eq!(index.label(2), Some(&Wire::from(3)));
        assert_eq!(index.position(&Wire::from(7)), None);
        assert_eq!(index.label(3), None);
    }

    #[test]
    fn test_index_rejects_duplicates() {
        let result = WireIndex::new(&Wires::from([0, 1, 0]));
        match result {
            Err(GraphError::DuplicateWire { wire, operation }) => {
                assert_eq!(wire, Wire::from(0));
                assert!(operation.is_none());
            }
            _ => panic!("Expected DuplicateWire error"),
        }
    }

    #[test]
    fn test_index_from_queue_first_seen() {
        let lists = [Wires::from([2]), Wires::from([0, 2]), Wires::from([1, 0])];
        let index = WireIndex::from_queue(&lists);
        assert_eq!(index.to_wires(), Wires::from([2, 0, 1]));
    }

    #[test]
    fn test_first_duplicate() {
        assert_eq!(Wires::from([0, 1, 2]).first_duplicate(), None);
        assert_eq!(Wires::from([0, 1, 1]).first_duplicate(), Some(&Wire::from(1)));
    }
}
