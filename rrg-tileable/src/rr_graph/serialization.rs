use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

use super::{RrGraph, RrNode};

impl Serialize for RrGraph {
    fn serialize<S>(&self, s: S) -> Result<<S as Serializer>::Ok, <S as Serializer>::Error>
    where
        S: Serializer,
    {
        let mut map = s.serialize_map(Some(3))?;

        map.serialize_entry("counts", &self.counts)?;
        map.serialize_entry("nodes", &IndexedNodes(&self.nodes))?;
        map.serialize_entry("edges", &self.edges)?;

        map.end()
    }
}

/// Dump nodes with their index, so edges can be followed by hand in the output
struct IndexedNodes<'a>(&'a [RrNode]);

impl<'a> Serialize for IndexedNodes<'a> {
    fn serialize<S>(&self, s: S) -> Result<<S as Serializer>::Ok, <S as Serializer>::Error>
    where
        S: Serializer,
    {
        let mut seq = s.serialize_seq(Some(self.0.len()))?;

        for (id, node) in self.0.iter().enumerate() {
            seq.serialize_element(&IndexedNode(id, node))?;
        }

        seq.end()
    }
}

struct IndexedNode<'a>(usize, &'a RrNode);

impl<'a> Serialize for IndexedNode<'a> {
    fn serialize<S>(&self, s: S) -> Result<<S as Serializer>::Ok, <S as Serializer>::Error>
    where
        S: Serializer,
    {
        let mut map = s.serialize_map(Some(2))?;
        map.serialize_entry("id", &self.0)?;
        map.serialize_entry("node", self.1)?;
        map.end()
    }
}
