use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;

/// Continuations recorded below a node.
///
/// `Leaf` means no continuation was ever recorded. `Internal` holds the
/// children indexed by their token. An `Internal` with an empty map is only
/// a transient state and is read as a leaf by every query.
#[derive(Serialize, Clone, Debug, PartialEq, Default)]
#[serde(untagged)]
pub enum Children {
	#[default]
	Leaf,
	Internal(HashMap<String, Arc<TrieNode>>),
}

impl Children {
	/// Wraps a map, turning an empty one into `Leaf`.
	pub fn from_map(map: HashMap<String, Arc<TrieNode>>) -> Self {
		if map.is_empty() {
			Children::Leaf
		} else {
			Children::Internal(map)
		}
	}

	/// Returns the child map, or `None` for a leaf.
	pub fn as_map(&self) -> Option<&HashMap<String, Arc<TrieNode>>> {
		match self {
			Children::Leaf => None,
			Children::Internal(map) => Some(map),
		}
	}

	/// Number of children (0 for a leaf).
	pub fn len(&self) -> usize {
		self.as_map().map_or(0, HashMap::len)
	}

	/// `true` if there is no continuation at all.
	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}
}

/// A node of a frequency trie.
///
/// The edge leading to the node is labeled by `key`; the root of a trie uses
/// the empty token. Before probability conversion `value` counts how many
/// inserted sequences pass through the node; afterwards it is the conditional
/// probability of reaching the node from its parent.
///
/// Subtrees are shared through `Arc` and are never modified once they are
/// reachable from another trie. Operations build new nodes along the paths
/// they change and reuse the rest.
///
/// # Invariants
/// - `value >= 0`
/// - keys of one children map are unique (guaranteed by the map)
/// - for a count trie, the root value is the number of inserted sequences
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct TrieNode {
	key: String,
	value: f64,
	#[serde(skip_serializing_if = "Children::is_empty")]
	children: Children,
}

impl TrieNode {
	/// Creates a leaf.
	pub fn new(key: impl Into<String>, value: f64) -> Self {
		Self { key: key.into(), value, children: Children::Leaf }
	}

	/// Creates a node holding the given children, each under its own key.
	pub fn with_children<I>(key: impl Into<String>, value: f64, children: I) -> Self
	where
		I: IntoIterator<Item = TrieNode>,
	{
		let map: HashMap<String, Arc<TrieNode>> = children
			.into_iter()
			.map(|child| (child.key.clone(), Arc::new(child)))
			.collect();
		Self { key: key.into(), value, children: Children::Internal(map) }
	}

	/// Creates a node from an already prepared `Children` value.
	pub(crate) fn from_parts(key: String, value: f64, children: Children) -> Self {
		Self { key, value, children }
	}

	pub fn key(&self) -> &str {
		&self.key
	}

	pub fn value(&self) -> f64 {
		self.value
	}

	pub fn children(&self) -> &Children {
		&self.children
	}

	pub fn set_key(&mut self, key: impl Into<String>) {
		self.key = key.into();
	}

	pub fn set_value(&mut self, value: f64) {
		self.value = value;
	}

	pub fn set_children(&mut self, children: Children) {
		self.children = children;
	}

	/// Returns the child reached through `token`, if any.
	pub fn child(&self, token: &str) -> Option<&TrieNode> {
		self.children.as_map()?.get(token).map(Arc::as_ref)
	}

	/// Iterates over the children in no particular order.
	pub fn child_nodes(&self) -> impl Iterator<Item = &TrieNode> {
		self.children.as_map().into_iter().flat_map(|map| map.values().map(Arc::as_ref))
	}

	/// `true` if at least one continuation is recorded below the node.
	pub fn has_children(&self) -> bool {
		!self.children.is_empty()
	}

	/// `true` if no continuation is recorded below the node.
	pub fn is_leaf(&self) -> bool {
		self.children.is_empty()
	}

	/// Sum of the values of the direct children.
	pub fn children_value(&self) -> f64 {
		self.child_nodes().map(TrieNode::value).sum()
	}

	/// Number of nodes in the trie, root included.
	pub fn node_count(&self) -> usize {
		1 + self.child_nodes().map(TrieNode::node_count).sum::<usize>()
	}

	/// Number of leaves in the trie.
	pub fn leaf_count(&self) -> usize {
		if self.is_leaf() {
			1
		} else {
			self.child_nodes().map(TrieNode::leaf_count).sum()
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_new_node_is_leaf() {
		let node = TrieNode::new("a", 2.0);
		assert_eq!(node.key(), "a");
		assert_eq!(node.value(), 2.0);
		assert!(node.is_leaf());
		assert_eq!(*node.children(), Children::Leaf);
	}

	#[test]
	fn test_empty_internal_reads_as_leaf() {
		let node = TrieNode::from_parts("a".to_owned(), 1.0, Children::Internal(HashMap::new()));
		assert!(node.is_leaf());
		assert_eq!(node.children_value(), 0.0);
		assert_eq!(Children::from_map(HashMap::new()), Children::Leaf);
	}

	#[test]
	fn test_with_children_indexes_by_key() {
		let node = TrieNode::with_children("", 3.0, [TrieNode::new("x", 1.0), TrieNode::new("y", 2.0)]);
		assert_eq!(node.children().len(), 2);
		assert_eq!(node.child("y").map(TrieNode::value), Some(2.0));
		assert!(node.child("z").is_none());
		assert_eq!(node.children_value(), 3.0);
		assert_eq!(node.node_count(), 3);
		assert_eq!(node.leaf_count(), 2);
	}

	#[test]
	fn test_mutators_touch_owned_node_only() {
		let shared = TrieNode::with_children("", 1.0, [TrieNode::new("a", 1.0)]);
		let mut copy = shared.clone();
		copy.set_value(5.0);
		copy.set_key("k");
		copy.set_children(Children::Leaf);
		assert_eq!(shared.value(), 1.0);
		assert_eq!(shared.key(), "");
		assert!(shared.has_children());
		assert!(copy.is_leaf());
	}

	#[test]
	fn test_serialize_omits_leaf_children() {
		let node = TrieNode::with_children("", 1.0, [TrieNode::new("a", 1.0)]);
		let json = serde_json::to_value(&node).unwrap();
		assert_eq!(json["children"]["a"]["key"], "a");
		assert!(json["children"]["a"].get("children").is_none());
	}
}
