use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;

use super::node::{Children, TrieNode};

impl TrieNode {
	/// Collapses non-branching chains into single nodes.
	///
	/// A node with exactly one child whose value equals its own (no word ends
	/// at the node) is fused with that child: the keys are joined with
	/// `delimiter`, and the child's value and children are kept. Nodes where a
	/// word ends keep their own key and value. The root (empty key) is never
	/// fused.
	///
	/// Shrinking a shrunk trie gives the same trie back.
	pub fn shrink(&self, delimiter: &str) -> TrieNode {
		shrink_rec(self, delimiter, 0)
	}
}

fn shrink_rec(node: &TrieNode, delimiter: &str, depth: usize) -> TrieNode {
	let Some(children) = node.children().as_map() else {
		return node.clone();
	};
	debug_assert!(!children.is_empty(), "node '{}' has an empty children map", node.key());

	let is_root = depth == 0 && node.key().is_empty();

	if let (false, 1, Some(only)) = (is_root, children.len(), children.values().next()) {
		let child = shrink_rec(only, delimiter, depth + 1);

		if node.value() == only.value() {
			let key = format!("{}{}{}", node.key(), delimiter, child.key());
			return TrieNode::from_parts(key, child.value(), child.children().clone());
		}

		return TrieNode::with_children(node.key(), node.value(), [child]);
	}

	let mut shrunk: HashMap<String, Arc<TrieNode>> = HashMap::with_capacity(children.len());
	for child in children.values() {
		let child = shrink_rec(child, delimiter, depth + 1);
		match shrunk.entry(child.key().to_owned()) {
			Entry::Vacant(entry) => {
				entry.insert(Arc::new(child));
			}
			// Two fused chains spelled the same joined key.
			Entry::Occupied(mut entry) => {
				let merged = entry.get().merge(&child);
				entry.insert(Arc::new(merged));
			}
		}
	}

	TrieNode::from_parts(node.key().to_owned(), node.value(), Children::from_map(shrunk))
}
