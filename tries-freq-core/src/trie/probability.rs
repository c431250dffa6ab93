use std::collections::HashMap;
use std::sync::Arc;

use rand::Rng;

use super::node::{Children, TrieNode};

impl TrieNode {
	/// Converts the counts of the trie into conditional node probabilities.
	///
	/// For a node with children, each child value is divided by the node's
	/// own count, or by the sum of the children counts when the node's count
	/// is 0. Childless nodes keep their value. The root value of the result
	/// is always 1.
	///
	/// Returns a new trie; `self` is left untouched.
	pub fn node_probabilities(&self) -> TrieNode {
		let mut result = node_probabilities_rec(self);
		result.set_value(1.0);
		result
	}

	/// Picks a random word from a probability trie.
	///
	/// Starting at the root, the walk either stops, with probability
	/// `1 - sum(children)`, or moves to a child chosen in proportion to its
	/// value. Leaves always stop.
	///
	/// Returns the keys visited, root excluded (empty if the walk stops at
	/// the root).
	///
	/// # Notes
	/// - Meant for the output of `node_probabilities`. On a count trie the
	///   stop probability is always 0 and the walk ends at a leaf.
	pub fn random_word<R: Rng>(&self, rng: &mut R) -> Vec<String> {
		let mut word = Vec::new();
		let mut node = self;

		while let Some(next) = pick_child(node, rng) {
			word.push(next.key().to_owned());
			node = next;
		}

		word
	}

	/// `random_word` using the thread-local generator.
	pub fn random_word_with_default_rng(&self) -> Vec<String> {
		self.random_word(&mut rand::rng())
	}
}

fn node_probabilities_rec(node: &TrieNode) -> TrieNode {
	let Some(children) = node.children().as_map() else {
		return TrieNode::new(node.key(), node.value());
	};
	debug_assert!(!children.is_empty(), "node '{}' has an empty children map", node.key());

	let basis = if node.value() == 0.0 { node.children_value() } else { node.value() };

	let converted: HashMap<String, Arc<TrieNode>> = children
		.iter()
		.map(|(token, child)| {
			let mut child = node_probabilities_rec(child);
			if basis != 0.0 {
				child.set_value(child.value() / basis);
			}
			(token.clone(), Arc::new(child))
		})
		.collect();

	TrieNode::from_parts(node.key().to_owned(), node.value(), Children::from_map(converted))
}

/// Chooses the next node of a random walk, or `None` to stop.
fn pick_child<'a, R: Rng>(node: &'a TrieNode, rng: &mut R) -> Option<&'a TrieNode> {
	let continuation = node.children_value();
	if continuation <= 0.0 {
		return None;
	}

	let total = continuation.max(1.0);
	let mut r = rng.random_range(0.0..total);
	if r >= continuation {
		return None;
	}

	let mut fallback = None;
	for child in node.child_nodes() {
		if r < child.value() {
			return Some(child);
		}
		r -= child.value();
		fallback = Some(child);
	}

	// Rounding left `r` past the last bucket.
	fallback
}
