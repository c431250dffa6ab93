use serde::Serialize;

use super::node::TrieNode;

/// One step of a root-to-leaf path: the key of a node and its value.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct PathStep {
	pub key: String,
	pub value: f64,
}

impl PathStep {
	fn of(node: &TrieNode) -> Self {
		Self { key: node.key().to_owned(), value: node.value() }
	}
}

impl TrieNode {
	/// Finds the longest prefix of `sequence` present in the trie.
	///
	/// Walks down from the root one token at a time and stops at the first
	/// token that is not a child key, without backtracking.
	///
	/// Returns `None` if `sequence` is empty or its first token is unknown.
	pub fn position<S: AsRef<str>>(&self, sequence: &[S]) -> Option<Vec<String>> {
		let mut node = self;
		let mut matched = Vec::new();

		for token in sequence {
			match node.child(token.as_ref()) {
				Some(next) => {
					matched.push(token.as_ref().to_owned());
					node = next;
				}
				None => break,
			}
		}

		if matched.is_empty() { None } else { Some(matched) }
	}

	/// Returns the sub-trie reached by following `sequence`.
	///
	/// If the walk runs out of matching children, the deepest sub-trie
	/// reached is returned. An empty sequence returns the trie itself.
	pub fn retrieve<S: AsRef<str>>(&self, sequence: &[S]) -> &TrieNode {
		let mut node = self;
		for token in sequence {
			match node.child(token.as_ref()) {
				Some(next) => node = next,
				None => break,
			}
		}
		node
	}

	/// Checks whether the retrievable part of `sequence` is a complete match.
	///
	/// The sub-trie reached by `sequence` is a complete match if it has no
	/// children, or if the sum of its children values is smaller than the
	/// value of this trie's root.
	///
	/// # Notes
	/// - The comparison uses the root value of `self`, not the value of the
	///   retrieved sub-trie.
	/// - Only the part of `sequence` found in the trie is considered; use
	///   `contains` to also require the whole sequence to be present.
	pub fn complete_match<S: AsRef<str>>(&self, sequence: &[S]) -> bool {
		let sub_trie = self.retrieve(sequence);
		sub_trie.is_leaf() || sub_trie.children_value() < self.value()
	}

	/// `true` if the whole `sequence` is found and is a complete match.
	pub fn contains<S: AsRef<str>>(&self, sequence: &[S]) -> bool {
		self.position(sequence)
			.is_some_and(|matched| matched.len() == sequence.len() && self.complete_match(&matched))
	}

	/// Lists every word of the trie starting with `prefix`.
	///
	/// Each word is the prefix followed by the keys of one path from the
	/// prefix's sub-trie down to a leaf.
	///
	/// Returns `None` if `prefix` is empty or not fully present in the trie.
	pub fn get_words<S: AsRef<str>>(&self, prefix: &[S]) -> Option<Vec<Vec<String>>> {
		let matched = self.position(prefix)?;
		if matched.len() < prefix.len() {
			return None;
		}

		let head = &matched[..matched.len() - 1];
		let words: Vec<Vec<String>> = self
			.retrieve(prefix)
			.root_to_leaf_paths()
			.into_iter()
			.map(|path| {
				head.iter()
					.cloned()
					.chain(path.into_iter().map(|step| step.key))
					.collect::<Vec<String>>()
			})
			.collect();

		Some(words)
	}

	/// Lists the paths from the root to every leaf.
	///
	/// Each path holds the `(key, value)` of every node on the way, root
	/// and leaf included. There is exactly one path per leaf; the order of
	/// sibling subtrees is unspecified.
	pub fn root_to_leaf_paths(&self) -> Vec<Vec<PathStep>> {
		let mut paths = Vec::with_capacity(self.leaf_count());
		let mut current = Vec::new();
		collect_paths(self, &mut current, &mut paths);
		paths
	}

	/// `position` over a batch of sequences, in input order.
	pub fn map_position<S: AsRef<str>>(&self, sequences: &[Vec<S>]) -> Vec<Option<Vec<String>>> {
		sequences.iter().map(|sequence| self.position(sequence)).collect()
	}

	/// `retrieve` over a batch of sequences, in input order.
	pub fn map_retrieve<S: AsRef<str>>(&self, sequences: &[Vec<S>]) -> Vec<&TrieNode> {
		sequences.iter().map(|sequence| self.retrieve(sequence)).collect()
	}

	/// `complete_match` over a batch of sequences, in input order.
	pub fn map_complete_match<S: AsRef<str>>(&self, sequences: &[Vec<S>]) -> Vec<bool> {
		sequences.iter().map(|sequence| self.complete_match(sequence)).collect()
	}

	/// `contains` over a batch of sequences, in input order.
	pub fn map_contains<S: AsRef<str>>(&self, sequences: &[Vec<S>]) -> Vec<bool> {
		sequences.iter().map(|sequence| self.contains(sequence)).collect()
	}
}

fn collect_paths(node: &TrieNode, current: &mut Vec<PathStep>, paths: &mut Vec<Vec<PathStep>>) {
	current.push(PathStep::of(node));

	if node.is_leaf() {
		paths.push(current.clone());
	} else {
		for child in node.child_nodes() {
			collect_paths(child, current, paths);
		}
	}

	current.pop();
}
