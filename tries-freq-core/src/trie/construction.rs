use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use std::thread;

use log::{debug, trace};
use regex::Regex;

use super::build_options::BuildOptions;
use super::node::{Children, TrieNode};
use crate::error::TrieResult;
use crate::io::read_file;

/// Builds a single chain trie from one sequence.
///
/// Every node of the chain carries `value`, except the last one which
/// carries `bottom_value` (or `value` if `None`). The chain is placed under a
/// root with the empty key and `value`.
///
/// Returns `None` if `sequence` is empty.
pub fn make_chain<S: AsRef<str>>(sequence: &[S], value: f64, bottom_value: Option<f64>) -> Option<TrieNode> {
	let (last, rest) = sequence.split_last()?;

	let mut node = TrieNode::new(last.as_ref(), bottom_value.unwrap_or(value));
	for token in rest.iter().rev() {
		node = TrieNode::with_children(token.as_ref(), value, [node]);
	}

	Some(TrieNode::with_children("", value, [node]))
}

/// Merges two optional tries.
///
/// If one side is absent the other is returned unchanged.
pub fn merge(a: Option<TrieNode>, b: Option<TrieNode>) -> Option<TrieNode> {
	match (a, b) {
		(None, b) => b,
		(a, None) => a,
		(Some(a), Some(b)) => Some(a.merge(&b)),
	}
}

/// Inserts a sequence into an optional trie.
///
/// - Without `value`, every node along the sequence is incremented by 1.
/// - With `value`, only the last node of the sequence receives `value`;
///   the intermediate nodes are left as they are.
///
/// An empty sequence leaves the trie unchanged.
pub fn insert<S: AsRef<str>>(trie: Option<TrieNode>, sequence: &[S], value: Option<f64>) -> Option<TrieNode> {
	let chain = match value {
		None => make_chain(sequence, 1.0, None),
		Some(value) => make_chain(sequence, 0.0, Some(value)),
	};
	merge(trie, chain)
}

/// Creates a trie from a list of sequences with the default `BuildOptions`.
///
/// Returns `None` if the list is empty or only holds empty sequences.
pub fn create_from_sequences<S>(sequences: &[Vec<S>]) -> Option<TrieNode>
where
	S: AsRef<str> + Sync,
{
	create_from_sequences_with(sequences, &BuildOptions::default())
}

/// Creates a trie from a list of sequences.
///
/// # Behavior
/// - Lists not larger than the sequential threshold are folded with `insert`,
///   starting from the chain of the first sequence.
/// - Larger lists are split in two halves, each half is built on its own
///   and the two results are merged.
/// - The first `parallel_depth` split levels build their halves on scoped
///   threads.
///
/// # Notes
/// - The resulting trie is the same whatever the options: merging is
///   associative and commutative.
pub fn create_from_sequences_with<S>(sequences: &[Vec<S>], options: &BuildOptions) -> Option<TrieNode>
where
	S: AsRef<str> + Sync,
{
	debug!(
		"Building trie from {} sequences (threshold: {}, parallel depth: {})",
		sequences.len(),
		options.sequential_threshold(),
		options.parallel_depth
	);
	build(sequences, options, 0)
}

fn build<S>(sequences: &[Vec<S>], options: &BuildOptions, depth: usize) -> Option<TrieNode>
where
	S: AsRef<str> + Sync,
{
	if sequences.is_empty() {
		return None;
	}

	if sequences.len() <= options.sequential_threshold() {
		return fold(sequences);
	}

	let (left, right) = sequences.split_at(sequences.len() / 2);

	if depth < options.parallel_depth {
		trace!("Splitting {} sequences on two threads at depth {}", sequences.len(), depth);
		thread::scope(|scope| {
			let handle = scope.spawn(|| build(left, options, depth + 1));
			let right = build(right, options, depth + 1);
			let left = handle.join().unwrap_or_else(|payload| std::panic::resume_unwind(payload));
			merge(left, right)
		})
	} else {
		merge(build(left, options, depth + 1), build(right, options, depth + 1))
	}
}

fn fold<S: AsRef<str>>(sequences: &[Vec<S>]) -> Option<TrieNode> {
	let (first, rest) = sequences.split_first()?;
	rest.iter().fold(make_chain(first, 1.0, None), |trie, sequence| insert(trie, sequence, None))
}

/// Splits a string into tokens with a separator regex.
///
/// A zero-width match at the very start never yields a leading empty token,
/// and trailing empty tokens are dropped. With the empty pattern `"arm"`
/// gives `["a", "r", "m"]`.
///
/// # Notes
/// - When the separator never matches, the input is the only token, even if
///   it is empty: `""` gives `[""]`, while `"  "` split on spaces gives `[]`.
pub fn split_tokens(input: &str, separator: &Regex) -> Vec<String> {
	let mut tokens: Vec<&str> = Vec::new();
	let mut last = 0;

	for m in separator.find_iter(input) {
		if m.end() == 0 {
			continue;
		}
		tokens.push(&input[last..m.start()]);
		last = m.end();
	}
	if tokens.is_empty() {
		return vec![input.to_owned()];
	}
	tokens.push(&input[last..]);

	while tokens.last().is_some_and(|token| token.is_empty()) {
		tokens.pop();
	}

	tokens.into_iter().map(str::to_owned).collect()
}

/// Splits every string of `words` into tokens with the regex `pattern`.
///
/// # Errors
/// Returns `TrieError::InvalidPattern` if `pattern` is not a valid regex.
pub fn split_words<S: AsRef<str>>(words: &[S], pattern: &str) -> TrieResult<Vec<Vec<String>>> {
	let separator = Regex::new(pattern)?;
	Ok(words.iter().map(|word| split_tokens(word.as_ref(), &separator)).collect())
}

/// Creates a trie by splitting each string of `words` with the regex `pattern`.
///
/// # Errors
/// Returns `TrieError::InvalidPattern` if `pattern` is not a valid regex.
pub fn create_by_splitting<S: AsRef<str>>(words: &[S], pattern: &str) -> TrieResult<Option<TrieNode>> {
	let sequences = split_words(words, pattern)?;
	Ok(create_from_sequences(&sequences))
}

/// Creates a trie from a word list file, one word per line.
///
/// # Errors
/// - `TrieError::Io` if the file cannot be read.
/// - `TrieError::InvalidPattern` if `pattern` is not a valid regex.
pub fn create_from_file<P: AsRef<Path>>(path: P, pattern: &str) -> TrieResult<Option<TrieNode>> {
	let lines = read_file(&path)?;
	debug!("Read {} lines from {}", lines.len(), path.as_ref().display());
	create_by_splitting(&lines, pattern)
}

impl TrieNode {
	/// Merges another trie with this one into a new trie.
	///
	/// # Behavior
	/// - Same root keys: the values are summed and the children merged.
	///   If one side is a leaf, the children of the other side are kept.
	/// - Different root keys: a new root with the empty key and value 0
	///   receives the merged children of both sides.
	/// - Children found on both sides are merged recursively; the others are
	///   shared with the input they come from.
	///
	/// # Notes
	/// - Neither input is modified. New nodes are only allocated along the
	///   paths whose values change.
	pub fn merge(&self, other: &TrieNode) -> TrieNode {
		let children = merge_children(self.children(), other.children());

		if self.key() == other.key() {
			TrieNode::from_parts(self.key().to_owned(), self.value() + other.value(), children)
		} else {
			TrieNode::from_parts(String::new(), 0.0, children)
		}
	}

	/// Returns a new trie with `sequence` inserted (unit increment).
	pub fn insert<S: AsRef<str>>(&self, sequence: &[S]) -> TrieNode {
		match make_chain(sequence, 1.0, None) {
			Some(chain) => self.merge(&chain),
			None => self.clone(),
		}
	}

	/// Returns a new trie where only the last node of `sequence` receives `value`.
	pub fn insert_with_value<S: AsRef<str>>(&self, sequence: &[S], value: f64) -> TrieNode {
		match make_chain(sequence, 0.0, Some(value)) {
			Some(chain) => self.merge(&chain),
			None => self.clone(),
		}
	}
}

/// Merges two children collections.
///
/// Tokens present on both sides go through `TrieNode::merge`, so a key is
/// never overwritten.
fn merge_children(a: &Children, b: &Children) -> Children {
	let (a, b) = match (a.as_map(), b.as_map()) {
		(None, _) => return b.clone(),
		(_, None) => return a.clone(),
		(Some(a), Some(b)) => (a, b),
	};

	let mut merged: HashMap<String, Arc<TrieNode>> = HashMap::with_capacity(a.len().max(b.len()));

	for (token, child) in a {
		let node = match b.get(token) {
			Some(other) => Arc::new(child.merge(other)),
			None => Arc::clone(child),
		};
		merged.insert(token.clone(), node);
	}

	for (token, child) in b {
		if !a.contains_key(token) {
			merged.insert(token.clone(), Arc::clone(child));
		}
	}

	Children::from_map(merged)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::trie::test_utils::{chars, sample_trie, SAMPLE_WORDS};

	#[test]
	fn test_make_chain_shape() {
		let chain = make_chain(&["a", "b", "c"], 1.0, Some(5.0)).unwrap();
		assert_eq!(chain.key(), "");
		assert_eq!(chain.value(), 1.0);

		let a = chain.child("a").unwrap();
		let b = a.child("b").unwrap();
		let c = b.child("c").unwrap();
		assert_eq!((a.value(), b.value(), c.value()), (1.0, 1.0, 5.0));
		assert!(c.is_leaf());
		assert_eq!(chain.node_count(), 4);
	}

	#[test]
	fn test_make_chain_empty_is_none() {
		let empty: [&str; 0] = [];
		assert!(make_chain(&empty, 1.0, None).is_none());
		assert!(create_from_sequences::<&str>(&[]).is_none());
	}

	#[test]
	fn test_merge_with_absent() {
		let trie = make_chain(&["x"], 1.0, None);
		assert_eq!(merge(trie.clone(), None), trie);
		assert_eq!(merge(None, trie.clone()), trie);
		assert_eq!(merge(None, None), None);
	}

	#[test]
	fn test_merge_leaf_collapse_keeps_inputs() {
		let arm = make_chain(&["a", "r", "m"], 1.0, None).unwrap();
		let arms = make_chain(&["a", "r", "m", "s"], 1.0, None).unwrap();
		let before = (arm.clone(), arms.clone());

		let merged = arm.merge(&arms);
		let m = merged.child("a").and_then(|n| n.child("r")).and_then(|n| n.child("m")).unwrap();
		assert_eq!(m.value(), 2.0);
		assert_eq!(m.child("s").map(TrieNode::value), Some(1.0));

		assert_eq!((arm, arms), before);
	}

	#[test]
	fn test_merge_different_keys_unions_children() {
		let x = TrieNode::with_children("p", 2.0, [TrieNode::new("a", 2.0)]);
		let y = TrieNode::with_children("q", 3.0, [TrieNode::new("a", 1.0), TrieNode::new("b", 2.0)]);

		let merged = x.merge(&y);
		assert_eq!(merged.key(), "");
		assert_eq!(merged.value(), 0.0);
		assert_eq!(merged.child("a").map(TrieNode::value), Some(3.0));
		assert_eq!(merged.child("b").map(TrieNode::value), Some(2.0));
	}

	#[test]
	fn test_insert_counts() {
		let trie = insert(None, &chars("ab"), None);
		let trie = insert(trie, &chars("ab"), None);
		let trie = insert(trie, &chars("ac"), None).unwrap();

		assert_eq!(trie.value(), 3.0);
		let a = trie.child("a").unwrap();
		assert_eq!(a.value(), 3.0);
		assert_eq!(a.child("b").map(TrieNode::value), Some(2.0));
		assert_eq!(a.child("c").map(TrieNode::value), Some(1.0));
	}

	#[test]
	fn test_insert_with_value_only_changes_bottom() {
		let trie = make_chain(&chars("ab"), 1.0, None).unwrap();
		let trie = trie.insert_with_value(&chars("ab"), 10.0);

		assert_eq!(trie.value(), 1.0);
		let a = trie.child("a").unwrap();
		assert_eq!(a.value(), 1.0);
		assert_eq!(a.child("b").map(TrieNode::value), Some(11.0));
	}

	#[test]
	fn test_insert_empty_sequence_is_identity() {
		let trie = make_chain(&["a"], 1.0, None).unwrap();
		let empty: [&str; 0] = [];
		assert_eq!(trie.insert(&empty), trie);
	}

	#[test]
	fn test_sample_counts() {
		let trie = sample_trie();
		assert_eq!(trie.value(), SAMPLE_WORDS.len() as f64);

		let ar = trie.child("a").and_then(|n| n.child("r")).unwrap();
		assert_eq!(ar.value(), 4.0);
		assert_eq!(ar.child("m").map(TrieNode::value), Some(2.0));
		assert_eq!(ar.child("c").map(TrieNode::value), Some(2.0));

		let bar = trie.child("b").and_then(|n| n.child("a")).and_then(|n| n.child("r")).unwrap();
		assert_eq!(bar.value(), 3.0);
		assert_eq!(bar.children().len(), 2);
	}

	#[test]
	fn test_parallel_build_matches_sequential() {
		let sequences: Vec<Vec<String>> = (0..200).map(|i| chars(&format!("w{}", i % 37))).collect();

		let sequential = create_from_sequences_with(&sequences, &BuildOptions::sequential());
		let mut options = BuildOptions::default();
		options.parallel_depth = 3;
		let parallel = create_from_sequences_with(&sequences, &options);

		let mut folded = make_chain(&sequences[0], 1.0, None);
		for sequence in &sequences[1..] {
			folded = insert(folded, sequence, None);
		}

		assert_eq!(sequential, parallel);
		assert_eq!(sequential, folded);
		assert_eq!(parallel.map(|t| t.value()), Some(200.0));
	}

	#[test]
	fn test_split_tokens() {
		let empty = Regex::new("").unwrap();
		assert_eq!(split_tokens("arm", &empty), vec!["a", "r", "m"]);

		let space = Regex::new(" ").unwrap();
		assert_eq!(split_tokens("the big cat", &space), vec!["the", "big", "cat"]);
		assert_eq!(split_tokens("the cat  ", &space), vec!["the", "cat"]);
		assert_eq!(split_tokens(" cat", &space), vec!["", "cat"]);
		assert!(split_tokens("  ", &space).is_empty());
	}

	#[test]
	fn test_split_tokens_without_match_keeps_input() {
		let space = Regex::new(" ").unwrap();
		assert_eq!(split_tokens("", &space), vec![""]);
		assert_eq!(split_tokens("arm", &space), vec!["arm"]);
		assert_eq!(split_tokens("", &Regex::new("").unwrap()), vec![""]);

		// The empty token still counts as one word.
		let trie = create_by_splitting(&[""], " ").unwrap().unwrap();
		assert_eq!(trie.value(), 1.0);
		assert_eq!(trie.child("").map(TrieNode::value), Some(1.0));
	}

	#[test]
	fn test_create_by_splitting() {
		let trie = create_by_splitting(&["a b", "a c", "d"], " ").unwrap().unwrap();
		assert_eq!(trie.value(), 3.0);
		assert_eq!(trie.child("a").map(TrieNode::value), Some(2.0));

		assert!(create_by_splitting(&["a"], "(").is_err());
	}

	#[test]
	fn test_create_from_file() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("words.txt");
		std::fs::write(&path, "arm\narms\narc\n").unwrap();

		let trie = create_from_file(&path, "").unwrap().unwrap();
		assert_eq!(trie.value(), 3.0);
		assert!(create_from_file(dir.path().join("missing.txt"), "").is_err());
	}
}
