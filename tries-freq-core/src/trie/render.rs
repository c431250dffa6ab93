use super::node::TrieNode;
use super::query::PathStep;
use crate::error::TrieResult;

/// Renders root-to-leaf paths as JSON.
///
/// The output is an array of paths, each path an array of
/// `{"key": <token>, "value": <number>}` objects.
///
/// Example: `[[{"key":"","value":1.0},{"key":"a","value":1.0}]]`
pub fn paths_to_json(paths: &[Vec<PathStep>]) -> TrieResult<String> {
	Ok(serde_json::to_string(paths)?)
}

impl TrieNode {
	/// Renders the root-to-leaf paths of the trie as JSON (see `paths_to_json`).
	pub fn paths_json(&self) -> TrieResult<String> {
		paths_to_json(&self.root_to_leaf_paths())
	}

	/// Renders the whole trie as nested `{key, value, children}` JSON objects.
	pub fn to_json_pretty(&self) -> TrieResult<String> {
		Ok(serde_json::to_string_pretty(self)?)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::trie::construction::make_chain;

	#[test]
	fn test_paths_json_shape() {
		let trie = make_chain(&["a", "b"], 1.0, Some(2.5)).unwrap();
		assert_eq!(
			trie.paths_json().unwrap(),
			r#"[[{"key":"","value":1.0},{"key":"a","value":1.0},{"key":"b","value":2.5}]]"#
		);
	}

	#[test]
	fn test_paths_json_parses_back() {
		let trie = crate::trie::test_utils::sample_trie();
		let json: serde_json::Value = serde_json::from_str(&trie.paths_json().unwrap()).unwrap();
		let paths = json.as_array().unwrap();
		assert_eq!(paths.len(), trie.leaf_count());
		for path in paths {
			let first = &path.as_array().unwrap()[0];
			assert_eq!(first["key"], "");
			assert_eq!(first["value"], 7.0);
		}
	}

	#[test]
	fn test_empty_paths() {
		assert_eq!(paths_to_json(&[]).unwrap(), "[]");
	}

	#[test]
	fn test_to_json_pretty_nests_children() {
		let trie = make_chain(&["a"], 1.0, None).unwrap();
		let json: serde_json::Value = serde_json::from_str(&trie.to_json_pretty().unwrap()).unwrap();
		assert_eq!(json["children"]["a"]["value"], 1.0);
	}
}
