//! Error types for trie construction and rendering.
//!
//! Absent results (empty input, unmatched prefix) are `Option`s, not errors.
//! Only failures coming from outside the tree itself end up here.

/// Errors that can occur while building or rendering a trie.
#[derive(Debug, thiserror::Error)]
pub enum TrieError {
	/// The token separator is not a valid regular expression.
	#[error("Invalid separator pattern: {0}")]
	InvalidPattern(#[from] regex::Error),

	/// A word list could not be read.
	#[error("I/O error: {0}")]
	Io(#[from] std::io::Error),

	/// Paths or nodes could not be rendered as JSON.
	#[error("Serialization error: {0}")]
	Serialization(#[from] serde_json::Error),
}

/// Result type for trie operations.
pub type TrieResult<T> = Result<T, TrieError>;
