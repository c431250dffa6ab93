//! Tries with frequencies.
//!
//! This crate builds and queries prefix trees whose nodes count the token
//! sequences passing through them:
//! - Incremental insertion and merging of independently built tries
//! - Parallel bulk construction from large sequence lists
//! - Prefix search, containment checks and word enumeration
//! - Conversion of counts into conditional probabilities
//! - Lossless compression of non-branching chains
//!
//! Tries are persistent: every operation returns a new trie and shares the
//! unchanged subtrees with its inputs.

/// Trie model, construction, queries and transformations.
pub mod trie;

/// Error type of the crate.
pub mod error;

/// I/O utilities (word list loading, path helpers).
pub mod io;

pub use error::{TrieError, TrieResult};
pub use trie::build_options::BuildOptions;
pub use trie::construction::{
	create_by_splitting, create_from_file, create_from_sequences, create_from_sequences_with, insert, make_chain,
	merge, split_tokens, split_words,
};
pub use trie::node::{Children, TrieNode};
pub use trie::query::PathStep;
pub use trie::render::paths_to_json;
