//! Frequency-annotated tries.
//!
//! A trie built from token sequences where every node counts how many
//! sequences pass through it:
//! - Node model with explicit leaves (`TrieNode`, `Children`)
//! - Construction by chains and merges, bulk building on threads
//! - Prefix queries (`position`, `retrieve`, `contains`, `get_words`, ...)
//! - Conversion of counts into conditional probabilities
//! - Compression of non-branching chains (`shrink`)

/// Trie node type and its children collection.
pub mod node;

/// Chains, merge, insertion and bulk construction.
///
/// Bulk construction splits the input in halves built independently
/// (optionally on scoped threads) and merged back.
pub mod construction;

/// Prefix queries and root-to-leaf path enumeration.
pub mod query;

/// Conversion of counts into node probabilities, and random walks over them.
pub mod probability;

/// Collapsing of non-branching chains.
pub mod shrink;

/// JSON rendering of paths and nodes.
pub mod render;

/// Bulk construction settings.
pub mod build_options;
