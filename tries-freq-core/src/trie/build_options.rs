/// Lists at or below this size are built by folding `insert`.
pub const DEFAULT_SEQUENTIAL_THRESHOLD: usize = 15;

/// Configuration of the bulk construction of a trie.
///
/// Bulk construction splits the input in halves until a half is small enough
/// to be folded sequentially, then merges the halves back. The first
/// `parallel_depth` levels of that split build their two halves on separate
/// scoped threads.
///
/// # Invariants
/// - `sequential_threshold >= 1`
/// - the resulting trie does not depend on any of these settings
#[derive(Clone, Debug, PartialEq)]
pub struct BuildOptions {
	/// Maximum list size folded sequentially with `insert`.
	sequential_threshold: usize,

	/// Number of split levels built on separate threads (0 = no threads).
	pub parallel_depth: usize,
}

impl Default for BuildOptions {
	/// Sequential threshold of 15, one split level per doubling of the CPU count.
	fn default() -> Self {
		let cpus = num_cpus::get().max(1);
		Self {
			sequential_threshold: DEFAULT_SEQUENTIAL_THRESHOLD,
			parallel_depth: cpus.next_power_of_two().trailing_zeros() as usize,
		}
	}
}

impl BuildOptions {
	/// Options that never spawn a thread.
	pub fn sequential() -> Self {
		Self { sequential_threshold: DEFAULT_SEQUENTIAL_THRESHOLD, parallel_depth: 0 }
	}

	/// Returns the sequential threshold.
	pub fn sequential_threshold(&self) -> usize {
		self.sequential_threshold
	}

	/// Sets the sequential threshold.
	///
	/// # Errors
	/// Returns an error if `threshold` is 0 (the split would never end).
	pub fn set_sequential_threshold(&mut self, threshold: usize) -> Result<(), String> {
		if threshold == 0 {
			return Err("Sequential threshold must be >= 1".to_owned());
		}
		self.sequential_threshold = threshold;
		Ok(())
	}
}
