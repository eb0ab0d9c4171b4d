//! In-process tunables for the merger.
//!
//! Populated by the embedder via `Default`/struct-update syntax only; there
//! is no config file or environment variable.

#[derive(Debug, Clone, Copy)]
pub struct MergeConfig {
    /// Initial capacity reserved for the source-cursor array on `start`.
    pub initial_source_capacity: usize,
    /// Initial capacity reserved for the heap's index vectors on `start`.
    pub initial_heap_capacity: usize,
}

impl Default for MergeConfig {
    fn default() -> Self {
        MergeConfig {
            initial_source_capacity: 8,
            initial_heap_capacity: 8,
        }
    }
}
