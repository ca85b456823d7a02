use crate::NetworkId;

use std::sync::atomic::{AtomicUsize, Ordering};

/// Hands out network ids that are unique across every
/// network built from the same allocator.
///
/// Owned by whatever creates networks (usually the evolution
/// driver) and passed by reference; it is `Sync`, so parallel
/// workers can share one.
///
/// # Examples
/// ```
/// use evonn_nn::networks::NetworkIdAllocator;
///
/// let ids = NetworkIdAllocator::new();
/// assert_eq!(ids.next_id(), 0);
/// assert_eq!(ids.next_id(), 1);
/// ```
#[derive(Debug, Default)]
pub struct NetworkIdAllocator {
    next: AtomicUsize,
}

impl NetworkIdAllocator {
    pub fn new() -> NetworkIdAllocator {
        NetworkIdAllocator {
            next: AtomicUsize::new(0),
        }
    }

    /// Reserves and returns a fresh id.
    pub fn next_id(&self) -> NetworkId {
        self.next.fetch_add(1, Ordering::Relaxed)
    }
}
