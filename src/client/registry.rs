use std::num::NonZeroU32;
use std::sync::atomic::{AtomicU32, Ordering};

/// Identifier of one logical client on the remote server.
///
/// Sent as `ClientID` with every request so that the server can tell apart
/// many drivers sharing one physical device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, derive_more::Display)]
pub struct ClientId(NonZeroU32);

impl ClientId {
    /// Raw wire value.
    pub const fn get(self) -> u32 {
        self.0.get()
    }
}

/// Allocator of unique, strictly increasing [`ClientId`]s.
///
/// Identities are never recycled. Share one registry (e.g. behind an `Arc` or
/// in a `static`) between all drivers of a process; tests can create their
/// own independent registries.
#[derive(Debug)]
pub struct ClientIdRegistry {
    allocated: AtomicU32,
}

impl Default for ClientIdRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ClientIdRegistry {
    /// Create a registry whose first identity is `1`.
    pub const fn new() -> Self {
        Self {
            allocated: AtomicU32::new(0),
        }
    }

    /// Allocate the next identity.
    pub fn allocate(&self) -> ClientId {
        // Refuse to wrap around instead of handing out an identity twice.
        self.allocated
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |allocated| {
                allocated.checked_add(1)
            })
            .ok()
            .and_then(|allocated| NonZeroU32::MIN.checked_add(allocated))
            .map(ClientId)
            .expect("client identities exhausted")
    }
}
