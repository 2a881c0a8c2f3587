//! Identity allocation and the external-to-local id mapping.
//!
//! The two id spaces never collide by construction: locally-created items
//! get positive ids derived from their creation instant, while external
//! events are relabeled into strictly negative ids.

use chrono::Utc;
use sha2::{Digest, Sha256};

use crate::item::ItemId;

/// Allocates positive ids for locally-created items.
///
/// Ids are the creation instant in epoch milliseconds, bumped past the
/// previously issued id so rapid successive adds stay unique within a
/// session.
#[derive(Debug, Default)]
pub struct IdAllocator {
    last: ItemId,
}

impl IdAllocator {
    pub fn next_id(&mut self) -> ItemId {
        let now = Utc::now().timestamp_millis();
        let id = now.max(self.last + 1);
        self.last = id;
        id
    }

    /// Record an id loaded from the store so future allocations stay
    /// ahead of it.
    pub fn observe(&mut self, id: ItemId) {
        if id > self.last {
            self.last = id;
        }
    }
}

/// Map an external event's native identifier into the local id space.
///
/// Total and deterministic: the low 63 bits of SHA-256 over the native id,
/// negated. The result is always negative, so it can never collide with an
/// id issued by [`IdAllocator`].
pub fn external_id_to_local_id(native_id: &str) -> ItemId {
    let digest = Sha256::digest(native_id.as_bytes());
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    let value = i64::from_be_bytes(bytes) & i64::MAX;
    -value - 1
}
