//! Stable identifiers handed out by the owning components.
//!
//! Ids are allocated from per-component monotonic counters starting at 1 and
//! are never reused, so a stale id simply fails to resolve.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub struct $name(pub u64);

        impl $name {
            /// Raw numeric value.
            #[inline]
            pub fn get(self) -> u64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "{}"), self.0)
            }
        }
    };
}

define_id!(
    /// Identifier of a clip owned by the timeline.
    ClipId,
    "clip#"
);
define_id!(
    /// Identifier of a filter instance owned by the filter pipeline.
    FilterId,
    "filter#"
);
define_id!(
    /// Identifier of an audio track owned by the mixer.
    TrackId,
    "track#"
);

/// Monotonic id counter. The first id handed out is 1.
#[derive(Debug, Clone)]
pub struct IdAllocator {
    next: u64,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self { next: 1 }
    }

    /// Take the next raw id.
    pub fn next_raw(&mut self) -> u64 {
        let id = self.next;
        self.next += 1;
        id
    }
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new()
    }
}
