use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Reports whether the client currently believes it is online.
pub trait Connectivity: Send + Sync {
    /// True when online.
    fn is_online(&self) -> bool;
}

/// Connectivity source that never reports offline.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysOnline;

impl Connectivity for AlwaysOnline {
    fn is_online(&self) -> bool {
        true
    }
}

/// Shared, toggleable online flag. Clones observe the same state.
#[derive(Debug, Clone)]
pub struct ConnectivityFlag {
    online: Arc<AtomicBool>,
}

impl ConnectivityFlag {
    /// Create a flag with the given initial state.
    #[must_use]
    pub fn new(online: bool) -> Self {
        Self {
            online: Arc::new(AtomicBool::new(online)),
        }
    }

    /// Update the flag; every clone sees the change.
    pub fn set_online(&self, online: bool) {
        self.online.store(online, Ordering::SeqCst);
    }
}

impl Default for ConnectivityFlag {
    fn default() -> Self {
        Self::new(true)
    }
}

impl Connectivity for ConnectivityFlag {
    fn is_online(&self) -> bool {
        self.online.load(Ordering::SeqCst)
    }
}
