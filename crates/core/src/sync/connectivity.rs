//! Connectivity signal contract.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Last-known device connectivity, as observed by the host platform.
///
/// Advisory, not authoritative: the queue manager consults it only as the
/// entry guard for a sync pass. Each delivery attempt re-validates
/// reachability implicitly, since a transport failure is just a per-item
/// failure.
pub trait ConnectivityProvider: Send + Sync {
    fn is_online(&self) -> bool;
}

/// Shared connectivity flag flipped by the host's network-state events.
///
/// Clones share one flag, so the handle the host keeps for `set_online`
/// and the provider injected into the manager stay in agreement.
#[derive(Debug, Clone)]
pub struct NetworkStatus {
    online: Arc<AtomicBool>,
}

impl NetworkStatus {
    pub fn new(initially_online: bool) -> Self {
        Self {
            online: Arc::new(AtomicBool::new(initially_online)),
        }
    }

    /// Record a connectivity transition.
    pub fn set_online(&self, online: bool) {
        self.online.store(online, Ordering::SeqCst);
    }
}

impl Default for NetworkStatus {
    fn default() -> Self {
        Self::new(true)
    }
}

impl ConnectivityProvider for NetworkStatus {
    fn is_online(&self) -> bool {
        self.online.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_one_flag() {
        let status = NetworkStatus::new(false);
        let provider: Box<dyn ConnectivityProvider> = Box::new(status.clone());

        assert!(!provider.is_online());
        status.set_online(true);
        assert!(provider.is_online());
        status.set_online(false);
        assert!(!provider.is_online());
    }
}
