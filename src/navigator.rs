use tracing::info;

/// Performs view transitions. The finder depends only on a router
/// existing, not on its mechanism.
pub trait Navigator: Send + Sync {
    fn navigate_to(&self, path: &str);
}

/// Router stand-in that records transitions in the log.
pub struct TracingNavigator;

impl Navigator for TracingNavigator {
    fn navigate_to(&self, path: &str) {
        info!("Navigating to {}", path);
    }
}
