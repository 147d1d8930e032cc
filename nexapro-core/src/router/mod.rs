//! Navigation: route table, guard and the router that ties them together

mod guard;
mod routes;

pub use guard::{GuardDecision, ProfileSource, RouteGuard};
pub use routes::{NavigationRequest, RouteName, RouteRecord, RouteTable, RouteTarget};

#[cfg(test)]
pub use guard::MockProfileSource;

use crate::error::{AppError, Result};
use tokio::sync::RwLock;

const MAX_GUARD_REDIRECTS: usize = 4;

/// Runs every navigation through the guard and tracks the current route
pub struct Router {
    guard: RouteGuard,
    current: RwLock<Option<NavigationRequest>>,
}

impl Router {
    pub fn new(guard: RouteGuard) -> Self {
        Self {
            guard,
            current: RwLock::new(None),
        }
    }

    pub fn guard(&self) -> &RouteGuard {
        &self.guard
    }

    pub async fn current(&self) -> Option<NavigationRequest> {
        self.current.read().await.clone()
    }

    /// Navigate to `target`, following guard redirects until a route is
    /// allowed. The allowed route becomes the current one.
    pub async fn push(&self, target: RouteTarget) -> Result<NavigationRequest> {
        let mut target = target;
        for _ in 0..=MAX_GUARD_REDIRECTS {
            match self.guard.evaluate(&target).await? {
                GuardDecision::Allow(route) => {
                    tracing::info!(route = %route.name, path = %route.path, "Navigated");
                    *self.current.write().await = Some(route.clone());
                    return Ok(route);
                }
                GuardDecision::Redirect(next) => target = next,
            }
        }
        Err(AppError::Internal(anyhow::anyhow!(
            "Guard redirect loop at {}",
            target
        )))
    }
}
