//! Routes, navigation and the guard in front of protected views.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::info;

use crate::session::SessionStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
    Dashboard,
}

impl Route {
    pub fn is_protected(self) -> bool {
        matches!(self, Route::Dashboard)
    }
}

/// Anything that can force the UI back to the login view.
pub trait Navigator: Send + Sync {
    fn redirect_to_login(&self);
}

#[derive(Debug, Clone)]
pub struct RouteGuard {
    session: Arc<SessionStore>,
}

impl RouteGuard {
    pub fn new(session: Arc<SessionStore>) -> Self {
        Self { session }
    }

    /// Evaluated once per navigation. Does not rely on any earlier gateway check.
    pub fn can_enter(&self, view: Route, nav: &dyn Navigator) -> bool {
        if !view.is_protected() || self.session.is_valid() {
            return true;
        }
        info!(?view, "no valid session, redirecting to login");
        self.session.clear();
        nav.redirect_to_login();
        false
    }
}

/// Current route holder. Protected routes are only reachable through the guard.
#[derive(Debug)]
pub struct Router {
    current: watch::Sender<Route>,
    guard: RouteGuard,
}

impl Router {
    pub fn new(session: Arc<SessionStore>) -> Self {
        let (current, _) = watch::channel(Route::Login);
        Self {
            current,
            guard: RouteGuard::new(session),
        }
    }

    pub fn current(&self) -> Route {
        *self.current.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<Route> {
        self.current.subscribe()
    }

    /// Try to move to `to`; returns the route actually shown.
    pub fn navigate(&self, to: Route) -> Route {
        if self.guard.can_enter(to, self) {
            self.current.send_replace(to);
        }
        self.current()
    }
}

impl Navigator for Router {
    fn redirect_to_login(&self) {
        self.current.send_replace(Route::Login);
    }
}
