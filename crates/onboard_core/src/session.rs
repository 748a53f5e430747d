//! Explicit application session context.
//!
//! Holds what the UI used to read from ambient globals: the logged-in user
//! and the theme. Callers create one and pass it where it is needed.

use crate::model::account::{LandingRoute, SessionUser};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppSession {
    user: Option<SessionUser>,
    theme: Theme,
}

impl AppSession {
    pub fn new(user: Option<SessionUser>) -> Self {
        Self {
            user,
            theme: Theme::default(),
        }
    }

    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    pub fn user(&self) -> Option<&SessionUser> {
        self.user.as_ref()
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn toggle_theme(&mut self) {
        self.theme = match self.theme {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        };
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    /// Where the session should land; `None` when logged out.
    pub fn landing_route(&self) -> Option<LandingRoute> {
        self.user.as_ref().map(|user| user.product.landing_route())
    }
}

#[cfg(test)]
mod tests {
    use super::{AppSession, Theme};
    use crate::model::account::{LandingRoute, Product, SessionUser};

    #[test]
    fn session_routes_by_product() {
        let session = AppSession::new(Some(SessionUser {
            email: "a@b.co".to_string(),
            product: Product::VdvPerformance,
        }));
        assert!(session.is_authenticated());
        assert_eq!(session.landing_route(), Some(LandingRoute::ProductPlaceholder));
        assert_eq!(AppSession::default().landing_route(), None);
    }

    #[test]
    fn theme_toggles() {
        let mut session = AppSession::default().with_theme(Theme::Dark);
        session.toggle_theme();
        assert_eq!(session.theme(), Theme::Light);
    }
}
