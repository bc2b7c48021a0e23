//! Views and role gating.

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};
use thiserror::Error;

use crate::models::{Role, UserIdentity};

/// A screen of the app. Serializes as its path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum View {
    Entry,
    EmployeeHero,
    AdminHero,
    CoachHero,
    PersonalBoard,
    TeamsBoard,
    AdminDashboard,
    CoachDashboard,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("No view at {0}")]
pub struct UnknownView(pub String);

impl View {
    pub const ALL: [View; 8] = [
        View::Entry,
        View::EmployeeHero,
        View::AdminHero,
        View::CoachHero,
        View::PersonalBoard,
        View::TeamsBoard,
        View::AdminDashboard,
        View::CoachDashboard,
    ];

    pub fn path(&self) -> &'static str {
        match self {
            View::Entry => "/",
            View::EmployeeHero => "/employee-hero",
            View::AdminHero => "/admin-hero",
            View::CoachHero => "/coach-hero",
            View::PersonalBoard => "/personal-board",
            View::TeamsBoard => "/teams-board",
            View::AdminDashboard => "/admin-dashboard",
            View::CoachDashboard => "/coach-dashboard",
        }
    }

    pub fn from_path(path: &str) -> Result<Self, UnknownView> {
        let trimmed = match path.trim_end_matches('/') {
            "" => "/",
            p => p,
        };
        View::ALL
            .into_iter()
            .find(|v| v.path() == trimmed)
            .ok_or_else(|| UnknownView(path.to_string()))
    }

    /// The landing view for a freshly logged-in `role`.
    pub fn landing(role: Role) -> Self {
        match role {
            Role::Employee => View::EmployeeHero,
            Role::Admin => View::AdminHero,
            Role::Coach => View::CoachHero,
        }
    }

    /// Role required to render this view, if any.
    pub fn required_role(&self) -> Option<Role> {
        match self {
            View::EmployeeHero | View::PersonalBoard => Some(Role::Employee),
            View::AdminHero | View::AdminDashboard => Some(Role::Admin),
            View::CoachHero | View::CoachDashboard => Some(Role::Coach),
            View::Entry | View::TeamsBoard => None,
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

impl Serialize for View {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.path())
    }
}

impl FromStr for View {
    type Err = UnknownView;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        View::from_path(s)
    }
}

/// Outcome of asking for a view: `{"action": "render" | "redirect", "path": ..}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "action", content = "path", rename_all = "lowercase")]
pub enum Navigation {
    Render(View),
    Redirect(View),
}

/// Decide what `user` sees when asking for `view`.
pub fn navigate(user: Option<&UserIdentity>, view: View) -> Navigation {
    match (view, user) {
        (View::Entry, Some(user)) => Navigation::Redirect(View::landing(user.role())),
        (View::Entry, None) => Navigation::Render(View::Entry),
        (View::TeamsBoard, None) => Navigation::Redirect(View::Entry),
        (view, user) => match view.required_role() {
            Some(required) if user.map(UserIdentity::role) != Some(required) => {
                Navigation::Redirect(View::Entry)
            }
            _ => Navigation::Render(view),
        },
    }
}
