//! Screen visibility by role

use std::fmt;

use crate::models::UserRole;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Screen {
    Dashboard,
    Products,
    AddProduct,
    Profile,
    AdminUsers,
    Logs,
}

impl Screen {
    pub const ALL: [Screen; 6] = [
        Screen::Dashboard,
        Screen::Products,
        Screen::AddProduct,
        Screen::Profile,
        Screen::AdminUsers,
        Screen::Logs,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            Screen::Dashboard => "Dashboard",
            Screen::Products => "Products",
            Screen::AddProduct => "Add Product",
            Screen::Profile => "Profile",
            Screen::AdminUsers => "Admin Users",
            Screen::Logs => "Logs",
        }
    }

    pub fn is_admin_only(&self) -> bool {
        matches!(self, Screen::AdminUsers | Screen::Logs)
    }
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.title())
    }
}

/// Screens to show for a role; an unknown role sees the non-admin set
///
/// Hiding a screen is cosmetic, the API still enforces access.
pub fn visible_screens(role: Option<&UserRole>) -> Vec<Screen> {
    let is_admin = role.is_some_and(UserRole::is_admin);
    Screen::ALL
        .into_iter()
        .filter(|screen| is_admin || !screen.is_admin_only())
        .collect()
}
