use super::Route;
use crate::session::Session;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    Navigate(Route),
    Logout,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuItem {
    pub label: &'static str,
    pub action: MenuAction,
}

impl MenuItem {
    const fn link(label: &'static str, route: Route) -> Self {
        MenuItem {
            label,
            action: MenuAction::Navigate(route),
        }
    }
}

/// The navigation menu for the current session.
pub fn menu(session: &Session) -> Vec<MenuItem> {
    let mut items = vec![MenuItem::link("Pricing", Route::Pricing)];
    if session.is_authenticated() {
        if !session.is_admin() {
            items.push(MenuItem::link("Submit Assignment", Route::SubmitAssignment));
        }
        items.push(MenuItem {
            label: "Logout",
            action: MenuAction::Logout,
        });
    } else {
        items.push(MenuItem::link("Login", Route::Login));
        items.push(MenuItem::link("Sign Up", Route::Signup));
    }
    items
}
