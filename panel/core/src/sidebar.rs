//! Application Sidebar
//!
//! Navigation state for the app sidebar: which entries a user sees, which one
//! is active, whether the bar is collapsed (persisted), the account menu and
//! the logout confirmation dialog. Navigation goes through an injected
//! [`Router`].

use tracing::{debug, warn};

use crate::store::{PreferenceStore, StoreError, UserProfile, SIDEBAR_COLLAPSED_KEY};

/// Route the logout confirmation navigates to
pub const LOGOUT_ROUTE: &str = "/logout";

/// Client-side navigation
pub trait Router {
    /// Navigate to `path`
    fn push(&mut self, path: &str);
}

impl<R: Router + ?Sized> Router for &mut R {
    fn push(&mut self, path: &str) {
        (**self).push(path);
    }
}

/// A main navigation entry
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NavItem {
    /// Label
    pub name: &'static str,
    /// Target route
    pub href: &'static str,
}

impl NavItem {
    /// Whether this entry is the current route (exact match)
    #[must_use]
    pub fn is_active(&self, pathname: &str) -> bool {
        self.href == pathname
    }
}

const USER_MENU: &[NavItem] = &[
    NavItem {
        name: "Agents",
        href: "/agents",
    },
    NavItem {
        name: "Chat",
        href: "/chat",
    },
    NavItem {
        name: "Documentation",
        href: "/documentation",
    },
];

const ADMIN_MENU: &[NavItem] = &[
    NavItem {
        name: "MCP Servers",
        href: "/mcp-servers",
    },
    NavItem {
        name: "Clients",
        href: "/clients",
    },
    NavItem {
        name: "Documentation",
        href: "/documentation",
    },
];

/// Entries visible to a user of the given role
#[must_use]
pub fn menu_items(is_admin: bool) -> &'static [NavItem] {
    if is_admin {
        ADMIN_MENU
    } else {
        USER_MENU
    }
}

/// Entries of the account menu
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AccountItem {
    /// Profile page
    Profile,
    /// Security settings
    Security,
    /// Sign out (asks for confirmation)
    Logout,
}

impl AccountItem {
    /// All entries, in display order
    pub const ALL: [Self; 3] = [Self::Profile, Self::Security, Self::Logout];

    /// Label
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Profile => "Profile",
            Self::Security => "Security",
            Self::Logout => "Logout",
        }
    }

    /// Target route; logout has none until confirmed
    #[must_use]
    pub fn href(self) -> Option<&'static str> {
        match self {
            Self::Profile => Some("/profile"),
            Self::Security => Some("/security"),
            Self::Logout => None,
        }
    }
}

/// Sidebar state
pub struct Sidebar<S, R> {
    store: S,
    router: R,
    is_admin: bool,
    collapsed: bool,
    user_menu_open: bool,
    logout_dialog_open: bool,
}

impl<S: PreferenceStore, R: Router> Sidebar<S, R> {
    /// Build the sidebar from stored preferences
    ///
    /// Only the stored value `"true"` means collapsed. The resolved flag is
    /// written back right away, so any other stored value becomes `"false"`;
    /// a failed write is logged and leaves the sidebar usable.
    pub fn new(mut store: S, router: R) -> Self {
        let is_admin = UserProfile::load(&store).is_some_and(|profile| profile.is_admin);
        let collapsed = store.get(SIDEBAR_COLLAPSED_KEY).as_deref() == Some("true");
        debug!(is_admin, collapsed, "Loaded sidebar preferences");

        let value = if collapsed { "true" } else { "false" };
        if let Err(e) = store.set(SIDEBAR_COLLAPSED_KEY, value) {
            warn!(error = %e, "Failed to persist sidebar state");
        }

        Self {
            store,
            router,
            is_admin,
            collapsed,
            user_menu_open: false,
            logout_dialog_open: false,
        }
    }

    /// Entries for the current user
    #[must_use]
    pub fn menu(&self) -> &'static [NavItem] {
        menu_items(self.is_admin)
    }

    /// Whether the user is an administrator
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.is_admin
    }

    /// Whether the sidebar is collapsed
    #[must_use]
    pub fn is_collapsed(&self) -> bool {
        self.collapsed
    }

    /// Tooltip of the collapse toggle
    #[must_use]
    pub fn collapse_tooltip(&self) -> &'static str {
        if self.collapsed {
            "Expand Sidebar"
        } else {
            "Collapse Sidebar"
        }
    }

    /// Flip the collapse state and persist it
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot save; the in-memory state has
    /// already changed.
    pub fn toggle_collapsed(&mut self) -> Result<(), StoreError> {
        self.set_collapsed(!self.collapsed)
    }

    /// Set the collapse state and persist it
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot save; the in-memory state has
    /// already changed.
    pub fn set_collapsed(&mut self, collapsed: bool) -> Result<(), StoreError> {
        self.collapsed = collapsed;
        let value = if collapsed { "true" } else { "false" };
        self.store
            .set(SIDEBAR_COLLAPSED_KEY, value)
            .inspect_err(|e| warn!(error = %e, "Failed to persist sidebar state"))
    }

    /// Whether the account menu is open
    #[must_use]
    pub fn is_user_menu_open(&self) -> bool {
        self.user_menu_open
    }

    /// Open/close the account menu (ignored while collapsed)
    pub fn toggle_user_menu(&mut self) {
        if !self.collapsed {
            self.user_menu_open = !self.user_menu_open;
        }
    }

    /// Activate an account menu entry
    pub fn select_account_item(&mut self, item: AccountItem) {
        match item.href() {
            Some(href) => self.router.push(href),
            None => {
                self.logout_dialog_open = true;
                self.user_menu_open = false;
            }
        }
    }

    /// Whether the logout confirmation is showing
    #[must_use]
    pub fn is_logout_dialog_open(&self) -> bool {
        self.logout_dialog_open
    }

    /// Confirm logout: close the dialog and navigate to the logout route
    pub fn confirm_logout(&mut self) {
        self.logout_dialog_open = false;
        self.router.push(LOGOUT_ROUTE);
    }

    /// Dismiss the logout dialog
    pub fn cancel_logout(&mut self) {
        self.logout_dialog_open = false;
    }

    /// Borrow the router
    #[must_use]
    pub fn router(&self) -> &R {
        &self.router
    }

    /// Borrow the store
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }
}
