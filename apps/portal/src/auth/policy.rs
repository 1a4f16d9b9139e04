use std::collections::BTreeSet;

use crate::auth::session::Role;

pub const DEFAULT_SIGN_IN_PATH: &str = "/login";
pub const DEFAULT_UNAUTHORIZED_PATH: &str = "/401";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllowedRoles {
    /// Any authenticated user passes the role check.
    Unrestricted,
    Only(BTreeSet<Role>),
}

impl AllowedRoles {
    pub fn permits(&self, role: Role) -> bool {
        match self {
            AllowedRoles::Unrestricted => true,
            AllowedRoles::Only(roles) => roles.contains(&role),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnUnauthorized {
    Redirect,
    Inline,
}

/// Access policy of one protected view. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardPolicy {
    pub sign_in_path: String,
    pub unauthorized_path: String,
    pub allowed_roles: AllowedRoles,
    pub on_unauthorized: OnUnauthorized,
}

impl Default for GuardPolicy {
    fn default() -> Self {
        Self {
            sign_in_path: DEFAULT_SIGN_IN_PATH.to_string(),
            unauthorized_path: DEFAULT_UNAUTHORIZED_PATH.to_string(),
            allowed_roles: AllowedRoles::Unrestricted,
            on_unauthorized: OnUnauthorized::Redirect,
        }
    }
}

impl GuardPolicy {
    pub fn allow_roles(mut self, roles: impl IntoIterator<Item = Role>) -> Self {
        self.allowed_roles = AllowedRoles::Only(roles.into_iter().collect());
        self
    }

    pub fn on_unauthorized(mut self, mode: OnUnauthorized) -> Self {
        self.on_unauthorized = mode;
        self
    }

    pub fn sign_in_path(mut self, path: impl Into<String>) -> Self {
        self.sign_in_path = path.into();
        self
    }

    pub fn unauthorized_path(mut self, path: impl Into<String>) -> Self {
        self.unauthorized_path = path.into();
        self
    }

    /// Staff pages: HR and administrators.
    pub fn staff() -> Self {
        Self::default().allow_roles([Role::Hr, Role::Admin])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let policy = GuardPolicy::default();
        assert_eq!(policy.sign_in_path, "/login");
        assert_eq!(policy.unauthorized_path, "/401");
        assert_eq!(policy.allowed_roles, AllowedRoles::Unrestricted);
    }

    #[test]
    fn test_unrestricted_permits_every_role() {
        let policy = GuardPolicy::default();
        assert!(policy.allowed_roles.permits(Role::Guest));
        assert!(policy.allowed_roles.permits(Role::Admin));
    }

    #[test]
    fn test_staff_policy_excludes_guest() {
        let policy = GuardPolicy::staff();
        assert!(policy.allowed_roles.permits(Role::Hr));
        assert!(policy.allowed_roles.permits(Role::Admin));
        assert!(!policy.allowed_roles.permits(Role::Guest));
    }

    #[test]
    fn test_empty_role_set_admits_nobody() {
        let policy = GuardPolicy::default().allow_roles(Vec::<Role>::new());
        assert!(!policy.allowed_roles.permits(Role::Admin));
    }
}
