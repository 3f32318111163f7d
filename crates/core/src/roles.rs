//! Well-known role name constants.
//!
//! These must match the `role` values stored in the `users` table.

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_OWNER: &str = "owner";
pub const ROLE_DALALI: &str = "dalali";
pub const ROLE_TENANT: &str = "tenant";

/// Check whether a role may list and manage properties.
///
/// Owners manage their own listings; dalali (broker) accounts list on
/// behalf of owners; admins may touch anything.
pub fn can_manage_properties(role: &str) -> bool {
    matches!(role, ROLE_ADMIN | ROLE_OWNER | ROLE_DALALI)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn owner_dalali_admin_manage_properties() {
        assert!(can_manage_properties(ROLE_ADMIN));
        assert!(can_manage_properties(ROLE_OWNER));
        assert!(can_manage_properties(ROLE_DALALI));
    }

    #[test]
    fn tenant_does_not_manage_properties() {
        assert!(!can_manage_properties(ROLE_TENANT));
        assert!(!can_manage_properties("reviewer"));
    }
}
