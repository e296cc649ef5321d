//! Authorization decisions for dataset operations.
//!
//! A single pure function maps (identity, action, ownership) to an
//! allow/deny outcome. It never errors and holds no state; the route
//! layer translates `Deny` into an HTTP response.

use super::token::{Identity, Role};

/// Operations subject to authorization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    CreateDataset,
    ListDatasets,
    GetDataset,
    DeleteDataset,
}

/// Point-in-time ownership fact supplied by the data layer for
/// item-level actions. Opaque to this module; never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ownership {
    pub dataset_id: i32,
    pub owner_id: i32,
}

/// Visibility scope for listing operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Restricted to datasets owned by the caller.
    Own,
    /// All datasets, with owner identity attached per item.
    All,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow { scope: Option<Scope> },
    Deny,
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow { .. })
    }

    fn allow() -> Self {
        Decision::Allow { scope: None }
    }

    fn allow_scoped(scope: Scope) -> Self {
        Decision::Allow { scope: Some(scope) }
    }
}

/// Decide whether `identity` may perform `action`.
///
/// Item-level actions require an ownership fact; absence of one denies.
/// Admins may read any dataset, but deletion stays owner-only for every
/// role: "admin can see everything" does not extend to "admin can
/// destroy anything". That asymmetry is deliberate.
pub fn authorize(identity: &Identity, action: Action, ownership: Option<&Ownership>) -> Decision {
    match action {
        Action::CreateDataset => Decision::allow(),

        Action::ListDatasets => match identity.role {
            Role::Admin => Decision::allow_scoped(Scope::All),
            Role::User => Decision::allow_scoped(Scope::Own),
        },

        Action::GetDataset => match ownership {
            Some(fact) if identity.role == Role::Admin || fact.owner_id == identity.user_id => {
                Decision::allow()
            }
            _ => Decision::Deny,
        },

        Action::DeleteDataset => match ownership {
            Some(fact) if fact.owner_id == identity.user_id => Decision::allow(),
            _ => Decision::Deny,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: i32) -> Identity {
        Identity {
            user_id: id,
            role: Role::User,
        }
    }

    fn admin(id: i32) -> Identity {
        Identity {
            user_id: id,
            role: Role::Admin,
        }
    }

    fn owned_by(owner_id: i32) -> Ownership {
        Ownership {
            dataset_id: 1,
            owner_id,
        }
    }

    #[test]
    fn anyone_may_create() {
        assert!(authorize(&user(5), Action::CreateDataset, None).is_allowed());
        assert!(authorize(&admin(1), Action::CreateDataset, None).is_allowed());
    }

    #[test]
    fn listing_scope_follows_role() {
        assert_eq!(
            authorize(&user(5), Action::ListDatasets, None),
            Decision::Allow {
                scope: Some(Scope::Own)
            }
        );
        assert_eq!(
            authorize(&admin(1), Action::ListDatasets, None),
            Decision::Allow {
                scope: Some(Scope::All)
            }
        );
    }

    #[test]
    fn user_may_read_own_dataset() {
        assert_eq!(
            authorize(&user(5), Action::GetDataset, Some(&owned_by(5))),
            Decision::Allow { scope: None }
        );
    }

    #[test]
    fn user_may_not_read_another_users_dataset() {
        assert_eq!(
            authorize(&user(5), Action::GetDataset, Some(&owned_by(9))),
            Decision::Deny
        );
    }

    #[test]
    fn admin_may_read_any_dataset() {
        assert!(authorize(&admin(1), Action::GetDataset, Some(&owned_by(9))).is_allowed());
    }

    #[test]
    fn user_may_delete_own_dataset() {
        assert!(authorize(&user(5), Action::DeleteDataset, Some(&owned_by(5))).is_allowed());
    }

    #[test]
    fn user_may_not_delete_another_users_dataset() {
        assert_eq!(
            authorize(&user(5), Action::DeleteDataset, Some(&owned_by(9))),
            Decision::Deny
        );
    }

    #[test]
    fn admin_may_not_delete_another_users_dataset() {
        // Read access bypasses ownership for admins; deletion never does.
        assert_eq!(
            authorize(&admin(1), Action::DeleteDataset, Some(&owned_by(9))),
            Decision::Deny
        );
    }

    #[test]
    fn admin_may_delete_own_dataset() {
        assert!(authorize(&admin(1), Action::DeleteDataset, Some(&owned_by(1))).is_allowed());
    }

    #[test]
    fn item_level_actions_without_ownership_fact_are_denied() {
        assert_eq!(authorize(&admin(1), Action::GetDataset, None), Decision::Deny);
        assert_eq!(
            authorize(&admin(1), Action::DeleteDataset, None),
            Decision::Deny
        );
    }

    #[test]
    fn decisions_are_idempotent() {
        let identity = user(5);
        let fact = owned_by(9);
        let first = authorize(&identity, Action::DeleteDataset, Some(&fact));
        let second = authorize(&identity, Action::DeleteDataset, Some(&fact));
        assert_eq!(first, second);
    }
}
