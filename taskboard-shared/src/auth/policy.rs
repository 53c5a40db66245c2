//! Authorization policy
//!
//! Pure decision functions mapping (actor, action) to allow or deny. Every
//! protected operation is an [`Action`] variant; actions that touch an
//! existing task carry the task's owner so the decision needs nothing but
//! its inputs. There is no hierarchy, no delegation, and no state: the same
//! actor and action always produce the same decision.
//!
//! The rules, in full:
//!
//! - Viewing, updating, or deleting a task is allowed only for its owner.
//! - Creating a task is allowed for any authenticated actor; the new task
//!   is attached to the actor, never to a caller-supplied owner.
//! - Listing users and deleting an arbitrary user require the admin role.
//! - Reading and updating one's own profile are always allowed; the profile
//!   endpoints never operate on another user's record.
//!
//! Handlers call [`authorize`] with `?`; a denial converts to a 403 at the
//! HTTP boundary.
//!
//! # Example
//!
//! ```
//! use taskboard_shared::auth::policy::{authorize, decide, Action, Actor, Decision};
//! use taskboard_shared::models::user::Role;
//! use uuid::Uuid;
//!
//! let actor = Actor { id: Uuid::new_v4(), role: Role::User };
//!
//! // Owners act on their own tasks...
//! assert_eq!(
//!     decide(&actor, &Action::ViewTask { owner_id: actor.id }),
//!     Decision::Allow
//! );
//!
//! // ...and nobody else's.
//! assert!(authorize(&actor, Action::DeleteTask { owner_id: Uuid::new_v4() }).is_err());
//! ```

use uuid::Uuid;

use crate::models::user::{Role, User};

/// The authenticated identity a decision is made for.
///
/// Deliberately smaller than [`User`]: the policy only ever consults the
/// actor's id and role, and taking a narrow input keeps it obvious that
/// nothing else can influence a decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    /// User ID of the caller
    pub id: Uuid,

    /// Role of the caller
    pub role: Role,
}

impl From<&User> for Actor {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            role: user.role,
        }
    }
}

/// A protected operation, carrying the resource owner where one exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Read a single task
    ViewTask {
        /// Owner of the task being read
        owner_id: Uuid,
    },

    /// Change a task's title or description
    UpdateTask {
        /// Owner of the task being changed
        owner_id: Uuid,
    },

    /// Delete a task
    DeleteTask {
        /// Owner of the task being deleted
        owner_id: Uuid,
    },

    /// Create a task (attached to the actor at creation)
    CreateTask,

    /// Read the actor's own profile
    ViewProfile,

    /// Update the actor's own profile
    UpdateProfile,

    /// List every user account
    ListUsers,

    /// Delete an arbitrary user account
    DeleteUser,
}

/// Outcome of a policy evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// The actor may perform the action
    Allow,

    /// The actor may not perform the action
    Deny,
}

/// Error type for denied actions, carrying which rule denied
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PolicyError {
    /// Actor does not own the task the action targets
    #[error("You do not own this task")]
    NotOwner,

    /// Action is reserved for administrators
    #[error("Administrator role required")]
    AdminRequired,
}

/// Evaluates an action for an actor.
///
/// Stateless and deterministic: the decision is a pure function of the
/// actor's id and role and the action's owner (if any).
pub fn decide(actor: &Actor, action: &Action) -> Decision {
    match action {
        Action::ViewTask { owner_id }
        | Action::UpdateTask { owner_id }
        | Action::DeleteTask { owner_id } => {
            if actor.id == *owner_id {
                Decision::Allow
            } else {
                Decision::Deny
            }
        }

        // Any authenticated actor may create tasks and manage their own
        // profile; authentication itself happened before we got here.
        Action::CreateTask | Action::ViewProfile | Action::UpdateProfile => Decision::Allow,

        Action::ListUsers | Action::DeleteUser => {
            if actor.role == Role::Admin {
                Decision::Allow
            } else {
                Decision::Deny
            }
        }
    }
}

/// Evaluates an action and converts a denial into the matching error, for
/// `?`-style use in handlers.
pub fn authorize(actor: &Actor, action: Action) -> Result<(), PolicyError> {
    match decide(actor, &action) {
        Decision::Allow => Ok(()),
        Decision::Deny => match action {
            Action::ViewTask { .. } | Action::UpdateTask { .. } | Action::DeleteTask { .. } => {
                Err(PolicyError::NotOwner)
            }
            Action::ListUsers | Action::DeleteUser => Err(PolicyError::AdminRequired),
            // Always-allow actions cannot reach here.
            Action::CreateTask | Action::ViewProfile | Action::UpdateProfile => unreachable!(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user_actor() -> Actor {
        Actor {
            id: Uuid::new_v4(),
            role: Role::User,
        }
    }

    fn admin_actor() -> Actor {
        Actor {
            id: Uuid::new_v4(),
            role: Role::Admin,
        }
    }

    #[test]
    fn test_owner_may_view_update_delete_own_task() {
        let actor = user_actor();
        let owner_id = actor.id;

        assert_eq!(decide(&actor, &Action::ViewTask { owner_id }), Decision::Allow);
        assert_eq!(decide(&actor, &Action::UpdateTask { owner_id }), Decision::Allow);
        assert_eq!(decide(&actor, &Action::DeleteTask { owner_id }), Decision::Allow);
    }

    #[test]
    fn test_non_owner_is_denied_task_actions() {
        let actor = user_actor();
        let owner_id = Uuid::new_v4();

        assert_eq!(decide(&actor, &Action::ViewTask { owner_id }), Decision::Deny);
        assert_eq!(decide(&actor, &Action::UpdateTask { owner_id }), Decision::Deny);
        assert_eq!(decide(&actor, &Action::DeleteTask { owner_id }), Decision::Deny);
    }

    #[test]
    fn test_admin_role_does_not_bypass_task_ownership() {
        // Admins administer users, not other people's tasks.
        let actor = admin_actor();
        let owner_id = Uuid::new_v4();

        assert_eq!(decide(&actor, &Action::ViewTask { owner_id }), Decision::Deny);
        assert_eq!(decide(&actor, &Action::DeleteTask { owner_id }), Decision::Deny);
    }

    #[test]
    fn test_any_actor_may_create_tasks() {
        assert_eq!(decide(&user_actor(), &Action::CreateTask), Decision::Allow);
        assert_eq!(decide(&admin_actor(), &Action::CreateTask), Decision::Allow);
    }

    #[test]
    fn test_any_actor_may_manage_own_profile() {
        let actor = user_actor();
        assert_eq!(decide(&actor, &Action::ViewProfile), Decision::Allow);
        assert_eq!(decide(&actor, &Action::UpdateProfile), Decision::Allow);
    }

    #[test]
    fn test_user_administration_requires_admin() {
        assert_eq!(decide(&user_actor(), &Action::ListUsers), Decision::Deny);
        assert_eq!(decide(&user_actor(), &Action::DeleteUser), Decision::Deny);

        assert_eq!(decide(&admin_actor(), &Action::ListUsers), Decision::Allow);
        assert_eq!(decide(&admin_actor(), &Action::DeleteUser), Decision::Allow);
    }

    #[test]
    fn test_authorize_maps_task_denials_to_not_owner() {
        let actor = user_actor();
        let err = authorize(&actor, Action::UpdateTask { owner_id: Uuid::new_v4() }).unwrap_err();
        assert_eq!(err, PolicyError::NotOwner);
    }

    #[test]
    fn test_authorize_maps_admin_denials_to_admin_required() {
        let err = authorize(&user_actor(), Action::ListUsers).unwrap_err();
        assert_eq!(err, PolicyError::AdminRequired);

        let err = authorize(&user_actor(), Action::DeleteUser).unwrap_err();
        assert_eq!(err, PolicyError::AdminRequired);
    }

    #[test]
    fn test_authorize_passes_allowed_actions() {
        let actor = user_actor();
        assert!(authorize(&actor, Action::CreateTask).is_ok());
        assert!(authorize(&actor, Action::ViewTask { owner_id: actor.id }).is_ok());
        assert!(authorize(&admin_actor(), Action::DeleteUser).is_ok());
    }

    #[test]
    fn test_decision_is_deterministic() {
        let actor = user_actor();
        let action = Action::ViewTask { owner_id: Uuid::new_v4() };

        for _ in 0..10 {
            assert_eq!(decide(&actor, &action), Decision::Deny);
        }
    }

    #[test]
    fn test_actor_from_user() {
        use chrono::Utc;

        let user = User {
            id: Uuid::new_v4(),
            name: "Admin".to_string(),
            email: "admin@example.com".to_string(),
            password_hash: "hash".to_string(),
            role: Role::Admin,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let actor = Actor::from(&user);
        assert_eq!(actor.id, user.id);
        assert_eq!(actor.role, Role::Admin);
    }
}
