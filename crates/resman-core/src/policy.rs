//! Access policy.
//!
//! Every authorization decision goes through [`can`], which consults the
//! single [`POLICY`] table. Roles do not inherit from each other; each
//! action lists the roles it allows, plus at most one ownership rule that
//! grants access to a specific resource instance regardless of role.

use uuid::Uuid;

use crate::error::{ResmanError, ResmanResult};
use crate::models::user::{Role, User};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    CreateProject,
    UpdateProject,
    DeleteProject,
    ManageProjectEngineers,
    CreateAssignment,
    UpdateAssignment,
    DeleteAssignment,
    LogHours,
    ListUsers,
    ViewUser,
    UpdateUser,
    DeleteUser,
    ChangeUserRole,
    ViewDashboard,
}

/// The resource instance an action targets, carrying only what ownership
/// rules need.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    /// No specific instance (collection-level actions).
    Global,
    Project { manager_id: Uuid },
    User { id: Uuid },
    Assignment { engineer_id: Uuid },
}

/// Ownership rule: grants the action when the actor owns the resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ownership {
    None,
    /// The actor is the project's manager.
    ProjectManager,
    /// The actor is the identity record itself.
    SelfRecord,
    /// The actor is the engineer on the assignment.
    AssignedEngineer,
}

#[derive(Debug)]
pub struct Rule {
    pub action: Action,
    pub roles: &'static [Role],
    pub ownership: Ownership,
}

const ADMIN: &[Role] = &[Role::Admin];
const MANAGERS: &[Role] = &[Role::Admin, Role::ProjectManager];
const LEADS: &[Role] = &[Role::Admin, Role::ProjectManager, Role::TeamLead];

pub static POLICY: &[Rule] = &[
    Rule {
        action: Action::CreateProject,
        roles: MANAGERS,
        ownership: Ownership::None,
    },
    Rule {
        action: Action::UpdateProject,
        roles: ADMIN,
        ownership: Ownership::ProjectManager,
    },
    Rule {
        action: Action::DeleteProject,
        roles: ADMIN,
        ownership: Ownership::ProjectManager,
    },
    Rule {
        action: Action::ManageProjectEngineers,
        roles: ADMIN,
        ownership: Ownership::ProjectManager,
    },
    Rule {
        action: Action::CreateAssignment,
        roles: LEADS,
        ownership: Ownership::None,
    },
    Rule {
        action: Action::UpdateAssignment,
        roles: LEADS,
        ownership: Ownership::None,
    },
    Rule {
        action: Action::DeleteAssignment,
        roles: LEADS,
        ownership: Ownership::None,
    },
    Rule {
        action: Action::LogHours,
        roles: LEADS,
        ownership: Ownership::AssignedEngineer,
    },
    Rule {
        action: Action::ListUsers,
        roles: MANAGERS,
        ownership: Ownership::None,
    },
    Rule {
        action: Action::ViewUser,
        roles: MANAGERS,
        ownership: Ownership::SelfRecord,
    },
    Rule {
        action: Action::UpdateUser,
        roles: ADMIN,
        ownership: Ownership::SelfRecord,
    },
    Rule {
        action: Action::DeleteUser,
        roles: ADMIN,
        ownership: Ownership::SelfRecord,
    },
    Rule {
        action: Action::ChangeUserRole,
        roles: ADMIN,
        ownership: Ownership::None,
    },
    Rule {
        action: Action::ViewDashboard,
        roles: MANAGERS,
        ownership: Ownership::None,
    },
];

/// The authenticated principal as far as the policy is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub id: Uuid,
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

pub fn rule_for(action: Action) -> Option<&'static Rule> {
    POLICY.iter().find(|rule| rule.action == action)
}

/// Whether `actor` may perform `action` on `resource`. Actions without a
/// rule are denied.
pub fn can(actor: &Actor, action: Action, resource: &Resource) -> bool {
    let Some(rule) = rule_for(action) else {
        return false;
    };
    rule.roles.contains(&actor.role) || owns(actor, rule.ownership, resource)
}

fn owns(actor: &Actor, ownership: Ownership, resource: &Resource) -> bool {
    match (ownership, resource) {
        (Ownership::ProjectManager, Resource::Project { manager_id }) => *manager_id == actor.id,
        (Ownership::SelfRecord, Resource::User { id }) => *id == actor.id,
        (Ownership::AssignedEngineer, Resource::Assignment { engineer_id }) => {
            *engineer_id == actor.id
        }
        _ => false,
    }
}

/// Like [`can`], but returns `Forbidden` on denial.
pub fn authorize(actor: &Actor, action: Action, resource: &Resource) -> ResmanResult<()> {
    if can(actor, action, resource) {
        Ok(())
    } else {
        Err(ResmanError::forbidden(
            "You don't have permission to perform this action",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn actor(role: Role) -> Actor {
        Actor {
            id: Uuid::new_v4(),
            role,
        }
    }

    #[test]
    fn every_action_has_exactly_one_rule() {
        let actions = [
            Action::CreateProject,
            Action::UpdateProject,
            Action::DeleteProject,
            Action::ManageProjectEngineers,
            Action::CreateAssignment,
            Action::UpdateAssignment,
            Action::DeleteAssignment,
            Action::LogHours,
            Action::ListUsers,
            Action::ViewUser,
            Action::UpdateUser,
            Action::DeleteUser,
            Action::ChangeUserRole,
            Action::ViewDashboard,
        ];
        for action in actions {
            let count = POLICY.iter().filter(|r| r.action == action).count();
            assert_eq!(count, 1, "{action:?} should have exactly one rule");
        }
        assert_eq!(POLICY.len(), actions.len());
    }

    #[test]
    fn create_project_allows_managers_only() {
        for role in [Role::Admin, Role::ProjectManager] {
            assert!(can(&actor(role), Action::CreateProject, &Resource::Global));
        }
        for role in [Role::TeamLead, Role::Engineer, Role::User] {
            assert!(!can(&actor(role), Action::CreateProject, &Resource::Global));
        }
    }

    #[test]
    fn create_assignment_allows_team_leads_and_up() {
        for role in [Role::Admin, Role::ProjectManager, Role::TeamLead] {
            assert!(can(&actor(role), Action::CreateAssignment, &Resource::Global));
        }
        for role in [Role::Engineer, Role::User] {
            assert!(!can(&actor(role), Action::CreateAssignment, &Resource::Global));
        }
    }

    #[test]
    fn project_ownership_overrides_role() {
        let owner = actor(Role::ProjectManager);
        let other_pm = actor(Role::ProjectManager);
        let resource = Resource::Project {
            manager_id: owner.id,
        };

        assert!(can(&owner, Action::UpdateProject, &resource));
        assert!(!can(&other_pm, Action::UpdateProject, &resource));
        assert!(can(&actor(Role::Admin), Action::UpdateProject, &resource));

        // Ownership applies even without the project_manager role tag.
        let engineer_owner = actor(Role::Engineer);
        let owned = Resource::Project {
            manager_id: engineer_owner.id,
        };
        assert!(can(&engineer_owner, Action::DeleteProject, &owned));
    }

    #[test]
    fn self_access_on_identity_records() {
        let me = actor(Role::User);
        let mine = Resource::User { id: me.id };
        let theirs = Resource::User { id: Uuid::new_v4() };

        assert!(can(&me, Action::ViewUser, &mine));
        assert!(can(&me, Action::UpdateUser, &mine));
        assert!(can(&me, Action::DeleteUser, &mine));
        assert!(!can(&me, Action::ViewUser, &theirs));
        assert!(!can(&me, Action::UpdateUser, &theirs));
        assert!(!can(&me, Action::ChangeUserRole, &mine));
    }

    #[test]
    fn project_managers_view_but_do_not_mutate_other_users() {
        let pm = actor(Role::ProjectManager);
        let other = Resource::User { id: Uuid::new_v4() };
        assert!(can(&pm, Action::ViewUser, &other));
        assert!(!can(&pm, Action::UpdateUser, &other));
        assert!(!can(&pm, Action::DeleteUser, &other));
    }

    #[test]
    fn hours_can_be_logged_by_the_assigned_engineer() {
        let engineer = actor(Role::Engineer);
        let own = Resource::Assignment {
            engineer_id: engineer.id,
        };
        let foreign = Resource::Assignment {
            engineer_id: Uuid::new_v4(),
        };
        assert!(can(&engineer, Action::LogHours, &own));
        assert!(!can(&engineer, Action::LogHours, &foreign));
        assert!(can(&actor(Role::TeamLead), Action::LogHours, &foreign));
    }

    #[test]
    fn ownership_does_not_leak_across_resource_kinds() {
        let me = actor(Role::Engineer);
        let wrong_kind = Resource::User { id: me.id };
        assert!(!can(&me, Action::UpdateProject, &wrong_kind));
    }

    #[test]
    fn authorize_reports_forbidden() {
        let err = authorize(&actor(Role::User), Action::ViewDashboard, &Resource::Global)
            .unwrap_err();
        assert!(matches!(err, ResmanError::Forbidden { .. }));
    }
}
