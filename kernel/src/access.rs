use crate::model::role::Role;
use crate::model::user::User;

/// Single authorization gate for event mutations. Every handler that
/// mutates the catalog asks this policy instead of inspecting roles
/// inline.
pub struct AccessPolicy;

impl AccessPolicy {
    pub fn can_create_event(user: &User) -> bool {
        matches!(user.role, Role::Admin)
    }

    pub fn can_publish_event(user: &User) -> bool {
        matches!(user.role, Role::Admin)
    }

    pub fn can_delete_event(user: &User) -> bool {
        matches!(user.role, Role::Admin)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::model::id::UserId;

    fn user_with_role(role: Role) -> User {
        User {
            id: UserId::new(),
            name: "Test User".into(),
            email: "test@example.com".into(),
            role,
        }
    }

    #[rstest]
    #[case(Role::Admin, true)]
    #[case(Role::User, false)]
    fn only_admins_may_mutate_events(#[case] role: Role, #[case] allowed: bool) {
        let user = user_with_role(role);
        assert_eq!(AccessPolicy::can_create_event(&user), allowed);
        assert_eq!(AccessPolicy::can_publish_event(&user), allowed);
        assert_eq!(AccessPolicy::can_delete_event(&user), allowed);
    }
}
