//! Family role map: users grouped by their free-text role label.

use crate::db::UserSummary;

/// Group users by role, preserving first-seen order both across roles and
/// within each role's email list. Pure derived view over `list_users()`.
pub fn build_role_map(users: &[UserSummary]) -> Vec<(String, Vec<String>)> {
    let mut map: Vec<(String, Vec<String>)> = Vec::new();
    for user in users {
        match map.iter_mut().find(|(role, _)| *role == user.role) {
            Some((_, emails)) => emails.push(user.email.clone()),
            None => map.push((user.role.clone(), vec![user.email.clone()])),
        }
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: i64, email: &str, role: &str) -> UserSummary {
        UserSummary {
            id,
            email: email.to_string(),
            role: role.to_string(),
        }
    }

    #[test]
    fn test_groups_preserve_first_seen_order() {
        let users = vec![
            user(1, "john@family.com", "Dad"),
            user(2, "mary@family.com", "Mum"),
            user(3, "sarah@family.com", "Daughter"),
            user(4, "stepdad@family.com", "Dad"),
        ];

        let map = build_role_map(&users);
        assert_eq!(
            map,
            vec![
                (
                    "Dad".to_string(),
                    vec!["john@family.com".to_string(), "stepdad@family.com".to_string()]
                ),
                ("Mum".to_string(), vec!["mary@family.com".to_string()]),
                ("Daughter".to_string(), vec!["sarah@family.com".to_string()]),
            ]
        );
    }

    #[test]
    fn test_empty_input() {
        assert!(build_role_map(&[]).is_empty());
    }
}
