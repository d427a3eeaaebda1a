//! Mock role-based access: roles, permissions and a fixed user directory.

mod roles;

use serde::{Deserialize, Serialize};

pub use roles::{Permission, Role};

/// A workflow participant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub department: String,
}

impl User {
    /// Create a user in the role's department.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        email: impl Into<String>,
        role: Role,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: email.into(),
            role,
            department: role.department().to_string(),
        }
    }

    /// Whether the user's role carries `permission`.
    pub fn has_permission(&self, permission: Permission) -> bool {
        self.role.allows(permission)
    }
}

/// Fixed set of known users.
#[derive(Debug, Clone, Default)]
pub struct UserDirectory {
    users: Vec<User>,
}

impl UserDirectory {
    /// Directory with the given users.
    pub fn new(users: Vec<User>) -> Self {
        Self { users }
    }

    /// One demo user per role.
    pub fn mock() -> Self {
        Self::new(vec![
            User::new("1", "John Doe", "john.doe@safaricom.co.ke", Role::InHouseCounsel),
            User::new("2", "Jane Smith", "jane.smith@lawfirm.co.ke", Role::ExternalCounsel),
            User::new(
                "3",
                "Mike Johnson",
                "mike.johnson@safaricom.co.ke",
                Role::PropertyOperations,
            ),
            User::new("4", "Admin User", "admin@safaricom.co.ke", Role::Admin),
        ])
    }

    /// All users.
    pub fn users(&self) -> &[User] {
        &self.users
    }

    /// Find a user by id.
    pub fn find(&self, id: &str) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }

    /// Users holding `role`.
    pub fn users_by_role(&self, role: Role) -> Vec<&User> {
        self.users.iter().filter(|u| u.role == role).collect()
    }
}
