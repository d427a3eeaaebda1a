//! Roles and the permissions each one carries.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Workflow role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// In-House Counsel
    #[serde(rename = "IC")]
    InHouseCounsel,
    /// External Counsel
    #[serde(rename = "EC")]
    ExternalCounsel,
    /// Property Operations
    #[serde(rename = "POA")]
    PropertyOperations,
    /// System administrator
    #[serde(rename = "Admin")]
    Admin,
}

impl Role {
    /// All roles.
    pub const ALL: [Self; 4] =
        [Self::InHouseCounsel, Self::ExternalCounsel, Self::PropertyOperations, Self::Admin];

    /// Short code used in assignee labels.
    pub fn code(self) -> &'static str {
        match self {
            Self::InHouseCounsel => "IC",
            Self::ExternalCounsel => "EC",
            Self::PropertyOperations => "POA",
            Self::Admin => "Admin",
        }
    }

    /// Department the role sits in.
    pub fn department(self) -> &'static str {
        match self {
            Self::InHouseCounsel => "Legal - In-House Counsel",
            Self::ExternalCounsel => "External Counsel",
            Self::PropertyOperations => "Property Operations",
            Self::Admin => "System Administration",
        }
    }

    /// Permissions granted to the role.
    pub fn permissions(self) -> &'static [Permission] {
        use Permission::*;
        match self {
            Self::InHouseCounsel => &[
                CreateInstruction,
                ViewDashboard,
                AssignExternalCounsel,
                ApproveDocuments,
                GenerateReports,
            ],
            Self::ExternalCounsel => {
                &[ViewAssignedInstructions, UploadDocuments, UpdateStatus, GenerateDocuments]
            }
            Self::PropertyOperations => {
                &[ViewAllInstructions, ManageProperties, GenerateReports]
            }
            Self::Admin => {
                &[ManageUsers, ViewAll, SystemSettings, ManageTemplates, GenerateReports]
            }
        }
    }

    /// Whether the role carries `permission`.
    pub fn allows(self, permission: Permission) -> bool {
        self.permissions().contains(&permission)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|role| role.code().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("Unknown role: {s} (expected IC, EC, POA or Admin)"))
    }
}

/// Named permission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Permission {
    CreateInstruction,
    ViewDashboard,
    AssignExternalCounsel,
    ApproveDocuments,
    GenerateReports,
    ViewAssignedInstructions,
    UploadDocuments,
    UpdateStatus,
    GenerateDocuments,
    ViewAllInstructions,
    ManageProperties,
    ManageUsers,
    ViewAll,
    SystemSettings,
    ManageTemplates,
}

impl Permission {
    /// Kebab-case permission string.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CreateInstruction => "create-instruction",
            Self::ViewDashboard => "view-dashboard",
            Self::AssignExternalCounsel => "assign-external-counsel",
            Self::ApproveDocuments => "approve-documents",
            Self::GenerateReports => "generate-reports",
            Self::ViewAssignedInstructions => "view-assigned-instructions",
            Self::UploadDocuments => "upload-documents",
            Self::UpdateStatus => "update-status",
            Self::GenerateDocuments => "generate-documents",
            Self::ViewAllInstructions => "view-all-instructions",
            Self::ManageProperties => "manage-properties",
            Self::ManageUsers => "manage-users",
            Self::ViewAll => "view-all",
            Self::SystemSettings => "system-settings",
            Self::ManageTemplates => "manage-templates",
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
