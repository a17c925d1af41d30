//! User accounts and roles.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Role stored on a user account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "OPERADOR")]
    Operator,
    #[serde(rename = "SUPERVISOR")]
    Supervisor,
    #[serde(other)]
    Unknown,
}

/// A row of the `usuarios` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAccount {
    pub id: Uuid,
    #[serde(alias = "nombre_completo")]
    pub full_name: String,
    #[serde(alias = "rol")]
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl UserAccount {
    pub fn is_supervisor(&self) -> bool {
        self.role == Role::Supervisor
    }
}

/// Display name embedded from a joined user row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonRef {
    #[serde(alias = "nombre_completo")]
    pub full_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_user_from_backend_row() {
        let user: UserAccount = serde_json::from_value(json!({
            "id": "6f1c7b8e-2d4a-4a8e-9a51-1f0d2b3c4d5e",
            "nombre_completo": "Ana Rojas",
            "rol": "SUPERVISOR",
            "created_at": "2024-01-01T00:00:00Z"
        }))
        .unwrap();

        assert!(user.is_supervisor());
        assert_eq!(user.full_name, "Ana Rojas");

        let out = serde_json::to_value(&user).unwrap();
        assert_eq!(out["fullName"], "Ana Rojas");
        assert_eq!(out["role"], "SUPERVISOR");
    }

    #[test]
    fn test_unrecognized_role_is_not_supervisor() {
        let user: UserAccount = serde_json::from_value(json!({
            "id": "6f1c7b8e-2d4a-4a8e-9a51-1f0d2b3c4d5e",
            "nombre_completo": "Luis",
            "rol": "ADMIN"
        }))
        .unwrap();

        assert_eq!(user.role, Role::Unknown);
        assert!(!user.is_supervisor());
    }
}
