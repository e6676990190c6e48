use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entity::dashboard_role::{self, Role};

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateRoleRequest {
    #[schema(example = "ops@example.com")]
    pub email: String,
    pub role: Role,
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct DeleteRoleRequest {
    #[schema(example = 1)]
    pub id: i32,
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct RoleLookupQuery {
    /// Operator email (case-insensitive).
    #[param(example = "ops@example.com")]
    pub email: Option<String>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct RoleResponse {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "ops@example.com")]
    pub email: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl From<dashboard_role::Model> for RoleResponse {
    fn from(m: dashboard_role::Model) -> Self {
        Self {
            id: m.id,
            email: m.email,
            role: m.role,
            created_at: m.created_at,
        }
    }
}
