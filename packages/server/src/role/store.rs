use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
    SqlErr,
};
use tracing::instrument;

use crate::entity::dashboard_role::{self, Role};
use crate::error::AppError;

/// Longest email address accepted (RFC 5321 path limit).
const MAX_EMAIL_LEN: usize = 254;

/// Trim and lowercase an operator email, rejecting obviously invalid input.
pub fn normalize_email(input: &str) -> Result<String, AppError> {
    let email = input.trim().to_lowercase();
    if email.is_empty() {
        return Err(AppError::Validation("Email must not be empty".into()));
    }
    if email.len() > MAX_EMAIL_LEN {
        return Err(AppError::Validation(format!(
            "Email must be at most {MAX_EMAIL_LEN} characters"
        )));
    }
    let valid_shape = email
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && !domain.is_empty());
    if !valid_shape {
        return Err(AppError::Validation(format!("Invalid email: {email}")));
    }
    Ok(email)
}

pub struct RoleStore<'a, C: ConnectionTrait> {
    conn: &'a C,
}

impl<'a, C: ConnectionTrait> RoleStore<'a, C> {
    pub fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    /// All role records, oldest first.
    pub async fn list(&self) -> Result<Vec<dashboard_role::Model>, AppError> {
        Ok(dashboard_role::Entity::find()
            .order_by_asc(dashboard_role::Column::Id)
            .all(self.conn)
            .await?)
    }

    #[instrument(skip(self))]
    pub async fn add(&self, email: &str, role: Role) -> Result<dashboard_role::Model, AppError> {
        let email = normalize_email(email)?;

        let existing = dashboard_role::Entity::find()
            .filter(dashboard_role::Column::Email.eq(email.as_str()))
            .one(self.conn)
            .await?;
        if existing.is_some() {
            return Err(duplicate(&email));
        }

        self.insert(email, role).await
    }

    /// Insert a normalized email. A concurrent insert that slipped past the
    /// pre-check surfaces as a unique violation and is reported as a duplicate.
    async fn insert(&self, email: String, role: Role) -> Result<dashboard_role::Model, AppError> {
        let model = dashboard_role::ActiveModel {
            email: Set(email.clone()),
            role: Set(role),
            created_at: Set(Utc::now()),
            ..Default::default()
        };

        model.insert(self.conn).await.map_err(|e| match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => {
                tracing::debug!("Role insert race: unique constraint caught on insert");
                duplicate(&email)
            }
            _ => AppError::from(e),
        })
    }

    #[instrument(skip(self))]
    pub async fn remove(&self, id: i32) -> Result<(), AppError> {
        let result = dashboard_role::Entity::delete_by_id(id)
            .exec(self.conn)
            .await?;
        if result.rows_affected == 0 {
            return Err(AppError::NotFound(format!("Role {id} not found")));
        }
        Ok(())
    }

    /// Role of the operator with this email.
    pub async fn lookup(&self, email: &str) -> Result<dashboard_role::Model, AppError> {
        let email = normalize_email(email)?;
        dashboard_role::Entity::find()
            .filter(dashboard_role::Column::Email.eq(email.as_str()))
            .one(self.conn)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("No role assigned to {email}")))
    }
}

fn duplicate(email: &str) -> AppError {
    AppError::Duplicate(format!("{email} already has a role"))
}
