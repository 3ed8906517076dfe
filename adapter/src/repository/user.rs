use std::str::FromStr;

use async_trait::async_trait;
use derive_new::new;
use kernel::model::id::UserId;
use kernel::model::role::Role;
use kernel::model::user::User;
use kernel::repository::user::UserRepository;
use shared::error::{AppError, AppResult};

use crate::database::model::user::UserRow;
use crate::database::ConnectionPool;

#[derive(new)]
pub struct UserRepositoryImpl {
    db: ConnectionPool,
}

#[async_trait]
impl UserRepository for UserRepositoryImpl {
    async fn find_current_user(&self, current_user_id: UserId) -> AppResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
                SELECT id, name, email, role
                FROM users
                WHERE id = $1
            "#,
        )
        .bind(current_user_id)
        .fetch_optional(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        let Some(row) = row else {
            return Ok(None);
        };

        let role =
            Role::from_str(&row.role).map_err(|e| AppError::ConversionEntityError(e.to_string()))?;

        Ok(Some(User {
            id: row.id,
            name: row.name,
            email: row.email,
            role,
        }))
    }
}
