use kernel::model::id::UserId;
use sqlx::FromRow;

#[derive(Debug, FromRow)]
pub struct UserRow {
    pub id: UserId,
    pub name: String,
    pub email: String,
    /// Stored as text; parsed into `Role` when the row is mapped.
    pub role: String,
}
