use async_trait::async_trait;
use shared::error::AppResult;

use crate::model::id::UserId;
use crate::model::user::User;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_current_user(&self, current_user_id: UserId) -> AppResult<Option<User>>;
}
