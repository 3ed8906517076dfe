use async_trait::async_trait;
use shared::error::AppResult;

use crate::model::auth::AccessToken;
use crate::model::id::UserId;

/// Resolves caller-supplied access tokens to user ids. Token issuance
/// belongs to the external auth service; this side only reads.
#[async_trait]
pub trait AuthRepository: Send + Sync {
    async fn fetch_user_id_from_token(
        &self,
        access_token: &AccessToken,
    ) -> AppResult<Option<UserId>>;
}
