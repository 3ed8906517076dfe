use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use derive_new::new;
use kernel::model::auth::AccessToken;
use kernel::model::id::UserId;
use kernel::repository::auth::AuthRepository;
use shared::error::{AppError, AppResult};

use crate::redis::model::{RedisKey, RedisValue};
use crate::redis::RedisClient;

pub struct AuthorizationKey(AccessToken);

impl RedisKey for AuthorizationKey {
    type Value = AuthorizedUserId;

    fn inner(&self) -> String {
        format!("auth:{}", self.0 .0)
    }
}

impl From<&AccessToken> for AuthorizationKey {
    fn from(value: &AccessToken) -> Self {
        Self(value.clone())
    }
}

pub struct AuthorizedUserId(UserId);

impl RedisValue for AuthorizedUserId {
    fn try_from_str(s: &str) -> AppResult<Self> {
        UserId::from_str(s)
            .map(Self)
            .map_err(|e| AppError::ConversionEntityError(e.to_string()))
    }
}

#[derive(new)]
pub struct AuthRepositoryImpl {
    kv: Arc<RedisClient>,
    ttl: u64,
}

#[async_trait]
impl AuthRepository for AuthRepositoryImpl {
    async fn fetch_user_id_from_token(
        &self,
        access_token: &AccessToken,
    ) -> AppResult<Option<UserId>> {
        let key: AuthorizationKey = access_token.into();
        let Some(AuthorizedUserId(user_id)) = self.kv.get(&key).await? else {
            return Ok(None);
        };

        // Sliding session: every successful use re-arms the token TTL.
        self.kv.expire(&key, self.ttl).await?;

        Ok(Some(user_id))
    }
}
