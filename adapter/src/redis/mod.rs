use redis::{AsyncCommands, Client};
use shared::config::RedisConfig;
use shared::error::AppResult;

use self::model::{RedisKey, RedisValue};

pub mod model;

pub struct RedisClient {
    client: Client,
}

impl RedisClient {
    pub fn new(config: &RedisConfig) -> AppResult<Self> {
        let client = Client::open(format!("redis://{}:{}", config.host, config.port))?;
        Ok(Self { client })
    }

    pub async fn get<T: RedisKey>(&self, key: &T) -> AppResult<Option<T::Value>> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let stored: Option<String> = conn.get(key.inner()).await?;
        stored.map(|s| T::Value::try_from_str(&s)).transpose()
    }

    pub async fn expire<T: RedisKey>(&self, key: &T, ttl: u64) -> AppResult<()> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let _: i64 = conn.expire(key.inner(), ttl as i64).await?;
        Ok(())
    }
}
