use shared::error::AppResult;

pub trait RedisKey {
    type Value: RedisValue;

    fn inner(&self) -> String;
}

pub trait RedisValue: Sized {
    fn try_from_str(s: &str) -> AppResult<Self>;
}
