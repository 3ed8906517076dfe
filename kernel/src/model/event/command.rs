use chrono::{DateTime, Utc};
use derive_new::new;

use crate::model::id::{EventId, UserId};

#[derive(Debug, new)]
pub struct CreateEvent {
    pub title: String,
    pub description: String,
    pub scheduled_at: DateTime<Utc>,
    pub location: String,
    pub capacity: i32,
    pub created_by: Option<UserId>,
}

#[derive(Debug, new)]
pub struct SetEventPublished {
    pub event_id: EventId,
    pub is_published: bool,
}

#[derive(Debug, new)]
pub struct DeleteEvent {
    pub event_id: EventId,
}
