use chrono::{DateTime, Utc};

use crate::model::id::{AttendeeId, EventId, UserId};

pub mod command;

#[derive(Debug, Clone)]
pub struct Attendee {
    pub id: AttendeeId,
    pub event_id: EventId,
    pub name: String,
    pub email: String,
    /// Present only when the registrant was authenticated; used for
    /// duplicate detection, nothing else.
    pub user_id: Option<UserId>,
    /// Set at creation, never mutated afterwards.
    pub registered_at: DateTime<Utc>,
}
