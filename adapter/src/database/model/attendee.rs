use chrono::{DateTime, Utc};
use kernel::model::attendee::Attendee;
use kernel::model::id::{AttendeeId, EventId, UserId};
use sqlx::FromRow;

#[derive(Debug, FromRow)]
pub struct AttendeeRow {
    pub id: AttendeeId,
    pub event_id: EventId,
    pub name: String,
    pub email: String,
    pub user_id: Option<UserId>,
    pub registered_at: DateTime<Utc>,
}

impl From<AttendeeRow> for Attendee {
    fn from(value: AttendeeRow) -> Self {
        let AttendeeRow {
            id,
            event_id,
            name,
            email,
            user_id,
            registered_at,
        } = value;
        Self {
            id,
            event_id,
            name,
            email,
            user_id,
            registered_at,
        }
    }
}
