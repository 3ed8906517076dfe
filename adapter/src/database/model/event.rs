use chrono::{DateTime, Utc};
use kernel::model::event::{Event, EventWithAttendeeCount};
use kernel::model::id::{EventId, UserId};
use sqlx::FromRow;

#[derive(Debug, FromRow)]
pub struct EventRow {
    pub id: EventId,
    pub title: String,
    pub description: String,
    pub scheduled_at: DateTime<Utc>,
    pub location: String,
    pub capacity: i32,
    pub is_published: bool,
    pub created_by: Option<UserId>,
    pub created_at: DateTime<Utc>,
}

impl From<EventRow> for Event {
    fn from(value: EventRow) -> Self {
        let EventRow {
            id,
            title,
            description,
            scheduled_at,
            location,
            capacity,
            is_published,
            created_by,
            created_at,
        } = value;
        Self {
            id,
            title,
            description,
            scheduled_at,
            location,
            capacity,
            is_published,
            created_by,
            created_at,
        }
    }
}

#[derive(Debug, FromRow)]
pub struct EventWithCountRow {
    pub id: EventId,
    pub title: String,
    pub description: String,
    pub scheduled_at: DateTime<Utc>,
    pub location: String,
    pub capacity: i32,
    pub is_published: bool,
    pub created_by: Option<UserId>,
    pub created_at: DateTime<Utc>,
    pub attendee_count: i64,
}

impl From<EventWithCountRow> for EventWithAttendeeCount {
    fn from(value: EventWithCountRow) -> Self {
        let EventWithCountRow {
            id,
            title,
            description,
            scheduled_at,
            location,
            capacity,
            is_published,
            created_by,
            created_at,
            attendee_count,
        } = value;
        Self {
            event: Event {
                id,
                title,
                description,
                scheduled_at,
                location,
                capacity,
                is_published,
                created_by,
                created_at,
            },
            attendee_count,
        }
    }
}
