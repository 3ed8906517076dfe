use chrono::{DateTime, Utc};

use crate::model::attendee::Attendee;
use crate::model::id::{EventId, UserId};

pub mod command;

#[derive(Debug, Clone)]
pub struct Event {
    pub id: EventId,
    pub title: String,
    pub description: String,
    pub scheduled_at: DateTime<Utc>,
    pub location: String,
    /// Maximum number of attendees; always at least 1.
    pub capacity: i32,
    pub is_published: bool,
    /// Identity that created the event; None for seeded records.
    pub created_by: Option<UserId>,
    pub created_at: DateTime<Utc>,
}

/// List view: the attendee count is aggregated live from the registry,
/// never stored on the event itself.
#[derive(Debug)]
pub struct EventWithAttendeeCount {
    pub event: Event,
    pub attendee_count: i64,
}

#[derive(Debug)]
pub struct EventWithAttendees {
    pub event: Event,
    pub attendees: Vec<Attendee>,
}
