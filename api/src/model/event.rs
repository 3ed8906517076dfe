use chrono::{DateTime, Utc};
use derive_new::new;
use garde::Validate;
use kernel::model::event::command::CreateEvent;
use kernel::model::event::{Event, EventWithAttendeeCount, EventWithAttendees};
use kernel::model::id::{EventId, UserId};
use serde::{Deserialize, Serialize};

use crate::model::attendee::AttendeeResponse;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventRequest {
    #[garde(length(min = 1))]
    pub title: String,
    #[garde(length(min = 1))]
    pub description: String,
    #[garde(skip)]
    pub date: DateTime<Utc>,
    #[garde(length(min = 1))]
    pub location: String,
    #[garde(range(min = 1))]
    pub capacity: i32,
}

#[derive(new)]
pub struct CreateEventRequestWithUser(CreateEventRequest, UserId);

impl From<CreateEventRequestWithUser> for CreateEvent {
    fn from(value: CreateEventRequestWithUser) -> Self {
        let CreateEventRequestWithUser(
            CreateEventRequest {
                title,
                description,
                date,
                location,
                capacity,
            },
            user_id,
        ) = value;
        CreateEvent {
            title,
            description,
            scheduled_at: date,
            location,
            capacity,
            created_by: Some(user_id),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishEventRequest {
    pub is_published: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventListQuery {
    #[serde(default)]
    pub only_published: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventResponse {
    pub id: EventId,
    pub title: String,
    pub description: String,
    pub date: DateTime<Utc>,
    pub location: String,
    pub capacity: i32,
    pub is_published: bool,
    pub created_by: Option<UserId>,
    pub created_at: DateTime<Utc>,
}

impl From<Event> for EventResponse {
    fn from(value: Event) -> Self {
        let Event {
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
            date: scheduled_at,
            location,
            capacity,
            is_published,
            created_by,
            created_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventsResponse {
    pub items: Vec<EventWithCountResponse>,
}

impl From<Vec<EventWithAttendeeCount>> for EventsResponse {
    fn from(value: Vec<EventWithAttendeeCount>) -> Self {
        Self {
            items: value.into_iter().map(EventWithCountResponse::from).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventWithCountResponse {
    pub id: EventId,
    pub title: String,
    pub description: String,
    pub date: DateTime<Utc>,
    pub location: String,
    pub capacity: i32,
    pub is_published: bool,
    pub created_by: Option<UserId>,
    pub created_at: DateTime<Utc>,
    pub attendee_count: i64,
}

impl From<EventWithAttendeeCount> for EventWithCountResponse {
    fn from(value: EventWithAttendeeCount) -> Self {
        let EventWithAttendeeCount {
            event:
                Event {
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
        } = value;
        Self {
            id,
            title,
            description,
            date: scheduled_at,
            location,
            capacity,
            is_published,
            created_by,
            created_at,
            attendee_count,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDetailsResponse {
    pub id: EventId,
    pub title: String,
    pub description: String,
    pub date: DateTime<Utc>,
    pub location: String,
    pub capacity: i32,
    pub is_published: bool,
    pub created_by: Option<UserId>,
    pub created_at: DateTime<Utc>,
    pub attendees: Vec<AttendeeResponse>,
}

impl From<EventWithAttendees> for EventDetailsResponse {
    fn from(value: EventWithAttendees) -> Self {
        let EventWithAttendees {
            event:
                Event {
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
            attendees,
        } = value;
        Self {
            id,
            title,
            description,
            date: scheduled_at,
            location,
            capacity,
            is_published,
            created_by,
            created_at,
            attendees: attendees.into_iter().map(AttendeeResponse::from).collect(),
        }
    }
}
