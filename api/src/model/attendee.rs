use chrono::{DateTime, Utc};
use derive_new::new;
use garde::Validate;
use kernel::model::attendee::command::RegisterAttendee;
use kernel::model::attendee::Attendee;
use kernel::model::id::{AttendeeId, EventId, UserId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterAttendeeRequest {
    #[garde(length(min = 1))]
    pub name: String,
    #[garde(email)]
    pub email: String,
}

#[derive(new)]
pub struct RegisterAttendeeRequestWithIds(EventId, Option<UserId>, RegisterAttendeeRequest);

impl From<RegisterAttendeeRequestWithIds> for RegisterAttendee {
    fn from(value: RegisterAttendeeRequestWithIds) -> Self {
        let RegisterAttendeeRequestWithIds(
            event_id,
            user_id,
            RegisterAttendeeRequest { name, email },
        ) = value;
        RegisterAttendee {
            event_id,
            name,
            email,
            user_id,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendeeResponse {
    pub id: AttendeeId,
    pub event_id: EventId,
    pub name: String,
    pub email: String,
    pub user_id: Option<UserId>,
    pub registered_at: DateTime<Utc>,
}

impl From<Attendee> for AttendeeResponse {
    fn from(value: Attendee) -> Self {
        let Attendee {
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
