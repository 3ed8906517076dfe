use derive_new::new;

use crate::model::id::{EventId, UserId};

#[derive(Debug, new)]
pub struct RegisterAttendee {
    pub event_id: EventId,
    pub name: String,
    pub email: String,
    pub user_id: Option<UserId>,
}
