use async_trait::async_trait;
use shared::error::AppResult;

use crate::model::attendee::command::RegisterAttendee;
use crate::model::attendee::Attendee;
use crate::model::id::{AttendeeId, EventId, UserId};

#[async_trait]
pub trait AttendeeRepository: Send + Sync {
    /// Admits a registration as one atomic step per event:
    /// the event must exist, an authenticated registrant must not already
    /// hold a record for it, and the committed attendee count must stay
    /// within the event's capacity. Two concurrent registrations for the
    /// last remaining slot must never both succeed.
    async fn register(&self, event: RegisterAttendee) -> AppResult<Attendee>;
    /// Idempotent; removing an attendee that is already gone is not an
    /// error.
    async fn delete_by_id(&self, attendee_id: AttendeeId) -> AppResult<()>;
    async fn find_by_event_and_user(
        &self,
        event_id: EventId,
        user_id: UserId,
    ) -> AppResult<Option<Attendee>>;
    async fn count_for_event(&self, event_id: EventId) -> AppResult<i64>;
}
