use async_trait::async_trait;
use shared::error::AppResult;

use crate::model::event::command::{CreateEvent, DeleteEvent, SetEventPublished};
use crate::model::event::{Event, EventWithAttendeeCount, EventWithAttendees};
use crate::model::id::EventId;

#[async_trait]
pub trait EventRepository: Send + Sync {
    /// New events always start unpublished.
    async fn create(&self, event: CreateEvent) -> AppResult<Event>;
    /// Ordered by scheduled time ascending. The attendee count is
    /// aggregated from the attendee records at read time.
    async fn find_all(&self, only_published: bool) -> AppResult<Vec<EventWithAttendeeCount>>;
    async fn find_by_id(&self, event_id: EventId) -> AppResult<Option<EventWithAttendees>>;
    async fn set_published(&self, event: SetEventPublished) -> AppResult<Event>;
    /// Removes the event and all of its attendees as one unit. A partial
    /// outcome must never be observable.
    async fn delete(&self, event: DeleteEvent) -> AppResult<()>;
}
