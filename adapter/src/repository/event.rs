use async_trait::async_trait;
use chrono::Utc;
use derive_new::new;
use kernel::model::attendee::Attendee;
use kernel::model::event::command::{CreateEvent, DeleteEvent, SetEventPublished};
use kernel::model::event::{Event, EventWithAttendeeCount, EventWithAttendees};
use kernel::model::id::EventId;
use kernel::repository::event::EventRepository;
use shared::error::{AppError, AppResult};

use crate::database::model::attendee::AttendeeRow;
use crate::database::model::event::{EventRow, EventWithCountRow};
use crate::database::ConnectionPool;

#[derive(new)]
pub struct EventRepositoryImpl {
    db: ConnectionPool,
}

#[async_trait]
impl EventRepository for EventRepositoryImpl {
    async fn create(&self, event: CreateEvent) -> AppResult<Event> {
        let event = Event {
            id: EventId::new(),
            title: event.title,
            description: event.description,
            scheduled_at: event.scheduled_at,
            location: event.location,
            capacity: event.capacity,
            is_published: false,
            created_by: event.created_by,
            created_at: Utc::now(),
        };

        let res = sqlx::query(
            r#"
                INSERT INTO events
                (id, title, description, scheduled_at, location, capacity,
                 is_published, created_by, created_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(event.id)
        .bind(&event.title)
        .bind(&event.description)
        .bind(event.scheduled_at)
        .bind(&event.location)
        .bind(event.capacity)
        .bind(event.is_published)
        .bind(event.created_by)
        .bind(event.created_at)
        .execute(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::NoRowsAffectedError(
                "No event record has been created".into(),
            ));
        }

        Ok(event)
    }

    async fn find_all(&self, only_published: bool) -> AppResult<Vec<EventWithAttendeeCount>> {
        // The attendee count is aggregated on every read so it can never
        // drift from the attendee records.
        sqlx::query_as::<_, EventWithCountRow>(
            r#"
                SELECT
                e.id,
                e.title,
                e.description,
                e.scheduled_at,
                e.location,
                e.capacity,
                e.is_published,
                e.created_by,
                e.created_at,
                COUNT(a.id) AS attendee_count
                FROM events AS e
                LEFT JOIN attendees AS a ON a.event_id = e.id
                WHERE $1 = FALSE OR e.is_published = TRUE
                GROUP BY e.id
                ORDER BY e.scheduled_at ASC
            "#,
        )
        .bind(only_published)
        .fetch_all(self.db.inner_ref())
        .await
        .map(|rows| rows.into_iter().map(EventWithAttendeeCount::from).collect())
        .map_err(AppError::SpecificOperationError)
    }

    async fn find_by_id(&self, event_id: EventId) -> AppResult<Option<EventWithAttendees>> {
        let event_row = sqlx::query_as::<_, EventRow>(
            r#"
                SELECT
                id, title, description, scheduled_at, location, capacity,
                is_published, created_by, created_at
                FROM events
                WHERE id = $1
            "#,
        )
        .bind(event_id)
        .fetch_optional(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        let Some(event_row) = event_row else {
            return Ok(None);
        };

        let attendees = sqlx::query_as::<_, AttendeeRow>(
            r#"
                SELECT id, event_id, name, email, user_id, registered_at
                FROM attendees
                WHERE event_id = $1
                ORDER BY registered_at ASC
            "#,
        )
        .bind(event_id)
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        Ok(Some(EventWithAttendees {
            event: event_row.into(),
            attendees: attendees.into_iter().map(Attendee::from).collect(),
        }))
    }

    async fn set_published(&self, event: SetEventPublished) -> AppResult<Event> {
        let row = sqlx::query_as::<_, EventRow>(
            r#"
                UPDATE events
                SET is_published = $2
                WHERE id = $1
                RETURNING id, title, description, scheduled_at, location,
                          capacity, is_published, created_by, created_at
            "#,
        )
        .bind(event.event_id)
        .bind(event.is_published)
        .fetch_optional(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        row.map(Event::from).ok_or_else(|| {
            AppError::EntityNotFound(format!("event ({}) was not found", event.event_id))
        })
    }

    async fn delete(&self, event: DeleteEvent) -> AppResult<()> {
        let mut tx = self.db.begin().await?;

        // Take the same per-event lock as registration so an attendee
        // cannot be inserted while the cascade is underway.
        let locked: Option<i32> =
            sqlx::query_scalar("SELECT capacity FROM events WHERE id = $1 FOR UPDATE")
                .bind(event.event_id)
                .fetch_optional(&mut *tx)
                .await
                .map_err(AppError::SpecificOperationError)?;

        if locked.is_none() {
            return Err(AppError::EntityNotFound(format!(
                "event ({}) was not found",
                event.event_id
            )));
        }

        sqlx::query("DELETE FROM attendees WHERE event_id = $1")
            .bind(event.event_id)
            .execute(&mut *tx)
            .await
            .map_err(AppError::SpecificOperationError)?;

        let res = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(event.event_id)
            .execute(&mut *tx)
            .await
            .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::NoRowsAffectedError(
                "No event record has been deleted".into(),
            ));
        }

        tx.commit().await.map_err(AppError::TransactionError)?;

        Ok(())
    }
}
