use async_trait::async_trait;
use chrono::Utc;
use derive_new::new;
use kernel::model::attendee::command::RegisterAttendee;
use kernel::model::attendee::Attendee;
use kernel::model::id::{AttendeeId, EventId, UserId};
use kernel::repository::attendee::AttendeeRepository;
use shared::error::{AppError, AppResult};

use crate::database::model::attendee::AttendeeRow;
use crate::database::ConnectionPool;

#[derive(new)]
pub struct AttendeeRepositoryImpl {
    db: ConnectionPool,
}

#[async_trait]
impl AttendeeRepository for AttendeeRepositoryImpl {
    async fn register(&self, event: RegisterAttendee) -> AppResult<Attendee> {
        let mut tx = self.db.begin().await?;

        // The admission checks below must observe a consistent snapshot.
        // Locking the event row serializes concurrent registrations (and
        // the cascade delete) per event, so the duplicate and capacity
        // reads stay valid until commit. The partial unique index on
        // (event_id, user_id) backs the duplicate check at the schema
        // level.
        {
            //
            // ① Existence check, taking the per-event lock.
            //
            let capacity: Option<i32> =
                sqlx::query_scalar("SELECT capacity FROM events WHERE id = $1 FOR UPDATE")
                    .bind(event.event_id)
                    .fetch_optional(&mut *tx)
                    .await
                    .map_err(AppError::SpecificOperationError)?;

            let Some(capacity) = capacity else {
                return Err(AppError::EntityNotFound(format!(
                    "event ({}) was not found",
                    event.event_id
                )));
            };

            //
            // ② Duplicate check for authenticated registrants.
            //
            if let Some(user_id) = event.user_id {
                let registered: Option<AttendeeId> = sqlx::query_scalar(
                    r#"
                        SELECT id
                        FROM attendees
                        WHERE event_id = $1 AND user_id = $2
                        LIMIT 1
                    "#,
                )
                .bind(event.event_id)
                .bind(user_id)
                .fetch_optional(&mut *tx)
                .await
                .map_err(AppError::SpecificOperationError)?;

                if registered.is_some() {
                    return Err(AppError::DuplicateRegistration(format!(
                        "user ({}) is already registered for event ({})",
                        user_id, event.event_id
                    )));
                }
            }

            //
            // ③ Capacity check against the committed attendee count.
            //
            let count: i64 =
                sqlx::query_scalar("SELECT COUNT(*) FROM attendees WHERE event_id = $1")
                    .bind(event.event_id)
                    .fetch_one(&mut *tx)
                    .await
                    .map_err(AppError::SpecificOperationError)?;

            if count >= i64::from(capacity) {
                return Err(AppError::CapacityExceeded(format!(
                    "event ({}) is at full capacity",
                    event.event_id
                )));
            }
        }

        // All checks passed; commit the new attendee record.
        let attendee = Attendee {
            id: AttendeeId::new(),
            event_id: event.event_id,
            name: event.name,
            email: event.email,
            user_id: event.user_id,
            registered_at: Utc::now(),
        };

        let res = sqlx::query(
            r#"
                INSERT INTO attendees
                (id, event_id, name, email, user_id, registered_at)
                VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(attendee.id)
        .bind(attendee.event_id)
        .bind(&attendee.name)
        .bind(&attendee.email)
        .bind(attendee.user_id)
        .bind(attendee.registered_at)
        .execute(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::NoRowsAffectedError(
                "No attendee record has been created".into(),
            ));
        }

        tx.commit().await.map_err(AppError::TransactionError)?;

        Ok(attendee)
    }

    async fn delete_by_id(&self, attendee_id: AttendeeId) -> AppResult<()> {
        // Deliberately no rows_affected guard: deleting an attendee that
        // is already gone is a success.
        sqlx::query("DELETE FROM attendees WHERE id = $1")
            .bind(attendee_id)
            .execute(self.db.inner_ref())
            .await
            .map(|_| ())
            .map_err(AppError::SpecificOperationError)
    }

    async fn find_by_event_and_user(
        &self,
        event_id: EventId,
        user_id: UserId,
    ) -> AppResult<Option<Attendee>> {
        sqlx::query_as::<_, AttendeeRow>(
            r#"
                SELECT id, event_id, name, email, user_id, registered_at
                FROM attendees
                WHERE event_id = $1 AND user_id = $2
            "#,
        )
        .bind(event_id)
        .bind(user_id)
        .fetch_optional(self.db.inner_ref())
        .await
        .map(|row| row.map(Attendee::from))
        .map_err(AppError::SpecificOperationError)
    }

    async fn count_for_event(&self, event_id: EventId) -> AppResult<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM attendees WHERE event_id = $1")
            .bind(event_id)
            .fetch_one(self.db.inner_ref())
            .await
            .map_err(AppError::SpecificOperationError)
    }
}
