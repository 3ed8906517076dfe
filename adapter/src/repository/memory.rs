//! In-memory implementations of the kernel repositories, used as
//! substitutable stores in tests. They honor the same contracts as the
//! sqlx implementations: the store mutex is held across every
//! check-then-write sequence, which serializes registrations the way the
//! event-row lock does in Postgres.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use kernel::model::attendee::command::RegisterAttendee;
use kernel::model::attendee::Attendee;
use kernel::model::auth::AccessToken;
use kernel::model::event::command::{CreateEvent, DeleteEvent, SetEventPublished};
use kernel::model::event::{Event, EventWithAttendeeCount, EventWithAttendees};
use kernel::model::id::{AttendeeId, EventId, UserId};
use kernel::model::user::User;
use kernel::repository::attendee::AttendeeRepository;
use kernel::repository::auth::AuthRepository;
use kernel::repository::event::EventRepository;
use kernel::repository::health::HealthCheckRepository;
use kernel::repository::user::UserRepository;
use shared::error::{AppError, AppResult};
use tokio::sync::Mutex;

#[derive(Default)]
struct StoreState {
    events: HashMap<EventId, Event>,
    attendees: HashMap<AttendeeId, Attendee>,
}

/// Shared backing store; clone it into each repository wrapper.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    state: Arc<Mutex<StoreState>>,
    users: Arc<Mutex<HashMap<UserId, User>>>,
    tokens: Arc<Mutex<HashMap<String, UserId>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_user(&self, user: User) {
        self.users.lock().await.insert(user.id, user);
    }

    pub async fn insert_token(&self, token: &str, user_id: UserId) {
        self.tokens.lock().await.insert(token.to_string(), user_id);
    }
}

pub struct InMemoryEventRepository(pub InMemoryStore);

#[async_trait]
impl EventRepository for InMemoryEventRepository {
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
        self.0
            .state
            .lock()
            .await
            .events
            .insert(event.id, event.clone());
        Ok(event)
    }

    async fn find_all(&self, only_published: bool) -> AppResult<Vec<EventWithAttendeeCount>> {
        let state = self.0.state.lock().await;
        let mut items: Vec<EventWithAttendeeCount> = state
            .events
            .values()
            .filter(|event| !only_published || event.is_published)
            .map(|event| EventWithAttendeeCount {
                event: event.clone(),
                attendee_count: state
                    .attendees
                    .values()
                    .filter(|a| a.event_id == event.id)
                    .count() as i64,
            })
            .collect();
        items.sort_by_key(|item| item.event.scheduled_at);
        Ok(items)
    }

    async fn find_by_id(&self, event_id: EventId) -> AppResult<Option<EventWithAttendees>> {
        let state = self.0.state.lock().await;
        let Some(event) = state.events.get(&event_id) else {
            return Ok(None);
        };
        let mut attendees: Vec<Attendee> = state
            .attendees
            .values()
            .filter(|a| a.event_id == event_id)
            .cloned()
            .collect();
        attendees.sort_by_key(|a| a.registered_at);
        Ok(Some(EventWithAttendees {
            event: event.clone(),
            attendees,
        }))
    }

    async fn set_published(&self, event: SetEventPublished) -> AppResult<Event> {
        let mut state = self.0.state.lock().await;
        let Some(stored) = state.events.get_mut(&event.event_id) else {
            return Err(AppError::EntityNotFound(format!(
                "event ({}) was not found",
                event.event_id
            )));
        };
        stored.is_published = event.is_published;
        Ok(stored.clone())
    }

    async fn delete(&self, event: DeleteEvent) -> AppResult<()> {
        let mut state = self.0.state.lock().await;
        if state.events.remove(&event.event_id).is_none() {
            return Err(AppError::EntityNotFound(format!(
                "event ({}) was not found",
                event.event_id
            )));
        }
        state.attendees.retain(|_, a| a.event_id != event.event_id);
        Ok(())
    }
}

pub struct InMemoryAttendeeRepository(pub InMemoryStore);

#[async_trait]
impl AttendeeRepository for InMemoryAttendeeRepository {
    async fn register(&self, event: RegisterAttendee) -> AppResult<Attendee> {
        // One lock across all checks and the insert: the admission
        // decision is a single critical section.
        let mut state = self.0.state.lock().await;

        let Some(stored) = state.events.get(&event.event_id) else {
            return Err(AppError::EntityNotFound(format!(
                "event ({}) was not found",
                event.event_id
            )));
        };
        let capacity = stored.capacity;

        if let Some(user_id) = event.user_id {
            let registered = state
                .attendees
                .values()
                .any(|a| a.event_id == event.event_id && a.user_id == Some(user_id));
            if registered {
                return Err(AppError::DuplicateRegistration(format!(
                    "user ({}) is already registered for event ({})",
                    user_id, event.event_id
                )));
            }
        }

        let count = state
            .attendees
            .values()
            .filter(|a| a.event_id == event.event_id)
            .count() as i64;
        if count >= i64::from(capacity) {
            return Err(AppError::CapacityExceeded(format!(
                "event ({}) is at full capacity",
                event.event_id
            )));
        }

        let attendee = Attendee {
            id: AttendeeId::new(),
            event_id: event.event_id,
            name: event.name,
            email: event.email,
            user_id: event.user_id,
            registered_at: Utc::now(),
        };
        state.attendees.insert(attendee.id, attendee.clone());
        Ok(attendee)
    }

    async fn delete_by_id(&self, attendee_id: AttendeeId) -> AppResult<()> {
        self.0.state.lock().await.attendees.remove(&attendee_id);
        Ok(())
    }

    async fn find_by_event_and_user(
        &self,
        event_id: EventId,
        user_id: UserId,
    ) -> AppResult<Option<Attendee>> {
        let state = self.0.state.lock().await;
        Ok(state
            .attendees
            .values()
            .find(|a| a.event_id == event_id && a.user_id == Some(user_id))
            .cloned())
    }

    async fn count_for_event(&self, event_id: EventId) -> AppResult<i64> {
        let state = self.0.state.lock().await;
        Ok(state
            .attendees
            .values()
            .filter(|a| a.event_id == event_id)
            .count() as i64)
    }
}

pub struct InMemoryUserRepository(pub InMemoryStore);

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_current_user(&self, current_user_id: UserId) -> AppResult<Option<User>> {
        Ok(self.0.users.lock().await.get(&current_user_id).cloned())
    }
}

pub struct InMemoryAuthRepository(pub InMemoryStore);

#[async_trait]
impl AuthRepository for InMemoryAuthRepository {
    async fn fetch_user_id_from_token(
        &self,
        access_token: &AccessToken,
    ) -> AppResult<Option<UserId>> {
        Ok(self.0.tokens.lock().await.get(&access_token.0).copied())
    }
}

pub struct InMemoryHealthCheckRepository;

#[async_trait]
impl HealthCheckRepository for InMemoryHealthCheckRepository {
    async fn check_db(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn repositories(store: &InMemoryStore) -> (InMemoryEventRepository, InMemoryAttendeeRepository)
    {
        (
            InMemoryEventRepository(store.clone()),
            InMemoryAttendeeRepository(store.clone()),
        )
    }

    fn create_event_command(capacity: i32) -> CreateEvent {
        CreateEvent::new(
            "Tech Conference".into(),
            "Annual technology summit".into(),
            Utc.with_ymd_and_hms(2030, 9, 15, 9, 0, 0).unwrap(),
            "Convention Center".into(),
            capacity,
            None,
        )
    }

    fn registration(event_id: EventId, name: &str, user_id: Option<UserId>) -> RegisterAttendee {
        RegisterAttendee::new(
            event_id,
            name.into(),
            format!("{}@example.com", name.to_lowercase()),
            user_id,
        )
    }

    #[tokio::test]
    async fn registration_stops_at_capacity() {
        let store = InMemoryStore::new();
        let (events, attendees) = repositories(&store);
        let event = events.create(create_event_command(2)).await.unwrap();

        attendees
            .register(registration(event.id, "Alice", None))
            .await
            .unwrap();
        attendees
            .register(registration(event.id, "Bob", None))
            .await
            .unwrap();

        let err = attendees
            .register(registration(event.id, "Carol", None))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::CapacityExceeded(_)));
        assert_eq!(attendees.count_for_event(event.id).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn duplicate_identity_is_rejected() {
        let store = InMemoryStore::new();
        let (events, attendees) = repositories(&store);
        let event = events.create(create_event_command(10)).await.unwrap();
        let user_id = UserId::new();

        attendees
            .register(registration(event.id, "Alice", Some(user_id)))
            .await
            .unwrap();
        let err = attendees
            .register(registration(event.id, "Alice", Some(user_id)))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::DuplicateRegistration(_)));
        assert_eq!(attendees.count_for_event(event.id).await.unwrap(), 1);
        assert!(attendees
            .find_by_event_and_user(event.id, user_id)
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn registration_against_missing_event_fails() {
        let store = InMemoryStore::new();
        let (_, attendees) = repositories(&store);

        let err = attendees
            .register(registration(EventId::new(), "Alice", None))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::EntityNotFound(_)));
    }

    #[tokio::test]
    async fn freed_slot_can_be_taken_again() {
        let store = InMemoryStore::new();
        let (events, attendees) = repositories(&store);
        let event = events.create(create_event_command(1)).await.unwrap();

        let first = attendees
            .register(registration(event.id, "Alice", Some(UserId::new())))
            .await
            .unwrap();
        let err = attendees
            .register(registration(event.id, "Bob", Some(UserId::new())))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::CapacityExceeded(_)));

        attendees.delete_by_id(first.id).await.unwrap();
        attendees
            .register(registration(event.id, "Bob", Some(UserId::new())))
            .await
            .unwrap();
        assert_eq!(attendees.count_for_event(event.id).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn attendee_delete_is_idempotent() {
        let store = InMemoryStore::new();
        let (_, attendees) = repositories(&store);

        attendees.delete_by_id(AttendeeId::new()).await.unwrap();
    }

    #[tokio::test]
    async fn deleting_an_event_removes_its_attendees() {
        let store = InMemoryStore::new();
        let (events, attendees) = repositories(&store);
        let event = events.create(create_event_command(5)).await.unwrap();

        attendees
            .register(registration(event.id, "Alice", None))
            .await
            .unwrap();
        attendees
            .register(registration(event.id, "Bob", None))
            .await
            .unwrap();

        events.delete(DeleteEvent::new(event.id)).await.unwrap();

        assert!(events.find_by_id(event.id).await.unwrap().is_none());
        assert_eq!(attendees.count_for_event(event.id).await.unwrap(), 0);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn concurrent_registrations_never_overshoot_capacity() {
        let store = InMemoryStore::new();
        let (events, attendees) = repositories(&store);
        let event = events.create(create_event_command(3)).await.unwrap();
        let attendees = Arc::new(attendees);

        let mut handles = Vec::new();
        for i in 0..16 {
            let attendees = Arc::clone(&attendees);
            let event_id = event.id;
            handles.push(tokio::spawn(async move {
                attendees
                    .register(registration(event_id, &format!("Guest{i}"), None))
                    .await
            }));
        }

        let mut admitted = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                admitted += 1;
            }
        }

        assert_eq!(admitted, 3);
        assert_eq!(attendees.count_for_event(event.id).await.unwrap(), 3);
    }
}
