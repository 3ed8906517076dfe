use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use garde::Validate;
use kernel::access::AccessPolicy;
use kernel::model::event::command::{DeleteEvent, SetEventPublished};
use kernel::model::id::EventId;
use registry::AppRegistry;
use shared::error::{AppError, AppResult};

use crate::extractor::AuthorizedUser;
use crate::model::event::{
    CreateEventRequest, CreateEventRequestWithUser, EventDetailsResponse, EventListQuery,
    EventResponse, EventsResponse, PublishEventRequest,
};

pub async fn register_event(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
    Json(req): Json<CreateEventRequest>,
) -> AppResult<(StatusCode, Json<EventResponse>)> {
    req.validate(&())?;
    if !AccessPolicy::can_create_event(&user.user) {
        return Err(AppError::ForbiddenOperation);
    }

    let create_event = CreateEventRequestWithUser::new(req, user.id());
    registry
        .event_repository()
        .create(create_event.into())
        .await
        .map(EventResponse::from)
        .map(|body| (StatusCode::CREATED, Json(body)))
}

pub async fn show_event_list(
    Query(query): Query<EventListQuery>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<EventsResponse>> {
    registry
        .event_repository()
        .find_all(query.only_published)
        .await
        .map(EventsResponse::from)
        .map(Json)
}

pub async fn show_event(
    Path(event_id): Path<EventId>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<EventDetailsResponse>> {
    registry
        .event_repository()
        .find_by_id(event_id)
        .await
        .and_then(|event| match event {
            Some(event) => Ok(Json(event.into())),
            None => Err(AppError::EntityNotFound(format!(
                "event ({event_id}) was not found"
            ))),
        })
}

pub async fn publish_event(
    user: AuthorizedUser,
    Path(event_id): Path<EventId>,
    State(registry): State<AppRegistry>,
    Json(req): Json<PublishEventRequest>,
) -> AppResult<Json<EventResponse>> {
    if !AccessPolicy::can_publish_event(&user.user) {
        return Err(AppError::ForbiddenOperation);
    }

    registry
        .event_repository()
        .set_published(SetEventPublished::new(event_id, req.is_published))
        .await
        .map(EventResponse::from)
        .map(Json)
}

pub async fn delete_event(
    user: AuthorizedUser,
    Path(event_id): Path<EventId>,
    State(registry): State<AppRegistry>,
) -> AppResult<StatusCode> {
    if !AccessPolicy::can_delete_event(&user.user) {
        return Err(AppError::ForbiddenOperation);
    }

    registry
        .event_repository()
        .delete(DeleteEvent::new(event_id))
        .await
        .map(|_| StatusCode::NO_CONTENT)
}
