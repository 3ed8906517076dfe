use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use garde::Validate;
use kernel::model::id::{AttendeeId, EventId};
use registry::AppRegistry;
use shared::error::AppResult;

use crate::extractor::MaybeAuthorizedUser;
use crate::model::attendee::{
    AttendeeResponse, RegisterAttendeeRequest, RegisterAttendeeRequestWithIds,
};

pub async fn register_attendee(
    MaybeAuthorizedUser(user): MaybeAuthorizedUser,
    Path(event_id): Path<EventId>,
    State(registry): State<AppRegistry>,
    Json(req): Json<RegisterAttendeeRequest>,
) -> AppResult<(StatusCode, Json<AttendeeResponse>)> {
    req.validate(&())?;

    let register = RegisterAttendeeRequestWithIds::new(event_id, user.map(|u| u.id()), req);
    registry
        .attendee_repository()
        .register(register.into())
        .await
        .map(AttendeeResponse::from)
        .map(|body| (StatusCode::CREATED, Json(body)))
}

pub async fn delete_attendee(
    Path(attendee_id): Path<AttendeeId>,
    State(registry): State<AppRegistry>,
) -> AppResult<StatusCode> {
    registry
        .attendee_repository()
        .delete_by_id(attendee_id)
        .await
        .map(|_| StatusCode::NO_CONTENT)
}
