use axum::routing::{delete, get, patch, post};
use axum::Router;
use registry::AppRegistry;

use crate::handler::attendee::{delete_attendee, register_attendee};
use crate::handler::event::{
    delete_event, publish_event, register_event, show_event, show_event_list,
};

pub fn build_event_routers() -> Router<AppRegistry> {
    let event_routers = Router::new()
        .route("/", get(show_event_list).post(register_event))
        .route("/:event_id", get(show_event).delete(delete_event))
        .route("/:event_id/publish", patch(publish_event))
        .route("/:event_id/attendees", post(register_attendee));

    let attendee_routers = Router::new().route("/:attendee_id", delete(delete_attendee));

    Router::new()
        .nest("/events", event_routers)
        .nest("/attendees", attendee_routers)
}
