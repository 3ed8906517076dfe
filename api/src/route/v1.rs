use axum::Router;
use registry::AppRegistry;

use super::event::build_event_routers;
use super::health::build_health_check_routers;
use super::user::build_user_routers;

pub fn routes() -> Router<AppRegistry> {
    let router = Router::new()
        .merge(build_health_check_routers())
        .merge(build_event_routers())
        .merge(build_user_routers());

    Router::new().nest("/api/v1", router)
}
