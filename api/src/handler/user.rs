use axum::Json;

use crate::extractor::AuthorizedUser;
use crate::model::user::UserResponse;

pub async fn get_current_user(user: AuthorizedUser) -> Json<UserResponse> {
    Json(UserResponse::from(user.user))
}
