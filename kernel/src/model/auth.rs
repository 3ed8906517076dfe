/// Opaque bearer token issued by the external auth service.
#[derive(Clone)]
pub struct AccessToken(pub String);
