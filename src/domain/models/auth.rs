use serde::{Deserialize, Serialize};

pub const TOKEN_AUDIENCE: &str = "event-frontend";

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub iss: String,
    pub sub: String,
    pub aud: String,
    pub exp: usize,
    pub iat: usize,
    pub jti: String,

    #[serde(rename = "https://events.local/claims/role")]
    pub role: String,
}

#[derive(Serialize)]
pub struct TokenResponse {
    pub token: String,
}
