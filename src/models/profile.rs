use serde::{Deserialize, Serialize};

/// Profile row, keyed by the auth provider's user id.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Profile {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
pub struct UpdateProfileRequest {
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub phone: String,
}

#[derive(Serialize, Debug)]
pub struct ProfileResponse {
    pub id: String,
    pub email: String,
    pub full_name: String,
    pub phone: String,
}

impl ProfileResponse {
    /// A missing profile row renders as empty fields.
    pub fn new(user_id: &str, email: Option<&str>, profile: Option<Profile>) -> Self {
        let profile = profile.unwrap_or_default();
        Self {
            id: user_id.to_string(),
            email: email.unwrap_or_default().to_string(),
            full_name: profile.full_name.unwrap_or_default(),
            phone: profile.phone.unwrap_or_default(),
        }
    }
}
