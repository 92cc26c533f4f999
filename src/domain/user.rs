use serde::{Deserialize, Serialize};

/// Stored user record. `password` holds the argon2 PHC string, never plaintext.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    pub password: String,
}

/// A user without the password hash, for responses that must not carry it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserProfile {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateUser {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// `token` is only present when bearer tokens are enabled.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub name: String,
    pub email: String,
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_drops_password_hash() {
        let user = User {
            id: "user-1".to_string(),
            name: "A".to_string(),
            email: "a@x.com".to_string(),
            password: "$argon2id$v=19$secret".to_string(),
        };

        let json = serde_json::to_value(UserProfile::from(user)).unwrap();
        assert_eq!(json["_id"], "user-1");
        assert_eq!(json["name"], "A");
        assert!(json.get("password").is_none());
    }

    #[test]
    fn test_login_response_omits_absent_token() {
        let response = LoginResponse {
            name: "A".to_string(),
            email: "a@x.com".to_string(),
            id: "user-1".to_string(),
            token: None,
        };
        let json = serde_json::to_value(response).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "name": "A", "email": "a@x.com", "id": "user-1" })
        );
    }
}
