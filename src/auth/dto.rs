use super::*;
use crate::core::Unique;
use serde::Deserialize;
use serde::Serialize;

/// Body of POST /users/login.
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Body of POST /users/google-login.
#[derive(Debug, Serialize, Deserialize)]
pub struct GoogleLoginRequest {
    pub credential: Option<String>,
}

/// Body of POST /users/refresh-token and POST /users/logout.
#[derive(Debug, Serialize, Deserialize)]
pub struct RefreshRequest {
    #[serde(rename = "refreshToken")]
    pub refresh_token: Option<String>,
}

/// An issued pair on the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrantResponse {
    #[serde(rename = "accessToken")]
    pub access_token: String,
    #[serde(rename = "refreshToken")]
    pub refresh_token: String,
    #[serde(rename = "_id")]
    pub id: String,
}

impl From<Grant> for GrantResponse {
    fn from(grant: Grant) -> Self {
        Self {
            access_token: grant.access,
            refresh_token: grant.refresh,
            id: grant.user.to_string(),
        }
    }
}

/// Public view of an account. The hashword never crosses the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    #[serde(rename = "_id")]
    pub id: String,
    pub username: String,
    pub avatar: String,
    pub email: String,
}

impl From<&Account> for Profile {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id().to_string(),
            username: account.username().to_string(),
            avatar: account.avatar().to_string(),
            email: account.email().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Arbitrary;
    use crate::core::ID;

    #[test]
    fn grant_serializes_with_wire_names() {
        let grant = Grant {
            user: ID::default(),
            access: String::from("a"),
            refresh: String::from("r"),
        };
        let json = serde_json::to_value(GrantResponse::from(grant)).unwrap();
        assert!(json.get("accessToken").is_some());
        assert!(json.get("refreshToken").is_some());
        assert!(json.get("_id").is_some());
    }

    #[test]
    fn profile_omits_hashword() {
        let json = serde_json::to_value(Profile::from(&Account::random())).unwrap();
        assert!(json.get("hashword").is_none());
        assert!(json.get("username").is_some());
    }
}
