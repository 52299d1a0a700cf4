use super::*;

const TOKENINFO: &str = "https://oauth2.googleapis.com/tokeninfo";

/// Identity asserted by a verified Google ID token.
#[derive(Debug, serde::Deserialize)]
pub struct GoogleIdentity {
    pub aud: String,
    pub email: String,
    pub name: String,
    pub picture: Option<String>,
}

/// Why a provider sign-in did not produce an identity.
#[derive(Debug, thiserror::Error)]
pub enum GoogleRefusal {
    /// Provider refused the credential.
    #[error("credential rejected by provider")]
    Rejected,
    /// Credential is genuine but was issued to some other application.
    #[error("credential issued for a foreign audience")]
    ForeignAudience,
    /// Provider could not be reached or answered nonsense.
    #[error("provider unreachable: {0}")]
    Unreachable(#[from] reqwest::Error),
}

/// Verifier for Google sign-in credentials.
pub struct Google {
    http: reqwest::Client,
    audience: String,
}

impl Google {
    /// Audience from GOOGLE_CLIENT_ID.
    pub fn from_env() -> Self {
        Self {
            http: reqwest::Client::new(),
            audience: std::env::var("GOOGLE_CLIENT_ID").unwrap_or_else(|_| String::default()),
        }
    }

    /// Ask the provider to validate the credential, then check it was
    /// minted for us. Signature verification stays on the provider side.
    pub async fn verify(&self, credential: &str) -> Result<GoogleIdentity, GoogleRefusal> {
        let response = self
            .http
            .get(TOKENINFO)
            .query(&[("id_token", credential)])
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(GoogleRefusal::Rejected);
        }
        let identity = response.json::<GoogleIdentity>().await?;
        match identity.aud == self.audience {
            true => Ok(identity),
            false => Err(GoogleRefusal::ForeignAudience),
        }
    }

    /// Pull the profile picture down into the avatar directory. Best
    /// effort: an unreachable picture leaves the caller on the default.
    pub async fn fetch_avatar(&self, picture: &str) -> Option<String> {
        let bytes = self.http.get(picture).send().await.ok()?.bytes().await.ok()?;
        crate::media::persist_bytes(&bytes, crate::media::AVATARS, ".jpg").ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokeninfo_payload_deserializes() {
        let raw = r#"{
            "iss": "https://accounts.google.com",
            "azp": "407408718192.apps.googleusercontent.com",
            "aud": "407408718192.apps.googleusercontent.com",
            "sub": "110169484474386276334",
            "email": "resident@example.com",
            "email_verified": "true",
            "name": "Resident Example",
            "picture": "https://lh3.googleusercontent.com/a/photo.jpg",
            "iat": "1650000000",
            "exp": "1650003600"
        }"#;
        let identity: GoogleIdentity = serde_json::from_str(raw).unwrap();
        assert_eq!(identity.aud, "407408718192.apps.googleusercontent.com");
        assert_eq!(identity.email, "resident@example.com");
        assert!(identity.picture.is_some());
    }

    #[test]
    fn picture_is_optional() {
        let raw = r#"{"aud": "a", "email": "e@example.com", "name": "n"}"#;
        let identity: GoogleIdentity = serde_json::from_str(raw).unwrap();
        assert!(identity.picture.is_none());
    }
}
