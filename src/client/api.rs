use crate::auth::Account;
use crate::auth::GrantResponse;
use crate::auth::Profile;
use crate::core::ACCESS_COOKIE;
use crate::core::ID;

const TIMEOUT: std::time::Duration = std::time::Duration::from_secs(30);

/// How a user signs in. The variants map onto distinct endpoints, so
/// every call site states which path it takes.
#[derive(Debug, Clone)]
pub enum Login {
    Email { email: String, password: String },
    Google { credential: String },
}

/// One live session as the client holds it.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Credentials {
    pub user: uuid::Uuid,
    pub access: String,
    pub refresh: String,
}

impl Credentials {
    pub fn user(&self) -> ID<Account> {
        ID::from(self.user)
    }
}

impl TryFrom<GrantResponse> for Credentials {
    type Error = ApiError;
    fn try_from(grant: GrantResponse) -> Result<Self, Self::Error> {
        Ok(Self {
            user: grant
                .id
                .parse()
                .map_err(|_| ApiError::Transport(String::from("malformed subject id")))?,
            access: grant.access_token,
            refresh: grant.refresh_token,
        })
    }
}

/// Client-side failure taxonomy. A denial is the server refusing the
/// request; transport is everything between here and there.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ApiError {
    #[error("request failed in transit: {0}")]
    Transport(String),
    #[error("server answered {0}")]
    Denied(reqwest::StatusCode),
}

impl ApiError {
    /// True when the server heard us and said no. Transport trouble is
    /// not a denial: the session may well still be valid.
    pub fn denial(&self) -> bool {
        match self {
            Self::Denied(status) => status.is_client_error(),
            Self::Transport(_) => false,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        Self::Transport(e.to_string())
    }
}

/// The credential endpoints as the session manager needs them. Object
/// safe so the manager can run against a scripted double.
#[async_trait::async_trait]
pub trait Gateway: Send + Sync {
    async fn login(&self, login: &Login) -> Result<Credentials, ApiError>;
    async fn rotate(&self, refresh: &str) -> Result<Credentials, ApiError>;
    async fn logout(&self, refresh: &str) -> Result<(), ApiError>;
}

/// Full post as the client renders it.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct PostView {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "userID")]
    pub user: String,
    pub content: String,
    pub media: Option<String>,
}

#[derive(Debug, serde::Deserialize)]
struct Listed {
    #[serde(rename = "_id")]
    id: String,
}

#[derive(Debug, serde::Deserialize)]
struct PostPage {
    posts: Vec<Listed>,
}

#[derive(Debug, serde::Deserialize)]
struct Flag {
    liked: bool,
}

#[derive(Debug, serde::Deserialize)]
struct Tally {
    count: i64,
}

/// reqwest-backed `Gateway` plus the rest of the REST surface for the
/// interactive client. Clone shares the connection pool.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base: String,
}

impl ApiClient {
    pub fn new(base: impl Into<String>) -> Result<Self, ApiError> {
        Ok(Self {
            http: reqwest::Client::builder().timeout(TIMEOUT).build()?,
            base: base.into(),
        })
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    fn cookie(access: &str) -> String {
        format!("{}={}", ACCESS_COOKIE, access)
    }

    async fn granted(response: reqwest::Response) -> Result<Credentials, ApiError> {
        match response.status().is_success() {
            true => Credentials::try_from(response.json::<GrantResponse>().await?),
            false => Err(ApiError::Denied(response.status())),
        }
    }

    async fn read<T>(response: reqwest::Response) -> Result<T, ApiError>
    where
        T: serde::de::DeserializeOwned,
    {
        match response.status().is_success() {
            true => Ok(response.json::<T>().await?),
            false => Err(ApiError::Denied(response.status())),
        }
    }

    pub async fn profile(&self, user: ID<Account>) -> Result<Profile, ApiError> {
        let url = format!("{}/users/{}", self.base, user);
        Self::read(self.http.get(&url).send().await?).await
    }

    /// Page of post ids, newest first, keyset from `last`. The listing
    /// carries ids only; `post` hydrates each.
    pub async fn feed(&self, last: Option<&str>, limit: i64) -> Result<Vec<String>, ApiError> {
        let url = format!("{}/posts", self.base);
        let mut request = self.http.get(&url).query(&[("limit", limit)]);
        if let Some(last) = last {
            request = request.query(&[("lastID", last)]);
        }
        let page: PostPage = Self::read(request.send().await?).await?;
        Ok(page.posts.into_iter().map(|p| p.id).collect())
    }

    pub async fn post(&self, id: &str) -> Result<PostView, ApiError> {
        let url = format!("{}/posts/{}", self.base, id);
        Self::read(self.http.get(&url).send().await?).await
    }

    pub async fn publish(&self, access: &str, content: &str) -> Result<PostView, ApiError> {
        let url = format!("{}/posts", self.base);
        let form = reqwest::multipart::Form::new().text("content", content.to_string());
        let response = self
            .http
            .post(&url)
            .header(reqwest::header::COOKIE, Self::cookie(access))
            .multipart(form)
            .send()
            .await?;
        Self::read(response).await
    }

    pub async fn liked(&self, access: &str, post: &str) -> Result<bool, ApiError> {
        let url = format!("{}/likes/{}", self.base, post);
        let response = self
            .http
            .get(&url)
            .header(reqwest::header::COOKIE, Self::cookie(access))
            .send()
            .await?;
        Self::read::<Flag>(response).await.map(|f| f.liked)
    }

    pub async fn like_count(&self, post: &str) -> Result<i64, ApiError> {
        let url = format!("{}/likes/count/{}", self.base, post);
        Self::read::<Tally>(self.http.get(&url).send().await?)
            .await
            .map(|t| t.count)
    }

    pub async fn like(&self, access: &str, post: &str) -> Result<(), ApiError> {
        let url = format!("{}/likes/{}", self.base, post);
        let response = self
            .http
            .post(&url)
            .header(reqwest::header::COOKIE, Self::cookie(access))
            .send()
            .await?;
        match response.status().is_success() {
            true => Ok(()),
            false => Err(ApiError::Denied(response.status())),
        }
    }

    pub async fn unlike(&self, access: &str, post: &str) -> Result<(), ApiError> {
        let url = format!("{}/likes/{}", self.base, post);
        let response = self
            .http
            .delete(&url)
            .header(reqwest::header::COOKIE, Self::cookie(access))
            .send()
            .await?;
        match response.status().is_success() {
            true => Ok(()),
            false => Err(ApiError::Denied(response.status())),
        }
    }

    /// Ask the server to draft a post in the caller's voice.
    pub async fn draft(&self, access: &str) -> Result<String, ApiError> {
        let url = format!("{}/muse", self.base);
        let response = self
            .http
            .get(&url)
            .header(reqwest::header::COOKIE, Self::cookie(access))
            .send()
            .await?;
        match response.status().is_success() {
            true => Ok(response.text().await?),
            false => Err(ApiError::Denied(response.status())),
        }
    }
}

#[async_trait::async_trait]
impl Gateway for ApiClient {
    async fn login(&self, login: &Login) -> Result<Credentials, ApiError> {
        let response = match login {
            Login::Email { email, password } => {
                let url = format!("{}/users/login", self.base);
                self.http
                    .post(&url)
                    .json(&serde_json::json!({"email": email, "password": password}))
                    .send()
                    .await?
            }
            Login::Google { credential } => {
                let url = format!("{}/users/google-login", self.base);
                self.http
                    .post(&url)
                    .json(&serde_json::json!({"credential": credential}))
                    .send()
                    .await?
            }
        };
        Self::granted(response).await
    }

    async fn rotate(&self, refresh: &str) -> Result<Credentials, ApiError> {
        let url = format!("{}/users/refresh-token", self.base);
        let response = self
            .http
            .post(&url)
            .json(&serde_json::json!({"refreshToken": refresh}))
            .send()
            .await?;
        Self::granted(response).await
    }

    async fn logout(&self, refresh: &str) -> Result<(), ApiError> {
        let url = format!("{}/users/logout", self.base);
        let response = self
            .http
            .post(&url)
            .json(&serde_json::json!({"refreshToken": refresh}))
            .send()
            .await?;
        match response.status().is_success() {
            true => Ok(()),
            false => Err(ApiError::Denied(response.status())),
        }
    }
}
