//! Typed client for the marketplace REST API.
//!
//! All responses arrive in a `{"data": …}` envelope; error bodies
//! carry a `{"message": …}` that is surfaced verbatim. Endpoints that
//! require authentication take their bearer token from the storage
//! port; a required-but-missing token fails the call before any
//! request goes out.

pub mod types;

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;
use url::Url;

use crate::config::ClientConfig;
use crate::role::Role;
use crate::storage::{keys, KeyValueStorage};
use crate::ClientError;
use types::{
    AccountSummary, Category, Course, Enrollment, EnrollmentStats, LikeUpdate, Mentor,
    MentorPatch, NewMentor, Order, ProgressUpdate, Software, Website,
};

/// Errors from the REST collaborator.
#[derive(Debug, Error)]
pub enum ApiError {
    /// A bearer-authenticated endpoint was called without a stored
    /// session token. Raised before any request is issued.
    #[error("No session token in storage")]
    MissingToken,

    /// The server answered with a non-success status.
    #[error("{message}")]
    Status { status: u16, message: String },

    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    #[error(transparent)]
    Url(#[from] url::ParseError),

    #[error(transparent)]
    Storage(#[from] ClientError),
}

#[derive(Deserialize)]
struct Envelope<T> {
    data: T,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    storage: Arc<dyn KeyValueStorage>,
}

impl ApiClient {
    /// Builds a client against the configured base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(
        config: &ClientConfig,
        storage: Arc<dyn KeyValueStorage>,
    ) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.clone(),
            storage,
        })
    }

    /// Joins `path` onto the base URL, preserving any path prefix the
    /// base carries (e.g. `/api/v1`).
    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        let joined = format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        Ok(Url::parse(&joined)?)
    }

    async fn bearer(&self) -> Result<String, ApiError> {
        match self.storage.get(keys::TOKEN).await? {
            Some(token) if !token.is_empty() => Ok(token),
            _ => Err(ApiError::MissingToken),
        }
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ErrorBody>()
                .await
                .ok()
                .and_then(|body| body.message)
                .unwrap_or_else(|| format!("Request failed with status {}", status.as_u16()));
            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json::<Envelope<T>>().await?.data)
    }

    async fn decode_ack(response: reqwest::Response) -> Result<(), ApiError> {
        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ErrorBody>()
                .await
                .ok()
                .and_then(|body| body.message)
                .unwrap_or_else(|| format!("Request failed with status {}", status.as_u16()));
            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
            });
        }
        Ok(())
    }

    /// Fetches a whole collection, e.g. `GET /courses`.
    pub async fn collection<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(String, String)],
    ) -> Result<Vec<T>, ApiError> {
        let mut request = self.http.get(self.endpoint(path)?);
        if !query.is_empty() {
            request = request.query(query);
        }
        Self::decode(request.send().await?).await
    }

    /// Fetches a single item, e.g. `GET /courses/:id`.
    pub async fn item<T: DeserializeOwned>(
        &self,
        path: &str,
        id: &str,
        bearer: bool,
    ) -> Result<T, ApiError> {
        let mut request = self.http.get(self.endpoint(&format!("{path}/{id}"))?);
        if bearer {
            request = request.bearer_auth(self.bearer().await?);
        }
        Self::decode(request.send().await?).await
    }

    /// `POST /{path}/:id/toggle-like`, bearer required.
    pub async fn toggle_like(&self, path: &str, id: &str) -> Result<LikeUpdate, ApiError> {
        let token = self.bearer().await?;
        let url = self.endpoint(&format!("{path}/{id}/toggle-like"))?;
        Self::decode(self.http.post(url).bearer_auth(token).send().await?).await
    }

    // categories

    pub async fn categories(&self, kind: Option<&str>) -> Result<Vec<Category>, ApiError> {
        let query: Vec<(String, String)> = kind
            .map(|kind| vec![("type".to_owned(), kind.to_owned())])
            .unwrap_or_default();
        self.collection("categories", &query).await
    }

    // courses

    pub async fn courses(&self) -> Result<Vec<Course>, ApiError> {
        self.collection("courses", &[]).await
    }

    pub async fn course(&self, id: &str) -> Result<Course, ApiError> {
        self.item("courses", id, true).await
    }

    pub async fn delete_course(&self, id: &str) -> Result<(), ApiError> {
        let token = self.bearer().await?;
        let url = self.endpoint(&format!("courses/{id}"))?;
        Self::decode_ack(self.http.delete(url).bearer_auth(token).send().await?).await
    }

    // websites

    pub async fn websites(&self) -> Result<Vec<Website>, ApiError> {
        self.collection("websites", &[]).await
    }

    pub async fn website(&self, id: &str) -> Result<Website, ApiError> {
        self.item("websites", id, false).await
    }

    pub async fn toggle_website_like(&self, id: &str) -> Result<LikeUpdate, ApiError> {
        self.toggle_like("websites", id).await
    }

    // softwares

    pub async fn softwares(&self) -> Result<Vec<Software>, ApiError> {
        self.collection("softwares", &[]).await
    }

    pub async fn software(&self, id: &str) -> Result<Software, ApiError> {
        self.item("softwares", id, false).await
    }

    pub async fn toggle_software_like(&self, id: &str) -> Result<LikeUpdate, ApiError> {
        self.toggle_like("softwares", id).await
    }

    // mentors

    pub async fn mentors(&self) -> Result<Vec<Mentor>, ApiError> {
        self.collection("mentors", &[]).await
    }

    pub async fn mentor(&self, id: &str) -> Result<Mentor, ApiError> {
        self.item("mentors", id, false).await
    }

    pub async fn create_mentor(&self, mentor: &NewMentor) -> Result<Mentor, ApiError> {
        let token = self.bearer().await?;
        let url = self.endpoint("mentors/create-mentor")?;
        Self::decode(
            self.http
                .post(url)
                .bearer_auth(token)
                .json(mentor)
                .send()
                .await?,
        )
        .await
    }

    pub async fn update_mentor(&self, id: &str, patch: &MentorPatch) -> Result<Mentor, ApiError> {
        let token = self.bearer().await?;
        let url = self.endpoint(&format!("mentors/{id}"))?;
        Self::decode(
            self.http
                .patch(url)
                .bearer_auth(token)
                .json(patch)
                .send()
                .await?,
        )
        .await
    }

    pub async fn delete_mentor(&self, id: &str) -> Result<(), ApiError> {
        let token = self.bearer().await?;
        let url = self.endpoint(&format!("mentors/{id}"))?;
        Self::decode_ack(self.http.delete(url).bearer_auth(token).send().await?).await
    }

    // admin user management

    pub async fn admin_users(&self) -> Result<Vec<AccountSummary>, ApiError> {
        let token = self.bearer().await?;
        let url = self.endpoint("users/admin/all")?;
        Self::decode(self.http.get(url).bearer_auth(token).send().await?).await
    }

    pub async fn admin_update_role(&self, id: &str, role: Role) -> Result<(), ApiError> {
        let token = self.bearer().await?;
        let url = self.endpoint(&format!("users/admin/{id}"))?;
        Self::decode_ack(
            self.http
                .patch(url)
                .bearer_auth(token)
                .json(&json!({ "role": role.as_str() }))
                .send()
                .await?,
        )
        .await
    }

    // orders

    pub async fn my_orders(&self) -> Result<Vec<Order>, ApiError> {
        let token = self.bearer().await?;
        let url = self.endpoint("orders/my")?;
        Self::decode(self.http.get(url).bearer_auth(token).send().await?).await
    }

    // enrollments

    pub async fn record_progress(&self, update: &ProgressUpdate) -> Result<(), ApiError> {
        let token = self.bearer().await?;
        let url = self.endpoint("enrollments/progress")?;
        Self::decode_ack(
            self.http
                .post(url)
                .bearer_auth(token)
                .json(update)
                .send()
                .await?,
        )
        .await
    }

    pub async fn my_enrollments(&self) -> Result<Vec<Enrollment>, ApiError> {
        let token = self.bearer().await?;
        let url = self.endpoint("enrollments/my")?;
        Self::decode(self.http.get(url).bearer_auth(token).send().await?).await
    }

    pub async fn my_enrollment_stats(&self) -> Result<EnrollmentStats, ApiError> {
        let token = self.bearer().await?;
        let url = self.endpoint("enrollments/my/stats")?;
        Self::decode(self.http.get(url).bearer_auth(token).send().await?).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::InMemoryStorage;
    use serde_json::json;

    async fn client_for(server: &mockito::ServerGuard) -> (ApiClient, Arc<InMemoryStorage>) {
        let storage = Arc::new(InMemoryStorage::new());
        let config = ClientConfig::new(server.url().parse().unwrap());
        (ApiClient::new(&config, storage.clone()).unwrap(), storage)
    }

    #[tokio::test]
    async fn test_categories_with_type_filter() {
        let mut server = mockito::Server::new_async().await;
        let (client, _) = client_for(&server).await;

        server
            .mock("GET", "/categories")
            .match_query(mockito::Matcher::UrlEncoded(
                "type".to_owned(),
                "course".to_owned(),
            ))
            .with_status(200)
            .with_body(
                json!({"data": [{"id": "c1", "name": "Design", "type": "course"}]}).to_string(),
            )
            .create_async()
            .await;

        let categories = client.categories(Some("course")).await.unwrap();
        assert_eq!(categories.len(), 1);
        assert_eq!(categories[0].name, "Design");
    }

    #[tokio::test]
    async fn test_course_detail_sends_bearer_header() {
        let mut server = mockito::Server::new_async().await;
        let (client, storage) = client_for(&server).await;
        storage.set(keys::TOKEN, "tok123").await.unwrap();

        server
            .mock("GET", "/courses/c1")
            .match_header("Authorization", "Bearer tok123")
            .with_status(200)
            .with_body(json!({"data": {"id": "c1", "title": "Rust", "price": 29.0}}).to_string())
            .create_async()
            .await;

        let course = client.course("c1").await.unwrap();
        assert_eq!(course.title, "Rust");
    }

    #[tokio::test]
    async fn test_bearer_endpoint_fails_without_token() {
        let server = mockito::Server::new_async().await;
        let (client, _) = client_for(&server).await;

        // No mock registered: a request would fail differently. The
        // token check must short-circuit before any request is made.
        let err = client.course("c1").await.unwrap_err();
        assert!(matches!(err, ApiError::MissingToken));

        let err = client.my_orders().await.unwrap_err();
        assert!(matches!(err, ApiError::MissingToken));
    }

    #[tokio::test]
    async fn test_server_message_is_surfaced() {
        let mut server = mockito::Server::new_async().await;
        let (client, _) = client_for(&server).await;

        server
            .mock("GET", "/websites")
            .with_status(500)
            .with_body(json!({"message": "database unavailable"}).to_string())
            .create_async()
            .await;

        let err = client.websites().await.unwrap_err();
        match err {
            ApiError::Status { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "database unavailable");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_generic_fallback_when_body_has_no_message() {
        let mut server = mockito::Server::new_async().await;
        let (client, _) = client_for(&server).await;

        server
            .mock("GET", "/mentors")
            .with_status(502)
            .with_body("bad gateway")
            .create_async()
            .await;

        let err = client.mentors().await.unwrap_err();
        match err {
            ApiError::Status { status, message } => {
                assert_eq!(status, 502);
                assert_eq!(message, "Request failed with status 502");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_toggle_like_posts_with_bearer() {
        let mut server = mockito::Server::new_async().await;
        let (client, storage) = client_for(&server).await;
        storage.set(keys::TOKEN, "tok123").await.unwrap();

        server
            .mock("POST", "/websites/w1/toggle-like")
            .match_header("Authorization", "Bearer tok123")
            .with_status(200)
            .with_body(json!({"data": {"isLiked": true, "likeCount": 8}}).to_string())
            .create_async()
            .await;

        let update = client.toggle_website_like("w1").await.unwrap();
        assert!(update.is_liked);
        assert_eq!(update.like_count, 8);
    }

    #[tokio::test]
    async fn test_admin_update_role_sends_canonical_role() {
        let mut server = mockito::Server::new_async().await;
        let (client, storage) = client_for(&server).await;
        storage.set(keys::TOKEN, "admintok").await.unwrap();

        server
            .mock("PATCH", "/users/admin/u9")
            .match_header("Authorization", "Bearer admintok")
            .match_body(mockito::Matcher::Json(json!({"role": "mentor"})))
            .with_status(200)
            .with_body(json!({"data": null}).to_string())
            .create_async()
            .await;

        client.admin_update_role("u9", Role::Mentor).await.unwrap();
    }

    #[tokio::test]
    async fn test_endpoint_preserves_base_path_prefix() {
        let storage: Arc<InMemoryStorage> = Arc::new(InMemoryStorage::new());
        let config = ClientConfig::new("http://localhost:5000/api/v1".parse().unwrap());
        let client = ApiClient::new(&config, storage).unwrap();

        let url = client.endpoint("/courses").unwrap();
        assert_eq!(url.as_str(), "http://localhost:5000/api/v1/courses");
    }
}
