// src/server.rs

//! HTTP surface: `GET /api/github-contributions?username=<handle>`.

use std::sync::Arc;

use rocket::fairing::AdHoc;
use rocket::figment::providers::Env;
use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::{Build, Rocket, State, get, routes};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::AppError;
use crate::models::{ContributionResult, ServerConfig};
use crate::services::ContributionFetcher;

/// Body of every failed response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorBody {
    pub error: String,
}

impl From<&AppError> for ErrorBody {
    fn from(err: &AppError) -> Self {
        Self {
            error: err.public_message().to_string(),
        }
    }
}

type ApiResult<T> = Result<Json<T>, (Status, Json<ErrorBody>)>;

#[get("/github-contributions?<username>")]
#[instrument(skip(fetcher))]
async fn github_contributions(
    username: Option<&str>,
    fetcher: &State<Arc<ContributionFetcher>>,
) -> ApiResult<ContributionResult> {
    match fetcher.fetch(username).await {
        Ok(result) => Ok(Json(result)),
        Err(e) => {
            let status = Status::from_code(e.status_code()).unwrap_or(Status::InternalServerError);
            tracing::warn!("Contribution request failed with {status}: {e}");
            Err((status, Json(ErrorBody::from(&e))))
        }
    }
}

/// Mount the API routes.
pub fn stage() -> AdHoc {
    AdHoc::on_ignite("Installing contribution routes", |rocket| async {
        rocket.mount("/api", routes![github_contributions])
    })
}

/// Build the server around a shared fetcher.
///
/// `ROCKET_*` environment variables still take precedence over `config`.
pub fn build(fetcher: Arc<ContributionFetcher>, config: &ServerConfig) -> Rocket<Build> {
    let figment = rocket::Config::figment()
        .merge(("address", config.address.as_str()))
        .merge(("port", config.port))
        .merge(Env::prefixed("ROCKET_").global());

    rocket::custom(figment).manage(fetcher).attach(stage())
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use rocket::local::asynchronous::Client;
    use serde_json::Value;

    use super::*;
    use crate::models::UpstreamConfig;
    use crate::services::testing::{FakeSource, ONE_DAY_PAGE};
    use crate::services::{MemoryCache, NoCache, PageCache};

    async fn client_with(source: Arc<FakeSource>, cache: Arc<dyn PageCache>) -> Client {
        let fetcher = ContributionFetcher::new(
            UpstreamConfig::default(),
            source,
            cache,
            Duration::from_secs(3600),
        )
        .unwrap();
        Client::tracked(build(Arc::new(fetcher), &ServerConfig::default()))
            .await
            .unwrap()
    }

    async fn get(client: &Client, uri: &str) -> (Status, Value) {
        let response = client.get(uri.to_string()).dispatch().await;
        let status = response.status();
        (status, response.into_json::<Value>().await.unwrap())
    }

    #[rocket::async_test]
    async fn test_success_body() {
        let client = client_with(Arc::new(FakeSource::page(ONE_DAY_PAGE)), Arc::new(NoCache)).await;
        let (status, body) = get(&client, "/api/github-contributions?username=octocat").await;

        assert_eq!(status, Status::Ok);
        assert_eq!(body["username"], "octocat");
        assert_eq!(body["total"], 1234);
        assert_eq!(
            body["days"],
            serde_json::json!([{ "date": "2024-03-01", "count": 5, "level": 2 }])
        );
        assert!(body["updatedAt"].is_string());
    }

    #[rocket::async_test]
    async fn test_missing_and_invalid_username_use_default() {
        let source = Arc::new(FakeSource::page(ONE_DAY_PAGE));
        let client = client_with(source.clone(), Arc::new(NoCache)).await;

        for uri in [
            "/api/github-contributions",
            "/api/github-contributions?username=",
            "/api/github-contributions?username=bad%20name",
        ] {
            let (status, body) = get(&client, uri).await;
            assert_eq!(status, Status::Ok, "{uri}");
            assert_eq!(body["username"], "CodingWithKantecki", "{uri}");
        }
        assert_eq!(source.calls(), 3);
    }

    #[rocket::async_test]
    async fn test_upstream_failure_is_502() {
        let client = client_with(Arc::new(FakeSource::status(503)), Arc::new(NoCache)).await;
        let (status, body) = get(&client, "/api/github-contributions?username=octocat").await;

        assert_eq!(status, Status::BadGateway);
        assert_eq!(body, serde_json::json!({ "error": "Unable to fetch GitHub contribution data." }));
    }

    #[rocket::async_test]
    async fn test_empty_calendar_is_404() {
        let client = client_with(Arc::new(FakeSource::page("<html></html>")), Arc::new(NoCache)).await;
        let (status, body) = get(&client, "/api/github-contributions?username=ghost").await;

        assert_eq!(status, Status::NotFound);
        assert_eq!(body, serde_json::json!({ "error": "No contribution data found for this user." }));
    }

    #[rocket::async_test]
    async fn test_transport_failure_is_500() {
        let client = client_with(Arc::new(FakeSource::broken()), Arc::new(NoCache)).await;
        let (status, body) = get(&client, "/api/github-contributions?username=octocat").await;

        assert_eq!(status, Status::InternalServerError);
        assert_eq!(body, serde_json::json!({ "error": "Could not load contribution data right now." }));
    }

    #[rocket::async_test]
    async fn test_repeat_requests_are_served_from_cache() {
        let source = Arc::new(FakeSource::page(ONE_DAY_PAGE));
        let client = client_with(source.clone(), Arc::new(MemoryCache::new())).await;

        for _ in 0..3 {
            let (status, _) = get(&client, "/api/github-contributions?username=octocat").await;
            assert_eq!(status, Status::Ok);
        }
        assert_eq!(source.calls(), 1);
    }
}
