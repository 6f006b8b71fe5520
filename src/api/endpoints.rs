//! Typed helpers for each REST endpoint the client uses.

use super::client::{ApiClient, ApiError, ApiRequest};
use super::{
    ChatMessage, CurrentUser, Decision, EmotionalTimeseries, FulfillmentAnalytics,
    FulfillmentEntry, LoginRequest, NewDecision, NewPodcastReview, NewTodo, PersonalityAnswer,
    PersonalityQuestion, PersonalitySubmission, Podcast, PodcastReview, RegisterRequest, Story,
    StoryProgress, Todo, TokenResponse,
};

pub const CHAT_HISTORY_LIMIT: usize = 50;
pub const FULFILLMENT_HISTORY_LIMIT: usize = 20;

pub async fn login(
    client: &ApiClient,
    email: &str,
    password: &str,
) -> Result<TokenResponse, ApiError> {
    let request = ApiRequest::post("auth/login").json(&LoginRequest { email, password })?;
    client.send(request).await
}

pub async fn register(
    client: &ApiClient,
    email: &str,
    password: &str,
    full_name: &str,
) -> Result<TokenResponse, ApiError> {
    let request = ApiRequest::post("auth/register").json(&RegisterRequest {
        email,
        password,
        full_name,
    })?;
    client.send(request).await
}

/// `GET /auth/me`, authenticated with `token` when given, otherwise with the
/// stored token.
pub async fn fetch_current_user(
    client: &ApiClient,
    token: Option<&str>,
) -> Result<CurrentUser, ApiError> {
    let mut request = ApiRequest::get("auth/me");
    if let Some(token) = token {
        request = request.bearer(token);
    }
    client.send(request).await
}

pub async fn fetch_personality_questions(
    client: &ApiClient,
) -> Result<Vec<PersonalityQuestion>, ApiError> {
    client.send(ApiRequest::get("personality/questions")).await
}

pub async fn submit_personality(
    client: &ApiClient,
    answers: &[PersonalityAnswer],
) -> Result<(), ApiError> {
    let request =
        ApiRequest::post("personality/submit").json(&PersonalitySubmission { answers })?;
    client.send_empty(request).await
}

pub async fn fetch_stories(client: &ApiClient) -> Result<Vec<Story>, ApiError> {
    client.send(ApiRequest::get("stories")).await
}

pub async fn fetch_story_progress(client: &ApiClient) -> Result<Vec<StoryProgress>, ApiError> {
    client.send(ApiRequest::get("stories/progress")).await
}

pub async fn start_story(client: &ApiClient, story_id: &str) -> Result<(), ApiError> {
    let request =
        ApiRequest::post(format!("stories/{story_id}/start")).json(&serde_json::json!({}))?;
    client.send_empty(request).await
}

pub async fn fetch_todos(client: &ApiClient) -> Result<Vec<Todo>, ApiError> {
    client.send(ApiRequest::get("todos")).await
}

pub async fn create_todo(
    client: &ApiClient,
    story_id: &str,
    title: &str,
    description: &str,
) -> Result<Todo, ApiError> {
    let request = ApiRequest::post("todos").json(&NewTodo {
        story_id,
        title,
        description,
    })?;
    client.send(request).await
}

pub async fn complete_todo(client: &ApiClient, todo_id: &str) -> Result<(), ApiError> {
    client
        .send_empty(ApiRequest::put(format!("todos/{todo_id}/complete")))
        .await
}

pub async fn fetch_emotional_timeseries(
    client: &ApiClient,
) -> Result<EmotionalTimeseries, ApiError> {
    client
        .send(ApiRequest::get("ai/emotional-state/timeseries"))
        .await
}

pub async fn fetch_chat_history(
    client: &ApiClient,
    story_context: Option<&str>,
) -> Result<Vec<ChatMessage>, ApiError> {
    let mut request =
        ApiRequest::get("chat/history").query("limit", CHAT_HISTORY_LIMIT.to_string());
    if let Some(context) = story_context {
        request = request.query("story_context", context);
    }
    client.send(request).await
}

/// Post a chat message; the reply is the assistant's message.
pub async fn send_chat_message(
    client: &ApiClient,
    message: &str,
    story_context: Option<&str>,
) -> Result<ChatMessage, ApiError> {
    let mut request = ApiRequest::post("chat/message").query("message", message);
    if let Some(context) = story_context {
        request = request.query("story_context", context);
    }
    client.send(request).await
}

pub async fn fetch_podcasts(client: &ApiClient) -> Result<Vec<Podcast>, ApiError> {
    client.send(ApiRequest::get("podcasts")).await
}

pub async fn fetch_podcast_reviews(
    client: &ApiClient,
    podcast_id: &str,
) -> Result<Vec<PodcastReview>, ApiError> {
    client
        .send(ApiRequest::get(format!("podcasts/{podcast_id}/reviews")))
        .await
}

pub async fn submit_podcast_review(
    client: &ApiClient,
    podcast_id: &str,
    rating: u8,
    review_text: &str,
) -> Result<(), ApiError> {
    let request = ApiRequest::post("podcasts/review").json(&NewPodcastReview {
        podcast_id,
        rating,
        review_text,
    })?;
    client.send_empty(request).await
}

pub async fn fetch_decisions(client: &ApiClient) -> Result<Vec<Decision>, ApiError> {
    client.send(ApiRequest::get("consciousness/decisions")).await
}

pub async fn create_decision(
    client: &ApiClient,
    decision_title: &str,
    decision_description: &str,
) -> Result<(), ApiError> {
    let request = ApiRequest::post("consciousness/decision").json(&NewDecision {
        decision_title,
        decision_description,
    })?;
    client.send_empty(request).await
}

pub async fn update_decision(
    client: &ApiClient,
    decision_id: &str,
    decision: &serde_json::Value,
) -> Result<(), ApiError> {
    let request =
        ApiRequest::put(format!("consciousness/decision/{decision_id}")).json(decision)?;
    client.send_empty(request).await
}

pub async fn fetch_fulfillment_analytics(
    client: &ApiClient,
) -> Result<FulfillmentAnalytics, ApiError> {
    client.send(ApiRequest::get("fulfillment/analytics")).await
}

pub async fn fetch_fulfillment_history(
    client: &ApiClient,
) -> Result<Vec<FulfillmentEntry>, ApiError> {
    let request = ApiRequest::get("fulfillment/history")
        .query("limit", FULFILLMENT_HISTORY_LIMIT.to_string());
    client.send(request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::token_store::MemoryTokenStore;
    use crate::utils::test_utils::{test_client, MockResponse, MockServer};
    use serde_json::json;
    use std::sync::Arc;

    #[tokio::test]
    async fn fulfillment_history_is_limited() {
        let server = MockServer::start(vec![(
            "GET",
            "/api/fulfillment/history",
            MockResponse::json(
                200,
                json!([{
                    "id": "f1",
                    "user_id": "user-1",
                    "decision_id": null,
                    "fulfillment_level": 70,
                    "happiness_level": 60,
                    "clarity_level": 80,
                    "confidence_level": 65,
                    "notes": "steady week",
                    "timestamp": "2024-03-02T09:00:00"
                }]),
            ),
        )])
        .await;
        let client = test_client(&server, Arc::new(MemoryTokenStore::with_token("t")));

        let history = fetch_fulfillment_history(&client).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].fulfillment_level, 70);
        assert_eq!(history[0].notes, "steady week");

        let requests = server.requests().await;
        assert_eq!(requests[0].target, "/api/fulfillment/history?limit=20");
    }

    #[tokio::test]
    async fn login_posts_credentials_and_reads_token() {
        let server = MockServer::start(vec![(
            "POST",
            "/api/auth/login",
            MockResponse::json(200, json!({"access_token": "tok", "token_type": "bearer"})),
        )])
        .await;
        let client = test_client(&server, Arc::new(MemoryTokenStore::new()));

        let token = login(&client, "a@b.com", "pw").await.unwrap();
        assert_eq!(token.access_token, "tok");

        let requests = server.requests().await;
        let body: serde_json::Value = serde_json::from_str(&requests[0].body).unwrap();
        assert_eq!(body, json!({"email": "a@b.com", "password": "pw"}));
    }

    #[tokio::test]
    async fn register_sends_full_name() {
        let server = MockServer::start(vec![(
            "POST",
            "/api/auth/register",
            MockResponse::json(200, json!({"access_token": "new"})),
        )])
        .await;
        let client = test_client(&server, Arc::new(MemoryTokenStore::new()));

        register(&client, "a@b.com", "pw", "Ada Lovelace")
            .await
            .unwrap();

        let requests = server.requests().await;
        let body: serde_json::Value = serde_json::from_str(&requests[0].body).unwrap();
        assert_eq!(body["full_name"], "Ada Lovelace");
    }

    #[tokio::test]
    async fn chat_history_passes_limit_and_context() {
        let server = MockServer::start(vec![(
            "GET",
            "/api/chat/history",
            MockResponse::json(
                200,
                json!([{"message": "hello", "is_user": true, "timestamp": "2024-01-05T10:00:00"}]),
            ),
        )])
        .await;
        let client = test_client(&server, Arc::new(MemoryTokenStore::with_token("t")));

        let history = fetch_chat_history(&client, Some("story-1")).await.unwrap();
        assert_eq!(history.len(), 1);
        assert!(history[0].is_user);

        let requests = server.requests().await;
        assert_eq!(
            requests[0].target,
            "/api/chat/history?limit=50&story_context=story-1"
        );
    }

    #[tokio::test]
    async fn submit_personality_ignores_result_body() {
        let server = MockServer::start(vec![(
            "POST",
            "/api/personality/submit",
            MockResponse::json(200, json!({"personality_type": "Intuitive Seeker"})),
        )])
        .await;
        let client = test_client(&server, Arc::new(MemoryTokenStore::with_token("t")));

        let answers = vec![PersonalityAnswer {
            question_id: "q1".to_string(),
            answer_index: 2,
            answer_text: "Through meditation".to_string(),
        }];
        submit_personality(&client, &answers).await.unwrap();

        let requests = server.requests().await;
        assert_eq!(requests[0].header("authorization"), Some("Bearer t"));
    }

    #[tokio::test]
    async fn complete_todo_uses_put() {
        let server = MockServer::start(vec![(
            "PUT",
            "/api/todos/t-9/complete",
            MockResponse::json(200, json!({"message": "Todo completed successfully"})),
        )])
        .await;
        let client = test_client(&server, Arc::new(MemoryTokenStore::with_token("t")));

        complete_todo(&client, "t-9").await.unwrap();
        assert_eq!(server.requests().await[0].method, "PUT");
    }
}
