//! Runs [`AppCommand`]s as background tasks and reports back with actions.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::api::{endpoints, ApiError};
use crate::core::app::screens::{DashboardData, TimelineData};
use crate::core::app::{AppAction, AppActionDispatcher, AppCommand};
use crate::core::onboarding::submit_answers;
use crate::core::resource::spawn_load;
use crate::core::session::SessionController;

fn describe(err: ApiError) -> String {
    match &err {
        ApiError::Network(_) => "Could not reach the Evolance service".to_string(),
        ApiError::Http { status, .. } => format!("Request failed ({status})"),
        ApiError::Decode(_) => "Unexpected response from the Evolance service".to_string(),
    }
}

async fn load_dashboard(session: &SessionController) -> Result<DashboardData, ApiError> {
    let client = session.client();
    let lists = async {
        tokio::try_join!(
            endpoints::fetch_stories(client),
            endpoints::fetch_story_progress(client),
            endpoints::fetch_todos(client),
        )
    };
    let (lists, emotions) = tokio::join!(lists, endpoints::fetch_emotional_timeseries(client));
    let (stories, progress, todos) = lists?;
    let emotions = emotions
        .map_err(|err| warn!(error = %err, "emotion series unavailable"))
        .ok();
    Ok(DashboardData {
        stories,
        progress,
        todos,
        emotions,
    })
}

async fn load_timeline(session: &SessionController) -> Result<TimelineData, ApiError> {
    let client = session.client();
    let (decisions, analytics, history) = tokio::try_join!(
        endpoints::fetch_decisions(client),
        endpoints::fetch_fulfillment_analytics(client),
        endpoints::fetch_fulfillment_history(client),
    )?;
    Ok(TimelineData {
        decisions,
        analytics,
        history,
    })
}

pub fn execute(
    command: AppCommand,
    session: &Arc<SessionController>,
    dispatcher: &AppActionDispatcher,
) {
    let session = Arc::clone(session);
    let tx = dispatcher.sender();
    match command {
        AppCommand::Login { email, password } => {
            let dispatcher = dispatcher.clone();
            tokio::spawn(async move {
                let success = session.login(&email, &password).await;
                dispatcher.dispatch(AppAction::AuthFinished { success });
            });
        }
        AppCommand::Register {
            email,
            password,
            full_name,
        } => {
            let dispatcher = dispatcher.clone();
            tokio::spawn(async move {
                let success = session.register(&email, &password, &full_name).await;
                dispatcher.dispatch(AppAction::AuthFinished { success });
            });
        }
        AppCommand::Logout => session.logout(),
        AppCommand::LoadQuestions(ticket) => spawn_load(
            ticket,
            tx,
            async move { endpoints::fetch_personality_questions(session.client()).await },
            |generation, result| AppAction::QuestionsLoaded {
                generation,
                result: result.map_err(describe),
            },
        ),
        AppCommand::SubmitOnboarding(answers) => {
            let dispatcher = dispatcher.clone();
            tokio::spawn(async move {
                let result = submit_answers(&session, &answers)
                    .await
                    .map(|_| ())
                    .map_err(|err| {
                        warn!(error = %err, "personality submission failed");
                        describe(err)
                    });
                dispatcher.dispatch(AppAction::OnboardingSubmitted { result });
            });
        }
        AppCommand::LoadDashboard(ticket) => spawn_load(
            ticket,
            tx,
            async move { load_dashboard(&session).await },
            |generation, result| AppAction::DashboardLoaded {
                generation,
                result: result.map_err(describe),
            },
        ),
        AppCommand::StartStory { story_id, title } => {
            let dispatcher = dispatcher.clone();
            tokio::spawn(async move {
                let result = endpoints::start_story(session.client(), &story_id)
                    .await
                    .map(|()| format!("Started \"{title}\""))
                    .map_err(describe);
                dispatcher.dispatch(AppAction::DashboardUpdated { result });
            });
        }
        AppCommand::CompleteTodo { todo_id, title } => {
            let dispatcher = dispatcher.clone();
            tokio::spawn(async move {
                let result = endpoints::complete_todo(session.client(), &todo_id)
                    .await
                    .map(|()| format!("Completed \"{title}\""))
                    .map_err(describe);
                dispatcher.dispatch(AppAction::DashboardUpdated { result });
            });
        }
        AppCommand::CreateTodo { story_id, title } => {
            let dispatcher = dispatcher.clone();
            tokio::spawn(async move {
                let result = endpoints::create_todo(session.client(), &story_id, &title, "")
                    .await
                    .map(|todo| format!("Added \"{}\"", todo.title))
                    .map_err(describe);
                dispatcher.dispatch(AppAction::DashboardUpdated { result });
            });
        }
        AppCommand::LoadChat {
            ticket,
            story_context,
        } => spawn_load(
            ticket,
            tx,
            async move {
                endpoints::fetch_chat_history(session.client(), story_context.as_deref()).await
            },
            |generation, result| AppAction::ChatHistoryLoaded {
                generation,
                result: result.map_err(describe),
            },
        ),
        AppCommand::SendChat {
            message,
            story_context,
        } => {
            let dispatcher = dispatcher.clone();
            tokio::spawn(async move {
                let result = endpoints::send_chat_message(
                    session.client(),
                    &message,
                    story_context.as_deref(),
                )
                .await
                .map_err(describe);
                dispatcher.dispatch(AppAction::ChatReplied { result });
            });
        }
        AppCommand::LoadPodcasts(ticket) => spawn_load(
            ticket,
            tx,
            async move { endpoints::fetch_podcasts(session.client()).await },
            |generation, result| AppAction::PodcastsLoaded {
                generation,
                result: result.map_err(describe),
            },
        ),
        AppCommand::LoadReviews { ticket, podcast_id } => spawn_load(
            ticket,
            tx,
            async move { endpoints::fetch_podcast_reviews(session.client(), &podcast_id).await },
            |generation, result| AppAction::ReviewsLoaded {
                generation,
                result: result.map_err(describe),
            },
        ),
        AppCommand::SubmitReview {
            podcast_id,
            rating,
            review_text,
        } => {
            let dispatcher = dispatcher.clone();
            tokio::spawn(async move {
                let result = endpoints::submit_podcast_review(
                    session.client(),
                    &podcast_id,
                    rating,
                    &review_text,
                )
                .await
                .map_err(describe);
                dispatcher.dispatch(AppAction::ReviewSubmitted { result });
            });
        }
        AppCommand::LoadTimeline(ticket) => spawn_load(
            ticket,
            tx,
            async move { load_timeline(&session).await },
            |generation, result| AppAction::TimelineLoaded {
                generation,
                result: result.map_err(describe),
            },
        ),
        AppCommand::CreateDecision { title } => {
            let dispatcher = dispatcher.clone();
            tokio::spawn(async move {
                let result = endpoints::create_decision(session.client(), &title, "")
                    .await
                    .map(|()| format!("Recorded \"{title}\""))
                    .map_err(describe);
                dispatcher.dispatch(AppAction::TimelineUpdated { result });
            });
        }
        AppCommand::UpdateDecisionStatus {
            decision_id,
            status,
        } => {
            let dispatcher = dispatcher.clone();
            tokio::spawn(async move {
                debug!(decision_id = %decision_id, status, "updating decision");
                let update = serde_json::json!({ "decision_status": status });
                let result = endpoints::update_decision(session.client(), &decision_id, &update)
                    .await
                    .map(|()| format!("Marked as {status}"))
                    .map_err(describe);
                dispatcher.dispatch(AppAction::TimelineUpdated { result });
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::token_store::MemoryTokenStore;
    use crate::core::resource::Loader;
    use crate::utils::test_utils::{test_client, MockResponse, MockServer};
    use serde_json::json;
    use tokio::sync::mpsc;

    #[tokio::test]
    async fn dashboard_load_fails_as_a_whole() {
        let server = MockServer::start(vec![
            ("GET", "/api/stories", MockResponse::json(200, json!([]))),
            ("GET", "/api/stories/progress", MockResponse::json(200, json!([]))),
            ("GET", "/api/todos", MockResponse::json(500, json!({"detail": "boom"}))),
            (
                "GET",
                "/api/ai/emotional-state/timeseries",
                MockResponse::json(200, json!({"emotions": {}})),
            ),
        ])
        .await;
        let session = Arc::new(SessionController::new(test_client(
            &server,
            Arc::new(MemoryTokenStore::with_token("t")),
        )));
        let (tx, mut rx) = mpsc::unbounded_channel();
        let dispatcher = AppActionDispatcher::new(tx);
        let mut loader = Loader::new();
        let ticket = loader.begin();
        let generation = ticket.generation;

        execute(AppCommand::LoadDashboard(ticket), &session, &dispatcher);

        match rx.recv().await {
            Some(AppAction::DashboardLoaded {
                generation: reported,
                result: Err(message),
            }) => {
                assert_eq!(reported, generation);
                assert!(message.contains("500"));
            }
            other => panic!("unexpected action: {other:?}"),
        }
    }

    #[tokio::test]
    async fn dashboard_survives_missing_emotion_series() {
        let server = MockServer::start(vec![
            (
                "GET",
                "/api/stories",
                MockResponse::json(200, json!([{"id": "s1", "title": "Letting go"}])),
            ),
            ("GET", "/api/stories/progress", MockResponse::json(200, json!([]))),
            ("GET", "/api/todos", MockResponse::json(200, json!([]))),
            (
                "GET",
                "/api/ai/emotional-state/timeseries",
                MockResponse::json(503, json!({"detail": "model offline"})),
            ),
        ])
        .await;
        let session = Arc::new(SessionController::new(test_client(
            &server,
            Arc::new(MemoryTokenStore::with_token("t")),
        )));
        let (tx, mut rx) = mpsc::unbounded_channel();
        let dispatcher = AppActionDispatcher::new(tx);
        let mut loader = Loader::new();
        let ticket = loader.begin();

        execute(AppCommand::LoadDashboard(ticket), &session, &dispatcher);

        match rx.recv().await {
            Some(AppAction::DashboardLoaded {
                result: Ok(data), ..
            }) => {
                assert_eq!(data.stories.len(), 1);
                assert_eq!(data.emotions, None);
            }
            other => panic!("unexpected action: {other:?}"),
        }
    }

    #[tokio::test]
    async fn timeline_loads_decisions_analytics_and_history() {
        let server = MockServer::start(vec![
            (
                "GET",
                "/api/consciousness/decisions",
                MockResponse::json(200, json!([{"id": "d1", "decision_title": "Move city"}])),
            ),
            (
                "GET",
                "/api/fulfillment/analytics",
                MockResponse::json(200, json!({"average_fulfillment": 64.5, "trend": "ascending"})),
            ),
            (
                "GET",
                "/api/fulfillment/history",
                MockResponse::json(
                    200,
                    json!([{"id": "f1", "fulfillment_level": 70, "notes": "calmer"}]),
                ),
            ),
        ])
        .await;
        let session = Arc::new(SessionController::new(test_client(
            &server,
            Arc::new(MemoryTokenStore::with_token("t")),
        )));
        let (tx, mut rx) = mpsc::unbounded_channel();
        let dispatcher = AppActionDispatcher::new(tx);
        let mut loader = Loader::new();
        let ticket = loader.begin();

        execute(AppCommand::LoadTimeline(ticket), &session, &dispatcher);

        match rx.recv().await {
            Some(AppAction::TimelineLoaded {
                result: Ok(data), ..
            }) => {
                assert_eq!(data.decisions.len(), 1);
                assert_eq!(data.analytics.trend.as_deref(), Some("ascending"));
                assert_eq!(data.history.len(), 1);
                assert_eq!(data.history[0].notes, "calmer");
            }
            other => panic!("unexpected action: {other:?}"),
        }
    }

    #[tokio::test]
    async fn failed_login_reports_back() {
        let server = MockServer::start(vec![(
            "POST",
            "/api/auth/login",
            MockResponse::json(401, json!({"detail": "nope"})),
        )])
        .await;
        let session = Arc::new(SessionController::new(test_client(
            &server,
            Arc::new(MemoryTokenStore::new()),
        )));
        let (tx, mut rx) = mpsc::unbounded_channel();
        let dispatcher = AppActionDispatcher::new(tx);

        execute(
            AppCommand::Login {
                email: "a@b.com".into(),
                password: "pw".into(),
            },
            &session,
            &dispatcher,
        );

        assert_eq!(
            rx.recv().await,
            Some(AppAction::AuthFinished { success: false })
        );
    }

    #[tokio::test]
    async fn decision_status_update_sends_the_new_status() {
        let server = MockServer::start(vec![(
            "PUT",
            "/api/consciousness/decision/d1",
            MockResponse::json(200, json!({"message": "updated"})),
        )])
        .await;
        let session = Arc::new(SessionController::new(test_client(
            &server,
            Arc::new(MemoryTokenStore::with_token("t")),
        )));
        let (tx, mut rx) = mpsc::unbounded_channel();
        let dispatcher = AppActionDispatcher::new(tx);

        execute(
            AppCommand::UpdateDecisionStatus {
                decision_id: "d1".into(),
                status: "decided",
            },
            &session,
            &dispatcher,
        );

        assert_eq!(
            rx.recv().await,
            Some(AppAction::TimelineUpdated {
                result: Ok("Marked as decided".to_string())
            })
        );
        let requests = server.requests().await;
        let body: serde_json::Value = serde_json::from_str(&requests[0].body).unwrap();
        assert_eq!(body, json!({"decision_status": "decided"}));
    }
}
