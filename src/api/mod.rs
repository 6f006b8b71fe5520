use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

pub mod client;
pub mod endpoints;

pub use client::{ApiClient, ApiError, ApiRequest};

#[derive(Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Serialize)]
pub struct RegisterRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
    pub full_name: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
}

/// The signed-in user as returned by `GET /auth/me`.
///
/// Only the first four fields are required; the remaining ones are carried
/// for the profile screen and tolerated when absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: String,
    pub email: String,
    pub full_name: String,
    pub personality_test_completed: bool,
    #[serde(default)]
    pub is_active: Option<bool>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub spiritual_level: Option<i64>,
    #[serde(default)]
    pub profile_picture: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PersonalityQuestion {
    pub id: String,
    pub question: String,
    pub options: Vec<String>,
    #[serde(default)]
    pub category: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonalityAnswer {
    pub question_id: String,
    pub answer_index: usize,
    pub answer_text: String,
}

#[derive(Serialize)]
pub struct PersonalitySubmission<'a> {
    pub answers: &'a [PersonalityAnswer],
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Story {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub difficulty_level: Option<u8>,
    #[serde(default)]
    pub estimated_duration: Option<String>,
    #[serde(default)]
    pub acceptance_threshold: Option<u8>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StoryProgress {
    pub story_id: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub acceptance_level: i64,
    #[serde(default)]
    pub ai_confirmed: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Todo {
    pub id: String,
    #[serde(default)]
    pub story_id: Option<String>,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub completed: bool,
}

#[derive(Serialize)]
pub struct NewTodo<'a> {
    pub story_id: &'a str,
    pub title: &'a str,
    pub description: &'a str,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ChatMessage {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub user_id: String,
    pub message: String,
    pub is_user: bool,
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub story_context: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EmotionPoint {
    pub timestamp: String,
    pub value: f64,
}

/// Per-emotion time series keyed by emotion name.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct EmotionalTimeseries {
    #[serde(default)]
    pub emotions: BTreeMap<String, Vec<EmotionPoint>>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Podcast {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub mentor_name: Option<String>,
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub difficulty_level: Option<u8>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PodcastReview {
    #[serde(default)]
    pub id: String,
    pub rating: u8,
    #[serde(default)]
    pub review_text: String,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Serialize)]
pub struct NewPodcastReview<'a> {
    pub podcast_id: &'a str,
    pub rating: u8,
    pub review_text: &'a str,
}

/// A decision tracked on the consciousness timeline. The past/present/future
/// self snapshots are free-form server documents.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Decision {
    pub id: String,
    pub decision_title: String,
    #[serde(default)]
    pub decision_description: String,
    #[serde(default)]
    pub decision_status: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub past_self: Option<Value>,
    #[serde(default)]
    pub present_self: Option<Value>,
    #[serde(default)]
    pub future_self: Option<Value>,
}

#[derive(Serialize)]
pub struct NewDecision<'a> {
    pub decision_title: &'a str,
    pub decision_description: &'a str,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct FulfillmentAnalytics {
    #[serde(default)]
    pub average_fulfillment: f64,
    #[serde(default)]
    pub average_happiness: f64,
    #[serde(default)]
    pub average_clarity: f64,
    #[serde(default)]
    pub trend: Option<String>,
}

/// One self-reported check-in, newest first from the history endpoint.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FulfillmentEntry {
    pub id: String,
    #[serde(default)]
    pub decision_id: Option<String>,
    pub fulfillment_level: i64,
    #[serde(default)]
    pub happiness_level: i64,
    #[serde(default)]
    pub clarity_level: i64,
    #[serde(default)]
    pub confidence_level: i64,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub timestamp: Option<String>,
}
