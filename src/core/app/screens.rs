//! Per-screen view state.

use crate::api::{
    ChatMessage, Decision, EmotionalTimeseries, FulfillmentAnalytics, FulfillmentEntry, Podcast,
    PodcastReview, Story, StoryProgress, Todo,
};
use crate::core::onboarding::OnboardingFlow;
use crate::core::resource::{Loader, Resource};
use crate::utils::text_field::TextField;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    Login,
    Register,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthField {
    FullName,
    Email,
    Password,
    ConfirmPassword,
}

impl AuthField {
    pub fn label(self) -> &'static str {
        match self {
            AuthField::FullName => "Full name",
            AuthField::Email => "Email",
            AuthField::Password => "Password",
            AuthField::ConfirmPassword => "Confirm password",
        }
    }
}

/// Credentials ready to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSubmission {
    pub email: String,
    pub password: String,
    /// Present when registering.
    pub full_name: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AuthForm {
    pub mode: AuthMode,
    pub focus: AuthField,
    pub full_name: TextField,
    pub email: TextField,
    pub password: TextField,
    pub confirm_password: TextField,
    pub submitting: bool,
    pub error: Option<String>,
}

impl Default for AuthForm {
    fn default() -> Self {
        Self {
            mode: AuthMode::Login,
            focus: AuthField::Email,
            full_name: TextField::new(),
            email: TextField::new(),
            password: TextField::masked(),
            confirm_password: TextField::masked(),
            submitting: false,
            error: None,
        }
    }
}

impl AuthForm {
    pub fn fields(&self) -> &'static [AuthField] {
        match self.mode {
            AuthMode::Login => &[AuthField::Email, AuthField::Password],
            AuthMode::Register => &[
                AuthField::FullName,
                AuthField::Email,
                AuthField::Password,
                AuthField::ConfirmPassword,
            ],
        }
    }

    pub fn field(&self, field: AuthField) -> &TextField {
        match field {
            AuthField::FullName => &self.full_name,
            AuthField::Email => &self.email,
            AuthField::Password => &self.password,
            AuthField::ConfirmPassword => &self.confirm_password,
        }
    }

    pub fn focused_mut(&mut self) -> &mut TextField {
        match self.focus {
            AuthField::FullName => &mut self.full_name,
            AuthField::Email => &mut self.email,
            AuthField::Password => &mut self.password,
            AuthField::ConfirmPassword => &mut self.confirm_password,
        }
    }

    pub fn move_focus(&mut self, forward: bool) {
        let fields = self.fields();
        let current = fields
            .iter()
            .position(|field| *field == self.focus)
            .unwrap_or(0);
        let next = if forward {
            (current + 1) % fields.len()
        } else {
            (current + fields.len() - 1) % fields.len()
        };
        self.focus = fields[next];
    }

    pub fn toggle_mode(&mut self) {
        self.mode = match self.mode {
            AuthMode::Login => AuthMode::Register,
            AuthMode::Register => AuthMode::Login,
        };
        self.error = None;
        if !self.fields().contains(&self.focus) {
            self.focus = AuthField::Email;
        }
    }

    pub fn validate(&self) -> Result<AuthSubmission, String> {
        let email = self.email.text().trim();
        if email.is_empty() || !email.contains('@') {
            return Err("Enter a valid email address".to_string());
        }
        if self.password.is_empty() {
            return Err("Enter your password".to_string());
        }
        let full_name = match self.mode {
            AuthMode::Login => None,
            AuthMode::Register => {
                let name = self.full_name.text().trim();
                if name.is_empty() {
                    return Err("Enter your full name".to_string());
                }
                if self.password.text() != self.confirm_password.text() {
                    return Err("Passwords do not match".to_string());
                }
                Some(name.to_string())
            }
        };
        Ok(AuthSubmission {
            email: email.to_string(),
            password: self.password.text().to_string(),
            full_name,
        })
    }

    pub fn failure_message(&self) -> &'static str {
        match self.mode {
            AuthMode::Login => "Invalid email or password",
            AuthMode::Register => "Registration failed. Please try again.",
        }
    }

    /// Forget typed secrets, e.g. after signing in.
    pub fn reset(&mut self) {
        let mode = self.mode;
        *self = AuthForm::default();
        self.mode = mode;
    }
}

#[derive(Debug, Default)]
pub struct OnboardingScreen {
    pub flow: Resource<OnboardingFlow>,
    pub loader: Loader,
    pub submit_error: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardData {
    pub stories: Vec<Story>,
    pub progress: Vec<StoryProgress>,
    pub todos: Vec<Todo>,
    /// `None` when the emotion series could not be fetched.
    pub emotions: Option<EmotionalTimeseries>,
}

impl DashboardData {
    pub fn progress_for(&self, story_id: &str) -> Option<&StoryProgress> {
        self.progress.iter().find(|p| p.story_id == story_id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DashboardFocus {
    #[default]
    Stories,
    Todos,
}

#[derive(Debug, Default)]
pub struct DashboardScreen {
    pub data: Resource<DashboardData>,
    pub loader: Loader,
    pub focus: DashboardFocus,
    pub story_cursor: usize,
    pub todo_cursor: usize,
    /// Title of a todo being written for the selected story.
    pub composer: Option<TextField>,
}

impl DashboardScreen {
    pub fn selected_story(&self) -> Option<&Story> {
        self.data
            .ready()
            .and_then(|data| data.stories.get(self.story_cursor))
    }

    pub fn selected_todo(&self) -> Option<&Todo> {
        self.data
            .ready()
            .and_then(|data| data.todos.get(self.todo_cursor))
    }

    pub fn move_cursor(&mut self, forward: bool) {
        let Some(data) = self.data.ready() else {
            return;
        };
        let (cursor, len) = match self.focus {
            DashboardFocus::Stories => (&mut self.story_cursor, data.stories.len()),
            DashboardFocus::Todos => (&mut self.todo_cursor, data.todos.len()),
        };
        *cursor = step(*cursor, len, forward);
    }
}

pub const CHAT_FAILURE_REPLY: &str =
    "I apologize, but I'm having trouble processing your message right now. Please try again in a moment.";

#[derive(Debug, Default)]
pub struct ChatScreen {
    pub history: Resource<Vec<ChatMessage>>,
    pub loader: Loader,
    pub input: TextField,
    pub sending: bool,
    pub story_context: Option<String>,
    /// Lines scrolled up from the newest message.
    pub scroll: u16,
}

impl ChatScreen {
    pub fn push(&mut self, message: ChatMessage) {
        if let Some(history) = self.history.ready_mut() {
            history.push(message);
        }
        self.scroll = 0;
    }
}

#[derive(Debug, Clone)]
pub struct ReviewDraft {
    pub rating: u8,
    pub text: TextField,
}

impl Default for ReviewDraft {
    fn default() -> Self {
        Self {
            rating: 5,
            text: TextField::new(),
        }
    }
}

impl ReviewDraft {
    pub fn cycle_rating(&mut self) {
        self.rating = self.rating % 5 + 1;
    }
}

#[derive(Debug, Default)]
pub struct LessonsScreen {
    pub podcasts: Resource<Vec<Podcast>>,
    pub loader: Loader,
    pub cursor: usize,
    pub reviews: Resource<Vec<PodcastReview>>,
    pub reviews_loader: Loader,
    pub draft: Option<ReviewDraft>,
}

impl LessonsScreen {
    pub fn selected(&self) -> Option<&Podcast> {
        self.podcasts
            .ready()
            .and_then(|podcasts| podcasts.get(self.cursor))
    }

    pub fn average_rating(&self) -> Option<f64> {
        let reviews = self.reviews.ready()?;
        if reviews.is_empty() {
            return None;
        }
        let total: u32 = reviews.iter().map(|review| u32::from(review.rating)).sum();
        Some(f64::from(total) / reviews.len() as f64)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimelineData {
    pub decisions: Vec<Decision>,
    pub analytics: FulfillmentAnalytics,
    pub history: Vec<FulfillmentEntry>,
}

pub const DECISION_STATUSES: [&str; 3] = ["considering", "decided", "implemented"];

/// Status a decision moves to next; `None` once implemented.
pub fn next_decision_status(current: Option<&str>) -> Option<&'static str> {
    let position = current
        .and_then(|status| DECISION_STATUSES.iter().position(|known| *known == status))
        .unwrap_or(0);
    DECISION_STATUSES.get(position + 1).copied()
}

#[derive(Debug, Default)]
pub struct TimelineScreen {
    pub data: Resource<TimelineData>,
    pub loader: Loader,
    pub cursor: usize,
    /// Title of a decision being written.
    pub composer: Option<TextField>,
}

impl TimelineScreen {
    pub fn selected(&self) -> Option<&Decision> {
        self.data
            .ready()
            .and_then(|data| data.decisions.get(self.cursor))
    }
}

pub(crate) fn step(cursor: usize, len: usize, forward: bool) -> usize {
    if len == 0 {
        return 0;
    }
    if forward {
        (cursor + 1).min(len - 1)
    } else {
        cursor.saturating_sub(1)
    }
}
