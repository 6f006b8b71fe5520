//! Personality questionnaire that gates the main screens.

use crate::api::{endpoints, ApiError, PersonalityAnswer, PersonalityQuestion};
use crate::core::session::{SessionController, SessionState};
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnboardingPhase {
    Displaying(usize),
    Submitting,
    Reloaded,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextOutcome {
    Advanced,
    /// The last question was answered; submit these answers as one batch.
    Submit(Vec<PersonalityAnswer>),
    NothingSelected,
}

/// Question-by-question answer collection. `answers[i]` holds the recorded
/// answer for `questions[i]` and is what "previous" restores.
#[derive(Debug, Clone)]
pub struct OnboardingFlow {
    questions: Vec<PersonalityQuestion>,
    answers: Vec<Option<PersonalityAnswer>>,
    selected: Option<usize>,
    phase: OnboardingPhase,
}

impl OnboardingFlow {
    pub fn new(questions: Vec<PersonalityQuestion>) -> Self {
        let answers = vec![None; questions.len()];
        Self {
            questions,
            answers,
            selected: None,
            phase: OnboardingPhase::Displaying(0),
        }
    }

    pub fn phase(&self) -> OnboardingPhase {
        self.phase
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn index(&self) -> Option<usize> {
        match self.phase {
            OnboardingPhase::Displaying(index) => Some(index),
            _ => None,
        }
    }

    pub fn current_question(&self) -> Option<&PersonalityQuestion> {
        self.index().and_then(|index| self.questions.get(index))
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn recorded(&self, index: usize) -> Option<&PersonalityAnswer> {
        self.answers.get(index).and_then(Option::as_ref)
    }

    pub fn is_last(&self) -> bool {
        self.index()
            .is_some_and(|index| index + 1 == self.questions.len())
    }

    /// Choose an option of the current question. Out-of-range choices are
    /// ignored.
    pub fn select(&mut self, option: usize) -> bool {
        match self.current_question() {
            Some(question) if option < question.options.len() => {
                self.selected = Some(option);
                true
            }
            _ => false,
        }
    }

    /// Move the selection up or down within the current options.
    pub fn cycle_selection(&mut self, forward: bool) {
        let Some(count) = self.current_question().map(|q| q.options.len()) else {
            return;
        };
        if count == 0 {
            return;
        }
        let next = match (self.selected, forward) {
            (None, true) => 0,
            (None, false) => count - 1,
            (Some(current), true) => (current + 1) % count,
            (Some(current), false) => (current + count - 1) % count,
        };
        self.selected = Some(next);
    }

    /// Record the selection for the current question and advance, or hand
    /// back every answer when the current question is the last one.
    pub fn next(&mut self) -> NextOutcome {
        let Some(index) = self.index() else {
            return NextOutcome::NothingSelected;
        };
        let (Some(question), Some(option)) = (self.questions.get(index), self.selected) else {
            return NextOutcome::NothingSelected;
        };
        let Some(text) = question.options.get(option) else {
            return NextOutcome::NothingSelected;
        };

        self.answers[index] = Some(PersonalityAnswer {
            question_id: question.id.clone(),
            answer_index: option,
            answer_text: text.clone(),
        });

        if index + 1 < self.questions.len() {
            self.phase = OnboardingPhase::Displaying(index + 1);
            self.selected = self.recorded(index + 1).map(|answer| answer.answer_index);
            NextOutcome::Advanced
        } else {
            self.phase = OnboardingPhase::Submitting;
            NextOutcome::Submit(self.answers.iter().flatten().cloned().collect())
        }
    }

    /// Step back one question, selecting the answer recorded for it.
    pub fn previous(&mut self) -> bool {
        match self.index() {
            Some(index) if index > 0 => {
                self.phase = OnboardingPhase::Displaying(index - 1);
                self.selected = self.recorded(index - 1).map(|answer| answer.answer_index);
                true
            }
            _ => false,
        }
    }

    /// Back to the last question with every recorded answer intact.
    pub fn submission_failed(&mut self) {
        let last = self.questions.len().saturating_sub(1);
        self.phase = OnboardingPhase::Displaying(last);
        self.selected = self.recorded(last).map(|answer| answer.answer_index);
    }

    pub fn submission_succeeded(&mut self) {
        self.phase = OnboardingPhase::Reloaded;
    }
}

/// Post the answers, then re-resolve the session so the onboarding flag the
/// server just flipped takes effect.
pub async fn submit_answers(
    session: &SessionController,
    answers: &[PersonalityAnswer],
) -> Result<SessionState, ApiError> {
    endpoints::submit_personality(session.client(), answers).await?;
    info!(answers = answers.len(), "personality answers submitted");
    Ok(session.refresh().await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::router::ScreenSet;
    use crate::core::token_store::MemoryTokenStore;
    use crate::utils::test_utils::{test_client, MockResponse, MockServer};
    use serde_json::json;
    use std::sync::Arc;

    fn question(id: &str, options: &[&str]) -> PersonalityQuestion {
        PersonalityQuestion {
            id: id.to_string(),
            question: format!("Question {id}?"),
            options: options.iter().map(|option| option.to_string()).collect(),
            category: None,
        }
    }

    fn three_questions() -> OnboardingFlow {
        OnboardingFlow::new(vec![
            question("q1", &["A", "B"]),
            question("q2", &["A", "B", "C"]),
            question("q3", &["A", "B"]),
        ])
    }

    #[test]
    fn next_requires_a_selection() {
        let mut flow = three_questions();
        assert_eq!(flow.next(), NextOutcome::NothingSelected);
        assert!(!flow.select(5));
        assert_eq!(flow.phase(), OnboardingPhase::Displaying(0));
    }

    #[test]
    fn previous_restores_the_recorded_answer() {
        let mut flow = three_questions();
        flow.select(0);
        assert_eq!(flow.next(), NextOutcome::Advanced);
        flow.select(2);
        assert_eq!(flow.next(), NextOutcome::Advanced);
        flow.select(1);

        assert!(flow.previous());
        assert_eq!(flow.phase(), OnboardingPhase::Displaying(1));
        assert_eq!(flow.selected(), Some(2));
        assert_eq!(flow.recorded(1).map(|a| a.answer_text.as_str()), Some("C"));
    }

    #[test]
    fn last_answer_submits_the_whole_batch() {
        let mut flow = OnboardingFlow::new(vec![
            question("q1", &["A", "B"]),
            question("q2", &["A", "B"]),
        ]);
        flow.select(0);
        flow.next();
        flow.select(1);

        let NextOutcome::Submit(answers) = flow.next() else {
            panic!("expected submission");
        };
        assert_eq!(flow.phase(), OnboardingPhase::Submitting);
        assert_eq!(
            answers,
            vec![
                PersonalityAnswer {
                    question_id: "q1".into(),
                    answer_index: 0,
                    answer_text: "A".into()
                },
                PersonalityAnswer {
                    question_id: "q2".into(),
                    answer_index: 1,
                    answer_text: "B".into()
                },
            ]
        );
    }

    #[test]
    fn failed_submission_returns_to_last_question() {
        let mut flow = three_questions();
        for option in [0, 1, 1] {
            flow.select(option);
            flow.next();
        }
        flow.submission_failed();

        assert_eq!(flow.phase(), OnboardingPhase::Displaying(2));
        assert_eq!(flow.selected(), Some(1));
        assert!((0..3).all(|index| flow.recorded(index).is_some()));
    }

    #[test]
    fn revisiting_an_answered_question_keeps_its_selection() {
        let mut flow = three_questions();
        flow.select(1);
        flow.next();
        flow.previous();
        assert_eq!(flow.selected(), Some(1));
        flow.next();
        assert_eq!(flow.selected(), None);
    }

    #[test]
    fn selection_cycles_through_options() {
        let mut flow = three_questions();
        flow.cycle_selection(false);
        assert_eq!(flow.selected(), Some(1));
        flow.cycle_selection(true);
        assert_eq!(flow.selected(), Some(0));
    }

    #[tokio::test]
    async fn submission_moves_the_user_to_the_main_screens() {
        let server = MockServer::start(vec![
            (
                "GET",
                "/api/auth/me",
                MockResponse::json(
                    200,
                    json!({"id": "u", "email": "a@b.com", "full_name": "A", "personality_test_completed": false}),
                ),
            ),
            (
                "GET",
                "/api/auth/me",
                MockResponse::json(
                    200,
                    json!({"id": "u", "email": "a@b.com", "full_name": "A", "personality_test_completed": true}),
                ),
            ),
            (
                "POST",
                "/api/personality/submit",
                MockResponse::json(200, json!({"message": "ok"})),
            ),
        ])
        .await;
        let session =
            SessionController::new(test_client(&server, Arc::new(MemoryTokenStore::with_token("t"))));
        let before = session.bootstrap().await;
        assert_eq!(ScreenSet::for_session(&before), Some(ScreenSet::Onboarding));

        let answers = vec![
            PersonalityAnswer {
                question_id: "q1".into(),
                answer_index: 0,
                answer_text: "A".into(),
            },
            PersonalityAnswer {
                question_id: "q2".into(),
                answer_index: 1,
                answer_text: "B".into(),
            },
        ];
        let after = submit_answers(&session, &answers).await.unwrap();

        assert_eq!(ScreenSet::for_session(&after), Some(ScreenSet::Main));
        let requests = server.requests().await;
        let body: serde_json::Value = serde_json::from_str(&requests[1].body).unwrap();
        assert_eq!(body["answers"][1]["answer_text"], "B");
    }

    #[tokio::test]
    async fn failed_submission_does_not_refresh() {
        let server = MockServer::start(vec![(
            "POST",
            "/api/personality/submit",
            MockResponse::json(422, json!({"detail": "invalid"})),
        )])
        .await;
        let session =
            SessionController::new(test_client(&server, Arc::new(MemoryTokenStore::with_token("t"))));

        let err = submit_answers(&session, &[]).await.unwrap_err();
        assert_eq!(err.status().map(|s| s.as_u16()), Some(422));
        assert_eq!(server.requests().await.len(), 1);
    }
}
