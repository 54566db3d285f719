use std::fmt;

use async_trait::async_trait;
use rand::Rng;
use tracing::debug;

use super::machine::{EndReason, QuizSession, Selection, SessionOutcome, Verdict};
use crate::error::{PromptError, SessionError};

/// Source of answers for a running session.
#[async_trait]
pub trait Prompter: Send {
    /// Present `question` and return the raw reply.
    ///
    /// # Errors
    ///
    /// Returns `PromptError` if no reply can be read.
    async fn ask(&mut self, question: &str) -> Result<String, PromptError>;
}

/// Sink for human-readable session feedback.
#[async_trait]
pub trait SessionReporter: Send {
    /// # Errors
    ///
    /// Returns `PromptError` if the feedback cannot be delivered.
    async fn report(&mut self, event: SessionEvent) -> Result<(), PromptError>;
}

/// Feedback emitted while a session runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    Correct { score: u32 },
    Incorrect,
    NothingLeft,
    Finished { score: u32 },
}

impl fmt::Display for SessionEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionEvent::Correct { score } => write!(f, "CORRECT - {score} right so far."),
            SessionEvent::Incorrect => f.write_str("INCORRECT."),
            SessionEvent::NothingLeft => f.write_str("Nothing left to ask."),
            SessionEvent::Finished { score } => write!(f, "End of quiz. Score: {score}"),
        }
    }
}

impl<R: Rng + Send> QuizSession<R> {
    /// Drive the session to a terminal outcome.
    ///
    /// `io` is asked at most once per pending quiz. A final
    /// [`SessionEvent::Finished`] is always reported before returning `Ok`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Aborted` if asking or reporting fails; the
    /// quiz that was being asked stays consumed.
    pub async fn run<I>(mut self, io: &mut I) -> Result<SessionOutcome, SessionError>
    where
        I: Prompter + SessionReporter + ?Sized,
    {
        loop {
            let question = match self.select() {
                Selection::Done(outcome) => {
                    emit(io, SessionEvent::NothingLeft).await?;
                    emit(
                        io,
                        SessionEvent::Finished {
                            score: outcome.final_score,
                        },
                    )
                    .await?;
                    return Ok(outcome);
                }
                Selection::Ask(quiz) => {
                    debug!(quiz_id = %quiz.id(), "asking quiz");
                    quiz.question().as_str().to_owned()
                }
            };

            let reply = io.ask(&question).await.map_err(SessionError::Aborted)?;

            match self.answer(&reply) {
                Verdict::Correct { score } => {
                    emit(io, SessionEvent::Correct { score }).await?;
                }
                Verdict::Wrong { final_score } => {
                    emit(io, SessionEvent::Incorrect).await?;
                    emit(io, SessionEvent::Finished { score: final_score }).await?;
                    return Ok(SessionOutcome {
                        final_score,
                        reason: EndReason::WrongAnswer,
                    });
                }
                Verdict::NoQuestion => {}
            }
        }
    }
}

async fn emit<I>(io: &mut I, event: SessionEvent) -> Result<(), SessionError>
where
    I: SessionReporter + ?Sized,
{
    io.report(event).await.map_err(SessionError::Aborted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::{Quiz, QuizDraft, QuizId};
    use quiz_core::time::fixed_now;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::{HashMap, VecDeque};

    /// Replies from a script and records every question and event.
    #[derive(Default)]
    struct Scripted {
        replies: VecDeque<String>,
        questions: Vec<String>,
        events: Vec<SessionEvent>,
    }

    impl Scripted {
        fn new(replies: &[&str]) -> Self {
            Self {
                replies: replies.iter().map(|s| (*s).to_owned()).collect(),
                ..Self::default()
            }
        }
    }

    #[async_trait]
    impl Prompter for Scripted {
        async fn ask(&mut self, question: &str) -> Result<String, PromptError> {
            self.questions.push(question.to_owned());
            self.replies.pop_front().ok_or(PromptError::Closed)
        }
    }

    #[async_trait]
    impl SessionReporter for Scripted {
        async fn report(&mut self, event: SessionEvent) -> Result<(), PromptError> {
            self.events.push(event);
            Ok(())
        }
    }

    /// Always answers correctly by looking the question up.
    struct Oracle {
        answers: HashMap<String, String>,
        questions: Vec<String>,
        events: Vec<SessionEvent>,
    }

    #[async_trait]
    impl Prompter for Oracle {
        async fn ask(&mut self, question: &str) -> Result<String, PromptError> {
            self.questions.push(question.to_owned());
            Ok(format!("  {}  ", self.answers[question].to_uppercase()))
        }
    }

    #[async_trait]
    impl SessionReporter for Oracle {
        async fn report(&mut self, event: SessionEvent) -> Result<(), PromptError> {
            self.events.push(event);
            Ok(())
        }
    }

    fn quiz(id: i64, question: &str, answer: &str) -> Quiz {
        QuizDraft::new(question, answer)
            .validate(fixed_now())
            .unwrap()
            .assign_id(QuizId::new(id))
    }

    fn session(quizzes: Vec<Quiz>) -> QuizSession<StdRng> {
        QuizSession::new(quizzes, StdRng::seed_from_u64(2024))
    }

    #[tokio::test]
    async fn empty_session_never_asks() {
        let mut io = Scripted::new(&[]);
        let outcome = session(Vec::new()).run(&mut io).await.unwrap();

        assert_eq!(
            outcome,
            SessionOutcome {
                final_score: 0,
                reason: EndReason::Exhausted,
            }
        );
        assert!(io.questions.is_empty());
        assert_eq!(
            io.events,
            vec![SessionEvent::NothingLeft, SessionEvent::Finished { score: 0 }]
        );
    }

    #[tokio::test]
    async fn single_correct_answer_exhausts_session() {
        let mut io = Scripted::new(&["4"]);
        let outcome = session(vec![quiz(1, "2+2?", "4")])
            .run(&mut io)
            .await
            .unwrap();

        assert_eq!(outcome.final_score, 1);
        assert_eq!(outcome.reason, EndReason::Exhausted);
        assert_eq!(io.questions, vec!["2+2?".to_string()]);
        assert_eq!(
            io.events,
            vec![
                SessionEvent::Correct { score: 1 },
                SessionEvent::NothingLeft,
                SessionEvent::Finished { score: 1 },
            ]
        );
    }

    #[tokio::test]
    async fn first_wrong_answer_stops_before_second_quiz() {
        let mut io = Scripted::new(&["definitely wrong", "unused"]);
        let outcome = session(vec![quiz(1, "2+2?", "4"), quiz(2, "Capital of France", "Paris")])
            .run(&mut io)
            .await
            .unwrap();

        assert_eq!(
            outcome,
            SessionOutcome {
                final_score: 0,
                reason: EndReason::WrongAnswer,
            }
        );
        assert_eq!(io.questions.len(), 1);
        assert_eq!(io.replies.len(), 1);
        assert_eq!(
            io.events,
            vec![SessionEvent::Incorrect, SessionEvent::Finished { score: 0 }]
        );
    }

    #[tokio::test]
    async fn all_quizzes_asked_without_repeats() {
        let quizzes: Vec<Quiz> = (1..=8)
            .map(|i| quiz(i, &format!("question {i}"), &format!("Answer {i}")))
            .collect();
        let answers = quizzes
            .iter()
            .map(|q| (q.question().to_string(), q.answer().to_string()))
            .collect();
        let mut io = Oracle {
            answers,
            questions: Vec::new(),
            events: Vec::new(),
        };

        let outcome = session(quizzes).run(&mut io).await.unwrap();

        assert_eq!(outcome.final_score, 8);
        assert_eq!(outcome.reason, EndReason::Exhausted);
        let mut asked = io.questions.clone();
        asked.sort();
        asked.dedup();
        assert_eq!(asked.len(), 8);
        assert_eq!(io.questions.len(), 8);
    }

    #[tokio::test]
    async fn closed_input_aborts_distinctly() {
        let mut io = Scripted::new(&["4"]);
        let err = session(vec![quiz(1, "2+2?", "4"), quiz(2, "3+1?", "4")])
            .run(&mut io)
            .await
            .unwrap_err();

        assert!(matches!(err, SessionError::Aborted(PromptError::Closed)));
        assert_eq!(io.questions.len(), 2);
        assert!(!io.events.iter().any(|e| matches!(e, SessionEvent::Finished { .. })));
    }

    #[test]
    fn events_render_human_readable_lines() {
        assert_eq!(
            SessionEvent::Correct { score: 2 }.to_string(),
            "CORRECT - 2 right so far."
        );
        assert_eq!(SessionEvent::NothingLeft.to_string(), "Nothing left to ask.");
        assert_eq!(
            SessionEvent::Finished { score: 3 }.to_string(),
            "End of quiz. Score: 3"
        );
    }
}
