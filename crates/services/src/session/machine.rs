use quiz_core::model::{Quiz, QuizId};
use rand::Rng;

use super::progress::SessionProgress;

//
// ─── OUTCOME ───────────────────────────────────────────────────────────────────
//

/// Why a session reached `Done`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndReason {
    /// Every quiz was asked and answered correctly (or there were none).
    Exhausted,
    /// The last answer did not match.
    WrongAnswer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionOutcome {
    pub final_score: u32,
    pub reason: EndReason,
}

//
// ─── STATE MACHINE ─────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Selecting,
    AwaitingAnswer,
    ScoredContinue,
    Done(EndReason),
}

/// Result of [`QuizSession::select`].
#[derive(Debug, PartialEq, Eq)]
pub enum Selection<'a> {
    Ask(&'a Quiz),
    Done(SessionOutcome),
}

/// Result of [`QuizSession::answer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Correct { score: u32 },
    Wrong { final_score: u32 },
    /// No question was pending; nothing changed.
    NoQuestion,
}

/// One randomized run over a snapshot of quizzes.
///
/// Quizzes are drawn uniformly without replacement: a random index into the
/// pending list is removed before the answer is known, so a quiz is never
/// asked twice even if the session is abandoned mid-question.
pub struct QuizSession<R> {
    pending: Vec<Quiz>,
    current: Option<Quiz>,
    asked: Vec<QuizId>,
    total: usize,
    score: u32,
    state: SessionState,
    rng: R,
}

impl<R: Rng> QuizSession<R> {
    #[must_use]
    pub fn new(quizzes: Vec<Quiz>, rng: R) -> Self {
        Self {
            total: quizzes.len(),
            pending: quizzes,
            current: None,
            asked: Vec::new(),
            score: 0,
            state: SessionState::Selecting,
            rng,
        }
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    /// Ids in the order they were asked.
    #[must_use]
    pub fn asked(&self) -> &[QuizId] {
        &self.asked
    }

    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        SessionProgress {
            total: self.total,
            asked: self.asked.len(),
            remaining: self.pending.len(),
            score: self.score,
            is_complete: matches!(self.state, SessionState::Done(_)),
        }
    }

    /// The outcome once the session is `Done`.
    #[must_use]
    pub fn outcome(&self) -> Option<SessionOutcome> {
        match self.state {
            SessionState::Done(reason) => Some(SessionOutcome {
                final_score: self.score,
                reason,
            }),
            _ => None,
        }
    }

    /// Draw the next quiz, or finish when nothing is pending.
    ///
    /// While a question is pending this returns it again without drawing.
    pub fn select(&mut self) -> Selection<'_> {
        match self.state {
            SessionState::Done(reason) => {
                return Selection::Done(SessionOutcome {
                    final_score: self.score,
                    reason,
                });
            }
            SessionState::AwaitingAnswer => {}
            SessionState::Selecting | SessionState::ScoredContinue => {
                if self.pending.is_empty() {
                    self.state = SessionState::Done(EndReason::Exhausted);
                    return Selection::Done(SessionOutcome {
                        final_score: self.score,
                        reason: EndReason::Exhausted,
                    });
                }
                let idx = self.rng.random_range(0..self.pending.len());
                let quiz = self.pending.remove(idx);
                self.asked.push(quiz.id());
                self.current = Some(quiz);
                self.state = SessionState::AwaitingAnswer;
            }
        }

        match &self.current {
            Some(quiz) => Selection::Ask(quiz),
            None => Selection::Done(SessionOutcome {
                final_score: self.score,
                reason: EndReason::Exhausted,
            }),
        }
    }

    /// Judge the reply to the pending question.
    pub fn answer(&mut self, reply: &str) -> Verdict {
        if self.state != SessionState::AwaitingAnswer {
            return Verdict::NoQuestion;
        }
        let Some(quiz) = self.current.take() else {
            return Verdict::NoQuestion;
        };

        if quiz.is_correct(reply) {
            self.score += 1;
            self.state = SessionState::ScoredContinue;
            Verdict::Correct { score: self.score }
        } else {
            self.state = SessionState::Done(EndReason::WrongAnswer);
            Verdict::Wrong {
                final_score: self.score,
            }
        }
    }
}
