use std::sync::Arc;

use quiz_core::model::{QuizDraft, validate_id};
use rand::SeedableRng;
use rand::rngs::StdRng;
use services::QuizService;
use tokio::io::{AsyncBufRead, AsyncWrite};
use tracing::{debug, info};

use crate::command::{Command, HELP_LINES, complete};
use crate::error::CommandError;
use crate::style::Color;
use crate::terminal::Terminal;

const PROMPT: &str = "quiz > ";
const WELCOME: &str = "CORE Quiz";

/// What the command loop does after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Maps input lines to quiz operations for one connection at a time.
///
/// Cheap to clone; every connection gets its own copy.
#[derive(Clone)]
pub struct Dispatcher {
    quizzes: QuizService,
    credits: Arc<[String]>,
    seed: Option<u64>,
}

impl Dispatcher {
    #[must_use]
    pub fn new(quizzes: QuizService) -> Self {
        Self {
            quizzes,
            credits: Arc::from(Vec::new()),
            seed: None,
        }
    }

    #[must_use]
    pub fn with_credits(mut self, credits: Vec<String>) -> Self {
        self.credits = credits.into();
        self
    }

    /// Fix the RNG seed used by `play`, for reproducible runs.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Run the command loop until `quit` or end of input.
    ///
    /// # Errors
    ///
    /// Returns `CommandError::ConnectionLost` if the stream fails; every
    /// other command error is reported on the terminal and the loop goes on.
    pub async fn serve<R, W>(&self, term: &mut Terminal<R, W>) -> Result<(), CommandError>
    where
        R: AsyncBufRead + Unpin + Send,
        W: AsyncWrite + Unpin + Send,
    {
        term.write_banner(WELCOME, Some(Color::Green)).await?;
        let prompt = term.palette().paint(PROMPT, Some(Color::Blue));

        while let Some(line) = term.read_line(&prompt).await? {
            if let Some(prefix) = line.strip_suffix('\t') {
                term.write(&complete(prefix).join("  "), None).await?;
                continue;
            }

            let command = Command::parse(&line);
            debug!(?command, "dispatching");
            match self.dispatch(command, term).await {
                Ok(Flow::Continue) => {}
                Ok(Flow::Quit) => break,
                Err(err) if err.is_fatal() => return Err(err),
                Err(err) => term.write_error(&err.to_string()).await?,
            }
        }

        if let Err(err) = term.write("Bye!", None).await {
            debug!("could not say goodbye: {err}");
        }
        Ok(())
    }

    /// Execute one parsed command.
    ///
    /// # Errors
    ///
    /// Returns the `CommandError` the command failed with.
    pub async fn dispatch<R, W>(
        &self,
        command: Command,
        term: &mut Terminal<R, W>,
    ) -> Result<Flow, CommandError>
    where
        R: AsyncBufRead + Unpin + Send,
        W: AsyncWrite + Unpin + Send,
    {
        match command {
            Command::Empty => {}
            Command::Help => self.help(term).await?,
            Command::List => self.list(term).await?,
            Command::Show(arg) => self.show(term, arg.as_deref()).await?,
            Command::Add => self.add(term).await?,
            Command::Delete(arg) => self.delete(term, arg.as_deref()).await?,
            Command::Edit(arg) => self.edit(term, arg.as_deref()).await?,
            Command::Test(arg) => self.test(term, arg.as_deref()).await?,
            Command::Play => self.play(term).await?,
            Command::Credits => self.credits(term).await?,
            Command::Quit => return Ok(Flow::Quit),
            Command::Unknown(token) => {
                let p = term.palette();
                term.write(
                    &format!("Unknown command: '{}'", p.paint(&token, Some(Color::Red))),
                    None,
                )
                .await?;
                term.write(
                    &format!(
                        "Use {} to list all available commands.",
                        p.paint("help", Some(Color::Green))
                    ),
                    None,
                )
                .await?;
            }
        }
        Ok(Flow::Continue)
    }

    async fn help<R, W>(&self, term: &mut Terminal<R, W>) -> Result<(), CommandError>
    where
        R: AsyncBufRead + Unpin + Send,
        W: AsyncWrite + Unpin + Send,
    {
        term.write("Commands:", None).await?;
        for line in HELP_LINES {
            term.write(line, None).await?;
        }
        Ok(())
    }

    async fn list<R, W>(&self, term: &mut Terminal<R, W>) -> Result<(), CommandError>
    where
        R: AsyncBufRead + Unpin + Send,
        W: AsyncWrite + Unpin + Send,
    {
        let p = term.palette();
        for quiz in self.quizzes.list().await? {
            let id = quiz.id().to_string();
            term.write(
                &format!("[{}]: {}", p.paint(&id, Some(Color::Magenta)), quiz.question()),
                None,
            )
            .await?;
        }
        Ok(())
    }

    async fn show<R, W>(&self, term: &mut Terminal<R, W>, arg: Option<&str>) -> Result<(), CommandError>
    where
        R: AsyncBufRead + Unpin + Send,
        W: AsyncWrite + Unpin + Send,
    {
        let id = validate_id(arg)?;
        let quiz = self.quizzes.get(id).await?;
        let p = term.palette();
        term.write(
            &format!(
                "[{}]: {} {} {}",
                p.paint(&id.to_string(), Some(Color::Magenta)),
                quiz.question(),
                p.paint("=>", Some(Color::Magenta)),
                quiz.answer()
            ),
            None,
        )
        .await?;
        Ok(())
    }

    async fn add<R, W>(&self, term: &mut Terminal<R, W>) -> Result<(), CommandError>
    where
        R: AsyncBufRead + Unpin + Send,
        W: AsyncWrite + Unpin + Send,
    {
        let p = term.palette();
        let question = term
            .question(&p.paint("Enter a question: ", Some(Color::Red)))
            .await?;
        let answer = term
            .question(&p.paint("Enter the answer: ", Some(Color::Red)))
            .await?;

        let quiz = self.quizzes.create(QuizDraft::new(question, answer)).await?;
        term.write(
            &format!(
                "{}: {} {} {}",
                p.paint("Added", Some(Color::Magenta)),
                quiz.question(),
                p.paint("=>", Some(Color::Magenta)),
                quiz.answer()
            ),
            None,
        )
        .await?;
        Ok(())
    }

    async fn delete<R, W>(
        &self,
        term: &mut Terminal<R, W>,
        arg: Option<&str>,
    ) -> Result<(), CommandError>
    where
        R: AsyncBufRead + Unpin + Send,
        W: AsyncWrite + Unpin + Send,
    {
        let id = validate_id(arg)?;
        self.quizzes.delete(id).await?;
        let p = term.palette();
        term.write(
            &format!("Deleted quiz {}", p.paint(&id.to_string(), Some(Color::Magenta))),
            None,
        )
        .await?;
        Ok(())
    }

    /// Ask for both fields again. The prompt shows the stored value and an
    /// empty reply keeps it.
    async fn edit<R, W>(&self, term: &mut Terminal<R, W>, arg: Option<&str>) -> Result<(), CommandError>
    where
        R: AsyncBufRead + Unpin + Send,
        W: AsyncWrite + Unpin + Send,
    {
        let id = validate_id(arg)?;
        let quiz = self.quizzes.get(id).await?;
        let p = term.palette();

        let question = term
            .question(&format!(
                "{}[{}]: ",
                p.paint("Enter a question ", Some(Color::Red)),
                quiz.question()
            ))
            .await?;
        let answer = term
            .question(&format!(
                "{}[{}]: ",
                p.paint("Enter the answer ", Some(Color::Red)),
                quiz.answer()
            ))
            .await?;

        let question = keep_if_blank(question, quiz.question().as_str());
        let answer = keep_if_blank(answer, quiz.answer().as_str());
        let updated = self
            .quizzes
            .update(id, QuizDraft::new(question, answer))
            .await?;

        term.write(
            &format!(
                "Quiz {} changed to: {} {} {}",
                p.paint(&id.to_string(), Some(Color::Magenta)),
                updated.question(),
                p.paint("=>", Some(Color::Magenta)),
                updated.answer()
            ),
            None,
        )
        .await?;
        Ok(())
    }

    async fn test<R, W>(&self, term: &mut Terminal<R, W>, arg: Option<&str>) -> Result<(), CommandError>
    where
        R: AsyncBufRead + Unpin + Send,
        W: AsyncWrite + Unpin + Send,
    {
        let id = validate_id(arg)?;
        let quiz = self.quizzes.get(id).await?;
        let p = term.palette();

        let reply = term
            .question(&format!(
                "{}: ",
                p.paint(quiz.question().as_str(), Some(Color::Red))
            ))
            .await?;

        term.write("Your answer is:", None).await?;
        if quiz.is_correct(&reply) {
            term.write("Correct", Some(Color::Green)).await?;
        } else {
            term.write("Incorrect", Some(Color::Red)).await?;
        }
        Ok(())
    }

    async fn play<R, W>(&self, term: &mut Terminal<R, W>) -> Result<(), CommandError>
    where
        R: AsyncBufRead + Unpin + Send,
        W: AsyncWrite + Unpin + Send,
    {
        let rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_rng(&mut rand::rng()),
        };
        let session = self.quizzes.new_session(rng).await?;
        let total = session.progress().total;

        let outcome = session.run(term).await?;
        info!(
            total,
            score = outcome.final_score,
            reason = ?outcome.reason,
            "quiz session finished"
        );
        Ok(())
    }

    async fn credits<R, W>(&self, term: &mut Terminal<R, W>) -> Result<(), CommandError>
    where
        R: AsyncBufRead + Unpin + Send,
        W: AsyncWrite + Unpin + Send,
    {
        term.write("Credits:", None).await?;
        for line in self.credits.iter() {
            term.write(line, Some(Color::Green)).await?;
        }
        Ok(())
    }
}

fn keep_if_blank(reply: String, current: &str) -> String {
    if reply.trim().is_empty() {
        current.to_owned()
    } else {
        reply
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_edit_reply_keeps_current_value() {
        assert_eq!(keep_if_blank("  ".into(), "Rome"), "Rome");
        assert_eq!(keep_if_blank("Roma".into(), "Rome"), "Roma");
    }
}
