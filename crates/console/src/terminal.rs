use async_trait::async_trait;
use services::{PromptError, Prompter, SessionEvent, SessionReporter};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::banner::render_banner;
use crate::style::{Color, Palette};

/// Longest accepted input line, newline included.
pub const MAX_LINE_BYTES: usize = 8 * 1024;

/// Output sink plus line reader for one connection.
///
/// Generic over the stream halves so the console can be driven from
/// in-memory buffers as well as a `TcpStream`.
pub struct Terminal<R, W> {
    reader: R,
    writer: W,
    palette: Palette,
}

impl<R, W> Terminal<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    #[must_use]
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            reader,
            writer,
            palette: Palette::default(),
        }
    }

    #[must_use]
    pub fn with_color(mut self, enabled: bool) -> Self {
        self.palette = Palette::new(enabled);
        self
    }

    #[must_use]
    pub fn palette(&self) -> Palette {
        self.palette
    }

    pub fn into_parts(self) -> (R, W) {
        (self.reader, self.writer)
    }

    /// Write one line, optionally coloured.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error.
    pub async fn write(&mut self, text: &str, color: Option<Color>) -> std::io::Result<()> {
        let line = self.palette.paint(text, color);
        self.send(&line).await
    }

    /// Write `text` framed as a banner.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error.
    pub async fn write_banner(&mut self, text: &str, color: Option<Color>) -> std::io::Result<()> {
        let mut out = String::new();
        for line in render_banner(text) {
            out.push_str(&self.palette.paint(&line, color));
            out.push('\n');
        }
        self.writer.write_all(out.as_bytes()).await?;
        self.writer.flush().await
    }

    /// Write a single-line error message.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error.
    pub async fn write_error(&mut self, text: &str) -> std::io::Result<()> {
        let line = format!(
            "{}: {}",
            self.palette.paint("Error", Some(Color::Red)),
            self.palette.alarm(text)
        );
        self.send(&line).await
    }

    /// Write `prompt` without a newline and read one line.
    ///
    /// The trailing `\n` / `\r\n` is stripped. Returns `Ok(None)` at end of input.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error, or `InvalidData` when the line is
    /// longer than [`MAX_LINE_BYTES`].
    pub async fn read_line(&mut self, prompt: &str) -> std::io::Result<Option<String>> {
        self.writer.write_all(prompt.as_bytes()).await?;
        self.writer.flush().await?;

        let mut buf = Vec::new();
        let limit = MAX_LINE_BYTES as u64;
        let n = (&mut self.reader).take(limit).read_until(b'\n', &mut buf).await?;
        if n == 0 {
            return Ok(None);
        }
        if n == MAX_LINE_BYTES && buf.last() != Some(&b'\n') {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                "input line too long",
            ));
        }
        if buf.last() == Some(&b'\n') {
            buf.pop();
            if buf.last() == Some(&b'\r') {
                buf.pop();
            }
        }
        Ok(Some(String::from_utf8_lossy(&buf).into_owned()))
    }

    /// Like [`Terminal::read_line`] but end of input is an error.
    ///
    /// # Errors
    ///
    /// Returns `PromptError::Closed` at end of input.
    pub async fn question(&mut self, prompt: &str) -> Result<String, PromptError> {
        self.read_line(prompt).await?.ok_or(PromptError::Closed)
    }

    async fn send(&mut self, line: &str) -> std::io::Result<()> {
        self.writer.write_all(line.as_bytes()).await?;
        self.writer.write_all(b"\n").await?;
        self.writer.flush().await
    }
}

#[async_trait]
impl<R, W> Prompter for Terminal<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    async fn ask(&mut self, question: &str) -> Result<String, PromptError> {
        let prompt = format!("{}: ", self.palette.paint(question, Some(Color::Red)));
        self.question(&prompt).await
    }
}

#[async_trait]
impl<R, W> SessionReporter for Terminal<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    async fn report(&mut self, event: SessionEvent) -> Result<(), PromptError> {
        match event {
            SessionEvent::Finished { score } => {
                self.write("End of quiz. Score:", None).await?;
                self.write_banner(&score.to_string(), Some(Color::Magenta))
                    .await?;
            }
            SessionEvent::Incorrect => self.write(&event.to_string(), Some(Color::Red)).await?,
            SessionEvent::Correct { .. } | SessionEvent::NothingLeft => {
                self.write(&event.to_string(), None).await?;
            }
        }
        Ok(())
    }
}
