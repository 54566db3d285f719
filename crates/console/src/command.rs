/// Every token the console understands, in help order. Completion draws from this set.
pub const COMMAND_TOKENS: [&str; 13] = [
    "h", "help", "list", "show", "add", "delete", "edit", "test", "p", "play", "credits", "q",
    "quit",
];

/// Lines printed by `help`.
pub const HELP_LINES: [&str; 10] = [
    "  h|help - Show this help.",
    "  list - List all quizzes.",
    "  show <id> - Show the question and answer of a quiz.",
    "  add - Add a new quiz.",
    "  delete <id> - Delete a quiz.",
    "  edit <id> - Edit a quiz.",
    "  test <id> - Try to answer a quiz.",
    "  p|play - Play: answer every quiz in random order.",
    "  credits - Credits.",
    "  q|quit - Leave the console.",
];

/// One parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Empty,
    Help,
    List,
    Show(Option<String>),
    Add,
    Delete(Option<String>),
    Edit(Option<String>),
    Test(Option<String>),
    Play,
    Credits,
    Quit,
    Unknown(String),
}

impl Command {
    /// Split on single spaces; the first token picks the command and the
    /// second, if any, is its argument. Extra tokens are ignored.
    #[must_use]
    pub fn parse(line: &str) -> Self {
        let mut tokens = line.split(' ');
        let cmd = tokens.next().unwrap_or_default().trim().to_lowercase();
        let arg = tokens.next().map(str::to_owned);

        match cmd.as_str() {
            "" => Self::Empty,
            "h" | "help" => Self::Help,
            "list" => Self::List,
            "show" => Self::Show(arg),
            "add" => Self::Add,
            "delete" => Self::Delete(arg),
            "edit" => Self::Edit(arg),
            "test" => Self::Test(arg),
            "p" | "play" => Self::Play,
            "credits" => Self::Credits,
            "q" | "quit" => Self::Quit,
            _ => Self::Unknown(cmd),
        }
    }
}

/// Tokens starting with `prefix`, or all of them when nothing matches.
#[must_use]
pub fn complete(prefix: &str) -> Vec<&'static str> {
    let hits: Vec<&'static str> = COMMAND_TOKENS
        .iter()
        .copied()
        .filter(|token| token.starts_with(prefix))
        .collect();
    if hits.is_empty() {
        COMMAND_TOKENS.to_vec()
    } else {
        hits
    }
}
