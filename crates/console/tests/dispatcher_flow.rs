use std::io::Cursor;

use console::{CommandError, Dispatcher, Terminal};
use quiz_core::model::{QuizDraft, QuizId};
use quiz_core::time::fixed_clock;
use services::QuizService;
use storage::repository::Storage;

type MemTerminal = Terminal<Cursor<Vec<u8>>, Vec<u8>>;

fn service() -> QuizService {
    QuizService::new(fixed_clock(), Storage::in_memory().quizzes)
}

fn terminal(script: &str) -> MemTerminal {
    Terminal::new(Cursor::new(script.as_bytes().to_vec()), Vec::new()).with_color(false)
}

/// Run the whole command loop over `script` and return everything written.
async fn drive(dispatcher: &Dispatcher, script: &str) -> String {
    let mut term = terminal(script);
    dispatcher.serve(&mut term).await.unwrap();
    String::from_utf8(term.into_parts().1).unwrap()
}

#[tokio::test]
async fn greets_and_says_bye_on_quit() {
    let out = drive(&Dispatcher::new(service()), "quit\nlist\n").await;

    assert!(out.contains("CORE Quiz"));
    assert!(out.ends_with("Bye!\n"));
    // nothing after quit is read
    assert_eq!(out.matches("quiz > ").count(), 1);
}

#[tokio::test]
async fn end_of_input_ends_the_session_cleanly() {
    let out = drive(&Dispatcher::new(service()), "help\n").await;

    assert!(out.contains("  q|quit - Leave the console."));
    assert!(out.ends_with("Bye!\n"));
}

#[tokio::test]
async fn add_list_show_edit_delete() {
    let svc = service();
    let dispatcher = Dispatcher::new(svc.clone());
    let script = "add\nCapital of Italy\nRome\n\
                  list\n\
                  show 1\n\
                  edit 1\n\nRoma\n\
                  delete 1\n\
                  list\n";

    let out = drive(&dispatcher, script).await;

    assert!(out.contains("Added: Capital of Italy => Rome"));
    assert!(out.contains("[1]: Capital of Italy\n"));
    assert!(out.contains("[1]: Capital of Italy => Rome"));
    assert!(out.contains("Enter a question [Capital of Italy]: "));
    assert!(out.contains("Quiz 1 changed to: Capital of Italy => Roma"));
    assert!(out.contains("Deleted quiz 1"));
    assert!(svc.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn bad_ids_are_reported_and_loop_continues() {
    let out = drive(
        &Dispatcher::new(service()),
        "show\nshow abc\nshow 9\ndelete 12abc\nedit 9\ntest abc\ntest\nlist\n",
    )
    .await;

    assert_eq!(out.matches("Error: missing id parameter").count(), 2);
    assert_eq!(out.matches("Error: `abc` is not a valid id").count(), 2);
    assert_eq!(out.matches("Error: no quiz with id 9").count(), 2);
    assert!(out.contains("Error: no quiz with id 12"));
    // edit fails before asking anything
    assert!(!out.contains("Enter a question"));
    assert_eq!(out.matches("quiz > ").count(), 9);
}

#[tokio::test]
async fn blank_add_is_a_validation_failure() {
    let svc = service();
    let out = drive(&Dispatcher::new(svc.clone()), "add\n   \nRome\n").await;

    assert!(out.contains("Error: invalid quiz"));
    assert!(svc.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_command_grades_answer() {
    let svc = service();
    svc.create(QuizDraft::new("2+2?", "4")).await.unwrap();
    let dispatcher = Dispatcher::new(svc);

    let right = drive(&dispatcher, "test 1\n 4 \n").await;
    assert!(right.contains("2+2?: "));
    assert!(right.contains("Your answer is:\nCorrect\n"));

    let wrong = drive(&dispatcher, "test 1\nfive\n").await;
    assert!(wrong.contains("Your answer is:\nIncorrect\n"));
}

#[tokio::test]
async fn play_runs_until_first_mistake() {
    let svc = service();
    svc.create(QuizDraft::new("2+2?", "4")).await.unwrap();
    svc.create(QuizDraft::new("3+3?", "6")).await.unwrap();
    let dispatcher = Dispatcher::new(svc).with_seed(7);

    let out = drive(&dispatcher, "play\nwrong\nlist\n").await;

    assert!(out.contains("INCORRECT."));
    assert!(out.contains("End of quiz. Score:\n"));
    assert!(out.contains("│ 0 │"));
    // back at the prompt afterwards
    assert!(out.contains("[2]: 3+3?"));
}

#[tokio::test]
async fn play_on_empty_store_scores_zero() {
    let out = drive(&Dispatcher::new(service()), "p\n").await;

    assert!(out.contains("Nothing left to ask."));
    assert!(out.contains("│ 0 │"));
}

#[tokio::test]
async fn unknown_command_suggests_help() {
    let out = drive(&Dispatcher::new(service()), "frobnicate\n").await;

    assert!(out.contains("Unknown command: 'frobnicate'"));
    assert!(out.contains("Use help to list all available commands."));
}

#[tokio::test]
async fn tab_line_lists_completions() {
    let out = drive(&Dispatcher::new(service()), "de\t\n").await;
    assert!(out.contains("quiz > delete\n"));
}

#[tokio::test]
async fn credits_lists_configured_names() {
    let dispatcher = Dispatcher::new(service()).with_credits(vec!["Ada Lovelace".into()]);
    let out = drive(&dispatcher, "credits\n").await;
    assert!(out.contains("Credits:\nAda Lovelace\n"));
}

#[tokio::test]
async fn input_closed_mid_prompt_is_fatal() {
    let svc = service();
    let dispatcher = Dispatcher::new(svc.clone());
    let mut term = terminal("add\nonly a question\n");

    let err = dispatcher.serve(&mut term).await.unwrap_err();

    assert!(err.is_fatal());
    assert!(matches!(err, CommandError::ConnectionLost(_)));
    assert!(svc.get(QuizId::new(1)).await.is_err());
}
