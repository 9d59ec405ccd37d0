use std::sync::Arc;

use dioxus::prelude::Key;

use quiz_core::bank::QuestionBank;
use quiz_core::config::CHECKPOINT_KEY;
use quiz_core::model::TopicId;
use quiz_core::resume::ResumeFile;
use quiz_core::session::SessionMode;
use services::{BankOrigin, QuizCommand};
use storage::repository::{CheckpointRepository, InMemoryRepository};

use super::quiz::option_key_commands;
use super::test_harness::{ViewHarness, setup_quiz_harness, two_cpp_questions};

fn resume(name: &str, size_bytes: u64) -> ResumeFile {
    ResumeFile {
        name: name.to_string(),
        size_bytes,
        mime: None,
    }
}

async fn started_cpp_quiz() -> ViewHarness {
    let mut harness = setup_quiz_harness(
        two_cpp_questions(),
        BankOrigin::Source,
        Arc::new(InMemoryRepository::new()),
    );
    harness.rebuild();
    harness
        .send(QuizCommand::ToggleTopic(TopicId::new("cpp")))
        .await;
    harness.send(QuizCommand::Start).await;
    harness
}

async fn answer_current(harness: &mut ViewHarness, correctly: bool) {
    let vm = harness.vm();
    let question = &vm.run().session.current().expect("current question").question;
    let choice = if correctly {
        question.correct_index()
    } else {
        (question.correct_index() + 1) % question.option_count()
    };
    harness.send(QuizCommand::Choose(choice)).await;
}

#[tokio::test(flavor = "current_thread")]
async fn landing_lists_topics_and_waits_for_a_choice() {
    let mut harness = setup_quiz_harness(
        QuestionBank::builtin(),
        BankOrigin::Source,
        Arc::new(InMemoryRepository::new()),
    );
    harness.rebuild();
    let html = harness.render();

    for label in ["C++", "Java", "Python", "JavaScript"] {
        assert!(html.contains(label), "missing {label} in {html}");
    }
    assert!(html.contains("Choose language(s)"), "missing placeholder in {html}");
    assert!(html.contains("Start Quiz"), "missing start button in {html}");
    assert!(!html.contains("built-in questions"), "unexpected fallback note in {html}");
    assert!(!harness.vm().can_start());

    harness
        .send(QuizCommand::ToggleTopic(TopicId::new("python")))
        .await;
    let html = harness.render();
    assert!(html.contains("1 selected"), "missing count in {html}");
    assert!(html.contains("Remove Python"), "missing chip in {html}");
    assert!(harness.vm().can_start());
    assert!(
        harness.repo.load_checkpoint(CHECKPOINT_KEY).await.unwrap().is_some(),
        "topic choice was not saved"
    );
}

#[tokio::test(flavor = "current_thread")]
async fn fallback_bank_is_announced() {
    let mut harness = setup_quiz_harness(
        QuestionBank::builtin(),
        BankOrigin::Fallback,
        Arc::new(InMemoryRepository::new()),
    );
    harness.rebuild();
    let html = harness.render();
    assert!(html.contains("using the built-in questions"), "missing note in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn saved_session_resumes_on_load() {
    let repo = Arc::new(InMemoryRepository::new());
    let payload = r#"{
        "selected": ["cpp", "java"],
        "current": 2,
        "answers": [1, null, null, null],
        "questionMeta": [
            { "q": "Alpha", "options": ["a", "b", "c"], "answer": 1, "lang": "cpp" },
            { "q": "Bravo", "options": ["a", "b", "c"], "answer": 0, "lang": "java" },
            { "q": "Charlie", "options": ["a", "b", "c"], "answer": 2, "lang": "cpp" },
            { "q": "Delta", "options": ["a", "b", "c"], "answer": 1, "lang": "java" }
        ],
        "timestamp": 1700000000000
    }"#;
    repo.save_checkpoint(CHECKPOINT_KEY, payload).await.unwrap();

    let mut harness = setup_quiz_harness(QuestionBank::builtin(), BankOrigin::Source, repo);
    harness.rebuild();
    harness.drive_async().await;
    let html = harness.render();

    assert!(html.contains("Question 3 / 4"), "missing counter in {html}");
    assert!(html.contains("Charlie"), "missing question text in {html}");
    assert!(html.contains("s — active"), "missing question timer in {html}");
    assert_eq!(harness.vm().run().session.answers(), &[Some(1), None, None, None]);
}

#[tokio::test(flavor = "current_thread")]
async fn passing_quiz_shows_results_and_takes_a_resume() {
    let mut harness = started_cpp_quiz().await;
    let html = harness.render();
    assert!(html.contains("Question 1 / 2"), "missing counter in {html}");
    assert!(html.contains("Languages: "), "missing meta in {html}");

    answer_current(&mut harness, true).await;
    harness.send(QuizCommand::Next).await;
    assert!(harness.render().contains("Finish"), "missing finish label");
    answer_current(&mut harness, true).await;
    harness.send(QuizCommand::Next).await;

    let html = harness.render();
    assert!(html.contains("Score: 2 / 2"), "missing score in {html}");
    assert!(html.contains("100%"), "missing percent in {html}");
    assert!(html.contains("Time: 00:0"), "missing time in {html}");
    assert!(html.contains("Congratulations — you passed!"), "missing banner in {html}");
    assert!(html.contains("Submit Resume"), "missing resume control in {html}");
    assert!(html.contains("Q1 (C++): "), "missing breakdown in {html}");
    assert!(html.contains(" — correct"), "missing correct marker in {html}");
    assert_eq!(
        harness.repo.load_checkpoint(CHECKPOINT_KEY).await.unwrap(),
        None,
        "finished quiz left a checkpoint"
    );

    harness.pick_resume(resume("cv.txt", 100)).await;
    let html = harness.render();
    assert!(
        html.contains("Invalid file type. Please upload a PDF, DOC or DOCX file."),
        "missing type error in {html}"
    );

    harness.pick_resume(resume("cv.pdf", 100)).await;
    let html = harness.render();
    assert!(html.contains("Received: cv.pdf"), "missing confirmation in {html}");
    assert!(html.contains("Resume submitted ✓"), "missing submitted label in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn failing_quiz_offers_no_resume_upload() {
    let mut harness = started_cpp_quiz().await;
    answer_current(&mut harness, false).await;
    harness.send(QuizCommand::Finish).await;

    let html = harness.render();
    assert!(html.contains("Score: 0 / 2"), "missing score in {html}");
    assert!(html.contains("Not passed — try again later."), "missing banner in {html}");
    assert!(!html.contains("Submit Resume"), "unexpected resume control in {html}");
    assert!(html.contains(" — your answer"), "missing wrong marker in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn review_replays_answers_without_timers() {
    let mut harness = started_cpp_quiz().await;
    answer_current(&mut harness, true).await;
    harness.send(QuizCommand::Finish).await;
    harness.send(QuizCommand::Review).await;

    let vm = harness.vm();
    assert_eq!(vm.run().mode(), SessionMode::Reviewing);
    let html = harness.render();
    assert!(html.contains("Question 1 / 2"), "missing counter in {html}");
    assert!(!html.contains("s — active"), "question timer visible in {html}");
    assert!(!html.contains("Finished ✅"), "finished marker visible in {html}");

    harness.send(QuizCommand::Choose(0)).await;
    assert_eq!(harness.vm().run().session.answers(), vm.run().session.answers());

    harness.send(QuizCommand::Next).await;
    assert!(harness.render().contains("Question 2 / 2"));
    harness.send(QuizCommand::Next).await;
    let html = harness.render();
    assert!(html.contains("Score: 1 / 2"), "results not shown again in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn restart_returns_to_an_empty_landing() {
    let mut harness = started_cpp_quiz().await;
    harness.send(QuizCommand::Finish).await;
    harness.send(QuizCommand::Restart).await;

    let html = harness.render();
    assert!(html.contains("Choose language(s)"), "missing landing in {html}");
    assert!(!harness.vm().can_start());
    assert_eq!(harness.repo.load_checkpoint(CHECKPOINT_KEY).await.unwrap(), None);
}

#[tokio::test(flavor = "current_thread")]
async fn enter_on_an_option_answers_and_moves_on() {
    let mut harness = started_cpp_quiz().await;
    assert_eq!(harness.vm().run().session.position(), 0);

    for command in option_key_commands(&Key::Enter, 1, false) {
        harness.send(command).await;
    }

    let vm = harness.vm();
    assert_eq!(vm.run().session.position(), 1);
    assert_eq!(vm.run().session.answers()[0], Some(1));
    let html = harness.render();
    assert!(html.contains("Question 2 / 2"), "missing counter in {html}");
}

#[test]
fn only_enter_on_an_editable_option_submits() {
    assert_eq!(
        option_key_commands(&Key::Enter, 2, false),
        vec![QuizCommand::Choose(2), QuizCommand::Next]
    );
    assert!(option_key_commands(&Key::Enter, 2, true).is_empty());
    assert!(option_key_commands(&Key::Character("1".to_string()), 0, false).is_empty());
    assert!(option_key_commands(&Key::Tab, 0, false).is_empty());
}
