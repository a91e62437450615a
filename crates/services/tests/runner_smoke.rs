use std::time::Duration;

use quiz_core::model::Tier;
use quiz_core::time::fixed_clock;
use services::quiz::builtin_definition;
use services::{Intent, QuizPhase, QuizRunner};

#[tokio::test(start_paused = true)]
async fn builtin_quiz_runs_to_results_through_the_runner() {
    let engine = builtin_definition()
        .validate()
        .unwrap()
        .into_engine(fixed_clock());
    let (handle, task) = QuizRunner::spawn(engine);

    let answers = [
        vec![Intent::SelectSingleChoice("Paris".into())],
        vec![
            Intent::ToggleMultiSelectOption("Python".into()),
            Intent::ToggleMultiSelectOption("JavaScript".into()),
            Intent::SubmitMultiSelect,
        ],
        vec![
            Intent::SetFillBlankText("Compiling".into()),
            Intent::SubmitFillBlank,
        ],
        vec![Intent::SelectSingleChoice("Core Processing Unit".into())],
        vec![Intent::Skip],
        // Last question is left to time out.
        vec![],
    ];

    handle.dispatch(Intent::Start).await.unwrap();
    for (index, intents) in answers.into_iter().enumerate() {
        assert_eq!(handle.snapshot().current_index, index);
        let locks = !intents.is_empty() && intents != vec![Intent::Skip];
        for intent in intents {
            handle.dispatch(intent).await.unwrap();
        }
        if locks {
            // Feedback pause, then auto-advance.
            tokio::time::sleep(Duration::from_millis(2_500)).await;
        } else if index == 5 {
            tokio::time::sleep(Duration::from_millis(17_500)).await;
        }
    }

    let snapshot = handle.snapshot();
    assert_eq!(snapshot.phase, QuizPhase::Results);
    let summary = snapshot.summary.unwrap();
    assert_eq!(summary.score(), 35);
    assert_eq!(summary.total_points(), 70);
    assert_eq!(summary.percentage(), 50);
    assert_eq!(summary.tier(), Tier::Fair);
    assert_eq!(summary.correct_count(), 3);
    assert_eq!(summary.incorrect_count(), 3);
    assert_eq!(summary.timed_out_count(), 1);
    assert_eq!(summary.unanswered_count(), 1);

    handle.dispatch(Intent::Start).await.unwrap();
    let restarted = handle.snapshot();
    assert_eq!(restarted.phase, QuizPhase::Playing);
    assert_eq!(restarted.score, 0);
    assert_eq!(restarted.current_index, 0);

    handle.shutdown().await.unwrap();
    task.await.unwrap();
}
