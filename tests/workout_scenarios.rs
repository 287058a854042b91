//! End-to-end workout scenarios through the public engine API.
//!
//! Each test runs a small program over the paused test clock and checks
//! the exact event or cue sequence a presentation layer would observe.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::time::{timeout, Duration};

use workout_timer::{
    Exercise, FeedbackCue, FeedbackSink, MockFeedbackSink, Program, WorkoutEngine, WorkoutEvent,
    WorkoutPhase,
};

// ============================================================================
// Test Helpers
// ============================================================================

fn create_engine_with_feedback(
    program: Program,
) -> (
    WorkoutEngine,
    Arc<MockFeedbackSink>,
    mpsc::UnboundedReceiver<WorkoutEvent>,
) {
    let (tx, rx) = mpsc::unbounded_channel();
    let feedback = Arc::new(MockFeedbackSink::new());
    let engine = WorkoutEngine::with_feedback(
        Arc::new(program),
        Arc::clone(&feedback) as Arc<dyn FeedbackSink>,
        tx,
    );
    (engine, feedback, rx)
}

/// Collects events until (and including) `Finished`.
async fn collect_until_finished(
    rx: &mut mpsc::UnboundedReceiver<WorkoutEvent>,
) -> Vec<WorkoutEvent> {
    let mut events = Vec::new();
    loop {
        let event = timeout(Duration::from_secs(60), rx.recv())
            .await
            .expect("no event within virtual minute")
            .expect("event channel closed");
        let finished = matches!(event, WorkoutEvent::Finished { .. });
        events.push(event);
        if finished {
            return events;
        }
    }
}

// ============================================================================
// Scenarios
// ============================================================================

#[tokio::test(start_paused = true)]
async fn two_exercise_walkthrough_emits_exact_sequence() {
    let (mut engine, _feedback, mut rx) = create_engine_with_feedback(Program::new(
        "Short",
        vec![
            Exercise::new("Jacks", 2, 1, 0),
            Exercise::new("Plank", 2, 1, 1),
        ],
    ));
    engine.start().await;

    let events = collect_until_finished(&mut rx).await;
    let session_id = engine.session().await.id();

    assert_eq!(
        events,
        vec![
            WorkoutEvent::Started { session_id },
            WorkoutEvent::CountdownTick { seconds_left: 2 },
            WorkoutEvent::CountdownTick { seconds_left: 1 },
            WorkoutEvent::WorkStarted {
                exercise: "Jacks".to_string(),
                exercise_index: 0,
                lap: 1,
            },
            WorkoutEvent::Tick {
                remaining_seconds: 1
            },
            WorkoutEvent::Tick {
                remaining_seconds: 0
            },
            WorkoutEvent::RestStarted {
                exercise: "Jacks".to_string(),
                exercise_index: 0,
                lap: 1,
            },
            WorkoutEvent::Tick {
                remaining_seconds: 0
            },
            WorkoutEvent::WorkStarted {
                exercise: "Plank".to_string(),
                exercise_index: 1,
                lap: 1,
            },
            WorkoutEvent::Tick {
                remaining_seconds: 1
            },
            WorkoutEvent::Tick {
                remaining_seconds: 0
            },
            WorkoutEvent::RestStarted {
                exercise: "Plank".to_string(),
                exercise_index: 1,
                lap: 1,
            },
            WorkoutEvent::Tick {
                remaining_seconds: 0
            },
            WorkoutEvent::Finished { laps: 1 },
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn zero_rest_program_never_enters_resting() {
    let (mut engine, _feedback, mut rx) = create_engine_with_feedback(
        Program::new("Laps", vec![Exercise::new("Row", 1, 0, 0)]).with_laps(2),
    );
    engine.start().await;

    let events = collect_until_finished(&mut rx).await;

    assert!(events
        .iter()
        .all(|e| !matches!(e, WorkoutEvent::RestStarted { .. })));

    // Same exercise runs once per lap
    let work_laps: Vec<u32> = events
        .iter()
        .filter_map(|e| match e {
            WorkoutEvent::WorkStarted { lap, .. } => Some(*lap),
            _ => None,
        })
        .collect();
    assert_eq!(work_laps, vec![1, 2]);

    assert!(matches!(
        events.last(),
        Some(WorkoutEvent::Finished { laps: 2 })
    ));
}

#[tokio::test(start_paused = true)]
async fn manual_skip_on_last_exercise_finishes_immediately() {
    let (mut engine, _feedback, mut rx) = create_engine_with_feedback(Program::new(
        "Pair",
        vec![
            Exercise::new("A", 30, 15, 0),
            Exercise::new("B", 30, 15, 1),
        ],
    ));
    engine.start().await;

    engine.next_exercise().await; // onto B
    engine.next_exercise().await; // past B: straight to Finished, rest bypassed

    let snapshot = engine.snapshot().await;
    assert_eq!(snapshot.phase, WorkoutPhase::Finished);
    assert!(!snapshot.is_running);
    assert!(snapshot.completed);

    let mut saw_finished = false;
    while let Ok(event) = rx.try_recv() {
        assert!(!matches!(event, WorkoutEvent::RestStarted { .. }));
        saw_finished |= matches!(event, WorkoutEvent::Finished { .. });
    }
    assert!(saw_finished);
}

#[tokio::test(start_paused = true)]
async fn single_exercise_cue_walkthrough() {
    // {work:1, rest:0}, laps=1: medium on start, light per countdown
    // decrement, medium on work entry, no warning on the 1 -> 0 decrement,
    // success on finish.
    let (mut engine, feedback, mut rx) =
        create_engine_with_feedback(Program::new("One", vec![Exercise::new("Burpee", 1, 0, 0)]));
    engine.start().await;

    collect_until_finished(&mut rx).await;

    assert_eq!(
        feedback.recorded_cues(),
        vec![
            FeedbackCue::Medium,
            FeedbackCue::Light,
            FeedbackCue::Light,
            FeedbackCue::Medium,
            FeedbackCue::Success,
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn final_seconds_warning_cues_fire_on_decrements() {
    // work:5 -> warnings when the decrement lands on 3, 2 and 1.
    let (mut engine, feedback, mut rx) =
        create_engine_with_feedback(Program::new("One", vec![Exercise::new("Sprint", 5, 0, 0)]));
    engine.start().await;

    collect_until_finished(&mut rx).await;

    let lights = feedback
        .recorded_cues()
        .iter()
        .filter(|c| **c == FeedbackCue::Light)
        .count();
    // 2 countdown decrements + 3 final-seconds warnings
    assert_eq!(lights, 5);
}

#[tokio::test(start_paused = true)]
async fn disabled_sink_receives_no_cues_but_run_completes() {
    let (mut engine, feedback, mut rx) =
        create_engine_with_feedback(Program::new("One", vec![Exercise::new("Burpee", 1, 0, 0)]));
    feedback.disable();

    engine.start().await;
    let events = collect_until_finished(&mut rx).await;

    assert_eq!(feedback.cue_count(), 0);
    assert!(matches!(
        events.last(),
        Some(WorkoutEvent::Finished { .. })
    ));
}

#[tokio::test(start_paused = true)]
async fn failing_sink_does_not_derail_the_run() {
    let (mut engine, feedback, mut rx) = create_engine_with_feedback(Program::new(
        "Pair",
        vec![
            Exercise::new("A", 1, 1, 0),
            Exercise::new("B", 1, 0, 1),
        ],
    ));
    feedback.set_should_fail(true);

    engine.start().await;
    let events = collect_until_finished(&mut rx).await;

    assert!(matches!(
        events.last(),
        Some(WorkoutEvent::Finished { laps: 1 })
    ));
    assert_eq!(engine.snapshot().await.phase, WorkoutPhase::Finished);
}
