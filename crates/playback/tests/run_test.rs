//! End-to-end runs: steppers driven through the controller with a paused
//! tokio clock.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::time::{sleep, Instant};

use algoviz_core::{Frame, PlaybackConfig};
use algoviz_playback::algorithms::{
    BubbleAction, BubbleSortState, NextGreaterState, TwoSumAction, TwoSumState,
};
use algoviz_playback::{
    drive, BubbleSort, NextGreater, PlaybackController, PlaybackError, RunOutcome,
    TransportState, TwoSum, TwoSumResult,
};

const RESOLUTION: Duration = Duration::from_millis(50);

fn controller(speed_ms: u64) -> PlaybackController {
    PlaybackController::new(PlaybackConfig {
        default_speed_ms: speed_ms,
        resolution_ms: 50,
        ..PlaybackConfig::default()
    })
}

fn assert_within(actual: Duration, expected: Duration) {
    assert!(
        actual >= expected && actual <= expected + RESOLUTION,
        "expected {:?} (+{:?}), got {:?}",
        expected,
        RESOLUTION,
        actual
    );
}

#[tokio::test(start_paused = true)]
async fn bubble_sort_run_sorts_with_exact_timing() {
    let c = controller(100);
    c.play();
    let scope = c.scope();

    let mut frames: Vec<Frame<BubbleSortState>> = Vec::new();
    let start = Instant::now();
    let report = drive(&mut BubbleSort::new(&[5, 3, 8, 1]), &scope, &mut frames)
        .await
        .unwrap();

    assert_eq!(report.outcome, RunOutcome::Done(vec![1, 3, 5, 8]));
    // 6 compares + 4 swaps announced and applied, plus the terminal frame
    assert_eq!(report.suspensions, 14);
    assert_eq!(report.frames_published, 15);
    assert_eq!(frames.len(), 15);
    assert_eq!(
        frames.iter().filter(|f| f.state.action == BubbleAction::Swap).count(),
        4
    );
    assert!(frames.iter().enumerate().all(|(i, f)| f.seq == i));
    assert_within(start.elapsed(), Duration::from_millis(1400));

    assert_eq!(c.transport(), TransportState::Idle);
    assert_eq!(c.metrics().runs_completed, 1);
}

#[tokio::test(start_paused = true)]
async fn next_greater_run_keeps_stack_monotonic() {
    let c = controller(40);
    c.play();
    let scope = c.scope();

    let mut frames: Vec<Frame<NextGreaterState>> = Vec::new();
    let report = drive(&mut NextGreater::new(&[2, 1, 5, 1, 3, 2]), &scope, &mut frames)
        .await
        .unwrap();

    assert_eq!(report.outcome, RunOutcome::Done(vec![5, 5, -1, 3, -1, -1]));
    for frame in &frames {
        let values: Vec<i64> = frame.state.stack.iter().map(|&k| frame.state.array[k]).collect();
        assert!(values.windows(2).all(|w| w[0] > w[1]), "frame {}: {:?}", frame.seq, values);
    }
}

#[tokio::test(start_paused = true)]
async fn two_sum_run_halts_early_and_lingers_on_success() {
    let c = controller(100);
    c.play();
    let scope = c.scope();

    let mut frames: Vec<Frame<TwoSumState>> = Vec::new();
    let start = Instant::now();
    let mut machine = TwoSum::new(&[2, 7, 11, 15], 9).with_success_hold(3);
    let report = drive(&mut machine, &scope, &mut frames).await.unwrap();

    assert_eq!(report.outcome, RunOutcome::Done(TwoSumResult::Found { pair: (0, 1) }));
    assert!(frames.iter().all(|f| f.state.current.map_or(true, |i| i <= 1)));
    assert_eq!(frames.last().unwrap().state.action, TwoSumAction::Done);
    // check, miss, insert, check at 100ms each, then the success hold at 300ms
    assert_within(start.elapsed(), Duration::from_millis(700));
}

#[tokio::test(start_paused = true)]
async fn two_sum_distinguishes_no_match() {
    let c = controller(10);
    c.play();
    let scope = c.scope();
    let mut frames: Vec<Frame<TwoSumState>> = Vec::new();
    let report = drive(&mut TwoSum::new(&[1, 2, 3], 50), &scope, &mut frames)
        .await
        .unwrap();
    assert_eq!(report.outcome, RunOutcome::Done(TwoSumResult::NoMatch));
}

#[tokio::test(start_paused = true)]
async fn reset_halts_run_without_further_publishes() {
    let c = controller(100);
    c.play();
    let scope = c.scope();

    let log: Arc<Mutex<Vec<Frame<BubbleSortState>>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&log);
    let run = tokio::spawn(async move {
        let mut observer = move |f: Frame<BubbleSortState>| sink.lock().unwrap().push(f);
        drive(&mut BubbleSort::new(&[9, 8, 7, 6, 5, 4]), &scope, &mut observer).await
    });

    sleep(Duration::from_millis(550)).await;
    let reset_at = Instant::now();
    c.reset();
    let published_at_reset = log.lock().unwrap().len();

    let report = run.await.unwrap().unwrap();
    assert!(Instant::now() - reset_at <= RESOLUTION);
    assert_eq!(report.outcome, RunOutcome::Cancelled);
    assert_eq!(log.lock().unwrap().len(), published_at_reset);
    assert_eq!(report.frames_published, published_at_reset);
    assert!(!log.lock().unwrap().iter().any(|f| f.state.done));
    assert_eq!(c.metrics().runs_cancelled, 1);
}

#[tokio::test(start_paused = true)]
async fn pausing_a_run_shifts_completion_by_the_paused_time() {
    let c = controller(100);
    c.play();
    let scope = c.scope();

    let start = Instant::now();
    let run = tokio::spawn(async move {
        let mut frames: Vec<Frame<NextGreaterState>> = Vec::new();
        let report = drive(&mut NextGreater::new(&[3, 1, 2]), &scope, &mut frames).await;
        (report, Instant::now())
    });

    sleep(Duration::from_millis(250)).await;
    c.pause();
    sleep(Duration::from_secs(3)).await;
    assert_eq!(c.transport(), TransportState::Paused);
    c.play();

    let (report, finished_at) = run.await.unwrap();
    let report = report.unwrap();
    // 3 checks + 3 pushes + 1 pop pair = 8 suspensions
    assert_eq!(report.suspensions, 8);
    assert_within(finished_at - start, Duration::from_millis(800 + 3000));
}

#[cfg(not(feature = "strict-contracts"))]
#[tokio::test(start_paused = true)]
async fn driving_an_idle_controller_is_a_contract_violation() {
    let c = controller(100);
    let scope = c.scope();
    let mut frames: Vec<Frame<BubbleSortState>> = Vec::new();
    let err = drive(&mut BubbleSort::new(&[2, 1]), &scope, &mut frames)
        .await
        .unwrap_err();
    assert_eq!(err, PlaybackError::NotRunning);
    assert!(frames.is_empty());
}

#[tokio::test(start_paused = true)]
async fn cancelled_run_can_be_restarted_as_a_new_run() {
    let c = controller(100);
    c.play();
    let stale = c.scope();
    c.reset();

    let mut frames: Vec<Frame<BubbleSortState>> = Vec::new();
    let report = drive(&mut BubbleSort::new(&[2, 1]), &stale, &mut frames)
        .await
        .unwrap();
    assert_eq!(report.outcome, RunOutcome::Cancelled);
    assert!(frames.is_empty());

    c.play();
    let fresh = c.scope();
    let report = drive(&mut BubbleSort::new(&[2, 1]), &fresh, &mut frames)
        .await
        .unwrap();
    assert_eq!(report.outcome, RunOutcome::Done(vec![1, 2]));
    assert_ne!(report.run_id, uuid::Uuid::nil());
}

#[tokio::test(start_paused = true)]
async fn frames_stream_through_a_channel_as_json() {
    let c = controller(10);
    c.play();
    let scope = c.scope();

    let (mut tx, mut rx) = tokio::sync::mpsc::unbounded_channel::<Frame<TwoSumState>>();
    drive(&mut TwoSum::new(&[4, 5], 9), &scope, &mut tx).await.unwrap();
    drop(tx);

    let mut labels = Vec::new();
    while let Some(frame) = rx.recv().await {
        let json = serde_json::to_value(&frame).unwrap();
        assert_eq!(json["seq"], frame.seq);
        labels.push(frame.label);
    }
    assert_eq!(labels.first().map(String::as_str), Some("current=0 (arr=4), need 5"));
    assert_eq!(labels.last().map(String::as_str), Some("done: pair (0, 1)"));
}
