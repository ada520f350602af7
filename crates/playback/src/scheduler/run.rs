use algoviz_core::{Frame, Observer};
use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;

use super::controller::DelayScope;
use super::error::PlaybackError;
use super::stepper::{StepMachine, Transition};
use super::types::{RunOutcome, RunReport, Wake};

/// Run `machine` to a terminal state under `scope`.
///
/// Publishes every step to `observer`, suspends exactly once between
/// consecutive steps, and halts without publishing anything further as soon
/// as a suspension reports cancellation. A normal completion publishes the
/// terminal frame and stops the controller.
pub async fn drive<M, O>(
    machine: &mut M,
    scope: &DelayScope,
    observer: &mut O,
) -> Result<RunReport<M::Output>, PlaybackError>
where
    M: StepMachine,
    O: Observer<M::State>,
{
    let run_id = Uuid::new_v4();
    let stepper = machine.name();
    let mut report = RunReport {
        run_id,
        stepper,
        outcome: RunOutcome::Cancelled,
        frames_published: 0,
        suspensions: 0,
    };

    if scope.is_cancelled() {
        debug!(%run_id, stepper, "run requested on a cancelled scope");
        return Ok(report);
    }
    if !scope.controller().state().running {
        warn!(%run_id, stepper, "run requested on a controller that is not running");
        return Err(PlaybackError::NotRunning.raise());
    }

    let span = info_span!("run", %run_id, stepper);
    async move {
        let controller = scope.controller();
        controller.record_run_started();
        info!("run started");

        loop {
            match machine.advance() {
                Transition::Step { label, state, hold } => {
                    observer.publish(Frame {
                        seq: report.frames_published,
                        label,
                        state,
                    });
                    report.frames_published += 1;
                    report.suspensions += 1;

                    if scope.step_delay(hold).await? == Wake::Cancelled {
                        controller.record_run_cancelled();
                        info!(frames = report.frames_published, "run cancelled");
                        return Ok(report);
                    }
                }
                Transition::Done { label, state, output } => {
                    observer.publish(Frame {
                        seq: report.frames_published,
                        label,
                        state,
                    });
                    report.frames_published += 1;
                    report.outcome = RunOutcome::Done(output);
                    controller.finish_run(scope.flag());
                    info!(frames = report.frames_published, "run completed");
                    return Ok(report);
                }
            }
        }
    }
    .instrument(span)
    .await
}
