use std::panic::{self, AssertUnwindSafe};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use anyhow::anyhow;
use crate::common::Frame;
use crate::data::send_channels::{channels, DetectionState, Job, SendState, WorkerEvent};
use crate::decoder;
use crate::detection_runners::inference_process::Network;
use crate::detection_runners::YoloDetector;

/// Anything that can turn a frame into an annotated copy of itself.
pub trait Annotate {
    fn annotate(&mut self, frame: &Frame, threshold: f32) -> anyhow::Result<Frame>;
}

impl<N: Network> Annotate for YoloDetector<N> {
    fn annotate(&mut self, frame: &Frame, threshold: f32) -> anyhow::Result<Frame> {
        self.detect(frame, threshold)
    }
}

/// Handle to the background thread running detection and import decoding.
///
/// Jobs go through a single-slot mailbox, so a job submitted while another is
/// still pending replaces it. A job that already started always completes.
#[derive(Debug)]
pub struct DetectionWorker {
    send: SendState,
    handle: JoinHandle<()>,
}

impl DetectionWorker {
    /// Starts the worker. `loader` runs on the worker thread the first time a
    /// job needs the detector, and again after a failed load.
    pub fn spawn<A, F>(loader: F) -> anyhow::Result<Self>
    where
        A: Annotate + 'static,
        F: FnMut() -> anyhow::Result<A> + Send + 'static,
    {
        let (send, detection) = channels();
        let handle = thread::Builder::new()
            .name("detection-worker".to_string())
            .spawn(move || worker_loop(detection, loader))?;
        Ok(Self { send, handle })
    }

    /// Queues `job`. Returns `false` when the worker has stopped.
    pub fn submit(&self, job: Job) -> bool {
        match self.send.job_tx.send(job) {
            Ok(Some(stale)) => {
                log::debug!("Pending job for epoch {} replaced before it started", stale.epoch());
                true
            }
            Ok(None) => true,
            Err(_) => {
                log::error!("Detection worker is not running");
                false
            }
        }
    }

    /// Latest finished result, if any.
    pub fn poll(&self) -> Option<WorkerEvent> {
        self.send.event_rx.try_take()
    }

    pub fn wait(&self, timeout: Duration) -> Option<WorkerEvent> {
        self.send.event_rx.take_timeout(timeout)
    }

    /// Closes the job mailbox and waits for the current job to finish.
    pub fn shutdown(self) {
        let Self { send, handle } = self;
        drop(send);
        if handle.join().is_err() {
            log::error!("Detection worker panicked");
        }
    }
}

fn worker_loop<A, F>(state: DetectionState, mut loader: F)
where
    A: Annotate,
    F: FnMut() -> anyhow::Result<A>,
{
    log::info!("Detection worker started");
    let mut detector: Option<A> = None;

    while let Some(job) = state.job_rx.take() {
        let event = match job {
            Job::Detect { epoch, frame, threshold } => {
                let started = Instant::now();
                match annotate_with(&mut detector, &mut loader, &frame, threshold) {
                    Ok(frame) => WorkerEvent::Detected { epoch, frame, elapsed: started.elapsed() },
                    Err(err) => {
                        log::error!("Detection failed: {err:#}");
                        WorkerEvent::DetectFailed { epoch, reason: format!("{err:#}") }
                    }
                }
            }
            Job::Import { epoch, path, threshold } => match decoder::load(&path) {
                Ok(frame) => {
                    let annotated = threshold.map(|threshold| {
                        annotate_with(&mut detector, &mut loader, &frame, threshold).map_err(|err| {
                            log::error!("Detection on imported image failed: {err:#}");
                            format!("{err:#}")
                        })
                    });
                    WorkerEvent::Imported { epoch, frame, annotated }
                }
                Err(error) => {
                    log::error!("Import failed: {error}");
                    WorkerEvent::ImportFailed { epoch, error }
                }
            },
        };

        if state.event_tx.send(event).is_err() {
            break;
        }
    }

    log::info!("Detection worker stopped");
}

/// Loads the detector on first use and annotates `frame`. A panic from the
/// runtime is turned into an error and the detector is dropped, so the next
/// job loads it again.
fn annotate_with<A, F>(slot: &mut Option<A>, loader: &mut F, frame: &Frame, threshold: f32) -> anyhow::Result<Frame>
where
    A: Annotate,
    F: FnMut() -> anyhow::Result<A>,
{
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| -> anyhow::Result<(A, anyhow::Result<Frame>)> {
        let mut detector = match slot.take() {
            Some(detector) => detector,
            None => loader()?,
        };
        let annotated = detector.annotate(frame, threshold);
        Ok((detector, annotated))
    }));

    match outcome {
        Ok(Ok((detector, annotated))) => {
            *slot = Some(detector);
            annotated
        }
        Ok(Err(err)) => Err(err),
        Err(_) => Err(anyhow!("Detector panicked and will be reloaded on the next request")),
    }
}
