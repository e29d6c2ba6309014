//! Async task management.
//!
//! Every long-running CAMB.AI operation follows the same shape: a submit call
//! hands back a `task_id`, a status endpoint is polled until the task reaches
//! a terminal status, and the result is fetched by the `run_id` reported on
//! success. [`Task`] implements that loop once; a [`TaskBackend`] supplies the
//! kind-specific status and result calls.

use std::{
    marker::PhantomData,
    path::{Path, PathBuf},
    sync::Arc,
    time::Duration,
};

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use super::{
    error::{Error, Result},
    http::{FilePart, HttpClient},
    types::{RunId, TaskKind, TaskStatus, TaskStatusResponse},
};

/// Default interval between status polls.
pub const DEFAULT_POLLING_INTERVAL: Duration = Duration::from_secs(2);

/// Kind-specific half of a task: how to read its status and fetch its result.
#[async_trait]
pub trait TaskBackend: Send + Sync {
    /// The artifact produced once the task succeeds.
    type Output: Send;

    /// Returns the kind of task this backend serves.
    fn kind(&self) -> TaskKind;

    /// Fetches a status snapshot for `task_id`.
    async fn check_status(&self, task_id: &str) -> Result<TaskStatusResponse>;

    /// Fetches the final artifact for `run_id`.
    async fn fetch_result(&self, run_id: &RunId) -> Result<Self::Output>;
}

/// Controls how a task is polled.
///
/// The default polls every two seconds with no deadline and no cancellation,
/// i.e. until the service reports a terminal status.
#[derive(Debug, Clone)]
pub struct PollOptions {
    /// Wait between consecutive status checks.
    pub interval: Duration,

    /// Give up with [`Error::DeadlineExceeded`] once this much time has passed.
    pub max_wait: Option<Duration>,

    /// Stop with [`Error::Cancelled`] when the token fires.
    pub cancel: Option<CancellationToken>,
}

impl Default for PollOptions {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLLING_INTERVAL,
            max_wait: None,
            cancel: None,
        }
    }
}

impl PollOptions {
    /// Creates options with the default interval.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the polling interval.
    pub fn interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Sets a deadline for the whole wait.
    pub fn max_wait(mut self, max_wait: Duration) -> Self {
        self.max_wait = Some(max_wait);
        self
    }

    /// Sets a cancellation token.
    pub fn cancel_token(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }
}

/// An async task that can be polled for completion.
pub struct Task<B> {
    id: String,
    backend: B,
}

impl<B: TaskBackend> Task<B> {
    /// Creates a task handle from a submitted task id.
    pub fn new(id: impl Into<String>, backend: B) -> Self {
        Self {
            id: id.into(),
            backend,
        }
    }

    /// Returns the task ID.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the task kind.
    pub fn kind(&self) -> TaskKind {
        self.backend.kind()
    }

    /// Queries the current status of the task.
    pub async fn status(&self) -> Result<TaskStatusResponse> {
        self.backend.check_status(&self.id).await
    }

    /// Fetches the result of a finished run.
    pub async fn fetch(&self, run_id: &RunId) -> Result<B::Output> {
        tracing::info!(kind = %self.kind(), task_id = %self.id, %run_id, "fetching result");
        self.backend.fetch_result(run_id).await
    }

    /// Waits for the task to complete and returns the result.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let task = client.dubbing().create(&request).await?;
    /// let info = task.wait(&PollOptions::default()).await?;
    /// println!("video: {}", info.video_url);
    /// ```
    pub async fn wait(&self, opts: &PollOptions) -> Result<B::Output> {
        let run_id = self.wait_run_id(opts).await?;
        self.fetch(&run_id).await
    }

    /// Polls until the task succeeds and returns its run id.
    pub async fn wait_run_id(&self, opts: &PollOptions) -> Result<RunId> {
        let kind = self.kind();
        let started = Instant::now();
        // A deadline past the clock's range is no deadline.
        let deadline = opts.max_wait.and_then(|d| started.checked_add(d));

        loop {
            self.ensure_not_cancelled(opts)?;

            let snapshot = self.status().await?;
            tracing::debug!(
                %kind,
                task_id = %self.id,
                status = %snapshot.status,
                run_id = ?snapshot.run_id,
                "task status"
            );

            if let Some(run_id) = evaluate(kind, &self.id, snapshot)? {
                return Ok(run_id);
            }

            let mut pause = opts.interval;
            if let Some(deadline) = deadline {
                let now = Instant::now();
                if now >= deadline {
                    return Err(Error::DeadlineExceeded {
                        kind,
                        task_id: self.id.clone(),
                        waited: now - started,
                    });
                }
                pause = pause.min(deadline - now);
            }

            tracing::debug!(%kind, task_id = %self.id, ?pause, "sleeping before next poll");
            self.sleep(pause, opts).await?;
        }
    }

    async fn sleep(&self, pause: Duration, opts: &PollOptions) -> Result<()> {
        match &opts.cancel {
            Some(token) => tokio::select! {
                _ = token.cancelled() => Err(self.cancelled()),
                _ = tokio::time::sleep(pause) => Ok(()),
            },
            None => {
                tokio::time::sleep(pause).await;
                Ok(())
            }
        }
    }

    fn ensure_not_cancelled(&self, opts: &PollOptions) -> Result<()> {
        match &opts.cancel {
            Some(token) if token.is_cancelled() => Err(self.cancelled()),
            _ => Ok(()),
        }
    }

    fn cancelled(&self) -> Error {
        Error::Cancelled {
            kind: self.kind(),
            task_id: self.id.clone(),
        }
    }
}

/// Applies one status snapshot to the poll state machine.
///
/// Returns `Some(run_id)` when the task succeeded, `None` while it is pending,
/// and an error for every other outcome.
pub(crate) fn evaluate(
    kind: TaskKind,
    task_id: &str,
    snapshot: TaskStatusResponse,
) -> Result<Option<RunId>> {
    match snapshot.status {
        TaskStatus::Pending => Ok(None),
        TaskStatus::Success => match snapshot.run_id {
            Some(run_id) => Ok(Some(run_id)),
            None => Err(Error::Protocol(format!(
                "{} task {} reported SUCCESS without a run_id",
                kind, task_id
            ))),
        },
        status => Err(Error::TaskFailed {
            kind,
            status,
            task_id: task_id.to_string(),
            run_id: snapshot.run_id,
        }),
    }
}

// ==================== Submission ====================

#[derive(serde::Deserialize)]
struct SubmitResponse {
    task_id: String,
}

/// Posts a JSON job to the kind's endpoint and returns the assigned task id.
pub(crate) async fn submit_json<T>(http: &HttpClient, kind: TaskKind, body: &T) -> Result<String>
where
    T: Serialize + ?Sized,
{
    let resp: SubmitResponse = http.post_json(&submit_path(kind), body).await?;
    Ok(submitted(kind, resp))
}

/// Uploads a file job to the kind's endpoint and returns the assigned task id.
pub(crate) async fn submit_multipart(
    http: &HttpClient,
    kind: TaskKind,
    file: FilePart,
    fields: Vec<(&'static str, String)>,
) -> Result<String> {
    let resp: SubmitResponse = http.post_multipart(&submit_path(kind), file, fields).await?;
    Ok(submitted(kind, resp))
}

fn submit_path(kind: TaskKind) -> String {
    format!("/{}", kind.endpoint())
}

fn submitted(kind: TaskKind, resp: SubmitResponse) -> String {
    tracing::info!(%kind, task_id = %resp.task_id, "task submitted");
    resp.task_id
}

// ==================== HTTP backends ====================

/// Backend for kinds whose result endpoint returns JSON.
pub struct JsonBackend<R> {
    http: Arc<HttpClient>,
    kind: TaskKind,
    _result: PhantomData<fn() -> R>,
}

impl<R> JsonBackend<R> {
    pub(crate) fn new(http: Arc<HttpClient>, kind: TaskKind) -> Self {
        Self {
            http,
            kind,
            _result: PhantomData,
        }
    }
}

#[async_trait]
impl<R> TaskBackend for JsonBackend<R>
where
    R: DeserializeOwned + Send + 'static,
{
    type Output = R;

    fn kind(&self) -> TaskKind {
        self.kind
    }

    async fn check_status(&self, task_id: &str) -> Result<TaskStatusResponse> {
        self.http.get_json(&self.kind.status_path(task_id)).await
    }

    async fn fetch_result(&self, run_id: &RunId) -> Result<R> {
        self.http.get_json(&self.kind.result_path(run_id)).await
    }
}

/// Default directory for synthesized audio.
pub const DEFAULT_AUDIO_DIR: &str = "audio_tts";

/// Backend for kinds whose result is a binary audio stream.
pub struct AudioBackend {
    http: Arc<HttpClient>,
    kind: TaskKind,
    output_dir: PathBuf,
}

impl AudioBackend {
    pub(crate) fn new(http: Arc<HttpClient>, kind: TaskKind, output_dir: PathBuf) -> Self {
        Self {
            http,
            kind,
            output_dir,
        }
    }

    /// Returns the directory audio files are written to.
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }
}

/// A synthesized audio file written to disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AudioFile {
    /// Run the audio belongs to.
    pub run_id: RunId,

    /// Where the audio was written.
    pub path: PathBuf,

    /// Number of bytes written.
    pub bytes: u64,
}

/// Returns the file name used for the audio of a run.
pub fn audio_file_name(run_id: &RunId) -> String {
    format!("tts_stream_{}.wav", run_id)
}

#[async_trait]
impl TaskBackend for AudioBackend {
    type Output = AudioFile;

    fn kind(&self) -> TaskKind {
        self.kind
    }

    async fn check_status(&self, task_id: &str) -> Result<TaskStatusResponse> {
        self.http.get_json(&self.kind.status_path(task_id)).await
    }

    async fn fetch_result(&self, run_id: &RunId) -> Result<AudioFile> {
        if !tokio::fs::try_exists(&self.output_dir).await? {
            tracing::info!(dir = %self.output_dir.display(), "creating output directory");
            tokio::fs::create_dir_all(&self.output_dir).await?;
        }

        let path = self.output_dir.join(audio_file_name(run_id));
        let bytes = self.http.download(&self.kind.result_path(run_id), &path).await?;
        tracing::info!(path = %path.display(), bytes, "audio written");

        Ok(AudioFile {
            run_id: run_id.clone(),
            path,
            bytes,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::{
        collections::VecDeque,
        sync::{
            atomic::{AtomicUsize, Ordering},
            Mutex,
        },
    };

    use super::*;

    /// Replays a fixed list of status snapshots.
    struct Scripted {
        statuses: Mutex<VecDeque<TaskStatusResponse>>,
        status_calls: AtomicUsize,
        fetch_calls: AtomicUsize,
    }

    impl Scripted {
        fn new(script: &[(&str, Option<i64>)]) -> Self {
            let statuses = script
                .iter()
                .map(|(status, run_id)| TaskStatusResponse {
                    status: TaskStatus::from(*status),
                    run_id: run_id.map(RunId::from),
                })
                .collect();
            Self {
                statuses: Mutex::new(statuses),
                status_calls: AtomicUsize::new(0),
                fetch_calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl TaskBackend for Scripted {
        type Output = String;

        fn kind(&self) -> TaskKind {
            TaskKind::Dubbing
        }

        async fn check_status(&self, _task_id: &str) -> Result<TaskStatusResponse> {
            self.status_calls.fetch_add(1, Ordering::SeqCst);
            let next = self.statuses.lock().unwrap().pop_front();
            Ok(next.unwrap_or(TaskStatusResponse {
                status: TaskStatus::Pending,
                run_id: None,
            }))
        }

        async fn fetch_result(&self, run_id: &RunId) -> Result<String> {
            self.fetch_calls.fetch_add(1, Ordering::SeqCst);
            Ok(format!("result-{}", run_id))
        }
    }

    fn opts() -> PollOptions {
        PollOptions::new().interval(Duration::from_millis(100))
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_returns_fetched_result() {
        let script = [("PENDING", None), ("PENDING", Some(9)), ("SUCCESS", Some(9))];
        let task = Task::new("task-1", Scripted::new(&script));

        let result = task.wait(&opts()).await.unwrap();

        assert_eq!(result, "result-9");
        assert_eq!(task.backend.status_calls.load(Ordering::SeqCst), 3);
        assert_eq!(task.backend.fetch_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_without_run_id_is_protocol_violation() {
        let task = Task::new("task-1", Scripted::new(&[("PENDING", None), ("SUCCESS", None)]));

        let err = task.wait(&opts()).await.unwrap_err();

        assert!(err.is_protocol(), "unexpected error: {err}");
        assert_eq!(task.backend.fetch_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_error_after_two_pending_polls() {
        let script = [("PENDING", None), ("PENDING", None), ("ERROR", Some(3))];
        let task = Task::new("task-7", Scripted::new(&script));

        let started = Instant::now();
        let err = task.wait(&opts()).await.unwrap_err();

        match &err {
            Error::TaskFailed {
                status,
                task_id,
                run_id,
                ..
            } => {
                assert_eq!(*status, TaskStatus::Error);
                assert_eq!(task_id, "task-7");
                assert_eq!(run_id.as_ref(), Some(&RunId::from(3)));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(task.backend.status_calls.load(Ordering::SeqCst), 3);
        assert_eq!(task.backend.fetch_calls.load(Ordering::SeqCst), 0);
        // Two sleeps of one interval each.
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_millis(200), "{elapsed:?}");
        assert!(elapsed < Duration::from_millis(300), "{elapsed:?}");
    }

    #[tokio::test(start_paused = true)]
    async fn test_each_terminal_failure_status() {
        for status in ["TIMEOUT", "ERROR", "PAYMENT_REQUIRED", "SOMETHING_NEW"] {
            let task = Task::new("t", Scripted::new(&[(status, None)]));

            let err = task.wait(&opts()).await.unwrap_err();

            assert_eq!(err.task_status().map(|s| s.as_str()), Some(status));
            assert_eq!(task.backend.status_calls.load(Ordering::SeqCst), 1);
            assert_eq!(task.backend.fetch_calls.load(Ordering::SeqCst), 0);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_payment_required_is_distinguishable() {
        let task = Task::new("t", Scripted::new(&[("PENDING", None), ("PAYMENT_REQUIRED", None)]));

        let err = task.wait(&opts()).await.unwrap_err();
        assert!(err.is_payment_required());
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline_exceeded() {
        // An empty script keeps answering PENDING.
        let task = Task::new("slow", Scripted::new(&[]));

        let err = task
            .wait_run_id(&opts().max_wait(Duration::from_millis(250)))
            .await
            .unwrap_err();

        assert!(matches!(err, Error::DeadlineExceeded { .. }), "unexpected error: {err}");
        // Polls at 0, 100, 200 and a final one at the 250ms deadline.
        assert_eq!(task.backend.status_calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_huge_max_wait_does_not_overflow() {
        let task = Task::new("t", Scripted::new(&[("PENDING", None), ("SUCCESS", Some(5))]));

        let run_id = task
            .wait_run_id(&opts().max_wait(Duration::from_secs(u64::MAX)))
            .await
            .unwrap();

        assert_eq!(run_id, RunId::from(5));
        assert_eq!(task.backend.status_calls.load(Ordering::SeqCst), 2);

        let task = Task::new("t", Scripted::new(&[("SUCCESS", Some(6))]));
        let result = task.wait(&opts().max_wait(Duration::MAX)).await.unwrap();
        assert_eq!(result, "result-6");
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancellation_stops_polling() {
        let task = Task::new("cancel-me", Scripted::new(&[]));
        let token = CancellationToken::new();

        let canceller = {
            let token = token.clone();
            tokio::spawn(async move {
                tokio::time::sleep(Duration::from_millis(150)).await;
                token.cancel();
            })
        };

        let err = task
            .wait_run_id(&opts().cancel_token(token))
            .await
            .unwrap_err();
        canceller.await.unwrap();

        assert!(matches!(err, Error::Cancelled { .. }), "unexpected error: {err}");
        assert_eq!(task.backend.status_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_already_cancelled_token_skips_polling() {
        let task = Task::new("t", Scripted::new(&[("SUCCESS", Some(1))]));
        let token = CancellationToken::new();
        token.cancel();

        let err = task.wait(&opts().cancel_token(token)).await.unwrap_err();

        assert!(matches!(err, Error::Cancelled { .. }));
        assert_eq!(task.backend.status_calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_evaluate_transitions() {
        let pending = TaskStatusResponse {
            status: TaskStatus::Pending,
            run_id: Some(RunId::from(1)),
        };
        assert_eq!(evaluate(TaskKind::Tts, "t", pending).unwrap(), None);

        let success = TaskStatusResponse {
            status: TaskStatus::Success,
            run_id: Some(RunId::from(1)),
        };
        assert_eq!(evaluate(TaskKind::Tts, "t", success).unwrap(), Some(RunId::from(1)));
    }
}
