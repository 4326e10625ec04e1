//! Drives one video generation request from submission to a saved file.

use super::{load_seed_image, Outcome, PollPolicy};
use crate::artifact::{format_size_mb, timestamped_filename, ArtifactStore, VIDEO_PREFIX};
use crate::error::{MediaGenError, Result};
use crate::extract::{find_video_result, ResultPayload};
use crate::gemini::{GenerationRequest, MediaClient, Operation};
use base64::Engine;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{sleep, Instant};
use tracing::{info, instrument, warn};

/// Caller-supplied parameters with defaults already applied.
#[derive(Debug, Clone)]
pub struct VideoParams {
    pub prompt: String,
    pub aspect_ratio: String,
    pub model: String,
    pub image_path: Option<String>,
}

/// Where the poll loop ended.
enum PollEnd {
    Done(Operation),
    TimedOut { operation_name: String, elapsed: Duration },
}

/// Orchestrates Veo operations.
pub struct VideoOrchestrator {
    client: Arc<dyn MediaClient>,
    store: ArtifactStore,
    policy: PollPolicy,
}

impl VideoOrchestrator {
    pub fn new(client: Arc<dyn MediaClient>, store: ArtifactStore, policy: PollPolicy) -> Self {
        Self {
            client,
            store,
            policy,
        }
    }

    pub fn policy(&self) -> PollPolicy {
        self.policy
    }

    /// Generate a video and return the outcome. Never fails.
    #[instrument(skip(self, params), fields(model = %params.model))]
    pub async fn generate(&self, params: &VideoParams) -> Outcome {
        match self.try_generate(params).await {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!("Video generation failed: {}", e);
                Outcome::failure(e.to_string())
            }
        }
    }

    async fn try_generate(&self, params: &VideoParams) -> Result<Outcome> {
        let seed_image = load_seed_image(params.image_path.as_deref()).await?;
        let request = GenerationRequest::new(&params.prompt, &params.aspect_ratio, &params.model)
            .with_seed_image(seed_image);

        self.run(&request).await
    }

    /// Submit `request`, wait for it and persist the result.
    pub async fn run(&self, request: &GenerationRequest) -> Result<Outcome> {
        let variant = if request.seed_image.is_some() {
            "image-to-video"
        } else {
            "text-to-video"
        };
        info!("Submitting {} request to {}", variant, request.model);

        let operation = self.client.submit_video(request).await?;

        let operation = match self.poll(operation).await? {
            PollEnd::Done(operation) => operation,
            PollEnd::TimedOut {
                operation_name,
                elapsed,
            } => {
                warn!(
                    "Operation {} timed out after {}s",
                    operation_name,
                    elapsed.as_secs()
                );
                return Ok(Outcome::TimedOut {
                    operation_name,
                    elapsed_ms: elapsed.as_millis() as u64,
                });
            }
        };

        if let Some(error) = &operation.error {
            return Ok(Outcome::failure(format!(
                "Video generation failed: {}",
                error.message
            )));
        }

        let response = operation.response.unwrap_or(Value::Null);
        let bytes = match find_video_result(&response) {
            Some(ResultPayload::RemoteReference { uri, .. }) => {
                info!("Downloading generated video");
                self.client.download(&uri).await?
            }
            Some(ResultPayload::InlineBinary { data, .. }) => {
                base64::engine::general_purpose::STANDARD
                    .decode(data)
                    .map_err(|e| MediaGenError::Decode(e.to_string()))?
            }
            Some(ResultPayload::Text { .. }) | None => {
                warn!("Operation {} finished without a video", operation.name);
                return Ok(Outcome::EmptyResult {
                    raw_response: response,
                });
            }
        };

        let size_mb = format_size_mb(bytes.len() as u64);
        info!("Downloaded video ({} MB)", size_mb);

        let file = self
            .store
            .save(&timestamped_filename(VIDEO_PREFIX, "mp4"), &bytes)
            .await?;
        info!("Saved video to {}", file.display());

        Ok(Outcome::Success {
            file,
            size_mb,
            model: request.model.clone(),
            aspect_ratio: request.aspect_ratio.clone(),
        })
    }

    /// Poll until the operation is done or the deadline passes.
    ///
    /// The deadline is checked before each sleep, so the wait may overrun the
    /// timeout by up to one interval.
    async fn poll(&self, mut operation: Operation) -> Result<PollEnd> {
        let started = Instant::now();

        loop {
            if operation.done {
                info!("Operation {} done", operation.name);
                return Ok(PollEnd::Done(operation));
            }

            let elapsed = started.elapsed();
            if elapsed > self.policy.timeout {
                return Ok(PollEnd::TimedOut {
                    operation_name: operation.name,
                    elapsed,
                });
            }

            info!(
                "Waiting for video generation... ({}s elapsed)",
                elapsed.as_secs()
            );
            sleep(self.policy.interval).await;

            operation = self.client.get_operation(&operation.name).await?;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gemini::{OperationError, Part};
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    const OP_NAME: &str = "models/veo-3.0-generate-001/operations/op1";

    /// Scripted backend: reports `done` after a fixed number of polls.
    struct ScriptedClient {
        pending_polls: Option<usize>,
        response: Value,
        error: Option<OperationError>,
        download: std::result::Result<Vec<u8>, u16>,
        /// Reject the submission with this message.
        submit_error: Option<String>,
        /// Fail the n-th poll (1-based) with a 503.
        fail_on_poll: Option<usize>,
        polls: AtomicUsize,
        downloads: Mutex<Vec<String>>,
        submitted: Mutex<Vec<GenerationRequest>>,
    }

    impl ScriptedClient {
        fn new(pending_polls: Option<usize>, response: Value) -> Self {
            Self {
                pending_polls,
                response,
                error: None,
                download: Ok(b"MP4DATA".to_vec()),
                submit_error: None,
                fail_on_poll: None,
                polls: AtomicUsize::new(0),
                downloads: Mutex::new(Vec::new()),
                submitted: Mutex::new(Vec::new()),
            }
        }

        fn polls(&self) -> usize {
            self.polls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl MediaClient for ScriptedClient {
        async fn generate_content(&self, _request: &GenerationRequest) -> Result<Vec<Part>> {
            Ok(Vec::new())
        }

        async fn submit_video(&self, request: &GenerationRequest) -> Result<Operation> {
            self.submitted.lock().unwrap().push(request.clone());
            if let Some(message) = &self.submit_error {
                return Err(MediaGenError::Api {
                    status: 400,
                    message: message.clone(),
                });
            }
            Ok(Operation::pending(OP_NAME))
        }

        async fn get_operation(&self, name: &str) -> Result<Operation> {
            assert_eq!(name, OP_NAME);
            let poll = self.polls.fetch_add(1, Ordering::SeqCst) + 1;
            if self.fail_on_poll == Some(poll) {
                return Err(MediaGenError::Api {
                    status: 503,
                    message: "unavailable".to_string(),
                });
            }
            match self.pending_polls {
                Some(pending) if poll > pending => Ok(Operation {
                    error: self.error.clone(),
                    ..Operation::completed(name, self.response.clone())
                }),
                _ => Ok(Operation::pending(name)),
            }
        }

        async fn download(&self, uri: &str) -> Result<Vec<u8>> {
            self.downloads.lock().unwrap().push(uri.to_string());
            self.download
                .clone()
                .map_err(|status| MediaGenError::Download { status })
        }
    }

    fn sample_response() -> Value {
        json!({
            "generateVideoResponse": {
                "generatedSamples": [{ "video": { "uri": "https://x/files/v:download?alt=media" } }]
            }
        })
    }

    fn params(image_path: Option<&str>) -> VideoParams {
        VideoParams {
            prompt: "a cat".to_string(),
            aspect_ratio: "9:16".to_string(),
            model: "veo-3.0-generate-001".to_string(),
            image_path: image_path.map(str::to_string),
        }
    }

    fn orchestrator(client: Arc<ScriptedClient>, dir: &std::path::Path) -> VideoOrchestrator {
        VideoOrchestrator::new(client, ArtifactStore::new(dir), PollPolicy::default())
    }

    fn file_count(dir: &std::path::Path) -> usize {
        std::fs::read_dir(dir).map(|d| d.count()).unwrap_or(0)
    }

    #[tokio::test(start_paused = true)]
    async fn test_polls_until_done_then_saves() {
        let dir = tempfile::tempdir().unwrap();
        let client = Arc::new(ScriptedClient::new(Some(3), sample_response()));
        let orch = orchestrator(client.clone(), dir.path());

        let outcome = orch.generate(&params(None)).await;

        assert_eq!(client.polls(), 4);
        assert_eq!(
            client.downloads.lock().unwrap().as_slice(),
            ["https://x/files/v:download?alt=media"]
        );

        match outcome {
            Outcome::Success {
                file,
                size_mb,
                model,
                aspect_ratio,
            } => {
                assert!(file.is_absolute());
                assert!(file
                    .file_name()
                    .unwrap()
                    .to_string_lossy()
                    .starts_with("gemini-video-"));
                assert_eq!(std::fs::read(&file).unwrap(), b"MP4DATA");
                assert_eq!(size_mb, "0.0");
                assert_eq!(model, "veo-3.0-generate-001");
                assert_eq!(aspect_ratio, "9:16");
            }
            other => panic!("Expected Success, got {:?}", other),
        }
        assert_eq!(file_count(dir.path()), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_times_out_without_writing() {
        let dir = tempfile::tempdir().unwrap();
        let client = Arc::new(ScriptedClient::new(None, sample_response()));
        let policy = PollPolicy {
            interval: Duration::from_secs(10),
            timeout: Duration::from_secs(55),
        };
        let orch = VideoOrchestrator::new(client.clone(), ArtifactStore::new(dir.path()), policy);

        let outcome = orch.generate(&params(None)).await;

        match outcome {
            Outcome::TimedOut {
                operation_name,
                elapsed_ms,
            } => {
                assert_eq!(operation_name, OP_NAME);
                assert!(elapsed_ms > 55_000);
                assert!(elapsed_ms <= 65_000);
            }
            other => panic!("Expected TimedOut, got {:?}", other),
        }
        assert_eq!(client.polls(), 6);
        assert!(client.downloads.lock().unwrap().is_empty());
        assert_eq!(file_count(dir.path()), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_done_without_samples_is_empty_result() {
        let dir = tempfile::tempdir().unwrap();
        let raw = json!({ "generateVideoResponse": { "raiMediaFilteredCount": 1 } });
        let client = Arc::new(ScriptedClient::new(Some(0), raw.clone()));
        let orch = orchestrator(client.clone(), dir.path());

        let outcome = orch.generate(&params(None)).await;

        assert_eq!(outcome, Outcome::EmptyResult { raw_response: raw });
        assert_eq!(file_count(dir.path()), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_download_failure_reports_status() {
        let dir = tempfile::tempdir().unwrap();
        let mut client = ScriptedClient::new(Some(0), sample_response());
        client.download = Err(403);
        let orch = orchestrator(Arc::new(client), dir.path());

        match orch.generate(&params(None)).await {
            Outcome::Failure { reason } => assert!(reason.contains("403")),
            other => panic!("Expected Failure, got {:?}", other),
        }
        assert_eq!(file_count(dir.path()), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_submit_error_is_failure() {
        let dir = tempfile::tempdir().unwrap();
        let mut client = ScriptedClient::new(Some(0), sample_response());
        client.submit_error = Some("invalid aspect ratio".to_string());
        let client = Arc::new(client);
        let orch = orchestrator(client.clone(), dir.path());

        match orch.generate(&params(None)).await {
            Outcome::Failure { reason } => {
                assert!(reason.contains("400"));
                assert!(reason.contains("invalid aspect ratio"));
            }
            other => panic!("Expected Failure, got {:?}", other),
        }
        assert_eq!(client.polls(), 0);
        assert!(client.downloads.lock().unwrap().is_empty());
        assert_eq!(file_count(dir.path()), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_poll_error_is_failure_without_writing() {
        let dir = tempfile::tempdir().unwrap();
        let mut client = ScriptedClient::new(Some(5), sample_response());
        client.fail_on_poll = Some(2);
        let client = Arc::new(client);
        let orch = orchestrator(client.clone(), dir.path());

        assert_eq!(
            orch.generate(&params(None)).await,
            Outcome::failure("Gemini API error (503): unavailable")
        );
        assert_eq!(client.polls(), 2);
        assert!(client.downloads.lock().unwrap().is_empty());
        assert_eq!(file_count(dir.path()), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_operation_error_is_failure() {
        let dir = tempfile::tempdir().unwrap();
        let mut client = ScriptedClient::new(Some(1), Value::Null);
        client.error = Some(OperationError {
            code: Some(3),
            message: "prompt blocked".to_string(),
        });
        let orch = orchestrator(Arc::new(client), dir.path());

        assert_eq!(
            orch.generate(&params(None)).await,
            Outcome::failure("Video generation failed: prompt blocked")
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_missing_seed_image_falls_back_to_text() {
        let dir = tempfile::tempdir().unwrap();
        let client = Arc::new(ScriptedClient::new(Some(0), sample_response()));
        let orch = orchestrator(client.clone(), dir.path());

        let with_missing = orch.generate(&params(Some("/no/such/seed.png"))).await;
        let without = orch.generate(&params(None)).await;

        assert!(with_missing.is_success());
        assert!(without.is_success());

        let submitted = client.submitted.lock().unwrap();
        assert_eq!(submitted.len(), 2);
        assert_eq!(submitted[0], submitted[1]);
        assert!(submitted[0].seed_image.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_existing_seed_image_is_attached() {
        let dir = tempfile::tempdir().unwrap();
        let seed = dir.path().join("seed.JPG");
        std::fs::write(&seed, b"hello").unwrap();

        let out = tempfile::tempdir().unwrap();
        let client = Arc::new(ScriptedClient::new(Some(0), sample_response()));
        let orch = orchestrator(client.clone(), out.path());

        assert!(orch.generate(&params(seed.to_str())).await.is_success());

        let submitted = client.submitted.lock().unwrap();
        let image = submitted[0].seed_image.as_ref().unwrap();
        assert_eq!(image.mime_type, "image/jpeg");
        assert_eq!(image.data, "aGVsbG8=");
    }
}
