use crate::{
    download,
    error::{PollinationsError, Result},
    logger,
    models::{GenerationParameters, ImageHandle, ImageSummary, Notification},
    notify::Notifier,
    pollinations::{ImageFetcher, PollinationsClient, RequestBuilder},
};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

/// Read-only view of the controller state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Loading,
    Success(ImageSummary),
    Failed(String),
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Idle => write!(f, "idle"),
            Phase::Loading => write!(f, "generating..."),
            Phase::Success(image) => write!(f, "ready ({} bytes, seed {})", image.size, image.seed),
            Phase::Failed(message) => write!(f, "failed: {}", message),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    Generated(ImageSummary),
    /// A newer submit or a shutdown overtook this request; its result was dropped.
    Cancelled,
}

enum State {
    Idle,
    Loading,
    Success(ImageHandle),
    Failed(String),
}

struct Inner {
    state: State,
    generation: u64,
    in_flight: Option<CancellationToken>,
}

impl Inner {
    fn replace_state(&mut self, next: State) {
        if let State::Success(previous) = std::mem::replace(&mut self.state, next) {
            previous.release();
        }
    }

    fn cancel_in_flight(&mut self) -> bool {
        match self.in_flight.take() {
            Some(token) => {
                token.cancel();
                true
            }
            None => false,
        }
    }
}

/// Returns the controller to idle if a submit future is dropped mid-fetch.
struct InFlightGuard {
    inner: Arc<Mutex<Inner>>,
    generation: u64,
    armed: bool,
}

impl InFlightGuard {
    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let mut inner = self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if inner.generation == self.generation {
            log::info!("Request abandoned by caller, returning to idle");
            inner.cancel_in_flight();
            inner.generation += 1;
            inner.replace_state(State::Idle);
        }
    }
}

/// Drives one generation at a time: validate, build, fetch, publish.
///
/// Clones share state, so a submit from one clone supersedes an in-flight
/// submit from another.
#[derive(Clone)]
pub struct GenerationController {
    fetcher: Arc<dyn ImageFetcher>,
    notifier: Arc<dyn Notifier>,
    request_builder: RequestBuilder,
    inner: Arc<Mutex<Inner>>,
}

impl GenerationController {
    pub fn new(
        fetcher: Arc<dyn ImageFetcher>,
        notifier: Arc<dyn Notifier>,
        request_builder: RequestBuilder,
    ) -> Self {
        Self {
            fetcher,
            notifier,
            request_builder,
            inner: Arc::new(Mutex::new(Inner {
                state: State::Idle,
                generation: 0,
                in_flight: None,
            })),
        }
    }

    pub fn with_client(client: PollinationsClient, notifier: Arc<dyn Notifier>) -> Self {
        let request_builder = client.request_builder().clone();
        Self::new(Arc::new(client), notifier, request_builder)
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn phase(&self) -> Phase {
        match &self.lock().state {
            State::Idle => Phase::Idle,
            State::Loading => Phase::Loading,
            State::Success(handle) => Phase::Success(ImageSummary::from(handle)),
            State::Failed(message) => Phase::Failed(message.clone()),
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.lock().state, State::Loading)
    }

    /// Inline error text, present only while the last request failed.
    pub fn error_banner(&self) -> Option<String> {
        match &self.lock().state {
            State::Failed(message) => Some(message.clone()),
            _ => None,
        }
    }

    pub fn with_image<R>(&self, f: impl FnOnce(&ImageHandle) -> R) -> Option<R> {
        match &self.lock().state {
            State::Success(handle) => Some(f(handle)),
            _ => None,
        }
    }

    pub async fn submit(&self, params: &GenerationParameters) -> Result<SubmitOutcome> {
        if !params.has_prompt() {
            log::warn!("Rejected generation request with an empty prompt");
            self.notifier.notify(Notification::missing_prompt());
            return Err(PollinationsError::ValidationError);
        }

        let built = self.request_builder.build(params);
        let request_id = Uuid::new_v4();
        let (generation, token) = self.begin();
        let guard = InFlightGuard {
            inner: Arc::clone(&self.inner),
            generation,
            armed: true,
        };

        log::info!(
            "🎨 [{}] Generating {}x{} image with {} (seed {})",
            request_id,
            params.width,
            params.height,
            params.model,
            built.seed
        );
        log::debug!("[{}] GET {}", request_id, built.redacted_url());

        let timer = logger::timer("image fetch");
        let fetched = tokio::select! {
            _ = token.cancelled() => {
                log::info!("[{}] Request cancelled before completion", request_id);
                return Ok(SubmitOutcome::Cancelled);
            }
            fetched = self.fetcher.fetch(&built.url) => fetched,
        };
        drop(timer);

        let outcome = fetched.and_then(|response| {
            if response.is_success() {
                Ok(ImageHandle::new(
                    response.body,
                    response.content_type,
                    built.seed,
                ))
            } else {
                Err(PollinationsError::RequestError {
                    status: response.status,
                    status_text: response.status_text,
                })
            }
        });

        guard.disarm();
        self.finish(request_id, generation, outcome)
    }

    fn begin(&self) -> (u64, CancellationToken) {
        let mut inner = self.lock();
        if inner.cancel_in_flight() {
            log::debug!("Cancelled previous in-flight request");
        }
        inner.generation += 1;
        inner.replace_state(State::Loading);

        let token = CancellationToken::new();
        inner.in_flight = Some(token.clone());
        (inner.generation, token)
    }

    fn finish(
        &self,
        request_id: Uuid,
        generation: u64,
        outcome: Result<ImageHandle>,
    ) -> Result<SubmitOutcome> {
        let notification;
        let result;
        {
            let mut inner = self.lock();
            if inner.generation != generation {
                log::info!("[{}] Discarding result of superseded request", request_id);
                if let Ok(handle) = outcome {
                    handle.release();
                }
                return Ok(SubmitOutcome::Cancelled);
            }
            inner.in_flight = None;

            match outcome {
                Ok(handle) => {
                    let summary = ImageSummary::from(&handle);
                    log::info!(
                        "✅ [{}] Image {} ready ({} bytes, {})",
                        request_id,
                        summary.id,
                        summary.size,
                        handle.content_type()
                    );
                    inner.replace_state(State::Success(handle));
                    notification = Notification::generated();
                    result = Ok(SubmitOutcome::Generated(summary));
                }
                Err(err) => {
                    let message = err.user_message();
                    log::error!("❌ [{}] Generation failed: {}", request_id, message);
                    inner.replace_state(State::Failed(message.clone()));
                    notification = Notification::failed(message);
                    result = Err(err);
                }
            }
        }

        self.notifier.notify(notification);
        result
    }

    /// Saves the current image into `dir`; `Ok(None)` when there is nothing to save.
    pub async fn download(&self, dir: &Path) -> Result<Option<PathBuf>> {
        let Some((image_id, bytes)) = self.with_image(|h| (h.id(), h.bytes().to_vec())) else {
            log::debug!("No generated image to download");
            return Ok(None);
        };
        download::write_image(image_id, &bytes, dir).await.map(Some)
    }

    /// Cancels the in-flight request, if any, and returns to idle.
    pub fn cancel(&self) -> bool {
        let mut inner = self.lock();
        if inner.cancel_in_flight() {
            inner.generation += 1;
            inner.replace_state(State::Idle);
            true
        } else {
            false
        }
    }

    /// Cancels any in-flight request and releases the held image.
    pub fn shutdown(&self) {
        let mut inner = self.lock();
        inner.cancel_in_flight();
        inner.generation += 1;
        inner.replace_state(State::Idle);
        log::debug!("Generation controller shut down");
    }
}
