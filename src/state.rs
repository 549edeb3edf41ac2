use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::mpsc::{Receiver, Sender, channel};

use tokio::runtime::Handle;

use crate::api::AnalysisClient;
use crate::config::StalePolicy;
use crate::data::loader;
use crate::data::model::AnalysisResult;
use crate::error::SubmitError;

// ---------------------------------------------------------------------------
// Request state machine
// ---------------------------------------------------------------------------

/// Lifecycle of the analysis request, observed by the UI each frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum RequestState {
    #[default]
    Idle,
    Loading,
    Succeeded(AnalysisResult),
    Failed(String),
}

impl RequestState {
    pub fn is_loading(&self) -> bool {
        matches!(self, RequestState::Loading)
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            RequestState::Failed(msg) => Some(msg.as_str()),
            _ => None,
        }
    }

    pub fn result(&self) -> Option<&AnalysisResult> {
        match self {
            RequestState::Succeeded(result) => Some(result),
            _ => None,
        }
    }
}

/// Called from the worker once a response is ready, e.g. to wake the UI.
pub type Notifier = Arc<dyn Fn() + Send + Sync>;

/// Outcome of one submission, tagged with the submission it belongs to.
struct Completion {
    generation: u64,
    years: Vec<String>,
    outcome: Result<AnalysisResult, SubmitError>,
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    client: Arc<dyn AnalysisClient>,
    runtime: Handle,
    stale_policy: StalePolicy,
    notifier: Option<Notifier>,

    /// File picked by the user (None until one is chosen).
    pub selected_file: Option<PathBuf>,

    /// Current request state.
    pub request: RequestState,

    /// Year labels (column A) of the submission behind `request`.
    pub years: Vec<String>,

    /// Generation of the newest submission.
    generation: u64,
    /// Submissions whose responses have not been applied yet.
    in_flight: usize,

    tx: Sender<Completion>,
    rx: Receiver<Completion>,
}

impl AppState {
    pub fn new(client: Arc<dyn AnalysisClient>, runtime: Handle, stale_policy: StalePolicy) -> Self {
        let (tx, rx) = channel();
        Self {
            client,
            runtime,
            stale_policy,
            notifier: None,
            selected_file: None,
            request: RequestState::Idle,
            years: Vec::new(),
            generation: 0,
            in_flight: 0,
            tx,
            rx,
        }
    }

    /// Install a callback run whenever a response arrives.
    pub fn set_notifier(&mut self, notifier: Notifier) {
        self.notifier = Some(notifier);
    }

    /// Remember the file to analyse. Parsing happens on submit.
    pub fn select_file(&mut self, path: &Path) {
        log::info!("Selected {}", path.display());
        self.selected_file = Some(path.to_path_buf());
        if matches!(self.request, RequestState::Failed(_)) {
            self.request = RequestState::Idle;
        }
    }

    /// Whether any submission is still waiting for its response.
    pub fn has_pending(&self) -> bool {
        self.in_flight > 0
    }

    /// Parse the selected file and send its observations for analysis.
    ///
    /// Parsing is synchronous; the HTTP request runs on the runtime and its
    /// outcome is applied by a later [`AppState::poll`].
    pub fn submit(&mut self) -> Result<(), SubmitError> {
        // Every attempt supersedes older ones, even if it fails before sending.
        self.generation += 1;

        let Some(path) = self.selected_file.clone() else {
            return self.fail(SubmitError::NoFileSelected);
        };

        let matrix = match loader::load_matrix(&path) {
            Ok(matrix) => matrix,
            Err(e) => return self.fail(e.into()),
        };

        let observations = matrix.flattened();
        log::info!(
            "Submitting {} observations from {} rows of {}",
            observations.len(),
            matrix.len(),
            path.display()
        );

        self.in_flight += 1;
        self.request = RequestState::Loading;

        let completion_tx = self.tx.clone();
        let client = Arc::clone(&self.client);
        let notifier = self.notifier.clone();
        let generation = self.generation;
        let years = matrix.years;

        self.runtime.spawn(async move {
            let outcome = client.analyze(&observations).await;
            // The receiver only goes away with the window.
            let _ = completion_tx.send(Completion {
                generation,
                years,
                outcome,
            });
            if let Some(notify) = notifier {
                notify();
            }
        });

        Ok(())
    }

    /// Apply every response that has arrived since the last call.
    pub fn poll(&mut self) {
        while let Ok(done) = self.rx.try_recv() {
            self.in_flight = self.in_flight.saturating_sub(1);

            if self.stale_policy == StalePolicy::LatestOnly && done.generation < self.generation {
                log::debug!(
                    "Dropping response of submission {} (newest is {})",
                    done.generation,
                    self.generation
                );
                continue;
            }

            match done.outcome {
                Ok(result) => {
                    log::info!(
                        "Received {} harmonic components",
                        result.frequencies.len()
                    );
                    self.years = done.years;
                    self.request = RequestState::Succeeded(result);
                }
                Err(e) => {
                    log::error!("Analysis failed: {e}");
                    self.request = RequestState::Failed(e.to_string());
                }
            }
        }
    }

    fn fail(&mut self, err: SubmitError) -> Result<(), SubmitError> {
        log::error!("Submit failed: {err}");
        self.request = RequestState::Failed(err.to_string());
        Err(err)
    }
}
