//! Workflow controller: owns the input, the wizard, the stored result and
//! the request lifecycle for one analysis session.
//!
//! Requests are tagged with an epoch. Reset, an input-mode switch and every
//! new submission bump it; a response whose epoch is no longer current is
//! dropped instead of overwriting newer state. Nothing is cancelled.

use std::path::Path;

use thiserror::Error;

use crate::api::{AnalysisBackend, AnalysisRequest, AnalysisResult, BackendError};
use crate::catalog::{self, CatalogEntry};
use crate::download::{self, DownloadAction, DownloadControl, DownloadSequencer, ExportError, ReportKind, SavedReport};
use crate::input::{InputMode, InputState};
use crate::transform::{self, EmotionInsightsView, NormalizedViews, PlotView, SceneTableView, TimelineView};
use crate::wizard::{Step, Wizard};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    #[error("Please provide either a movie title or a custom plot.")]
    MissingInput,
    /// Carries the user-facing message (backend detail or generic text).
    #[error("{0}")]
    RequestFailed(String),
}

/// Snapshot of the controller's externally visible state.
#[derive(Debug, Clone, PartialEq)]
pub struct WizardState {
    pub active_step: Step,
    pub has_result: bool,
    pub input_mode: InputMode,
    pub loading: bool,
    pub error: Option<String>,
}

/// A submitted request waiting for its response.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingAnalysis {
    epoch: u64,
    request: AnalysisRequest,
}

impl PendingAnalysis {
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn request(&self) -> &AnalysisRequest {
        &self.request
    }
}

/// How a call to [`Workflow::analyze`] ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisOutcome {
    /// Result stored, wizard moved on.
    Applied,
    /// Backend failed; `error` is set.
    Failed,
    /// Validation failed before any request was made.
    Rejected,
    /// Response arrived for an outdated epoch and was dropped.
    Stale,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InputView {
    pub mode: InputMode,
    pub movie_title: String,
    pub custom_plot: String,
    /// Catalog matches for the typed title.
    pub suggestions: Vec<&'static CatalogEntry>,
    pub featured: &'static [CatalogEntry],
    pub loading: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlotStepView {
    pub revealed: bool,
    /// Only present once the spoiler gate is confirmed.
    pub plot: Option<PlotView>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DownloadView {
    pub controls: &'static [DownloadControl],
    pub csv_available: bool,
    pub pdf_available: bool,
}

/// The one view model the active step renders. `None` payloads mean
/// "no data available" for that step.
#[derive(Debug, Clone, PartialEq)]
pub enum StepView {
    Input(InputView),
    PlotSummary(PlotStepView),
    EmotionInsights(Option<EmotionInsightsView>),
    SceneAnalysis(Option<SceneTableView>),
    Timeline(Option<TimelineView>),
    Download(DownloadView),
}

#[derive(Debug, Default)]
pub struct Workflow {
    input: InputState,
    wizard: Wizard,
    downloads: DownloadSequencer,
    result: Option<AnalysisResult>,
    error: Option<AnalysisError>,
    epoch: u64,
    in_flight: Option<u64>,
}

impl Workflow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> WizardState {
        WizardState {
            active_step: self.wizard.step(),
            has_result: self.has_result(),
            input_mode: self.input.mode(),
            loading: self.is_loading(),
            error: self.error.as_ref().map(|e| e.to_string()),
        }
    }

    pub fn step(&self) -> Step {
        self.wizard.step()
    }

    pub fn has_result(&self) -> bool {
        self.result.is_some()
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn error(&self) -> Option<&AnalysisError> {
        self.error.as_ref()
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    pub fn result(&self) -> Option<&AnalysisResult> {
        self.result.as_ref()
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn input(&self) -> &InputState {
        &self.input
    }

    pub fn spoiler_revealed(&self) -> bool {
        self.wizard.spoiler_revealed()
    }

    pub fn downloads(&self) -> &DownloadSequencer {
        &self.downloads
    }

    // -- Input --------------------------------------------------------------

    pub fn set_mode(&mut self, mode: InputMode) {
        self.with_input(|input| input.set_mode(mode));
    }

    pub fn toggle_mode(&mut self) {
        let mode = self.input.mode().toggled();
        self.set_mode(mode);
    }

    pub fn set_movie_title(&mut self, text: impl Into<String>) {
        let text = text.into();
        self.with_input(|input| input.set_movie_title(text));
    }

    pub fn set_custom_plot(&mut self, text: impl Into<String>) {
        let text = text.into();
        self.with_input(|input| input.set_custom_plot(text));
    }

    pub fn select_movie(&mut self, entry: &CatalogEntry) {
        self.with_input(|input| input.select_movie(entry));
    }

    /// Apply an input edit; a mode change while a request is in flight
    /// invalidates that request.
    fn with_input(&mut self, edit: impl FnOnce(&mut InputState)) {
        let before = self.input.mode();
        edit(&mut self.input);
        if self.input.mode() != before && self.in_flight.is_some() {
            self.epoch += 1;
            log::info!(
                "Input mode switched to {} mid-request; response will be discarded",
                self.input.mode().as_str()
            );
        }
    }

    // -- Request lifecycle ----------------------------------------------------

    /// Validate the input and open a request. On validation failure the
    /// error is recorded and no request exists.
    pub fn begin_analysis(&mut self) -> Result<PendingAnalysis, AnalysisError> {
        let Some(request) = self.input.to_request() else {
            self.error = Some(AnalysisError::MissingInput);
            return Err(AnalysisError::MissingInput);
        };

        if self.in_flight.is_some() {
            log::warn!("Analysis submitted while another is in flight; the earlier one is superseded");
        }

        self.epoch += 1;
        self.in_flight = Some(self.epoch);
        self.error = None;
        log::info!("Requesting analysis for {} (epoch {})", request.describe(), self.epoch);

        Ok(PendingAnalysis {
            epoch: self.epoch,
            request,
        })
    }

    /// Apply a response. Stale epochs are dropped without touching state
    /// other than the loading flag of their own request.
    pub fn complete(
        &mut self,
        pending: PendingAnalysis,
        response: Result<AnalysisResult, BackendError>,
    ) -> AnalysisOutcome {
        if self.in_flight == Some(pending.epoch) {
            self.in_flight = None;
        }

        if pending.epoch != self.epoch {
            log::warn!(
                "Discarding response for epoch {} (current epoch {})",
                pending.epoch,
                self.epoch
            );
            return AnalysisOutcome::Stale;
        }

        match response {
            Ok(result) => {
                log::info!(
                    "Analysis complete: {} scenes, {} top emotions",
                    result.emotions.len(),
                    result.top_emotions.as_ref().map_or(0, Vec::len)
                );
                self.result = Some(result);
                self.error = None;
                self.downloads.reset();
                self.wizard.on_result();
                AnalysisOutcome::Applied
            }
            Err(e) => {
                log::warn!("Analysis failed: {e}");
                self.error = Some(AnalysisError::RequestFailed(e.user_message()));
                AnalysisOutcome::Failed
            }
        }
    }

    /// Validate, call the backend once, apply the response.
    pub async fn analyze(&mut self, backend: &dyn AnalysisBackend) -> AnalysisOutcome {
        let pending = match self.begin_analysis() {
            Ok(p) => p,
            Err(e) => {
                log::info!("Analysis rejected: {e}");
                return AnalysisOutcome::Rejected;
            }
        };
        let response = backend.analyze(pending.request()).await;
        self.complete(pending, response)
    }

    // -- Navigation -----------------------------------------------------------

    pub fn can_advance(&self) -> bool {
        self.wizard.can_advance(self.has_result())
    }

    pub fn next(&mut self) -> bool {
        self.wizard.next(self.has_result())
    }

    pub fn can_go_back(&self) -> bool {
        self.wizard.can_go_back()
    }

    pub fn back(&mut self) -> bool {
        self.wizard.back()
    }

    pub fn reveal_spoiler(&mut self) {
        self.wizard.reveal_spoiler();
    }

    /// Back to a blank input step. Any in-flight response becomes stale.
    pub fn reset(&mut self) {
        self.epoch += 1;
        self.in_flight = None;
        self.result = None;
        self.error = None;
        self.input.clear();
        self.wizard.reset();
        self.downloads.reset();
        log::debug!("Workflow reset (epoch {})", self.epoch);
    }

    // -- Downloads ------------------------------------------------------------

    pub fn press_download(&mut self, control: DownloadControl) -> DownloadAction {
        self.downloads.press(control)
    }

    fn payload(&self, kind: ReportKind) -> &str {
        let Some(result) = &self.result else {
            return "";
        };
        match kind {
            ReportKind::Csv => &result.csv_data,
            ReportKind::Pdf => &result.pdf_data,
            ReportKind::Chart => result.emotion_distribution.as_deref().unwrap_or(""),
        }
    }

    /// Write one report. A missing payload writes an empty file.
    pub fn save_report(&self, kind: ReportKind, dir: &Path) -> Result<SavedReport, ExportError> {
        download::save_report(self.payload(kind), kind, dir)
    }

    // -- Views ----------------------------------------------------------------

    /// All view models for the stored result.
    pub fn views(&self) -> Option<NormalizedViews> {
        self.result.as_ref().map(transform::normalize)
    }

    /// The view model the active step renders, rebuilt from current state.
    pub fn current_view(&self) -> StepView {
        let views = self.views();
        match self.wizard.step() {
            Step::Input => StepView::Input(InputView {
                mode: self.input.mode(),
                movie_title: self.input.movie_title().to_string(),
                custom_plot: self.input.custom_plot().to_string(),
                suggestions: catalog::filter(self.input.movie_title()),
                featured: catalog::FEATURED,
                loading: self.is_loading(),
            }),
            Step::PlotSummary => {
                let revealed = self.wizard.spoiler_revealed();
                StepView::PlotSummary(PlotStepView {
                    revealed,
                    plot: views.filter(|_| revealed).map(|v| v.plot),
                })
            }
            Step::EmotionInsights => StepView::EmotionInsights(views.map(|v| v.insights)),
            Step::SceneAnalysis => StepView::SceneAnalysis(views.map(|v| v.scenes)),
            Step::Timeline => StepView::Timeline(views.and_then(|v| v.timeline)),
            Step::Download => StepView::Download(DownloadView {
                controls: self.downloads.controls(),
                csv_available: !self.payload(ReportKind::Csv).is_empty(),
                pdf_available: !self.payload(ReportKind::Pdf).is_empty(),
            }),
        }
    }
}
