use crate::api::AnalysisRequest;
use crate::catalog::CatalogEntry;

/// Which input field the user is working with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Movie,
    Custom,
}

impl InputMode {
    pub fn toggled(self) -> Self {
        match self {
            Self::Movie => Self::Custom,
            Self::Custom => Self::Movie,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Movie => "movie",
            Self::Custom => "custom",
        }
    }
}

/// Title / custom-plot input pair. Writing a non-empty value to one field
/// clears the other and switches to its mode, so at most one is ever set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputState {
    mode: InputMode,
    movie_title: String,
    custom_plot: String,
}

impl InputState {
    pub fn mode(&self) -> InputMode {
        self.mode
    }

    pub fn movie_title(&self) -> &str {
        &self.movie_title
    }

    pub fn custom_plot(&self) -> &str {
        &self.custom_plot
    }

    /// Switch the visible field. Text in either field is kept.
    pub fn set_mode(&mut self, mode: InputMode) {
        self.mode = mode;
    }

    pub fn set_movie_title(&mut self, text: impl Into<String>) {
        self.movie_title = text.into();
        if !self.movie_title.is_empty() {
            self.custom_plot.clear();
            self.mode = InputMode::Movie;
        }
    }

    pub fn set_custom_plot(&mut self, text: impl Into<String>) {
        self.custom_plot = text.into();
        if !self.custom_plot.is_empty() {
            self.movie_title.clear();
            self.mode = InputMode::Custom;
        }
    }

    /// Picking a catalog suggestion: exact title, movie mode.
    pub fn select_movie(&mut self, entry: &CatalogEntry) {
        self.set_movie_title(entry.title);
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Build the request body, or `None` if neither field has content.
    /// Whitespace-only text counts as empty; sent values are trimmed.
    pub fn to_request(&self) -> Option<AnalysisRequest> {
        let title = self.movie_title.trim();
        let plot = self.custom_plot.trim();
        match (title.is_empty(), plot.is_empty()) {
            (true, true) => None,
            (false, true) => Some(AnalysisRequest::title(title)),
            (true, false) => Some(AnalysisRequest::custom_plot(plot)),
            // Unreachable through the setters; the visible field wins
            (false, false) => Some(match self.mode {
                InputMode::Movie => AnalysisRequest::title(title),
                InputMode::Custom => AnalysisRequest::custom_plot(plot),
            }),
        }
    }
}
