/// The six wizard steps, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Step {
    #[default]
    Input,
    PlotSummary,
    EmotionInsights,
    SceneAnalysis,
    Timeline,
    Download,
}

impl Step {
    pub const ALL: [Step; 6] = [
        Step::Input,
        Step::PlotSummary,
        Step::EmotionInsights,
        Step::SceneAnalysis,
        Step::Timeline,
        Step::Download,
    ];

    pub const LAST: Step = Step::Download;

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::Input => "Input & Analysis",
            Self::PlotSummary => "Plot Summary",
            Self::EmotionInsights => "Emotion Insights",
            Self::SceneAnalysis => "Scene Analysis",
            Self::Timeline => "Emotion Roller Coaster",
            Self::Download => "Download Report",
        }
    }

    fn next(self) -> Option<Self> {
        Self::from_index(self.index() + 1)
    }

    fn prev(self) -> Option<Self> {
        self.index().checked_sub(1).and_then(Self::from_index)
    }
}

/// Step position plus the session-local spoiler gate.
///
/// Transitions return whether they moved; an illegal move is a no-op, the
/// caller is expected to have disabled the control.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Wizard {
    step: Step,
    spoiler_revealed: bool,
}

impl Wizard {
    pub fn step(&self) -> Step {
        self.step
    }

    pub fn spoiler_revealed(&self) -> bool {
        self.spoiler_revealed
    }

    /// Forward is only possible with a result and before the last step.
    pub fn can_advance(&self, has_result: bool) -> bool {
        has_result && self.step < Step::LAST
    }

    pub fn can_go_back(&self) -> bool {
        self.step > Step::Input
    }

    pub fn next(&mut self, has_result: bool) -> bool {
        if !self.can_advance(has_result) {
            return false;
        }
        match self.step.next() {
            Some(step) => {
                self.step = step;
                true
            }
            None => false,
        }
    }

    pub fn back(&mut self) -> bool {
        match self.step.prev() {
            Some(step) => {
                self.step = step;
                true
            }
            None => false,
        }
    }

    /// A fresh result lands: leave the input step, re-arm the spoiler gate.
    pub(crate) fn on_result(&mut self) {
        if self.step == Step::Input {
            self.step = Step::PlotSummary;
        }
        self.spoiler_revealed = false;
    }

    /// Confirm the spoiler warning. One-way until reset or a new result.
    pub fn reveal_spoiler(&mut self) {
        self.spoiler_revealed = true;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
