//! The fixed seven-emotion taxonomy used across every view.
//!
//! Codes are the ordinal y-axis values of the timeline (1 = Joy … 7 = Anger).
//! Labels arrive from the backend in lowercase ("joy"); display labels are
//! capitalized. Anything outside the taxonomy resolves to neutral gray.

/// Color used for neutral and for anything the taxonomy doesn't know.
pub const NEUTRAL_GRAY: &str = "#808080";

/// Significance sentence for labels without a specific one.
pub const GENERIC_SIGNIFICANCE: &str =
    "This emotion plays a significant role in shaping the narrative's emotional landscape.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Emotion {
    Joy,
    Disgust,
    Surprise,
    Neutral,
    Fear,
    Sadness,
    Anger,
}

impl Emotion {
    /// All emotions in code order (index + 1 == code).
    pub const ALL: [Emotion; 7] = [
        Emotion::Joy,
        Emotion::Disgust,
        Emotion::Surprise,
        Emotion::Neutral,
        Emotion::Fear,
        Emotion::Sadness,
        Emotion::Anger,
    ];

    /// Ordinal code in 1..=7.
    pub fn code(self) -> i64 {
        match self {
            Self::Joy => 1,
            Self::Disgust => 2,
            Self::Surprise => 3,
            Self::Neutral => 4,
            Self::Fear => 5,
            Self::Sadness => 6,
            Self::Anger => 7,
        }
    }

    /// Decode an ordinal. Anything outside 1..=7 is `None`.
    pub fn from_code(code: i64) -> Option<Self> {
        if (1..=7).contains(&code) {
            Some(Self::ALL[(code - 1) as usize])
        } else {
            None
        }
    }

    /// Display label ("Joy").
    pub fn label(self) -> &'static str {
        match self {
            Self::Joy => "Joy",
            Self::Disgust => "Disgust",
            Self::Surprise => "Surprise",
            Self::Neutral => "Neutral",
            Self::Fear => "Fear",
            Self::Sadness => "Sadness",
            Self::Anger => "Anger",
        }
    }

    /// Wire key as produced by the classifier ("joy").
    pub fn key(self) -> &'static str {
        match self {
            Self::Joy => "joy",
            Self::Disgust => "disgust",
            Self::Surprise => "surprise",
            Self::Neutral => "neutral",
            Self::Fear => "fear",
            Self::Sadness => "sadness",
            Self::Anger => "anger",
        }
    }

    /// Case-insensitive label lookup; accepts both "joy" and "Joy".
    pub fn from_label(label: &str) -> Option<Self> {
        let lower = label.trim().to_lowercase();
        Self::ALL.iter().copied().find(|e| e.key() == lower)
    }

    pub fn color(self) -> &'static str {
        match self {
            Self::Joy => "#FFD700",
            Self::Surprise => "#FFA500",
            Self::Neutral => NEUTRAL_GRAY,
            Self::Fear => "#800080",
            Self::Sadness => "#4169E1",
            Self::Anger => "#FF4500",
            Self::Disgust => "#32CD32",
        }
    }

    /// What a dominant share of this emotion says about the story.
    pub fn significance(self) -> &'static str {
        match self {
            Self::Joy => {
                "This suggests the narrative focuses on positive outcomes, achievements, or moments of happiness, characterizing it as uplifting or comedic."
            }
            Self::Sadness => {
                "This indicates a strong presence of loss, disappointment, or melancholy, suggesting a dramatic or tragic storyline."
            }
            Self::Anger => {
                "This points towards conflict, frustration, or confrontation being central themes, common in action, thriller, or intense drama genres."
            }
            Self::Fear => {
                "This suggests suspense, tension, or danger are significant elements, typical of horror, thriller, or suspense genres."
            }
            Self::Disgust => {
                "This highlights a character's strong aversion to something, often related to moral or physical repulsion"
            }
            Self::Surprise => {
                "This indicates unexpected events or twists play a noticeable role, potentially adding intrigue or humor depending on context."
            }
            Self::Neutral => GENERIC_SIGNIFICANCE,
        }
    }
}

/// Color for an arbitrary label, gray when unknown.
pub fn color_for_label(label: &str) -> &'static str {
    Emotion::from_label(label).map_or(NEUTRAL_GRAY, Emotion::color)
}

/// Color for an arbitrary code, gray when out of range.
pub fn color_for_code(code: i64) -> &'static str {
    Emotion::from_code(code).map_or(NEUTRAL_GRAY, Emotion::color)
}

/// Significance sentence for an arbitrary label.
pub fn significance_for_label(label: &str) -> &'static str {
    Emotion::from_label(label).map_or(GENERIC_SIGNIFICANCE, Emotion::significance)
}

/// Timeline axis tick: the emotion label for valid codes, the bare number otherwise.
pub fn axis_label(code: i64) -> String {
    match Emotion::from_code(code) {
        Some(e) => e.label().to_string(),
        None => code.to_string(),
    }
}

/// Capitalize a wire label for display ("joy" → "Joy"); unknown labels get
/// their first letter uppercased.
pub fn display_label(label: &str) -> String {
    if let Some(e) = Emotion::from_label(label) {
        return e.label().to_string();
    }
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
