//! Raw analysis payload → per-step view models.
//!
//! Everything here is pure: views are recomputed from the stored result on
//! every read, so they can never drift from it. A missing section of the
//! payload suppresses only the view built from it.

use crate::api::{AnalysisResult, SceneEmotion};
use crate::emotion::{self, Emotion};

/// Scores strictly above this mark a timeline point as high-confidence.
pub const HIGH_CONFIDENCE: f64 = 0.8;

/// Marker sizes for timeline points.
pub const MARKER_HIGH: u32 = 12;
pub const MARKER_NORMAL: u32 = 8;

/// Lowest point fill opacity; higher scores are more opaque.
const MIN_FILL_OPACITY: f64 = 0.6;

#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedViews {
    pub plot: PlotView,
    pub insights: EmotionInsightsView,
    pub scenes: SceneTableView,
    /// `None` when the payload had no scene data.
    pub timeline: Option<TimelineView>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlotView {
    pub text: String,
}

impl PlotView {
    /// Non-empty paragraphs, in order.
    pub fn paragraphs(&self) -> Vec<&str> {
        self.text
            .split('\n')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EmotionInsightsView {
    pub insights: Option<String>,
    /// Upstream-ranked top emotions; `None` when absent from the payload.
    pub top_emotions: Option<Vec<TopEmotionRow>>,
    /// Distribution bars without neutral; `None` when totals are absent.
    pub distribution: Option<DistributionSeries>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TopEmotionRow {
    pub label: String,
    pub percentage: f64,
    pub count: u64,
    pub significance: String,
    pub color: &'static str,
}

impl TopEmotionRow {
    pub fn display_label(&self) -> String {
        emotion::display_label(&self.label)
    }
}

/// Parallel category/value/color arrays for the distribution bar chart.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DistributionSeries {
    pub categories: Vec<String>,
    pub values: Vec<f64>,
    pub colors: Vec<&'static str>,
}

impl DistributionSeries {
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64, &'static str)> + '_ {
        self.categories
            .iter()
            .zip(&self.values)
            .zip(&self.colors)
            .map(|((c, v), col)| (c.as_str(), *v, *col))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SceneTableView {
    pub rows: Vec<SceneEmotion>,
}

/// Score as a one-decimal percentage ("91.0%").
pub fn format_percent(score: f64) -> String {
    format!("{:.1}%", score * 100.0)
}

/// Characters of a `width`-wide bar for a 0-100 percentage. Out-of-range
/// and NaN totals are clamped.
pub fn bar_width(percent: f64, width: usize) -> usize {
    let percent = if percent.is_nan() { 0.0 } else { percent.clamp(0.0, 100.0) };
    (percent / 100.0 * width as f64).round() as usize
}

#[derive(Debug, Clone, PartialEq)]
pub struct TimelineView {
    pub points: Vec<TimelinePoint>,
}

impl TimelineView {
    /// Emotion tick labels for the y axis, codes 1..=7.
    pub fn axis_ticks() -> Vec<(i64, String)> {
        (1..=7).map(|c| (c, emotion::axis_label(c))).collect()
    }
}

/// One chart point: x = scene number, y = emotion code.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimelinePoint {
    pub x: i64,
    pub y: i64,
    pub score: f64,
}

impl TimelinePoint {
    pub fn is_high_confidence(&self) -> bool {
        self.score > HIGH_CONFIDENCE
    }

    pub fn marker_size(&self) -> u32 {
        if self.is_high_confidence() {
            MARKER_HIGH
        } else {
            MARKER_NORMAL
        }
    }

    pub fn emotion(&self) -> Option<Emotion> {
        Emotion::from_code(self.y)
    }

    pub fn color(&self) -> &'static str {
        emotion::color_for_code(self.y)
    }

    /// Marker color with score-scaled alpha, `#RRGGBBAA`.
    pub fn fill_color(&self) -> String {
        let opacity = self.score.clamp(MIN_FILL_OPACITY, 1.0);
        format!("{}{:02x}", self.color(), (opacity * 255.0).round() as u8)
    }

    /// "Fear: 60.0%"
    pub fn tooltip(&self) -> String {
        format!("{}: {}", emotion::axis_label(self.y), format_percent(self.score))
    }
}

/// Build every step's view model from a raw result.
pub fn normalize(raw: &AnalysisResult) -> NormalizedViews {
    NormalizedViews {
        plot: PlotView {
            text: raw.plot.clone(),
        },
        insights: insights_view(raw),
        scenes: SceneTableView {
            rows: raw.emotions.clone(),
        },
        timeline: timeline_view(raw),
    }
}

pub fn insights_view(raw: &AnalysisResult) -> EmotionInsightsView {
    let top_emotions = raw.top_emotions.as_ref().map(|top| {
        top.iter()
            .map(|(label, stats)| TopEmotionRow {
                label: label.clone(),
                percentage: stats.percentage,
                count: stats.count,
                significance: if stats.significance.trim().is_empty() {
                    emotion::significance_for_label(label).to_string()
                } else {
                    stats.significance.clone()
                },
                color: emotion::color_for_label(label),
            })
            .collect()
    });

    EmotionInsightsView {
        insights: raw.insights.clone().filter(|s| !s.trim().is_empty()),
        top_emotions,
        distribution: raw.emotion_totals.as_deref().map(distribution_series),
    }
}

/// Bar series over emotion totals, neutral excluded, original order kept.
pub fn distribution_series(totals: &[(String, f64)]) -> DistributionSeries {
    let mut series = DistributionSeries::default();
    for (label, value) in totals {
        if Emotion::from_label(label) == Some(Emotion::Neutral) {
            continue;
        }
        series.categories.push(label.clone());
        series.values.push(*value);
        series.colors.push(emotion::color_for_label(label));
    }
    series
}

pub fn timeline_view(raw: &AnalysisResult) -> Option<TimelineView> {
    let data = raw.scene_data.as_ref()?;
    if !data.is_aligned() {
        log::warn!(
            "Scene data arrays differ in length (scenes={}, emotions={}, scores={}); truncating",
            data.scenes.len(),
            data.emotion_codes.len(),
            data.scores.len()
        );
    }

    let points: Vec<TimelinePoint> = data
        .scenes
        .iter()
        .zip(&data.emotion_codes)
        .zip(&data.scores)
        .map(|((&x, &y), &score)| TimelinePoint { x, y, score })
        .collect();

    if points.is_empty() {
        None
    } else {
        Some(TimelineView { points })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{SceneData, TopEmotion};

    fn totals(pairs: &[(&str, f64)]) -> Vec<(String, f64)> {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    fn sample() -> AnalysisResult {
        AnalysisResult {
            plot: "First paragraph.\n\nSecond paragraph.\n".to_string(),
            emotions: vec![
                SceneEmotion {
                    scene: 1,
                    chunk: "They meet.".into(),
                    emotion: "joy".into(),
                    score: 0.9,
                },
                SceneEmotion {
                    scene: 2,
                    chunk: "Danger.".into(),
                    emotion: "fear".into(),
                    score: 0.6,
                },
            ],
            insights: Some("Mostly joyful.".into()),
            emotion_totals: Some(totals(&[("joy", 40.0), ("neutral", 20.0), ("anger", 40.0)])),
            top_emotions: Some(vec![
                (
                    "sadness".into(),
                    TopEmotion {
                        percentage: 50.0,
                        count: 2,
                        significance: "loss".into(),
                    },
                ),
                (
                    "joy".into(),
                    TopEmotion {
                        percentage: 25.0,
                        count: 1,
                        significance: String::new(),
                    },
                ),
            ]),
            scene_data: Some(SceneData {
                scenes: vec![1, 2, 3],
                emotion_codes: vec![1, 5, 1],
                scores: vec![0.9, 0.6, 0.95],
            }),
            ..AnalysisResult::default()
        }
    }

    #[test]
    fn test_distribution_excludes_neutral_in_order() {
        let s = distribution_series(&totals(&[("joy", 40.0), ("neutral", 20.0), ("anger", 40.0)]));
        assert_eq!(s.categories, vec!["joy", "anger"]);
        assert_eq!(s.values, vec![40.0, 40.0]);
        assert_eq!(s.colors, vec!["#FFD700", "#FF4500"]);
    }

    #[test]
    fn test_distribution_keeps_relative_order() {
        let s = distribution_series(&totals(&[
            ("surprise", 5.0),
            ("anger", 10.0),
            ("Neutral", 50.0),
            ("joy", 35.0),
        ]));
        let cats: Vec<_> = s.iter().map(|(c, _, _)| c).collect();
        assert_eq!(cats, vec!["surprise", "anger", "joy"]);
    }

    #[test]
    fn test_unknown_label_gets_gray() {
        let s = distribution_series(&totals(&[("love", 100.0)]));
        assert_eq!(s.colors, vec![emotion::NEUTRAL_GRAY]);
    }

    #[test]
    fn test_timeline_points_and_confidence() {
        let t = timeline_view(&sample()).unwrap();
        assert_eq!(t.points.len(), 3);
        assert_eq!(t.points[1], TimelinePoint { x: 2, y: 5, score: 0.6 });
        let flagged: Vec<bool> = t.points.iter().map(|p| p.is_high_confidence()).collect();
        assert_eq!(flagged, vec![true, false, true]);
        assert_eq!(t.points[0].marker_size(), MARKER_HIGH);
        assert_eq!(t.points[1].marker_size(), MARKER_NORMAL);
    }

    #[test]
    fn test_threshold_is_strict() {
        let p = TimelinePoint { x: 1, y: 1, score: 0.8 };
        assert!(!p.is_high_confidence());
    }

    #[test]
    fn test_point_styling() {
        let p = TimelinePoint { x: 1, y: 5, score: 0.6 };
        assert_eq!(p.color(), "#800080");
        assert_eq!(p.fill_color(), "#80008099");
        assert_eq!(p.tooltip(), "Fear: 60.0%");

        let low = TimelinePoint { x: 1, y: 1, score: 0.1 };
        assert_eq!(low.fill_color(), "#FFD70099");

        let full = TimelinePoint { x: 1, y: 1, score: 1.0 };
        assert_eq!(full.fill_color(), "#FFD700ff");
    }

    #[test]
    fn test_invalid_code_renders_gray() {
        let p = TimelinePoint { x: 1, y: 9, score: 0.9 };
        assert_eq!(p.emotion(), None);
        assert_eq!(p.color(), emotion::NEUTRAL_GRAY);
        assert_eq!(p.tooltip(), "9: 90.0%");
    }

    #[test]
    fn test_misaligned_scene_data_truncates() {
        let raw = AnalysisResult {
            scene_data: Some(SceneData {
                scenes: vec![1, 2, 3],
                emotion_codes: vec![1, 2],
                scores: vec![0.5, 0.5, 0.5],
            }),
            ..AnalysisResult::default()
        };
        assert_eq!(timeline_view(&raw).unwrap().points.len(), 2);
    }

    #[test]
    fn test_top_emotions_order_and_fallback() {
        let v = insights_view(&sample());
        let rows = v.top_emotions.unwrap();
        let labels: Vec<_> = rows.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, vec!["sadness", "joy"]);
        assert_eq!(rows[0].significance, "loss");
        assert_eq!(rows[1].significance, Emotion::Joy.significance());
        assert_eq!(rows[1].display_label(), "Joy");
    }

    #[test]
    fn test_missing_sections_suppress_only_their_view() {
        let raw = AnalysisResult {
            top_emotions: None,
            emotion_totals: None,
            scene_data: None,
            ..sample()
        };
        let views = normalize(&raw);
        assert!(views.insights.top_emotions.is_none());
        assert!(views.insights.distribution.is_none());
        assert!(views.timeline.is_none());
        // Unrelated views are intact
        assert_eq!(views.scenes.rows.len(), 2);
        assert_eq!(views.insights.insights.as_deref(), Some("Mostly joyful."));
    }

    #[test]
    fn test_empty_scene_data_is_no_timeline() {
        let raw = AnalysisResult {
            scene_data: Some(SceneData::default()),
            ..AnalysisResult::default()
        };
        assert!(timeline_view(&raw).is_none());
    }

    #[test]
    fn test_scene_table_pass_through() {
        let raw = sample();
        assert_eq!(normalize(&raw).scenes.rows, raw.emotions);
    }

    #[test]
    fn test_plot_paragraphs() {
        let v = normalize(&sample()).plot;
        assert_eq!(v.paragraphs(), vec!["First paragraph.", "Second paragraph."]);
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(0.9123), "91.2%");
        assert_eq!(format_percent(0.0), "0.0%");
    }

    #[test]
    fn test_bar_width_clamps_totals() {
        assert_eq!(bar_width(50.0, 50), 25);
        assert_eq!(bar_width(100.0, 50), 50);
        assert_eq!(bar_width(1e300, 50), 50);
        assert_eq!(bar_width(f64::INFINITY, 50), 50);
        assert_eq!(bar_width(-20.0, 50), 0);
        assert_eq!(bar_width(f64::NAN, 50), 0);

        let series = DistributionSeries {
            categories: vec!["joy".into(), "anger".into()],
            values: vec![1e300, 12.0],
            colors: vec!["#FFD700", "#FF4500"],
        };
        let bars: Vec<String> = series.iter().map(|(_, v, _)| "#".repeat(bar_width(v, 50))).collect();
        assert_eq!(bars[0].len(), 50);
        assert_eq!(bars[1].len(), 6);
    }

    #[test]
    fn test_axis_ticks() {
        let ticks = TimelineView::axis_ticks();
        assert_eq!(ticks.len(), 7);
        assert_eq!(ticks[0], (1, "Joy".to_string()));
        assert_eq!(ticks[6], (7, "Anger".to_string()));
    }
}
