use std::fmt;
use std::marker::PhantomData;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

/// Body of `POST /api/analyze`. Exactly one field is set when built by the
/// input manager.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AnalysisRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_plot: Option<String>,
}

impl AnalysisRequest {
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            custom_plot: None,
        }
    }

    pub fn custom_plot(plot: impl Into<String>) -> Self {
        Self {
            title: None,
            custom_plot: Some(plot.into()),
        }
    }

    /// Short description for logs.
    pub fn describe(&self) -> String {
        match (&self.title, &self.custom_plot) {
            (Some(t), _) => format!("title \"{t}\""),
            (None, Some(p)) => format!("custom plot ({} chars)", p.chars().count()),
            (None, None) => "empty request".to_string(),
        }
    }
}

/// Full analysis payload returned by the backend.
///
/// Every field is optional on the wire; absent map/scene fields stay `None`
/// so the views that depend on them can say "no data" on their own.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AnalysisResult {
    pub plot: String,
    pub emotions: Vec<SceneEmotion>,
    pub insights: Option<String>,
    /// Label → percentage, in the order the backend sent them.
    #[serde(deserialize_with = "ordered_map")]
    pub emotion_totals: Option<Vec<(String, f64)>>,
    /// Label → stats, in upstream rank order.
    #[serde(deserialize_with = "ordered_map")]
    pub top_emotions: Option<Vec<(String, TopEmotion)>>,
    pub scene_data: Option<SceneData>,
    /// Base64 PNG of the distribution chart.
    pub emotion_distribution: Option<String>,
    /// Base64 CSV report.
    pub csv_data: String,
    /// Base64 PDF report.
    pub pdf_data: String,
}

/// One classified text segment.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SceneEmotion {
    #[serde(rename = "Scene", alias = "scene")]
    pub scene: i64,
    #[serde(rename = "Chunk", alias = "chunk", default)]
    pub chunk: String,
    #[serde(rename = "Emotion", alias = "emotion", default)]
    pub emotion: String,
    #[serde(rename = "Score", alias = "score", default)]
    pub score: f64,
}

/// Three aligned arrays; index i across them is one timeline point.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SceneData {
    pub scenes: Vec<i64>,
    /// Emotion codes (1..=7). The backend calls this key `emotions`.
    #[serde(rename = "emotions", alias = "emotion_codes")]
    pub emotion_codes: Vec<i64>,
    pub scores: Vec<f64>,
}

impl SceneData {
    /// True when all three arrays have the same length.
    pub fn is_aligned(&self) -> bool {
        self.scenes.len() == self.emotion_codes.len() && self.scenes.len() == self.scores.len()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct TopEmotion {
    pub percentage: f64,
    pub count: u64,
    pub significance: String,
}

/// Decode a JSON object into key/value pairs, keeping document order.
fn ordered_map<'de, D, V>(deserializer: D) -> Result<Option<Vec<(String, V)>>, D::Error>
where
    D: Deserializer<'de>,
    V: Deserialize<'de>,
{
    Ok(Option::<Ordered<V>>::deserialize(deserializer)?.map(|o| o.0))
}

struct Ordered<V>(Vec<(String, V)>);

impl<'de, V: Deserialize<'de>> Deserialize<'de> for Ordered<V> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct OrderedVisitor<V>(PhantomData<V>);

        impl<'de, V: Deserialize<'de>> Visitor<'de> for OrderedVisitor<V> {
            type Value = Ordered<V>;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a JSON object")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((key, value)) = map.next_entry::<String, V>()? {
                    entries.push((key, value));
                }
                Ok(Ordered(entries))
            }
        }

        deserializer.deserialize_map(OrderedVisitor(PhantomData))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL: &str = r#"{
        "plot": "A thief enters dreams.",
        "emotions": [
            {"Scene": 1, "Chunk": "A thief enters dreams.", "Emotion": "joy", "Score": 0.91},
            {"Scene": 2, "Chunk": "He is haunted.", "Emotion": "fear", "Score": 0.6}
        ],
        "insights": "The analysis covers 2 emotional scenes (excluding neutral).",
        "emotion_totals": {"joy": 40.0, "neutral": 20.0, "anger": 40.0},
        "top_emotions": {
            "sadness": {"percentage": 50.0, "count": 2, "significance": "loss"},
            "anger": {"percentage": 25.0, "count": 1, "significance": "conflict"},
            "joy": {"percentage": 25.0, "count": 1, "significance": "happy"}
        },
        "scene_data": {"scenes": [1, 2], "emotions": [1, 5], "scores": [0.91, 0.6]},
        "emotion_distribution": "iVBORw0KGgo=",
        "csv_data": "U2NlbmUsQ2h1bmsK",
        "pdf_data": "JVBERi0="
    }"#;

    #[test]
    fn test_request_serializes_only_present_field() {
        let json = serde_json::to_string(&AnalysisRequest::title("Inception")).unwrap();
        assert_eq!(json, r#"{"title":"Inception"}"#);

        let json = serde_json::to_string(&AnalysisRequest::custom_plot("x")).unwrap();
        assert_eq!(json, r#"{"custom_plot":"x"}"#);
    }

    #[test]
    fn test_full_result_deserialize() {
        let r: AnalysisResult = serde_json::from_str(FULL).unwrap();
        assert_eq!(r.plot, "A thief enters dreams.");
        assert_eq!(r.emotions.len(), 2);
        assert_eq!(r.emotions[1].emotion, "fear");
        assert_eq!(r.emotions[1].scene, 2);
        let sd = r.scene_data.unwrap();
        assert_eq!(sd.emotion_codes, vec![1, 5]);
        assert!(sd.is_aligned());
        assert_eq!(r.csv_data, "U2NlbmUsQ2h1bmsK");
    }

    #[test]
    fn test_map_order_preserved() {
        let r: AnalysisResult = serde_json::from_str(FULL).unwrap();
        let totals: Vec<_> = r.emotion_totals.unwrap().into_iter().map(|(k, _)| k).collect();
        assert_eq!(totals, vec!["joy", "neutral", "anger"]);

        // Not alphabetical: upstream rank order
        let top: Vec<_> = r.top_emotions.unwrap().into_iter().map(|(k, _)| k).collect();
        assert_eq!(top, vec!["sadness", "anger", "joy"]);
    }

    #[test]
    fn test_missing_fields_degrade_to_none() {
        let r: AnalysisResult = serde_json::from_str(r#"{"plot": "p"}"#).unwrap();
        assert_eq!(r.plot, "p");
        assert!(r.emotions.is_empty());
        assert!(r.emotion_totals.is_none());
        assert!(r.top_emotions.is_none());
        assert!(r.scene_data.is_none());
        assert!(r.csv_data.is_empty());
    }

    #[test]
    fn test_null_maps_are_none() {
        let r: AnalysisResult =
            serde_json::from_str(r#"{"emotion_totals": null, "top_emotions": null}"#).unwrap();
        assert!(r.emotion_totals.is_none());
        assert!(r.top_emotions.is_none());
    }

    #[test]
    fn test_misaligned_scene_data() {
        let sd: SceneData =
            serde_json::from_str(r#"{"scenes": [1, 2, 3], "emotions": [1], "scores": [0.5, 0.2]}"#)
                .unwrap();
        assert!(!sd.is_aligned());
    }
}
