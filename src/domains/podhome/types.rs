//! Podhome request and response bodies.
//!
//! Optional request fields are omitted from the JSON body when unset.
//! Response structs tolerate missing fields; the API leaves out whatever the
//! caller did not ask to include.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Episode lifecycle states as numbered by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EpisodeStatus {
    Draft = 0,
    Scheduled = 1,
    Published = 2,
    LivePending = 3,
    Live = 4,
    LiveEnded = 5,
}

impl EpisodeStatus {
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Self::Draft),
            1 => Some(Self::Scheduled),
            2 => Some(Self::Published),
            3 => Some(Self::LivePending),
            4 => Some(Self::Live),
            5 => Some(Self::LiveEnded),
            _ => None,
        }
    }

    pub fn code(self) -> i64 {
        self as i64
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Draft => "Draft",
            Self::Scheduled => "Scheduled",
            Self::Published => "Published",
            Self::LivePending => "LivePending",
            Self::Live => "Live",
            Self::LiveEnded => "LiveEnded",
        }
    }
}

impl std::fmt::Display for EpisodeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Render a status the API sent either as a code or as a name.
pub fn status_label(status: &Value) -> String {
    match status {
        Value::Number(n) => n
            .as_i64()
            .and_then(EpisodeStatus::from_code)
            .map(|s| s.label().to_string())
            .unwrap_or_else(|| n.to_string()),
        Value::String(s) => s.clone(),
        _ => "Unknown".to_string(),
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Chapter {
    pub start_time: f64,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Transcript {
    pub language: String,
    pub transcript_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Episode {
    pub episode_id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Value,
    #[serde(default)]
    pub publish_date: Option<String>,
    #[serde(default)]
    pub episode_nr: Option<u32>,
    #[serde(default)]
    pub season_nr: Option<u32>,
    /// Seconds, sent as a number or a numeric string.
    #[serde(default)]
    pub duration: Option<Value>,
    #[serde(default)]
    pub enclosure_url: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub downloads: Option<u64>,
    #[serde(default)]
    pub chapters: Option<Vec<Chapter>>,
    #[serde(default)]
    pub transcript: Option<Transcript>,
}

impl Episode {
    pub fn status_label(&self) -> String {
        status_label(&self.status)
    }

    pub fn duration_seconds(&self) -> Option<u64> {
        match self.duration.as_ref()? {
            Value::Number(n) => n.as_u64().or_else(|| n.as_f64().map(|f| f.max(0.0) as u64)),
            Value::String(s) => s.trim().parse::<f64>().ok().map(|f| f.max(0.0) as u64),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CreateEpisodeRequest {
    pub file_url: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub episode_nr: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub season_nr: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publish_date: Option<String>,
    pub use_podhome_ai: bool,
    pub suggest_chapters: bool,
    pub suggest_details: bool,
    pub suggest_clips: bool,
    pub enhance_audio: bool,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct CreateEpisodeOutput {
    #[serde(rename = "episodeId", alias = "episode_id")]
    pub episode_id: String,
}

/// Optional sections of an episode to include in list/get responses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EpisodeIncludes {
    pub transcript: Option<bool>,
    pub chapters: Option<bool>,
    pub downloads: Option<bool>,
    pub people: Option<bool>,
}

impl EpisodeIncludes {
    /// Query pairs for the flags that were given, in a fixed order.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        [
            ("includeTranscript", self.transcript),
            ("includeChapters", self.chapters),
            ("includeDownloads", self.downloads),
            ("includePeople", self.people),
        ]
        .into_iter()
        .filter_map(|(name, flag)| flag.map(|f| (name, f.to_string())))
        .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListEpisodesQuery {
    pub status: Option<i64>,
    pub includes: EpisodeIncludes,
}

impl ListEpisodesQuery {
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(status) = self.status {
            pairs.push(("status", status.to_string()));
        }
        pairs.extend(self.includes.query_pairs());
        pairs
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct UpdateEpisodeRequest {
    pub episode_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub episode_nr: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub season_nr: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct UpdateEpisodeOutput {
    #[serde(default)]
    pub episode_id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub episode_nr: Option<u32>,
    #[serde(default)]
    pub season_nr: Option<u32>,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl UpdateEpisodeOutput {
    /// Names of the fields the API reports as set, in request order.
    pub fn changed_fields(&self) -> Vec<&'static str> {
        [
            ("title", self.title.is_some()),
            ("description", self.description.is_some()),
            ("episode_nr", self.episode_nr.is_some()),
            ("season_nr", self.season_nr.is_some()),
            ("image_url", self.image_url.is_some()),
        ]
        .into_iter()
        .filter_map(|(name, set)| set.then_some(name))
        .collect()
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PublishEpisodeRequest {
    pub episode_id: String,
    pub publish_now: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publish_date: Option<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct PublishEpisodeOutput {
    #[serde(default)]
    pub episode_id: String,
    #[serde(default)]
    pub publish_date: String,
    #[serde(default)]
    pub status: Value,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CreateClipRequest {
    pub episode_id: String,
    pub title: String,
    pub start_time: f64,
    pub duration: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct RegisterWebhookRequest {
    pub url: String,
    pub action_type: String,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct WebhookIdRequest {
    pub integration_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_status_labels() {
        assert_eq!(status_label(&json!(0)), "Draft");
        assert_eq!(status_label(&json!(3)), "LivePending");
        assert_eq!(status_label(&json!(5)), "LiveEnded");
        assert_eq!(status_label(&json!(9)), "9");
        assert_eq!(status_label(&json!("Published")), "Published");
        assert_eq!(status_label(&Value::Null), "Unknown");
    }

    #[test]
    fn test_status_codes() {
        for code in 0..=5 {
            assert_eq!(EpisodeStatus::from_code(code).map(|s| s.code()), Some(code));
        }
        assert_eq!(EpisodeStatus::from_code(6), None);
    }

    #[test]
    fn test_create_output_accepts_both_spellings() {
        let camel: CreateEpisodeOutput = serde_json::from_str(r#"{"episodeId": "abc"}"#).unwrap();
        let snake: CreateEpisodeOutput = serde_json::from_str(r#"{"episode_id": "abc"}"#).unwrap();
        assert_eq!(camel, snake);
    }

    #[test]
    fn test_create_request_omits_unset_fields() {
        let request = CreateEpisodeRequest {
            file_url: "https://cdn.example.com/ep.mp3".to_string(),
            title: "Pilot".to_string(),
            description: None,
            episode_nr: Some(1),
            season_nr: None,
            link: None,
            publish_date: None,
            use_podhome_ai: false,
            suggest_chapters: false,
            suggest_details: false,
            suggest_clips: false,
            enhance_audio: false,
        };
        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(body["episode_nr"], 1);
        assert!(body.get("description").is_none());
        assert_eq!(body["enhance_audio"], false);
    }

    #[test]
    fn test_episode_tolerates_sparse_body() {
        let episode: Episode =
            serde_json::from_str(r#"{"episode_id": "e1", "title": "T", "duration": "125"}"#)
                .unwrap();
        assert_eq!(episode.duration_seconds(), Some(125));
        assert_eq!(episode.status_label(), "Unknown");
        assert!(episode.chapters.is_none());

        let numeric: Episode =
            serde_json::from_str(r#"{"episode_id": "e2", "duration": 3600, "status": 2}"#).unwrap();
        assert_eq!(numeric.duration_seconds(), Some(3600));
        assert_eq!(numeric.status_label(), "Published");
    }

    #[test]
    fn test_list_query_only_given_params() {
        let query = ListEpisodesQuery {
            status: Some(2),
            includes: EpisodeIncludes {
                chapters: Some(true),
                people: Some(false),
                ..Default::default()
            },
        };
        assert_eq!(
            query.query_pairs(),
            vec![
                ("status", "2".to_string()),
                ("includeChapters", "true".to_string()),
                ("includePeople", "false".to_string()),
            ]
        );
        assert!(ListEpisodesQuery::default().query_pairs().is_empty());
    }

    #[test]
    fn test_changed_fields() {
        let output: UpdateEpisodeOutput =
            serde_json::from_str(r#"{"episode_id": "e1", "title": "New", "season_nr": 2}"#)
                .unwrap();
        assert_eq!(output.changed_fields(), vec!["title", "season_nr"]);
    }
}
