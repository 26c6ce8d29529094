//! Plain-text rendering of Podhome results.

use chrono::{DateTime, Utc};
use serde_json::Value;

use super::types::{Episode, PublishEpisodeOutput, UpdateEpisodeOutput};

const TITLE_WIDTH: usize = 40;

/// Bytes as megabytes with two decimals, e.g. `12.35MB`.
pub fn format_file_size(bytes: u64) -> String {
    format!("{:.2}MB", bytes as f64 / 1024.0 / 1024.0)
}

/// `H:MM:SS` when at least an hour, otherwise `M:SS`.
pub fn format_duration(total_seconds: u64) -> String {
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;
    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{}:{:02}", minutes, seconds)
    }
}

/// Chapter offset as `HH:MM:SS`.
pub fn format_timestamp(seconds: f64) -> String {
    let total = seconds.max(0.0) as u64;
    format!(
        "{:02}:{:02}:{:02}",
        total / 3600,
        (total % 3600) / 60,
        total % 60
    )
}

/// `S{season}E{episode}`, `E{episode}` or `N/A`. Zero counts as unset.
pub fn format_episode_number(season: Option<u32>, episode: Option<u32>) -> String {
    match (season.filter(|s| *s > 0), episode.filter(|e| *e > 0)) {
        (Some(s), Some(e)) => format!("S{}E{}", s, e),
        (None, Some(e)) => format!("E{}", e),
        _ => "N/A".to_string(),
    }
}

/// Shorten to `max_len` characters, ending in `...` when cut.
pub fn truncate(text: &str, max_len: usize) -> String {
    if text.chars().count() <= max_len {
        return text.to_string();
    }
    let kept: String = text.chars().take(max_len.saturating_sub(3)).collect();
    format!("{}...", kept)
}

fn parse_date(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|d| d.with_timezone(&Utc))
}

fn display_date(value: Option<&str>) -> String {
    match value.filter(|v| !v.is_empty()) {
        Some(v) => parse_date(v)
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| v.to_string()),
        None => "N/A".to_string(),
    }
}

fn display_datetime(value: Option<&str>) -> String {
    match value.filter(|v| !v.is_empty()) {
        Some(v) => parse_date(v)
            .map(|d| d.format("%Y-%m-%d %H:%M:%S UTC").to_string())
            .unwrap_or_else(|| v.to_string()),
        None => "N/A".to_string(),
    }
}

/// Pipe-separated episode table, one row per episode.
pub fn format_episodes_table(episodes: &[Episode]) -> String {
    if episodes.is_empty() {
        return "No episodes found.".to_string();
    }

    let mut lines = vec![
        "ID | Title | Episode # | Status | Published".to_string(),
        "---|-------|-----------|--------|----------".to_string(),
    ];
    lines.extend(episodes.iter().map(|ep| {
        format!(
            "{} | {} | {} | {} | {}",
            ep.episode_id,
            truncate(&ep.title, TITLE_WIDTH),
            format_episode_number(ep.season_nr, ep.episode_nr),
            ep.status_label(),
            display_date(ep.publish_date.as_deref())
        )
    }));
    lines.join("\n")
}

pub fn format_episode_list(episodes: &[Episode]) -> String {
    format!(
        "Found {} episodes:\n\n{}",
        episodes.len(),
        format_episodes_table(episodes)
    )
}

/// Multi-line detail view of one episode.
pub fn format_episode_details(episode: &Episode) -> String {
    let mut out = format!(
        "Episode: {}\nID: {}\nNumber: {}\nStatus: {}\nPublished: {}\nDuration: {}",
        episode.title,
        episode.episode_id,
        format_episode_number(episode.season_nr, episode.episode_nr),
        episode.status_label(),
        display_datetime(episode.publish_date.as_deref()),
        episode
            .duration_seconds()
            .map(format_duration)
            .unwrap_or_else(|| "N/A".to_string()),
    );

    if let Some(downloads) = episode.downloads {
        out.push_str(&format!("\nDownloads: {}", downloads));
    }

    out.push_str(&format!(
        "\nURL: {}\nAudio: {}",
        episode.link.as_deref().unwrap_or("N/A"),
        episode.enclosure_url.as_deref().unwrap_or("N/A")
    ));

    if let Some(description) = episode.description.as_deref().filter(|d| !d.is_empty()) {
        out.push_str(&format!("\n\nDescription:\n{}", description));
    }

    if let Some(chapters) = episode.chapters.as_ref().filter(|c| !c.is_empty()) {
        out.push_str("\n\nChapters:");
        for chapter in chapters {
            out.push_str(&format!(
                "\n{} - {}",
                format_timestamp(chapter.start_time),
                chapter.title
            ));
        }
    }

    if let Some(transcript) = &episode.transcript {
        out.push_str(&format!(
            "\n\nTranscript ({}): {}",
            transcript.language, transcript.transcript_url
        ));
    }

    out
}

pub fn format_created_episode(title: &str, episode_id: &str) -> String {
    format!("Created episode \"{}\" (ID: {})\nStatus: Draft", title, episode_id)
}

pub fn format_published_episode(output: &PublishEpisodeOutput) -> String {
    format!(
        "Episode {} published at {}\nStatus: {}",
        output.episode_id,
        output.publish_date,
        super::types::status_label(&output.status)
    )
}

pub fn format_updated_episode(output: &UpdateEpisodeOutput) -> String {
    let changed = output.changed_fields();
    let changed = if changed.is_empty() {
        "none".to_string()
    } else {
        changed.join(", ")
    };
    format!("Updated episode {}\nChanged: {}", output.episode_id, changed)
}

/// Pretty JSON, or a placeholder for an empty body.
pub fn format_json(value: &Value) -> String {
    match value {
        Value::Null => "(empty response)".to_string(),
        other => serde_json::to_string_pretty(other).unwrap_or_else(|_| other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::podhome::types::{Chapter, Transcript};
    use serde_json::json;

    fn episode(id: &str, title: &str) -> Episode {
        serde_json::from_value(json!({ "episode_id": id, "title": title })).unwrap()
    }

    #[test]
    fn test_file_size() {
        assert_eq!(format_file_size(0), "0.00MB");
        assert_eq!(format_file_size(1_048_576), "1.00MB");
        assert_eq!(format_file_size(52_428_800), "50.00MB");
        assert_eq!(format_file_size(1_572_864), "1.50MB");
    }

    #[test]
    fn test_duration() {
        assert_eq!(format_duration(0), "0:00");
        assert_eq!(format_duration(65), "1:05");
        assert_eq!(format_duration(3600), "1:00:00");
        assert_eq!(format_duration(3725), "1:02:05");
    }

    #[test]
    fn test_episode_number() {
        assert_eq!(format_episode_number(Some(1), Some(42)), "S1E42");
        assert_eq!(format_episode_number(None, Some(42)), "E42");
        assert_eq!(format_episode_number(Some(2), None), "N/A");
        assert_eq!(format_episode_number(None, None), "N/A");
        assert_eq!(format_episode_number(Some(0), Some(3)), "E3");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 40), "short");
        let long = "a".repeat(50);
        let cut = truncate(&long, 40);
        assert_eq!(cut.chars().count(), 40);
        assert!(cut.ends_with("..."));
        assert_eq!(truncate("ééééé", 4), "é...");
    }

    #[test]
    fn test_empty_table() {
        assert_eq!(format_episodes_table(&[]), "No episodes found.");
        assert_eq!(format_episode_list(&[]), "Found 0 episodes:\n\nNo episodes found.");
    }

    #[test]
    fn test_table_rows() {
        let mut first = episode("e1", "Pilot");
        first.season_nr = Some(1);
        first.episode_nr = Some(1);
        first.status = json!(2);
        first.publish_date = Some("2024-01-15T10:30:00Z".to_string());
        let second = episode("e2", &"x".repeat(45));

        let table = format_episodes_table(&[first, second]);
        let lines: Vec<_> = table.lines().collect();
        assert_eq!(lines[0], "ID | Title | Episode # | Status | Published");
        assert_eq!(lines[1], "---|-------|-----------|--------|----------");
        assert_eq!(lines[2], "e1 | Pilot | S1E1 | Published | 2024-01-15");
        assert_eq!(lines[3], format!("e2 | {}... | N/A | Unknown | N/A", "x".repeat(37)));
    }

    #[test]
    fn test_details() {
        let mut ep = episode("e1", "Pilot");
        ep.duration = Some(json!("3725"));
        ep.downloads = Some(1200);
        ep.link = Some("https://show.example.com/1".to_string());
        ep.enclosure_url = Some("https://cdn.example.com/1.mp3".to_string());
        ep.description = Some("Show notes".to_string());
        ep.chapters = Some(vec![Chapter {
            start_time: 300.0,
            title: "Intro".to_string(),
            image_url: None,
        }]);
        ep.transcript = Some(Transcript {
            language: "en".to_string(),
            transcript_url: "https://cdn.example.com/1.vtt".to_string(),
        });

        let text = format_episode_details(&ep);
        assert!(text.starts_with("Episode: Pilot\nID: e1\nNumber: N/A\nStatus: Unknown"));
        assert!(text.contains("Duration: 1:02:05"));
        assert!(text.contains("Downloads: 1200"));
        assert!(text.contains("URL: https://show.example.com/1\nAudio: https://cdn.example.com/1.mp3"));
        assert!(text.contains("\n\nDescription:\nShow notes"));
        assert!(text.contains("\n\nChapters:\n00:05:00 - Intro"));
        assert!(text.ends_with("Transcript (en): https://cdn.example.com/1.vtt"));
    }

    #[test]
    fn test_details_without_optional_sections() {
        let text = format_episode_details(&episode("e1", "Pilot"));
        assert!(!text.contains("Downloads"));
        assert!(!text.contains("Chapters"));
        assert!(!text.contains("Transcript"));
        assert!(text.contains("Published: N/A"));
    }

    #[test]
    fn test_summaries() {
        assert_eq!(
            format_created_episode("Pilot", "e1"),
            "Created episode \"Pilot\" (ID: e1)\nStatus: Draft"
        );

        let published: PublishEpisodeOutput = serde_json::from_value(json!({
            "episode_id": "e1", "publish_date": "2024-01-15T10:30:00Z", "status": 2
        }))
        .unwrap();
        assert_eq!(
            format_published_episode(&published),
            "Episode e1 published at 2024-01-15T10:30:00Z\nStatus: Published"
        );

        let updated: UpdateEpisodeOutput =
            serde_json::from_value(json!({ "episode_id": "e1" })).unwrap();
        assert_eq!(format_updated_episode(&updated), "Updated episode e1\nChanged: none");
    }
}
