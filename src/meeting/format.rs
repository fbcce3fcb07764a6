use super::payload::{MeetingPayload, TextItem, Timestamp, Transcript};
use super::time::{format_local_clock, format_local_date, format_local_datetime};
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::Serialize;

/// Meeting content ready to be chunked and written to the workspace
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormattedDocument {
    /// Page title, `<local date> <meeting title>` when the start time is known
    pub title: String,
    /// Full markdown summary
    pub markdown: String,
    /// One `[HH:MM:SS] Speaker: text` line per utterance
    pub transcript: String,
}

fn render_event_time(ts: &Timestamp, tz: Tz) -> String {
    ts.to_utc()
        .map(|dt| format_local_datetime(dt, tz))
        .unwrap_or_else(|| ts.raw())
}

fn date_prefix(ts: &Timestamp, tz: Tz) -> String {
    match ts.to_utc() {
        Some(dt) => format_local_date(dt, tz),
        None => ts.raw().chars().take(10).collect(),
    }
}

fn document_title(payload: &MeetingPayload, tz: Tz) -> String {
    let date = payload
        .start_time
        .as_ref()
        .map(|ts| date_prefix(ts, tz))
        .unwrap_or_default();

    if date.trim().is_empty() {
        payload.title().to_string()
    } else {
        format!("{} {}", date, payload.title())
    }
}

fn push_list(lines: &mut Vec<String>, heading: &str, marker: &str, items: &[TextItem]) {
    let items: Vec<&str> = items
        .iter()
        .map(|item| item.text.trim())
        .filter(|text| !text.is_empty())
        .collect();
    if items.is_empty() {
        return;
    }

    lines.push(String::new());
    lines.push(heading.to_string());
    lines.extend(items.iter().map(|text| format!("{}{}", marker, text)));
}

/// Render the meeting summary and transcript as markdown strings.
///
/// Never fails: timestamps that cannot be parsed are shown as received.
pub fn format_document(payload: &MeetingPayload, tz: Tz) -> FormattedDocument {
    let title = document_title(payload, tz);
    let mut lines = Vec::new();

    lines.push(format!("# {}", title));
    match payload.report_url() {
        Some(url) => lines.push(format!("**Meeting:** [{}]({})", payload.title(), url)),
        None => lines.push(format!("**Meeting:** {}", payload.title())),
    }

    if payload.start_time.is_some() || payload.end_time.is_some() {
        let start = payload
            .start_time
            .as_ref()
            .map(|ts| render_event_time(ts, tz))
            .unwrap_or_default();
        let end = payload
            .end_time
            .as_ref()
            .map(|ts| render_event_time(ts, tz))
            .unwrap_or_default();
        lines.push(format!("**Event time:** {} - {}", start, end));
    }

    if let Some(platform) = payload.platform.as_deref().filter(|p| !p.trim().is_empty()) {
        lines.push(format!("**Platform:** {}", platform.trim()));
    }

    let participants: Vec<&str> = payload
        .participants
        .iter()
        .map(|p| p.name.as_str())
        .collect();
    lines.push(format!("**Participants:** {}", participants.join(", ")));

    if let Some(summary) = payload.summary() {
        lines.push(String::new());
        lines.push("## ✨ Summary".to_string());
        lines.push(summary.to_string());
    }

    if !payload.chapter_summaries.is_empty() {
        lines.push(String::new());
        lines.push("## 💬 Chapters & Topics".to_string());
        for chapter in &payload.chapter_summaries {
            if !chapter.title.trim().is_empty() {
                lines.push(format!("**{}**", chapter.title.trim()));
            }
            if !chapter.description.trim().is_empty() {
                lines.push(chapter.description.trim().to_string());
            }
            for topic in &chapter.topics {
                lines.push(format!("- {}", topic.text.trim()));
            }
            lines.push(String::new());
        }
        // Drop the separator after the last chapter
        lines.pop();
    }

    push_list(&mut lines, "## ✅ Action Items", "- [ ] ", &payload.action_items);
    push_list(&mut lines, "## 🔍 Key Questions", "- ", &payload.key_questions);

    let mut markdown = lines.join("\n");
    markdown.push('\n');

    FormattedDocument {
        title,
        markdown,
        transcript: format_transcript(payload.transcript.as_ref(), tz),
    }
}

fn transcript_line(at: Option<DateTime<Utc>>, speaker: &str, text: &str, tz: Tz) -> String {
    let clock = at.map(|dt| format_local_clock(dt, tz)).unwrap_or_default();
    format!("[{}] {}: {}", clock, speaker, text)
}

/// Render either transcript shape as `[HH:MM:SS] Speaker: text` lines.
///
/// Flat entries are stably sorted by time first; entries with no usable timestamp keep
/// their relative order after the timed ones. Speaker blocks are already in order.
pub fn format_transcript(transcript: Option<&Transcript>, tz: Tz) -> String {
    let lines: Vec<String> = match transcript {
        None => Vec::new(),
        Some(Transcript::Blocks(blocks)) => blocks
            .speaker_blocks
            .iter()
            .map(|block| {
                let at = block.start_time.as_ref().and_then(Timestamp::to_utc);
                transcript_line(at, block.speaker.name(), &block.words, tz)
            })
            .collect(),
        Some(Transcript::Entries(entries)) => {
            let mut timed: Vec<_> = entries
                .iter()
                .map(|entry| (entry.timestamp.as_ref().and_then(Timestamp::to_utc), entry))
                .collect();
            timed.sort_by_key(|(at, _)| (at.is_none(), *at));

            timed
                .into_iter()
                .map(|(at, entry)| transcript_line(at, entry.speaker.name(), &entry.text, tz))
                .collect()
        }
    };

    lines.join("\n")
}
