use super::payload::{MeetingPayload, TextItem};
use regex::{Captures, Regex};
use std::sync::OnceLock;

/// Administrator message sent after a meeting is recorded
pub const DEFAULT_TEMPLATE: &str = "{owner} realizou a reunião com o Lead {lead}. \
O assunto abordado foi {topics}. \
As próximas etapas são {next_steps}. \
O Lead demonstra altas chances de fechar negócio por conta de {reason}.";

/// Placeholder qualification reason; set `notifier.reason` to replace it
pub const DEFAULT_REASON: &str = "Motivo XYZ";

const FALLBACK_LEAD: &str = "Lead";

fn placeholder_pattern() -> &'static Regex {
    static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    PLACEHOLDER.get_or_init(|| Regex::new(r"\{([a-z_]+)\}").unwrap())
}

fn join_texts(items: &[TextItem]) -> String {
    items
        .iter()
        .map(|item| item.text.trim())
        .filter(|text| !text.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

/// First participant who is not the meeting owner
pub fn lead_name(payload: &MeetingPayload) -> &str {
    let owner_email = payload.owner_email();

    payload
        .participants
        .iter()
        .find(|p| !p.email.trim().eq_ignore_ascii_case(owner_email))
        .map(|p| p.name.trim())
        .filter(|name| !name.is_empty())
        .unwrap_or(FALLBACK_LEAD)
}

/// Fill `template` from the payload.
///
/// Known placeholders: `{owner}`, `{lead}`, `{title}`, `{topics}`, `{next_steps}`,
/// `{reason}`. Anything else in braces is left as written.
pub fn compose_notification(payload: &MeetingPayload, template: &str, reason: &str) -> String {
    let topics = join_texts(&payload.topics);
    let next_steps = join_texts(&payload.action_items);

    placeholder_pattern()
        .replace_all(template, |caps: &Captures| match &caps[1] {
            "owner" => payload.owner.name.trim().to_string(),
            "lead" => lead_name(payload).to_string(),
            "title" => payload.title().to_string(),
            "topics" => topics.clone(),
            "next_steps" => next_steps.clone(),
            "reason" => reason.to_string(),
            _ => caps[0].to_string(),
        })
        .into_owned()
}
