/// AI habit suggestions and coaching chat
///
/// Turns a free-text goal into 3-5 short trackable habit names via the
/// text-generation provider, with defensive parsing of the raw reply.
/// The provider is not guaranteed to emit pure JSON, so the extraction
/// strips code fences and cuts the reply down to its outermost braces
/// before parsing.

use serde::Deserialize;

use crate::provider::{ChatTurn, TextGenerator};
use crate::service::{HabitWithLogs, ServiceError};
use crate::storage::HabitStore;

const SUGGEST_PROMPT: &str = r#"Act as a productivity coach.
User goal: "{goal}"

Break this goal into 3 to 5 short, trackable daily habits.

IMPORTANT: Your reply must be STRICTLY a valid JSON object.
Do not write any prose, do not use Markdown fences, only the raw JSON object.

Required format:
{ "habits": ["Habit 1", "Habit 2", "Habit 3"] }"#;

const CHAT_PERSONA: &str = "You are a friendly, motivating assistant focused on \
productivity and healthy habits. Answer concisely and helpfully.";

/// Returned when the reply parsed but carried no usable habit names
const FALLBACK_NO_HABITS: &str = "The assistant replied, but without any valid habits.";

/// Returned when the reply was not valid JSON at all
const FALLBACK_BAD_FORMAT: &str = "Error: the assistant did not return a valid format.";

/// Returned by chat on any internal failure; chat never surfaces errors
const CHAT_FALLBACK: &str = "Sorry, I'm having connection trouble right now.";

/// Why a provider reply yielded no habit list
#[derive(Debug, PartialEq, Eq)]
pub enum ExtractError {
    /// No parseable JSON object in the reply
    NotJson,
    /// Valid JSON, but the habits key is absent, empty, or malformed
    NoHabits,
}

#[derive(Deserialize)]
struct SuggestionPayload {
    #[serde(default)]
    habits: Vec<String>,
}

/// Pull the habit list out of a raw provider reply
///
/// Strips markdown code-fence markers, then parses only the substring
/// from the first `{` to the last `}`. Surrounding prose is ignored.
pub fn extract_habits(raw: &str) -> Result<Vec<String>, ExtractError> {
    let cleaned = raw.replace("```json", "").replace("```", "");
    let cleaned = cleaned.trim();

    let start = cleaned.find('{').ok_or(ExtractError::NotJson)?;
    let end = cleaned.rfind('}').ok_or(ExtractError::NotJson)?;
    if end < start {
        return Err(ExtractError::NotJson);
    }

    let payload: SuggestionPayload =
        serde_json::from_str(&cleaned[start..=end]).map_err(|_| ExtractError::NotJson)?;

    let habits: Vec<String> = payload
        .habits
        .into_iter()
        .map(|h| h.trim().to_string())
        .filter(|h| !h.is_empty())
        .collect();

    if habits.is_empty() {
        return Err(ExtractError::NoHabits);
    }

    Ok(habits)
}

fn validate_goal(goal: &str) -> Result<(), ServiceError> {
    if goal.trim().is_empty() {
        return Err(ServiceError::InvalidInput("A goal is required".to_string()));
    }
    Ok(())
}

async fn ask_for_habits(
    generator: &dyn TextGenerator,
    goal: &str,
) -> Result<Result<Vec<String>, ExtractError>, ServiceError> {
    let prompt = SUGGEST_PROMPT.replace("{goal}", goal.trim());
    let raw = generator.generate(None, &[ChatTurn::user(prompt)]).await?;
    Ok(extract_habits(&raw))
}

/// Suggest habit names for a goal without persisting anything
///
/// A reply the extraction cannot use becomes a single explanatory
/// placeholder entry rather than an error; only provider transport
/// failures propagate.
pub async fn suggest_habits(
    generator: &dyn TextGenerator,
    goal: &str,
) -> Result<Vec<String>, ServiceError> {
    validate_goal(goal)?;

    match ask_for_habits(generator, goal).await? {
        Ok(habits) => Ok(habits),
        Err(ExtractError::NoHabits) => {
            tracing::warn!("Provider reply carried no usable habits");
            Ok(vec![FALLBACK_NO_HABITS.to_string()])
        }
        Err(ExtractError::NotJson) => {
            tracing::warn!("Provider reply was not parseable JSON");
            Ok(vec![FALLBACK_BAD_FORMAT.to_string()])
        }
    }
}

/// Suggest habit names for a goal and persist each as a new habit
///
/// All habits from one call are created in a single transaction; a
/// partial failure retains none of them. Here an unusable reply is a
/// client-visible error instead of a placeholder, because a persistence
/// step follows.
pub async fn suggest_and_create_habits<S: HabitStore + ?Sized>(
    store: &S,
    generator: &dyn TextGenerator,
    goal: &str,
) -> Result<Vec<HabitWithLogs>, ServiceError> {
    validate_goal(goal)?;

    let names = ask_for_habits(generator, goal)
        .await?
        .map_err(|_| ServiceError::InvalidInput("Could not generate a suggestion".to_string()))?;

    let mut new_habits = Vec::with_capacity(names.len());
    for name in names {
        new_habits.push(crate::domain::Habit::new(name, None)?);
    }

    store.create_habits(&new_habits)?;
    tracing::info!("Auto-created {} suggested habits", new_habits.len());

    Ok(new_habits
        .into_iter()
        .map(|habit| HabitWithLogs {
            habit,
            logs: Vec::new(),
        })
        .collect())
}

/// Forward a conversation to the provider under the coach persona
///
/// Any failure, including an unconfigured provider, is swallowed and
/// replaced with a fixed apologetic reply. This path never errors.
pub async fn chat(generator: Option<&dyn TextGenerator>, messages: &[ChatTurn]) -> String {
    let Some(generator) = generator else {
        tracing::warn!("Chat requested but no provider is configured");
        return CHAT_FALLBACK.to_string();
    };

    match generator.generate(Some(CHAT_PERSONA), messages).await {
        Ok(reply) => reply,
        Err(e) => {
            tracing::warn!("Chat provider call failed: {}", e);
            CHAT_FALLBACK.to_string()
        }
    }
}

// Re-exported so handlers and tests can assert against the exact texts
pub fn chat_fallback_text() -> &'static str {
    CHAT_FALLBACK
}

pub fn no_habits_fallback_text() -> &'static str {
    FALLBACK_NO_HABITS
}

pub fn bad_format_fallback_text() -> &'static str {
    FALLBACK_BAD_FORMAT
}
