//! LLM-backed GroupingAdvisor.
//!
//! Sends the privacy-reduced roster to any [`AIProvider`] and reads back a
//! JSON grouping. The answer is only parsed here; the seating engine decides
//! whether it is usable.

use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

use crate::domain::foundation::GuestId;
use crate::domain::seating::GroupingProposal;
use crate::ports::{
    AIProvider, AdvisorError, CompletionRequest, FinishReason, GroupingAdvisor, GroupingRequest,
    MessageRole, RequestMetadata,
};

const SYSTEM_PROMPT: &str = "You arrange dinner guests into small tables of strangers \
who will enjoy each other's company. Reply with JSON only, no prose.";

/// Headroom left for the answer when checking the prompt size.
const ANSWER_TOKENS: u32 = 4096;

/// Grouping advisor built on a text-generation provider.
pub struct LlmGroupingAdvisor {
    provider: Arc<dyn AIProvider>,
    name: String,
}

impl LlmGroupingAdvisor {
    pub fn new(provider: Arc<dyn AIProvider>) -> Self {
        let name = format!("llm:{}", provider.provider_info().name);
        Self { provider, name }
    }

    fn build_prompt(request: &GroupingRequest) -> Result<String, AdvisorError> {
        let guests = serde_json::to_string_pretty(&request.guests)
            .map_err(|e| AdvisorError::Parse(format!("cannot encode roster: {}", e)))?;

        let size_rule = if request.allow_relaxation {
            format!(
                "Aim for groups of exactly {} guests. A group may have fewer, or up to {} when \
                 that clearly helps.",
                request.group_size, request.max_group_size
            )
        } else {
            format!(
                "Every group must have exactly {} guests.",
                request.group_size.min(request.max_group_size)
            )
        };
        let hint_rule = if request.allow_relaxation {
            "Avoid putting a guest with anyone in their mustNotSeatWith list."
        } else {
            "Never put a guest with anyone in their mustNotSeatWith list."
        };

        Ok(format!(
            "Split these {count} guests into groups.\n\
             Rules:\n\
             - Use every guest id exactly once and no other ids.\n\
             - {size_rule}\n\
             - Keep guests listed in each other's mustSeatWith together.\n\
             - {hint_rule}\n\
             - Prefer guests with matching traits, close scale values and compatible diets.\n\n\
             Guests:\n{guests}\n\n\
             Answer format: {{\"groups\": [[\"guest-id\", ...], ...], \"rationale\": \"one sentence\"}}",
            count = request.guests.len(),
        ))
    }

    /// Parses an answer, tolerating Markdown code fences and leading prose.
    fn parse_answer(content: &str) -> Result<GroupingProposal, AdvisorError> {
        let json = extract_json(content)
            .ok_or_else(|| AdvisorError::Parse("no JSON object in answer".to_string()))?;
        let raw: RawAnswer = serde_json::from_str(json)
            .map_err(|e| AdvisorError::Parse(format!("invalid grouping JSON: {}", e)))?;

        let groups = raw
            .groups
            .into_iter()
            .map(|group| {
                group
                    .into_iter()
                    .map(|id| {
                        GuestId::new(id.trim())
                            .map_err(|e| AdvisorError::Parse(format!("bad guest id: {}", e)))
                    })
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(GroupingProposal {
            groups,
            rationale: raw.rationale,
        })
    }
}

#[derive(Debug, Deserialize)]
struct RawAnswer {
    groups: Vec<Vec<String>>,
    #[serde(default)]
    rationale: Option<String>,
}

/// The outermost `{ ... }` span of `content`.
fn extract_json(content: &str) -> Option<&str> {
    let start = content.find('{')?;
    let end = content.rfind('}')?;
    (end > start).then(|| &content[start..=end])
}

#[async_trait]
impl GroupingAdvisor for LlmGroupingAdvisor {
    async fn propose(&self, request: &GroupingRequest) -> Result<GroupingProposal, AdvisorError> {
        let prompt = Self::build_prompt(request)?;
        let completion = CompletionRequest::new(RequestMetadata::new(
            request.event_id.clone(),
            format!("grouping-{}", Uuid::new_v4()),
        ))
        .with_system_prompt(SYSTEM_PROMPT)
        .with_message(MessageRole::User, prompt)
        .with_max_tokens(ANSWER_TOKENS)
        .with_temperature(0.0);

        let info = self.provider.provider_info();
        let tokens = self.provider.estimate_tokens(&completion.prompt_text());
        if tokens + ANSWER_TOKENS > info.max_context_tokens {
            return Err(AdvisorError::Unavailable(format!(
                "roster needs ~{} tokens, {} allows {}",
                tokens, info.model, info.max_context_tokens
            )));
        }

        let response = self.provider.complete(completion).await?;
        debug!(
            event_id = %request.event_id,
            model = %response.model,
            tokens = response.usage.total_tokens,
            "grouping advice received"
        );
        if response.finish_reason != FinishReason::Stop {
            return Err(AdvisorError::Parse(format!(
                "answer ended early: {:?}",
                response.finish_reason
            )));
        }

        Self::parse_answer(&response.content)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
