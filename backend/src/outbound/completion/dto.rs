//! Request and response DTOs for the `generateContent` endpoint.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::domain::{ModerationPreview, Sentiment};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct GenerateContentDto<'a> {
    contents: [ContentDto<'a>; 1],
    generation_config: GenerationConfigDto,
}

#[derive(Debug, Serialize)]
struct ContentDto<'a> {
    parts: [PartDto<'a>; 1],
}

#[derive(Debug, Serialize)]
struct PartDto<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfigDto {
    response_mime_type: &'static str,
    response_schema: Value,
}

impl<'a> GenerateContentDto<'a> {
    pub(super) fn new(prompt: &'a str) -> Self {
        let sentiments: Vec<&str> = Sentiment::ALL.iter().map(|s| s.as_str()).collect();
        Self {
            contents: [ContentDto {
                parts: [PartDto { text: prompt }],
            }],
            generation_config: GenerationConfigDto {
                response_mime_type: "application/json",
                response_schema: json!({
                    "type": "OBJECT",
                    "properties": {
                        "sentiment": { "type": "STRING", "enum": sentiments },
                        "suggestedReply": { "type": "STRING" },
                        "reasoning": { "type": "STRING" }
                    },
                    "required": ["sentiment", "suggestedReply", "reasoning"]
                }),
            },
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct GenerateContentResponseDto {
    #[serde(default)]
    candidates: Vec<CandidateDto>,
}

#[derive(Debug, Deserialize)]
struct CandidateDto {
    #[serde(default)]
    content: Option<CandidateContentDto>,
}

#[derive(Debug, Deserialize)]
struct CandidateContentDto {
    #[serde(default)]
    parts: Vec<CandidatePartDto>,
}

#[derive(Debug, Deserialize)]
struct CandidatePartDto {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PreviewDto {
    sentiment: String,
    suggested_reply: String,
    reasoning: String,
}

impl GenerateContentResponseDto {
    /// First candidate's text, parsed as the structured preview.
    pub(super) fn into_preview(self) -> Result<ModerationPreview, String> {
        let text: String = self
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|part| part.text)
                    .collect()
            })
            .filter(|text: &String| !text.trim().is_empty())
            .ok_or_else(|| "no response text generated".to_owned())?;
        let preview: PreviewDto = serde_json::from_str(&text)
            .map_err(|err| format!("response text is not the requested JSON: {err}"))?;
        let sentiment = preview
            .sentiment
            .parse::<Sentiment>()
            .map_err(|err| err.to_string())?;
        Ok(ModerationPreview {
            sentiment,
            suggested_reply: preview.suggested_reply,
            reasoning: preview.reasoning,
        })
    }
}
