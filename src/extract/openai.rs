//! OpenAI chat-completions extraction client.

use serde::Deserialize;
use serde_json::json;

use super::DelightExtractor;
use crate::error::{DelightError, Result};

/// Default extraction model.
pub const DEFAULT_EXTRACTION_MODEL: &str = "o3-mini";

const CHAT_COMPLETIONS_URL: &str = "https://api.openai.com/v1/chat/completions";

const SYSTEM_PROMPT: &str = "You are an AI assistant that extracts delight attributes from \
customer reviews. Identify key aspects that customers love about a product and return \
relevant attributes.";

/// Blocking client for the OpenAI chat-completions endpoint.
///
/// Sends one numbered batch of review texts per call and asks the model for
/// a JSON object mapping each review to its attribute list or the "None"
/// sentinel. The raw content string comes back as-is; validation happens in
/// [`super::response`].
#[derive(Debug)]
pub struct OpenAiExtractor {
    client: reqwest::blocking::Client,
    api_key: String,
    model: String,
    endpoint: String,
}

impl OpenAiExtractor {
    /// Create a client for the default model.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
            api_key: api_key.into(),
            model: DEFAULT_EXTRACTION_MODEL.to_string(),
            endpoint: CHAT_COMPLETIONS_URL.to_string(),
        }
    }

    /// Use a different chat model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Point at an alternate API endpoint (proxies, gateways).
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

/// Build the user prompt: the numbered batch followed by the extraction
/// instructions and the required output shape.
fn build_user_prompt(reviews: &[String]) -> String {
    let mut prompt = String::from("Reviews:\n");
    for (idx, review) in reviews.iter().enumerate() {
        prompt.push_str(&format!("Review {}: {}\n", idx + 1, review));
    }

    prompt.push_str(
        "\nIdentify the delight attributes customers love about the product in each review \
above. A review can contain one or more attributes.\n\
If a review is generic and mentions no specific delight attribute (for example, the \
customer is simply satisfied, or only gives a star rating), return \"None\" for it; \
otherwise return a list of attributes.\n\
Rules:\n\
1. Only include attributes the customer clearly loved, visible in the review text.\n\
2. Do not repeat the same kind of attribute within one review (fragrance and odor \
control are the same kind).\n\
3. Different reviews describe the same attribute in different words; use standard \
attribute wording so similar attributes can be combined later by clustering.\n\
4. A customer recommending the product is not a delight attribute.\n\
Return a JSON object with the review number as the key and the attributes as the \
value, like:\n\
{\n\
  \"Review 1\": [\"attribute\", ...] or \"None\",\n\
  \"Review 2\": [\"attribute\", ...] or \"None\"\n\
}",
    );

    prompt
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: String,
}

impl DelightExtractor for OpenAiExtractor {
    fn extract_batch(&self, reviews: &[String]) -> Result<String> {
        let body = json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                { "role": "user", "content": build_user_prompt(reviews) }
            ],
            "response_format": { "type": "json_object" }
        });

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().unwrap_or_default();
            return Err(DelightError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: ChatResponse = response.json()?;
        let content = parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| {
                DelightError::MalformedResponse("chat response carried no choices".to_string())
            })?;

        Ok(content.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_prompt_numbers_reviews_from_one() {
        let reviews = vec!["Loved the scent".to_string(), "Five stars".to_string()];
        let prompt = build_user_prompt(&reviews);

        assert!(prompt.contains("Review 1: Loved the scent"));
        assert!(prompt.contains("Review 2: Five stars"));
    }

    #[test]
    fn test_user_prompt_describes_output_shape() {
        let prompt = build_user_prompt(&["x".to_string()]);
        assert!(prompt.contains("\"Review 1\""));
        assert!(prompt.contains("\"None\""));
    }

    #[test]
    fn test_chat_response_deserialization() {
        let raw = r#"{
            "id": "chatcmpl-1",
            "choices": [
                {
                    "index": 0,
                    "message": { "role": "assistant", "content": "{\"Review 1\": [\"Scent\"]}" },
                    "finish_reason": "stop"
                }
            ]
        }"#;
        let parsed: ChatResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(
            parsed.choices[0].message.content,
            "{\"Review 1\": [\"Scent\"]}"
        );
    }
}
