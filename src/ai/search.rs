use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{error, warn};

use super::client::{ChatMessage, Completer, CompletionRequest};

const ADVISOR_INSTRUCTION: &str = "You are an expert Opendoor home advisor helping homeowners \
maximize their property value and make informed real estate decisions. Analyze the provided home \
data and user question to give actionable, data-driven insights. Always respond with valid JSON \
containing: summary (string, 1-2 sentences overview), insights (array of {title, detail} with 2-3 \
key data points), and recommendations (array of 2-4 actionable next steps). Be professional, \
concise, and focus on equity opportunities, market timing, and home improvements.";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    pub title: String,
    pub detail: String,
}

/// The answer shape the search box renders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insights {
    pub summary: String,
    pub insights: Vec<Insight>,
    pub recommendations: Vec<String>,
}

impl Insights {
    /// Canned answer used when no model is configured or the model fails.
    pub fn fallback() -> Self {
        Self {
            summary: "Here's a quick overview of opportunities around your home. You can refinance \
to unlock equity, explore mid-grade upgrades, and time a listing when demand peaks."
                .into(),
            insights: vec![
                Insight {
                    title: "Equity lever".into(),
                    detail: "Refinancing at 5.7% could free up roughly $120k in equity for \
improvements or a bridge move without selling first."
                        .into(),
                },
                Insight {
                    title: "Listing timing".into(),
                    detail: "Austin listings in your ZIP are receiving 2.1 offers on average when \
listed in late spring with condition scores above 80."
                        .into(),
                },
            ],
            recommendations: vec![
                "Capture updated photos after flooring refresh to improve digital curb appeal."
                    .into(),
                "Review comps within 0.5 miles weekly to monitor pricing momentum.".into(),
            ],
        }
    }

    fn fallback_value() -> Value {
        serde_json::to_value(Self::fallback()).unwrap_or(Value::Null)
    }
}

/// Incoming search body. Both fields are loose JSON so a bad shape can be
/// reported as a missing query instead of a decode failure.
#[derive(Debug, Default, Deserialize)]
pub struct SearchRequest {
    #[serde(default)]
    pub query: Value,
    #[serde(default)]
    pub context: Value,
}

impl SearchRequest {
    /// Decode a request body, treating anything unparsable as empty.
    pub fn from_body(body: &[u8]) -> Self {
        serde_json::from_slice(body).unwrap_or_default()
    }

    /// The query when it is a non-empty string.
    pub fn query(&self) -> Option<&str> {
        self.query.as_str().filter(|q| !q.is_empty())
    }
}

/// The context is forwarded as the client sent it, `null` included.
fn build_request(query: &str, context: &Value) -> CompletionRequest {
    CompletionRequest {
        messages: vec![
            ChatMessage::system(ADVISOR_INSTRUCTION),
            ChatMessage::user(format!("Home Context: {}\n\nQuestion: {}", context, query)),
        ],
        json_object: true,
        ..Default::default()
    }
}

/// Ask the model about `query`. Always yields a JSON answer: the model's own
/// object when it produces valid JSON, otherwise [`Insights::fallback`].
pub async fn answer(completer: Option<&dyn Completer>, query: &str, context: &Value) -> Value {
    let Some(completer) = completer else {
        return Insights::fallback_value();
    };

    match completer.complete(build_request(query, context)).await {
        Ok(Some(content)) if !content.is_empty() => match serde_json::from_str(&content) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!(error = %e, "model returned invalid JSON");
                Insights::fallback_value()
            }
        },
        Ok(_) => Insights::fallback_value(),
        Err(e) => {
            error!(error = %e, "AI search error");
            Insights::fallback_value()
        }
    }
}
