use anyhow::{bail, Result};
use serde::Deserialize;
use tracing::info;

use super::client::{ChatMessage, Completer, CompletionRequest};

pub const DEFAULT_TITLE: &str = "Product Innovation Leader";
pub const APOLOGY: &str =
    "I seem to be having some trouble connecting right now. Please try again in a moment.";
pub const NOT_CONFIGURED: &str =
    "AI assistant is not configured. Please add OPENAI_API_KEY to your environment.";

const JOB_DESCRIPTION: &str = r#"
Company: Opendoor - a real estate technology company that simplifies buying and selling homes.

About The Role:
Andrew would build products and systems that help Opendoor's teams and customers work better together. He'd partner deeply with sales, operations, and customer-facing teams to understand their challenges, then architect and ship solutions that meaningfully improve productivity, revenue outcomes, or customer experience.

This would be ideal for someone who doesn't wait for a spec, loves zero-to-one ambiguity, and wants to ship systems that actually get used daily by people who depend on them. He'd work directly with internal stakeholders and customers to explore what's possible and ensure the products built translate directly to realized business value.

The work would span customer-facing experiences, internal tools that make teams more effective, data infrastructure that surfaces insights, and systems that create leverage across the organization.

What Andrew Would Build:
- High-leverage applications: customer dashboards, seller insights, notification systems that make customers more engaged
- Internal systems & tools: sales enablement, operations automation, CRM integrations, reporting dashboards
- Data & measurement frameworks: analytics pipelines, performance tracking, knowledge bases that surface insights
- Platform experiences: APIs, integrations, systems that create interoperability

In This Role, Andrew Would:
- Partner deeply with teams to uncover high-impact problems and architect solutions
- Build & ship end-to-end - own problems from discovery through deployment
- Drive platform leverage by working with product teams to inform capabilities and close gaps
- Synthesize insights from real usage and feed them back to shape future development
- Scale knowledge through documentation, patterns, and technical resources

Less Focus On:
- Marketing operations: managing content calendars, writing copy, running campaigns
- Top-of-funnel acquisition: SEO, paid ads, lead generation tactics
- Isolated product features: different from building features in a vacuum - every project has business context
- Team/process management: leading through building and technical direction, not managing people

Success Would Be Measured By:
- Measurable improvements in customer engagement, retention, and lifetime value
- Productivity gains and time savings for internal teams
- Business impact: revenue outcomes, operational efficiency, customer satisfaction
- Adoption and daily usage - building things people actually depend on
- Speed and iteration velocity - shipping prototypes to production quickly
"#;

const JOB_TITLE_SUMMARY: &str = r#"Exploring how Andrew would fit at Opendoor in a role focused on building tools and systems that support teams and customers. The work would involve creating customer-facing experiences, internal tools for business teams, and data infrastructure - more about building systems that create leverage than managing campaigns or day-to-day operations."#;

/// Role material the careers chat is allowed to talk about. Built once at
/// startup and shared with the handlers.
#[derive(Debug, Clone)]
pub struct RoleBrief {
    pub candidate: String,
    pub company: String,
    /// Full role description the assistant answers from.
    pub description: String,
    /// Short summary used to invent alternative titles.
    pub title_summary: String,
}

impl Default for RoleBrief {
    fn default() -> Self {
        Self {
            candidate: "Andrew".into(),
            company: "Opendoor".into(),
            description: JOB_DESCRIPTION.into(),
            title_summary: JOB_TITLE_SUMMARY.into(),
        }
    }
}

impl RoleBrief {
    fn system_instruction(&self) -> String {
        format!(
            "You are an AI assistant helping explore how {name} might fit at {company}. Your \
personality is professional, helpful, and concise. Always speak in third person about {name} \
(e.g., \"{name} would\", \"He'd spend time\").\n\n\
Your knowledge base is limited to the role description provided. Don't invent information about \
{company}'s specific culture, products, salary, or teams. If asked something outside the scope, \
politely say \"I can only discuss what's outlined about how {name} might fit in this role. Can I \
clarify anything about the focus areas or trade-offs?\".\n\nAlways keep your answers short and to \
the point.\n\n---\n{description}\n---\n",
            name = self.candidate,
            company = self.company,
            description = self.description,
        )
    }
}

/// Body of `POST /api/chat`.
#[derive(Debug, Default, Deserialize)]
pub struct ChatRequest {
    pub action: Option<String>,
    pub message: Option<String>,
}

impl ChatRequest {
    fn is_remix(&self) -> bool {
        self.action.as_deref() == Some("remixTitle")
    }
}

/// Strip quoting and punctuation the model likes to wrap titles in.
pub fn clean_title(raw: &str) -> String {
    raw.trim()
        .chars()
        .filter(|c| !matches!(c, '\'' | '"' | '*' | '.' | '`'))
        .collect()
}

/// Produce the chat reply text for one request.
///
/// Errors only when the model call itself fails or there is nothing to send.
pub async fn reply(completer: &dyn Completer, brief: &RoleBrief, req: &ChatRequest) -> Result<String> {
    if req.is_remix() {
        let completion = completer
            .complete(CompletionRequest {
                messages: vec![ChatMessage::user(format!(
                    "Based on the following job summary, generate one creative and compelling \
alternative job title. Return ONLY the job title itself, without any introduction, punctuation, or \
quotation marks.\n\nJob Summary:\n{}",
                    brief.title_summary
                ))],
                temperature: Some(0.9),
                max_tokens: Some(50),
                json_object: false,
            })
            .await?;

        let title = completion.map(|t| clean_title(&t)).unwrap_or_default();
        let title = if title.is_empty() {
            DEFAULT_TITLE.to_string()
        } else {
            title
        };
        info!(%title, "remixed title");
        return Ok(title);
    }

    let Some(message) = req.message.as_deref() else {
        bail!("chat request has no message");
    };

    let completion = completer
        .complete(CompletionRequest {
            messages: vec![
                ChatMessage::system(brief.system_instruction()),
                ChatMessage::user(message),
            ],
            temperature: Some(0.7),
            max_tokens: Some(500),
            json_object: false,
        })
        .await?;

    Ok(completion
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| APOLOGY.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::future::BoxFuture;
    use std::sync::Mutex;

    struct Echo {
        reply: Option<String>,
        seen: Mutex<Vec<CompletionRequest>>,
    }

    impl Echo {
        fn new(reply: Option<&str>) -> Self {
            Self {
                reply: reply.map(str::to_string),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    impl Completer for Echo {
        fn complete(&self, req: CompletionRequest) -> BoxFuture<'_, Result<Option<String>>> {
            self.seen.lock().unwrap().push(req);
            let reply = self.reply.clone();
            Box::pin(async move { Ok(reply) })
        }
    }

    fn remix() -> ChatRequest {
        ChatRequest {
            action: Some("remixTitle".into()),
            message: None,
        }
    }

    #[test]
    fn test_clean_title() {
        assert_eq!(clean_title("  \"Chief *Builder*.\" "), "Chief Builder");
        assert_eq!(clean_title("`Systems Architect`"), "Systems Architect");
        assert_eq!(clean_title("It's"), "Its");
    }

    #[test]
    fn test_system_instruction_carries_role_text() {
        let brief = RoleBrief::default();
        let instruction = brief.system_instruction();
        assert!(instruction.starts_with(
            "You are an AI assistant helping explore how Andrew might fit at Opendoor. "
        ));
        assert!(instruction.contains("(e.g., \"Andrew would\", \"He'd spend time\")"));
        assert!(instruction.ends_with(&format!("---\n{}\n---\n", JOB_DESCRIPTION)));
        assert!(JOB_DESCRIPTION.contains("Success Would Be Measured By:"));
        assert!(brief.title_summary.starts_with("Exploring how Andrew would fit at Opendoor"));
    }

    #[tokio::test]
    async fn test_remix_title() {
        let model = Echo::new(Some("\"Leverage Engineer.\""));
        let out = reply(&model, &RoleBrief::default(), &remix()).await.unwrap();
        assert_eq!(out, "Leverage Engineer");

        let seen = model.seen.lock().unwrap();
        assert_eq!(seen[0].temperature, Some(0.9));
        assert_eq!(seen[0].max_tokens, Some(50));
        assert_eq!(seen[0].messages.len(), 1);
    }

    #[tokio::test]
    async fn test_remix_title_falls_back_when_empty() {
        for raw in [None, Some(""), Some(" .. ")] {
            let model = Echo::new(raw);
            let out = reply(&model, &RoleBrief::default(), &remix()).await.unwrap();
            assert_eq!(out, DEFAULT_TITLE);
        }
    }

    #[tokio::test]
    async fn test_message_uses_role_instruction() {
        let model = Echo::new(Some("He'd build dashboards."));
        let req = ChatRequest {
            action: None,
            message: Some("What would he build?".into()),
        };
        let out = reply(&model, &RoleBrief::default(), &req).await.unwrap();
        assert_eq!(out, "He'd build dashboards.");

        let seen = model.seen.lock().unwrap();
        assert_eq!(seen[0].messages[0].role, "system");
        assert!(seen[0].messages[0].content.contains("third person about Andrew"));
        assert_eq!(seen[0].messages[1].content, "What would he build?");
        assert_eq!(seen[0].max_tokens, Some(500));
    }

    #[tokio::test]
    async fn test_empty_completion_apologises() {
        let model = Echo::new(None);
        let req = ChatRequest {
            action: Some("ask".into()),
            message: Some("hello".into()),
        };
        assert_eq!(
            reply(&model, &RoleBrief::default(), &req).await.unwrap(),
            APOLOGY
        );
    }

    #[tokio::test]
    async fn test_missing_message_is_an_error() {
        let model = Echo::new(Some("unused"));
        let res = reply(&model, &RoleBrief::default(), &ChatRequest::default()).await;
        assert!(res.is_err());
        assert!(model.seen.lock().unwrap().is_empty());
    }
}
