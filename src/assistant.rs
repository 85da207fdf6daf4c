//! Chat assistant
//!
//! Wraps IntentClassifier + ResponseSynthesizer behind an async boundary and
//! owns message delivery status: agents show as `processing` while a reply
//! is pending and every delivered message is `verified`.

use crate::classifier::IntentClassifier;
use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::models::{ClassificationResult, Message};
use crate::synthesizer::ResponseSynthesizer;
use crate::Result;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Role used for messages typed by the user
pub const USER_ROLE: &str = "user";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AgentProfile {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub avatar: String,
    pub specialty: String,
    pub tone: String,
    /// Typical reply time shown to the user, e.g. "1-3 วินาที"
    #[serde(default)]
    pub response_time: String,
}

pub fn default_agents() -> Vec<AgentProfile> {
    vec![
        AgentProfile {
            id: "doctor".to_string(),
            name: "Dr. Neuro".to_string(),
            avatar: "🧠".to_string(),
            specialty: "ระบบประสาท".to_string(),
            tone: "สุภาพ เป็นกันเอง".to_string(),
            response_time: "2-5 วินาที".to_string(),
        },
        AgentProfile {
            id: "analyst".to_string(),
            name: "Cyber Analyst".to_string(),
            avatar: "🛡️".to_string(),
            specialty: "ความมั่นคงไซเบอร์".to_string(),
            tone: "ตรงไปตรงมา".to_string(),
            response_time: "1-3 วินาที".to_string(),
        },
    ]
}

/// Classification plus the delivered messages for one user turn
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatReply {
    pub classification: ClassificationResult,
    pub messages: Vec<Message>,
}

pub struct ChatAssistant {
    classifier: IntentClassifier,
    synthesizer: ResponseSynthesizer,
    agents: Vec<AgentProfile>,
    latency: Duration,
}

impl ChatAssistant {
    pub fn new(
        classifier: IntentClassifier,
        synthesizer: ResponseSynthesizer,
        agents: Vec<AgentProfile>,
        latency: Duration,
    ) -> Self {
        Self {
            classifier,
            synthesizer,
            agents,
            latency,
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(
            IntentClassifier::new(&config.domains),
            ResponseSynthesizer::new(&config.domains, config.fallback.clone()),
            config.agents.clone(),
            config.chat.response_latency(),
        )
    }

    pub fn agents(&self) -> &[AgentProfile] {
        &self.agents
    }

    pub fn agent_ids(&self) -> Vec<String> {
        self.agents.iter().map(|a| a.id.clone()).collect()
    }

    pub fn agent(&self, id: &str) -> Option<&AgentProfile> {
        self.agents.iter().find(|a| a.id == id)
    }

    pub fn classify(&self, text: &str) -> ClassificationResult {
        self.classifier.classify(text)
    }

    /// Classify, wait out the response latency, then synthesize.
    pub async fn respond(&self, text: &str, agent_ids: &[String]) -> ChatReply {
        let classification = self.classifier.classify(text);

        info!(
            top_match = %classification.top_match,
            multi_domain = classification.requires_multi_domain,
            keywords = ?classification.keywords,
            "Message classified"
        );

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        let messages = self
            .synthesizer
            .synthesize(text, &classification, agent_ids)
            .into_iter()
            .map(|r| Message::verified(r.agent, r.content))
            .collect();

        ChatReply {
            classification,
            messages,
        }
    }

    /// Responses only; `agent_ids` limits which domains may answer.
    pub async fn classify_and_respond(&self, text: &str, agent_ids: &[String]) -> Vec<Message> {
        self.respond(text, agent_ids).await.messages
    }
}

impl Default for ChatAssistant {
    fn default() -> Self {
        Self::from_config(&EngineConfig::default())
    }
}

/// Cumulative message length per role
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct InteractionAnalytics {
    pub message_lengths: BTreeMap<String, usize>,
    pub message_counts: BTreeMap<String, usize>,
}

impl InteractionAnalytics {
    pub fn track(&mut self, message: &Message) {
        *self
            .message_lengths
            .entry(message.role.clone())
            .or_default() += message.content.chars().count();
        *self.message_counts.entry(message.role.clone()).or_default() += 1;
    }
}

/// One conversation: transcript, typing indicators and analytics
pub struct ChatSession {
    assistant: Arc<ChatAssistant>,
    transcript: Vec<Message>,
    typing: BTreeSet<String>,
    analytics: InteractionAnalytics,
}

impl ChatSession {
    pub fn new(assistant: Arc<ChatAssistant>) -> Self {
        Self {
            assistant,
            transcript: Vec::new(),
            typing: BTreeSet::new(),
            analytics: InteractionAnalytics::default(),
        }
    }

    pub fn transcript(&self) -> &[Message] {
        &self.transcript
    }

    pub fn analytics(&self) -> &InteractionAnalytics {
        &self.analytics
    }

    /// Agents currently composing a reply
    pub fn typing(&self) -> Vec<&str> {
        self.typing.iter().map(String::as_str).collect()
    }

    /// Placeholder messages for agents still composing a reply.
    pub fn pending_messages(&self) -> Vec<Message> {
        self.typing.iter().map(Message::pending).collect()
    }

    /// Record the user's turn and mark every agent as typing.
    pub fn post_user_message(&mut self, input: &str) -> Result<Message> {
        let content = input.trim();
        if content.is_empty() {
            return Err(EngineError::Validation("message is empty".to_string()));
        }

        let message = Message::verified(USER_ROLE, content);
        self.analytics.track(&message);
        self.transcript.push(message.clone());
        self.typing = self.assistant.agent_ids().into_iter().collect();

        Ok(message)
    }

    /// Append agent replies and clear typing indicators.
    pub fn deliver(&mut self, responses: Vec<Message>) {
        self.typing.clear();
        for message in responses {
            self.analytics.track(&message);
            self.transcript.push(message);
        }
    }

    /// Full turn: post, await the assistant, deliver.
    pub async fn send(&mut self, input: &str) -> Result<Vec<Message>> {
        let message = self.post_user_message(input)?;
        let agents = self.assistant.agent_ids();

        let responses = self
            .assistant
            .classify_and_respond(&message.content, &agents)
            .await;

        self.deliver(responses.clone());
        Ok(responses)
    }
}
