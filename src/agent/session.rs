//! Conversation state for a single `execute` call.

use serde::{Deserialize, Serialize};

/// Sender of a conversation message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::System => "system",
        }
    }
}

/// A message in the prompt history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    /// `role: content`, as written into prompts and trace files.
    pub fn render(&self) -> String {
        format!("{}: {}", self.role.as_str(), self.content)
    }
}

/// Tool request taken from a model response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    pub name: String,
    pub input: Option<String>,
}

/// Structured result of one pass through the loop.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IterationRecord {
    pub iteration_number: usize,
    pub thought: Option<String>,
    pub action: Option<Action>,
    pub observation: Option<String>,
    pub final_answer: Option<String>,
    pub error: Option<String>,
}

impl IterationRecord {
    pub fn new(iteration_number: usize) -> Self {
        Self {
            iteration_number,
            ..Default::default()
        }
    }
}

/// Mutable state owned by one `execute` call.
#[derive(Debug, Clone)]
pub struct AgentSession {
    pub query: String,
    pub messages: Vec<Message>,
    pub records: Vec<IterationRecord>,
    pub current_iteration: usize,
    pub max_iterations: usize,
}

impl AgentSession {
    pub fn new(query: impl Into<String>, max_iterations: usize) -> Self {
        Self {
            query: query.into(),
            messages: Vec::new(),
            records: Vec::new(),
            current_iteration: 0,
            max_iterations,
        }
    }

    /// Start over with a new query, dropping all history.
    pub fn reset(&mut self, query: impl Into<String>) {
        self.query = query.into();
        self.messages.clear();
        self.records.clear();
        self.current_iteration = 0;
    }

    pub fn push_message(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Advance the iteration counter and return the new value.
    pub fn next_iteration(&mut self) -> usize {
        self.current_iteration += 1;
        self.current_iteration
    }

    /// Open the record for `iteration`.
    pub fn begin_record(&mut self, iteration: usize) {
        self.records.push(IterationRecord::new(iteration));
    }

    /// The most recent record, created for the current iteration if none exists yet.
    pub fn current_record(&mut self) -> &mut IterationRecord {
        if self.records.is_empty() {
            self.records.push(IterationRecord::new(self.current_iteration));
        }
        let last = self.records.len() - 1;
        &mut self.records[last]
    }

    pub fn budget_exhausted(&self) -> bool {
        self.current_iteration > self.max_iterations
    }

    /// Full history as newline-joined `role: content` lines.
    pub fn history(&self) -> String {
        self.messages
            .iter()
            .map(Message::render)
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn final_answer(&self) -> Option<&str> {
        self.records.iter().rev().find_map(|r| r.final_answer.as_deref())
    }

    pub fn into_records(self) -> Vec<IterationRecord> {
        self.records
    }
}
