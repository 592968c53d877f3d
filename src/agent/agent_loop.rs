//! Core agent loop implementation.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::config::Config;
use crate::llm::{LlmClient, NO_RESPONSE};
use crate::tools::{ToolName, ToolRegistry};

use super::parser::{parse_decision, DecideError, Decision};
use super::prompt::{PromptTemplate, TemplateError};
use super::session::{AgentSession, IterationRecord, Message};
use super::trace::TraceSink;

const BUDGET_EXHAUSTED: &str = "I'm sorry, but I couldn't find a satisfactory answer within the allowed number of iterations. Here's what I know so far: ";

/// Next state of the loop.
#[derive(Debug)]
enum Step {
    Think,
    Decide(String),
    Act { tool: ToolName, input: String },
    Done,
}

/// The reasoning agent.
///
/// Holds only read-only setup; every `execute` call works on its own
/// [`AgentSession`], so one agent can serve concurrent queries.
pub struct Agent {
    llm: Arc<dyn LlmClient>,
    model: String,
    tools: ToolRegistry,
    template: PromptTemplate,
    trace: TraceSink,
    max_iterations: usize,
    pacing_delay: Duration,
}

impl Agent {
    /// Create an agent with the default iteration budget, no pacing and no trace file.
    pub fn new(
        llm: Arc<dyn LlmClient>,
        model: impl Into<String>,
        tools: ToolRegistry,
        template: PromptTemplate,
    ) -> Self {
        Self {
            llm,
            model: model.into(),
            tools,
            template,
            trace: TraceSink::disabled(),
            max_iterations: crate::config::DEFAULT_MAX_ITERATIONS,
            pacing_delay: Duration::ZERO,
        }
    }

    /// Build an agent from configuration, loading the prompt template from disk.
    pub fn from_config(
        config: &Config,
        llm: Arc<dyn LlmClient>,
        tools: ToolRegistry,
    ) -> Result<Self, TemplateError> {
        let template = PromptTemplate::load(&config.prompt_template_path)?;
        let trace = match &config.trace_path {
            Some(path) => TraceSink::file(path),
            None => TraceSink::disabled(),
        };
        Ok(Self::new(llm, config.model.clone(), tools, template)
            .with_trace(trace)
            .with_max_iterations(config.max_iterations)
            .with_pacing_delay(config.pacing_delay))
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn with_pacing_delay(mut self, pacing_delay: Duration) -> Self {
        self.pacing_delay = pacing_delay;
        self
    }

    pub fn with_trace(mut self, trace: TraceSink) -> Self {
        self.trace = trace;
        self
    }

    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    /// Answer `query`, returning one record per iteration.
    pub async fn execute(&self, query: &str) -> Vec<IterationRecord> {
        self.execute_session(query).await.into_records()
    }

    /// Answer `query`, returning the finished session including its message log.
    pub async fn execute_session(&self, query: &str) -> AgentSession {
        let run_id = Uuid::new_v4();
        let span = info_span!("execute", run_id = %run_id, model = %self.model);

        async {
            let mut session = AgentSession::new(query, self.max_iterations);
            session.push_message(Message::user(query));
            self.trace.event("user", query).await;

            let mut step = Step::Think;
            loop {
                step = match step {
                    Step::Think => self.think(&mut session).await,
                    Step::Decide(response) => self.decide(&mut session, &response),
                    Step::Act { tool, input } => self.act(&mut session, tool, &input).await,
                    Step::Done => break,
                };
            }

            info!(
                iterations = session.records.len(),
                answered = session.final_answer().is_some(),
                "Agent run finished"
            );
            session
        }
        .instrument(span)
        .await
    }

    async fn think(&self, session: &mut AgentSession) -> Step {
        let iteration = session.next_iteration();
        info!("Starting iteration {}", iteration);
        self.trace.banner(iteration).await;

        if session.budget_exhausted() {
            warn!("Reached maximum iterations. Stopping.");
            let mut message = format!("{}{}", BUDGET_EXHAUSTED, session.history());
            let record = session.current_record();
            // Errors kept out of the history would otherwise be lost here.
            if let Some(prior) = record.error.as_deref().filter(|e| !message.contains(*e)) {
                message = format!("{}\n{}", message, prior);
            }
            record.error = Some(message.clone());
            session.push_message(Message::assistant(message));
            return Step::Done;
        }

        session.begin_record(iteration);
        let prompt = self
            .template
            .render(&session.query, &session.history(), &self.tools.prompt_list());
        debug!(prompt_len = prompt.len(), "Rendered prompt");

        let response = self.ask_model(prompt).await;
        info!("Thinking => {}", response);
        session.current_record().thought = Some(response.clone());
        session.push_message(Message::assistant(format!("Thought: {}", response)));
        Step::Decide(response)
    }

    fn decide(&self, session: &mut AgentSession, response: &str) -> Step {
        match parse_decision(response) {
            Ok(Decision::Act { tool, action }) => {
                let input = action.input.clone();
                session.current_record().action = Some(action);
                if tool == ToolName::None {
                    info!("No action needed. Proceeding to final answer.");
                    return Step::Think;
                }
                session.push_message(Message::assistant(format!("Action: Using {} tool", tool)));
                let input = input.unwrap_or_else(|| session.query.clone());
                Step::Act { tool, input }
            }
            Ok(Decision::Answer(answer)) => {
                info!("Final answer reached");
                session.push_message(Message::assistant(format!("Final Answer: {}", answer)));
                session.current_record().final_answer = Some(answer);
                Step::Done
            }
            Err(e) => {
                if let DecideError::Malformed(_) = e {
                    error!("Failed to parse response: {}. Error: {}", response, e);
                } else {
                    error!("Error processing response: {}", e);
                }
                let message = e.recovery_message();
                session.current_record().error = Some(message.clone());
                session.push_message(Message::assistant(message));
                Step::Think
            }
        }
    }

    async fn act(&self, session: &mut AgentSession, tool: ToolName, input: &str) -> Step {
        let Some(adapter) = self.tools.get(tool) else {
            error!("No tool registered for choice: {}", tool);
            session.current_record().error = Some(format!("Error: Tool {} not found", tool));
            return Step::Think;
        };

        info!(tool = %tool, input, "Using tool");
        let result = adapter.use_tool(input).await;
        let observation = format!("Observation from {}: {}", tool, result);
        session.current_record().observation = Some(observation.clone());
        session.push_message(Message::system(observation));
        Step::Think
    }

    async fn ask_model(&self, prompt: String) -> String {
        let response = match self.llm.generate(&self.model, &[prompt]).await {
            Ok(Some(text)) if !text.trim().is_empty() => text,
            Ok(_) => NO_RESPONSE.to_string(),
            Err(e) => {
                error!("Model call failed: {}", e);
                NO_RESPONSE.to_string()
            }
        };

        if !self.pacing_delay.is_zero() {
            tokio::time::sleep(self.pacing_delay).await;
        }
        response
    }
}
