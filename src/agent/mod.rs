//! Agent module - the ReAct reasoning loop.
//!
//! Each iteration follows think → decide → (act → think | finish):
//! 1. Render the prompt from the template, the query, history and tool list
//! 2. Ask the model for a JSON response
//! 3. Either call the requested tool and fold its observation into history,
//!    or stop with the final answer
//! 4. Malformed responses are fed back to the model; every retry spends an
//!    iteration from the same budget

mod agent_loop;
mod parser;
mod prompt;
mod session;
mod trace;

pub use agent_loop::Agent;
pub use parser::{clean_response, parse_decision, DecideError, Decision};
pub use prompt::{PromptTemplate, TemplateError, DEFAULT_TEMPLATE};
pub use session::{Action, AgentSession, IterationRecord, Message, Role};
pub use trace::TraceSink;
