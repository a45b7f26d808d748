//! Agent System
//!
//! Role-scoped personas that the task pipeline hands work to:
//!
//! - **Verifier**: checks that the upload is a financial report
//! - **Analyst**: answers the user's query from the document and web search
//! - **Advisor**: turns the analysis into investment recommendations
//! - **Risk Assessor**: summarizes risk factors
//!
//! ## Agent loop
//!
//! ```text
//! task prompt
//!      │
//!      ▼
//! ┌─────────────┐  Action / Action Input   ┌──────────┐
//! │     LLM     │ ───────────────────────▶ │   Tool   │
//! │             │ ◀─────────────────────── │          │
//! └─────────────┘       Observation        └──────────┘
//!      │
//!      ▼ Final Answer (or iteration limit reached)
//!  step output
//! ```

pub mod executor;
pub mod roster;

use std::sync::Arc;

use crate::pipeline::TaskInputs;
use crate::tools::{describe_tools, Tool};

pub use executor::{parse_reply, AgentReply};
pub use roster::{AgentKind, Roster};

pub struct Agent {
    pub kind: AgentKind,
    pub role: String,
    /// May reference `{query}` and `{file_path}`
    pub goal: String,
    pub backstory: String,
    pub tools: Vec<Arc<dyn Tool>>,
    /// Maximum LLM calls that may request a tool before a final answer is forced
    pub max_iter: usize,
}

impl Agent {
    pub fn system_prompt(&self, inputs: &TaskInputs) -> String {
        let mut prompt = format!(
            "You are {}. {}\nYour personal goal is: {}\n",
            self.role,
            self.backstory,
            inputs.interpolate(&self.goal)
        );

        if self.tools.is_empty() {
            prompt.push_str(
                "\nYou have no tools. Respond with:\nFinal Answer: <your complete answer>\n",
            );
        } else {
            prompt.push_str(&format!(
                "\nYou may use these tools:\n{}\n\n\
                To use a tool, respond with exactly:\n\
                Thought: <your reasoning>\n\
                Action: <tool name>\n\
                Action Input: <tool input>\n\n\
                When you have enough information, respond with:\n\
                Final Answer: <your complete answer>\n",
                describe_tools(&self.tools)
            ));
        }

        prompt
    }
}
