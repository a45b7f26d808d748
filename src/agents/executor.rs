use tracing::{debug, info, warn};

use crate::agents::Agent;
use crate::llm::LLM;
use crate::pipeline::TaskInputs;
use crate::tools::find_tool;
use crate::types::{AppResult, LLMMessage};

const FINAL_ANSWER: &str = "Final Answer:";
const ACTION: &str = "Action:";
const ACTION_INPUT: &str = "Action Input:";
const OBSERVATION: &str = "Observation:";

/// Tool output beyond this is cut before being fed back to the model.
const MAX_OBSERVATION_CHARS: usize = 12_000;

const FORCE_FINAL_PROMPT: &str = "You have reached the tool usage limit. \
    Do not request any more tools. Give your best complete answer now, starting with \"Final Answer:\".";

#[derive(Debug, Clone, PartialEq)]
pub enum AgentReply {
    Action { tool: String, input: String },
    Final(String),
}

/// Interpret a model reply. Anything that is neither a tool request nor an
/// explicit final answer is taken as the final answer verbatim.
pub fn parse_reply(text: &str) -> AgentReply {
    if let Some(idx) = text.find(FINAL_ANSWER) {
        return AgentReply::Final(text[idx + FINAL_ANSWER.len()..].trim().to_string());
    }

    let tool = text
        .lines()
        .find_map(|line| line.trim().strip_prefix(ACTION))
        .map(|name| name.trim().to_string());

    if let Some(tool) = tool.filter(|t| !t.is_empty()) {
        let input = text
            .find(ACTION_INPUT)
            .map(|idx| {
                let rest = &text[idx + ACTION_INPUT.len()..];
                // Models occasionally hallucinate the observation themselves
                let rest = rest.find(OBSERVATION).map_or(rest, |end| &rest[..end]);
                rest.trim().to_string()
            })
            .unwrap_or_default();
        return AgentReply::Action { tool, input };
    }

    AgentReply::Final(text.trim().to_string())
}

fn truncate_observation(observation: String) -> String {
    match observation.char_indices().nth(MAX_OBSERVATION_CHARS) {
        Some((idx, _)) => format!("{}\n[truncated]", &observation[..idx]),
        None => observation,
    }
}

impl Agent {
    /// Work on one task until the model produces a final answer.
    pub async fn execute(&self, llm: &LLM, task_prompt: &str, inputs: &TaskInputs) -> AppResult<String> {
        let system = self.system_prompt(inputs);
        let mut messages = vec![LLMMessage::user(task_prompt)];

        for iteration in 0..self.max_iter {
            debug!(agent = %self.role, iteration, "Agent iteration");
            let response = llm.complete(Some(system.clone()), messages.clone()).await?;

            match parse_reply(&response.content) {
                AgentReply::Final(answer) => {
                    info!(agent = %self.role, answer_len = answer.len(), "Agent finished");
                    return Ok(answer);
                }
                AgentReply::Action { tool, input } => {
                    let observation = match find_tool(&self.tools, &tool) {
                        Some(t) => {
                            info!(agent = %self.role, tool = %t.name(), "Invoking tool");
                            t.call(&input).await
                        }
                        None => {
                            warn!(agent = %self.role, tool = %tool, "Agent requested unknown tool");
                            let available: Vec<&str> = self.tools.iter().map(|t| t.name()).collect();
                            format!(
                                "Tool '{}' is not available. Available tools: {}",
                                tool,
                                if available.is_empty() { "none".to_string() } else { available.join(", ") }
                            )
                        }
                    };

                    messages.push(LLMMessage::assistant(response.content));
                    messages.push(LLMMessage::user(format!(
                        "{} {}",
                        OBSERVATION,
                        truncate_observation(observation)
                    )));
                }
            }
        }

        info!(agent = %self.role, max_iter = self.max_iter, "Iteration limit reached, forcing final answer");
        messages.push(LLMMessage::user(FORCE_FINAL_PROMPT));
        let response = llm.complete(Some(system), messages).await?;

        Ok(match parse_reply(&response.content) {
            AgentReply::Final(answer) => answer,
            AgentReply::Action { .. } => response.content.trim().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::AgentKind;
    use crate::llm::testing::ScriptedAdapter;
    use crate::tools::{RiskAssessmentTool, Tool};
    use crate::tools::risk::RISK_ASSESSMENT_PLACEHOLDER;
    use std::sync::Arc;

    fn inputs() -> TaskInputs {
        TaskInputs::new("What is the outlook?", "data/doc.pdf")
    }

    fn agent(tools: Vec<Arc<dyn Tool>>, max_iter: usize) -> Agent {
        Agent {
            kind: AgentKind::RiskAssessor,
            role: "Risk Assessment Expert".to_string(),
            goal: "Assess {query}".to_string(),
            backstory: "A meticulous risk manager.".to_string(),
            tools,
            max_iter,
        }
    }

    #[test]
    fn test_parse_final_answer() {
        assert_eq!(
            parse_reply("Thought: done\nFinal Answer: Looks solid."),
            AgentReply::Final("Looks solid.".to_string())
        );
    }

    #[test]
    fn test_parse_action() {
        let reply = "Thought: need data\nAction: Read Financial Document\nAction Input: data/doc.pdf\nObservation: made up";
        assert_eq!(
            parse_reply(reply),
            AgentReply::Action {
                tool: "Read Financial Document".to_string(),
                input: "data/doc.pdf".to_string()
            }
        );
    }

    #[test]
    fn test_parse_plain_text_is_final() {
        assert_eq!(parse_reply("  just prose \n"), AgentReply::Final("just prose".to_string()));
    }

    #[test]
    fn test_truncate_observation() {
        let long = "a".repeat(MAX_OBSERVATION_CHARS + 5);
        assert!(truncate_observation(long).ends_with("[truncated]"));
        assert_eq!(truncate_observation("short".to_string()), "short");
    }

    #[test]
    fn test_system_prompt_interpolates_goal() {
        let prompt = agent(vec![Arc::new(RiskAssessmentTool)], 1).system_prompt(&inputs());
        assert!(prompt.contains("Assess What is the outlook?"));
        assert!(prompt.contains("Risk Assessment Simulator"));
    }

    #[tokio::test]
    async fn test_tool_call_then_final_answer() {
        let adapter = ScriptedAdapter::new([
            "Action: Risk Assessment Simulator\nAction Input: the report",
            "Final Answer: Moderate risk.",
        ]);
        let answer = agent(vec![Arc::new(RiskAssessmentTool)], 2)
            .execute(&adapter.llm(), "Evaluate risk", &inputs())
            .await
            .unwrap();

        assert_eq!(answer, "Moderate risk.");
        let requests = adapter.requests();
        assert_eq!(requests.len(), 2);
        let observation = &requests[1].messages.last().unwrap().content;
        assert_eq!(observation, &format!("Observation: {}", RISK_ASSESSMENT_PLACEHOLDER));
    }

    #[tokio::test]
    async fn test_iteration_limit_forces_final_answer() {
        let adapter = ScriptedAdapter::new([
            "Action: Risk Assessment Simulator\nAction Input: x",
            "Final Answer: Forced answer.",
        ]);
        let answer = agent(vec![Arc::new(RiskAssessmentTool)], 1)
            .execute(&adapter.llm(), "Evaluate risk", &inputs())
            .await
            .unwrap();

        assert_eq!(answer, "Forced answer.");
        let last_request = adapter.requests().pop().unwrap();
        assert_eq!(last_request.messages.last().unwrap().content, FORCE_FINAL_PROMPT);
    }

    #[tokio::test]
    async fn test_unknown_tool_yields_observation() {
        let adapter = ScriptedAdapter::new([
            "Action: Calculator\nAction Input: 2+2",
            "Final Answer: ok",
        ]);
        agent(vec![], 2)
            .execute(&adapter.llm(), "Evaluate risk", &inputs())
            .await
            .unwrap();

        let observation = adapter.requests()[1].messages.last().unwrap().content.clone();
        assert!(observation.contains("Tool 'Calculator' is not available"));
    }

    #[tokio::test]
    async fn test_llm_error_propagates() {
        let adapter = ScriptedAdapter::failing("quota exceeded");
        let err = agent(vec![], 1)
            .execute(&adapter.llm(), "Evaluate risk", &inputs())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "LLM API error: quota exceeded");
    }
}
