//! Task Graph
//!
//! A fixed, ordered list of analysis steps. Each step names the agent that
//! performs it, a description template, the expected output, and which
//! earlier steps feed it context.
//!
//! ```text
//! verification ──▶ analysis ──┬──▶ investment_advice
//!                             └──▶ risk_assessment
//! ```
//!
//! Steps run strictly in list order; the last step's output is the result.

pub mod orchestrator;

use std::collections::HashSet;

use crate::agents::AgentKind;
use crate::types::{AppError, AppResult};

pub use orchestrator::{Pipeline, PipelineRun, StepOutput};

/// Per-job values substituted into task and goal templates.
#[derive(Debug, Clone)]
pub struct TaskInputs {
    pub query: String,
    pub file_path: String,
}

impl TaskInputs {
    pub fn new(query: impl Into<String>, file_path: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            file_path: file_path.into(),
        }
    }

    pub fn interpolate(&self, template: &str) -> String {
        template
            .replace("{query}", &self.query)
            .replace("{file_path}", &self.file_path)
    }
}

#[derive(Debug, Clone)]
pub struct TaskSpec {
    pub name: &'static str,
    pub agent: AgentKind,
    pub description: &'static str,
    pub expected_output: &'static str,
    /// Steps whose outputs are passed as context. `None` means every
    /// earlier step.
    pub context: Option<Vec<&'static str>>,
}

#[derive(Debug, Clone)]
pub struct TaskGraph {
    tasks: Vec<TaskSpec>,
}

impl TaskGraph {
    /// Build a graph, checking that names are unique and that every context
    /// reference points at an earlier step.
    pub fn new(tasks: Vec<TaskSpec>) -> AppResult<Self> {
        if tasks.is_empty() {
            return Err(AppError::Internal("task graph has no steps".to_string()));
        }

        let mut seen = HashSet::new();
        for task in &tasks {
            for dep in task.context.iter().flatten() {
                if !seen.contains(dep) {
                    return Err(AppError::Internal(format!(
                        "step '{}' depends on '{}', which does not run before it",
                        task.name, dep
                    )));
                }
            }
            if !seen.insert(task.name) {
                return Err(AppError::Internal(format!("duplicate step name '{}'", task.name)));
            }
        }

        Ok(Self { tasks })
    }

    pub fn financial_analysis() -> Self {
        let tasks = vec![
            TaskSpec {
                name: "verification",
                agent: AgentKind::Verifier,
                description: "Read the document at {file_path}. Verify if it is a valid financial report.",
                expected_output: "Confirmation of whether the document is a financial report.",
                context: None,
            },
            TaskSpec {
                name: "analysis",
                agent: AgentKind::Analyst,
                description: "Based on the verified document at {file_path}, analyze the financials to address: '{query}'.",
                expected_output: "A detailed financial analysis report addressing the user's query with factual data.",
                context: Some(vec!["verification"]),
            },
            TaskSpec {
                name: "investment_advice",
                agent: AgentKind::Advisor,
                description: "Using the financial analysis, provide professional, evidence-based investment advice.",
                expected_output: "A bulleted list of investment recommendations grounded in the financial analysis.",
                context: Some(vec!["analysis"]),
            },
            TaskSpec {
                name: "risk_assessment",
                agent: AgentKind::RiskAssessor,
                description: "Evaluate the risk factors present in the financial document.",
                expected_output: "A structured risk assessment report detailing potential risks and mitigation strategies.",
                context: Some(vec!["analysis"]),
            },
        ];

        Self { tasks }
    }

    pub fn tasks(&self) -> &[TaskSpec] {
        &self.tasks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(name: &'static str, context: Option<Vec<&'static str>>) -> TaskSpec {
        TaskSpec {
            name,
            agent: AgentKind::Analyst,
            description: "d",
            expected_output: "e",
            context,
        }
    }

    #[test]
    fn test_interpolate() {
        let inputs = TaskInputs::new("Is debt rising?", "data/a.pdf");
        assert_eq!(
            inputs.interpolate("Read {file_path} and answer '{query}' ({query})"),
            "Read data/a.pdf and answer 'Is debt rising?' (Is debt rising?)"
        );
    }

    #[test]
    fn test_financial_graph_is_valid() {
        let graph = TaskGraph::financial_analysis();
        let names: Vec<_> = graph.tasks().iter().map(|t| t.name).collect();
        assert_eq!(names, ["verification", "analysis", "investment_advice", "risk_assessment"]);
        assert!(TaskGraph::new(graph.tasks().to_vec()).is_ok());
    }

    #[test]
    fn test_forward_reference_rejected() {
        let err = TaskGraph::new(vec![spec("a", Some(vec!["b"])), spec("b", None)]).unwrap_err();
        assert!(err.to_string().contains("depends on 'b'"));
    }

    #[test]
    fn test_self_reference_rejected() {
        assert!(TaskGraph::new(vec![spec("a", Some(vec!["a"]))]).is_err());
    }

    #[test]
    fn test_duplicate_and_empty_rejected() {
        assert!(TaskGraph::new(vec![spec("a", None), spec("a", None)]).is_err());
        assert!(TaskGraph::new(vec![]).is_err());
    }
}
