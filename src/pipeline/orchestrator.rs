use tracing::info;

use crate::agents::{AgentKind, Roster};
use crate::llm::LLM;
use crate::pipeline::{TaskGraph, TaskInputs, TaskSpec};
use crate::tools::ToolSet;
use crate::types::{AppError, AppResult};

const CONTEXT_SEPARATOR: &str = "\n\n----------\n\n";

#[derive(Debug, Clone)]
pub struct StepOutput {
    pub name: &'static str,
    pub agent: AgentKind,
    pub output: String,
}

#[derive(Debug, Clone)]
pub struct PipelineRun {
    pub steps: Vec<StepOutput>,
}

impl PipelineRun {
    pub fn final_output(&self) -> &str {
        self.steps.last().map(|s| s.output.as_str()).unwrap_or_default()
    }
}

/// Runs a [`TaskGraph`] step by step against a roster of agents.
pub struct Pipeline {
    llm: LLM,
    roster: Roster,
    graph: TaskGraph,
}

impl Pipeline {
    pub fn new(llm: LLM, roster: Roster, graph: TaskGraph) -> Self {
        Self { llm, roster, graph }
    }

    pub fn financial_analysis(llm: LLM, tools: &ToolSet) -> Self {
        Self::new(llm, Roster::financial(tools), TaskGraph::financial_analysis())
    }

    fn task_prompt(task: &TaskSpec, inputs: &TaskInputs, context: &[&str]) -> String {
        let mut prompt = format!(
            "{}\n\nThis is the expected criteria for your final answer: {}\n",
            inputs.interpolate(task.description),
            task.expected_output
        );

        if !context.is_empty() {
            prompt.push_str("\nThis is the context you're working with:\n");
            prompt.push_str(&context.join(CONTEXT_SEPARATOR));
            prompt.push('\n');
        }

        prompt
    }

    pub async fn run(&self, inputs: &TaskInputs) -> AppResult<PipelineRun> {
        let mut steps: Vec<StepOutput> = Vec::with_capacity(self.graph.tasks().len());

        for task in self.graph.tasks() {
            let context: Vec<&str> = match &task.context {
                Some(deps) => steps
                    .iter()
                    .filter(|s| deps.contains(&s.name))
                    .map(|s| s.output.as_str())
                    .collect(),
                None => steps.iter().map(|s| s.output.as_str()).collect(),
            };

            let agent = self.roster.get(task.agent);
            info!(step = task.name, agent = %agent.role, context_items = context.len(), "Running pipeline step");

            let prompt = Self::task_prompt(task, inputs, &context);
            let output = agent.execute(&self.llm, &prompt, inputs).await?;

            steps.push(StepOutput {
                name: task.name,
                agent: task.agent,
                output,
            });
        }

        let run = PipelineRun { steps };
        if run.final_output().trim().is_empty() {
            return Err(AppError::Pipeline("final step produced an empty result".to_string()));
        }

        info!(result_len = run.final_output().len(), "Pipeline complete");
        Ok(run)
    }
}
