//! Agent Tools
//!
//! Single-purpose capabilities agents can invoke by name. Every tool takes a
//! string and returns a string; failures are reported in the returned text
//! instead of as errors, so a broken tool degrades the agent's input rather
//! than aborting the pipeline.
//!
//! - **Search the Internet**: web search via Serper or SerpAPI
//! - **Read Financial Document**: PDF text extraction
//! - **Investment Analysis Data Processor**: whitespace cleanup and truncation
//! - **Risk Assessment Simulator**: fixed placeholder output

pub mod pdf_reader;
pub mod risk;
pub mod search;
pub mod text_processor;

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::SearchConfig;

pub use pdf_reader::ReadDocumentTool;
pub use risk::RiskAssessmentTool;
pub use search::{SearchError, SearchTool};
pub use text_processor::InvestmentDataTool;

#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;
    fn description(&self) -> &str;
    async fn call(&self, input: &str) -> String;
}

/// The tool instances shared by every agent persona.
#[derive(Clone)]
pub struct ToolSet {
    pub search: Arc<dyn Tool>,
    pub read_document: Arc<dyn Tool>,
    pub investment_data: Arc<dyn Tool>,
    pub risk_assessment: Arc<dyn Tool>,
}

impl ToolSet {
    pub fn from_config(config: &SearchConfig) -> Self {
        Self {
            search: Arc::new(SearchTool::from_config(config)),
            read_document: Arc::new(ReadDocumentTool),
            investment_data: Arc::new(InvestmentDataTool::default()),
            risk_assessment: Arc::new(RiskAssessmentTool),
        }
    }

    pub fn with_search(mut self, search: Arc<dyn Tool>) -> Self {
        self.search = search;
        self
    }
}

/// Render a tool list for inclusion in an agent's system prompt.
pub fn describe_tools(tools: &[Arc<dyn Tool>]) -> String {
    tools
        .iter()
        .map(|t| format!("- {}: {}", t.name(), t.description()))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Case-insensitive lookup by tool name.
pub fn find_tool<'a>(tools: &'a [Arc<dyn Tool>], name: &str) -> Option<&'a Arc<dyn Tool>> {
    let wanted = name.trim().trim_matches(|c| c == '"' || c == '\'' || c == '`');
    tools.iter().find(|t| t.name().eq_ignore_ascii_case(wanted))
}
