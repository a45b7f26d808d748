use crate::agents::Agent;
use crate::tools::ToolSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentKind {
    Verifier,
    Analyst,
    Advisor,
    RiskAssessor,
}

/// The four personas of the financial analysis crew.
pub struct Roster {
    verifier: Agent,
    analyst: Agent,
    advisor: Agent,
    risk_assessor: Agent,
}

impl Roster {
    pub fn financial(tools: &ToolSet) -> Self {
        Self {
            verifier: Agent {
                kind: AgentKind::Verifier,
                role: "Financial Document Verifier".to_string(),
                goal: "Verify the authenticity and relevance of the provided document at {file_path}."
                    .to_string(),
                backstory: "You are a strict compliance officer ensuring documents are factual corporate reports."
                    .to_string(),
                tools: vec![tools.read_document.clone()],
                max_iter: 1,
            },
            analyst: Agent {
                kind: AgentKind::Analyst,
                role: "Senior Financial Analyst".to_string(),
                goal: "Analyze financial documents to extract accurate insights and answer the user query: {query}"
                    .to_string(),
                backstory: "You are an experienced financial analyst known for rigorous analysis and \
                    objective market assessments. You rely strictly on factual data."
                    .to_string(),
                tools: vec![tools.read_document.clone(), tools.search.clone()],
                max_iter: 2,
            },
            advisor: Agent {
                kind: AgentKind::Advisor,
                role: "Investment Advisor".to_string(),
                goal: "Provide sound, evidence-based investment recommendations.".to_string(),
                backstory: "A fiduciary investment advisor prioritizing regulatory compliance and risk management."
                    .to_string(),
                tools: vec![tools.investment_data.clone()],
                max_iter: 1,
            },
            risk_assessor: Agent {
                kind: AgentKind::RiskAssessor,
                role: "Risk Assessment Expert".to_string(),
                goal: "Identify and quantify potential risks mentioned in the financial document.".to_string(),
                backstory: "A meticulous risk manager who identifies operational, market, and liquidity risks."
                    .to_string(),
                tools: vec![tools.risk_assessment.clone()],
                max_iter: 1,
            },
        }
    }

    pub fn get(&self, kind: AgentKind) -> &Agent {
        match kind {
            AgentKind::Verifier => &self.verifier,
            AgentKind::Analyst => &self.analyst,
            AgentKind::Advisor => &self.advisor,
            AgentKind::RiskAssessor => &self.risk_assessor,
        }
    }
}
