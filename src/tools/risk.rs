use async_trait::async_trait;

use crate::tools::Tool;

pub const RISK_ASSESSMENT_PLACEHOLDER: &str =
    "Standard risk assessment complete. Please review qualitative metrics carefully.";

/// Placeholder risk assessment: ignores its input.
// TODO: replace with real extraction of market, liquidity and operational risk factors
pub struct RiskAssessmentTool;

#[async_trait]
impl Tool for RiskAssessmentTool {
    fn name(&self) -> &str {
        "Risk Assessment Simulator"
    }

    fn description(&self) -> &str {
        "Simulates risk assessment extraction from financial data. Input: the financial document data."
    }

    async fn call(&self, _input: &str) -> String {
        RISK_ASSESSMENT_PLACEHOLDER.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_output_is_independent_of_input() {
        assert_eq!(RiskAssessmentTool.call("").await, RISK_ASSESSMENT_PLACEHOLDER);
        assert_eq!(RiskAssessmentTool.call("Debt ratio 3.2x").await, RISK_ASSESSMENT_PLACEHOLDER);
    }
}
