use async_trait::async_trait;

use crate::tools::Tool;

pub const DEFAULT_MAX_CHARS: usize = 5000;

/// Collapses whitespace runs to single spaces and truncates to `max_chars`
/// characters.
pub struct InvestmentDataTool {
    max_chars: usize,
}

impl Default for InvestmentDataTool {
    fn default() -> Self {
        Self { max_chars: DEFAULT_MAX_CHARS }
    }
}

impl InvestmentDataTool {
    pub fn process(&self, data: &str) -> String {
        let collapsed = data.split_whitespace().collect::<Vec<_>>().join(" ");
        match collapsed.char_indices().nth(self.max_chars) {
            Some((byte_idx, _)) => collapsed[..byte_idx].to_string(),
            None => collapsed,
        }
    }
}

#[async_trait]
impl Tool for InvestmentDataTool {
    fn name(&self) -> &str {
        "Investment Analysis Data Processor"
    }

    fn description(&self) -> &str {
        "Process and clean financial document data for investment analysis. Input: the raw document text."
    }

    async fn call(&self, input: &str) -> String {
        self.process(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapses_whitespace() {
        let tool = InvestmentDataTool::default();
        assert_eq!(tool.process("  Net\tincome \n\n rose   4% "), "Net income rose 4%");
        assert_eq!(tool.process(" \n\t "), "");
    }

    #[test]
    fn test_truncates_to_char_limit() {
        let tool = InvestmentDataTool::default();
        let long = "x".repeat(DEFAULT_MAX_CHARS + 10);
        assert_eq!(tool.process(&long).chars().count(), DEFAULT_MAX_CHARS);
    }

    #[test]
    fn test_truncation_respects_char_boundaries() {
        let tool = InvestmentDataTool { max_chars: 3 };
        assert_eq!(tool.process("€€€€"), "€€€");
    }
}
