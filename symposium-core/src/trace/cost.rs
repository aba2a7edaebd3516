//! LLM cost estimation

use crate::llm::{ModelInfo, TokenUsage};
use std::collections::HashMap;

/// Cost per 1M tokens for known provider/model pairs.
/// Prices are approximate.
pub struct LLMCostCalculator {
    input_costs: HashMap<String, f64>,
    output_costs: HashMap<String, f64>,
}

impl LLMCostCalculator {
    /// Create a calculator with default OpenAI pricing
    pub fn new() -> Self {
        let mut calculator = Self {
            input_costs: HashMap::new(),
            output_costs: HashMap::new(),
        };

        calculator.set_pricing("openai", "gpt-3.5-turbo", 0.5, 1.5);
        calculator.set_pricing("openai", "gpt-4", 30.0, 60.0);
        calculator.set_pricing("openai", "gpt-4-turbo", 10.0, 30.0);
        calculator.set_pricing("openai", "gpt-4o", 2.5, 10.0);
        calculator.set_pricing("openai", "gpt-4o-mini", 0.15, 0.6);

        calculator
    }

    /// Calculate cost for token usage. Unknown models fall back to $1/$2 per 1M tokens.
    pub fn calculate_cost(&self, model_info: &ModelInfo, usage: &TokenUsage) -> f64 {
        let key = format!("{}:{}", model_info.provider, model_info.model_name);

        let input_cost_per_million = self.input_costs.get(&key).copied().unwrap_or(1.0);
        let output_cost_per_million = self.output_costs.get(&key).copied().unwrap_or(2.0);

        let input_cost = (usage.prompt_tokens as f64 / 1_000_000.0) * input_cost_per_million;
        let output_cost = (usage.completion_tokens as f64 / 1_000_000.0) * output_cost_per_million;

        input_cost + output_cost
    }

    /// Add or update pricing for a model
    pub fn set_pricing(
        &mut self,
        provider: &str,
        model: &str,
        input_cost_per_million: f64,
        output_cost_per_million: f64,
    ) {
        let key = format!("{}:{}", provider, model);
        self.input_costs.insert(key.clone(), input_cost_per_million);
        self.output_costs.insert(key, output_cost_per_million);
    }
}

impl Default for LLMCostCalculator {
    fn default() -> Self {
        Self::new()
    }
}
