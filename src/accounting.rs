//! Token-based cost accounting
//!
//! A pure tariff-table lookup. Costs are reasonable floating-point dollars;
//! no currency-precision guarantees beyond f64.

use crate::llm::Model;

/// Per-million-token USD rates for one model
#[derive(Debug, Clone, Copy)]
pub struct Tariff {
    /// USD per million input tokens
    pub input_per_mtok: f64,
    /// USD per million output tokens
    pub output_per_mtok: f64,
}

/// Tariff for a model
pub fn tariff(model: &Model) -> Tariff {
    use crate::llm::openai::OpenAiModel;

    match model {
        Model::OpenAi(OpenAiModel::Gpt4o) => Tariff {
            input_per_mtok: 2.50,
            output_per_mtok: 10.00,
        },
        Model::OpenAi(OpenAiModel::Gpt4oMini) => Tariff {
            input_per_mtok: 0.15,
            output_per_mtok: 0.60,
        },
    }
}

/// Estimate the USD cost of one exchange
///
/// The provider may omit either count; missing counts contribute zero
/// rather than failing the exchange.
pub fn estimate_cost(model: &Model, input_tokens: Option<u64>, output_tokens: Option<u64>) -> f64 {
    let tariff = tariff(model);
    let input = input_tokens.unwrap_or(0) as f64;
    let output = output_tokens.unwrap_or(0) as f64;

    (input * tariff.input_per_mtok + output * tariff.output_per_mtok) / 1_000_000.0
}
