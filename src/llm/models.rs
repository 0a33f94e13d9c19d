//! Catalog of selectable chat models

use crate::error::{AtsMatchError, Result};
use log::warn;
use serde::{Deserialize, Serialize};

/// Id used when a requested model is unknown.
pub const FALLBACK_MODEL: &str = "claude";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelInfo {
    pub id: String,
    pub slug: String,
    pub display_name: String,
}

pub struct ModelCatalog {
    models: Vec<ModelInfo>,
}

impl Default for ModelCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl ModelCatalog {
    pub fn new() -> Self {
        let models = KNOWN_MODELS
            .iter()
            .map(|(id, slug, display_name)| ModelInfo {
                id: id.to_string(),
                slug: slug.to_string(),
                display_name: display_name.to_string(),
            })
            .collect();
        Self { models }
    }

    pub fn get(&self, id: &str) -> Option<&ModelInfo> {
        self.models.iter().find(|m| m.id == id)
    }

    /// Look up `id`, falling back to the default model when unknown.
    pub fn resolve(&self, id: &str) -> &ModelInfo {
        if let Some(model) = self.get(id) {
            return model;
        }
        warn!("Unknown model '{}', falling back to '{}'", id, FALLBACK_MODEL);
        self.fallback()
    }

    /// Look up `id`, rejecting ids the catalog does not know.
    pub fn require(&self, id: &str) -> Result<&ModelInfo> {
        self.get(id).ok_or_else(|| {
            AtsMatchError::InvalidInput(format!("Unknown model '{}', run `ats-match models` for the list", id))
        })
    }

    fn fallback(&self) -> &ModelInfo {
        // KNOWN_MODELS starts with the fallback entry.
        &self.models[0]
    }

    pub fn list(&self) -> &[ModelInfo] {
        &self.models
    }
}

const KNOWN_MODELS: &[(&str, &str, &str)] = &[
    ("claude", "anthropic/claude-3-haiku:beta", "Claude 3 Haiku"),
    ("gpt", "openai/gpt-3.5-turbo", "GPT-3.5 Turbo"),
    ("gemini", "google/gemini-2.5-pro-preview", "Gemini 2.5 Pro"),
    ("deepseek-r1-0528-qwen3-8b", "deepseek/deepseek-r1-0528-qwen3-8b:free", "DeepSeek R1 0528 Qwen3 8B"),
    ("deepseek-r1-0528", "deepseek/deepseek-r1-0528:free", "DeepSeek R1 0528"),
    ("sarvam-m", "sarvamai/sarvam-m:free", "Sarvam M"),
    ("devstral-small", "mistralai/devstral-small:free", "Devstral Small"),
    ("gemma-3n-4b", "google/gemma-3n-e4b-it:free", "Gemma 3n 4B"),
    ("llama-3.3-8b-instruct", "meta-llama/llama-3.3-8b-instruct:free", "Llama 3.3 8B Instruct"),
    ("deephermes-3-mistral-24b-preview", "nousresearch/deephermes-3-mistral-24b-preview:free", "DeepHermes 3 Mistral 24B Preview"),
    ("phi-4-reasoning-plus", "microsoft/phi-4-reasoning-plus:free", "Phi-4 Reasoning Plus"),
    ("phi-4-reasoning", "microsoft/phi-4-reasoning:free", "Phi-4 Reasoning"),
    ("internvl3-14b", "opengvlab/internvl3-14b:free", "InternVL3 14B"),
    ("internvl3-2b", "opengvlab/internvl3-2b:free", "InternVL3 2B"),
    ("deepseek-prover-v2", "deepseek/deepseek-prover-v2:free", "DeepSeek Prover V2"),
    ("qwen3-30b-a3b", "qwen/qwen3-30b-a3b:free", "Qwen3 30B A3B"),
    ("qwen3-8b", "qwen/qwen3-8b:free", "Qwen3 8B"),
    ("qwen3-14b", "qwen/qwen3-14b:free", "Qwen3 14B"),
    ("qwen3-32b", "qwen/qwen3-32b:free", "Qwen3 32B"),
    ("qwen3-235b-a22b", "qwen/qwen3-235b-a22b:free", "Qwen3 235B A22B"),
    ("deepseek-r1t-chimera", "tngtech/deepseek-r1t-chimera:free", "DeepSeek R1T Chimera"),
    ("mai-ds-r1", "microsoft/mai-ds-r1:free", "MAI DS R1"),
    ("glm-z1-32b", "thudm/glm-z1-32b:free", "GLM Z1 32B"),
    ("glm-4-32b", "thudm/glm-4-32b:free", "GLM 4 32B"),
    ("shisa-v2-llama3.3-70b", "shisa-ai/shisa-v2-llama3.3-70b:free", "Shisa V2 Llama3.3 70B"),
    ("qwq-32b-arliai-rpr-v1", "arliai/qwq-32b-arliai-rpr-v1:free", "QwQ 32B ArliAI RPR V1"),
    ("deepcoder-14b-preview", "agentica-org/deepcoder-14b-preview:free", "DeepCoder 14B Preview"),
    ("kimi-vl-a3b-thinking", "moonshotai/kimi-vl-a3b-thinking:free", "Kimi VL A3B Thinking"),
    ("llama-3.3-nemotron-super-49b-v1", "nvidia/llama-3.3-nemotron-super-49b-v1:free", "Llama 3.3 Nemotron Super 49B V1"),
    ("llama-3.1-nemotron-ultra-253b-v1", "nvidia/llama-3.1-nemotron-ultra-253b-v1:free", "Llama 3.1 Nemotron Ultra 253B V1"),
    ("llama-4-maverick", "meta-llama/llama-4-maverick:free", "Llama 4 Maverick"),
    ("llama-4-scout", "meta-llama/llama-4-scout:free", "Llama 4 Scout"),
    ("deepseek-v3-base", "deepseek/deepseek-v3-base:free", "DeepSeek V3 Base"),
    ("qwen2.5-vl-3b-instruct", "qwen/qwen2.5-vl-3b-instruct:free", "Qwen2.5 VL 3B Instruct"),
    ("gemini-2.5-pro-exp", "google/gemini-2.5-pro-exp-03-25", "Gemini 2.5 Pro Exp"),
    ("qwen2.5-vl-32b-instruct", "qwen/qwen2.5-vl-32b-instruct:free", "Qwen2.5 VL 32B Instruct"),
    ("deepseek-chat-v3-0324", "deepseek/deepseek-chat-v3-0324:free", "DeepSeek Chat V3 0324"),
    ("qwerky-72b", "featherless/qwerky-72b:free", "Qwerky 72B"),
    ("mistral-small-3.1-24b", "mistralai/mistral-small-3.1-24b-instruct:free", "Mistral Small 3.1 24B"),
    ("olympiccoder-32b", "open-r1/olympiccoder-32b:free", "OlympicCoder 32B"),
    ("gemma-3-1b", "google/gemma-3-1b-it:free", "Gemma 3 1B"),
    ("gemma-3-4b", "google/gemma-3-4b-it:free", "Gemma 3 4B"),
    ("gemma-3-12b", "google/gemma-3-12b-it:free", "Gemma 3 12B"),
    ("reka-flash-3", "rekaai/reka-flash-3:free", "Reka Flash 3"),
    ("gemma-3-27b", "google/gemma-3-27b-it:free", "Gemma 3 27B"),
    ("deepseek-r1-zero", "deepseek/deepseek-r1-zero:free", "DeepSeek R1 Zero"),
    ("qwq-32b", "qwen/qwq-32b:free", "QwQ 32B"),
    ("moonlight-16b-a3b-instruct", "moonshotai/moonlight-16b-a3b-instruct:free", "Moonlight 16B A3B Instruct"),
    ("deephermes-3-llama-3-8b-preview", "nousresearch/deephermes-3-llama-3-8b-preview:free", "DeepHermes 3 Llama 3 8B Preview"),
    ("dolphin3.0-r1-mistral-24b", "cognitivecomputations/dolphin3.0-r1-mistral-24b:free", "Dolphin3.0 R1 Mistral 24B"),
    ("dolphin3.0-mistral-24b", "cognitivecomputations/dolphin3.0-mistral-24b:free", "Dolphin3.0 Mistral 24B"),
    ("qwen2.5-vl-72b-instruct", "qwen/qwen2.5-vl-72b-instruct:free", "Qwen2.5 VL 72B Instruct"),
    ("mistral-small-24b-instruct", "mistralai/mistral-small-24b-instruct-2501:free", "Mistral Small 24B Instruct"),
    ("deepseek-r1-distill-qwen-32b", "deepseek/deepseek-r1-distill-qwen-32b:free", "DeepSeek R1 Distill Qwen 32B"),
    ("deepseek-r1-distill-qwen-14b", "deepseek/deepseek-r1-distill-qwen-14b:free", "DeepSeek R1 Distill Qwen 14B"),
    ("deepseek-r1-distill-llama-70b", "deepseek/deepseek-r1-distill-llama-70b:free", "DeepSeek R1 Distill Llama 70B"),
    ("deepseek-r1", "deepseek/deepseek-r1:free", "DeepSeek R1"),
    ("deepseek-chat", "deepseek/deepseek-chat:free", "DeepSeek V3 Chat"),
    ("gemini-2.0-flash-exp", "google/gemini-2.0-flash-exp:free", "Gemini 2.0 Flash Exp"),
    ("llama-3.3-70b-instruct", "meta-llama/llama-3.3-70b-instruct:free", "Llama 3.3 70B Instruct"),
    ("qwen-2.5-coder-32b-instruct", "qwen/qwen-2.5-coder-32b-instruct:free", "Qwen 2.5 Coder 32B Instruct"),
    ("qwen-2.5-7b-instruct", "qwen/qwen-2.5-7b-instruct:free", "Qwen 2.5 7B Instruct"),
    ("llama-3.2-3b-instruct", "meta-llama/llama-3.2-3b-instruct:free", "Llama 3.2 3B Instruct"),
    ("llama-3.2-11b-vision-instruct", "meta-llama/llama-3.2-11b-vision-instruct:free", "Llama 3.2 11B Vision Instruct"),
    ("llama-3.2-1b-instruct", "meta-llama/llama-3.2-1b-instruct:free", "Llama 3.2 1B Instruct"),
    ("qwen-2.5-72b-instruct", "qwen/qwen-2.5-72b-instruct:free", "Qwen 2.5 72B Instruct"),
    ("qwen-2.5-vl-7b-instruct", "qwen/qwen-2.5-vl-7b-instruct:free", "Qwen 2.5 VL 7B Instruct"),
    ("llama-3.1-405b", "meta-llama/llama-3.1-405b:free", "Llama 3.1 405B"),
    ("llama-3.1-8b-instruct", "meta-llama/llama-3.1-8b-instruct:free", "Llama 3.1 8B Instruct"),
    ("mistral-nemo", "mistralai/mistral-nemo:free", "Mistral Nemo"),
    ("gemma-2-9b", "google/gemma-2-9b-it:free", "Gemma 2 9B"),
    ("mistral-7b-instruct", "mistralai/mistral-7b-instruct:free", "Mistral 7B Instruct"),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_and_fallback() {
        let catalog = ModelCatalog::new();
        assert_eq!(catalog.resolve("gpt").slug, "openai/gpt-3.5-turbo");
        assert_eq!(catalog.resolve("no-such-model").slug, "anthropic/claude-3-haiku:beta");
        assert_eq!(catalog.resolve("").id, FALLBACK_MODEL);
        assert_eq!(catalog.list()[0].id, FALLBACK_MODEL);
    }

    #[test]
    fn test_full_catalog() {
        let catalog = ModelCatalog::new();
        assert_eq!(catalog.list().len(), 72);
        assert_eq!(catalog.resolve("gemini-2.5-pro-exp").slug, "google/gemini-2.5-pro-exp-03-25");
        assert_eq!(catalog.resolve("qwq-32b").slug, "qwen/qwq-32b:free");

        let mut ids: Vec<_> = catalog.list().iter().map(|m| m.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 72);
    }

    #[test]
    fn test_require_rejects_unknown_ids() {
        let catalog = ModelCatalog::new();
        assert_eq!(catalog.require("mistral-nemo").unwrap().slug, "mistralai/mistral-nemo:free");
        let err = catalog.require("gpt-9").unwrap_err();
        assert!(matches!(err, AtsMatchError::InvalidInput(_)));
        assert!(err.to_string().contains("gpt-9"));
    }
}
