//! Static model catalog served to the front end.
//!
//! Mirrors what OpenRouter offers at the free tier plus a few paid presets.
//! Paid entries are only usable once an API key is configured; the handler
//! leaves that gating to the client, which knows whether a key is present.

use serde::Serialize;

use crate::analysis::dimensions::{Dimension, DIMENSIONS};
use crate::llm_client::{ModelParams, FALLBACK_MODELS};

#[derive(Debug, Clone, Serialize)]
pub struct ModelEntry {
    pub id: &'static str,
    pub label: &'static str,
}

pub const FREE_MODELS: [ModelEntry; 9] = [
    ModelEntry {
        id: "deepseek/deepseek-chat-v3-0324:free",
        label: "DeepSeek Chat V3",
    },
    ModelEntry {
        id: "deepseek/deepseek-r1-0528:free",
        label: "DeepSeek R1 (0528)",
    },
    ModelEntry {
        id: "deepseek/deepseek-r1:free",
        label: "DeepSeek R1",
    },
    ModelEntry {
        id: "deepseek/deepseek-r1-0528-qwen3-8b:free",
        label: "DeepSeek R1 Qwen3-8B",
    },
    ModelEntry {
        id: "qwen/qwen3-32b:free",
        label: "Qwen3-32B",
    },
    ModelEntry {
        id: "qwen/qwen3-235b-a22b:free",
        label: "Qwen3-235B-A22B",
    },
    ModelEntry {
        id: "qwen/qwen3-30b-a3b:free",
        label: "Qwen3-30B-A3B",
    },
    ModelEntry {
        id: "qwen/qwen3-8b:free",
        label: "Qwen3-8B",
    },
    ModelEntry {
        id: "google/gemini-2.0-flash-exp:free",
        label: "Gemini 2.0 Flash (experimental)",
    },
];

pub const PAID_MODELS: [ModelEntry; 4] = [
    ModelEntry {
        id: "anthropic/claude-3-5-sonnet",
        label: "Claude 3.5 Sonnet",
    },
    ModelEntry {
        id: "openai/gpt-4o",
        label: "GPT-4o",
    },
    ModelEntry {
        id: "openai/gpt-3.5-turbo",
        label: "GPT-3.5 Turbo",
    },
    ModelEntry {
        id: "google/gemini-pro",
        label: "Gemini Pro",
    },
];

/// Everything the front end needs to render model selection and score charts.
#[derive(Debug, Serialize)]
pub struct ModelCatalog {
    pub default_params: ModelParams,
    pub free: Vec<ModelEntry>,
    pub paid: Vec<ModelEntry>,
    pub fallback_chain: Vec<&'static str>,
    pub dimensions: Vec<Dimension>,
}

pub fn model_catalog() -> ModelCatalog {
    ModelCatalog {
        default_params: ModelParams::default(),
        free: FREE_MODELS.to_vec(),
        paid: PAID_MODELS.to_vec(),
        fallback_chain: FALLBACK_MODELS.to_vec(),
        dimensions: DIMENSIONS.to_vec(),
    }
}
