//! Fixed catalogs copied onto every new account at registration.
//!
//! Registration inserts one row per entry, all inside the registration
//! transaction, so a new user always starts with the same assistant modes
//! and provider slots.

/// Seed entry for an assistant mode
pub struct AssistantModeSeed {
    pub name: &'static str,
    pub description: &'static str,
    pub system_prompt: &'static str,
}

/// Seed entry for an LLM provider slot
pub struct LlmProviderSeed {
    pub provider_id: &'static str,
    pub name: &'static str,
    pub api_url: &'static str,
    pub rank: i32,
}

/// Assistant modes every new user starts with
pub const ASSISTANT_MODES: &[AssistantModeSeed] = &[
    AssistantModeSeed {
        name: "General Health Assistant",
        description: "Day-to-day health questions grounded in your records",
        system_prompt: "You are a careful health assistant. Use the user's \
            health data sources when they are relevant, cite which record you \
            relied on, and recommend seeing a clinician for anything urgent.",
    },
    AssistantModeSeed {
        name: "Nutrition Coach",
        description: "Meal planning and dietary guidance",
        system_prompt: "You are a nutrition coach. Tailor suggestions to the \
            user's health data sources (allergies, lab results, goals) and \
            keep advice practical and specific.",
    },
    AssistantModeSeed {
        name: "Sleep Advisor",
        description: "Sleep hygiene and routine improvement",
        system_prompt: "You help the user improve sleep quality. Look for \
            sleep-related entries in their health data sources and suggest \
            small, measurable routine changes.",
    },
    AssistantModeSeed {
        name: "Fitness Planner",
        description: "Exercise programming around your constraints",
        system_prompt: "You plan workouts. Respect injuries and conditions \
            present in the user's health data sources and scale intensity \
            gradually.",
    },
];

/// Provider slots every new user starts with, in listing order
pub const LLM_PROVIDERS: &[LlmProviderSeed] = &[
    LlmProviderSeed {
        provider_id: "google",
        name: "Google",
        api_url: "https://generativelanguage.googleapis.com",
        rank: 1,
    },
    LlmProviderSeed {
        provider_id: "openai",
        name: "OpenAI",
        api_url: "https://api.openai.com/v1",
        rank: 2,
    },
    LlmProviderSeed {
        provider_id: "anthropic",
        name: "Anthropic",
        api_url: "https://api.anthropic.com",
        rank: 3,
    },
    LlmProviderSeed {
        provider_id: "ollama",
        name: "Ollama",
        api_url: "http://localhost:11434",
        rank: 4,
    },
];

/// Provider excluded from hosted (cloud) deployments
pub const LOCAL_ONLY_PROVIDER_ID: &str = "ollama";
