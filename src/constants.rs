//! Compile-time constants and tunables shared across the crate.

/// Application name used for the log filter variable and user agent.
pub const APP_NAME: &str = "agent-crew";
/// Application version injected from `Cargo.toml` at compile time.
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// ── Environment ──────────────────────────────────────────────────────

/// Required credential for the hosted model.
pub const GROQ_API_KEY_VAR: &str = "GROQ_API_KEY";
/// Optional model override.
pub const GROQ_MODEL_VAR: &str = "GROQ_MODEL";
/// Optional base URL override (useful for proxies and tests).
pub const GROQ_BASE_URL_VAR: &str = "GROQ_BASE_URL";
/// Optional request timeout override, in seconds.
pub const TIMEOUT_VAR: &str = "AGENT_CREW_TIMEOUT_SECS";
/// Log filter directive (`tracing_subscriber::EnvFilter` syntax).
pub const LOG_FILTER_VAR: &str = "AGENT_CREW_LOG";
/// Secondary provider credential the caller may pass along.
pub const OPENAI_API_KEY_VAR: &str = "OPENAI_API_KEY";
/// Placeholder recorded when `OPENAI_API_KEY` is absent.
pub const OPENAI_KEY_PLACEHOLDER: &str = "dummy-key-to-disable-openai";

// ── Model ────────────────────────────────────────────────────────────

/// Default hosted model.
pub const DEFAULT_MODEL: &str = "openai/gpt-oss-120b";
/// Groq's OpenAI-compatible API base URL.
pub const DEFAULT_GROQ_BASE_URL: &str = "https://api.groq.com/openai/v1";
/// Temperature on the 0–100 scale used when the caller omits it.
pub const DEFAULT_TEMPERATURE: f64 = 70.0;
/// Completion token cap sent with every request.
pub const DEFAULT_MAX_TOKENS: u32 = 8192;
/// HTTP request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

// ── Pipeline ─────────────────────────────────────────────────────────

/// Expected output for a single-task run.
pub const SINGLE_TASK_EXPECTED_OUTPUT: &str = "A comprehensive and well-structured response";
pub const RESEARCH_EXPECTED_OUTPUT: &str = "Comprehensive research findings with key facts and data";
pub const ANALYSIS_EXPECTED_OUTPUT: &str = "Detailed analysis with actionable insights";
pub const WRITING_EXPECTED_OUTPUT: &str =
    "Professional report with clear structure and engaging content";

/// Task type reported for every multi-agent run.
pub const MULTI_AGENT_TASK_TYPE: &str = "multi_agent";
/// Task type echoed when a single-task request omits one.
pub const DEFAULT_TASK_TYPE: &str = "custom";
/// Task type reported on failure when none can be recovered from the input.
pub const UNKNOWN_TASK_TYPE: &str = "unknown";

/// Separator placed between earlier step outputs when they are handed on as context.
pub const CONTEXT_SEPARATOR: &str = "\n\n----------\n\n";

/// Message printed when the binary runs without an argument.
pub const NO_CONFIG_MESSAGE: &str = "No configuration provided";
