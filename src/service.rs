//! Task execution — turns one JSON request into one JSON result envelope.
//!
//! Two entry points mirror the two request shapes:
//!
//! | Function                    | Pipeline                                 |
//! |-----------------------------|------------------------------------------|
//! | [`execute_nlp_task`]        | one persona picked by `task_type`        |
//! | [`execute_multi_agent_task`]| researcher → analyst → writer            |
//!
//! Both take the raw request value rather than a typed [`TaskConfig`] so that
//! badly typed fields still produce a failure envelope carrying whatever
//! `task_type` can be recovered.

use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::agents::{
    Persona, create_agent, create_analyst_agent, create_researcher_agent, create_writer_agent,
};
use crate::config::Settings;
use crate::constants::{
    ANALYSIS_EXPECTED_OUTPUT, DEFAULT_MAX_TOKENS, DEFAULT_TASK_TYPE, DEFAULT_TEMPERATURE,
    MULTI_AGENT_TASK_TYPE, RESEARCH_EXPECTED_OUTPUT, SINGLE_TASK_EXPECTED_OUTPUT,
    UNKNOWN_TASK_TYPE, WRITING_EXPECTED_OUTPUT,
};
use crate::crew::{Crew, Task};
use crate::dispatch::dispatch;
use crate::error::{CrewError, Result};
use crate::llm::{ChatModel, GroqClient, LlmConfig, TokenUsage, normalize_temperature};
use crate::util::is_truthy;

// ── Request ──────────────────────────────────────────────────────────

/// One request, as sent on the command line.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct TaskConfig {
    /// Echoed back as given; `null` and numbers are allowed.
    #[serde(default = "default_task_type")]
    pub task_type: Value,
    #[serde(default, deserialize_with = "stringish")]
    pub input_data: String,
    /// 0–100 scale.
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    /// Accepted for compatibility; the request cap is fixed.
    #[serde(default = "default_max_tokens", deserialize_with = "lenient_max_tokens")]
    pub max_tokens: u32,
    #[serde(default, deserialize_with = "truthy")]
    pub multi_agent: bool,
}

fn default_task_type() -> Value {
    Value::from(DEFAULT_TASK_TYPE)
}

fn default_temperature() -> f64 {
    DEFAULT_TEMPERATURE
}

fn default_max_tokens() -> u32 {
    DEFAULT_MAX_TOKENS
}

fn stringish<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<String, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    })
}

/// Any positive number that fits a `u32` (fractions truncated); everything else
/// falls back to the default.
fn lenient_max_tokens<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<u32, D::Error> {
    let value = Value::deserialize(deserializer)?;
    let tokens = value
        .as_f64()
        .filter(|n| n.is_finite() && *n >= 1.0 && *n <= f64::from(u32::MAX))
        .map_or(DEFAULT_MAX_TOKENS, |n| n as u32);
    Ok(tokens)
}

fn truthy<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<bool, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(is_truthy(Some(&value)))
}

impl TaskConfig {
    pub fn from_value(raw: &Value) -> Result<Self> {
        TaskConfig::deserialize(raw)
            .map_err(|err| CrewError::Config(format!("invalid task configuration: {err}")))
    }
}

/// Parse the command-line argument. Anything but a JSON object is rejected.
pub fn parse_request(arg: &str) -> Result<Value> {
    let value: Value = serde_json::from_str(arg)
        .map_err(|err| CrewError::Config(format!("invalid configuration: {err}")))?;
    if !value.is_object() {
        return Err(CrewError::Config(
            "invalid configuration: expected a JSON object".to_string(),
        ));
    }
    Ok(value)
}

// ── Result envelope ──────────────────────────────────────────────────

/// The single JSON object printed for every request.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TaskResult {
    Single {
        success: bool,
        result: String,
        agent_type: String,
        task_type: Value,
        #[serde(skip_serializing_if = "Option::is_none")]
        token_usage: Option<TokenUsage>,
    },
    Multi {
        success: bool,
        result: String,
        agents_used: Vec<Persona>,
        task_type: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        token_usage: Option<TokenUsage>,
    },
    Failure {
        success: bool,
        error: String,
        task_type: Value,
        error_kind: String,
    },
}

impl TaskResult {
    pub fn failure(err: &CrewError, task_type: impl Into<Value>) -> Self {
        TaskResult::Failure {
            success: false,
            error: err.to_string(),
            task_type: task_type.into(),
            error_kind: err.kind().to_string(),
        }
    }

    pub fn is_success(&self) -> bool {
        match self {
            TaskResult::Single { success, .. }
            | TaskResult::Multi { success, .. }
            | TaskResult::Failure { success, .. } => *success,
        }
    }
}

/// Failure envelope for a command-line argument that is not a JSON object.
pub fn invalid_request(err: &CrewError) -> TaskResult {
    TaskResult::failure(err, UNKNOWN_TASK_TYPE)
}

// ── Model construction ───────────────────────────────────────────────

/// Builds the model client for a run.
pub trait LlmFactory {
    type Model: ChatModel;

    fn build(&self, config: LlmConfig) -> Result<Arc<Self::Model>>;
}

/// Production factory: a fresh Groq client per run.
#[derive(Clone, Copy, Debug, Default)]
pub struct GroqFactory;

impl LlmFactory for GroqFactory {
    type Model = GroqClient;

    fn build(&self, config: LlmConfig) -> Result<Arc<GroqClient>> {
        Ok(Arc::new(GroqClient::new(config)?))
    }
}

// ── Execution ────────────────────────────────────────────────────────

/// Route a request to the single-task or the multi-agent pipeline.
pub async fn run<F: LlmFactory>(factory: &F, settings: &Settings, raw: &Value) -> TaskResult {
    if is_truthy(raw.get("multi_agent")) {
        execute_multi_agent_task(factory, settings, raw).await
    } else {
        execute_nlp_task(factory, settings, raw).await
    }
}

/// Run one persona against the request's input.
pub async fn execute_nlp_task<F: LlmFactory>(
    factory: &F,
    settings: &Settings,
    raw: &Value,
) -> TaskResult {
    match run_single(factory, settings, raw).await {
        Ok(result) => result,
        Err(err) => {
            warn!(kind = err.kind(), error = %err, "task failed");
            let task_type = raw
                .get("task_type")
                .cloned()
                .unwrap_or_else(|| Value::from(UNKNOWN_TASK_TYPE));
            TaskResult::failure(&err, task_type)
        }
    }
}

async fn run_single<F: LlmFactory>(
    factory: &F,
    settings: &Settings,
    raw: &Value,
) -> Result<TaskResult> {
    let config = TaskConfig::from_value(raw)?;
    let task_type = match &config.task_type {
        Value::String(name) => name.clone(),
        other => other.to_string(),
    };
    debug!(
        %task_type,
        max_tokens = config.max_tokens,
        multi_agent = config.multi_agent,
        "single task requested"
    );

    let temperature = normalize_temperature(config.temperature);
    let llm = factory.build(LlmConfig::from_settings(settings, temperature))?;

    let (persona, description) = dispatch(&task_type, &config.input_data);
    info!(%task_type, agent = persona.role(), temperature, "dispatching task");

    let agent = create_agent(persona, llm);
    let task = Task::new(description, SINGLE_TASK_EXPECTED_OUTPUT, persona);
    let crew = Crew::new(vec![agent], vec![task])?;
    let output = crew.kickoff().await?;

    Ok(TaskResult::Single {
        success: true,
        result: output.to_string(),
        agent_type: persona.role().to_string(),
        task_type: config.task_type,
        token_usage: output.token_usage,
    })
}

/// Run the fixed research → analysis → writing pipeline.
pub async fn execute_multi_agent_task<F: LlmFactory>(
    factory: &F,
    settings: &Settings,
    raw: &Value,
) -> TaskResult {
    match run_multi(factory, settings, raw).await {
        Ok(result) => result,
        Err(err) => {
            warn!(kind = err.kind(), error = %err, "multi-agent task failed");
            TaskResult::failure(&err, MULTI_AGENT_TASK_TYPE)
        }
    }
}

async fn run_multi<F: LlmFactory>(
    factory: &F,
    settings: &Settings,
    raw: &Value,
) -> Result<TaskResult> {
    let config = TaskConfig::from_value(raw)?;
    let temperature = normalize_temperature(config.temperature);
    let llm = factory.build(LlmConfig::from_settings(settings, temperature))?;

    let researcher = create_researcher_agent(Arc::clone(&llm));
    let analyst = create_analyst_agent(Arc::clone(&llm));
    let writer = create_writer_agent(llm);

    let tasks = vec![
        Task::new(
            format!("Research and gather information about: {}", config.input_data),
            RESEARCH_EXPECTED_OUTPUT,
            Persona::Researcher,
        ),
        Task::new(
            "Analyze the research findings and identify key insights and patterns",
            ANALYSIS_EXPECTED_OUTPUT,
            Persona::Analyst,
        ),
        Task::new(
            "Create a well-structured report based on the research and analysis",
            WRITING_EXPECTED_OUTPUT,
            Persona::Writer,
        ),
    ];
    info!(temperature, "dispatching multi-agent pipeline");

    let crew = Crew::new(vec![researcher, analyst, writer], tasks)?;
    let output = crew.kickoff().await?;
    debug!(steps = output.tasks_output.len(), "multi-agent pipeline finished");

    Ok(TaskResult::Multi {
        success: true,
        result: output.to_string(),
        agents_used: vec![Persona::Researcher, Persona::Analyst, Persona::Writer],
        task_type: MULTI_AGENT_TASK_TYPE.to_string(),
        token_usage: output.token_usage,
    })
}
