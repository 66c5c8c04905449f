//! Task-type dispatch: which persona handles a request and how its input is framed.

use std::fmt;

use crate::agents::Persona;

/// Recognised task categories. Anything else is carried verbatim as `Custom`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TaskType {
    Summarization,
    Analysis,
    Research,
    ContentGeneration,
    CodeGeneration,
    Custom(String),
}

impl TaskType {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "summarization" => TaskType::Summarization,
            "analysis" => TaskType::Analysis,
            "research" => TaskType::Research,
            "content_generation" => TaskType::ContentGeneration,
            "code_generation" => TaskType::CodeGeneration,
            other => TaskType::Custom(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            TaskType::Summarization => "summarization",
            TaskType::Analysis => "analysis",
            TaskType::Research => "research",
            TaskType::ContentGeneration => "content_generation",
            TaskType::CodeGeneration => "code_generation",
            TaskType::Custom(raw) => raw,
        }
    }

    /// Persona that handles this task type.
    pub fn persona(&self) -> Persona {
        match self {
            TaskType::Summarization => Persona::Summarizer,
            TaskType::Analysis => Persona::Analyst,
            TaskType::Research => Persona::Researcher,
            TaskType::ContentGeneration => Persona::Writer,
            TaskType::CodeGeneration => Persona::Coder,
            TaskType::Custom(_) => Persona::Researcher,
        }
    }

    /// Frame the caller's input as a task description.
    pub fn describe(&self, input: &str) -> String {
        match self {
            TaskType::Summarization => format!("Summarize the following content:\n\n{input}"),
            TaskType::Analysis => {
                format!("Analyze the following data and provide insights:\n\n{input}")
            }
            TaskType::Research => {
                format!("Research and provide comprehensive information about:\n\n{input}")
            }
            TaskType::ContentGeneration => format!("Create engaging content based on:\n\n{input}"),
            TaskType::CodeGeneration => format!("Generate code for:\n\n{input}"),
            TaskType::Custom(_) => input.to_string(),
        }
    }
}

impl fmt::Display for TaskType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolve a task-type string to its persona and task description. Total: never fails.
pub fn dispatch(task_type: &str, input: &str) -> (Persona, String) {
    let task_type = TaskType::parse(task_type);
    (task_type.persona(), task_type.describe(input))
}
