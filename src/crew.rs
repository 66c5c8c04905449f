//! Sequential crew execution.
//!
//! A [`Crew`] owns a set of agents and an ordered list of [`Task`]s. On
//! [`Crew::kickoff`] each task is sent to the agent holding its persona, with
//! every earlier output appended as context, so later steps build on what
//! came before. The first failure ends the run.

use std::fmt;

use tracing::{debug, info};

use crate::agents::{Agent, Persona};
use crate::constants::CONTEXT_SEPARATOR;
use crate::error::{CrewError, Result};
use crate::llm::{ChatMessage, ChatModel, TokenUsage};

/// One unit of work bound to a persona.
#[derive(Clone, Debug, PartialEq)]
pub struct Task {
    pub description: String,
    pub expected_output: String,
    pub persona: Persona,
}

impl Task {
    pub fn new(
        description: impl Into<String>,
        expected_output: impl Into<String>,
        persona: Persona,
    ) -> Self {
        Task {
            description: description.into(),
            expected_output: expected_output.into(),
            persona,
        }
    }

    /// Render the user message for this task, with earlier outputs as context.
    fn prompt(&self, context: &[TaskOutput]) -> String {
        let mut prompt = format!(
            "Current Task: {}\n\nThis is the expected criteria for your final answer: {}\n\
             you MUST return the actual complete content as the final answer, not a summary.",
            self.description, self.expected_output
        );
        if !context.is_empty() {
            let joined = context
                .iter()
                .map(|output| output.raw.as_str())
                .collect::<Vec<_>>()
                .join(CONTEXT_SEPARATOR);
            prompt.push_str("\n\nThis is the context you're working with:\n");
            prompt.push_str(&joined);
        }
        prompt.push_str("\n\nBegin! This is VERY important to you, give your best Final Answer, your job depends on it!");
        prompt
    }
}

/// How tasks are scheduled. Only sequential execution exists.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Process {
    #[default]
    Sequential,
}

/// Output of a single task.
#[derive(Clone, Debug, PartialEq)]
pub struct TaskOutput {
    pub persona: Persona,
    pub raw: String,
}

/// Output of a whole crew run.
#[derive(Clone, Debug, PartialEq)]
pub struct CrewOutput {
    /// Final task's answer.
    pub raw: String,
    pub tasks_output: Vec<TaskOutput>,
    pub token_usage: Option<TokenUsage>,
}

impl fmt::Display for CrewOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

pub struct Crew<M> {
    agents: Vec<Agent<M>>,
    tasks: Vec<Task>,
    process: Process,
}

impl<M: ChatModel> Crew<M> {
    /// Assemble a crew. Every task must have an agent with a matching persona.
    pub fn new(agents: Vec<Agent<M>>, tasks: Vec<Task>) -> Result<Self> {
        if tasks.is_empty() {
            return Err(CrewError::Internal("crew has no tasks".to_string()));
        }
        for task in &tasks {
            if !agents.iter().any(|agent| agent.persona == task.persona) {
                return Err(CrewError::Internal(format!(
                    "no agent for persona {} in crew",
                    task.persona.role()
                )));
            }
        }
        Ok(Crew {
            agents,
            tasks,
            process: Process::Sequential,
        })
    }

    pub fn process(&self) -> Process {
        self.process
    }

    fn agent_for(&self, persona: Persona) -> Result<&Agent<M>> {
        self.agents
            .iter()
            .find(|agent| agent.persona == persona)
            .ok_or_else(|| CrewError::Internal(format!("no agent for persona {persona}")))
    }

    /// Run every task in order and return the final output.
    pub async fn kickoff(&self) -> Result<CrewOutput> {
        info!(
            tasks = self.tasks.len(),
            agents = self.agents.len(),
            process = ?self.process(),
            "crew kickoff"
        );

        let mut outputs: Vec<TaskOutput> = Vec::with_capacity(self.tasks.len());
        let mut usage: Option<TokenUsage> = None;

        for (index, task) in self.tasks.iter().enumerate() {
            let agent = self.agent_for(task.persona)?;
            debug!(step = index + 1, role = agent.role(), "running task");

            let messages = [
                ChatMessage::system(agent.system_prompt()),
                ChatMessage::user(task.prompt(&outputs)),
            ];
            let completion = agent.llm().complete(&messages).await?;

            if let Some(step_usage) = completion.usage {
                usage.get_or_insert_with(TokenUsage::default).add(&step_usage);
            }
            let output = TaskOutput {
                persona: task.persona,
                raw: completion.content,
            };
            debug!(
                step = index + 1,
                role = output.persona.role(),
                chars = output.raw.len(),
                "task finished"
            );
            outputs.push(output);
        }

        let raw = outputs
            .last()
            .map(|output| output.raw.clone())
            .unwrap_or_default();
        info!(chars = raw.len(), "crew finished");

        Ok(CrewOutput {
            raw,
            tasks_output: outputs,
            token_usage: usage,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::agents::{create_analyst_agent, create_researcher_agent, create_writer_agent};
    use crate::llm::testing::ScriptedModel;

    #[test]
    fn test_empty_crew_is_rejected() {
        let llm = Arc::new(ScriptedModel::default());
        let result = Crew::new(vec![create_researcher_agent(llm)], Vec::new());
        assert!(matches!(result, Err(CrewError::Internal(_))));
    }

    #[test]
    fn test_task_without_agent_is_rejected() {
        let llm = Arc::new(ScriptedModel::default());
        let task = Task::new("write", "a report", Persona::Writer);
        let err = Crew::new(vec![create_researcher_agent(llm)], vec![task])
            .err()
            .unwrap();
        assert!(err.to_string().contains("Content Writer"));
    }

    #[test]
    fn test_first_prompt_has_no_context() {
        let task = Task::new("Do it", "Something good", Persona::Coder);
        let prompt = task.prompt(&[]);
        assert!(prompt.starts_with("Current Task: Do it\n\n"));
        assert!(prompt.contains("expected criteria for your final answer: Something good"));
        assert!(!prompt.contains("context you're working with"));
    }

    #[tokio::test]
    async fn test_single_task_kickoff() {
        let llm = Arc::new(ScriptedModel::replying(vec![ScriptedModel::text("done")]));
        let crew = Crew::new(
            vec![create_researcher_agent(Arc::clone(&llm))],
            vec![Task::new("look into it", "findings", Persona::Researcher)],
        )
        .unwrap();

        let output = crew.kickoff().await.unwrap();
        assert_eq!(output.to_string(), "done");
        assert_eq!(output.tasks_output.len(), 1);
        assert_eq!(output.token_usage.unwrap().total_tokens, 12);
        assert_eq!(crew.process(), Process::Sequential);

        let calls = llm.recorded();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0][0].role, "system");
        assert!(calls[0][0].content.starts_with("You are Research Analyst."));
        assert!(calls[0][1].content.contains("Current Task: look into it"));
    }

    #[tokio::test]
    async fn test_sequential_context_carries_forward() {
        let llm = Arc::new(ScriptedModel::replying(vec![
            ScriptedModel::text("facts"),
            ScriptedModel::text("insights"),
            ScriptedModel::text("report"),
        ]));
        let crew = Crew::new(
            vec![
                create_researcher_agent(Arc::clone(&llm)),
                create_analyst_agent(Arc::clone(&llm)),
                create_writer_agent(Arc::clone(&llm)),
            ],
            vec![
                Task::new("research", "facts", Persona::Researcher),
                Task::new("analyze", "insights", Persona::Analyst),
                Task::new("write", "report", Persona::Writer),
            ],
        )
        .unwrap();

        let output = crew.kickoff().await.unwrap();
        assert_eq!(output.raw, "report");
        assert_eq!(output.token_usage.unwrap().total_tokens, 36);

        let calls = llm.recorded();
        assert_eq!(calls.len(), 3);
        assert!(calls[1][0].content.starts_with("You are Data Analyst."));
        assert!(calls[1][1].content.contains("context you're working with:\nfacts"));
        assert!(calls[2][0].content.starts_with("You are Content Writer."));
        assert!(calls[2][1].content.contains("facts\n\n----------\n\ninsights"));
    }

    #[tokio::test]
    async fn test_failure_stops_the_run() {
        let llm = Arc::new(ScriptedModel::replying(vec![
            ScriptedModel::text("facts"),
            Err(CrewError::Upstream {
                status: 500,
                message: "boom".to_string(),
            }),
        ]));
        let crew = Crew::new(
            vec![
                create_researcher_agent(Arc::clone(&llm)),
                create_analyst_agent(Arc::clone(&llm)),
                create_writer_agent(Arc::clone(&llm)),
            ],
            vec![
                Task::new("research", "facts", Persona::Researcher),
                Task::new("analyze", "insights", Persona::Analyst),
                Task::new("write", "report", Persona::Writer),
            ],
        )
        .unwrap();

        let err = crew.kickoff().await.unwrap_err();
        assert_eq!(err.kind(), "upstream");
        assert_eq!(llm.recorded().len(), 2);
    }
}
