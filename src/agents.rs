//! Agent definitions — the five fixed personas that shape how the LLM responds.
//!
//! A [`Persona`] is a closed set of role/goal/backstory bundles. An [`Agent`]
//! binds one persona to a shared model handle so several agents in the same
//! crew talk to the same client.

use std::fmt;
use std::sync::Arc;

use serde::{Serialize, Serializer};

use crate::llm::ChatModel;

/// The fixed personas available to a crew.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Persona {
    Researcher,
    Writer,
    Analyst,
    Summarizer,
    Coder,
}

impl Persona {
    /// Short lowercase identifier (e.g. "researcher").
    pub fn key(self) -> &'static str {
        match self {
            Persona::Researcher => "researcher",
            Persona::Writer => "writer",
            Persona::Analyst => "analyst",
            Persona::Summarizer => "summarizer",
            Persona::Coder => "coder",
        }
    }

    /// Job title presented to the model and echoed back as `agent_type`.
    pub fn role(self) -> &'static str {
        match self {
            Persona::Researcher => "Research Analyst",
            Persona::Writer => "Content Writer",
            Persona::Analyst => "Data Analyst",
            Persona::Summarizer => "Content Summarizer",
            Persona::Coder => "Software Developer",
        }
    }

    pub fn goal(self) -> &'static str {
        match self {
            Persona::Researcher => {
                "Conduct thorough research and gather comprehensive information on given topics"
            }
            Persona::Writer => {
                "Create engaging, well-structured content based on research and analysis"
            }
            Persona::Analyst => "Analyze data, identify trends, and provide actionable insights",
            Persona::Summarizer => "Distill complex information into concise, accurate summaries",
            Persona::Coder => "Generate clean, efficient, and well-documented code",
        }
    }

    pub fn backstory(self) -> &'static str {
        match self {
            Persona::Researcher => {
                "You are an expert research analyst with years of experience in \
                 information gathering and analysis. You excel at finding relevant data, \
                 identifying patterns, and synthesizing complex information into clear insights."
            }
            Persona::Writer => {
                "You are a professional content writer with expertise in crafting \
                 compelling narratives. You transform complex information into clear, engaging \
                 content that resonates with the target audience."
            }
            Persona::Analyst => {
                "You are a skilled data analyst with expertise in statistical \
                 analysis and pattern recognition. You excel at extracting meaningful insights \
                 from complex datasets and presenting them clearly."
            }
            Persona::Summarizer => {
                "You are an expert at condensing large volumes of information \
                 into clear, concise summaries. You identify key points and present them in \
                 an easily digestible format without losing critical details."
            }
            Persona::Coder => {
                "You are an experienced software developer with expertise in \
                 multiple programming languages. You write clean, maintainable code following \
                 best practices and industry standards."
            }
        }
    }
}

impl fmt::Display for Persona {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.role())
    }
}

impl Serialize for Persona {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.key())
    }
}

/// A persona bound to the model that speaks for it.
pub struct Agent<M> {
    pub persona: Persona,
    llm: Arc<M>,
}

// Manual impl: `M` itself need not be `Clone` behind the `Arc`.
impl<M> Clone for Agent<M> {
    fn clone(&self) -> Self {
        Agent {
            persona: self.persona,
            llm: Arc::clone(&self.llm),
        }
    }
}

impl<M: ChatModel> Agent<M> {
    pub fn new(persona: Persona, llm: Arc<M>) -> Self {
        Agent { persona, llm }
    }

    pub fn role(&self) -> &'static str {
        self.persona.role()
    }

    pub fn llm(&self) -> &M {
        &self.llm
    }

    /// The system prompt injected ahead of every task this agent performs.
    pub fn system_prompt(&self) -> String {
        format!(
            "You are {}. {}\nYour personal goal is: {}",
            self.persona.role(),
            self.persona.backstory(),
            self.persona.goal()
        )
    }
}

/// Build the agent for `persona` through its factory.
pub fn create_agent<M: ChatModel>(persona: Persona, llm: Arc<M>) -> Agent<M> {
    match persona {
        Persona::Researcher => create_researcher_agent(llm),
        Persona::Writer => create_writer_agent(llm),
        Persona::Analyst => create_analyst_agent(llm),
        Persona::Summarizer => create_summarizer_agent(llm),
        Persona::Coder => create_coder_agent(llm),
    }
}

pub fn create_researcher_agent<M: ChatModel>(llm: Arc<M>) -> Agent<M> {
    Agent::new(Persona::Researcher, llm)
}

pub fn create_writer_agent<M: ChatModel>(llm: Arc<M>) -> Agent<M> {
    Agent::new(Persona::Writer, llm)
}

pub fn create_analyst_agent<M: ChatModel>(llm: Arc<M>) -> Agent<M> {
    Agent::new(Persona::Analyst, llm)
}

pub fn create_summarizer_agent<M: ChatModel>(llm: Arc<M>) -> Agent<M> {
    Agent::new(Persona::Summarizer, llm)
}

pub fn create_coder_agent<M: ChatModel>(llm: Arc<M>) -> Agent<M> {
    Agent::new(Persona::Coder, llm)
}
