//! Prompt templates for each deliberation stage.

pub mod template;

pub use template::PromptTemplate;
