//! Task value object

use serde::{Deserialize, Serialize};

/// The question put before the council (Value Object)
///
/// Free-form text supplied once per deliberation; every role answers it and
/// every judge sees it when comparing answers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    text: String,
}

impl Task {
    /// Create a new task.
    ///
    /// # Panics
    /// Panics if the text is empty or only whitespace.
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        assert!(!text.trim().is_empty(), "Task cannot be empty");
        Self { text }
    }

    /// Try to create a new task, returning `None` if invalid.
    pub fn try_new(text: impl Into<String>) -> Option<Self> {
        let text = text.into();
        if text.trim().is_empty() {
            None
        } else {
            Some(Self { text })
        }
    }

    /// Get the task text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Consume and return the inner text.
    pub fn into_text(self) -> String {
        self.text
    }
}

impl std::fmt::Display for Task {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.text)
    }
}

impl From<&str> for Task {
    fn from(s: &str) -> Self {
        Task::new(s)
    }
}

impl From<String> for Task {
    fn from(s: String) -> Self {
        Task::new(s)
    }
}
