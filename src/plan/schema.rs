use crate::error::EngineError;
use crate::operation::EditSession;
use serde::Deserialize;
use std::fmt;

/// A plan file: one or more edit sessions described in TOML.
#[derive(Debug, Deserialize, Default, Clone)]
pub struct PlanConfig {
    #[serde(default)]
    pub meta: Metadata,
    #[serde(default)]
    pub sessions: Vec<SessionDefinition>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct Metadata {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SessionDefinition {
    /// Absolute path to the target file.
    pub file: String,
    pub edits: Vec<EditDefinition>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct EditDefinition {
    pub search: String,
    pub replacement: String,
    #[serde(default)]
    pub replace_all: bool,
}

impl PlanConfig {
    /// Structural plan checks. Operation-level rules (empty search, no-op
    /// replacement) live in the `EditOperation` constructor and are applied
    /// when the definitions become sessions.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut issues = Vec::new();

        if self.sessions.is_empty() {
            issues.push(ValidationIssue::EmptySessionList);
        }

        for (index, session) in self.sessions.iter().enumerate() {
            if session.file.trim().is_empty() {
                issues.push(ValidationIssue::MissingField {
                    session: index,
                    field: "file",
                });
            }
            if session.edits.is_empty() {
                issues.push(ValidationIssue::MissingField {
                    session: index,
                    field: "edits",
                });
            }
        }

        if issues.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { issues })
        }
    }
}

impl SessionDefinition {
    /// Convert into an engine session, running the full operation validator
    /// (fail-fast with the failing edit's index).
    pub fn into_session(self) -> Result<EditSession, EngineError> {
        EditSession::from_raw(
            &self.file,
            self.edits
                .into_iter()
                .map(|e| (e.search, e.replacement, e.replace_all)),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationIssue {
    EmptySessionList,
    MissingField { session: usize, field: &'static str },
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationIssue::EmptySessionList => write!(f, "plan has no sessions"),
            ValidationIssue::MissingField { session, field } => {
                write!(f, "session {session}: missing or empty field '{field}'")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub issues: Vec<ValidationIssue>,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self.issues.iter().map(|i| i.to_string()).collect();
        write!(f, "{}", rendered.join("; "))
    }
}

impl std::error::Error for ValidationError {}
