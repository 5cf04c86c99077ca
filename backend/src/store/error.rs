//! Error types for loading and serving dashboard data.

use std::fmt;

/// Result type for dashboard operations
pub type DashboardResult<T> = Result<T, DashboardError>;

/// Structured context for dashboard errors.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// The operation being performed (e.g., "load_tables", "render_page")
    pub operation: Option<String>,
    /// The table or entity involved (e.g., "usage", "session")
    pub entity: Option<String>,
    /// The entity ID or file path if applicable
    pub entity_id: Option<String>,
    /// Additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: Some(operation.into()),
            ..Default::default()
        }
    }

    pub fn with_entity(mut self, entity: impl Into<String>) -> Self {
        self.entity = Some(entity.into());
        self
    }

    pub fn with_entity_id(mut self, id: impl ToString) -> Self {
        self.entity_id = Some(id.to_string());
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if let Some(ref op) = self.operation {
            parts.push(format!("operation={}", op));
        }
        if let Some(ref entity) = self.entity {
            parts.push(format!("entity={}", entity));
        }
        if let Some(ref id) = self.entity_id {
            parts.push(format!("id={}", id));
        }
        if let Some(ref details) = self.details {
            parts.push(format!("details={}", details));
        }
        write!(f, "[{}]", parts.join(", "))
    }
}

/// Error type for dashboard operations
#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    /// An input table could not be read. The session cannot render.
    #[error("Load error: {message} {context}")]
    Load {
        message: String,
        context: ErrorContext,
    },

    /// Requested session, page or file was not found.
    #[error("Not found: {message} {context}")]
    NotFound {
        message: String,
        context: ErrorContext,
    },

    /// A widget value could not be interpreted.
    #[error("Invalid input: {message} {context}")]
    InvalidInput {
        message: String,
        context: ErrorContext,
    },

    /// Configuration file missing, unreadable or inconsistent.
    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

impl DashboardError {
    pub fn load(message: impl Into<String>, context: ErrorContext) -> Self {
        Self::Load {
            message: message.into(),
            context,
        }
    }

    pub fn not_found(message: impl Into<String>, context: ErrorContext) -> Self {
        Self::NotFound {
            message: message.into(),
            context,
        }
    }

    pub fn invalid_input(message: impl Into<String>, context: ErrorContext) -> Self {
        Self::InvalidInput {
            message: message.into(),
            context,
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Context attached to this error, if any.
    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            Self::Load { context, .. }
            | Self::NotFound { context, .. }
            | Self::InvalidInput { context, .. } => Some(context),
            Self::Configuration { .. } => None,
        }
    }
}
