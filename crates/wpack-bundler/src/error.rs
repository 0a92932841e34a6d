//! Build outcome errors.

/// Terminal failures of a [`run`](crate::Orchestrator::run) call.
///
/// Neither kind is retried. `Invocation` means the engine never produced a
/// report; `Result` means it did and the report signals errors, which have
/// already been written to the report sink.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// The engine could not attempt the build.
    #[error("Compilation invocation error: {message}")]
    Invocation { message: String },

    /// The engine finished and reported compilation errors.
    #[error("Compilation error, see stats above")]
    Result,
}

/// Result type alias for orchestrator operations.
pub type Result<T> = std::result::Result<T, BuildError>;

impl BuildError {
    /// Wrap an engine failure, keeping its full cause chain in the message.
    pub fn invocation(err: &anyhow::Error) -> Self {
        BuildError::Invocation {
            message: format!("{err:#}"),
        }
    }

    pub fn is_invocation(&self) -> bool {
        matches!(self, BuildError::Invocation { .. })
    }

    pub fn is_result(&self) -> bool {
        matches!(self, BuildError::Result)
    }
}

impl miette::Diagnostic for BuildError {
    fn code(&self) -> Option<Box<dyn std::fmt::Display + '_>> {
        Some(Box::new(match self {
            BuildError::Invocation { .. } => "COMPILATION_INVOCATION_ERROR",
            BuildError::Result => "COMPILATION_RESULT_ERROR",
        }))
    }

    fn severity(&self) -> Option<miette::Severity> {
        Some(miette::Severity::Error)
    }

    fn help(&self) -> Option<Box<dyn std::fmt::Display + '_>> {
        match self {
            BuildError::Invocation { .. } => Some(Box::new(
                "The bundler could not start. Check the entry map and output path of the configuration.",
            )),
            BuildError::Result => Some(Box::new(
                "Fix the errors listed in the build report and run the build again.",
            )),
        }
    }
}
