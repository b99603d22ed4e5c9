/*
    Types:
    * AssistantError - Typed failure kinds surfaced at the session boundary

    Everything in the crate returns `anyhow::Result`. Code that needs to tell failure
    kinds apart downcasts to `AssistantError` at the boundary (see `session.rs`).
*/

#[derive(Debug, thiserror::Error)]
pub enum AssistantError {
    /// Bad argument count, unknown command, unknown field key, failed coercion.
    #[error("{0}")]
    InvalidCommand(String),
    /// A validator rejected a value after coercion.
    #[error("{0}")]
    InvalidData(String),
    #[error("{0}")]
    NotFound(String),
    /// Caller bug, never caused by user input. Fatal.
    #[error("programming error: {0}")]
    Programming(String),
    #[error("input stream closed")]
    InputClosed,
}

impl AssistantError {
    pub fn invalid_command(message: impl Into<String>) -> anyhow::Error {
        Self::InvalidCommand(message.into()).into()
    }

    pub fn invalid_data(message: impl Into<String>) -> anyhow::Error {
        Self::InvalidData(message.into()).into()
    }

    pub fn not_found(message: impl Into<String>) -> anyhow::Error {
        Self::NotFound(message.into()).into()
    }

    pub fn programming(message: impl Into<String>) -> anyhow::Error {
        Self::Programming(message.into()).into()
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::InvalidCommand(_) => "Invalid Command",
            Self::InvalidData(_) => "Invalid Data",
            Self::NotFound(_) => "Not Found",
            Self::Programming(_) => "Programming Error",
            Self::InputClosed => "Input Closed",
        }
    }

    /// Recoverable errors are rendered and the session moves on to the next queue item.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::InvalidCommand(_) | Self::InvalidData(_) | Self::NotFound(_)
        )
    }

    /// Finds the first `AssistantError` in an anyhow chain.
    pub fn find(err: &anyhow::Error) -> Option<&AssistantError> {
        err.chain().find_map(|cause| cause.downcast_ref::<AssistantError>())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_sees_through_context() {
        use anyhow::Context as _;
        let err: anyhow::Result<()> =
            Err(AssistantError::invalid_data("bad phone")).context("while adding contact");
        let err = err.unwrap_err();
        let found = AssistantError::find(&err).expect("typed error in chain");
        assert_eq!(found.title(), "Invalid Data");
        assert!(found.is_recoverable());
    }

    #[test]
    fn test_programming_errors_are_fatal() {
        let err = AssistantError::programming("filter mode is not specified");
        let found = AssistantError::find(&err).unwrap();
        assert!(!found.is_recoverable());
        assert_eq!(
            err.to_string(),
            "programming error: filter mode is not specified"
        );
    }
}
