//! Driver error taxonomy

/// Errors returned by P760 operations
///
/// `E` is the transport's error type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// No device address has been resolved
    NotConnected,
    /// No candidate address acknowledged
    NotFound,
    /// A read of zero bytes was requested
    InvalidLength,
    /// The transport reported a nonzero status
    Transport(E),
    /// Fewer bytes became available than were requested
    ShortRead {
        /// Bytes requested
        expected: usize,
        /// Bytes the transport reported available
        available: usize,
    },
    /// A byte read returned no data although the full count was reported available
    StreamExhausted {
        /// Position of the missing byte
        index: usize,
    },
}

impl<E> Error<E> {
    /// Whether the failure came from the transport itself
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Transport(_))
    }
}

impl<E> From<E> for Error<E> {
    fn from(e: E) -> Self {
        Error::Transport(e)
    }
}
