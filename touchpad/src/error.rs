use core::fmt;

/// Errors returned by the pad controller
///
/// `E` is the error type of the [`TouchHardware`](crate::TouchHardware) implementation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// A peripheral register or resource operation failed
    Hardware(E),
    /// Pad index outside 0..PAD_COUNT
    InvalidPad(u8),
    /// `initialize` was called again without `deinitialize`
    AlreadyInitialized,
}

impl<E> From<E> for Error<E> {
    fn from(err: E) -> Self {
        Self::Hardware(err)
    }
}

impl<E: fmt::Debug> fmt::Display for Error<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hardware(e) => write!(f, "touch hardware error: {e:?}"),
            Self::InvalidPad(pad) => write!(f, "invalid touch pad index {pad}"),
            Self::AlreadyInitialized => write!(f, "touch pads already initialized"),
        }
    }
}
