use derive_more::derive::{AsRef, Display};

use crate::{Error, Result};

/// Capacity in bytes of the name buffers in the HIP device property block, including the
/// terminating NUL.
pub const NAME_CAPACITY: usize = 256;

/// Longest name in bytes that fits into a buffer of [`NAME_CAPACITY`].
const MAX_NAME_LEN: usize = NAME_CAPACITY - 1;

/// A name that fits into one of the fixed-capacity name buffers of the HIP device property
/// block, such as the device name or the architecture name.
///
/// The capacity is enforced when the value is created, so every `BoundedName` can be written
/// back into a runtime buffer without truncation.
#[derive(AsRef, Clone, Debug, Default, Display, Eq, Hash, PartialEq)]
#[as_ref(str)]
#[display("{value}")]
pub struct BoundedName {
    value: String,
}

impl BoundedName {
    /// Creates a name, rejecting values that do not fit into [`NAME_CAPACITY`] bytes
    /// with a terminating NUL.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NameTooLong`] if the value is too long.
    pub fn new(value: impl Into<String>) -> Result<Self> {
        let value = value.into();

        if value.len() > MAX_NAME_LEN {
            return Err(Error::NameTooLong {
                value,
                capacity: NAME_CAPACITY,
            });
        }

        Ok(Self { value })
    }

    /// Creates a name from a compile-time constant that is known to fit.
    pub(crate) fn from_static(value: &'static str) -> Self {
        debug_assert!(value.len() <= MAX_NAME_LEN);

        Self {
            value: value.to_owned(),
        }
    }

    /// Reads a NUL-terminated name out of a runtime-provided byte buffer.
    ///
    /// Reading stops at the first NUL or at the capacity, whichever comes first. Bytes that are
    /// not valid UTF-8 are replaced, after which the value is cut back to the capacity on a
    /// character boundary.
    pub(crate) fn from_nul_terminated(bytes: &[u8]) -> Self {
        let bytes = bytes.split(|b| *b == 0).next().unwrap_or_default();
        let bytes = bytes.get(..MAX_NAME_LEN).unwrap_or(bytes);

        let mut value = String::from_utf8_lossy(bytes).into_owned();

        while value.len() > MAX_NAME_LEN {
            value.pop();
        }

        Self { value }
    }

    /// The name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.value
    }
}

impl PartialEq<str> for BoundedName {
    fn eq(&self, other: &str) -> bool {
        self.value == other
    }
}

impl PartialEq<&str> for BoundedName {
    fn eq(&self, other: &&str) -> bool {
        self.value == *other
    }
}
