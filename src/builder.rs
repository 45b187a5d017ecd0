use crate::buffer::Buffer;
use crate::constants::PRACTICAL_MAX_SIZE;
use crate::error::Result;

/// A builder for constructing a [`Buffer`] with custom capacity settings.
///
/// If `max_capacity` is too small to hold the initial content and its terminator, it is raised
/// to match. The growth rate itself is fixed, see [`GROWTH_RATE`](crate::constants::GROWTH_RATE).
///
/// # Examples
///
/// ```
/// use cstr_buf::Buffer;
///
/// let mut buffer = Buffer::builder(b"abc")
///     .min_capacity(16)  // reserve up front
///     .max_capacity(64)  // never grow past 64 bytes
///     .build()
///     .unwrap();
///
/// assert_eq!(buffer.capacity(), 33);
/// assert!(buffer.reserve(65).is_err());
/// ```
#[must_use]
#[derive(Debug, Clone)]
pub struct BufferBuilder<'a> {
    initial: &'a [u8],
    min_capacity: Option<usize>,
    max_capacity: Option<usize>,
}

impl<'a> BufferBuilder<'a> {
    pub(crate) fn new(initial: &'a [u8]) -> Self {
        Self {
            initial,
            min_capacity: None,
            max_capacity: None,
        }
    }

    /// Reserves at least this much capacity right after creation.
    pub fn min_capacity(mut self, cap: usize) -> Self {
        self.min_capacity = Some(cap);
        self
    }

    /// Sets the maximum buffer capacity. Defaults to [`PRACTICAL_MAX_SIZE`].
    pub fn max_capacity(mut self, cap: usize) -> Self {
        self.max_capacity = Some(cap);
        self
    }

    /// Builds the [`Buffer`] with the configured settings.
    ///
    /// # Errors
    ///
    /// Returns an allocation error if the storage could not be obtained, or if `min_capacity`
    /// exceeds the maximum capacity.
    pub fn build(self) -> Result<Buffer> {
        let max_capacity = self.max_capacity.unwrap_or(PRACTICAL_MAX_SIZE);
        let mut buffer = Buffer::with_max_capacity(self.initial, max_capacity)?;

        if let Some(min_capacity) = self.min_capacity {
            buffer.reserve(min_capacity)?;
        }

        Ok(buffer)
    }
}
