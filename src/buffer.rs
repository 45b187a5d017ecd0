//! Growable, null-terminated byte buffer with an explicit growth policy.
//!
//! The [`Buffer`] type owns a contiguous run of bytes followed by a single [`TERMINATOR`]. Unlike
//! [`Vec<u8>`] or [`CString`](std::ffi::CString), its over-allocation policy is part of the API:
//! every (re)allocation reserves `n * GROWTH_RATE + 1` bytes for a request of `n`, and the result
//! is observable through [`Buffer::capacity`].
//!
//! # Example
//!
//! ```
//! use cstr_buf::Buffer;
//!
//! let mut buffer = Buffer::create("first string").unwrap();
//! assert_eq!(buffer.size(), 12);
//! assert_eq!(buffer.capacity(), 25);
//!
//! buffer.append(b's').unwrap();
//! buffer.append(b's').unwrap();
//! assert_eq!(buffer.as_bytes(), b"first stringss");
//!
//! *buffer.at_mut(0).unwrap() = b'F';
//! assert_eq!(buffer.as_c_str().unwrap(), c"First stringss");
//! ```

use crate::builder::BufferBuilder;
use crate::constants::{GROWTH_RATE, PRACTICAL_MAX_SIZE, TERMINATOR};
use crate::error::{Error, Result};
use std::ffi::CStr;
use std::fmt;
use std::mem;
use tracing::{debug, trace, warn};

/// A growable byte buffer that always keeps a [`TERMINATOR`] after its content.
///
/// # Capacity Management
///
/// - **Creation**: a buffer built from `n` bytes allocates `n * GROWTH_RATE + 1` bytes, so the
///   first few appends never reallocate.
/// - **Growth**: [`reserve`](Self::reserve) is a no-op while the capacity already covers the
///   request. Otherwise it reallocates to `request * GROWTH_RATE + 1`, which keeps repeated
///   [`append`](Self::append) calls amortized O(1).
/// - **Shrinking**: never happens implicitly. Storage is only released by
///   [`destroy`](Self::destroy) or by dropping the buffer.
/// - **Limit**: no capacity ever exceeds [`max_capacity`](Self::max_capacity), which defaults to
///   [`PRACTICAL_MAX_SIZE`] and can be lowered with a [`BufferBuilder`].
///
/// # Lifecycle
///
/// A buffer is either live or destroyed. [`destroy`](Self::destroy) releases the storage and
/// leaves `size() == 0` and `capacity() == 0`; every operation on a destroyed buffer then fails
/// with [`Error::Destroyed`] until [`copy_from`](Self::copy_from) reconstructs it. Destroying
/// twice is harmless.
///
/// # Invariants
///
/// While live, the buffer maintains `size + 1 <= capacity == data.len() <= max_capacity` and
/// `data[size] == TERMINATOR`. While destroyed, `size == 0` and `data` holds no allocation.
#[derive(Clone)]
pub struct Buffer {
    /// Allocated storage. Its length is the logical capacity and every byte is initialized.
    data: Vec<u8>,
    /// Number of content bytes, excluding the terminator.
    size: usize,
    /// Upper bound for `data.len()`.
    max_capacity: usize,
}

impl Buffer {
    /// Creates a buffer holding a copy of `initial`.
    ///
    /// The capacity is `initial.len() * GROWTH_RATE + 1`. Zero bytes in `initial` are kept as
    /// content like any other byte.
    ///
    /// # Examples
    ///
    /// ```
    /// # use cstr_buf::Buffer;
    /// let buffer = Buffer::create("second string").unwrap();
    /// assert_eq!(buffer.size(), 13);
    /// assert_eq!(buffer.capacity(), 27);
    /// assert_eq!(buffer.at(13).copied().unwrap(), b'\0');
    /// ```
    ///
    /// # Errors
    ///
    /// Returns an allocation error if the storage could not be obtained.
    pub fn create(initial: impl AsRef<[u8]>) -> Result<Self> {
        Self::with_max_capacity(initial.as_ref(), PRACTICAL_MAX_SIZE)
    }

    /// Returns a [`BufferBuilder`] for configuring a buffer holding `initial`.
    pub fn builder(initial: &[u8]) -> BufferBuilder<'_> {
        BufferBuilder::new(initial)
    }

    /// Creates a buffer holding `initial` that will never grow beyond `max_capacity`.
    ///
    /// The limit is raised to fit `initial` and its terminator if it is too small for them.
    pub(crate) fn with_max_capacity(initial: &[u8], max_capacity: usize) -> Result<Self> {
        let size = initial.len();
        let required = size.checked_add(1).ok_or(Error::CapacityOverflow)?;

        if required > PRACTICAL_MAX_SIZE {
            return Err(Error::CapacityExceeded {
                requested: required,
                max: PRACTICAL_MAX_SIZE,
            });
        }

        let max_capacity = max_capacity.clamp(required, PRACTICAL_MAX_SIZE);
        let capacity = Self::grown_capacity(size, max_capacity);

        let mut data = Vec::new();
        data.try_reserve_exact(capacity)
            .map_err(|source| Error::Allocation {
                requested: capacity,
                source,
            })?;
        data.extend_from_slice(initial);
        // Fills the terminator slot and the spare capacity
        data.resize(capacity, TERMINATOR);

        debug!(size, capacity, max_capacity, "created buffer");

        Ok(Self {
            data,
            size,
            max_capacity,
        })
    }

    /// Computes the capacity to allocate for a request of `requested` bytes.
    ///
    /// This is `requested * GROWTH_RATE + 1`, saturating and then capped at `max_capacity`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use cstr_buf::Buffer;
    /// # use cstr_buf::constants::PRACTICAL_MAX_SIZE;
    /// assert_eq!(Buffer::grown_capacity(0, PRACTICAL_MAX_SIZE), 1);
    /// assert_eq!(Buffer::grown_capacity(12, PRACTICAL_MAX_SIZE), 25);
    /// assert_eq!(Buffer::grown_capacity(12, 20), 20);
    /// ```
    #[inline]
    pub fn grown_capacity(requested: usize, max_capacity: usize) -> usize {
        requested
            .saturating_mul(GROWTH_RATE)
            .saturating_add(1)
            .min(max_capacity)
    }

    /// Returns the number of content bytes, excluding the terminator.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns the total allocated storage in bytes, including the terminator slot.
    ///
    /// This is `0` once the buffer has been destroyed.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Returns the capacity this buffer will never grow beyond.
    #[inline]
    pub fn max_capacity(&self) -> usize {
        self.max_capacity
    }

    /// Returns `true` if the buffer has no content.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Returns `true` if the buffer has been destroyed and not reconstructed since.
    #[inline]
    pub fn is_destroyed(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the whole allocated storage, or `None` once the buffer has been destroyed.
    ///
    /// The bytes past the terminator are spare capacity. They are initialized but their values
    /// carry no meaning.
    #[inline]
    pub fn allocation(&self) -> Option<&[u8]> {
        if self.is_destroyed() {
            None
        } else {
            Some(&self.data)
        }
    }

    /// Returns the content bytes, excluding the terminator.
    ///
    /// A destroyed buffer has no content and returns an empty slice.
    #[expect(clippy::indexing_slicing, reason = "Safe by invariant")]
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data[..self.size]
    }

    /// Returns the content bytes followed by the terminator.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Destroyed`] if the buffer has been destroyed.
    #[expect(clippy::indexing_slicing, reason = "Safe by invariant")]
    pub fn as_bytes_with_nul(&self) -> Result<&[u8]> {
        self.ensure_live()?;
        Ok(&self.data[..=self.size])
    }

    /// Returns the content as a [`CStr`].
    ///
    /// # Examples
    ///
    /// ```
    /// # use cstr_buf::Buffer;
    /// let buffer = Buffer::create("abc").unwrap();
    /// assert_eq!(buffer.as_c_str().unwrap(), c"abc");
    ///
    /// let buffer = Buffer::create(b"a\0c").unwrap();
    /// assert!(buffer.as_c_str().is_err());
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`Error::InteriorNul`] if the content itself contains a zero byte, and
    /// [`Error::Destroyed`] if the buffer has been destroyed.
    pub fn as_c_str(&self) -> Result<&CStr> {
        let bytes = self.as_bytes_with_nul()?;

        CStr::from_bytes_with_nul(bytes).map_err(|_| Error::InteriorNul {
            position: self
                .as_bytes()
                .iter()
                .position(|&b| b == TERMINATOR)
                .unwrap_or(self.size),
        })
    }

    /// Releases the storage and resets the buffer to its empty state.
    ///
    /// Afterwards `size()` and `capacity()` are `0` and [`allocation()`](Self::allocation) is
    /// `None`. Calling this on an already destroyed buffer does nothing.
    ///
    /// # Examples
    ///
    /// ```
    /// # use cstr_buf::Buffer;
    /// let mut buffer = Buffer::create("data").unwrap();
    /// buffer.destroy();
    /// assert!(buffer.allocation().is_none());
    /// assert_eq!(buffer.size(), 0);
    /// assert_eq!(buffer.capacity(), 0);
    ///
    /// // Appending to a destroyed buffer is refused
    /// assert!(buffer.append(b'x').is_err());
    /// ```
    pub fn destroy(&mut self) {
        if self.is_destroyed() {
            return;
        }

        let released = mem::take(&mut self.data);
        self.size = 0;

        debug!(capacity = released.len(), "destroyed buffer");
    }

    /// Discards the content without changing the capacity.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Destroyed`] if the buffer has been destroyed.
    #[expect(clippy::indexing_slicing, reason = "Safe by invariant")]
    pub fn clear(&mut self) -> Result<()> {
        self.ensure_live()?;

        self.data[0] = TERMINATOR;
        self.size = 0;

        Ok(())
    }

    /// Ensures the capacity is at least `min_capacity`.
    ///
    /// If the capacity already meets or exceeds `min_capacity` nothing happens: the buffer never
    /// reallocates and never shrinks in that case. Otherwise the storage is reallocated to
    /// `min_capacity * GROWTH_RATE + 1` bytes (capped at [`max_capacity`](Self::max_capacity)),
    /// keeping the content and terminator.
    ///
    /// # Examples
    ///
    /// ```
    /// # use cstr_buf::Buffer;
    /// let mut buffer = Buffer::create("abc").unwrap(); // capacity 7
    ///
    /// buffer.reserve(5).unwrap();
    /// assert_eq!(buffer.capacity(), 7);
    ///
    /// buffer.reserve(8).unwrap();
    /// assert_eq!(buffer.capacity(), 17);
    /// assert_eq!(buffer.as_bytes(), b"abc");
    /// ```
    ///
    /// # Errors
    ///
    /// Returns an allocation error if `min_capacity` exceeds the maximum capacity or the
    /// allocator fails, and [`Error::Destroyed`] if the buffer has been destroyed. In every case
    /// the buffer is left unchanged.
    pub fn reserve(&mut self, min_capacity: usize) -> Result<()> {
        self.ensure_live()?;
        self.reserve_storage(min_capacity)
    }

    /// Returns a reference to the byte at `index`.
    ///
    /// Any index from `0` up to and including [`size()`](Self::size) is valid. The last one
    /// addresses the terminator.
    ///
    /// # Examples
    ///
    /// ```
    /// # use cstr_buf::{Buffer, Error};
    /// let buffer = Buffer::create("first").unwrap();
    /// assert_eq!(*buffer.at(0).unwrap(), b'f');
    /// assert_eq!(*buffer.at(5).unwrap(), b'\0');
    /// assert!(matches!(buffer.at(6), Err(Error::IndexOutOfBounds { index: 6, size: 5 })));
    /// assert!(matches!(buffer.at(-1), Err(Error::IndexOutOfBounds { .. })));
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfBounds`] for an index outside `0..=size()`, and
    /// [`Error::Destroyed`] if the buffer has been destroyed.
    pub fn at(&self, index: isize) -> Result<&u8> {
        self.ensure_live()?;

        let size = self.size;
        usize::try_from(index)
            .ok()
            .filter(|&i| i <= size)
            .and_then(|i| self.data.get(i))
            .ok_or(Error::IndexOutOfBounds { index, size })
    }

    /// Returns a mutable reference to the content byte at `index`.
    ///
    /// Only content bytes, `0..size()`, can be written. The terminator slot is readable through
    /// [`at`](Self::at) but never writable, so the content always stays terminated.
    ///
    /// # Examples
    ///
    /// ```
    /// # use cstr_buf::Buffer;
    /// let mut buffer = Buffer::create("first").unwrap();
    /// *buffer.at_mut(0).unwrap() = b'F';
    /// assert_eq!(buffer.as_bytes(), b"First");
    /// assert!(buffer.at_mut(5).is_err());
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfBounds`] for an index outside `0..size()`, and
    /// [`Error::Destroyed`] if the buffer has been destroyed.
    pub fn at_mut(&mut self, index: isize) -> Result<&mut u8> {
        self.ensure_live()?;

        let size = self.size;
        usize::try_from(index)
            .ok()
            .filter(|&i| i < size)
            .and_then(|i| self.data.get_mut(i))
            .ok_or(Error::IndexOutOfBounds { index, size })
    }

    /// Appends a single byte to the content.
    ///
    /// Grows the storage with the same rule as [`reserve`](Self::reserve) when there is no room
    /// left for the byte and the terminator after it.
    ///
    /// # Examples
    ///
    /// ```
    /// # use cstr_buf::Buffer;
    /// let mut buffer = Buffer::create("").unwrap();
    /// assert_eq!(buffer.capacity(), 1);
    ///
    /// buffer.append(b'a').unwrap();
    /// assert_eq!(buffer.capacity(), 5);
    /// assert_eq!(buffer.as_bytes_with_nul().unwrap(), b"a\0");
    /// ```
    ///
    /// # Errors
    ///
    /// Returns an allocation error if the buffer is full and cannot grow, and
    /// [`Error::Destroyed`] if the buffer has been destroyed. In every case the buffer is left
    /// unchanged.
    #[expect(
        clippy::arithmetic_side_effects,
        clippy::indexing_slicing,
        reason = "Safe by invariant"
    )]
    pub fn append(&mut self, byte: u8) -> Result<()> {
        self.ensure_live()?;

        // Room for the new byte plus the terminator after it
        let required = self.size.checked_add(2).ok_or(Error::CapacityOverflow)?;
        self.reserve_storage(required)?;

        self.data[self.size] = byte;
        self.data[self.size + 1] = TERMINATOR;
        self.size += 1;

        Ok(())
    }

    /// Overwrites the content of this buffer with a copy of the content of `from`.
    ///
    /// The capacity grows with the same rule as [`reserve`](Self::reserve) if it cannot hold the
    /// content of `from` and its terminator, and is kept otherwise. Both buffers own independent
    /// storage afterwards.
    ///
    /// A destroyed buffer can be the target: copying into it reconstructs it.
    ///
    /// # Examples
    ///
    /// ```
    /// # use cstr_buf::Buffer;
    /// let mut from = Buffer::create("first").unwrap();
    /// let mut to = Buffer::create("second string").unwrap();
    ///
    /// to.copy_from(&from).unwrap();
    /// assert_eq!(to, from);
    ///
    /// // Independent storage
    /// *from.at_mut(0).unwrap() = b'F';
    /// assert_eq!(to.as_bytes(), b"first");
    /// ```
    ///
    /// # Errors
    ///
    /// Returns an allocation error if this buffer cannot grow large enough, and
    /// [`Error::Destroyed`] if `from` has been destroyed. In every case this buffer is left
    /// unchanged.
    #[expect(
        clippy::arithmetic_side_effects,
        clippy::indexing_slicing,
        reason = "Safe by invariant"
    )]
    pub fn copy_from(&mut self, from: &Buffer) -> Result<()> {
        from.ensure_live()?;

        // A live buffer's capacity is at least `size + 1`, so this can't overflow
        let size = from.size;
        self.reserve_storage(size + 1)?;

        // Content and terminator in one go
        self.data[..=size].copy_from_slice(&from.data[..=size]);
        self.size = size;

        Ok(())
    }

    /// Fails with [`Error::Destroyed`] if the buffer has been destroyed.
    #[inline]
    fn ensure_live(&self) -> Result<()> {
        if self.is_destroyed() {
            return Err(Error::Destroyed);
        }

        Ok(())
    }

    /// The reservation rule shared by every growing operation.
    ///
    /// Also works on a destroyed buffer, whose capacity is `0`.
    #[expect(clippy::arithmetic_side_effects, reason = "Safe by bounds checks")]
    fn reserve_storage(&mut self, min_capacity: usize) -> Result<()> {
        let old_capacity = self.capacity();

        if old_capacity >= min_capacity {
            return Ok(());
        }

        if min_capacity > self.max_capacity {
            warn!(
                min_capacity,
                max_capacity = self.max_capacity,
                "refused reservation beyond maximum capacity"
            );
            return Err(Error::CapacityExceeded {
                requested: min_capacity,
                max: self.max_capacity,
            });
        }

        // Strictly larger than `old_capacity` since `min_capacity` is
        let new_capacity = Self::grown_capacity(min_capacity, self.max_capacity);

        // On failure the storage is untouched
        if let Err(source) = self.data.try_reserve_exact(new_capacity - old_capacity) {
            warn!(new_capacity, %source, "allocation failed");
            return Err(Error::Allocation {
                requested: new_capacity,
                source,
            });
        }

        // Doesn't reallocate, the storage was reserved above
        self.data.resize(new_capacity, TERMINATOR);

        trace!(old_capacity, new_capacity, size = self.size, "grew buffer");

        Ok(())
    }
}

impl fmt::Debug for Buffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Buffer")
            .field(
                "content",
                &format_args!("\"{}\"", self.as_bytes().escape_ascii()),
            )
            .field("size", &self.size)
            .field("capacity", &self.capacity())
            .field("max_capacity", &self.max_capacity)
            .finish()
    }
}

/// Buffers are equal when their content is, regardless of capacity.
impl PartialEq for Buffer {
    fn eq(&self, other: &Self) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl Eq for Buffer {}

impl AsRef<[u8]> for Buffer {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl TryFrom<&[u8]> for Buffer {
    type Error = Error;

    fn try_from(initial: &[u8]) -> Result<Self> {
        Self::create(initial)
    }
}

impl TryFrom<&str> for Buffer {
    type Error = Error;

    fn try_from(initial: &str) -> Result<Self> {
        Self::create(initial)
    }
}

impl TryFrom<&CStr> for Buffer {
    type Error = Error;

    fn try_from(initial: &CStr) -> Result<Self> {
        Self::create(initial.to_bytes())
    }
}
