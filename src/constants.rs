//! Constants governing buffer allocation.
//!
//! Every allocation a [`Buffer`](crate::Buffer) makes follows one rule: a request for room for
//! `n` bytes allocates `n * GROWTH_RATE + 1` bytes, capped at the buffer's maximum capacity. The
//! trailing `+ 1` keeps space for the [`TERMINATOR`] even when the request itself was exact.
//!
//! # Invariant
//!
//! - `GROWTH_RATE >= 2`, otherwise repeated appends would not be amortized O(1)
//! - `TERMINATOR` is the zero byte, so the content is a valid C string when it has no interior
//!   zero bytes
//! - `PRACTICAL_MAX_SIZE` is the largest allocation Rust permits (`isize::MAX` bytes), and
//!   `PRACTICAL_MAX_SIZE * GROWTH_RATE` still fits in a `usize`

/// Multiplicative over-allocation factor applied whenever storage is (re)allocated.
///
/// This also applies on creation: a buffer built from `n` bytes starts with a capacity of
/// `2n + 1`, not `n + 1`.
pub const GROWTH_RATE: usize = 2;

/// The sentinel byte stored directly after the content.
pub const TERMINATOR: u8 = b'\0';

/// Largest capacity a buffer can ever have.
///
/// This is a platform limit rather than a recommended size: no single allocation may exceed
/// `isize::MAX` bytes. It is also the default maximum capacity of a
/// [`BufferBuilder`](crate::BufferBuilder).
pub const PRACTICAL_MAX_SIZE: usize =
    // 2^63 - 1 on 64-bit targets, same bit pattern as `isize::MAX`
    usize::MAX >> 1;
