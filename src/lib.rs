//! A growable, null-terminated byte buffer with an explicit growth policy.
//!
//! [`Vec<u8>`] and [`CString`](std::ffi::CString) hide how much they over-allocate. [`Buffer`]
//! makes it part of the contract: every allocation for a request of `n` bytes reserves
//! `n * GROWTH_RATE + 1` bytes, the content is always followed by a zero terminator, and the
//! resulting capacity is observable. Operations that could corrupt memory in a C implementation
//! (out of range indexing, use after destroy) are checked and reported as [`Error`]s instead.
//!
//! # When to use this
//!
//! This crate is a good fit when content is built up byte by byte and handed to code expecting a
//! C string, or when you want predictable, testable growth. If you don't care about the growth
//! policy, prefer [`Vec<u8>`] and convert at the end.
//!
//! # Quick start
//!
//! ```
//! use cstr_buf::Buffer;
//!
//! let mut first = Buffer::create("first string").unwrap();
//! let mut second = Buffer::create("second string").unwrap();
//!
//! // Append grows the buffer as needed
//! first.append(b's').unwrap();
//! first.append(b's').unwrap();
//! assert_eq!(first.size(), 14);
//!
//! // Indexed access is bounds checked
//! assert_eq!(*first.at(0).unwrap(), b'f');
//! assert!(first.at(15).is_err());
//!
//! // Copy overwrites the target with independent storage
//! second.copy_from(&first).unwrap();
//! assert_eq!(second.as_bytes(), b"first stringss");
//!
//! // Destroy releases the storage, later use is refused
//! first.destroy();
//! assert_eq!(first.capacity(), 0);
//! assert!(first.append(b'!').is_err());
//! ```
//!
//! # Capacity configuration
//!
//! ```
//! use cstr_buf::Buffer;
//!
//! let buffer = Buffer::builder(b"data")
//!     .min_capacity(1024)  // reserve up front
//!     .max_capacity(4096)  // never grow past 4 KiB
//!     .build()
//!     .unwrap();
//! assert_eq!(buffer.capacity(), 2049);
//! ```
//!
//! # Crate organisation
//!
//! - [`Buffer`] — the buffer itself.
//! - [`BufferBuilder`] — configures the reserved and maximum capacity before constructing a
//!   [`Buffer`].
//! - [`Error`] — allocation failures and contract violations.
//! - [`constants`] — the growth rate, terminator and size limit used throughout the crate.
//!
//! # Logging
//!
//! Creation and destruction are logged at `debug` level, each reallocation at `trace` level and
//! refused reservations at `warn` level through [`tracing`]. Install a subscriber to see them.

mod buffer;
mod builder;
pub mod constants;
mod error;

pub use buffer::Buffer;
pub use builder::BufferBuilder;
pub use error::{Error, Result};
