//! Property tests for the buffer laws.
//!
//! Every property runs arbitrary operation sequences against a [`Buffer`] and a plain `Vec<u8>`
//! model of its content, then checks the invariants after each step.
//!
//! # Laws Tested
//!
//! - create keeps the size and terminates the content
//! - `capacity >= size + 1` after every operation
//! - reserve below or at the capacity is a no-op
//! - reserve above the capacity grows and keeps the content
//! - repeated appends reproduce the appended bytes
//! - copy produces equal, independent content
//! - destroy releases everything

#![expect(
    clippy::arithmetic_side_effects,
    clippy::indexing_slicing,
    clippy::unwrap_used,
    reason = "Okay in tests"
)]

use cstr_buf::Buffer;
use cstr_buf::constants::TERMINATOR;
use proptest::prelude::*;

// ============================================================================
// Operations
// ============================================================================

/// A single mutation applied to the buffer under test.
#[derive(Debug, Clone)]
enum Op {
    Append(u8),
    Reserve(usize),
    Write(usize, u8),
    CopyFrom(Vec<u8>),
    Clear,
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => any::<u8>().prop_map(Op::Append),
        2 => (0usize..512).prop_map(Op::Reserve),
        2 => (any::<usize>(), any::<u8>()).prop_map(|(i, b)| Op::Write(i, b)),
        1 => proptest::collection::vec(any::<u8>(), 0..64).prop_map(Op::CopyFrom),
        1 => Just(Op::Clear),
    ]
}

/// Applies `op` to both the buffer and the content model.
fn apply(buffer: &mut Buffer, model: &mut Vec<u8>, op: &Op) {
    match op {
        Op::Append(byte) => {
            buffer.append(*byte).unwrap();
            model.push(*byte);
        }
        Op::Reserve(min_capacity) => buffer.reserve(*min_capacity).unwrap(),
        Op::Write(index, byte) => {
            if model.is_empty() {
                assert!(buffer.at_mut(0).is_err());
                return;
            }
            let index = index % model.len();
            *buffer.at_mut(isize::try_from(index).unwrap()).unwrap() = *byte;
            model[index] = *byte;
        }
        Op::CopyFrom(content) => {
            let from = Buffer::create(content).unwrap();
            buffer.copy_from(&from).unwrap();
            model.clone_from(content);
        }
        Op::Clear => {
            buffer.clear().unwrap();
            model.clear();
        }
    }
}

/// Checks the invariants that hold for every live buffer.
fn assert_invariants(buffer: &Buffer, model: &[u8]) {
    assert_eq!(buffer.size(), model.len());
    assert!(buffer.capacity() > buffer.size());
    assert_eq!(buffer.as_bytes(), model);

    let size = isize::try_from(buffer.size()).unwrap();
    assert_eq!(*buffer.at(size).unwrap(), TERMINATOR);
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn create_keeps_size_and_terminates(initial in proptest::collection::vec(any::<u8>(), 0..256)) {
        let buffer = Buffer::create(&initial).unwrap();

        prop_assert_eq!(buffer.size(), initial.len());
        prop_assert_eq!(buffer.capacity(), initial.len() * 2 + 1);
        prop_assert_eq!(buffer.as_bytes(), &initial[..]);
        prop_assert_eq!(buffer.as_bytes_with_nul().unwrap().last(), Some(&TERMINATOR));
    }

    #[test]
    fn invariants_hold_after_every_operation(
        initial in proptest::collection::vec(any::<u8>(), 0..32),
        ops in proptest::collection::vec(arb_op(), 0..64),
    ) {
        let mut buffer = Buffer::create(&initial).unwrap();
        let mut model = initial;
        assert_invariants(&buffer, &model);

        for op in &ops {
            apply(&mut buffer, &mut model, op);
            assert_invariants(&buffer, &model);
        }
    }

    #[test]
    fn reserve_within_capacity_is_noop(
        initial in proptest::collection::vec(any::<u8>(), 0..64),
        pick in any::<prop::sample::Index>(),
    ) {
        let mut buffer = Buffer::create(&initial).unwrap();
        let capacity = buffer.capacity();
        let before = buffer.allocation().unwrap().to_vec();

        // Anything from 0 up to and including the capacity
        let min_capacity = pick.index(capacity + 1);
        buffer.reserve(min_capacity).unwrap();

        prop_assert_eq!(buffer.capacity(), capacity);
        prop_assert_eq!(buffer.allocation().unwrap(), &before[..]);
    }

    #[test]
    fn reserve_beyond_capacity_grows(
        initial in proptest::collection::vec(any::<u8>(), 0..64),
        extra in 1usize..4096,
    ) {
        let mut buffer = Buffer::create(&initial).unwrap();
        let min_capacity = buffer.capacity() + extra;

        buffer.reserve(min_capacity).unwrap();

        prop_assert!(buffer.capacity() >= min_capacity);
        prop_assert_eq!(buffer.capacity(), min_capacity * 2 + 1);
        prop_assert_eq!(buffer.as_bytes(), &initial[..]);
        prop_assert_eq!(buffer.as_bytes_with_nul().unwrap().last(), Some(&TERMINATOR));
    }

    #[test]
    fn appends_reproduce_content(bytes in proptest::collection::vec(any::<u8>(), 0..2048)) {
        let mut buffer = Buffer::create("").unwrap();

        for byte in &bytes {
            buffer.append(*byte).unwrap();
        }

        prop_assert_eq!(buffer.size(), bytes.len());
        prop_assert_eq!(buffer.as_bytes(), &bytes[..]);
    }

    #[test]
    fn copy_is_deep(
        to_initial in proptest::collection::vec(any::<u8>(), 0..64),
        from_initial in proptest::collection::vec(any::<u8>(), 0..64),
        tail in proptest::collection::vec(any::<u8>(), 1..16),
    ) {
        let mut to = Buffer::create(&to_initial).unwrap();
        let mut from = Buffer::create(&from_initial).unwrap();

        to.copy_from(&from).unwrap();
        prop_assert_eq!(to.size(), from.size());
        prop_assert_eq!(&to, &from);

        // Mutate the source in every way possible
        for byte in &tail {
            from.append(*byte).unwrap();
        }
        let first = *from.at(0).unwrap();
        *from.at_mut(0).unwrap() = first.wrapping_add(1);
        from.reserve(from.capacity() + 1).unwrap();

        prop_assert_eq!(to.as_bytes(), &from_initial[..]);
        prop_assert_eq!(from.as_bytes_with_nul().unwrap().last(), Some(&TERMINATOR));
    }

    #[test]
    fn destroy_releases_everything(
        initial in proptest::collection::vec(any::<u8>(), 0..64),
        ops in proptest::collection::vec(arb_op(), 0..16),
    ) {
        let mut buffer = Buffer::create(&initial).unwrap();
        let mut model = initial;
        for op in &ops {
            apply(&mut buffer, &mut model, op);
        }

        buffer.destroy();

        prop_assert!(buffer.allocation().is_none());
        prop_assert_eq!(buffer.size(), 0);
        prop_assert_eq!(buffer.capacity(), 0);
    }
}
