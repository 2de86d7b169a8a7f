use alloc::vec::Vec;

use quickcheck::{QuickCheck, TestResult};
use quickcheck_macros::quickcheck;

use super::{arbitrary::Edit, quickcheck_tests};
use crate::Buffer;

/// Content matches and the byte after it is the terminator.
fn holds(buffer: &Buffer, expected: &[u8]) -> bool {
    buffer.as_bytes() == expected
        && buffer.len() == expected.len()
        && buffer.as_bytes_with_nul().last() == Some(&0)
        && buffer.check_invariants()
}

#[quickcheck]
fn create_round_trips(content: Vec<u8>) -> bool {
    holds(&Buffer::from(content.as_slice()), &content)
        && holds(&Buffer::from_bytes(Some(content.as_slice())), &content)
        && holds(&Buffer::try_from_bytes(&content).unwrap(), &content)
}

#[quickcheck]
fn pushes_accumulate(content: Vec<u8>) -> bool {
    let mut buffer = Buffer::new();
    for &byte in &content {
        buffer.push(byte).unwrap();
    }
    holds(&buffer, &content)
}

#[quickcheck]
fn insert_then_remove_restores(content: Vec<u8>, inserted: Vec<u8>, position: usize) -> bool {
    let position = position % (content.len() + 1);
    let mut buffer = Buffer::from(content.as_slice());
    buffer.insert_at(position, &inserted).unwrap();
    buffer.remove_range(position, inserted.len()).unwrap();
    holds(&buffer, &content)
}

#[quickcheck]
fn replace_splices(
    content: Vec<u8>,
    position: usize,
    count: usize,
    replacement: Vec<u8>,
) -> TestResult {
    let position = position % (content.len() + 1);
    let count = count % (content.len() - position + 1);

    let mut buffer = Buffer::from(content.as_slice());
    if buffer.replace_range(position, count, &replacement).is_err() {
        return TestResult::failed();
    }

    let mut expected = content[..position].to_vec();
    expected.extend_from_slice(&replacement);
    expected.extend_from_slice(&content[position + count..]);
    TestResult::from_bool(holds(&buffer, &expected))
}

/// Property: any sequence of edits agrees with the same edits applied to a
/// `Vec<u8>`, keeps the terminator in place, and never shrinks the capacity.
#[test]
fn edit_sequences_follow_vec_model() {
    #[allow(clippy::needless_pass_by_value)]
    fn prop(initial: Vec<u8>, edits: Vec<Edit>) -> bool {
        let mut buffer = Buffer::from(initial.as_slice());
        let mut model = initial;
        let mut capacity = buffer.capacity();

        for edit in &edits {
            if !edit.apply(&mut buffer, &mut model) {
                return false;
            }
            if buffer.capacity() < capacity || !holds(&buffer, &model) {
                return false;
            }
            capacity = buffer.capacity();
        }
        true
    }

    QuickCheck::new()
        .tests(quickcheck_tests())
        .quickcheck(prop as fn(Vec<u8>, Vec<Edit>) -> bool);
}

/// Property: bytes outside an edited range are never disturbed, including
/// when the edit reallocates.
#[test]
fn edits_preserve_surrounding_bytes() {
    fn prop(prefix: Vec<u8>, middle: Vec<u8>, suffix: Vec<u8>, replacement: Vec<u8>) -> bool {
        let mut content = prefix.clone();
        content.extend_from_slice(&middle);
        content.extend_from_slice(&suffix);

        let mut buffer = Buffer::from(content);
        if buffer
            .replace_range(prefix.len(), middle.len(), &replacement)
            .is_err()
        {
            return false;
        }
        let bytes = buffer.as_bytes();
        bytes.starts_with(&prefix)
            && bytes.ends_with(&suffix)
            && bytes[prefix.len()..bytes.len() - suffix.len()] == replacement[..]
    }

    QuickCheck::new()
        .tests(quickcheck_tests())
        .quickcheck(prop as fn(Vec<u8>, Vec<u8>, Vec<u8>, Vec<u8>) -> bool);
}
