#![no_main]
use arbitrary::Arbitrary;
use dynstr::Buffer;
use libfuzzer_sys::fuzz_target;

/// Raw edit; positions and counts are folded into the current length with a
/// little slack so that out-of-range edits are exercised too.
#[derive(Arbitrary, Debug)]
enum Edit {
    Push(u8),
    Pop,
    Remove(u16, u16),
    Insert(u16, Vec<u8>),
    Replace(u16, u16, Vec<u8>),
    Extend(Vec<u8>),
    Truncate(u16),
    Clear,
}

#[derive(Arbitrary, Debug)]
struct Input {
    initial: Option<Vec<u8>>,
    edits: Vec<Edit>,
}

fn fold(raw: u16, len: usize) -> usize {
    usize::from(raw) % (len + 2)
}

fn in_range(position: usize, count: usize, len: usize) -> bool {
    position + count <= len
}

fn run(input: Input) {
    let mut buffer = Buffer::from_bytes(input.initial.as_deref());
    let mut model = input.initial.unwrap_or_default();

    for edit in input.edits {
        let len = model.len();
        let capacity = buffer.capacity();

        match edit {
            Edit::Push(byte) => {
                buffer.push(byte).unwrap();
                model.push(byte);
                if buffer.capacity() != capacity {
                    assert_eq!(buffer.capacity(), capacity * 2, "push must double");
                }
            }
            Edit::Pop => assert_eq!(buffer.pop(), model.pop()),
            Edit::Remove(position, count) => {
                let (position, count) = (fold(position, len), fold(count, len));
                let result = buffer.remove_range(position, count);
                if in_range(position, count, len) {
                    result.unwrap();
                    model.drain(position..position + count);
                } else {
                    result.unwrap_err();
                }
                assert_eq!(buffer.capacity(), capacity, "remove must not reallocate");
            }
            Edit::Insert(position, content) => {
                let position = fold(position, len);
                let result = buffer.insert_at(position, &content);
                if position <= len {
                    result.unwrap();
                    model.splice(position..position, content);
                    if buffer.capacity() != capacity {
                        assert_eq!(buffer.capacity(), model.len() + 1, "insert must fit exactly");
                    }
                } else {
                    result.unwrap_err();
                }
            }
            Edit::Replace(position, count, content) => {
                let (position, count) = (fold(position, len), fold(count, len));
                let result = buffer.replace_range(position, count, &content);
                if in_range(position, count, len) {
                    result.unwrap();
                    model.splice(position..position + count, content);
                    if buffer.capacity() != capacity {
                        assert_eq!(buffer.capacity(), model.len() + 1, "replace must fit exactly");
                    }
                } else {
                    result.unwrap_err();
                }
            }
            Edit::Extend(content) => {
                buffer.extend_from_slice(&content).unwrap();
                model.extend_from_slice(&content);
            }
            Edit::Truncate(new_len) => {
                let new_len = fold(new_len, len);
                buffer.truncate(new_len);
                model.truncate(new_len);
            }
            Edit::Clear => {
                buffer.clear();
                model.clear();
            }
        }

        assert!(buffer.capacity() >= capacity, "capacity shrank");
        assert!(buffer.check_invariants());
        assert_eq!(buffer.as_bytes(), model.as_slice());
    }
}

fuzz_target!(|input: Input| run(input));
