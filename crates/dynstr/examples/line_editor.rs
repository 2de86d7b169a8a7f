//! Replays a list of edit commands against a [`dynstr::Buffer`] and prints
//! the line, its length and capacity after each step.
//!
//! ```text
//! cargo run --example line_editor
//! ```
#![allow(missing_docs)]

use dynstr::{Buffer, BufferError};

enum Command<'a> {
    Type(&'a [u8]),
    Insert(usize, &'a [u8]),
    Replace(usize, usize, &'a [u8]),
    Delete(usize, usize),
}

fn apply(line: &mut Buffer, command: &Command<'_>) -> Result<(), BufferError> {
    match *command {
        Command::Type(bytes) => {
            for &byte in bytes {
                line.push(byte)?;
            }
            Ok(())
        }
        Command::Insert(position, bytes) => line.insert_at(position, bytes),
        Command::Replace(position, count, bytes) => line.replace_range(position, count, bytes),
        Command::Delete(position, count) => line.remove_range(position, count),
    }
}

fn main() {
    let commands = [
        Command::Type(b"helo wrld"),
        Command::Insert(3, b"l"),
        Command::Insert(7, b"o"),
        Command::Replace(0, 1, b"H"),
        Command::Type(b"!!"),
        Command::Delete(11, 1),
        Command::Delete(40, 1),
    ];

    let mut line = Buffer::new();
    for command in &commands {
        match apply(&mut line, command) {
            Ok(()) => println!(
                "{:<16} len={:<3} capacity={}",
                line.to_string(),
                line.len(),
                line.capacity()
            ),
            Err(err) => println!("rejected: {err}"),
        }
    }
}
