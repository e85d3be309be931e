//! Integration tests for `Buffer`'s `Read`/`Write` impls, exercised the way
//! an external caller (not the parser itself) would use them.

use std::io::{Read, Write};

use waymark::Buffer;

#[test]
fn read_drains_the_buffer() {
    let mut buf = Buffer::from("This is a test");
    let mut destination = Vec::new();

    buf.read_to_end(&mut destination).unwrap();

    assert_eq!(destination, b"This is a test");
    assert!(buf.is_empty());
}

#[test]
fn write_appends_and_grows() {
    let mut buf = Buffer::new(4);
    buf.write_all(b"hello ").unwrap();
    buf.write_all(b"world").unwrap();

    assert_eq!(&*buf, b"hello world");
}

#[test]
fn partial_read_slurps_only_what_was_consumed() {
    let mut buf = Buffer::from("0123456789");
    let mut small = [0u8; 4];

    let n = buf.read(&mut small).unwrap();

    assert_eq!(n, 4);
    assert_eq!(&small, b"0123");
    assert_eq!(&*buf, b"456789");
}
