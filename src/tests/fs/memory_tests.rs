//! Tests for the in-memory filesystem.

use std::io::Write;
use std::path::Path;

use crate::fs::{FileSystem, MemoryFs};

#[test]
fn glob_matches_in_sorted_order() {
    let fs = MemoryFs::new();
    fs.insert("data/part-00001", "b");
    fs.insert("data/part-00000", "a");
    fs.insert("data/other", "x");

    let matches = fs.glob("data/part-*").expect("glob");
    assert_eq!(
        matches,
        [
            Path::new("data/part-00000").to_path_buf(),
            Path::new("data/part-00001").to_path_buf(),
        ]
    );
}

#[test]
fn create_new_then_read_back() {
    let fs = MemoryFs::new();
    let path = Path::new("out");

    let mut writer = fs.create_new(path).expect("create");
    writer.write_all(b"payload").expect("write");
    drop(writer);

    assert!(fs.exists(path));
    assert_eq!(fs.contents(path).expect("contents"), b"payload");
    assert!(fs.create_new(path).is_err());
}

#[test]
fn rename_moves_contents() {
    let fs = MemoryFs::new();
    fs.insert("a", "data");
    fs.rename(Path::new("a"), Path::new("b")).expect("rename");
    assert!(!fs.exists(Path::new("a")));
    assert_eq!(fs.contents(Path::new("b")).expect("contents"), b"data");
}

#[test]
fn remove_dir_all_takes_everything_under_the_prefix() {
    let fs = MemoryFs::new();
    fs.create_dir_all(Path::new("tmp")).expect("mkdir");
    fs.insert("tmp/one", "1");
    fs.insert("tmp/two", "2");
    fs.insert("kept", "k");

    fs.remove_dir_all(Path::new("tmp")).expect("remove");
    assert!(!fs.exists(Path::new("tmp")));
    assert!(!fs.exists(Path::new("tmp/one")));
    assert!(fs.exists(Path::new("kept")));
}
