use pipegrep::engine::{display_path, path_relative_to, path_to_display_string};
use pipegrep::{LineRecord, PipelineConfig, QueueOrder, wire_content};
use std::path::PathBuf;

// --- path_relative_to / display_path ---

#[test]
fn test_path_relative_under_base() {
    let base = PathBuf::from("/foo/bar");
    let path = PathBuf::from("/foo/bar/baz/qux");
    assert_eq!(
        path_relative_to(&path, &base),
        Some(PathBuf::from("baz/qux"))
    );
}

#[test]
fn test_path_relative_not_under_base() {
    let base = PathBuf::from("/foo/bar");
    let path = PathBuf::from("/other/qux");
    assert_eq!(path_relative_to(&path, &base), None);
}

#[test]
fn test_display_path_strips_dot_root() {
    let root = PathBuf::from(".");
    assert_eq!(display_path(&PathBuf::from("./sub/b.txt"), &root), "sub/b.txt");
}

#[test]
fn test_display_path_outside_root_kept_as_is() {
    let root = PathBuf::from("/foo");
    assert_eq!(display_path(&PathBuf::from("/bar/a.txt"), &root), "/bar/a.txt");
}

#[test]
fn test_path_to_display_string_normalizes_backslashes() {
    assert_eq!(
        path_to_display_string(&PathBuf::from("src\\main.rs")),
        "src/main.rs"
    );
}

// --- LineRecord wire form ---

#[test]
fn test_line_record_display() {
    let r = LineRecord {
        path: "a.txt".to_string(),
        line_number: 2,
        content: "world".to_string(),
    };
    assert_eq!(r.to_string(), "a.txt:2:world");
    assert_eq!(r.location(), "a.txt(2)");
}

#[test]
fn test_line_record_parse_keeps_colons_in_content() {
    let r: LineRecord = "src/x.rs:14:let a = b::c;".parse().unwrap();
    assert_eq!(r.path, "src/x.rs");
    assert_eq!(r.line_number, 14);
    assert_eq!(r.content, "let a = b::c;");
}

#[test]
fn test_line_record_parse_empty_content() {
    let r: LineRecord = "a:1:".parse().unwrap();
    assert_eq!(r.content, "");
}

#[test]
fn test_line_record_parse_errors() {
    assert!("no-colons".parse::<LineRecord>().is_err());
    assert!("a:1".parse::<LineRecord>().is_err());
    assert!("a:x:content".parse::<LineRecord>().is_err());
    assert!("a:0:content".parse::<LineRecord>().is_err());
}

#[test]
fn test_wire_content_is_after_last_colon() {
    assert_eq!(wire_content("a.txt:3:hello"), "hello");
    assert_eq!(wire_content("a.txt:3:k: v"), " v");
    assert_eq!(wire_content("plain"), "plain");
}

// --- config ---

#[test]
fn test_queue_order_parse() {
    assert_eq!("fifo".parse::<QueueOrder>().unwrap(), QueueOrder::Fifo);
    assert_eq!("LIFO".parse::<QueueOrder>().unwrap(), QueueOrder::Lifo);
    assert!("stack".parse::<QueueOrder>().is_err());
}

#[test]
fn test_config_validate() {
    let ok = PipelineConfig {
        buffer_capacity: 3,
        search: "x".to_string(),
        ..Default::default()
    };
    assert!(ok.validate().is_ok());
    let zero = PipelineConfig {
        buffer_capacity: 0,
        ..ok.clone()
    };
    assert!(zero.validate().is_err());
    let empty = PipelineConfig {
        search: String::new(),
        ..ok
    };
    assert!(empty.validate().is_err());
}
