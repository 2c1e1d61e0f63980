use crate::log_reader::{display_logs, extract_address, read_log};
use crate::{LifecycleResult, Publisher};

use std::path::Path;

use googletest::assert_that;
use googletest::prelude::{eq, none, some};
use tempfile::TempDir;

const MARKER: &str = "omni-cache started";

#[derive(Default)]
struct GroupRecorder {
    groups: Vec<(String, String)>,
}

impl Publisher for GroupRecorder {
    fn set_output(&mut self, _name: &str, _value: &str) -> LifecycleResult<()> {
        Ok(())
    }

    fn export_variable(&mut self, _name: &str, _value: &str) -> LifecycleResult<()> {
        Ok(())
    }

    fn add_path(&mut self, _dir: &Path) -> LifecycleResult<()> {
        Ok(())
    }

    fn append_summary(&mut self, _markdown: &str) -> LifecycleResult<()> {
        Ok(())
    }

    fn group(&mut self, title: &str, body: &str) {
        self.groups.push((title.to_string(), body.to_string()));
    }
}

#[test]
fn given_json_startup_line_when_extracting_then_addr_field_is_used() {
    let log = r#"{"level":"info","msg":"omni-cache started","addr":"127.0.0.1:40123"}"#;

    assert_that!(
        extract_address(log, MARKER).as_deref(),
        some(eq("127.0.0.1:40123"))
    );
}

#[test]
fn given_json_with_message_key_when_extracting_then_addr_field_is_used() {
    let log = r#"{"message":"omni-cache started","addr":"10.0.0.5:9000"}"#;

    assert_that!(
        extract_address(log, MARKER).as_deref(),
        some(eq("10.0.0.5:9000"))
    );
}

#[test]
fn given_quoted_text_addr_when_extracting_then_quotes_are_dropped() {
    let log = r#"time=2024-01-01T00:00:00Z level=INFO msg="omni-cache started" addr="127.0.0.1:12321""#;

    assert_that!(
        extract_address(log, MARKER).as_deref(),
        some(eq("127.0.0.1:12321"))
    );
}

#[test]
fn given_bare_text_addr_when_extracting_then_token_is_used() {
    let log = "level=INFO msg=\"omni-cache started\" addr=localhost:5555 pid=42";

    assert_that!(
        extract_address(log, MARKER).as_deref(),
        some(eq("localhost:5555"))
    );
}

#[test]
fn given_several_startup_lines_when_extracting_then_last_one_wins() {
    let log = "\
msg=\"omni-cache started\" addr=127.0.0.1:1111
some unrelated line
msg=\"omni-cache started\" addr=127.0.0.1:2222
shutting down";

    assert_that!(
        extract_address(log, MARKER).as_deref(),
        some(eq("127.0.0.1:2222"))
    );
}

#[test]
fn given_addr_on_line_without_marker_when_extracting_then_none() {
    let log = "level=INFO msg=\"listening\" addr=127.0.0.1:1111";

    assert_that!(extract_address(log, MARKER), none());
}

#[test]
fn given_json_with_longer_message_when_extracting_then_none() {
    // msg must equal the marker, not merely contain it
    let log = r#"{"msg":"omni-cache started soon","addr":"127.0.0.1:3333"}"#;

    assert_that!(extract_address(log, MARKER), none());
}

#[test]
fn given_empty_log_when_extracting_then_none() {
    assert_that!(extract_address("", MARKER), none());
}

#[tokio::test]
async fn given_missing_file_when_reading_log_then_empty() {
    let temp = TempDir::new().unwrap();

    let text = read_log(&temp.path().join("absent.log")).await;

    assert_that!(text.as_str(), eq(""));
}

#[tokio::test]
async fn given_log_with_content_when_displayed_then_one_group_is_emitted() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("omni-cache.log");
    std::fs::write(&path, "line one\nline two\n").unwrap();
    let mut publisher = GroupRecorder::default();

    display_logs(&path, "omni-cache logs", &mut publisher).await;

    assert_that!(publisher.groups.len(), eq(1));
    assert_that!(publisher.groups[0].0.as_str(), eq("omni-cache logs"));
    assert_that!(publisher.groups[0].1.as_str(), eq("line one\nline two\n"));
}

#[tokio::test]
async fn given_blank_log_when_displayed_then_nothing_is_emitted() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("omni-cache.log");
    std::fs::write(&path, "  \n").unwrap();
    let mut publisher = GroupRecorder::default();

    display_logs(&path, "omni-cache logs", &mut publisher).await;

    assert_that!(publisher.groups.len(), eq(0));
}
