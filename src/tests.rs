/*!
 * Tests for treedump functionality
 */

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::Path;
use std::sync::Arc;

use indicatif::ProgressBar;
use tempfile::tempdir;

use crate::config::{Config, FormatMode};
use crate::content::read_content;
use crate::error::TreeDumpError;
use crate::scanner::Scanner;
use crate::types::{ContentPolicy, EntryKind};
use crate::utils::{depth_of, format_file_size, normalize_rel};
use crate::writer::StreamWriter;

// Baseline configuration for a scan rooted at `dir`
fn test_config(dir: &Path) -> Config {
    Config {
        target_dir: dir.to_path_buf(),
        output_file: None,
        format: FormatMode::Markdown,
        max_depth: -1,
        max_size: 64000,
        ignore_patterns: vec![],
        summary: false,
        preview_lines: 10,
        respect_gitignore: false,
        gitignore_path: None,
    }
}

fn scanner_for(config: Config) -> Scanner {
    Scanner::new(config, Arc::new(ProgressBar::hidden()))
}

// Run the full walker -> formatter pipeline into a buffer
fn run_pipeline(config: Config) -> crate::error::Result<String> {
    let scanner = scanner_for(config.clone());
    let mut writer = StreamWriter::new(config.format, Vec::new());

    writer.begin()?;
    for entry in scanner.entries()? {
        writer.write_entry(&entry)?;
    }
    let bytes = writer.finish()?;

    Ok(String::from_utf8(bytes).expect("output is UTF-8"))
}

// The two-level tree used by most traversal tests:
//   a.txt ("hello\n", 6 bytes) and sub/b.go ("package x\n", 10 bytes)
fn setup_spec_tree() -> io::Result<tempfile::TempDir> {
    let temp_dir = tempdir()?;

    let mut a = File::create(temp_dir.path().join("a.txt"))?;
    write!(a, "hello\n")?;

    fs::create_dir(temp_dir.path().join("sub"))?;
    let mut b = File::create(temp_dir.path().join("sub").join("b.go"))?;
    write!(b, "package x\n")?;

    Ok(temp_dir)
}

#[test]
fn unlimited_depth_emits_whole_tree() -> io::Result<()> {
    let temp_dir = setup_spec_tree()?;

    let entries = scanner_for(test_config(temp_dir.path())).scan().unwrap();

    let paths: Vec<&str> = entries.iter().map(|e| e.path.as_str()).collect();
    assert_eq!(paths, vec!["a.txt", "sub", "sub/b.go"]);

    assert_eq!(entries[0].kind, Some(EntryKind::File));
    assert_eq!(entries[0].size, 6);
    assert_eq!(entries[0].depth, 1);

    assert_eq!(entries[1].kind, Some(EntryKind::Dir));
    assert_eq!(entries[1].size, 0);
    assert_eq!(entries[1].depth, 1);

    assert_eq!(entries[2].kind, Some(EntryKind::File));
    assert_eq!(entries[2].size, 10);
    assert_eq!(entries[2].depth, 2);

    Ok(())
}

#[test]
fn max_depth_prunes_before_descent() -> io::Result<()> {
    let temp_dir = setup_spec_tree()?;

    let mut config = test_config(temp_dir.path());
    config.max_depth = 1;
    config.preview_lines = 1;

    let entries = scanner_for(config).scan().unwrap();

    // b.go sits at depth 2 and is pruned; a.txt and sub remain
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].path, "a.txt");
    assert_eq!(entries[0].content.as_deref(), Some("hello"));
    assert_eq!(entries[1].path, "sub");
    assert_eq!(entries[1].kind, Some(EntryKind::Dir));

    Ok(())
}

#[test]
fn ignore_pattern_prunes_whole_subtree() -> io::Result<()> {
    let temp_dir = setup_spec_tree()?;

    let mut config = test_config(temp_dir.path());
    config.ignore_patterns = vec!["sub".to_string()];

    let entries = scanner_for(config).scan().unwrap();

    let paths: Vec<&str> = entries.iter().map(|e| e.path.as_str()).collect();
    assert_eq!(paths, vec!["a.txt"]);

    Ok(())
}

#[test]
fn ignore_matching_is_substring_containment() -> io::Result<()> {
    let temp_dir = tempdir()?;
    fs::create_dir(temp_dir.path().join("catalogue"))?;
    fs::write(temp_dir.path().join("catalogue").join("item.txt"), "x\n")?;
    fs::write(temp_dir.path().join("logbook.txt"), "y\n")?;
    fs::write(temp_dir.path().join("notes.md"), "z\n")?;

    let mut config = test_config(temp_dir.path());
    config.ignore_patterns = vec!["log".to_string()];

    let entries = scanner_for(config).scan().unwrap();

    // "log" matches both "logbook.txt" and "catalogue" by containment
    let paths: Vec<&str> = entries.iter().map(|e| e.path.as_str()).collect();
    assert_eq!(paths, vec!["notes.md"]);

    Ok(())
}

#[test]
fn sibling_order_is_sorted_by_name() -> io::Result<()> {
    let temp_dir = tempdir()?;
    for name in ["c.txt", "a.txt", "b.txt"] {
        fs::write(temp_dir.path().join(name), "x\n")?;
    }

    let entries = scanner_for(test_config(temp_dir.path())).scan().unwrap();

    let paths: Vec<&str> = entries.iter().map(|e| e.path.as_str()).collect();
    assert_eq!(paths, vec!["a.txt", "b.txt", "c.txt"]);

    Ok(())
}

#[test]
fn depth_equals_segment_count() -> io::Result<()> {
    let temp_dir = tempdir()?;
    fs::create_dir_all(temp_dir.path().join("one").join("two").join("three"))?;
    fs::write(
        temp_dir.path().join("one").join("two").join("three").join("deep.txt"),
        "bottom\n",
    )?;

    let entries = scanner_for(test_config(temp_dir.path())).scan().unwrap();

    assert!(!entries.is_empty());
    for entry in &entries {
        assert_eq!(
            entry.depth,
            entry.path.split('/').count(),
            "depth mismatch for {}",
            entry.path
        );
    }

    Ok(())
}

#[test]
fn binary_file_is_skipped_without_error() -> io::Result<()> {
    let temp_dir = tempdir()?;
    let mut bin = File::create(temp_dir.path().join("blob.dat"))?;
    bin.write_all(&[b'd', b'a', 0u8, b't', b'a'])?;

    let mut config = test_config(temp_dir.path());
    config.format = FormatMode::Json; // full-content policy

    let entries = scanner_for(config).scan().unwrap();

    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].kind, Some(EntryKind::File));
    assert_eq!(entries[0].size, 5);
    assert!(entries[0].content.is_none());
    assert!(entries[0].error.is_none());

    Ok(())
}

#[test]
fn zero_byte_file_has_no_content() -> io::Result<()> {
    let temp_dir = tempdir()?;
    File::create(temp_dir.path().join("empty.txt"))?;

    let mut config = test_config(temp_dir.path());
    config.format = FormatMode::Json;

    let entries = scanner_for(config).scan().unwrap();

    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].size, 0);
    assert!(entries[0].content.is_none());
    assert!(entries[0].error.is_none());

    Ok(())
}

#[test]
fn oversized_file_keeps_entry_but_no_content() -> io::Result<()> {
    let temp_dir = tempdir()?;
    fs::write(temp_dir.path().join("big.txt"), "hello world!\n")?;

    let mut config = test_config(temp_dir.path());
    config.max_size = 4;

    let entries = scanner_for(config).scan().unwrap();

    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].size, 13);
    assert!(entries[0].content.is_none());
    assert!(entries[0].error.is_none());

    Ok(())
}

#[test]
fn preview_policy_truncates_lines() -> io::Result<()> {
    let temp_dir = tempdir()?;
    let path = temp_dir.path().join("lines.txt");
    fs::write(&path, "one\ntwo\nthree\n")?;

    let preview = read_content(&path, ContentPolicy::Preview(2))?;
    assert_eq!(preview.as_deref(), Some("one\ntwo"));

    let full = read_content(&path, ContentPolicy::Full)?;
    assert_eq!(full.as_deref(), Some("one\ntwo\nthree\n"));

    let none = read_content(&path, ContentPolicy::None)?;
    assert!(none.is_none());

    Ok(())
}

#[test]
fn summary_reads_no_content() -> io::Result<()> {
    let temp_dir = setup_spec_tree()?;

    let mut config = test_config(temp_dir.path());
    config.summary = true;

    let entries = scanner_for(config).scan().unwrap();
    assert!(entries.iter().all(|e| e.content.is_none()));

    Ok(())
}

#[cfg(not(target_os = "windows"))]
#[test]
fn symlink_is_classified_and_not_read() -> io::Result<()> {
    let temp_dir = tempdir()?;
    fs::write(temp_dir.path().join("target.txt"), "pointed at\n")?;
    std::os::unix::fs::symlink(
        temp_dir.path().join("target.txt"),
        temp_dir.path().join("link.txt"),
    )?;

    let mut config = test_config(temp_dir.path());
    config.format = FormatMode::Json;

    let entries = scanner_for(config).scan().unwrap();

    let link = entries.iter().find(|e| e.path == "link.txt").unwrap();
    assert_eq!(link.kind, Some(EntryKind::Symlink));
    assert!(link.content.is_none());

    let target = entries.iter().find(|e| e.path == "target.txt").unwrap();
    assert_eq!(target.kind, Some(EntryKind::File));
    assert_eq!(target.content.as_deref(), Some("pointed at\n"));

    Ok(())
}

#[cfg(unix)]
#[test]
fn unreadable_directory_yields_error_entry_and_walk_continues() -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let temp_dir = tempdir()?;
    fs::write(temp_dir.path().join("ok.txt"), "fine\n")?;
    let locked = temp_dir.path().join("locked");
    fs::create_dir(&locked)?;
    fs::write(locked.join("hidden.txt"), "secret\n")?;
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000))?;

    // Running as root bypasses permission bits; nothing to observe then
    if fs::read_dir(&locked).is_ok() {
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755))?;
        return Ok(());
    }

    let result = scanner_for(test_config(temp_dir.path())).scan();
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755))?;
    let entries = result.unwrap();

    // The directory itself resolves; enumerating its children fails
    assert!(entries
        .iter()
        .any(|e| e.path == "locked" && e.kind == Some(EntryKind::Dir)));
    assert!(entries.iter().any(|e| e.error.is_some()));

    // Siblings are still visited
    assert!(entries.iter().any(|e| e.path == "ok.txt"));

    Ok(())
}

#[test]
fn missing_root_is_fatal() {
    let config = test_config(Path::new("/definitely/not/a/real/path"));

    assert!(matches!(
        config.validate(),
        Err(TreeDumpError::PathNotFound(_))
    ));
    assert!(scanner_for(config).entries().is_err());
}

#[test]
fn respect_gitignore_prunes_matching_files() -> io::Result<()> {
    let temp_dir = tempdir()?;
    fs::write(temp_dir.path().join(".gitignore"), "*.log\n")?;
    fs::write(temp_dir.path().join("keep.txt"), "kept\n")?;
    fs::write(temp_dir.path().join("drop.log"), "dropped\n")?;

    let mut config = test_config(temp_dir.path());
    config.respect_gitignore = true;

    let entries = scanner_for(config).scan().unwrap();
    let paths: Vec<&str> = entries.iter().map(|e| e.path.as_str()).collect();

    assert!(paths.contains(&"keep.txt"));
    assert!(!paths.contains(&"drop.log"));

    Ok(())
}

#[test]
fn markdown_output_shape() -> io::Result<()> {
    let temp_dir = setup_spec_tree()?;

    let output = run_pipeline(test_config(temp_dir.path())).unwrap();

    assert!(output.contains("\n### a.txt\n@type: file\n@size: 6 bytes\n@depth: 1\n```text\nhello\n```\n---\n"));
    assert!(output.contains("\n### sub\n@type: dir\n@size: 0 bytes\n@depth: 1\n---\n"));
    assert!(output.contains("\n### sub/b.go\n@type: file\n@size: 10 bytes\n@depth: 2\n```go\npackage x\n```\n---\n"));

    Ok(())
}

#[test]
fn markdown_output_is_idempotent() -> io::Result<()> {
    let temp_dir = setup_spec_tree()?;

    let first = run_pipeline(test_config(temp_dir.path())).unwrap();
    let second = run_pipeline(test_config(temp_dir.path())).unwrap();

    assert_eq!(first, second);

    Ok(())
}

#[test]
fn json_output_round_trips() -> io::Result<()> {
    let temp_dir = setup_spec_tree()?;

    let mut config = test_config(temp_dir.path());
    config.format = FormatMode::Json;

    let expected_count = scanner_for(config.clone()).scan().unwrap().len();
    let output = run_pipeline(config).unwrap();

    let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
    let array = parsed.as_array().unwrap();
    assert_eq!(array.len(), expected_count);

    for object in array {
        for key in ["Path", "Kind", "Size", "Depth"] {
            assert!(object.get(key).is_some(), "missing key {}", key);
        }
    }

    // JSON runs carry full content
    let a = array.iter().find(|o| o["Path"] == "a.txt").unwrap();
    assert_eq!(a["Kind"], "file");
    assert_eq!(a["Size"], 6);
    assert_eq!(a["Content"], "hello\n");

    Ok(())
}

#[test]
fn json_output_is_valid_for_empty_tree() -> io::Result<()> {
    let temp_dir = tempdir()?;

    let mut config = test_config(temp_dir.path());
    config.format = FormatMode::Json;

    let output = run_pipeline(config).unwrap();

    let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(parsed.as_array().unwrap().len(), 0);

    Ok(())
}

#[test]
fn json_escapes_hostile_content() -> io::Result<()> {
    let temp_dir = tempdir()?;
    let tricky = "a \"quoted\" value, a back\\slash,\nand a fence:\n```\ndone";
    fs::write(temp_dir.path().join("tricky.txt"), tricky)?;

    let mut config = test_config(temp_dir.path());
    config.format = FormatMode::Json;

    let output = run_pipeline(config).unwrap();

    let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
    let array = parsed.as_array().unwrap();
    assert_eq!(array.len(), 1);
    assert_eq!(array[0]["Content"], tricky);

    Ok(())
}

#[test]
fn output_file_is_excluded_from_its_own_dump() -> io::Result<()> {
    let temp_dir = setup_spec_tree()?;
    let out_path = temp_dir.path().join("dump.md");
    File::create(&out_path)?;

    let mut config = test_config(temp_dir.path());
    config.output_file = Some(out_path);

    let entries = scanner_for(config).scan().unwrap();
    assert!(entries.iter().all(|e| e.path != "dump.md"));

    Ok(())
}

#[test]
fn utility_helpers() {
    assert_eq!(depth_of(""), 0);
    assert_eq!(depth_of("a.txt"), 1);
    assert_eq!(depth_of("sub/b.go"), 2);

    assert_eq!(normalize_rel(Path::new("sub").join("b.go").as_path()), "sub/b.go");

    assert_eq!(format_file_size(512), "512 bytes");
    assert_eq!(format_file_size(2048), "2.00 KB");
    assert_eq!(format_file_size(3 * 1024 * 1024), "3.00 MB");
}
