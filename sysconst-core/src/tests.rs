//! End-to-end test suite for sysconst-core.

use crate::ast::{Call, Define, Description, Ident, Include, Int, Node, Pos, StrLit};
use crate::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

static TEST_COUNTER: AtomicU64 = AtomicU64::new(0);

fn write_file(file: &Path, content: &str) {
    fs::create_dir_all(file.parent().unwrap()).unwrap();
    fs::write(file, content).unwrap();
}

fn setup_temp_dir() -> PathBuf {
    let id = TEST_COUNTER.fetch_add(1, Ordering::SeqCst);
    let timestamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let dir = std::env::temp_dir()
        .join("sysconst_tests")
        .join(format!("{}_{}", timestamp, id));

    if dir.exists() {
        fs::remove_dir_all(&dir).ok();
    }
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn glob_in(dir: &Path, pattern: &str) -> String {
    dir.join(pattern).to_string_lossy().to_string()
}

fn mapping(pairs: &[(&str, u64)]) -> ConstMapping {
    pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
}

// Aggregation: same constant, same value in two files
#[test]
fn test_glob_merges_agreeing_files() {
    let dir = setup_temp_dir();
    write_file(&dir.join("fs_amd64.const"), "# AUTOGENERATED FILE\nO_RDONLY = 0\n__NR_open = 2\n");
    write_file(&dir.join("fs_arm64.const"), "# AUTOGENERATED FILE\nO_RDONLY = 0\nO_DIRECTORY = 0x4000\n");

    let mut diags = Diagnostics::new();
    let consts = deserialize_consts_glob(&glob_in(&dir, "*.const"), Some(&mut diags)).unwrap();

    assert!(diags.is_empty(), "unexpected diagnostics: {:?}", diags);
    assert_eq!(
        consts,
        mapping(&[("O_RDONLY", 0), ("__NR_open", 2), ("O_DIRECTORY", 0x4000)])
    );
}

// Aggregation: same constant, different values
#[test]
fn test_glob_conflict_fails() {
    let dir = setup_temp_dir();
    write_file(&dir.join("a.const"), "O_DIRECT = 16384\n");
    write_file(&dir.join("b.const"), "O_DIRECT = 65536\n");

    let mut diags = Diagnostics::new();
    let err = deserialize_consts_glob(&glob_in(&dir, "*.const"), Some(&mut diags)).unwrap_err();

    assert!(matches!(
        err,
        SysconstError::Conflict { value: 65536, previous: 16384, .. }
    ));
    assert_eq!(diags.count_matching("different values for const \"O_DIRECT\""), 1);
}

// A conflict aborts before later files are read
#[test]
fn test_glob_conflict_short_circuits() {
    let dir = setup_temp_dir();
    write_file(&dir.join("1.const"), "X = 1\n");
    write_file(&dir.join("2.const"), "X = 2\n");
    write_file(&dir.join("3.const"), "garbage\n");

    let mut diags = Diagnostics::new();
    let err = deserialize_consts_glob(&glob_in(&dir, "*.const"), Some(&mut diags)).unwrap_err();

    assert!(matches!(err, SysconstError::Conflict { .. }));
    assert_eq!(diags.count_matching("expect '='"), 0);
}

// A bad file does not stop the remaining files from being checked
#[test]
fn test_glob_reports_all_bad_files() {
    let dir = setup_temp_dir();
    write_file(&dir.join("a.const"), "A = 1\nbroken\n");
    write_file(&dir.join("b.const"), "B = 2\n");
    write_file(&dir.join("c.const"), "C = x\n");

    let mut diags = Diagnostics::new();
    let err = deserialize_consts_glob(&glob_in(&dir, "*.const"), Some(&mut diags)).unwrap_err();

    match err {
        SysconstError::ConstFiles { failed } => assert_eq!(failed, vec!["a.const", "c.const"]),
        other => panic!("unexpected error: {:?}", other),
    }
    assert_eq!(diags.count_matching("expect '='"), 1);
    assert_eq!(diags.count_matching("failed to parse int"), 1);
    let files: Vec<&str> = diags.iter().map(|d| d.pos.file.as_str()).collect();
    assert_eq!(files, vec!["a.const", "c.const"]);
}

// After a bad file, later conflicts are not merged (and not reported)
#[test]
fn test_glob_stops_merging_after_bad_file() {
    let dir = setup_temp_dir();
    write_file(&dir.join("a.const"), "bad line\n");
    write_file(&dir.join("b.const"), "X = 1\n");
    write_file(&dir.join("c.const"), "X = 2\n");

    let mut diags = Diagnostics::new();
    let err = deserialize_consts_glob(&glob_in(&dir, "*.const"), Some(&mut diags)).unwrap_err();

    assert!(matches!(err, SysconstError::ConstFiles { .. }));
    assert_eq!(diags.count_matching("different values"), 0);
}

#[test]
fn test_glob_ignores_directories() {
    let dir = setup_temp_dir();
    fs::create_dir_all(dir.join("sub.const")).unwrap();
    write_file(&dir.join("x.const"), "X = 7\n");

    let consts = deserialize_consts_glob(&glob_in(&dir, "*.const"), None).unwrap();
    assert_eq!(consts, mapping(&[("X", 7)]));
}

#[cfg(unix)]
#[test]
fn test_glob_unreadable_file_is_fatal() {
    let dir = setup_temp_dir();
    write_file(&dir.join("a.const"), "X = 1\n");
    std::os::unix::fs::symlink(dir.join("missing"), dir.join("b.const")).unwrap();
    write_file(&dir.join("c.const"), "X = 2\n");

    let mut diags = Diagnostics::new();
    let err = deserialize_consts_glob(&glob_in(&dir, "*.const"), Some(&mut diags)).unwrap_err();

    assert!(matches!(err, SysconstError::Io { ref path, .. } if path.ends_with("b.const")));
    assert_eq!(diags.len(), 1);
    assert_eq!(diags.count_matching("failed to read const file"), 1);
}

#[test]
fn test_glob_no_match_in_empty_dir() {
    let dir = setup_temp_dir();
    let mut diags = Diagnostics::new();
    let err = deserialize_consts_glob(&glob_in(&dir, "*.const"), Some(&mut diags)).unwrap_err();
    assert!(matches!(err, SysconstError::NoMatch { .. }));
    assert_eq!(diags.len(), 1);
}

// Persisted files are canonical and decode back to the same mapping
#[test]
fn test_write_then_load() {
    let dir = setup_temp_dir();
    let consts = mapping(&[("__NR_mmap", 9), ("PROT_READ", 1), ("MAP_SHARED", 1)]);
    let path = dir.join("nested/mm_amd64.const");

    write_const_file(&path, &consts).unwrap();

    let text = fs::read_to_string(&path).unwrap();
    assert_eq!(
        text,
        "# AUTOGENERATED FILE\nMAP_SHARED = 1\nPROT_READ = 1\n__NR_mmap = 9\n"
    );
    let loaded = deserialize_consts_glob(&glob_in(&dir, "nested/*.const"), None).unwrap();
    assert_eq!(loaded, consts);

    // No temp files left behind
    let entries: Vec<_> = fs::read_dir(dir.join("nested")).unwrap().flatten().collect();
    assert_eq!(entries.len(), 1);
}

#[test]
fn test_write_overwrites_existing() {
    let dir = setup_temp_dir();
    let path = dir.join("x.const");
    write_file(&path, "OLD = 1\n");

    write_const_file(&path, &mapping(&[("NEW", 2)])).unwrap();
    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "# AUTOGENERATED FILE\nNEW = 2\n"
    );
}

// Extraction feeds straight into a lookup against known values
#[test]
fn test_extract_then_find_unresolved() {
    let p = |line| Pos::new("fs.txt", line, 1);
    let desc = Description {
        nodes: vec![
            Node::Include(Include {
                pos: p(1),
                file: StrLit::new(p(1), "linux/fs.h"),
            }),
            Node::Define(Define {
                pos: p(2),
                name: Ident::new(p(2), "MY_FLAG"),
                value: Int::cexpr(p(2), "O_RDWR | O_CLOEXEC"),
            }),
            Node::Call(Call::new(p(3), Ident::new(p(3), "open"))),
            Node::Call(Call::new(p(4), Ident::new(p(4), "syz_mount_image$ext4"))),
        ],
    };

    let mut diags = Diagnostics::new();
    let info = extract_consts(&desc, &mut diags).unwrap();
    assert_eq!(info.includes, vec!["linux/fs.h"]);
    assert_eq!(info.defines["MY_FLAG"], "O_RDWR | O_CLOEXEC");
    assert_eq!(info.consts, vec!["MY_FLAG", "__NR_open"]);

    let dir = setup_temp_dir();
    write_file(&dir.join("fs_amd64.const"), "__NR_open = 2\n");
    let known = deserialize_consts_glob(&glob_in(&dir, "*.const"), Some(&mut diags)).unwrap();

    let missing: Vec<&String> = info.consts.iter().filter(|c| !known.contains_key(*c)).collect();
    assert_eq!(missing, vec!["MY_FLAG"]);
}

// Extraction failure yields no info even though the walk completed
#[test]
fn test_extract_failure_discards_info() {
    let p = |line| Pos::new("dup.txt", line, 1);
    let include = |line| {
        Node::Include(Include {
            pos: p(line),
            file: StrLit::new(p(line), "x.h"),
        })
    };
    let desc = Description {
        nodes: vec![include(1), include(2), Node::Call(Call::new(p(3), Ident::new(p(3), "read")))],
    };

    let mut diags = Diagnostics::new();
    let result = extract_consts(&desc, &mut diags);
    assert!(matches!(result, Err(SysconstError::Extract { errors: 1 })));
    assert_eq!(diags.count_matching("duplicate include"), 1);
    assert_eq!(diags.iter().next().unwrap().pos.to_string(), "dup.txt:2:1");
}

#[test]
fn test_description_json_round_trip_through_extractor() {
    let json = r#"{"nodes": [
        {"kind": "call", "pos": {"file": "s.txt", "line": 1, "col": 1},
         "name": {"pos": {"file": "s.txt", "line": 1, "col": 1}, "name": "ioctl$TCGETS"},
         "call_name": "ioctl",
         "args": [{"pos": {"file": "s.txt", "line": 1, "col": 14},
                   "name": {"pos": {"file": "s.txt", "line": 1, "col": 14}, "name": "cmd"},
                   "type": {"pos": {"file": "s.txt", "line": 1, "col": 18}, "ident": "const",
                            "const_ref": {"ident": "TCGETS"}}}]}
    ]}"#;
    let desc: Description = serde_json::from_str(json).unwrap();
    let info = extract_consts(&desc, &mut Diagnostics::new()).unwrap();
    assert_eq!(info.consts, vec!["TCGETS", "__NR_ioctl"]);
}
