use netcfg_core::{diff, diff_with_options, format_json, format_summary, format_text, DiffEntry, DiffOptions};
use pretty_assertions::assert_eq;

const RUNNING: &str = "router bgp 65000
   bgp router-id 10.0.0.1
   neighbor 192.0.2.1 remote-as 65100
   neighbor 192.0.2.2 remote-as 65100
! generated 2024-01-01
";

const CANDIDATE: &str = "router bgp 65000
   bgp router-id 10.0.0.2
   neighbor 192.0.2.1 remote-as 65100
! generated 2024-06-01
";

#[test]
fn diff_reports_removed_then_added_lines() {
    let opts = DiffOptions {
        ignore_prefixes: vec!["!".to_string()],
        ..DiffOptions::default()
    };
    let entries = diff_with_options(RUNNING, CANDIDATE, &opts);

    assert_eq!(
        entries,
        vec![
            DiffEntry::Removed {
                line: 2,
                text: "   bgp router-id 10.0.0.1".to_string()
            },
            DiffEntry::Added {
                line: 2,
                text: "   bgp router-id 10.0.0.2".to_string()
            },
            DiffEntry::Removed {
                line: 4,
                text: "   neighbor 192.0.2.2 remote-as 65100".to_string()
            },
        ]
    );
}

#[test]
fn comments_show_up_without_ignore_prefix() {
    let entries = diff(RUNNING, CANDIDATE);
    assert!(entries
        .iter()
        .any(|entry| entry.text().starts_with("! generated")));
}

#[test]
fn formatters_render_entries() {
    let entries = diff("a\nb\n", "a\nc\n");

    assert_eq!(format_text(&entries), "- b\n+ c");
    assert_eq!(format_summary(&entries), "identical=0 added=1 removed=1");
    assert!(format_json(&entries)
        .expect("json")
        .contains("\"type\": \"Added\""));
}

#[test]
fn json_report_counts_changes_only() {
    let opts = DiffOptions {
        include_identical: true,
        ..DiffOptions::default()
    };
    let entries = diff_with_options("a\nb\n", "a\nc\nd\n", &opts);
    let report: serde_json::Value =
        serde_json::from_str(&format_json(&entries).expect("json")).expect("parse");

    assert_eq!(report["added"], 2);
    assert_eq!(report["removed"], 1);
    let texts: Vec<&str> = report["changes"]
        .as_array()
        .expect("changes")
        .iter()
        .map(|change| change["text"].as_str().expect("text"))
        .collect();
    assert_eq!(texts, vec!["b", "c", "d"]);
}

#[test]
fn empty_running_config_is_all_additions() {
    let entries = diff("", "a\nb\n");
    assert_eq!(entries.len(), 2);
    assert!(entries
        .iter()
        .all(|entry| matches!(entry, DiffEntry::Added { .. })));
}
