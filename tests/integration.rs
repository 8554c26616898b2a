//! Integration tests: a temporary inbox on disk, loaded and analysed
//! through the public API.

use chatstats::analysis::over_time::TOTAL_TITLE;
use chatstats::config::{InboxConfig, MILLIS_PER_DAY};
use chatstats::core::output::{PeopleTable, ReactsTable};
use chatstats::prelude::*;
use serde_json::{Value, json};
use std::fs;
use std::path::Path;
use tempfile::{TempDir, tempdir};

/// 2020-01-01T00:00:00Z
const START_MS: i64 = 1_577_836_800_000;

fn write_json(dir: &Path, file: &str, value: &Value) {
    fs::create_dir_all(dir).unwrap();
    fs::write(dir.join(file), serde_json::to_string_pretty(value).unwrap()).unwrap();
}

/// Re-encodes text the way Meta exports store it.
fn mojibake(text: &str) -> String {
    text.bytes().map(char::from).collect()
}

fn msg(sender: &str, day: i64, content: &str) -> Value {
    json!({
        "sender_name": mojibake(sender),
        "timestamp_ms": START_MS + day * MILLIS_PER_DAY,
        "content": mojibake(content),
    })
}

/// Inbox with:
/// - `alice_1`: 6 messages split over two files, mojibake names, reactions
/// - `group_2`: 3 messages, one from a former member
/// - `broken_3`: invalid JSON
/// - `photos`: a folder without any export file
fn setup_inbox() -> TempDir {
    let dir = tempdir().unwrap();
    let root = dir.path();

    let mut newest = msg("Zoë", 5, "à bientôt");
    newest["reactions"] = json!([{ "reaction": mojibake("😆"), "actor": "Me" }]);
    write_json(
        &root.join("alice_1"),
        "message_1.json",
        &json!({
            "participants": [{ "name": mojibake("Zoë") }, { "name": "Me" }],
            "messages": [newest, msg("Me", 4, "ok"), msg("Zoë", 3, "café?")],
            "title": mojibake("Zoë"),
        }),
    );
    let mut reacted = msg("Me", 0, "hello");
    reacted["reactions"] = json!([
        { "reaction": mojibake("👍"), "actor": mojibake("Zoë") },
        { "reaction": mojibake("🎉"), "actor": mojibake("Zoë") },
    ]);
    write_json(
        &root.join("alice_1"),
        "message_2.json",
        &json!({
            "participants": [{ "name": mojibake("Zoë") }, { "name": "Me" }],
            "messages": [msg("Zoë", 2, "hey"), msg("Me", 1, "you there?"), reacted],
            "title": mojibake("Zoë"),
        }),
    );

    write_json(
        &root.join("group_2"),
        "message_1.json",
        &json!({
            "participants": [{ "name": "Me" }, { "name": "Bob" }],
            "messages": [msg("Bob", 40, "bye"), msg("Carl", 35, "I left"), msg("Me", 31, "yo")],
            "title": "Weekend Plans",
        }),
    );

    fs::create_dir_all(root.join("broken_3")).unwrap();
    fs::write(root.join("broken_3").join("message_1.json"), "{ not json").unwrap();

    fs::create_dir_all(root.join("photos")).unwrap();
    fs::write(root.join("photos").join("image.jpg"), [0u8; 4]).unwrap();

    dir
}

// ============================================================================
// Loading
// ============================================================================

#[test]
fn test_discover_skips_folders_without_exports() {
    let dir = setup_inbox();
    let folders = InboxReader::new(dir.path()).discover().unwrap();
    assert_eq!(folders, vec!["alice_1", "broken_3", "group_2"]);
}

#[test]
fn test_load_all_lenient_skips_broken() {
    let dir = setup_inbox();
    let inbox = InboxReader::new(dir.path()).load_all().unwrap();

    assert_eq!(inbox.conversations.len(), 2);
    assert_eq!(inbox.skipped.len(), 1);
    assert_eq!(inbox.skipped[0].folder, "broken_3");
    assert_eq!(inbox.total_messages(), 9);
}

#[test]
fn test_load_all_strict_fails() {
    let dir = setup_inbox();
    let config = InboxConfig::new().with_skip_invalid(false);
    let err = InboxReader::new(dir.path())
        .with_config(config)
        .load_all()
        .unwrap_err();
    assert!(err.is_parse());
    assert!(err.to_string().contains("broken_3"));
}

#[test]
fn test_multi_part_conversation_merged_and_sorted() {
    let dir = setup_inbox();
    let chat = InboxReader::new(dir.path()).load("alice_1").unwrap();

    assert_eq!(chat.display_title(), "Zoë");
    assert_eq!(chat.participants, vec!["Zoë", "Me"]);
    assert_eq!(chat.message_count(), 6);
    assert!(chat.messages.windows(2).all(|w| w[0].timestamp_ms <= w[1].timestamp_ms));
    assert_eq!(chat.messages[0].content(), Some("hello"));
    assert_eq!(chat.messages[5].content(), Some("à bientôt"));
}

#[test]
fn test_raw_encoding_keeps_mojibake() {
    let dir = setup_inbox();
    let config = InboxConfig::new().with_fix_encoding(false);
    let chat = InboxReader::new(dir.path())
        .with_config(config)
        .load("alice_1")
        .unwrap();
    assert_eq!(chat.display_title(), mojibake("Zoë"));
}

#[test]
fn test_folder_filters() {
    let dir = setup_inbox();
    let config = InboxConfig::new().with_filter("group");
    let inbox = InboxReader::new(dir.path()).with_config(config).load_all().unwrap();
    assert_eq!(inbox.conversations.len(), 1);
    assert_eq!(inbox.conversations[0].display_title(), "Weekend Plans");
}

// ============================================================================
// Analyses over loaded data
// ============================================================================

fn load(dir: &TempDir) -> Vec<Conversation> {
    InboxReader::new(dir.path()).load_all().unwrap().conversations
}

#[test]
fn test_largest_chats_ranking() {
    let dir = setup_inbox();
    let convs = load(&dir);
    let config = AnalysisConfig::new().with_min_messages(0);
    let largest = largest_chats(&convs, &config);

    assert_eq!(largest.total_messages, 9);
    assert_eq!(largest.conversations[0].title, "Zoë");
    assert_eq!(largest.conversations[0].count, 6);
    assert_eq!(largest.conversations[1].count, 3);

    let people = to_tsv(&PeopleTable(&largest)).unwrap();
    assert!(people.contains("Zoë\tZoë\t3\t"));
    assert!(people.contains("Weekend Plans\tCarl\t1\t6"));
}

#[test]
fn test_largest_chats_date_window() {
    let dir = setup_inbox();
    let convs = load(&dir);
    // Days 30.. only: the group chat alone
    let config = AnalysisConfig::new()
        .with_min_messages(1)
        .with_start_date("2020-01-31")
        .unwrap();
    let largest = largest_chats(&convs, &config);

    assert_eq!(largest.conversations.len(), 1);
    assert_eq!(largest.conversations[0].title, "Weekend Plans");
    assert_eq!(largest.total_messages, 3);
}

#[test]
fn test_end_date_inclusive() {
    let dir = setup_inbox();
    let convs = load(&dir);
    // 2020-01-06 is day 5, the last alice_1 message
    let config = AnalysisConfig::new()
        .with_min_messages(0)
        .with_end_date("2020-01-06")
        .unwrap();
    let largest = largest_chats(&convs, &config);
    assert_eq!(largest.total_messages, 6);
}

#[test]
fn test_reacts_from_mojibake_exports() {
    let dir = setup_inbox();
    let convs = load(&dir);
    let stats = reacts_stats(&convs, &AnalysisConfig::new().with_min_messages(0));

    let alice = stats.iter().find(|r| r.folder == "alice_1").unwrap();
    let me = alice.people.iter().find(|p| p.name == "Me").unwrap();
    let zoe = alice.people.iter().find(|p| p.name == "Zoë").unwrap();

    assert_eq!(me.received_count(ReactionKind::ThumbsUp), 1);
    assert_eq!(me.received_count(ReactionKind::Other), 1);
    assert_eq!(zoe.given_count(ReactionKind::ThumbsUp), 1);
    assert_eq!(zoe.received_count(ReactionKind::Laughing), 1);
    assert_eq!(me.given_count(ReactionKind::Laughing), 1);

    let received = to_tsv(&ReactsTable::received(alice)).unwrap();
    assert!(received.contains("Me\t1\t0\t0\t0\t0\t0\t0\t3\t"));

    // former members never show up
    let group = stats.iter().find(|r| r.folder == "group_2").unwrap();
    assert!(group.people.iter().all(|p| p.name != "Carl"));
    assert_eq!(group.total_messages, 3);
}

#[test]
fn test_over_time_totals() {
    let dir = setup_inbox();
    let convs = load(&dir);
    let config = AnalysisConfig::new().with_interval_days(30);
    let over_time = largest_chats_over_time(&convs, &config);

    // days 0..=40 → intervals starting at day 0 and day 30
    assert_eq!(over_time.intervals.len(), 2);
    assert_eq!(over_time.totals(), vec![6, 3]);
    assert_eq!(over_time.intervals[1].top[0].title, "Weekend Plans");

    let tsv = to_tsv(&over_time).unwrap();
    assert_eq!(tsv.matches(TOTAL_TITLE).count(), 2);
}

#[test]
fn test_time_series_drops_intro_messages() {
    let dir = setup_inbox();
    let convs = load(&dir);
    let series = time_series(&convs, &AnalysisConfig::new().with_min_messages(0));

    let alice = series.iter().find(|s| s.folder == "alice_1").unwrap();
    assert_eq!(alice.timestamps.len(), 4);
    assert_eq!(alice.histogram.total(), 4);
    assert_eq!(alice.timestamps[0], START_MS + 2 * MILLIS_PER_DAY);
}

#[test]
fn test_time_series_date_window_keeps_real_messages() {
    let dir = setup_inbox();
    let convs = load(&dir);
    // Window opens on day 2, right after the two introduction messages
    let config = AnalysisConfig::new()
        .with_min_messages(0)
        .with_start_date("2020-01-03")
        .unwrap();
    let series = time_series(&convs, &config);

    let alice = series.iter().find(|s| s.folder == "alice_1").unwrap();
    assert_eq!(alice.timestamps.len(), 4);
    assert_eq!(alice.histogram.total(), 4);
}

#[test]
fn test_sizes() {
    let dir = setup_inbox();
    let convs = load(&dir);
    let sizes = conversation_sizes(&convs, &AnalysisConfig::new());
    assert_eq!(sizes.sizes.len(), 2);
    assert_eq!(sizes.histogram.total(), 2);
}

// ============================================================================
// Full run
// ============================================================================

#[test]
fn test_run_writes_every_report() {
    let inbox = setup_inbox();
    let out = tempdir().unwrap();
    let config = AnalysisConfig::new()
        .with_min_messages(3)
        .with_charts(false)
        .with_output_dir(out.path());

    let summary = run(Analysis::All, inbox.path(), &config).unwrap();

    assert_eq!(summary.conversations, 2);
    assert_eq!(summary.skipped, vec!["broken_3"]);
    assert_eq!(summary.total_messages, 9);

    let o = out.path();
    for file in [
        "largest_chats/data.tsv",
        "largest_chats/people.tsv",
        "largest_chats_over_time/data.tsv",
        "conversation_stats/alice_1/reacts_received.tsv",
        "conversation_stats/alice_1/reacts_given.tsv",
        "conversation_stats/group_2/reacts_received.tsv",
        "time_series/alice_1/data.tsv",
        "time_series/alice_1/rate.tsv",
        "conversation_sizes/data.tsv",
    ] {
        assert!(o.join(file).is_file(), "missing {file}");
    }
    // group_2 has 1 message left after dropping the introduction
    assert!(!o.join("time_series/group_2").exists());

    let data = fs::read_to_string(o.join("largest_chats/data.tsv")).unwrap();
    assert!(data.starts_with("rank\ttitle\tfolder\tcount\tchars\n1\tZoë\talice_1\t6\t"));
}

#[test]
fn test_run_twice_replaces_output() {
    let inbox = setup_inbox();
    let out = tempdir().unwrap();
    let stale = out.path().join("conversation_stats").join("old_chat");
    fs::create_dir_all(&stale).unwrap();

    let config = AnalysisConfig::new()
        .with_min_messages(0)
        .with_charts(false)
        .with_output_dir(out.path());
    run(Analysis::Reacts, inbox.path(), &config).unwrap();

    assert!(!stale.exists());
    assert!(out.path().join("conversation_stats/alice_1").is_dir());
}

#[test]
fn test_run_missing_inbox() {
    let out = tempdir().unwrap();
    let config = AnalysisConfig::new().with_output_dir(out.path());
    let err = run(Analysis::Largest, &out.path().join("nope"), &config).unwrap_err();
    assert!(err.is_io());
}

// ============================================================================
// Charts
// ============================================================================

#[cfg(feature = "charts")]
mod charts {
    use super::*;

    fn chat(folder: &str, count: i64) -> Conversation {
        let messages = (0..count)
            .map(|i| {
                let sender = if i % 3 == 0 { "Alice" } else { "Me" };
                Message::new(sender, START_MS + i * MILLIS_PER_DAY / 4)
                    .with_content("hello there")
                    .with_reaction(Reaction::new("👍", "Me"))
            })
            .collect();
        Conversation::new(folder)
            .with_title(folder.to_uppercase())
            .with_participants(["Alice", "Me"])
            .with_messages(messages)
    }

    fn assert_png(path: &Path) {
        let meta = fs::metadata(path).unwrap_or_else(|e| panic!("{}: {e}", path.display()));
        assert!(meta.len() > 0, "empty {}", path.display());
    }

    #[test]
    fn test_run_renders_every_chart() {
        let out = tempdir().unwrap();
        let config = AnalysisConfig::new()
            .with_min_messages(0)
            .with_output_dir(out.path());
        let convs = vec![chat("busy", 300), chat("quiet", 5), chat("single", 1)];

        let summary = run_on(Analysis::All, &convs, &config).unwrap();
        assert_eq!(summary.chart_failures(), 0);

        let o = out.path();
        let mut expected = vec![
            o.join("largest_chats/top_chats.png"),
            o.join("largest_chats_over_time/total_messages.png"),
            o.join("conversation_sizes/histogram.png"),
        ];
        for folder in ["busy", "quiet", "single"] {
            expected.push(o.join("conversation_stats").join(folder).join("reacts_received.png"));
            expected.push(o.join("conversation_stats").join(folder).join("reacts_given.png"));
            expected.push(o.join("time_series").join(folder).join("messages_rate_over_time.png"));
            expected.push(o.join("time_series").join(folder).join("total_messages_over_time.png"));
        }
        for path in &expected {
            assert_png(path);
        }

        let rendered: usize = summary.outputs.iter().map(|o| o.charts.len()).sum();
        assert_eq!(rendered, expected.len());
    }

    #[test]
    fn test_degenerate_inputs_render() {
        let out = tempdir().unwrap();
        let config = AnalysisConfig::new()
            .with_min_messages(0)
            .with_sort_by(SortKey::Chars)
            .with_output_dir(out.path());
        // One message, and a burst sharing one timestamp
        let burst = Conversation::new("burst")
            .with_participants(["Me"])
            .with_messages((0..4).map(|_| Message::new("Me", START_MS)).collect());
        let convs = vec![chat("single", 1), burst];

        let summary = run_on(Analysis::All, &convs, &config).unwrap();
        assert_eq!(summary.chart_failures(), 0);
        assert_png(&out.path().join("time_series/single/messages_rate_over_time.png"));
        assert_png(&out.path().join("time_series/burst/total_messages_over_time.png"));
        assert_png(&out.path().join("largest_chats_over_time/total_messages.png"));
        assert_png(&out.path().join("conversation_sizes/histogram.png"));
    }
}
