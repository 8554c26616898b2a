//! Synthetic inbox generator for exercising chatstats on large exports.
//!
//! Usage: cargo run --features gen-test --bin gen_inbox -- [conversations] [max_messages] [output]
//! Example: cargo run --features gen-test --bin gen_inbox -- 200 5000 messages/inbox
//!
//! Files mimic a real Meta export: text is stored as Latin-1 mojibake,
//! messages are listed newest first, and large conversations are split
//! into `message_1.json`, `message_2.json`, …

use std::env;
use std::error::Error;
use std::fs;
use std::path::Path;

use rand::Rng;
use rand::seq::SliceRandom;
use serde_json::{Value, json};

/// Messages per export file, as in real downloads.
const MESSAGES_PER_FILE: usize = 10_000;

/// 2015-01-01T00:00:00Z
const EPOCH_MS: i64 = 1_420_070_400_000;
const DAY_MS: i64 = 86_400_000;

const NAMES: &[&str] = &[
    "Alice Martin",
    "Bob Nowak",
    "Chloé Dubois",
    "Dmitri Ivanov",
    "Eve Johansson",
    "Frank Müller",
    "Grace Ho",
    "Hiroshi Tanaka",
    "Inès Moreau",
    "José García",
];

const WORDS: &[&str] = &[
    "hey", "lol", "ok", "see", "you", "tomorrow", "did", "watch", "that", "café", "naïve",
    "déjà", "vu", "really", "no", "way", "😂", "🎉", "❤️", "on", "my", "way", "dinner", "?",
];

const REACTIONS: &[&str] = &["👍", "👎", "😆", "😍", "😠", "😢", "😮", "❤", "🔥"];

/// Re-encodes UTF-8 text the way Meta exports it: each byte as a code point.
fn mojibake(text: &str) -> String {
    text.bytes().map(char::from).collect()
}

fn sentence<R: Rng>(rng: &mut R) -> String {
    let len = rng.gen_range(1..12);
    (0..len)
        .filter_map(|_| WORDS.choose(rng).copied())
        .collect::<Vec<_>>()
        .join(" ")
}

fn message<R: Rng>(rng: &mut R, participants: &[&str], timestamp_ms: i64) -> Value {
    let sender = participants.choose(rng).copied().unwrap_or("Unknown");
    let mut msg = json!({
        "sender_name": mojibake(sender),
        "timestamp_ms": timestamp_ms,
    });

    match rng.gen_range(0..100) {
        0..=1 => msg["call_duration"] = json!(rng.gen_range(0..3600)),
        2..=5 => msg["sticker"] = json!({ "uri": "messages/stickers_used/sticker.png" }),
        _ => msg["content"] = json!(mojibake(&sentence(rng))),
    }

    if rng.gen_bool(0.15) {
        let mut reactions = Vec::new();
        for actor in participants {
            if rng.gen_bool(0.4) {
                let emoji = REACTIONS.choose(rng).copied().unwrap_or("👍");
                reactions.push(json!({
                    "reaction": mojibake(emoji),
                    "actor": mojibake(actor),
                }));
            }
        }
        if !reactions.is_empty() {
            msg["reactions"] = Value::Array(reactions);
        }
    }
    msg
}

fn write_conversation<R: Rng>(
    rng: &mut R,
    root: &Path,
    index: usize,
    max_messages: usize,
) -> Result<usize, Box<dyn Error>> {
    let size = rng.gen_range(2..=4);
    let participants: Vec<&str> = NAMES.choose_multiple(rng, size).copied().collect();
    let title = if size == 2 {
        participants[1].to_string()
    } else {
        format!("Group {index}")
    };
    let folder = format!(
        "{}_{}",
        title.to_lowercase().replace(' ', ""),
        rng.gen_range(1_000_000..10_000_000)
    );

    // Heavy-tailed sizes: most chats are small, a few are huge.
    let count = ((max_messages as f64) * rng.gen_range(0.0f64..1.0).powi(3)) as usize + 1;
    let start = EPOCH_MS + rng.gen_range(0..3 * 365) * DAY_MS;
    let span = rng.gen_range(DAY_MS..4 * 365 * DAY_MS);
    let mut timestamps: Vec<i64> = (0..count).map(|_| start + rng.gen_range(0..span)).collect();
    timestamps.sort_unstable_by(|a, b| b.cmp(a));

    let dir = root.join(&folder);
    fs::create_dir_all(&dir)?;

    let participant_list: Vec<Value> = participants
        .iter()
        .map(|name| json!({ "name": mojibake(name) }))
        .collect();

    for (part, chunk) in timestamps.chunks(MESSAGES_PER_FILE).enumerate() {
        let messages: Vec<Value> = chunk
            .iter()
            .map(|&t| message(rng, &participants, t))
            .collect();
        let export = json!({
            "participants": participant_list,
            "messages": messages,
            "title": mojibake(&title),
            "thread_path": format!("inbox/{folder}"),
        });
        let path = dir.join(format!("message_{}.json", part + 1));
        fs::write(path, serde_json::to_string_pretty(&export)?)?;
    }

    Ok(count)
}

fn main() -> Result<(), Box<dyn Error>> {
    let args: Vec<String> = env::args().collect();

    let conversations: usize = args.get(1).and_then(|s| s.parse().ok()).unwrap_or(50);
    let max_messages: usize = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(20_000);
    let output = args.get(3).map(|s| s.as_str()).unwrap_or("messages/inbox");

    println!("🧪 Inbox Generator");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("   Conversations: {}", conversations);
    println!("   Max messages:  {}", max_messages);
    println!("   Output:        {}", output);
    println!();

    let root = Path::new(output);
    fs::create_dir_all(root)?;

    let start = std::time::Instant::now();
    let mut rng = rand::thread_rng();
    let mut total = 0;
    for i in 0..conversations {
        total += write_conversation(&mut rng, root, i, max_messages.max(1))?;
    }

    println!(
        "✅ Wrote {} messages in {} conversations ({:.2}s)",
        total,
        conversations,
        start.elapsed().as_secs_f64()
    );
    Ok(())
}
