use draftflow_core::storage::StoredRecord;
use draftflow_core::summary::PassSummary;
use serde_json::json;

use super::OutputFormat;

const PREVIEW_CHARS: usize = 60;

pub fn format_summary(pass: &str, summary: &PassSummary, fmt: OutputFormat) -> String {
    match fmt {
        OutputFormat::Json => {
            serde_json::to_string_pretty(&json!({ "pass": pass, "summary": summary }))
                .unwrap_or_default()
        }
        OutputFormat::Text => format!("{pass}: {summary}"),
    }
}

fn record_json(stored: &StoredRecord) -> serde_json::Value {
    json!({ "handle": stored.handle.as_str(), "record": stored.record })
}

pub fn format_record_list(records: &[StoredRecord], fmt: OutputFormat) -> String {
    match fmt {
        OutputFormat::Json => {
            let list: Vec<_> = records.iter().map(record_json).collect();
            serde_json::to_string_pretty(&list).unwrap_or_default()
        }
        OutputFormat::Text => format_record_list_text(records),
    }
}

fn format_record_list_text(records: &[StoredRecord]) -> String {
    if records.is_empty() {
        return "No records found.".to_string();
    }

    let mut out = String::new();
    for s in records {
        let rec = &s.record;
        let platform = rec.platform.map_or("none", |p| p.as_str());
        let time = rec.created_at().format("%Y-%m-%d %H:%M");
        let first_line = rec
            .content
            .as_deref()
            .and_then(|c| c.lines().next())
            .unwrap_or("(no content)");
        let mut preview: String = first_line.chars().take(PREVIEW_CHARS).collect();
        if first_line.chars().count() > PREVIEW_CHARS {
            preview.push_str("...");
        }
        out.push_str(&format!(
            "\u{25c6} {} [{}] {platform}/{} {preview}  {time}\n",
            s.handle,
            rec.status(),
            rec.kind,
        ));
    }
    out
}

pub fn format_record_full(stored: &StoredRecord, fmt: OutputFormat) -> String {
    match fmt {
        OutputFormat::Json => {
            serde_json::to_string_pretty(&record_json(stored)).unwrap_or_default()
        }
        OutputFormat::Text => format_record_full_text(stored),
    }
}

fn format_record_full_text(stored: &StoredRecord) -> String {
    let rec = &stored.record;
    let mut out = String::new();

    out.push_str(&format!("Record:   {}\n", stored.handle));
    out.push_str(&format!("Type:     {}\n", rec.kind));
    if let Some(platform) = rec.platform {
        out.push_str(&format!("Platform: {platform}\n"));
    }
    out.push_str(&format!("Status:   {}\n", rec.status()));
    if let Some(pillar) = &rec.pillar {
        out.push_str(&format!("Pillar:   {pillar}\n"));
    }
    out.push_str(&format!(
        "Created:  {}\n",
        rec.created_at().format("%Y-%m-%d %H:%M:%S UTC")
    ));
    if let Some(at) = rec.discord_sent_at {
        out.push_str(&format!("Reviewed: {}\n", at.format("%Y-%m-%d %H:%M:%S UTC")));
    }
    if let Some(at) = rec.posted_at {
        out.push_str(&format!(
            "Posted:   {}{}\n",
            at.format("%Y-%m-%d %H:%M:%S UTC"),
            rec.post_id
                .as_ref()
                .map(|id| format!(" ({id})"))
                .unwrap_or_default()
        ));
    }
    if let Some(media) = &rec.media {
        out.push_str(&format!("Media:    {media}\n"));
    }
    if let Some(path) = &rec.local_path {
        out.push_str(&format!("Asset:    {path}\n"));
    }
    if let Some(alt) = &rec.alt_text {
        out.push_str(&format!("Alt text: {alt}\n"));
    }
    if !rec.extra.is_empty() {
        let keys: Vec<_> = rec.extra.keys().map(String::as_str).collect();
        out.push_str(&format!("Extra:    {}\n", keys.join(", ")));
    }

    if let Some(content) = &rec.content {
        out.push_str(&format!(
            "\n--- Content ({} chars) ---\n",
            rec.content_len()
        ));
        out.push_str(content);
        out.push('\n');
    }

    out
}
