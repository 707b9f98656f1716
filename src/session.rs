//! JSONL session log.
//!
//! Every discrete input event is appended as one timestamped JSON line,
//! so a browsing session can be replayed or inspected afterwards.

use crate::state::{SortDir, SortKey};
use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

pub struct SessionLog {
    pub path: PathBuf,
    session_id: String,
    file: File,
}

#[derive(Serialize)]
struct Event<'a> {
    ts: DateTime<Utc>,
    session_id: &'a str,
    #[serde(rename = "type")]
    event_type: &'a str,
    #[serde(flatten)]
    data: serde_json::Value,
}

impl SessionLog {
    pub fn new(path: &Path, session_id: &str) -> Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;

        Ok(Self {
            path: path.to_path_buf(),
            session_id: session_id.to_string(),
            file,
        })
    }

    pub fn log(&mut self, event_type: &str, data: serde_json::Value) -> Result<()> {
        let event = Event {
            ts: Utc::now(),
            session_id: &self.session_id,
            event_type,
            data,
        };
        let line = serde_json::to_string(&event)?;
        writeln!(self.file, "{}", line)?;
        self.file.flush()?;
        Ok(())
    }

    pub fn session_start(&mut self, data_source: &str, interactive: bool) -> Result<()> {
        self.log(
            "session_start",
            serde_json::json!({
                "data_source": data_source,
                "interactive": interactive,
            }),
        )
    }

    pub fn query_changed(&mut self, query: &str, visible: usize) -> Result<()> {
        self.log(
            "query_changed",
            serde_json::json!({ "query": query, "visible": visible }),
        )
    }

    pub fn user_selected(&mut self, user_id: Option<u32>, visible: usize) -> Result<()> {
        self.log(
            "user_selected",
            serde_json::json!({ "user_id": user_id, "visible": visible }),
        )
    }

    pub fn category_selected(&mut self, category_id: Option<u32>, visible: usize) -> Result<()> {
        self.log(
            "category_selected",
            serde_json::json!({ "category_id": category_id, "visible": visible }),
        )
    }

    pub fn sort_changed(&mut self, sort: Option<(SortKey, SortDir)>) -> Result<()> {
        self.log(
            "sort_changed",
            serde_json::json!({
                "key": sort.map(|(key, _)| key.as_str()),
                "dir": sort.map(|(_, dir)| dir.as_str()),
            }),
        )
    }

    pub fn reset(&mut self) -> Result<()> {
        self.log("reset", serde_json::json!({}))
    }

    pub fn one_shot(&mut self, query: &str, visible: usize) -> Result<()> {
        self.log(
            "one_shot",
            serde_json::json!({ "query": query, "visible": visible }),
        )
    }
}
