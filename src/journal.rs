use std::collections::BTreeMap;
use std::fs::OpenOptions;
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use parking_lot::Mutex;
use serde::Serialize;
use tracing::debug;

use crate::types::{Outcome, SignalRecord};

/// Hook the scanner calls once per delivered signal.
pub trait DecisionLog: Send + Sync {
    fn append(&self, record: &SignalRecord) -> Result<()>;
}

/// Per-day performance roll-up.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DailySummary {
    pub date: Option<NaiveDate>,
    pub total: usize,
    pub by_strategy: BTreeMap<String, usize>,
    pub by_outcome: BTreeMap<Outcome, usize>,
}

/// Append-only JSON-lines log of sent signals.
pub struct Journal {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl Journal {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Every record dated `day`. A missing file reads as empty.
    pub fn read_day(&self, day: NaiveDate) -> Result<Vec<SignalRecord>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let file = std::fs::File::open(&self.path)
            .with_context(|| format!("failed to open {}", self.path.display()))?;
        let mut records = Vec::new();
        for (n, line) in BufReader::new(file).lines().enumerate() {
            let line = line.with_context(|| format!("failed to read {}", self.path.display()))?;
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<SignalRecord>(&line) {
                Ok(record) if record.date == day => records.push(record),
                Ok(_) => {}
                Err(e) => debug!(line = n + 1, error = %e, "skipping malformed journal line"),
            }
        }
        Ok(records)
    }

    pub fn daily_summary(&self, day: NaiveDate) -> Result<DailySummary> {
        let records = self.read_day(day)?;
        let mut summary = DailySummary {
            date: Some(day),
            total: records.len(),
            ..DailySummary::default()
        };
        for record in &records {
            for strategy in &record.strategies {
                *summary.by_strategy.entry(strategy.clone()).or_default() += 1;
            }
            *summary.by_outcome.entry(record.outcome).or_default() += 1;
        }
        Ok(summary)
    }
}

impl DecisionLog for Journal {
    fn append(&self, record: &SignalRecord) -> Result<()> {
        let line = serde_json::to_string(record).context("failed to serialize signal record")?;
        let _guard = self.write_lock.lock();
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("failed to open {}", self.path.display()))?;
        writeln!(file, "{line}").with_context(|| format!("failed to write {}", self.path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Period;

    fn temp_journal(name: &str) -> Journal {
        let path = std::env::temp_dir().join(format!(
            "corner-signals-{}-{}.jsonl",
            name,
            std::process::id()
        ));
        let _ = std::fs::remove_file(&path);
        Journal::new(path)
    }

    fn record(day: NaiveDate, strategies: &[&str], outcome: Outcome) -> SignalRecord {
        SignalRecord {
            date: day,
            time: "20:15".into(),
            match_id: 1,
            match_label: "Burnley x Leeds".into(),
            league: "Championship".into(),
            minute: 35.0,
            period: Period::FirstHalf,
            score: "0-0".into(),
            total_corners: 4,
            strategies: strategies.iter().map(|s| s.to_string()).collect(),
            outcome,
        }
    }

    #[test]
    fn missing_file_is_empty() {
        let journal = temp_journal("missing");
        let day = NaiveDate::from_ymd_opt(2024, 3, 2).expect("valid date");
        assert!(journal.read_day(day).expect("readable").is_empty());
        assert_eq!(journal.daily_summary(day).expect("summary").total, 0);
    }

    #[test]
    fn append_and_summarize_one_day() {
        let journal = temp_journal("summary");
        let day = NaiveDate::from_ymd_opt(2024, 3, 2).expect("valid date");
        let other = NaiveDate::from_ymd_opt(2024, 3, 1).expect("valid date");

        journal.append(&record(day, &["A", "B"], Outcome::Pending)).expect("append");
        journal.append(&record(day, &["A"], Outcome::Green)).expect("append");
        journal.append(&record(other, &["C"], Outcome::Red)).expect("append");

        let summary = journal.daily_summary(day).expect("summary");
        assert_eq!(summary.total, 2);
        assert_eq!(summary.by_strategy.get("A"), Some(&2));
        assert_eq!(summary.by_strategy.get("B"), Some(&1));
        assert!(!summary.by_strategy.contains_key("C"));
        assert_eq!(summary.by_outcome.get(&Outcome::Green), Some(&1));

        let _ = std::fs::remove_file(journal.path());
    }

    #[test]
    fn malformed_lines_are_skipped() {
        let journal = temp_journal("malformed");
        let day = NaiveDate::from_ymd_opt(2024, 3, 2).expect("valid date");
        journal.append(&record(day, &["A"], Outcome::Pending)).expect("append");
        {
            let mut file = OpenOptions::new()
                .append(true)
                .open(journal.path())
                .expect("open");
            writeln!(file, "not json").expect("write");
        }
        assert_eq!(journal.read_day(day).expect("readable").len(), 1);
        let _ = std::fs::remove_file(journal.path());
    }
}
