//! Append-only text outputs: the event log and the luminance CSV.

use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};

pub const CSV_HEADER: &str = "time,mean_luminance,preset_name";

/// Seconds since the Unix epoch, with fractional part.
pub fn unix_time() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0)
}

/// `<unix_time>;<message>` lines. Newlines in the message are flattened.
pub struct EventLog<W: Write = BufWriter<File>> {
    out: W,
    failed: bool,
}

impl EventLog {
    /// Opens `path` for appending, creating it if needed.
    pub fn append(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("failed to open event log {}", path.display()))?;
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write> EventLog<W> {
    pub fn new(out: W) -> Self {
        Self { out, failed: false }
    }

    pub fn log(&mut self, msg: impl AsRef<str>) {
        self.log_at(unix_time(), msg.as_ref());
    }

    fn log_at(&mut self, time: f64, msg: &str) {
        let msg = msg.replace(['\n', '\r'], " ");
        let res = writeln!(self.out, "{time:.6};{msg}").and_then(|()| self.out.flush());
        note_failure(&mut self.failed, "event log", res);
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

/// `time,mean_luminance,preset_name` rows, one per sampled frame.
pub struct LuminanceCsv<W: Write = BufWriter<File>> {
    out: W,
    failed: bool,
}

impl LuminanceCsv {
    /// Truncates `path` and writes the header.
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::create(path)
            .with_context(|| format!("failed to create luminance csv {}", path.display()))?;
        Self::new(BufWriter::new(file))
            .with_context(|| format!("failed to write header to {}", path.display()))
    }
}

impl<W: Write> LuminanceCsv<W> {
    pub fn new(mut out: W) -> io::Result<Self> {
        writeln!(out, "{CSV_HEADER}")?;
        out.flush()?;
        Ok(Self { out, failed: false })
    }

    pub fn record(&mut self, time: f32, mean_luminance: f64, preset: &str) {
        let res = writeln!(self.out, "{time:.3},{mean_luminance:.6},{}", csv_field(preset))
            .and_then(|()| self.out.flush());
        note_failure(&mut self.failed, "luminance csv", res);
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

/// Quotes a field when it holds a separator, quote or newline.
fn csv_field(s: &str) -> String {
    if s.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

/// Write errors are logged once per output and otherwise ignored.
fn note_failure(failed: &mut bool, what: &str, res: io::Result<()>) {
    if let Err(e) = res {
        if !*failed {
            log::warn!("{what}: write failed: {e}");
            *failed = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(bytes: Vec<u8>) -> String {
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn event_lines_are_time_semicolon_message() {
        let mut log = EventLog::new(Vec::new());
        log.log_at(1712345678.25, "loaded preset2.json");
        log.log_at(1712345679.5, "two\nlines");
        assert_eq!(
            text(log.into_inner()),
            "1712345678.250000;loaded preset2.json\n1712345679.500000;two lines\n"
        );
    }

    #[test]
    fn live_event_time_is_recent() {
        let mut log = EventLog::new(Vec::new());
        let before = unix_time();
        log.log("started");
        let line = text(log.into_inner());
        let (time, msg) = line.trim_end().split_once(';').unwrap();
        assert_eq!(msg, "started");
        let time: f64 = time.parse().unwrap();
        assert!(time >= before - 1e-3 && time < before + 60.0);
    }

    #[test]
    fn csv_starts_with_header() {
        let csv = LuminanceCsv::new(Vec::new()).unwrap();
        assert_eq!(text(csv.into_inner()), "time,mean_luminance,preset_name\n");
    }

    #[test]
    fn csv_rows_follow_header() {
        let mut csv = LuminanceCsv::new(Vec::new()).unwrap();
        csv.record(1.5, 0.25, "preset3.json");
        csv.record(2.0, 0.0, "default");
        let out = text(csv.into_inner());
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines, vec![CSV_HEADER, "1.500,0.250000,preset3.json", "2.000,0.000000,default"]);
    }

    #[test]
    fn csv_quotes_awkward_names() {
        assert_eq!(csv_field("a,b"), "\"a,b\"");
        assert_eq!(csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(csv_field("plain"), "plain");
    }

    #[test]
    fn files_truncate_and_append() {
        let dir = std::env::temp_dir().join(format!("algol-recorder-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();

        let csv_path = dir.join("lum.csv");
        std::fs::write(&csv_path, "stale\n").unwrap();
        let mut csv = LuminanceCsv::create(&csv_path).unwrap();
        csv.record(0.5, 0.1, "default");
        drop(csv);
        assert_eq!(
            std::fs::read_to_string(&csv_path).unwrap(),
            "time,mean_luminance,preset_name\n0.500,0.100000,default\n"
        );

        let log_path = dir.join("events.log");
        EventLog::append(&log_path).unwrap().log("one");
        EventLog::append(&log_path).unwrap().log("two");
        let logged = std::fs::read_to_string(&log_path).unwrap();
        let msgs: Vec<&str> = logged.lines().filter_map(|l| l.split_once(';')).map(|(_, m)| m).collect();
        assert_eq!(msgs, vec!["one", "two"]);

        let _ = std::fs::remove_dir_all(&dir);
    }
}
