//! `ioreg` backend: runs the registry dump tool and parses its text output.
//!
//! The tool prints one object per `+-o` header followed by a `{ ... }` block of
//! `"Key" = value` lines. Only the first object's properties are collected.

use std::io::Read;
use std::path::PathBuf;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::time::Duration;

use battinfo_traits::{PropertySource, RawPropertyBag, RawValue};

use crate::error::{Result, SourceError};
use crate::util::poll_until_some;

pub const DEFAULT_IOREG_PATH: &str = "/usr/sbin/ioreg";
pub const DEFAULT_CLASS: &str = "AppleSmartBattery";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(2);

const EXIT_POLL_INTERVAL: Duration = Duration::from_millis(2);

/// Nesting limit for `{...}` values; a line nested deeper is dropped whole.
const MAX_DEPTH: usize = 32;

/// Owns a spawned child and guarantees it is killed and reaped on drop,
/// whichever way the caller leaves.
pub struct ChildGuard {
    child: Option<Child>,
    program: String,
}

impl ChildGuard {
    pub fn new(child: Child, program: impl Into<String>) -> Self {
        Self {
            child: Some(child),
            program: program.into(),
        }
    }

    pub fn id(&self) -> Option<u32> {
        self.child.as_ref().map(Child::id)
    }

    fn timeout_error(&self, timeout: Duration) -> SourceError {
        SourceError::Timeout {
            program: self.program.clone(),
            timeout_ms: timeout.as_millis() as u64,
        }
    }

    /// Read the child's stdout to EOF, giving up after `timeout`.
    pub fn read_stdout(&mut self, timeout: Duration) -> Result<Vec<u8>> {
        let mut out = self
            .child
            .as_mut()
            .and_then(|c| c.stdout.take())
            .ok_or_else(|| SourceError::Io(std::io::Error::other("stdout not captured")))?;
        let (tx, rx) = crossbeam_channel::bounded(1);
        std::thread::spawn(move || {
            let mut buf = Vec::new();
            let res = out.read_to_end(&mut buf).map(|_| buf);
            let _ = tx.send(res);
        });
        match rx.recv_timeout(timeout) {
            Ok(res) => Ok(res?),
            Err(_) => Err(self.timeout_error(timeout)),
        }
    }

    /// Wait for the child to exit, giving up after `timeout`.
    pub fn wait(&mut self, timeout: Duration) -> Result<ExitStatus> {
        let Some(child) = self.child.as_mut() else {
            return Err(SourceError::Io(std::io::Error::other("child already reaped")));
        };
        match poll_until_some(|| child.try_wait(), timeout, EXIT_POLL_INTERVAL)? {
            Some(status) => {
                self.child = None;
                Ok(status)
            }
            None => Err(self.timeout_error(timeout)),
        }
    }
}

impl Drop for ChildGuard {
    fn drop(&mut self) {
        if let Some(mut child) = self.child.take() {
            if let Ok(None) = child.try_wait() {
                let _ = child.kill();
                tracing::debug!(program = %self.program, pid = child.id(), "killed registry child");
            }
            let _ = child.wait();
        }
    }
}

/// Property source backed by the `ioreg` command-line tool.
#[derive(Debug, Clone)]
pub struct IoregSource {
    program: PathBuf,
    class: String,
    timeout: Duration,
}

impl Default for IoregSource {
    fn default() -> Self {
        Self::new(DEFAULT_IOREG_PATH, DEFAULT_CLASS)
    }
}

impl IoregSource {
    pub fn new(program: impl Into<PathBuf>, class: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            class: class.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn is_available(&self) -> bool {
        self.program.exists()
    }

    fn run(&self) -> Result<String> {
        let program = self.program.display().to_string();
        let child = Command::new(&self.program)
            .args(["-r", "-c", self.class.as_str(), "-w0"])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| SourceError::Spawn {
                program: program.clone(),
                source,
            })?;
        let mut guard = ChildGuard::new(child, program.clone());
        tracing::debug!(program = %program, class = %self.class, pid = ?guard.id(), "spawned registry dump");

        let stdout = guard.read_stdout(self.timeout)?;
        let status = guard.wait(self.timeout)?;
        if !status.success() {
            return Err(SourceError::Exit {
                program,
                status: status.to_string(),
            });
        }
        Ok(String::from_utf8(stdout)?)
    }
}

impl PropertySource for IoregSource {
    fn snapshot(&mut self) -> std::result::Result<RawPropertyBag, Box<dyn std::error::Error + Send + Sync>> {
        let text = self.run()?;
        Ok(parse_ioreg(&text))
    }

    fn describe(&self) -> &str {
        "ioreg"
    }
}

/// Parse `ioreg` text output into a property bag.
///
/// Lines that do not look like `"Key" = value`, and values of unsupported
/// shape (arrays, unterminated literals), are skipped.
pub fn parse_ioreg(text: &str) -> RawPropertyBag {
    let mut bag = RawPropertyBag::new();
    let mut seen_object = false;
    for line in text.lines() {
        let trimmed = line
            .trim_start_matches(|c: char| c == '|' || c.is_whitespace())
            .trim_end();
        if trimmed.starts_with("+-o") {
            if seen_object {
                break;
            }
            seen_object = true;
            continue;
        }
        if !trimmed.starts_with('"') {
            continue;
        }
        let mut cur = Cursor::new(trimmed);
        if let Some((key, value)) = cur.entry() {
            bag.insert(key, value);
        }
    }
    bag
}

/// Byte cursor over one line of `ioreg` output.
struct Cursor<'a> {
    s: &'a [u8],
    i: usize,
    too_deep: bool,
}

impl<'a> Cursor<'a> {
    fn new(s: &'a str) -> Self {
        Self {
            s: s.as_bytes(),
            i: 0,
            too_deep: false,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.s.get(self.i).copied()
    }

    fn skip_ws(&mut self) {
        while self.peek().is_some_and(|b| b == b' ' || b == b'\t') {
            self.i += 1;
        }
    }

    fn eat(&mut self, b: u8) -> bool {
        if self.peek() == Some(b) {
            self.i += 1;
            true
        } else {
            false
        }
    }

    /// `"key" = value` (spaces around `=` optional).
    fn entry(&mut self) -> Option<(String, RawValue)> {
        let key = self.quoted()?;
        self.skip_ws();
        if !self.eat(b'=') {
            return None;
        }
        self.skip_ws();
        let value = self.value(0)?;
        if self.too_deep {
            return None;
        }
        Some((key, value))
    }

    fn quoted(&mut self) -> Option<String> {
        if !self.eat(b'"') {
            return None;
        }
        let mut out = Vec::new();
        while let Some(b) = self.peek() {
            self.i += 1;
            match b {
                b'"' => return String::from_utf8(out).ok(),
                b'\\' => {
                    let escaped = self.peek()?;
                    self.i += 1;
                    out.push(escaped);
                }
                _ => out.push(b),
            }
        }
        None
    }

    fn value(&mut self, depth: usize) -> Option<RawValue> {
        match self.peek()? {
            b'"' => self.quoted().map(RawValue::Text),
            b'<' => self.data(),
            b'{' if depth >= MAX_DEPTH => {
                self.too_deep = true;
                self.skip_group(b'{', b'}');
                None
            }
            b'{' => self.mapping(depth),
            b'(' => {
                self.skip_group(b'(', b')');
                None
            }
            b'-' | b'0'..=b'9' => self.integer(),
            _ => self.word(),
        }
    }

    fn token_end(&self) -> usize {
        let mut j = self.i;
        while j < self.s.len() && !matches!(self.s[j], b',' | b'}' | b')' | b' ') {
            j += 1;
        }
        j
    }

    /// Decimal integer. Values past `i64::MAX` that fit in `u64` are the tool's
    /// unsigned rendering of negative quantities and are reinterpreted.
    fn integer(&mut self) -> Option<RawValue> {
        let end = self.token_end();
        let tok = std::str::from_utf8(&self.s[self.i..end]).ok()?;
        self.i = end;
        if let Ok(v) = tok.parse::<i64>() {
            return Some(RawValue::Integer(v));
        }
        tok.parse::<u64>()
            .ok()
            .map(|v| RawValue::Integer(v as i64))
    }

    fn word(&mut self) -> Option<RawValue> {
        let end = self.token_end();
        let tok = &self.s[self.i..end];
        self.i = end;
        match tok {
            b"Yes" => Some(RawValue::Boolean(true)),
            b"No" => Some(RawValue::Boolean(false)),
            _ => None,
        }
    }

    /// `<0a1b...>` hex data, or `<"text">` for printable data.
    fn data(&mut self) -> Option<RawValue> {
        self.eat(b'<');
        if self.peek() == Some(b'"') {
            let text = self.quoted()?;
            self.eat(b'>');
            return Some(RawValue::Bytes(text.into_bytes()));
        }
        let start = self.i;
        while self.peek().is_some_and(|b| b != b'>') {
            self.i += 1;
        }
        let hex = &self.s[start..self.i];
        if !self.eat(b'>') {
            return None;
        }
        decode_hex(hex).map(RawValue::Bytes)
    }

    /// `{"k"=v,"k2"=v2}`; entries with unsupported values are dropped.
    fn mapping(&mut self, depth: usize) -> Option<RawValue> {
        self.eat(b'{');
        let mut bag = RawPropertyBag::new();
        loop {
            if self.too_deep {
                return None;
            }
            self.skip_ws();
            match self.peek()? {
                b'}' => {
                    self.i += 1;
                    return Some(RawValue::Mapping(bag));
                }
                b',' => self.i += 1,
                b'"' => {
                    let key = self.quoted()?;
                    self.skip_ws();
                    if !self.eat(b'=') {
                        return None;
                    }
                    self.skip_ws();
                    let before = self.i;
                    if let Some(v) = self.value(depth + 1) {
                        bag.insert(key, v);
                    } else if self.i == before {
                        // unparseable and unconsumed; skip to the next separator
                        self.i = self.token_end().max(before + 1);
                    }
                }
                _ => self.i += 1,
            }
        }
    }

    fn skip_group(&mut self, open: u8, close: u8) {
        let mut depth = 0usize;
        let mut in_str = false;
        while let Some(b) = self.peek() {
            self.i += 1;
            match b {
                b'"' => in_str = !in_str,
                _ if in_str => {}
                b if b == open => depth += 1,
                b if b == close => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        return;
                    }
                }
                _ => {}
            }
        }
    }
}

fn decode_hex(hex: &[u8]) -> Option<Vec<u8>> {
    if hex.len() % 2 != 0 {
        return None;
    }
    hex.chunks_exact(2)
        .map(|pair| {
            let hi = (pair[0] as char).to_digit(16)?;
            let lo = (pair[1] as char).to_digit(16)?;
            Some((hi * 16 + lo) as u8)
        })
        .collect()
}
