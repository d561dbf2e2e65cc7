//! Scripted stand-ins for host utilities and mount tables.

#![allow(dead_code, clippy::expect_used, clippy::unwrap_used)]

use std::collections::{HashMap, VecDeque};
use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use mountkit_common::error::{MountkitError, Result};
use mountkit_core::runner::{CommandOutput, CommandRunner};
use mountkit_core::table::{FileMountTable, MountTableSource};

/// One recorded invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub program: String,
    pub args: Vec<String>,
}

enum Reply {
    Output(CommandOutput),
    SpawnFailure,
}

/// Replays canned replies per program and records every call.
///
/// A program with no reply left is reported as not installed.
#[derive(Clone, Default)]
pub struct ScriptedRunner {
    replies: Arc<Mutex<HashMap<String, VecDeque<Reply>>>>,
    calls: Arc<Mutex<Vec<Call>>>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, program: &str, reply: Reply) {
        self.replies
            .lock()
            .unwrap()
            .entry(program.to_string())
            .or_default()
            .push_back(reply);
    }

    /// Scripts a successful exit with `stdout`.
    pub fn ok(self, program: &str, stdout: &str) -> Self {
        self.push(
            program,
            Reply::Output(CommandOutput {
                stdout: stdout.to_string(),
                stderr: String::new(),
                exit_code: 0,
            }),
        );
        self
    }

    /// Scripts a non-zero exit with `stderr`.
    pub fn fail(self, program: &str, exit_code: i32, stderr: &str) -> Self {
        self.push(
            program,
            Reply::Output(CommandOutput {
                stdout: String::new(),
                stderr: stderr.to_string(),
                exit_code,
            }),
        );
        self
    }

    /// Scripts a failure to start the program.
    pub fn missing(self, program: &str) -> Self {
        self.push(program, Reply::SpawnFailure);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn programs(&self) -> Vec<String> {
        self.calls().into_iter().map(|c| c.program).collect()
    }

    pub fn called(&self, program: &str) -> bool {
        self.calls().iter().any(|c| c.program == program)
    }
}

impl CommandRunner for ScriptedRunner {
    fn run(&self, program: &str, args: &[String]) -> Result<CommandOutput> {
        self.calls.lock().unwrap().push(Call {
            program: program.to_string(),
            args: args.to_vec(),
        });
        let reply = self
            .replies
            .lock()
            .unwrap()
            .get_mut(program)
            .and_then(VecDeque::pop_front);
        match reply {
            Some(Reply::Output(output)) => Ok(output),
            Some(Reply::SpawnFailure) | None => Err(MountkitError::Spawn {
                program: program.to_string(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "not installed"),
            }),
        }
    }
}

/// Mount table that serves a fixed list of contents, one per open, and
/// repeats the last one once the list is exhausted.
#[derive(Clone)]
pub struct SequenceTable {
    path: PathBuf,
    contents: Arc<Vec<String>>,
    opens: Arc<Mutex<usize>>,
}

impl SequenceTable {
    pub fn new(contents: Vec<String>) -> Self {
        Self {
            path: PathBuf::from("/proc/self/mountinfo"),
            contents: Arc::new(contents),
            opens: Arc::new(Mutex::new(0)),
        }
    }

    /// Serves `content` on every open.
    pub fn constant(content: &str) -> Self {
        Self::new(vec![content.to_string()])
    }

    /// Serves a different table on each of the first `reads` opens.
    pub fn always_changing(reads: usize) -> Self {
        Self::new(
            (0..reads)
                .map(|i| format!("{} 1 8:{i} / /mnt/m{i} rw - ext4 /dev/sd{i} rw\n", 100 + i))
                .collect(),
        )
    }

    pub fn opens(&self) -> usize {
        *self.opens.lock().unwrap()
    }
}

impl MountTableSource for SequenceTable {
    fn location(&self) -> &Path {
        &self.path
    }

    fn open(&self) -> std::io::Result<Box<dyn Read + Send>> {
        let mut opens = self.opens.lock().unwrap();
        let index = (*opens).min(self.contents.len().saturating_sub(1));
        *opens += 1;
        let content = self.contents.get(index).cloned().unwrap_or_default();
        Ok(Box::new(Cursor::new(content.into_bytes())))
    }
}

/// Mount table whose every open fails.
pub struct BrokenTable(pub PathBuf);

impl MountTableSource for BrokenTable {
    fn location(&self) -> &Path {
        &self.0
    }

    fn open(&self) -> std::io::Result<Box<dyn Read + Send>> {
        Err(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "permission denied",
        ))
    }
}

/// Mount table that serves `content` until the `fail_on`-th open (counting
/// from 1), which fails.
#[derive(Clone)]
pub struct FlakyTable {
    path: PathBuf,
    content: String,
    fail_on: usize,
    opens: Arc<Mutex<usize>>,
}

impl FlakyTable {
    pub fn new(content: &str, fail_on: usize) -> Self {
        Self {
            path: PathBuf::from("/proc/self/mountinfo"),
            content: content.to_string(),
            fail_on,
            opens: Arc::new(Mutex::new(0)),
        }
    }

    pub fn opens(&self) -> usize {
        *self.opens.lock().unwrap()
    }
}

impl MountTableSource for FlakyTable {
    fn location(&self) -> &Path {
        &self.path
    }

    fn open(&self) -> std::io::Result<Box<dyn Read + Send>> {
        let mut opens = self.opens.lock().unwrap();
        *opens += 1;
        if *opens == self.fail_on {
            return Err(std::io::Error::other("table vanished"));
        }
        Ok(Box::new(Cursor::new(self.content.clone().into_bytes())))
    }
}

/// Real file on disk that is rewritten with a new row before every open.
#[derive(Clone)]
pub struct RewrittenFile {
    _dir: Arc<tempfile::TempDir>,
    file: FileMountTable,
    path: PathBuf,
    opens: Arc<Mutex<usize>>,
}

impl RewrittenFile {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mountinfo");
        Self {
            file: FileMountTable::new(&path),
            path,
            _dir: Arc::new(dir),
            opens: Arc::new(Mutex::new(0)),
        }
    }

    pub fn opens(&self) -> usize {
        *self.opens.lock().unwrap()
    }
}

impl MountTableSource for RewrittenFile {
    fn location(&self) -> &Path {
        &self.path
    }

    fn open(&self) -> std::io::Result<Box<dyn Read + Send>> {
        let mut opens = self.opens.lock().unwrap();
        let i = *opens;
        *opens += 1;
        std::fs::write(
            &self.path,
            format!("{} 1 8:{i} / /mnt/m{i} rw - ext4 /dev/sd{i} rw\n", 100 + i),
        )?;
        self.file.open()
    }
}

pub fn opts(list: &[&str]) -> Vec<String> {
    list.iter().map(ToString::to_string).collect()
}
