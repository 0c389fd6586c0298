//! Shared helpers for CLI specs

use assert_cmd::Command;
use predicates::Predicate;
use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};
use std::process::{Child, ExitStatus, Stdio};
use std::sync::mpsc;
use std::time::{Duration, Instant};
use tempfile::TempDir;

const WAIT: Duration = Duration::from_secs(30);

pub const START: &str = "2024-01-01 09:00";

/// Punches for a 10km race starting at 09:00 with a 10 minute minimum
pub const PUNCHES: &str = "\
42\t2024-01-01 09:12:00.000
7\t2024-01-01 09:14:30.200
42\t2024-01-01 09:20:00.000
9\t2024-01-01 09:05:00.000
99\t2024-01-01 09:13:00.000
garbage line
";

/// A temporary working directory with its own data dir
pub struct Project {
    dir: TempDir,
}

impl Project {
    pub fn empty() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    /// A project with race "10km" reading `punches.tsv`
    pub fn with_race() -> Self {
        let project = Self::empty();
        project.file("punches.tsv", PUNCHES);
        project
            .chiptime()
            .args(&["race", "add", "10km", "--start", START, "--min-time", "10:00"])
            .args(&["--chips", "42,7,9", "--file"])
            .arg(project.path().join("punches.tsv"))
            .passes();
        project
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn data_dir(&self) -> PathBuf {
        self.path().join("data")
    }

    pub fn file(&self, name: &str, content: &str) {
        let path = self.path().join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, content).unwrap();
    }

    pub fn chiptime(&self) -> Cli {
        let mut cmd = Command::cargo_bin("chiptime").unwrap();
        cmd.current_dir(self.path())
            .env("CHIPTIME_DATA_DIR", self.data_dir())
            .env_remove("RUST_LOG");
        Cli { cmd }
    }

    /// Start a long-running command, such as `watch`, in the background
    pub fn spawn(&self, args: &[&str]) -> Running {
        let mut child = std::process::Command::new(assert_cmd::cargo::cargo_bin("chiptime"))
            .args(args)
            .current_dir(self.path())
            .env("CHIPTIME_DATA_DIR", self.data_dir())
            .env_remove("RUST_LOG")
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .unwrap();
        let stdout = lines(child.stdout.take().unwrap());
        let stderr = lines(child.stderr.take().unwrap());
        Running {
            child,
            stdout,
            stderr,
        }
    }
}

/// A background CLI process; killed on drop
pub struct Running {
    child: Child,
    stdout: mpsc::Receiver<String>,
    stderr: mpsc::Receiver<String>,
}

impl Running {
    pub fn wait_stdout(&self, needle: &str) {
        wait_for_line(&self.stdout, needle, "stdout");
    }

    pub fn wait_stderr(&self, needle: &str) {
        wait_for_line(&self.stderr, needle, "stderr");
    }

    /// Send SIGINT, as Ctrl-C does, and wait for the process to exit
    #[cfg(unix)]
    pub fn interrupt(&mut self) -> ExitStatus {
        let status = std::process::Command::new("kill")
            .args(["-INT", &self.child.id().to_string()])
            .status()
            .unwrap();
        assert!(status.success());
        self.child.wait().unwrap()
    }
}

impl Drop for Running {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

fn lines(reader: impl Read + Send + 'static) -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel();
    std::thread::spawn(move || {
        for line in BufReader::new(reader).lines().map_while(Result::ok) {
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    rx
}

fn wait_for_line(rx: &mpsc::Receiver<String>, needle: &str, stream: &str) {
    let deadline = Instant::now() + WAIT;
    let mut seen = Vec::new();
    loop {
        let remaining = deadline.saturating_duration_since(Instant::now());
        match rx.recv_timeout(remaining) {
            Ok(line) if line.contains(needle) => return,
            Ok(line) => seen.push(line),
            Err(_) => panic!("{} never had {:?}, saw:\n{}", stream, needle, seen.join("\n")),
        }
    }
}

pub struct Cli {
    cmd: Command,
}

impl Cli {
    pub fn args(mut self, args: &[&str]) -> Self {
        self.cmd.args(args);
        self
    }

    pub fn arg(mut self, arg: impl AsRef<std::ffi::OsStr>) -> Self {
        self.cmd.arg(arg);
        self
    }

    pub fn passes(mut self) -> Output {
        let assert = self.cmd.assert().success();
        Output::from(assert.get_output())
    }

    pub fn fails(mut self) -> Output {
        let assert = self.cmd.assert().failure();
        Output::from(assert.get_output())
    }
}

pub struct Output {
    stdout: String,
    stderr: String,
}

impl From<&std::process::Output> for Output {
    fn from(output: &std::process::Output) -> Self {
        Self {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        }
    }
}

impl Output {
    pub fn stdout(&self) -> &str {
        &self.stdout
    }

    pub fn stdout_eq(self, expected: &str) -> Self {
        similar_asserts::assert_eq!(self.stdout, expected);
        self
    }

    pub fn stdout_has(self, needle: &str) -> Self {
        assert!(
            predicates::str::contains(needle).eval(&self.stdout),
            "stdout missing {:?}:\n{}",
            needle,
            self.stdout
        );
        self
    }

    pub fn stdout_lacks(self, needle: &str) -> Self {
        assert!(
            !self.stdout.contains(needle),
            "stdout unexpectedly has {:?}:\n{}",
            needle,
            self.stdout
        );
        self
    }

    pub fn stderr_has(self, needle: &str) -> Self {
        assert!(
            predicates::str::contains(needle).eval(&self.stderr),
            "stderr missing {:?}:\n{}",
            needle,
            self.stderr
        );
        self
    }
}
