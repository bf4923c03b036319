//! Pandoc-backed converter.

use std::io::{self, ErrorKind, Read, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::error::{Error, Result};

use super::DocumentConverter;

const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// How pandoc renders math in HTML output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MathMode {
    /// `--mathjax`: math kept as `\(..\)` TeX source
    #[default]
    MathJax,
    /// `--katex`
    KaTeX,
    /// `--mathml`
    MathML,
    /// Pandoc's default rendering
    Plain,
}

impl MathMode {
    /// Command-line flag selecting this mode.
    pub fn flag(self) -> Option<&'static str> {
        match self {
            MathMode::MathJax => Some("--mathjax"),
            MathMode::KaTeX => Some("--katex"),
            MathMode::MathML => Some("--mathml"),
            MathMode::Plain => None,
        }
    }
}

/// Configuration of the pandoc invocation.
#[derive(Debug, Clone)]
pub struct PandocConfig {
    /// Program to run
    pub program: PathBuf,

    /// Upper bound on a single invocation
    pub timeout: Duration,

    /// Math rendering mode
    pub math: MathMode,

    /// Additional arguments passed before the input
    pub extra_args: Vec<String>,
}

impl PandocConfig {
    /// Create new configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the program path.
    pub fn with_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.program = program.into();
        self
    }

    /// Set the timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the math mode.
    pub fn with_math(mut self, math: MathMode) -> Self {
        self.math = math;
        self
    }

    /// Append an extra argument.
    pub fn with_arg(mut self, arg: impl Into<String>) -> Self {
        self.extra_args.push(arg.into());
        self
    }
}

impl Default for PandocConfig {
    fn default() -> Self {
        Self {
            program: PathBuf::from("pandoc"),
            timeout: Duration::from_secs(60),
            math: MathMode::default(),
            extra_args: Vec::new(),
        }
    }
}

/// Converter that shells out to pandoc.
#[derive(Debug, Clone, Default)]
pub struct PandocConverter {
    config: PandocConfig,
}

/// Captured result of one pandoc run.
struct Finished {
    status: ExitStatus,
    stdout: Vec<u8>,
    stderr: Vec<u8>,
    /// The child exited before consuming all of stdin
    input_unread: bool,
}

impl PandocConverter {
    /// Create a converter with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a converter with custom configuration.
    pub fn with_config(config: PandocConfig) -> Self {
        Self { config }
    }

    /// Get the configuration.
    pub fn config(&self) -> &PandocConfig {
        &self.config
    }

    fn program_name(&self) -> String {
        self.config.program.display().to_string()
    }

    /// Run `pandoc --version` and return its first output line.
    pub fn check_available(&self) -> Result<String> {
        let mut cmd = Command::new(&self.config.program);
        cmd.arg("--version");
        let finished = self.run(cmd, None)?;
        if !finished.status.success() {
            return Err(Error::ConverterUnavailable {
                program: self.program_name(),
                reason: format!("--version exited with {}", finished.status),
            });
        }
        let stdout = String::from_utf8_lossy(&finished.stdout);
        Ok(stdout.lines().next().unwrap_or_default().trim().to_string())
    }

    fn base_command(&self) -> Command {
        let mut cmd = Command::new(&self.config.program);
        cmd.args(["-f", "latex", "-t", "html"]);
        if let Some(flag) = self.config.math.flag() {
            cmd.arg(flag);
        }
        cmd.args(&self.config.extra_args);
        cmd
    }

    fn run(&self, mut cmd: Command, input: Option<&str>) -> Result<Finished> {
        log::debug!("Running {:?}", cmd);

        cmd.stdin(if input.is_some() {
            Stdio::piped()
        } else {
            Stdio::null()
        })
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

        let mut child = cmd.spawn().map_err(|e| Error::ConverterUnavailable {
            program: self.program_name(),
            reason: e.to_string(),
        })?;

        // Drain both pipes concurrently so a chatty child never blocks.
        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());

        // Feed stdin from its own thread so the timeout below always applies.
        let writer = match (input, child.stdin.take()) {
            (Some(text), Some(stdin)) => Some(feed(stdin, text.to_string())),
            _ => None,
        };

        let status = self.wait(&mut child)?;

        let mut input_unread = false;
        if let Some(handle) = writer {
            match handle.join() {
                Ok(Ok(())) => {}
                Ok(Err(e)) if e.kind() == ErrorKind::BrokenPipe => {
                    log::debug!("{} closed stdin early", self.program_name());
                    input_unread = true;
                }
                Ok(Err(e)) => return Err(e.into()),
                Err(_) => input_unread = true,
            }
        }

        Ok(Finished {
            status,
            stdout: join(stdout),
            stderr: join(stderr),
            input_unread,
        })
    }

    fn wait(&self, child: &mut Child) -> Result<ExitStatus> {
        let start = Instant::now();
        loop {
            if let Some(status) = child.try_wait()? {
                return Ok(status);
            }
            if start.elapsed() > self.config.timeout {
                log::warn!(
                    "{} exceeded {:?}, killing it",
                    self.program_name(),
                    self.config.timeout
                );
                let _ = child.kill();
                let _ = child.wait();
                return Err(Error::ConverterTimeout {
                    program: self.program_name(),
                    timeout: self.config.timeout,
                });
            }
            thread::sleep(POLL_INTERVAL);
        }
    }
}

impl DocumentConverter for PandocConverter {
    fn name(&self) -> &str {
        "pandoc"
    }

    fn convert_file(&self, source: &Path, output: &Path) -> Result<()> {
        let mut cmd = self.base_command();
        cmd.arg("-s").arg(source).arg("-o").arg(output);

        let finished = self.run(cmd, None)?;
        if !finished.status.success() {
            return Err(Error::ConversionFailed {
                path: output.to_path_buf(),
                reason: failure_reason(&finished),
            });
        }
        Ok(())
    }

    fn convert_fragment(&self, latex: &str) -> Result<String> {
        let finished = self.run(self.base_command(), Some(latex))?;
        if !finished.status.success() {
            return Err(Error::ConversionFailed {
                path: PathBuf::from("<stdin>"),
                reason: failure_reason(&finished),
            });
        }
        if finished.input_unread {
            return Err(Error::ConversionFailed {
                path: PathBuf::from("<stdin>"),
                reason: format!("{} exited without reading its input", self.program_name()),
            });
        }
        String::from_utf8(finished.stdout).map_err(|e| Error::ConversionFailed {
            path: PathBuf::from("<stdin>"),
            reason: format!("output is not UTF-8: {}", e),
        })
    }
}

fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> Option<JoinHandle<Vec<u8>>> {
    pipe.map(|mut pipe| {
        thread::spawn(move || {
            let mut buf = Vec::new();
            let _ = pipe.read_to_end(&mut buf);
            buf
        })
    })
}

fn feed(mut stdin: ChildStdin, text: String) -> JoinHandle<io::Result<()>> {
    thread::spawn(move || stdin.write_all(text.as_bytes()))
}

fn join(handle: Option<JoinHandle<Vec<u8>>>) -> Vec<u8> {
    handle.and_then(|h| h.join().ok()).unwrap_or_default()
}

fn failure_reason(finished: &Finished) -> String {
    let stderr = String::from_utf8_lossy(&finished.stderr);
    let stderr = stderr.trim();
    if stderr.is_empty() {
        format!("converter exited with {}", finished.status)
    } else {
        format!("converter exited with {}: {}", finished.status, stderr)
    }
}
