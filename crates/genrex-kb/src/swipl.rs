//! SWI-Prolog backend.
//!
//! The store runs `swipl` as a child process that consults the configured
//! knowledge files and then serves one request per line on stdin:
//!
//! ```text
//! > q(GenreList, obtener_todos_los_generos(GenreList)).
//! < ok [rock,jazz,blues]
//! > q(Description, obtiene_descripcion(polka, Description)).
//! < none
//! ```
//!
//! A reply is `ok <term>`, `none` or `error <exception>`, each written with
//! `writeq` on a single line. [`Session`] speaks this protocol over any
//! reader/writer pair so it can be exercised without a Prolog install.

use genrex_core::{config::SwiplConfig, error::KbError, query::quoted, Goal, KnowledgeStore};
use std::io::{BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

/// Read-eval-reply loop installed with `-g`. Ends at end of input.
///
/// Both the read and the call run under `catch/3`: a request that does not
/// parse answers `error ...` and the loop reads the next line.
const SERVE_LOOP: &str = "prompt(_, ''), repeat, \
     catch(read_term(user_input, T, []), R, \
           (format('error ~q~n', [R]), flush_output, fail)), \
     ( T == end_of_file -> ! \
     ; ( T = q(V, G) \
       -> catch(( call(G) -> format('ok ~q~n', [V]) ; format('none~n') ), \
                E, format('error ~q~n', [E])) \
       ; format('error ~q~n', [bad_request(T)]) ), \
       flush_output, fail )";

const READY: &str = "ready";

// ---------------------------------------------------------------------------
// Protocol
// ---------------------------------------------------------------------------

/// One decoded reply line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Solved(String),
    NoSolution,
    Failed(String),
}

/// Decode one reply line.
pub fn parse_reply(line: &str) -> Result<Reply, KbError> {
    let line = line.trim_end_matches(['\r', '\n']);
    if line == "none" {
        return Ok(Reply::NoSolution);
    }
    if let Some(term) = line.strip_prefix("ok ") {
        return Ok(Reply::Solved(term.to_string()));
    }
    if let Some(exception) = line.strip_prefix("error ") {
        return Ok(Reply::Failed(exception.to_string()));
    }
    Err(KbError::Connection(format!("unexpected reply from prolog: {line:?}")))
}

/// A request/reply channel to a serving Prolog process.
pub struct Session<R, W> {
    reader: R,
    writer: W,
}

impl<R: BufRead, W: Write> Session<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    /// Confirm the serve loop is running.
    pub fn handshake(&mut self) -> Result<(), KbError> {
        match self.request("X", &format!("X = {READY}"))? {
            Reply::Solved(term) if term == READY => Ok(()),
            other => Err(KbError::Connection(format!(
                "prolog did not complete the handshake: {other:?}"
            ))),
        }
    }

    /// Solve `goal`, returning the binding of its result variable.
    pub fn ask(&mut self, goal: &Goal) -> Result<Option<String>, KbError> {
        match self.request(goal.result_var(), &goal.to_string())? {
            Reply::Solved(term) => Ok(Some(term)),
            Reply::NoSolution => Ok(None),
            Reply::Failed(exception) => Err(KbError::query(goal, exception)),
        }
    }

    fn request(&mut self, var: &str, goal: &str) -> Result<Reply, KbError> {
        writeln!(self.writer, "q({var}, {goal}).")
            .and_then(|()| self.writer.flush())
            .map_err(|e| KbError::Connection(format!("cannot write to prolog: {e}")))?;

        let mut line = String::new();
        let read = self
            .reader
            .read_line(&mut line)
            .map_err(|e| KbError::Connection(format!("cannot read from prolog: {e}")))?;
        if read == 0 {
            return Err(KbError::Connection("prolog closed its output".to_string()));
        }
        parse_reply(&line)
    }

    pub fn into_parts(self) -> (R, W) {
        (self.reader, self.writer)
    }
}

// ---------------------------------------------------------------------------
// SwiplStore
// ---------------------------------------------------------------------------

/// A [`KnowledgeStore`] backed by a `swipl` child process.
///
/// The child is killed when the store is dropped.
pub struct SwiplStore {
    child: Child,
    session: Session<BufReader<ChildStdout>, ChildStdin>,
    program: String,
}

impl SwiplStore {
    /// Launch `swipl`, consult the configured files and wait for the
    /// handshake.
    pub fn spawn(config: &SwiplConfig) -> Result<Self, KbError> {
        let mut command = Command::new(&config.program);
        command.args(launch_args(&config.consult));
        command
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null());

        tracing::debug!(program = %config.program, consult = ?config.consult, "starting prolog");
        let mut child = command.spawn().map_err(|e| {
            KbError::Connection(format!("cannot start {}: {e}", config.program))
        })?;

        let (Some(stdin), Some(stdout)) = (child.stdin.take(), child.stdout.take()) else {
            let _ = child.kill();
            let _ = child.wait();
            return Err(KbError::Connection("prolog pipes unavailable".to_string()));
        };

        let mut store = Self {
            child,
            session: Session::new(BufReader::new(stdout), stdin),
            program: config.program.clone(),
        };
        store.session.handshake()?;
        tracing::debug!(pid = store.child.id(), "prolog ready");
        Ok(store)
    }
}

/// Command-line arguments for a serving `swipl`.
pub fn launch_args(consult: &[String]) -> Vec<String> {
    let mut args = vec!["-q".to_string(), "-f".to_string(), "none".to_string()];
    for file in consult {
        args.push("-g".to_string());
        args.push(format!("consult({})", quoted(file)));
    }
    args.extend(["-g".to_string(), SERVE_LOOP.to_string()]);
    args.extend(["-t".to_string(), "halt".to_string()]);
    args
}

impl KnowledgeStore for SwiplStore {
    fn solve(&mut self, goal: &Goal) -> Result<Option<String>, KbError> {
        self.session.ask(goal)
    }

    fn describe_backend(&self) -> String {
        format!("swipl ({}, pid {})", self.program, self.child.id())
    }
}

impl Drop for SwiplStore {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
