//! Test doubles for the session collaborators

use std::cell::RefCell;
use std::collections::VecDeque;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use amp_core::Result;

use crate::config::CliConfig;
use crate::packages::RoleBuilder;
use crate::prompt::Prompt;
use crate::session::Session;
use crate::vcs::Vcs;

/// In-memory output that stays readable after being boxed into a session.
#[derive(Clone, Default)]
pub struct SharedOutput(Rc<RefCell<Vec<u8>>>);

impl SharedOutput {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.borrow()).into_owned()
    }
}

impl Write for SharedOutput {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// One recorded version control call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VcsCall {
    pub cwd: PathBuf,
    pub args: Vec<String>,
}

/// [`Vcs`] that records calls and replays scripted `capture` output.
#[derive(Clone, Default)]
pub struct RecordingVcs {
    calls: Rc<RefCell<Vec<VcsCall>>>,
    captures: Rc<RefCell<VecDeque<String>>>,
}

impl RecordingVcs {
    /// Queue the output of the next `capture` call; later calls get "".
    pub fn push_capture(&self, output: &str) {
        self.captures.borrow_mut().push_back(output.to_string());
    }

    pub fn calls(&self) -> Vec<VcsCall> {
        self.calls.borrow().clone()
    }

    /// Arguments of every call, joined with spaces.
    pub fn commands(&self) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .map(|call| call.args.join(" "))
            .collect()
    }

    fn record(&self, cwd: &Path, args: &[&str]) {
        self.calls.borrow_mut().push(VcsCall {
            cwd: cwd.to_path_buf(),
            args: args.iter().map(|a| a.to_string()).collect(),
        });
    }
}

impl Vcs for RecordingVcs {
    fn run(&mut self, cwd: &Path, args: &[&str]) -> Result<()> {
        self.record(cwd, args);
        Ok(())
    }

    fn capture(&mut self, cwd: &Path, args: &[&str]) -> Result<String> {
        self.record(cwd, args);
        Ok(self.captures.borrow_mut().pop_front().unwrap_or_default())
    }
}

/// [`Prompt`] answering from a script; unanswered questions get "no".
#[derive(Clone, Default)]
pub struct ScriptedPrompt {
    answers: Rc<RefCell<VecDeque<bool>>>,
    asked: Rc<RefCell<Vec<String>>>,
}

impl ScriptedPrompt {
    pub fn answering(answers: &[bool]) -> Self {
        let prompt = Self::default();
        prompt.answers.borrow_mut().extend(answers.iter().copied());
        prompt
    }

    pub fn asked(&self) -> Vec<String> {
        self.asked.borrow().clone()
    }
}

impl Prompt for ScriptedPrompt {
    fn confirm(&mut self, question: &str) -> Result<bool> {
        self.asked.borrow_mut().push(question.to_string());
        Ok(self.answers.borrow_mut().pop_front().unwrap_or(false))
    }
}

/// Configuration rooted at `root` with an empty search path.
pub fn test_config(root: &Path) -> CliConfig {
    CliConfig {
        root: root.to_path_buf(),
        delegate_prefix: "amp".to_string(),
        git: "git".to_string(),
        verbose: false,
        search_path: None,
    }
}

/// Session rooted at a path that does not exist, with inert collaborators.
pub fn test_session() -> (Session, SharedOutput) {
    test_session_at(Path::new("/nonexistent-amp/ampify"))
}

/// Session whose tool root is `root`.
pub fn test_session_at(root: &Path) -> (Session, SharedOutput) {
    let out = SharedOutput::default();
    let config = test_config(root);
    let session = Session {
        vcs: Box::new(RecordingVcs::default()),
        prompt: Box::new(ScriptedPrompt::default()),
        packages: Box::new(RoleBuilder::new(config.roles_dir())),
        out: Box::new(out.clone()),
        config,
    };
    (session, out)
}

/// Write an executable `#!/bin/sh` script into `dir`.
#[cfg(unix)]
pub fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join(name);
    std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}
