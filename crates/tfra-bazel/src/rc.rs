//! `.bazelrc` directives.
//!
//! The configuration is collected as an ordered list and written out in
//! a single write, so a failed run never leaves a half-written file.

use std::fmt;
use std::fs;
use std::path::Path;

use crate::error::Result;

/// File name of the generated configuration.
pub const BAZELRC: &str = ".bazelrc";

/// The Bazel command a flag applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RcCommand {
    Build,
    Test,
}

impl RcCommand {
    fn as_str(&self) -> &'static str {
        match self {
            RcCommand::Build => "build",
            RcCommand::Test => "test",
        }
    }
}

/// One line of the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    /// `build --action_env NAME="VALUE"`
    ActionEnv { name: String, value: String },
    /// `<command>[:<config>] <flag>`
    Flag {
        command: RcCommand,
        config: Option<String>,
        flag: String,
    },
}

impl Directive {
    pub fn action_env(name: impl Into<String>, value: impl fmt::Display) -> Self {
        Directive::ActionEnv {
            name: name.into(),
            value: value.to_string(),
        }
    }

    pub fn flag(command: RcCommand, config: Option<&str>, flag: impl Into<String>) -> Self {
        Directive::Flag {
            command,
            config: config.map(str::to_string),
            flag: flag.into(),
        }
    }
}

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Directive::ActionEnv { name, value } => {
                write!(f, "build --action_env {name}=\"{value}\"")
            }
            Directive::Flag {
                command,
                config: Some(config),
                flag,
            } => write!(f, "{}:{config} {flag}", command.as_str()),
            Directive::Flag {
                command,
                config: None,
                flag,
            } => write!(f, "{} {flag}", command.as_str()),
        }
    }
}

/// An ordered `.bazelrc` under construction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bazelrc {
    directives: Vec<Directive>,
}

impl Bazelrc {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, directive: Directive) -> &mut Self {
        self.directives.push(directive);
        self
    }

    /// Append `build --action_env NAME="VALUE"`.
    pub fn action_env(&mut self, name: &str, value: impl fmt::Display) -> &mut Self {
        self.push(Directive::action_env(name, value))
    }

    /// Append `build <flag>`.
    pub fn build(&mut self, flag: &str) -> &mut Self {
        self.push(Directive::flag(RcCommand::Build, None, flag))
    }

    /// Append `build:<config> <flag>`.
    pub fn build_config(&mut self, config: &str, flag: &str) -> &mut Self {
        self.push(Directive::flag(RcCommand::Build, Some(config), flag))
    }

    /// Append `test <flag>`.
    pub fn test(&mut self, flag: &str) -> &mut Self {
        self.push(Directive::flag(RcCommand::Test, None, flag))
    }

    pub fn len(&self) -> usize {
        self.directives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.directives.is_empty()
    }

    /// The rendered lines, in order.
    pub fn lines(&self) -> Vec<String> {
        self.directives.iter().map(ToString::to_string).collect()
    }

    /// Whether a rendered line is present.
    pub fn contains_line(&self, line: &str) -> bool {
        self.directives.iter().any(|d| d.to_string() == line)
    }

    /// The file contents: one directive per line.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for directive in &self.directives {
            out.push_str(&directive.to_string());
            out.push('\n');
        }
        out
    }

    /// Write the rendered configuration, replacing any existing file.
    pub fn write_to(&self, path: &Path) -> Result<()> {
        fs::write(path, self.render())?;
        log::debug!("wrote {} directives to {}", self.len(), path.display());
        Ok(())
    }
}

/// Delete a configuration left by an earlier run.
///
/// Returns whether a file was removed.
pub fn remove_stale(path: &Path) -> Result<bool> {
    if path.is_file() {
        fs::remove_file(path)?;
        log::debug!("removed stale {}", path.display());
        Ok(true)
    } else {
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directive_rendering() {
        assert_eq!(
            Directive::action_env("TF_VERSION_INTEGER", 2051).to_string(),
            "build --action_env TF_VERSION_INTEGER=\"2051\""
        );
        assert_eq!(
            Directive::flag(RcCommand::Build, None, "-c opt").to_string(),
            "build -c opt"
        );
        assert_eq!(
            Directive::flag(RcCommand::Build, Some("windows"), "--enable_runfiles").to_string(),
            "build:windows --enable_runfiles"
        );
        assert_eq!(
            Directive::flag(RcCommand::Test, None, "--config=cuda").to_string(),
            "test --config=cuda"
        );
    }

    #[test]
    fn render_keeps_order() {
        let mut rc = Bazelrc::new();
        rc.action_env("FOR_TF_SERVING", "0")
            .build("--spawn_strategy=standalone")
            .build_config("cuda", "--define=using_cuda=true");
        assert_eq!(rc.len(), 3);
        assert_eq!(
            rc.render(),
            "build --action_env FOR_TF_SERVING=\"0\"\n\
             build --spawn_strategy=standalone\n\
             build:cuda --define=using_cuda=true\n"
        );
        assert!(rc.contains_line("build --spawn_strategy=standalone"));
        assert!(!rc.contains_line("build -c opt"));
    }

    #[test]
    fn write_replaces_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(BAZELRC);
        fs::write(&path, "stale contents\n").unwrap();

        let mut rc = Bazelrc::new();
        rc.build("-c opt");
        rc.write_to(&path).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "build -c opt\n");
    }

    #[test]
    fn remove_stale_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(BAZELRC);
        assert!(!remove_stale(&path).unwrap());
        fs::write(&path, "build -c opt\n").unwrap();
        assert!(remove_stale(&path).unwrap());
        assert!(!path.exists());
    }

    #[test]
    fn empty_config() {
        let rc = Bazelrc::new();
        assert!(rc.is_empty());
        assert_eq!(rc.render(), "");
    }
}
