//! Framework introspection through the Python interpreter.
//!
//! A short Python snippet imports TensorFlow and prints its version, its
//! `sysconfig` compile and link flags and the C++11 ABI flag as one JSON
//! object on the last line of stdout.

use std::process::Command;

use serde::{Deserialize, Serialize};

use crate::error::{FrameworkError, Result};
use crate::version::TfVersion;

/// Exit status the snippet uses when TensorFlow cannot be imported.
const NOT_INSTALLED_STATUS: i32 = 3;

/// Interpreter used when neither a flag nor `PYTHON_BIN_PATH` names one.
pub const DEFAULT_PYTHON: &str = "python3";

const PROBE_SNIPPET: &str = r#"
import json
import sys
try:
    import tensorflow as tf
    version = tf.__version__
except (ImportError, AttributeError) as e:
    sys.stderr.write(str(e))
    sys.exit(3)
print(json.dumps({
    "version": version,
    "compile_flags": tf.sysconfig.get_compile_flags(),
    "link_flags": tf.sysconfig.get_link_flags(),
    "cxx11_abi_flag": int(tf.sysconfig.CXX11_ABI_FLAG),
}))
"#;

/// Build metadata reported by the installed framework.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sysconfig {
    /// `tf.__version__`.
    pub version: String,
    /// `tf.sysconfig.get_compile_flags()`.
    pub compile_flags: Vec<String>,
    /// `tf.sysconfig.get_link_flags()`.
    pub link_flags: Vec<String>,
    /// `tf.sysconfig.CXX11_ABI_FLAG`.
    pub cxx11_abi_flag: i32,
}

impl Sysconfig {
    /// Parse the reported version.
    pub fn parsed_version(&self) -> Result<TfVersion> {
        TfVersion::parse(&self.version)
    }
}

/// A source of framework build metadata.
pub trait Introspect {
    /// Query the installed framework.
    fn sysconfig(&self) -> Result<Sysconfig>;
}

/// A recorded sysconfig answers for itself.
impl Introspect for Sysconfig {
    fn sysconfig(&self) -> Result<Sysconfig> {
        Ok(self.clone())
    }
}

/// Introspects TensorFlow by running a Python interpreter.
#[derive(Debug, Clone)]
pub struct PythonProbe {
    interpreter: String,
}

impl PythonProbe {
    /// Probe with a specific interpreter.
    pub fn new(interpreter: impl Into<String>) -> Self {
        Self {
            interpreter: interpreter.into(),
        }
    }

    /// Probe with `PYTHON_BIN_PATH`, or `python3` when it is unset.
    pub fn from_env() -> Self {
        Self::new(std::env::var("PYTHON_BIN_PATH").unwrap_or_else(|_| DEFAULT_PYTHON.into()))
    }

    /// The interpreter this probe runs.
    pub fn interpreter(&self) -> &str {
        &self.interpreter
    }
}

impl Introspect for PythonProbe {
    fn sysconfig(&self) -> Result<Sysconfig> {
        log::debug!("introspecting TensorFlow with '{}'", self.interpreter);
        let output = Command::new(&self.interpreter)
            .arg("-c")
            .arg(PROBE_SNIPPET)
            .output()
            .map_err(|e| FrameworkError::ProbeFailed {
                interpreter: self.interpreter.clone(),
                detail: format!("could not run interpreter: {e}"),
            })?;

        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        if output.status.code() == Some(NOT_INSTALLED_STATUS) {
            return Err(FrameworkError::NotInstalled {
                interpreter: self.interpreter.clone(),
                detail: stderr,
            });
        }
        if !output.status.success() {
            return Err(FrameworkError::ProbeFailed {
                interpreter: self.interpreter.clone(),
                detail: format!("{}: {stderr}", output.status),
            });
        }

        parse_probe_output(&String::from_utf8_lossy(&output.stdout))
    }
}

/// Parse the probe's stdout.
///
/// Importing TensorFlow can print banner lines first, so only the last
/// non-empty line is read.
pub fn parse_probe_output(stdout: &str) -> Result<Sysconfig> {
    let line = stdout
        .lines()
        .rev()
        .find(|l| !l.trim().is_empty())
        .unwrap_or_default();
    let sysconfig: Sysconfig = serde_json::from_str(line)?;
    log::debug!("TensorFlow {} reported {:?}", sysconfig.version, sysconfig.link_flags);
    Ok(sysconfig)
}
