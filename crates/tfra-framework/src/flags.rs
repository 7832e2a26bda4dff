//! Parsing of the compile and link flags TensorFlow reports.
//!
//! `tf.sysconfig.get_compile_flags()` leads with the header include flag
//! and `tf.sysconfig.get_link_flags()` with the library search path and
//! the exact library name:
//!
//! ```text
//! compile: -I/site-packages/tensorflow/include  -D_GLIBCXX_USE_CXX11_ABI=1 ...
//! link:    -L/site-packages/tensorflow          -l:libtensorflow_framework.so.2
//! ```

use crate::error::{FrameworkError, Result};

/// Marker on the header include flag.
pub const INCLUDE_FLAG: &str = "-I";
/// Marker on the library search path flag.
pub const LIBRARY_DIR_FLAG: &str = "-L";
/// Marker on the exact library name flag.
pub const LIBRARY_NAME_FLAG: &str = "-l:";
/// Last path component of the compiled header directory.
pub const INCLUDE_DIR_SUFFIX: &str = "include";
/// Sibling of the header directory holding the Python extension library.
pub const PYTHON_LIB_SUBDIR: &str = "python";

fn nth<'a>(flags: &'a [String], kind: &'static str, index: usize) -> Result<&'a str> {
    flags
        .get(index)
        .map(String::as_str)
        .ok_or(FrameworkError::MissingFlag { kind, index })
}

fn strip_marker<'a>(flag: &'a str, marker: &str) -> Result<&'a str> {
    flag.strip_prefix(marker)
        .ok_or_else(|| FrameworkError::UnexpectedFlag {
            flag: flag.to_string(),
            expected: format!("a '{marker}' prefix"),
        })
}

/// The compiled header directory: first compile flag without `-I`.
pub fn include_dir(compile_flags: &[String]) -> Result<&str> {
    strip_marker(nth(compile_flags, "compile", 0)?, INCLUDE_FLAG)
}

/// The shared library directory: first link flag without `-L`.
pub fn library_dir(link_flags: &[String]) -> Result<&str> {
    strip_marker(nth(link_flags, "link", 0)?, LIBRARY_DIR_FLAG)
}

/// The shared library file name: second link flag without `-l:`.
pub fn library_name(link_flags: &[String]) -> Result<&str> {
    strip_marker(nth(link_flags, "link", 1)?, LIBRARY_NAME_FLAG)
}

/// The Python extension directory derived from the include flag.
///
/// Used where the link flags are unusable: the trailing `include` of the
/// header directory is replaced by `python`, keeping the separator.
pub fn python_lib_dir(compile_flags: &[String]) -> Result<String> {
    let include = include_dir(compile_flags)?;
    let base = include
        .strip_suffix(INCLUDE_DIR_SUFFIX)
        .ok_or_else(|| FrameworkError::UnexpectedFlag {
            flag: format!("{INCLUDE_FLAG}{include}"),
            expected: format!("a path ending in '{INCLUDE_DIR_SUFFIX}'"),
        })?;
    Ok(format!("{base}{PYTHON_LIB_SUBDIR}"))
}

/// Rewrite Windows path separators as forward slashes.
pub fn to_forward_slashes(path: &str) -> String {
    path.replace('\\', "/")
}
