//! `tfra-configure clean` — remove the generated configuration.

use std::path::Path;

use anyhow::Result;
use tfra_bazel::rc::remove_stale;

/// Remove the configuration file if present.
pub fn run(output: &Path) -> Result<()> {
    if remove_stale(output)? {
        println!("Removed {}", output.display());
    } else {
        println!("Already clean: {} does not exist", output.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn clean_removes_config() {
        let dir = tempfile::tempdir().unwrap();
        let rc = dir.path().join(".bazelrc");
        fs::write(&rc, "build -c opt\n").unwrap();

        run(&rc).unwrap();
        assert!(!rc.exists());
    }

    #[test]
    fn clean_handles_already_clean() {
        let dir = tempfile::tempdir().unwrap();
        run(&dir.path().join(".bazelrc")).unwrap();
    }
}
