use std::{
    env,
    path::{Path, PathBuf},
};

use strand_on_disk::TempRepo;

use crate::{App, Result};

// A TempCwd allows you to temporarily change the current
// working directory for the host process.
//
// When the struct goes out of scope, the current working
// directory will be reset to its previous value.
//
// Because this is intended for testing, its functions
// panic instead of returning Result structs.
//
// Any test that uses this module should be marked #[serial].
pub(crate) struct TempCwd {
    old_path: PathBuf,
}

impl TempCwd {
    // Temporarily change working directory. The existing working
    // directory will be restored when the struct is dropped.
    pub fn new<P: AsRef<Path>>(path: P) -> TempCwd {
        let old_path = env::current_dir().unwrap();
        env::set_current_dir(path).unwrap();

        TempCwd { old_path }
    }
}

impl Drop for TempCwd {
    fn drop(&mut self) {
        env::set_current_dir(&self.old_path).unwrap();
    }
}

// A fresh repository that is also the current working directory,
// so commands can be run against it in-process.
pub(crate) struct InRepo {
    // Field order matters: the old cwd must be restored before
    // the temporary directory is removed.
    _cwd: TempCwd,
    pub repo: TempRepo,
}

impl InRepo {
    pub fn new() -> InRepo {
        let repo = TempRepo::new();
        let _cwd = TempCwd::new(repo.path());
        InRepo { _cwd, repo }
    }

    // Run a command and return its stdout as a string.
    pub fn run(&self, args: &[&str]) -> Result<String> {
        let stdout = App::run_with_args(args.to_vec())?;
        Ok(String::from_utf8(stdout)?)
    }

    // Run a command that must succeed.
    pub fn ok(&self, args: &[&str]) -> String {
        self.run(args).unwrap()
    }

    // Run a command that must fail and return its error message.
    pub fn err(&self, args: &[&str]) -> String {
        self.run(args).unwrap_err().to_string()
    }
}
