use std::{
    env,
    path::{Component, Path},
};

use strand_core::repo::{Error, Result};
use strand_on_disk::OnDisk;

// Discover a strand repo containing the given path.
//
// Looks in `path` and then in each of its ancestors for a
// `.strand` directory.
pub fn from_path<P: AsRef<Path>>(path: P) -> Result<OnDisk> {
    OnDisk::discover(path.as_ref())
}

// Discover a strand repo containing the current working directory.
#[cfg(not(tarpaulin_include))]
pub fn from_current_dir() -> Result<OnDisk> {
    // This function is excluded from code coverage because we can't
    // be sure of the execution environment while testing. So we keep
    // it as simple as possible.
    let path = env::current_dir()?;
    from_path(path)
}

// Convert a command-line path (relative to the current working
// directory) into a `/`-separated path relative to the repo's
// work dir. `.` and `..` segments are resolved lexically; a path
// that leaves the work dir is rejected later by path validation.
pub fn repo_relative(repo: &OnDisk, arg: &str) -> Result<String> {
    let cwd = env::current_dir()?.canonicalize()?;
    let prefix = cwd
        .strip_prefix(repo.work_dir())
        .map_err(|_| Error::WorkDirDoesntExist(cwd.clone()))?;

    let mut segments: Vec<String> = Vec::new();
    for component in prefix.join(arg).components() {
        match component {
            Component::CurDir => {}
            Component::Normal(s) => segments.push(s.to_string_lossy().into_owned()),
            Component::ParentDir => match segments.last() {
                Some(last) if last != ".." => {
                    segments.pop();
                }
                _ => segments.push("..".to_string()),
            },
            Component::RootDir | Component::Prefix(_) => {
                return Ok(arg.to_string());
            }
        }
    }

    Ok(segments.join("/"))
}
