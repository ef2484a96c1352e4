//! Assembling the `.deb` container from its prepared members
//!
//! A Debian package is an `ar` archive whose members are, in order,
//! `debian-binary`, `control.tar.*` and `data.tar.*`. The members are
//! written to disk by the builder first; a [`MemberCombiner`] only joins
//! them.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tcpkg_errors::{BuildError, Error};
use tracing::{debug, info};

use crate::process::{HostProcessOperations, PlatformCommand, ProcessOperations};

/// Joins prepared member files into one container at `output`
pub trait MemberCombiner {
    /// Short name for logs
    fn name(&self) -> &'static str;

    /// Write `members`, in the given order, into a container at `output`
    ///
    /// A failed call may leave a partial file at `output`.
    ///
    /// # Errors
    ///
    /// Returns an error if a member cannot be read, the container cannot be
    /// written, or the external tool fails.
    fn combine_members(&self, output: &Path, members: &[PathBuf]) -> Result<(), Error>;
}

/// Member names as stored in the container
fn member_names(members: &[PathBuf]) -> Result<Vec<String>, Error> {
    members
        .iter()
        .map(|member| {
            member
                .file_name()
                .and_then(|name| name.to_str())
                .map(str::to_string)
                .ok_or_else(|| {
                    BuildError::InvalidPath {
                        path: member.display().to_string(),
                        reason: "member has no UTF-8 file name".to_string(),
                    }
                    .into()
                })
        })
        .collect()
}

/// Runs `ar r <output> <members...>` inside the members' directory
#[derive(Debug, Clone)]
pub struct ArCommandCombiner<P = HostProcessOperations> {
    program: String,
    process: P,
}

impl ArCommandCombiner {
    /// Use `program` (e.g. `ar`, `llvm-ar`) on the host
    pub fn new(program: impl Into<String>) -> Self {
        Self::with_process(program, HostProcessOperations)
    }
}

impl<P: ProcessOperations> ArCommandCombiner<P> {
    /// Use a custom process runner
    pub fn with_process(program: impl Into<String>, process: P) -> Self {
        Self {
            program: program.into(),
            process,
        }
    }
}

impl<P: ProcessOperations> MemberCombiner for ArCommandCombiner<P> {
    fn name(&self) -> &'static str {
        "ar"
    }

    fn combine_members(&self, output: &Path, members: &[PathBuf]) -> Result<(), Error> {
        let program = self.process.which(&self.program)?;
        let names = member_names(members)?;

        // Members are passed by bare name so the stored identifiers carry no directories
        let work_dir = match members.first().and_then(|m| m.parent()) {
            Some(dir) => dir.to_path_buf(),
            None => return Err(Error::internal("no members to combine")),
        };
        if let Some(stray) = members.iter().find(|m| m.parent() != Some(work_dir.as_path())) {
            return Err(BuildError::InvalidPath {
                path: stray.display().to_string(),
                reason: format!("all members must live in {}", work_dir.display()),
            }
            .into());
        }

        let output = std::path::absolute(output).map_err(|e| Error::io_with_path(&e, output))?;

        let mut cmd = PlatformCommand::new(&program.to_string_lossy());
        cmd.arg("r")
            .arg(output.as_os_str())
            .args(&names)
            .current_dir(&work_dir);

        info!(command = %cmd.display(), "combining package members");
        self.process.execute_command(&cmd)?.check(&cmd)?;
        Ok(())
    }
}

/// Writes the container in-process with the `ar` crate
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinArCombiner;

impl MemberCombiner for BuiltinArCombiner {
    fn name(&self) -> &'static str {
        "builtin"
    }

    fn combine_members(&self, output: &Path, members: &[PathBuf]) -> Result<(), Error> {
        let names = member_names(members)?;
        let file = File::create(output).map_err(|e| Error::io_with_path(&e, output))?;
        let mut archive = ar::Builder::new(BufWriter::new(file));

        for (member, name) in members.iter().zip(names) {
            let source = File::open(member).map_err(|e| Error::io_with_path(&e, member))?;
            let size = source
                .metadata()
                .map_err(|e| Error::io_with_path(&e, member))?
                .len();

            // Fixed owner and timestamp keep the container reproducible
            let mut header = ar::Header::new(name.clone().into_bytes(), size);
            header.set_mode(0o100_644);
            header.set_mtime(0);
            header.set_uid(0);
            header.set_gid(0);

            debug!(member = %name, size, "appending container member");
            archive
                .append(&header, source)
                .map_err(|e| Error::io_with_path(&e, output))?;
        }

        archive
            .into_inner()
            .and_then(|mut writer| std::io::Write::flush(&mut writer))
            .map_err(|e| Error::io_with_path(&e, output))?;
        info!(output = %output.display(), "package members combined");
        Ok(())
    }
}
