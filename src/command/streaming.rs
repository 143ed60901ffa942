//! Command runner that forwards child output to the operator while capturing
//! it.

use std::ffi::OsString;
use std::io::{self, Read, Write};
use std::process::{Command, Stdio};
use std::thread;

use super::{CommandError, CommandOutput, CommandRunner, spawn_error};

/// Runs commands with stdout and stderr mirrored to the parent process.
///
/// Build and transfer tools print progress and diagnostics that the operator
/// should see as they happen; this runner tees both streams so the output is
/// shown verbatim and also kept for error reporting.
#[derive(Clone, Debug, Default)]
pub struct StreamingCommandRunner;

impl CommandRunner for StreamingCommandRunner {
    fn run(&self, program: &str, args: &[OsString]) -> Result<CommandOutput, CommandError> {
        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|err| spawn_error(program, &err))?;

        let child_stdout = child.stdout.take();
        let child_stderr = child.stderr.take();

        let (stdout, stderr) = thread::scope(|scope| {
            let out = scope.spawn(|| tee(child_stdout, io::stdout()));
            let err = scope.spawn(|| tee(child_stderr, io::stderr()));
            (join_capture(out), join_capture(err))
        });

        let status = child.wait().map_err(|err| spawn_error(program, &err))?;

        Ok(CommandOutput {
            code: status.code(),
            stdout: stdout.map_err(|err| spawn_error(program, &err))?,
            stderr: stderr.map_err(|err| spawn_error(program, &err))?,
        })
    }
}

fn tee<R: Read, W: Write>(source: Option<R>, mut sink: W) -> io::Result<String> {
    let Some(mut reader) = source else {
        return Ok(String::new());
    };

    let mut captured = Vec::new();
    let mut buffer = [0_u8; 8192];
    loop {
        let read = reader.read(&mut buffer)?;
        if read == 0 {
            break;
        }
        let chunk = buffer.get(..read).unwrap_or_default();
        captured.extend_from_slice(chunk);
        // Forwarding is best-effort; a closed terminal must not fail the step.
        sink.write_all(chunk).ok();
        sink.flush().ok();
    }

    Ok(String::from_utf8_lossy(&captured).into_owned())
}

fn join_capture(handle: thread::ScopedJoinHandle<'_, io::Result<String>>) -> io::Result<String> {
    handle
        .join()
        .unwrap_or_else(|_| Err(io::Error::other("output forwarding thread panicked")))
}
