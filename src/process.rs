//! Fire-and-forget process spawning for the `spawn` bind action.
//!
//! Out of scope as an *algorithm* per `spec.md` §1 ("child-process spawning
//! ... treated as a fire-and-forget external effect"), but still ambient
//! plumbing the dispatcher needs. Mirrors dwm.c's `spawn()`
//! (`examples/original_source/dwm.c:1623`): fork, close the X connection fd
//! in the child, `setsid`, `execvp`.

use std::ffi::CString;

use libc::{c_int, pid_t};
use log::error;

/// Forks and execs `cmd` (argv[0] is the program, the rest are arguments).
/// The parent returns immediately; the child never returns on success.
///
/// # Safety
/// Calls `fork(2)` directly. Must only be called from the single-threaded
/// main loop, never from inside a signal handler or another thread.
pub unsafe fn spawn(cmd: &[&str], display_fd: Option<c_int>) {
    if cmd.is_empty() {
        return;
    }
    let pid: pid_t = libc::fork();
    if pid != 0 {
        return;
    }
    if let Some(fd) = display_fd {
        libc::close(fd);
    }
    libc::setsid();

    let cstrs: Vec<CString> = cmd.iter().map(|s| CString::new(*s).unwrap()).collect();
    let mut argv: Vec<*const libc::c_char> = cstrs.iter().map(|c| c.as_ptr()).collect();
    argv.push(std::ptr::null());

    libc::execvp(argv[0], argv.as_ptr());
    error!("execvp {} failed", cmd[0]);
    libc::_exit(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_command_is_a_no_op() {
        unsafe {
            spawn(&[], None);
        }
    }
}
