//! Child process supervision: liveness probing, graceful termination, reaping,
//! and the name-based orphan sweep.

use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use nix::sys::signal::{self, Signal};
use nix::unistd::Pid;

/// Poll `children` until `settle` elapses.
///
/// Returns `false` as soon as any child has exited (or cannot be polled), and
/// `true` only when every child is still running at the deadline.
pub(crate) fn settle(children: &mut [&mut Child], settle: Duration, poll: Duration) -> bool {
    let deadline = Instant::now() + settle;
    loop {
        for child in children.iter_mut() {
            match child.try_wait() {
                Ok(None) => {}
                Ok(Some(status)) => {
                    tracing::debug!(pid = child.id(), status = %status, "process exited while settling");
                    return false;
                }
                Err(e) => {
                    tracing::warn!(pid = child.id(), error = %e, "process status unavailable while settling");
                    return false;
                }
            }
        }
        let now = Instant::now();
        if now >= deadline {
            return true;
        }
        thread::sleep(poll.min(deadline - now));
    }
}

/// Ask a running child to exit with SIGTERM and wait up to `timeout`.
///
/// A child that outlives the timeout is left running; callers follow up with
/// [`reap`].
pub(crate) fn terminate(child: &mut Child, timeout: Duration, poll: Duration) {
    match child.try_wait() {
        Ok(None) => {}
        Ok(Some(_)) | Err(_) => return,
    }

    let pid = child.id();
    if let Err(e) = signal::kill(Pid::from_raw(pid as i32), Signal::SIGTERM) {
        tracing::debug!(pid, error = %e, "SIGTERM failed");
    }
    let deadline = Instant::now() + timeout;
    loop {
        match child.try_wait() {
            Ok(Some(status)) => {
                tracing::debug!(pid, status = %status, "process terminated");
                return;
            }
            Ok(None) => {
                let now = Instant::now();
                if now >= deadline {
                    tracing::debug!(pid, timeout_ms = timeout.as_millis() as u64, "process ignored SIGTERM");
                    return;
                }
                thread::sleep(poll.min(deadline - now));
            }
            Err(_) => return,
        }
    }
}

/// Make sure a child is dead and reaped so it cannot linger as a zombie.
pub(crate) fn reap(child: &mut Child) {
    match child.try_wait() {
        Ok(Some(_)) => {}
        Ok(None) | Err(_) => {
            let _ = child.kill();
            let _ = child.wait();
        }
    }
}

/// Send SIGTERM to every process whose name exactly matches one of `names`.
///
/// Catches backend processes no handle tracks anymore, e.g. left behind when
/// the service itself crashed. Any same-named process on the host is hit too.
pub(crate) fn sweep_by_name(names: &[String]) {
    for name in names {
        match Command::new("pkill")
            .args(["-x", name.as_str()])
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
        {
            // pkill exits 1 when nothing matched.
            Ok(status) if status.success() => {
                tracing::info!(name = %name, "signalled untracked backend processes");
            }
            Ok(_) => {}
            Err(e) => {
                tracing::debug!(name = %name, error = %e, "pkill unavailable");
            }
        }
    }
}
