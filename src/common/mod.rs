pub mod error;
pub mod io;
pub mod out;

pub use self::error::{Error, Result};
pub use self::out::{OutBuf, nul_terminate};

/// Reset SIGPIPE to default behavior (SIG_DFL) so `httpcodec ... | head`
/// terminates quietly instead of reporting a write error.
/// Rust sets SIGPIPE to SIG_IGN by default. Call at the start of main().
#[inline]
pub fn reset_sigpipe() {
    #[cfg(unix)]
    unsafe {
        libc::signal(libc::SIGPIPE, libc::SIG_DFL);
    }
}

/// Format an IO error message without the "(os error N)" suffix.
pub fn io_error_msg(e: &std::io::Error) -> String {
    if let Some(raw) = e.raw_os_error() {
        let os_err = std::io::Error::from_raw_os_error(raw);
        let msg = format!("{}", os_err);
        msg.replace(&format!(" (os error {})", raw), "")
    } else {
        format!("{}", e)
    }
}
