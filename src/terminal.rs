//! Terminal handling: character-at-a-time input and guaranteed restoration.
//!
//! Raw mode is acquired through [`set_terminal_raw`] and released by the
//! returned guard's `Drop`, so every exit path (halt, error return, panic
//! unwind) puts the terminal back. SIGINT bypasses unwinding, therefore
//! [`install_interrupt_handler`] restores the saved state directly before
//! terminating the process.

use std::io;
use std::io::{Write, stdin};
use std::os::fd::{AsRawFd, RawFd};
use std::process;
use std::sync::OnceLock;
use termios::{ECHO, ICANON, TCSANOW, Termios};

/// Terminal state as it was before raw mode, for the signal handler.
static ORIGINAL_TERMIOS: OnceLock<Termios> = OnceLock::new();

pub struct RawLock {
    fd: RawFd,
    termios_orig: Termios,
}

impl Drop for RawLock {
    fn drop(&mut self) {
        // terminal stays in raw mode but no means to repair
        let _ = termios::tcsetattr(self.fd, TCSANOW, &self.termios_orig);
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum EchoOptions {
    EchoOn,
    EchoOff,
}

/// Switches stdin to character-at-a-time input and returns the restoring
/// guard.
///
/// Only `ICANON` and `ECHO` are cleared; `ISIG` stays active so Ctrl-C is
/// still delivered as SIGINT.
///
/// # Errors
/// - stdin is not a terminal or the attributes cannot be changed
pub fn set_terminal_raw(eo: EchoOptions) -> Result<RawLock, io::Error> {
    let fd = stdin().as_raw_fd();
    let termios_orig = Termios::from_fd(fd)?;
    let _ = ORIGINAL_TERMIOS.set(termios_orig);
    let mut termios_raw = termios_orig;
    // https://man7.org/linux/man-pages/man3/termios.3.html
    termios_raw.c_lflag &= !(ICANON | ECHO);
    // c_lflag ECHO needed if we want to echo characters back after all
    if eo == EchoOptions::EchoOn {
        termios_raw.c_lflag |= ECHO;
    }
    termios::tcsetattr(fd, TCSANOW, &termios_raw)?;
    Ok(RawLock { fd, termios_orig })
}

/// Writes `message` and flushes so single characters appear immediately.
///
/// # Errors
/// - writing or flushing the underlying stream failed
pub fn print(out: &mut impl Write, message: &str) -> io::Result<()> {
    out.write_all(message.as_bytes())?;
    out.flush()
}

/// Installs a SIGINT handler that restores the terminal and terminates the
/// process with the conventional 128 + signal exit status.
pub fn install_interrupt_handler() {
    let handler = handle_interrupt as *const ();
    // SAFETY: the handler only restores terminal attributes and exits
    unsafe {
        libc::signal(libc::SIGINT, handler as libc::sighandler_t);
    }
}

extern "C" fn handle_interrupt(signal: libc::c_int) {
    if let Some(termios_orig) = ORIGINAL_TERMIOS.get() {
        let _ = termios::tcsetattr(stdin().as_raw_fd(), TCSANOW, termios_orig);
    }
    eprintln!("\nreceived signal {signal}");
    process::exit(128 + signal);
}
