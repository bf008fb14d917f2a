//! Log sink indirection.
//!
//! The base kernel writes log lines straight to a 16550 UART (see
//! `serial.rs` there). This subsystem doesn't own a serial port — the
//! embedding kernel does — so instead of hard-wiring a port address we
//! expose a registration hook the same way the base kernel exposes
//! `serial::_print`, and fall back to a line buffer under `#[cfg(test)]`
//! so assertions can inspect what was logged.

use core::fmt;
use spin::Mutex;

pub type SinkFn = fn(fmt::Arguments);

static SINK: Mutex<Option<SinkFn>> = Mutex::new(None);

/// Register the function the kernel wants log lines written through.
/// Until this is called, log output is dropped.
pub fn set_sink(f: SinkFn) {
    *SINK.lock() = Some(f);
}

#[doc(hidden)]
pub fn _print(args: fmt::Arguments) {
    #[cfg(test)]
    {
        test_capture::push(args);
        return;
    }
    #[cfg(not(test))]
    {
        if let Some(f) = *SINK.lock() {
            f(args);
        }
    }
}
