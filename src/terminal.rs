//! Live terminal title control

use std::io::{self, IsTerminal, Write};

/// Sets the title of the terminal hosting this process
pub trait TerminalTitle {
    fn set_terminal_title(&self, title: &str) -> io::Result<()>;
}

/// OSC 0 on stdout, plus SetConsoleTitleW on Windows consoles
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleTitle;

impl TerminalTitle for ConsoleTitle {
    fn set_terminal_title(&self, title: &str) -> io::Result<()> {
        let title = sanitize(title);

        #[cfg(windows)]
        set_console_title(&title);

        let stdout = io::stdout();
        if stdout.is_terminal() {
            write_osc_title(&mut stdout.lock(), &title)?;
        }
        Ok(())
    }
}

fn write_osc_title(out: &mut impl Write, title: &str) -> io::Result<()> {
    out.write_all(osc_title(title).as_bytes())?;
    out.flush()
}

/// `ESC ] 0 ; title BEL`
fn osc_title(title: &str) -> String {
    format!("\x1b]0;{title}\x07")
}

/// Drop control chars so the title cannot terminate the escape early
fn sanitize(title: &str) -> String {
    title.chars().filter(|c| !c.is_control()).collect()
}

#[cfg(windows)]
fn set_console_title(title: &str) {
    use windows::Win32::System::Console::SetConsoleTitleW;
    use windows::core::HSTRING;

    // No console attached (e.g. GUI host) → nothing to set
    if let Err(e) = unsafe { SetConsoleTitleW(&HSTRING::from(title)) } {
        tracing::debug!(error = %e, "SetConsoleTitleW failed");
    }
}
