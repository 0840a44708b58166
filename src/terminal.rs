use std::io::{self, BufRead, Write};

use crate::executor::{Outcome, Progress, format_size};
use crate::session::Presenter;
use crate::state::UiState;

/// Status area on a terminal stream (stderr in the binary).
pub struct TerminalPresenter<W: Write> {
    out: W,
    progress_open: bool,
}

impl<W: Write> TerminalPresenter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            progress_open: false,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn line(&mut self, text: &str) {
        if self.progress_open {
            report(writeln!(self.out));
            self.progress_open = false;
        }
        report(writeln!(self.out, "{text}"));
    }
}

/// A broken status stream must not interrupt a download.
fn report(result: io::Result<()>) {
    if let Err(e) = result {
        log::debug!("status output failed: {e}");
    }
}

/// Lines typed into the shell. Lines that are not valid UTF-8 are logged
/// and skipped; any other read error ends the input like EOF.
pub fn input_lines<R: BufRead>(reader: R) -> impl Iterator<Item = String> {
    reader
        .lines()
        .map_while(|line| match line {
            Ok(line) => Some(Some(line)),
            Err(e) if e.kind() == io::ErrorKind::InvalidData => {
                log::warn!("skipping unreadable input line: {e}");
                Some(None)
            }
            Err(e) => {
                log::error!("input closed: {e}");
                None
            }
        })
        .flatten()
}

impl<W: Write> Presenter for TerminalPresenter<W> {
    fn state_changed(&mut self, state: &UiState) {
        match state {
            UiState::Idle => {}
            UiState::Processing => self.line("Processing your request..."),
            UiState::Downloading => self.line("Preparing download..."),
            UiState::Ready { filename } => self.line(&format!("✓ Download started: {filename}")),
            UiState::Error { message } => self.line(&format!("✗ {message}")),
        }
    }

    fn rejected(&mut self, message: &str) {
        self.line(&format!("✗ {message}"));
    }

    fn progress(&mut self, progress: &Progress) {
        report(write!(self.out, "\r{:>3}% {}", progress.percent, progress.text));
        report(self.out.flush());
        self.progress_open = true;
    }

    fn outcome(&mut self, outcome: &Outcome) {
        match outcome {
            Outcome::HandedOff { url, filename } => {
                self.line(&format!("Ready to download: {filename}"));
                self.line(url);
            }
            Outcome::Saved { path, bytes } => {
                self.line(&format!("Saved {} ({})", path.display(), format_size(*bytes)));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn render(f: impl FnOnce(&mut TerminalPresenter<Vec<u8>>)) -> String {
        let mut presenter = TerminalPresenter::new(Vec::new());
        f(&mut presenter);
        String::from_utf8(presenter.into_inner()).unwrap()
    }

    #[test]
    fn states_render_status_lines() {
        let out = render(|p| {
            p.state_changed(&UiState::Processing);
            p.state_changed(&UiState::Error {
                message: "Invalid YouTube URL".into(),
            });
            p.state_changed(&UiState::Idle);
        });
        assert_eq!(out, "Processing your request...\n✗ Invalid YouTube URL\n");
    }

    #[test]
    fn progress_line_is_closed_before_next_message() {
        let out = render(|p| {
            p.progress(&Progress {
                percent: 50,
                text: "1.0 KB / 2.0 KB".into(),
            });
            p.outcome(&Outcome::Saved {
                path: PathBuf::from("downloads/a.mp3"),
                bytes: 2048,
            });
        });
        assert_eq!(out, "\r 50% 1.0 KB / 2.0 KB\nSaved downloads/a.mp3 (2.0 KB)\n");
    }

    struct Closed;

    impl Write for Closed {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }
    }

    #[test]
    fn write_failures_are_swallowed() {
        let mut p = TerminalPresenter::new(Closed);
        p.progress(&Progress {
            percent: 10,
            text: "1 KB".into(),
        });
        assert!(p.progress_open);
        p.state_changed(&UiState::Processing);
        p.rejected("Please enter a YouTube URL");
        assert!(!p.progress_open);
    }

    #[test]
    fn invalid_utf8_input_line_is_skipped() {
        let input: &[u8] = b"https://youtu.be/a\n\xff\xfe\n:video\n";
        let lines: Vec<String> = input_lines(input).collect();
        assert_eq!(lines, ["https://youtu.be/a", ":video"]);
    }
}
