use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::Command;

use reqwest::blocking::Client;

use crate::options::Mode;
use crate::response::Resolved;

const CHUNK_SIZE: usize = 64 * 1024;

#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    #[error("download link expired or unavailable")]
    LinkExpired,
    #[error("file server answered HTTP {0}")]
    Status(u16),
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("could not open link: {0}")]
    Opener(String),
}

/// How a resolved link becomes a file for the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Verify the link, then hand it to the user or the system opener.
    Redirect,
    /// Fetch the bytes here and save them into the output directory.
    Stream,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Progress {
    pub percent: u8,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    HandedOff { url: String, filename: String },
    Saved { path: PathBuf, bytes: u64 },
}

impl Outcome {
    pub fn filename(&self) -> String {
        match self {
            Self::HandedOff { filename, .. } => filename.clone(),
            Self::Saved { path, .. } => path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
        }
    }
}

pub struct Executor {
    http: Client,
    output_dir: PathBuf,
    open_links: bool,
}

impl Executor {
    pub fn new(http: Client, output_dir: impl Into<PathBuf>, open_links: bool) -> Self {
        Self {
            http,
            output_dir: output_dir.into(),
            open_links,
        }
    }

    pub fn execute(
        &self,
        strategy: Strategy,
        resolved: &Resolved,
        mode: Mode,
        on_progress: &mut dyn FnMut(Progress),
    ) -> Result<Outcome, DownloadError> {
        let given = resolved.filename.as_deref().and_then(safe_filename);
        match strategy {
            Strategy::Redirect => {
                let filename = given.unwrap_or_else(|| fallback_filename(None));
                self.redirect(&resolved.url, filename)
            }
            Strategy::Stream => {
                let filename = given.unwrap_or_else(|| fallback_filename(Some(mode.extension())));
                self.stream(&resolved.url, &filename, on_progress)
            }
        }
    }

    /// HEAD the link. Anything other than a success status counts as expired.
    pub fn check_link(&self, url: &str) -> Result<(), DownloadError> {
        match self.http.head(url).send() {
            Ok(resp) if resp.status().is_success() => Ok(()),
            Ok(resp) => {
                log::warn!("link check for {url} answered HTTP {}", resp.status());
                Err(DownloadError::LinkExpired)
            }
            Err(e) => {
                log::warn!("link check for {url} failed: {e}");
                Err(DownloadError::LinkExpired)
            }
        }
    }

    pub fn redirect(&self, url: &str, filename: String) -> Result<Outcome, DownloadError> {
        self.check_link(url)?;
        if self.open_links {
            launch_opener(url)?;
        }
        Ok(Outcome::HandedOff {
            url: url.to_string(),
            filename,
        })
    }

    pub fn stream(
        &self,
        url: &str,
        filename: &str,
        on_progress: &mut dyn FnMut(Progress),
    ) -> Result<Outcome, DownloadError> {
        let mut resp = self.http.get(url).send()?;
        if !resp.status().is_success() {
            return Err(DownloadError::Status(resp.status().as_u16()));
        }

        let total = resp.content_length().filter(|&n| n > 0);
        log::debug!("streaming {url} (size: {total:?})");

        let bytes = collect_body(&mut resp, total, on_progress)?;
        let path = save_file(&bytes, &self.output_dir, filename)?;
        log::info!("saved {} ({})", path.display(), format_size(bytes.len() as u64));

        Ok(Outcome::Saved {
            path,
            bytes: bytes.len() as u64,
        })
    }
}

/// Read a whole body into memory.
///
/// With a known `total` the body is read chunk by chunk and progress is
/// reported after every chunk. Without one it is a single buffered read and
/// `on_progress` is never called.
pub fn collect_body<R: Read>(
    mut reader: R,
    total: Option<u64>,
    on_progress: &mut dyn FnMut(Progress),
) -> io::Result<Vec<u8>> {
    let Some(total) = total else {
        let mut body = Vec::new();
        reader.read_to_end(&mut body)?;
        return Ok(body);
    };

    let mut body = Vec::with_capacity(usize::try_from(total).unwrap_or(0));
    let mut chunk = vec![0_u8; CHUNK_SIZE];
    loop {
        let read = match reader.read(&mut chunk) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        body.extend_from_slice(&chunk[..read]);

        let received = body.len() as u64;
        on_progress(Progress {
            percent: percent(received, total),
            text: format!("{} / {}", format_size(received), format_size(total)),
        });
    }

    Ok(body)
}

fn percent(received: u64, total: u64) -> u8 {
    let pct = (received as f64 / total as f64 * 100.0).round();
    pct.min(100.0) as u8
}

/// Write `bytes` to `dir/filename` through a temporary file in the same
/// directory, so a failed write never leaves a partial file behind.
pub fn save_file(bytes: &[u8], dir: &Path, filename: &str) -> io::Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(filename);

    let mut tmp = tempfile::Builder::new()
        .prefix(".y2mp3-")
        .suffix(".part")
        .tempfile_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.flush()?;
    tmp.persist(&path).map_err(|e| e.error)?;

    Ok(path)
}

/// Keep only the last path component of a server-provided name.
pub fn safe_filename(name: &str) -> Option<String> {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name).trim();
    match base {
        "" | "." | ".." => None,
        _ => Some(base.to_string()),
    }
}

pub fn fallback_filename(extension: Option<&str>) -> String {
    let stamp = chrono::Utc::now().timestamp_millis();
    match extension {
        Some(ext) => format!("download_{stamp}.{ext}"),
        None => format!("download_{stamp}"),
    }
}

pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 3] = ["KB", "MB", "GB"];

    if bytes < 1024 {
        return format!("{bytes} B");
    }
    let mut value = bytes as f64 / 1024.0;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{value:.1} {}", UNITS[unit])
}

fn launch_opener(url: &str) -> Result<(), DownloadError> {
    let mut cmd = if cfg!(target_os = "macos") {
        Command::new("open")
    } else if cfg!(target_os = "windows") {
        let mut cmd = Command::new("cmd");
        cmd.args(["/C", "start", ""]);
        cmd
    } else {
        Command::new("xdg-open")
    };

    let status = cmd.arg(url).status()?;
    if status.success() {
        Ok(())
    } else {
        Err(DownloadError::Opener(format!("opener exited with {status}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    /// Hands out at most `step` bytes per read.
    struct Trickle {
        data: Cursor<Vec<u8>>,
        step: usize,
    }

    impl Read for Trickle {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            let n = buf.len().min(self.step);
            self.data.read(&mut buf[..n])
        }
    }

    struct Broken;

    impl Read for Broken {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::ConnectionReset, "reset"))
        }
    }

    #[test]
    fn known_size_reports_progress_up_to_100() {
        let data = vec![7_u8; 10_000];
        let reader = Trickle {
            data: Cursor::new(data.clone()),
            step: 3_000,
        };
        let mut seen = Vec::new();

        let body = collect_body(reader, Some(10_000), &mut |p: Progress| seen.push(p)).unwrap();

        assert_eq!(body, data);
        let percents: Vec<u8> = seen.iter().map(|p| p.percent).collect();
        assert_eq!(percents, vec![30, 60, 90, 100]);
        assert_eq!(seen.last().unwrap().text, "9.8 KB / 9.8 KB");
    }

    #[test]
    fn unknown_size_reads_once_without_progress() {
        let data = b"whole body".to_vec();
        let mut calls = 0;

        let body = collect_body(Cursor::new(data.clone()), None, &mut |_: Progress| calls += 1).unwrap();

        assert_eq!(body, data);
        assert_eq!(calls, 0);
    }

    #[test]
    fn read_failure_aborts() {
        let err = collect_body(Broken, Some(100), &mut |_: Progress| {}).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::ConnectionReset);
    }

    #[test]
    fn save_file_leaves_only_the_final_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = save_file(b"abc", dir.path(), "song.mp3").unwrap();

        assert_eq!(path, dir.path().join("song.mp3"));
        assert_eq!(fs::read(&path).unwrap(), b"abc");
        let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn server_filenames_lose_their_directories() {
        assert_eq!(safe_filename("../../etc/passwd").as_deref(), Some("passwd"));
        assert_eq!(safe_filename("a\\b\\c.mp4").as_deref(), Some("c.mp4"));
        assert_eq!(safe_filename("song.mp3").as_deref(), Some("song.mp3"));
        assert_eq!(safe_filename("dir/"), None);
        assert_eq!(safe_filename(".."), None);
    }

    #[test]
    fn fallback_names_carry_the_extension() {
        let name = fallback_filename(Some("mp3"));
        assert!(name.starts_with("download_") && name.ends_with(".mp3"));
        assert!(!fallback_filename(None).contains('.'));
    }

    #[test]
    fn sizes_are_human_readable() {
        assert_eq!(format_size(0), "0 B");
        assert_eq!(format_size(1023), "1023 B");
        assert_eq!(format_size(1024), "1.0 KB");
        assert_eq!(format_size(1536), "1.5 KB");
        assert_eq!(format_size(5 * 1024 * 1024), "5.0 MB");
        assert_eq!(format_size(3 * 1024 * 1024 * 1024), "3.0 GB");
        assert_eq!(format_size(4096 * 1024 * 1024 * 1024), "4096.0 GB");
    }

    #[test]
    fn percent_is_rounded_and_capped() {
        assert_eq!(percent(1, 3), 33);
        assert_eq!(percent(2, 3), 67);
        assert_eq!(percent(150, 100), 100);
    }
}
