use once_cell::sync::Lazy;
use regex::Regex;

static WATCH_OR_SHORT_LINK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(https?://)?(www\.)?(youtube\.com/watch\?v=|youtu\.be/)").expect("watch link regex")
});

static ANY_YOUTUBE_PATH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(https?://)?(www\.)?youtube\.com/.+").expect("youtube path regex"));

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    #[error("Please enter a YouTube URL")]
    Empty,
    #[error("Please enter a valid YouTube URL")]
    Invalid,
}

/// Lexical check for a YouTube watch link, short link or channel/shorts path.
/// Scheme and `www.` are optional. No network access.
pub fn is_video_url(input: &str) -> bool {
    let url = input.trim();
    if url.is_empty() {
        return false;
    }
    WATCH_OR_SHORT_LINK.is_match(url) || ANY_YOUTUBE_PATH.is_match(url)
}

/// Trim raw input and classify it, returning the trimmed URL when it passes.
pub fn validate_input(input: &str) -> Result<&str, InputError> {
    let url = input.trim();
    if url.is_empty() {
        return Err(InputError::Empty);
    }
    if !is_video_url(url) {
        return Err(InputError::Invalid);
    }
    Ok(url)
}
