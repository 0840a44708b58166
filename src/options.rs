//! Typed fields of the conversion API request schema and the two
//! per-mode default records.

use clap::ValueEnum;
use serde::Serialize;

/// What the user picked in the mode switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Mode {
    #[default]
    Audio,
    Video,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Audio => "audio",
            Self::Video => "video",
        }
    }

    /// Extension used for generated filenames.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Audio => "mp3",
            Self::Video => "mp4",
        }
    }

    pub fn defaults(&self) -> &'static DownloadOptions {
        match self {
            Self::Audio => &AUDIO_DEFAULTS,
            Self::Video => &VIDEO_DEFAULTS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DownloadMode {
    Audio,
    Video,
    Auto,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FilenameStyle {
    Classic,
    Pretty,
    Basic,
    Nerdy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioFormat {
    Best,
    Mp3,
    Ogg,
    Wav,
    Opus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize)]
pub enum AudioBitrate {
    #[value(name = "320")]
    #[serde(rename = "320")]
    Kbps320,
    #[value(name = "256")]
    #[serde(rename = "256")]
    Kbps256,
    #[value(name = "128")]
    #[serde(rename = "128")]
    Kbps128,
    #[value(name = "96")]
    #[serde(rename = "96")]
    Kbps96,
    #[value(name = "64")]
    #[serde(rename = "64")]
    Kbps64,
    #[value(name = "8")]
    #[serde(rename = "8")]
    Kbps8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize)]
pub enum VideoQuality {
    #[value(name = "max")]
    #[serde(rename = "max")]
    Max,
    #[value(name = "4320")]
    #[serde(rename = "4320")]
    P4320,
    #[value(name = "2160")]
    #[serde(rename = "2160")]
    P2160,
    #[value(name = "1440")]
    #[serde(rename = "1440")]
    P1440,
    #[value(name = "1080")]
    #[serde(rename = "1080")]
    P1080,
    #[value(name = "720")]
    #[serde(rename = "720")]
    P720,
    #[value(name = "480")]
    #[serde(rename = "480")]
    P480,
    #[value(name = "360")]
    #[serde(rename = "360")]
    P360,
    #[value(name = "240")]
    #[serde(rename = "240")]
    P240,
    #[value(name = "144")]
    #[serde(rename = "144")]
    P144,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VideoCodec {
    H264,
    Av1,
    Vp9,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VideoContainer {
    Auto,
    Mp4,
    Webm,
    Mkv,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LocalProcessing {
    Disabled,
    Preferred,
    Forced,
}

/// Every optional field of the request body. All of them are sent, even the
/// ones the active mode ignores, so the server always sees the full schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadOptions {
    pub download_mode: DownloadMode,
    pub filename_style: FilenameStyle,
    pub audio_format: AudioFormat,
    pub audio_bitrate: AudioBitrate,
    pub youtube_better_audio: bool,
    pub video_quality: VideoQuality,
    pub youtube_video_codec: VideoCodec,
    pub youtube_video_container: VideoContainer,
    #[serde(rename = "youtubeHLS")]
    pub youtube_hls: bool,
    pub disable_metadata: bool,
    #[serde(rename = "allowH265")]
    pub allow_h265: bool,
    pub convert_gif: bool,
    pub tiktok_full_audio: bool,
    pub always_proxy: bool,
    pub local_processing: LocalProcessing,
}

pub const AUDIO_DEFAULTS: DownloadOptions = DownloadOptions {
    download_mode: DownloadMode::Audio,
    filename_style: FilenameStyle::Basic,
    audio_format: AudioFormat::Mp3,
    audio_bitrate: AudioBitrate::Kbps128,
    youtube_better_audio: false,
    video_quality: VideoQuality::P1080,
    youtube_video_codec: VideoCodec::H264,
    youtube_video_container: VideoContainer::Mp4,
    youtube_hls: false,
    disable_metadata: false,
    allow_h265: false,
    convert_gif: true,
    tiktok_full_audio: false,
    always_proxy: false,
    local_processing: LocalProcessing::Disabled,
};

pub const VIDEO_DEFAULTS: DownloadOptions = DownloadOptions {
    download_mode: DownloadMode::Auto,
    ..AUDIO_DEFAULTS
};

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn audio_defaults_serialize_with_wire_names() {
        let value = serde_json::to_value(AUDIO_DEFAULTS).unwrap();
        assert_eq!(
            value,
            json!({
                "downloadMode": "audio",
                "filenameStyle": "basic",
                "audioFormat": "mp3",
                "audioBitrate": "128",
                "youtubeBetterAudio": false,
                "videoQuality": "1080",
                "youtubeVideoCodec": "h264",
                "youtubeVideoContainer": "mp4",
                "youtubeHLS": false,
                "disableMetadata": false,
                "allowH265": false,
                "convertGif": true,
                "tiktokFullAudio": false,
                "alwaysProxy": false,
                "localProcessing": "disabled"
            })
        );
    }

    #[test]
    fn video_defaults_differ_only_in_download_mode() {
        assert_eq!(VIDEO_DEFAULTS.download_mode, DownloadMode::Auto);
        assert_eq!(
            DownloadOptions {
                download_mode: DownloadMode::Audio,
                ..VIDEO_DEFAULTS
            },
            AUDIO_DEFAULTS
        );
    }

    #[test]
    fn numeric_enums_use_string_values() {
        assert_eq!(serde_json::to_string(&AudioBitrate::Kbps8).unwrap(), "\"8\"");
        assert_eq!(serde_json::to_string(&VideoQuality::Max).unwrap(), "\"max\"");
        assert_eq!(serde_json::to_string(&VideoQuality::P4320).unwrap(), "\"4320\"");
    }

    #[test]
    fn mode_picks_its_defaults() {
        assert_eq!(Mode::Audio.defaults(), &AUDIO_DEFAULTS);
        assert_eq!(Mode::Video.defaults(), &VIDEO_DEFAULTS);
        assert_eq!(Mode::Video.extension(), "mp4");
    }
}
