use serde::Serialize;

use crate::options::{
    AudioBitrate, AudioFormat, DownloadOptions, Mode, VideoCodec, VideoContainer, VideoQuality,
};

/// The fields a user controls for one mode. Everything else comes from the
/// mode's default record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    Audio {
        format: AudioFormat,
        bitrate: AudioBitrate,
    },
    Video {
        quality: VideoQuality,
        codec: VideoCodec,
        container: VideoContainer,
    },
}

impl Selection {
    /// Selection that reproduces the mode defaults unchanged.
    pub fn default_for(mode: Mode) -> Self {
        let d = mode.defaults();
        match mode {
            Mode::Audio => Self::Audio {
                format: d.audio_format,
                bitrate: d.audio_bitrate,
            },
            Mode::Video => Self::Video {
                quality: d.video_quality,
                codec: d.youtube_video_codec,
                container: d.youtube_video_container,
            },
        }
    }

    pub fn mode(&self) -> Mode {
        match self {
            Self::Audio { .. } => Mode::Audio,
            Self::Video { .. } => Mode::Video,
        }
    }
}

/// Body of the POST sent to the conversion API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DownloadRequest {
    pub url: String,
    #[serde(flatten)]
    pub options: DownloadOptions,
}

/// Copy the mode defaults and overlay the user-controlled fields.
pub fn build_request(url: &str, selection: &Selection) -> DownloadRequest {
    let mut options = *selection.mode().defaults();

    match *selection {
        Selection::Audio { format, bitrate } => {
            options.audio_format = format;
            options.audio_bitrate = bitrate;
        }
        Selection::Video {
            quality,
            codec,
            container,
        } => {
            options.video_quality = quality;
            options.youtube_video_codec = codec;
            options.youtube_video_container = container;
        }
    }

    DownloadRequest {
        url: url.to_string(),
        options,
    }
}
