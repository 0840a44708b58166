use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};

use y2mp3::config::{self, Config};
use y2mp3::options::{
    AUDIO_DEFAULTS, AudioBitrate, AudioFormat, Mode, VIDEO_DEFAULTS, VideoCodec, VideoContainer,
    VideoQuality,
};
use y2mp3::terminal::{TerminalPresenter, input_lines};
use y2mp3::validate::validate_input;
use y2mp3::{Finish, Flavor, Selection, Session};

#[derive(Parser)]
#[command(name = "y2mp3", about = "Fetch YouTube audio or video through a conversion API")]
struct Cli {
    /// debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Conversion API endpoint
    #[arg(long, global = true, env = "Y2MP3_API_URL", default_value = config::DEFAULT_API_URL)]
    api_url: String,

    /// API key, sent as `Authorization: Api-Key <key>`. Empty sends nothing
    #[arg(long, global = true, env = "Y2MP3_API_KEY", default_value = "", hide_env_values = true)]
    api_key: String,

    /// Request timeout in seconds
    #[arg(long, global = true, default_value_t = config::DEFAULT_TIMEOUT_SECS)]
    timeout: u64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Convert and download one URL
    Get {
        /// YouTube URL
        url: String,
        #[command(flatten)]
        opts: DownloadArgs,
    },

    /// Read URLs from stdin, one per line. `:audio` / `:video` switch mode
    Shell {
        #[command(flatten)]
        opts: DownloadArgs,
    },

    /// Check whether a URL would be accepted
    Check {
        /// YouTube URL
        url: String,
    },

    /// Print the default request options for both modes
    Defaults,
}

#[derive(Args)]
struct DownloadArgs {
    /// Output mode
    #[arg(short, long, value_enum, default_value_t = Mode::Audio)]
    mode: Mode,
    /// Audio format (audio mode)
    #[arg(long, value_enum)]
    format: Option<AudioFormat>,
    /// Audio bitrate in kbps (audio mode)
    #[arg(long, value_enum)]
    bitrate: Option<AudioBitrate>,
    /// Video quality (video mode)
    #[arg(long, value_enum)]
    quality: Option<VideoQuality>,
    /// Video codec (video mode)
    #[arg(long, value_enum)]
    codec: Option<VideoCodec>,
    /// Video container (video mode)
    #[arg(long, value_enum)]
    container: Option<VideoContainer>,
    /// inline: verify and hand off the link; status-line: stream to disk with progress
    #[arg(long, value_enum, default_value_t = Flavor::Inline)]
    flavor: Flavor,
    /// Output directory for streamed files
    #[arg(short, long, default_value = config::DEFAULT_OUTPUT_DIR)]
    output: PathBuf,
    /// Open handed-off links with the system opener
    #[arg(long)]
    open: bool,
    /// Return to idle immediately instead of holding status messages
    #[arg(long)]
    no_wait: bool,
}

impl DownloadArgs {
    fn selection(&self, mode: Mode) -> Selection {
        let d = mode.defaults();
        match mode {
            Mode::Audio => Selection::Audio {
                format: self.format.unwrap_or(d.audio_format),
                bitrate: self.bitrate.unwrap_or(d.audio_bitrate),
            },
            Mode::Video => Selection::Video {
                quality: self.quality.unwrap_or(d.video_quality),
                codec: self.codec.unwrap_or(d.youtube_video_codec),
                container: self.container.unwrap_or(d.youtube_video_container),
            },
        }
    }
}

fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    match cli.command {
        Command::Get { ref url, ref opts } => {
            let mut session = open_session(&cli, opts, opts.mode)?;
            // no settle: nothing follows a one-shot trigger
            Ok(match session.trigger(url) {
                Finish::Ready(_) => ExitCode::SUCCESS,
                _ => ExitCode::FAILURE,
            })
        }
        Command::Shell { ref opts } => {
            let mut session = open_session(&cli, opts, opts.mode)?;
            eprintln!("paste a URL and press Enter (:audio, :video, empty line to quit)");

            for line in input_lines(io::stdin().lock()) {
                match line.trim() {
                    "" => break,
                    ":audio" => session.set_selection(opts.selection(Mode::Audio)),
                    ":video" => session.set_selection(opts.selection(Mode::Video)),
                    input => {
                        session.trigger(input);
                        session.settle();
                    }
                }
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Check { ref url } => match validate_input(url) {
            Ok(url) => {
                println!("valid: {url}");
                Ok(ExitCode::SUCCESS)
            }
            Err(e) => {
                println!("invalid: {e}");
                Ok(ExitCode::FAILURE)
            }
        },
        Command::Defaults => {
            println!("{}", defaults_table()?);
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn open_session(
    cli: &Cli,
    opts: &DownloadArgs,
    mode: Mode,
) -> anyhow::Result<Session<TerminalPresenter<io::Stderr>>> {
    let config = Config {
        api_url: Config::parse_api_url(&cli.api_url)?,
        api_key: cli.api_key.clone(),
        timeout: Duration::from_secs(cli.timeout),
        output_dir: opts.output.clone(),
        flavor: opts.flavor,
        open_links: opts.open,
        wait: !opts.no_wait,
    };
    log::debug!("using API at {}", config.api_url);

    let presenter = TerminalPresenter::new(io::stderr());
    let session = Session::from_config(&config, opts.selection(mode), presenter)?;
    Ok(session)
}

fn defaults_table() -> anyhow::Result<comfy_table::Table> {
    let audio = serde_json::to_value(AUDIO_DEFAULTS)?;
    let video = serde_json::to_value(VIDEO_DEFAULTS)?;

    let mut table = comfy_table::Table::new();
    table.set_header(["Field", "Audio", "Video"]);

    if let (Some(audio), Some(video)) = (audio.as_object(), video.as_object()) {
        for (field, value) in audio {
            let other = video.get(field).map(render_value).unwrap_or_default();
            table.add_row([field.clone(), render_value(value), other]);
        }
    }

    Ok(table)
}

fn render_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
