use std::io::{self, Write};
use std::process;

use anyhow::{Result, anyhow};
use clap::{Parser, ValueEnum};
use log::info;

use httpcodec::base64::{self as b64, DecodeOptions, InvalidSymbols, OverflowPolicy};
use httpcodec::common::io::read_input;
use httpcodec::common::{io_error_msg, reset_sigpipe};
use httpcodec::{Error, html, url};

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

/// Exit status when the output buffer was too small; scripts can retry
/// with a larger --capacity.
const EXIT_OVERFLOW: i32 = 2;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Mode {
    HtmlEncode,
    UrlEncode,
    UrlDecode,
    Base64Encode,
    Base64Decode,
}

#[derive(Parser)]
#[command(
    name = "httpcodec",
    about = "Escape or unescape FILE, or standard input, to standard output.",
    after_help = "With no FILE, or when FILE is -, read standard input.\n\n\
        The output buffer is sized exactly for MODE unless --capacity is given.\n\
        Exit status is 2 when the output does not fit in the buffer, 1 on\n\
        malformed input or I/O errors.",
    version
)]
struct Cli {
    /// Transformation to apply
    #[arg(value_enum)]
    mode: Mode,

    /// Output buffer size in bytes
    #[arg(short = 'c', long = "capacity", value_name = "BYTES")]
    capacity: Option<usize>,

    /// When base64-decoding, reject non-alphabet bytes instead of skipping them
    #[arg(long = "strict")]
    strict: bool,

    /// When base64-decoding, emit the groups that fit instead of failing on overflow
    #[arg(long = "truncate")]
    truncate: bool,

    /// Log level (error|warn|info|debug|trace); defaults to RUST_LOG or warn
    #[arg(long = "log-level")]
    log_level: Option<String>,

    /// File to process (reads stdin if omitted or -)
    file: Option<String>,
}

fn init_logger(level: Option<&str>) {
    let mut builder = match level {
        Some(level) => {
            let mut b = env_logger::Builder::new();
            b.parse_filters(level);
            b
        }
        None => env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")),
    };
    let _ = builder.format_timestamp(None).try_init();
}

/// Output size that always suffices for `mode` on `input`.
fn required_capacity(mode: Mode, input: &[u8]) -> usize {
    match mode {
        Mode::HtmlEncode => html::encoded_len(input),
        Mode::UrlEncode => url::encoded_len(input),
        Mode::UrlDecode => url::decoded_len_max(input.len()),
        Mode::Base64Encode => b64::encoded_len(input.len()),
        Mode::Base64Decode => b64::decoded_len_max(input.len()),
    }
}

fn decode_options(cli: &Cli) -> DecodeOptions {
    let mut opts = DecodeOptions::default();
    if cli.strict {
        opts = opts.invalid(InvalidSymbols::Reject);
    }
    if cli.truncate {
        opts = opts.on_overflow(OverflowPolicy::Truncate);
    }
    // A file may legitimately contain NUL; only the length bounds the scan.
    opts.stop_at_nul(false)
}

fn transcode(cli: &Cli, out: &mut [u8], input: &[u8]) -> httpcodec::Result<usize> {
    match cli.mode {
        Mode::HtmlEncode => html::encode(out, input),
        Mode::UrlEncode => url::encode(out, input),
        Mode::UrlDecode => url::decode(out, input),
        Mode::Base64Encode => b64::encode(out, input),
        Mode::Base64Decode => b64::decode_with(out, input, decode_options(cli)),
    }
}

fn run(cli: &Cli) -> Result<()> {
    let filename = cli.file.as_deref().unwrap_or("-");
    let input = read_input(filename).map_err(|e| {
        if filename == "-" {
            anyhow!("{}", io_error_msg(&e))
        } else {
            anyhow!("{}: {}", filename, io_error_msg(&e))
        }
    })?;

    let capacity = cli
        .capacity
        .unwrap_or_else(|| required_capacity(cli.mode, &input));
    info!(
        "{:?}: {} input bytes, output capacity {}",
        cli.mode,
        input.len(),
        capacity
    );

    let mut buf = vec![0u8; capacity];
    let n = transcode(cli, &mut buf, &input)?;

    let mut out = io::stdout().lock();
    out.write_all(&buf[..n])?;
    out.flush()?;
    Ok(())
}

fn main() {
    reset_sigpipe();

    let cli = Cli::parse();
    init_logger(cli.log_level.as_deref());

    if let Err(e) = run(&cli) {
        if let Some(err) = e.downcast_ref::<Error>() {
            eprintln!("httpcodec: {}", err);
            process::exit(if err.is_overflow() { EXIT_OVERFLOW } else { 1 });
        }
        if let Some(err) = e.downcast_ref::<io::Error>() {
            if err.kind() == io::ErrorKind::BrokenPipe {
                process::exit(0);
            }
            eprintln!("httpcodec: {}", io_error_msg(err));
            process::exit(1);
        }
        eprintln!("httpcodec: {}", e);
        process::exit(1);
    }
}
