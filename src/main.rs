use std::fs;
use std::process::ExitCode;

use argh::FromArgs;
use log::{error, LevelFilter};
use rand::rngs::OsRng;

use sss::{Error, Result, Secrets, Settings};

/// Shamir secret sharing over GF(2^n).
#[derive(FromArgs)]
struct Args {
    /// JSON settings file, see `Settings::from_json`
    #[argh(option)]
    config: Option<String>,

    /// share id radix, overrides the settings file
    #[argh(option)]
    radix: Option<u32>,

    /// log what is being done to stderr
    #[argh(switch, short = 'v')]
    verbose: bool,

    #[argh(subcommand)]
    command: Command,
}

#[derive(FromArgs)]
#[argh(subcommand)]
enum Command {
    Split(Split),
    Combine(Combine),
    NewShare(NewShare),
    Random(Random),
}

/// Split a secret into shares, printed as a JSON array.
#[derive(FromArgs)]
#[argh(subcommand, name = "split")]
struct Split {
    /// number of shares to create
    #[argh(option, short = 'n')]
    shares: u32,

    /// number of shares needed to recover the secret
    #[argh(option, short = 't')]
    threshold: u32,

    /// field width in bits, overrides the settings file
    #[argh(option)]
    bits: Option<u8>,

    /// pad the secret to a multiple of this many bits
    #[argh(option)]
    pad_length: Option<usize>,

    /// treat the secret as hex instead of text
    #[argh(switch)]
    hex: bool,

    /// the secret
    #[argh(positional)]
    secret: String,
}

/// Recover a secret from shares.
#[derive(FromArgs)]
#[argh(subcommand, name = "combine")]
struct Combine {
    /// print the secret as hex instead of text
    #[argh(switch)]
    hex: bool,

    /// the shares
    #[argh(positional)]
    shares: Vec<String>,
}

/// Create an additional share from existing ones.
#[derive(FromArgs)]
#[argh(subcommand, name = "new-share")]
struct NewShare {
    /// id of the share to create
    #[argh(option)]
    id: u32,

    /// the shares
    #[argh(positional)]
    shares: Vec<String>,
}

/// Print a random hex secret.
#[derive(FromArgs)]
#[argh(subcommand, name = "random")]
struct Random {
    /// size of the secret in bits
    #[argh(option, default = "128")]
    bits: usize,
}

fn settings(args: &Args) -> Result<Settings> {
    let mut settings = match &args.config {
        Some(path) => {
            let src = fs::read_to_string(path)
                .map_err(|err| Error::InvalidSettings(format!("{path}: {err}")))?;
            Settings::from_json(&src)?
        }
        None => Settings::default(),
    };
    if let Some(radix) = args.radix {
        settings.radix = radix;
    }
    if let Command::Split(split) = &args.command {
        if let Some(bits) = split.bits {
            settings.bits = bits;
        }
        if let Some(pad_length) = split.pad_length {
            settings.pad_length = pad_length;
        }
    }
    Ok(settings)
}

fn run(args: Args) -> Result<String> {
    let secrets = Secrets::new(settings(&args)?)?;

    match args.command {
        Command::Split(split) => {
            let shares = if split.hex {
                secrets.share_hex(&split.secret, split.shares, split.threshold, &mut OsRng)?
            } else {
                secrets.share_text(&split.secret, split.shares, split.threshold, &mut OsRng)?
            };
            Ok(json::JsonValue::from(shares).pretty(2))
        }
        Command::Combine(combine) if combine.hex => secrets.combine_hex(&combine.shares),
        Command::Combine(combine) => secrets.combine_text(&combine.shares),
        Command::NewShare(new) => secrets.new_share(new.id, &new.shares),
        Command::Random(random) => secrets.random(random.bits, &mut OsRng),
    }
}

fn main() -> ExitCode {
    let args: Args = argh::from_env();

    let level = if args.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    pretty_env_logger::formatted_builder()
        .filter_level(level)
        .init();

    match run(args) {
        Ok(out) => {
            println!("{out}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}
