//! CLI argument definitions for `loopsong`.

use std::path::PathBuf;

use clap::{Arg, ArgAction, ArgGroup, ArgMatches, Command};
use loopsong_lib::playback::EndPolicy;
use loopsong_lib::timing::parse_duration;

/// Build the CLI argument parser.
pub fn build_cli() -> Command {
    Command::new("loopsong")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Play a song for at least the given number of seconds")
        .arg_required_else_help(true)
        .allow_negative_numbers(true)
        .arg(
            Arg::new("fade")
                .short('f')
                .value_name("SECONDS")
                .default_value("5")
                .allow_hyphen_values(true)
                .help("Duration of the fade out"),
        )
        .arg(
            Arg::new("seek")
                .short('k')
                .value_name("SECONDS")
                .allow_hyphen_values(true)
                .help("Start playback at this point in the song"),
        )
        .arg(
            Arg::new("short")
                .short('s')
                .action(ArgAction::SetTrue)
                .help("Stop looping early and let the song end before the time is up"),
        )
        .arg(
            Arg::new("medium")
                .short('m')
                .action(ArgAction::SetTrue)
                .help("Keep looping and fade out exactly on time (default)"),
        )
        .arg(
            Arg::new("long")
                .short('l')
                .action(ArgAction::SetTrue)
                .help("Extend playback so the song finishes a full pass to its end"),
        )
        .group(ArgGroup::new("policy").args(["short", "medium", "long"]))
        .arg(
            Arg::new("adjust")
                .short('a')
                .action(ArgAction::SetTrue)
                .help("Discount time lost to system suspend"),
        )
        .arg(
            Arg::new("definition")
                .short('d')
                .value_name("NAME")
                .help("Use the loop definition in section [NAME] of the song file"),
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .action(ArgAction::SetTrue)
                .help("Do not display the time left"),
        )
        .arg(
            Arg::new("CONFIG")
                .help("Song description file")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::new("SECONDS")
                .help("Minimum number of seconds to play the song")
                .default_value("5")
                .index(2),
        )
}

/// Options for one playback run, with durations already parsed.
#[derive(Debug, Clone, PartialEq)]
pub struct Options {
    pub config: PathBuf,
    pub section: Option<String>,
    pub duration: f64,
    pub fade: f64,
    /// Seek point in seconds, negative when not given.
    pub seek: f64,
    pub policy: EndPolicy,
    pub adjust: bool,
    pub quiet: bool,
}

impl Options {
    pub fn from_matches(args: &ArgMatches) -> Self {
        let duration_arg = |name: &str| parse_duration(args.get_one::<String>(name).map(String::as_str));

        let policy = if args.get_flag("short") {
            EndPolicy::ShortFinish
        } else if args.get_flag("long") {
            EndPolicy::LongFinish
        } else {
            EndPolicy::MediumFade
        };

        Self {
            config: args
                .get_one::<String>("CONFIG")
                .map(PathBuf::from)
                .unwrap_or_default(),
            section: args.get_one::<String>("definition").cloned(),
            duration: duration_arg("SECONDS"),
            fade: duration_arg("fade"),
            seek: duration_arg("seek"),
            policy,
            adjust: args.get_flag("adjust"),
            quiet: args.get_flag("quiet"),
        }
    }
}
