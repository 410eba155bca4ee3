use crate::config::{parse_substitutions, ReplayOptions};
use crate::request_config::Scheme;
use anyhow::Result;
use clap::{arg, value_parser, ArgAction, ArgMatches, Command};
use std::ffi::OsString;
use std::path::PathBuf;

pub enum CliOutcome {
    Run(ReplayOptions),
    /// No request file was given; holds the text to show instead.
    Usage(String),
}

pub fn command() -> Command {
    Command::new("rawreplay")
        .author(clap::crate_authors!())
        .version(clap::crate_version!())
        .about(clap::crate_description!())
        .arg(
            arg!(-f --file <FILE>)
                .help("The request file to replay")
                .required(false)
                .value_parser(value_parser!(PathBuf))
                .action(ArgAction::Set),
        )
        .arg(
            arg!(-R --replace <PAIR>)
                .help("Replace a string in the request file, repeatable (-R infile=./test.txt replaces {{infile}} with ./test.txt)")
                .value_parser(value_parser!(String))
                .action(ArgAction::Append),
        )
        .arg(arg!(--https "HTTPS request, defaults to HTTP").action(ArgAction::SetTrue))
        .arg(arg!(--resp "Print the full response").action(ArgAction::SetTrue))
        .arg(
            arg!(--proxy <URL>)
                .help("Send the request through this proxy")
                .value_parser(value_parser!(String))
                .action(ArgAction::Set),
        )
        .arg(
            arg!(--save <PATH>)
                .help("Also write the request as sent to this file")
                .value_parser(value_parser!(PathBuf))
                .action(ArgAction::Set),
        )
}

fn usage(cmd: &mut Command) -> String {
    format!(
        "\n[ERROR] What am I supposed to replay? --file is required.\n\n{}",
        cmd.render_help()
    )
}

fn options_from(matches: &ArgMatches, file: PathBuf) -> Result<ReplayOptions> {
    let mut options = ReplayOptions::new(file);
    options.scheme = if matches.get_flag("https") { Scheme::Https } else { Scheme::Http };
    options.substitutions = parse_substitutions(
        matches
            .get_many::<String>("replace")
            .unwrap_or_default()
            .map(String::as_str),
    )?;
    options.dump_response = matches.get_flag("resp");
    options.proxy = matches.get_one::<String>("proxy").cloned();
    options.save_request = matches.get_one::<PathBuf>("save").cloned();
    Ok(options)
}

/// Parses the command line. Invalid flags exit the process through clap;
/// a missing request file is reported as [`CliOutcome::Usage`].
pub fn parse_args<I, T>(args: I) -> Result<CliOutcome>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let mut cmd = command();
    let matches = cmd.try_get_matches_from_mut(args).unwrap_or_else(|e| e.exit());
    match matches.get_one::<PathBuf>("file") {
        Some(file) => Ok(CliOutcome::Run(options_from(&matches, file.clone())?)),
        None => Ok(CliOutcome::Usage(usage(&mut cmd))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(args: &[&str]) -> ReplayOptions {
        match parse_args(args.iter().copied()).unwrap() {
            CliOutcome::Run(options) => options,
            CliOutcome::Usage(text) => panic!("unexpected usage: {}", text),
        }
    }

    #[test]
    fn missing_file_gives_usage() {
        match parse_args(["rawreplay", "--resp"]).unwrap() {
            CliOutcome::Usage(text) => {
                assert!(text.contains("--file is required"));
                assert!(text.contains("Usage:"));
            }
            CliOutcome::Run(_) => panic!("expected usage"),
        }
    }

    #[test]
    fn defaults() {
        let options = run(&["rawreplay", "--file", "req.txt"]);
        assert_eq!(options, ReplayOptions::new(PathBuf::from("req.txt")));
    }

    #[test]
    fn all_flags() {
        let options = run(&[
            "rawreplay",
            "-f",
            "req.txt",
            "--https",
            "--resp",
            "-R",
            "host=example.com",
            "-R",
            "id=7",
            "--proxy",
            "http://127.0.0.1:8080",
            "--save",
            "sent.txt",
        ]);
        assert_eq!(options.scheme, Scheme::Https);
        assert!(options.dump_response);
        assert_eq!(options.substitutions.get("host").map(String::as_str), Some("example.com"));
        assert_eq!(options.substitutions.get("id").map(String::as_str), Some("7"));
        assert_eq!(options.proxy.as_deref(), Some("http://127.0.0.1:8080"));
        assert_eq!(options.save_request, Some(PathBuf::from("sent.txt")));
    }

    #[test]
    fn bad_replacement_is_an_error() {
        assert!(parse_args(["rawreplay", "-f", "req.txt", "-R", "novalue"]).is_err());
    }
}
