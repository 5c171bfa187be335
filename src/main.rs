use std::{process::exit, sync::Arc};

use log::{error, info};
use ytinfo::{Cipher, HttpTransport, Id, Stream, VideoFetcher};

use crate::{
    config::{Config, OutputFormat},
    consts::{CONFIG_FILE, INTRODUCTION, LOG_FILE},
};

mod config;
mod consts;
mod systems;
mod utils;

#[derive(Debug, Default, PartialEq, Eq)]
struct Options {
    help: bool,
    files: bool,
    verbose: bool,
    decipher: bool,
    format: Option<OutputFormat>,
    target: Option<String>,
}

impl Options {
    fn parse(args: impl IntoIterator<Item = String>) -> Result<Self, String> {
        let mut options = Self::default();
        for arg in args {
            match arg.as_str() {
                "-h" | "--help" => options.help = true,
                "--files" => options.files = true,
                "-v" | "--verbose" => options.verbose = true,
                "--decipher" => options.decipher = true,
                "--json" => options.format = Some(OutputFormat::Json),
                "--table" => options.format = Some(OutputFormat::Table),
                flag if flag.starts_with('-') && flag.len() > 1 => {
                    return Err(format!("Unknown option `{flag}`"))
                }
                _ if options.target.is_some() => {
                    return Err("Only one url or id can be resolved at a time".to_owned())
                }
                _ => options.target = Some(arg),
            }
        }
        Ok(options)
    }
}

fn print_table(streams: &[Stream]) {
    if let Some(stream) = streams.first() {
        println!("{} - {}", stream.author, stream.title);
    }
    for stream in streams {
        println!("{:<8} {:<48} {}", stream.quality, stream.mime_type, stream.url);
    }
}

async fn resolve(config: &Config, raw: &str, decipher: bool) -> ytinfo::Result<Vec<Stream>> {
    let id = Id::from_raw(raw)?.into_owned();
    info!("Resolving {id}");

    let transport = HttpTransport::from_config(&config.fetch)?;
    let mut fetcher = VideoFetcher::from_id_with_transport(id, Arc::new(transport));
    if decipher {
        let js = fetcher.fetch_player_js().await?;
        fetcher = fetcher.with_decipher(Arc::new(Cipher::from_js(&js)?));
    }

    Ok(fetcher.fetch().await?.descramble()?.into_streams())
}

fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("{message}");
    error!("{message}");
    log::logger().flush();
    exit(1);
}

#[tokio::main]
async fn main() {
    let options = match Options::parse(std::env::args().skip(1)) {
        Ok(options) => options,
        Err(e) => {
            eprintln!("{e}\n\n{INTRODUCTION}");
            exit(2);
        }
    };

    if options.help {
        println!("{INTRODUCTION}");
        return;
    }
    if options.files {
        match CONFIG_FILE.as_ref() {
            Some(path) => println!("Config file: {}", path.display()),
            None => println!("Config file: unavailable on this platform"),
        }
        println!("Log file: {}", LOG_FILE.display());
        return;
    }
    let Some(target) = options.target.as_deref() else {
        eprintln!("{INTRODUCTION}");
        exit(2);
    };

    if let Err(e) = systems::logger::init(options.verbose) {
        eprintln!("Failed to initialize logger: {e}");
    }

    let config = Config::new().unwrap_or_else(|e| fail(format!("Invalid config: {e}")));
    let format = options.format.unwrap_or(config.output.format);
    let decipher = options.decipher || config.output.decipher;

    let streams = match resolve(&config, target, decipher).await {
        Ok(streams) => streams,
        Err(e) if e.is_upstream_drift() => {
            fail(format!("{e}\nYouTube's response format may have changed."))
        }
        Err(e) => fail(e),
    };
    info!("Resolved {} streams", streams.len());

    match format {
        OutputFormat::Json => match ytinfo::stream::to_json(&streams) {
            Ok(json) => println!("{json}"),
            Err(e) => fail(e),
        },
        OutputFormat::Table => print_table(&streams),
    }
    log::logger().flush();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Options, String> {
        Options::parse(args.iter().map(|arg| arg.to_string()))
    }

    #[test]
    fn flags_and_target() {
        let options = parse(&["--table", "-v", "https://youtu.be/dQw4w9WgXcQ", "--decipher"]).unwrap();
        assert_eq!(
            options,
            Options {
                verbose: true,
                decipher: true,
                format: Some(OutputFormat::Table),
                target: Some("https://youtu.be/dQw4w9WgXcQ".to_owned()),
                ..Options::default()
            }
        );
    }

    #[test]
    fn last_format_wins() {
        let options = parse(&["--table", "--json", "dQw4w9WgXcQ"]).unwrap();
        assert_eq!(options.format, Some(OutputFormat::Json));
    }

    #[test]
    fn rejects_unknown_options_and_extra_targets() {
        assert!(parse(&["--download", "dQw4w9WgXcQ"]).is_err());
        assert!(parse(&["dQw4w9WgXcQ", "9bZkp7q19f0"]).is_err());
        assert!(parse(&["-h"]).unwrap().help);
    }
}
