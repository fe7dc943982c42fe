use std::env;
use std::process;

use getopts::Options;
use url::Url;

const BASE_URL_VAR: &str = "VENUE_CLIENT_BASE_URL";
const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000/";

pub enum Command {
    Parse(Vec<String>),
    Delete(String),
}

pub struct Args {
    pub base_url: Url,
    pub command: Command,
}

fn opts() -> Options {
    let mut opts = Options::new();
    opts.optflag(
        "h",
        "help",
        concat!("Print the help output of ", env!("CARGO_PKG_NAME")),
    );
    opts.optopt(
        "b",
        "base-url",
        concat!(
            "Origin of the venue application [Default: $VENUE_CLIENT_BASE_URL or ",
            "http://127.0.0.1:5000/]"
        ),
        "URL",
    );
    opts
}

fn usage(opts: &Options) -> String {
    let brief = concat!(
        "Usage: ",
        env!("CARGO_PKG_NAME"),
        " [options] parse <TIMESTAMP>...\n       ",
        env!("CARGO_PKG_NAME"),
        " [options] delete <VENUE_ID>"
    );
    opts.usage(brief)
}

/// The flag wins over the environment, which wins over the default.
fn resolve_base_url(flag: Option<String>, env: Option<String>) -> Result<Url, url::ParseError> {
    match flag.or(env) {
        Some(raw) => Url::parse(&raw),
        None => Url::parse(DEFAULT_BASE_URL),
    }
}

pub fn parse(args: Vec<String>) -> Args {
    let opts = opts();

    let matches = match opts.parse(args) {
        Ok(matches) => matches,
        Err(fail) => {
            eprintln!("{fail}");
            process::exit(1);
        }
    };

    if matches.opt_present("help") {
        println!("{}", usage(&opts));
        process::exit(0);
    }

    let base_url = match resolve_base_url(matches.opt_str("base-url"), env::var(BASE_URL_VAR).ok())
    {
        Ok(base_url) => base_url,
        Err(err) => {
            eprintln!("Provided value for option 'base-url' is invalid: {err}");
            process::exit(1);
        }
    };

    let mut free = matches.free.into_iter();

    let command = match (free.next().as_deref(), free.collect::<Vec<_>>()) {
        (Some("parse"), inputs) if !inputs.is_empty() => Command::Parse(inputs),
        (Some("delete"), mut ids) if ids.len() == 1 => Command::Delete(ids.remove(0)),
        _ => {
            eprintln!("{}", usage(&opts));
            process::exit(1);
        }
    };

    Args { base_url, command }
}
