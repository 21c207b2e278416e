mod config;
mod logger;
mod script;

use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use config::Config;
use script::Script;

const USAGE: &str = "usage: scaled-perspective-host <session.json> [--config config.json]";

struct Args {
    session: PathBuf,
    config: Option<PathBuf>,
}

impl Args {
    fn parse(mut args: impl Iterator<Item = String>) -> Result<Self> {
        let mut session = None;
        let mut config = None;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--config" => {
                    config = Some(PathBuf::from(args.next().context(USAGE)?));
                }
                "-h" | "--help" => bail!(USAGE),
                _ if session.is_none() => session = Some(PathBuf::from(arg)),
                _ => bail!("unexpected argument {arg:?}\n{USAGE}"),
            }
        }

        Ok(Self {
            session: session.context(USAGE)?,
            config,
        })
    }
}

fn main() -> Result<()> {
    logger::init_logger();

    let args = Args::parse(std::env::args().skip(1))?;

    let config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    let script = Script::load(&args.session)?;

    let stdout = std::io::stdout();
    script.run(&config, &mut stdout.lock())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Result<Args> {
        Args::parse(list.iter().map(|arg| arg.to_string()))
    }

    #[test]
    fn parses_session_and_config() {
        let parsed = args(&["walk.json", "--config", "office.json"]).unwrap();
        assert_eq!(parsed.session, PathBuf::from("walk.json"));
        assert_eq!(parsed.config, Some(PathBuf::from("office.json")));

        let parsed = args(&["--config", "office.json", "walk.json"]).unwrap();
        assert_eq!(parsed.session, PathBuf::from("walk.json"));
    }

    #[test]
    fn rejects_bad_usage() {
        assert!(args(&[]).is_err());
        assert!(args(&["walk.json", "--config"]).is_err());
        assert!(args(&["walk.json", "other.json"]).is_err());
    }
}
