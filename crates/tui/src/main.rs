mod renderer;

use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use folio_core::contact::http::ThreadRelay;
use folio_core::svg::render_svg;
use folio_core::Page;
use folio_protocol::ThemeMode;
use tracing_subscriber::EnvFilter;

/// Log file for the terminal session; the screen belongs to ratatui.
const LOG_ENV: &str = "FOLIO_LOG";

struct Args {
    svg: Option<PathBuf>,
    width: f64,
    dark: bool,
}

impl Args {
    fn parse(mut args: impl Iterator<Item = String>) -> Result<Self> {
        let mut parsed = Self {
            svg: None,
            width: 1280.0,
            dark: false,
        };
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--svg" => {
                    let path = args.next().context("--svg needs an output path")?;
                    parsed.svg = Some(PathBuf::from(path));
                }
                "--width" => {
                    let value = args.next().context("--width needs a pixel count")?;
                    parsed.width = value
                        .parse()
                        .with_context(|| format!("invalid width {value:?}"))?;
                }
                "--dark" => parsed.dark = true,
                other => bail!("unknown argument {other:?}\nUsage: folio [--svg <out.svg> [--width <px>] [--dark]]"),
            }
        }
        Ok(parsed)
    }
}

fn init_logging() -> Result<()> {
    let Ok(path) = std::env::var(LOG_ENV) else {
        return Ok(());
    };
    let file = std::fs::File::create(&path).with_context(|| format!("cannot open log file {path}"))?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse(std::env::args().skip(1))?;
    init_logging()?;

    let (config, registry) = folio_core::load()?;
    let mut page = Page::new(&config, registry, Box::new(ThreadRelay::new()));

    if let Some(out) = args.svg {
        if args.dark {
            page.set_theme(ThemeMode::Dark);
        }
        let (commands, height) = page.export(args.width, Duration::ZERO);
        let svg = render_svg(&commands, args.width, height, page.theme());
        std::fs::write(&out, svg).with_context(|| format!("cannot write {}", out.display()))?;
        eprintln!("wrote {} ({}x{height:.0})", out.display(), args.width);
        return Ok(());
    }

    renderer::run_tui(page, config.splash())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Args> {
        Args::parse(args.iter().map(|s| (*s).to_string()))
    }

    #[test]
    fn no_arguments_runs_interactively() {
        let args = parse(&[]).expect("empty args parse");
        assert!(args.svg.is_none());
        assert_eq!(args.width, 1280.0);
    }

    #[test]
    fn svg_export_flags() {
        let args = parse(&["--svg", "out.svg", "--width", "800", "--dark"]).expect("flags parse");
        assert_eq!(args.svg, Some(PathBuf::from("out.svg")));
        assert_eq!(args.width, 800.0);
        assert!(args.dark);
    }

    #[test]
    fn rejects_unknown_and_incomplete_flags() {
        assert!(parse(&["--bogus"]).is_err());
        assert!(parse(&["--svg"]).is_err());
        assert!(parse(&["--width", "wide"]).is_err());
    }
}
