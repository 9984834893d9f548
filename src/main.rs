use std::process;

use anyhow::{Result, bail};
use clap::Parser;
use log::LevelFilter;

#[derive(Parser)]
#[command(name = "macbright")]
#[command(about = "Set the brightness of attached displays")]
struct Cli {
    /// List displays and their current brightness instead of setting it
    #[arg(short = 'l', conflicts_with_all = ["main_only", "display", "brightness"])]
    list: bool,

    /// Only touch the main display
    #[arg(short = 'm', conflicts_with = "display")]
    main_only: bool,

    /// Only touch one display, by enumeration index
    #[arg(short = 'd', value_name = "DISPLAY")]
    display: Option<usize>,

    /// Verbose diagnostics
    #[arg(short = 'v')]
    verbose: bool,

    /// Brightness to set, conventionally in [0.0, 1.0]
    #[arg(value_name = "BRIGHTNESS", required_unless_present = "list")]
    brightness: Option<f32>,
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            use clap::error::ErrorKind;
            let code = match err.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
                _ => 1,
            };
            let _ = err.print();
            process::exit(code);
        }
    };

    let mut logger = env_logger::Builder::new();
    logger.filter_level(if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    });
    logger.format_timestamp(None);
    logger.parse_default_env();
    logger.init();

    let prog = std::env::args()
        .next()
        .unwrap_or_else(|| "macbright".to_string());

    if let Err(err) = run(&cli, &prog) {
        eprintln!("{prog}: {err}");
        process::exit(1);
    }
}

#[cfg(target_os = "macos")]
fn run(cli: &Cli, prog: &str) -> Result<()> {
    use log::debug;
    use macbright::{SystemOps, chain, display, iokit};

    let ids = match display::online_displays() {
        Ok(ids) => ids,
        Err(err) => bail!("cannot get list of displays (error {err})"),
    };

    let ops = SystemOps::load();
    let main_id = cli.main_only.then(display::main_display);

    for (index, &id) in ids.iter().enumerate() {
        if main_id.is_some_and(|main| main != id) {
            continue;
        }
        if cli.display.is_some_and(|wanted| wanted != index) {
            continue;
        }
        if !display::is_addressable(id) {
            debug!("display {index}: no current display mode, skipping {id:#x}");
            continue;
        }

        let triple = display::triple(id);
        debug!(
            "display {index}: id {id:#x} vendor {:#x} product {:#x} serial {:#x}",
            triple.vendor, triple.product, triple.serial
        );
        let service = iokit::service_port_for(&triple);
        if service == 0 {
            debug!("display {index}: no matching IODisplayConnect service");
        }

        if cli.list {
            match chain::get_brightness(&ops, id, service) {
                Some(value) => println!("display {index}: brightness {value:.6}"),
                None => println!("display {index}: brightness unknown"),
            }
        } else {
            let value = cli.brightness.unwrap_or(1.0);
            match chain::set_brightness(&ops, id, service, value) {
                Ok(method) => debug!("display {index}: set {value} via {}", method.name()),
                // Per-display failure; the run keeps going and still exits 0.
                Err(err) => eprintln!("{prog}: {err}"),
            }
        }

        iokit::release(service);
    }

    Ok(())
}

#[cfg(not(target_os = "macos"))]
fn run(_cli: &Cli, _prog: &str) -> Result<()> {
    bail!("display brightness control is only supported on macOS");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn brightness_argument_is_required_without_list() {
        assert!(Cli::try_parse_from(["macbright"]).is_err());
        let cli = Cli::try_parse_from(["macbright", "0.5"]).unwrap();
        assert_eq!(cli.brightness, Some(0.5));
        assert!(!cli.list);
    }

    #[test]
    fn list_mode_takes_no_brightness() {
        let cli = Cli::try_parse_from(["macbright", "-l"]).unwrap();
        assert!(cli.list);
        assert_eq!(cli.brightness, None);
        assert!(Cli::try_parse_from(["macbright", "-l", "0.5"]).is_err());
    }

    #[test]
    fn display_selection_flags_are_exclusive() {
        let cli = Cli::try_parse_from(["macbright", "-d", "1", "0.5"]).unwrap();
        assert_eq!(cli.display, Some(1));
        let cli = Cli::try_parse_from(["macbright", "-m", "-v", "1.0"]).unwrap();
        assert!(cli.main_only && cli.verbose);
        assert!(Cli::try_parse_from(["macbright", "-m", "-d", "1", "0.5"]).is_err());
    }
}
