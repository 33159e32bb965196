use std::error::Error;
use std::path::PathBuf;
use std::process::exit;

use clap::{ArgAction, Parser, ValueHint};
use lc3_vm::emulator;
use lc3_vm::terminal;
use lc3_vm::terminal::EchoOptions;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(version, about)]
struct Opt {
    /// Path to the assembled LC-3 program image
    #[arg(value_hint = ValueHint::FilePath)]
    image: PathBuf,

    /// Increase the level of verbosity. Can be used multiple times.
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

impl Opt {
    const fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "info",
            1 => "lc3_vm=debug,info",
            2 => "lc3_vm=trace,info",
            3.. => "trace",
        }
    }
}

fn main() {
    let opt = Opt::parse();

    // diagnostics go to stderr, program output owns stdout
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .or_else(|_| EnvFilter::try_new(opt.log_filter()))
                .unwrap(),
        )
        .with_writer(std::io::stderr)
        .without_time()
        .with_target(false)
        .init();

    if let Err(e) = run(&opt) {
        error!("{e}");
        exit(1);
    }
}

fn run(opt: &Opt) -> Result<(), Box<dyn Error>> {
    info!(path = ?opt.image, "loading program image");
    let mut emu = emulator::from_program(&opt.image)?;

    terminal::install_interrupt_handler();
    // piped stdin has no terminal discipline to switch
    let _raw = if atty::is(atty::Stream::Stdin) {
        Some(terminal::set_terminal_raw(EchoOptions::EchoOff)?)
    } else {
        None
    };
    emu.execute()?;

    debug!(registers = ?emu.registers(), "end of program");
    Ok(())
}
