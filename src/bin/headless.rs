//! A frontend-less runner, useful for tracing a program without a display.
//!
//! Run with `RUST_LOG=debug` to see every decoded instruction.

use std::path::PathBuf;

use structopt::StructOpt;

use chip8_vm::emulator::{Emulator, EmulatorError};

/// The program options.
#[derive(StructOpt)]
struct Opt {
    /// The program to execute
    #[structopt(parse(from_os_str))]
    input: PathBuf,

    /// Stop after this many steps and print the framebuffer
    #[structopt(long)]
    limit: Option<u64>,

    /// Seed for the random-number instruction
    #[structopt(long, default_value = "0")]
    seed: u64,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let opt = Opt::from_args();
    log::info!("Executing {:?}", &opt.input);

    let mut emulator = Emulator::with_seed(opt.seed);
    emulator.set_debug(true);
    let file = std::fs::File::open(&opt.input).map_err(EmulatorError::from)?;
    emulator.load_from(file)?;

    let mut steps = 0u64;
    while opt.limit.map_or(true, |limit| steps < limit) {
        if let Err(err) = emulator.step() {
            log::error!("{}", err);
            break;
        }
        steps += 1;
        std::thread::sleep(std::time::Duration::from_millis(2));
    }

    print!("{}", emulator.display());
    Ok(())
}
