use structopt::StructOpt;

use birth_console::emulator::config::Config;
use birth_console::emulator::filesystem::HostFilesystem;
use birth_console::emulator::output::DummyOutput;
use birth_console::emulator::Emulator;

/// The program options.
#[derive(StructOpt)]
struct Opt {
    #[structopt(flatten)]
    config: Config,

    /// Number of frames to run before stopping
    #[structopt(long, default_value = "600")]
    frames: usize,
}

fn main() {
    env_logger::init();

    // Get configuration and load the cartridge
    let opt = Opt::from_args();
    log::info!("Executing {:?} for {} frames", &opt.config.cartridge_path, opt.frames);

    let mut emulator = Emulator::with_output(DummyOutput::with_frame_limit(opt.frames), opt.config);
    if let Err(e) = emulator.boot(&HostFilesystem) {
        log::error!("{}", e);
        eprintln!("error: {}", e);
        std::process::exit(1);
    }

    // Start execution
    emulator.run();

    let registers = emulator.console().registers();
    println!(
        "PC: {} RegA: {} RegX: {} halted: {}",
        registers.pc,
        registers.a,
        registers.x,
        emulator.console().is_halted()
    );
}
