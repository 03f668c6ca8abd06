use structopt::StructOpt;

use birth_console::emulator::config::Config;
use birth_console::emulator::filesystem::HostFilesystem;
use birth_console::emulator::Emulator;

mod crossterm_io;
use crossterm_io::CrosstermOutput;

/// The program options.
#[derive(StructOpt)]
struct Opt {
    #[structopt(flatten)]
    config: Config,
}

fn main() {
    env_logger::init();

    // Get configuration and boot the cartridge before touching the terminal
    let opt = Opt::from_args();
    log::info!("Executing {:?}", &opt.config.cartridge_path);

    let mut emulator = Emulator::with_output(CrosstermOutput::new(), opt.config);
    if let Err(e) = emulator.boot(&HostFilesystem) {
        log::error!("{}", e);
        eprintln!("error: {}", e);
        std::process::exit(1);
    }

    // Run until 'q' or Esc
    emulator.run();
}
