use std::path::PathBuf;

use structopt::StructOpt;

use birth_console::assembler;
use birth_console::emulator::tile;

/// Assemble a program into a cartridge.
#[derive(StructOpt)]
struct Opt {
    /// The assembly source
    #[structopt(parse(from_os_str))]
    input: PathBuf,

    /// A tile bitmap to put in graphics memory
    #[structopt(short, long, parse(from_os_str))]
    graphics: Option<PathBuf>,

    /// A PNG to encode into a tile bitmap, one intensity per pixel luminance
    #[structopt(short, long, parse(from_os_str), conflicts_with = "graphics")]
    image: Option<PathBuf>,

    /// Where to write the cartridge
    #[structopt(short, long, parse(from_os_str), default_value = "game.BGF")]
    output: PathBuf,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let opt = Opt::from_args();
    log::info!("Assembling {:?}", &opt.input);
    let source = std::fs::read_to_string(&opt.input)?;

    let graphics = match (&opt.graphics, &opt.image) {
        (Some(path), _) => std::fs::read(path)?,
        (None, Some(path)) => tile::read_image(path)?,
        (None, None) => {
            log::warn!("No graphics given, the cartridge will have none");
            Vec::new()
        }
    };

    let cartridge = assembler::assemble_cartridge(&source, graphics)?;
    std::fs::write(&opt.output, cartridge.to_bytes())?;

    println!("Generated {:?}", opt.output);
    println!("   Code: {} bytes", cartridge.code.len());
    println!("   GFX:  {} bytes", cartridge.graphics.len());
    Ok(())
}
