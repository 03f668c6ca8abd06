use std::path::PathBuf;
use structopt::StructOpt;

pub const DEFAULT_CARTRIDGE: &str = "game.BGF";

/// Largest accepted `--scale`.
pub const MAX_SCALE: u32 = 64;

fn parse_scale(src: &str) -> Result<u32, String> {
    let scale: u32 = src.parse().map_err(|e| format!("{}", e))?;
    if scale == 0 || scale > MAX_SCALE {
        return Err(format!("scale must be between 1 and {}", MAX_SCALE));
    }
    Ok(scale)
}

/// Emulator options, shared by the frontends.
#[derive(StructOpt, Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// The cartridge to load
    #[structopt(parse(from_os_str), default_value = "game.BGF")]
    pub cartridge_path: PathBuf,

    /// Instructions executed per rendered frame
    #[structopt(long, default_value = "10")]
    pub opcodes_per_frame: usize,

    /// Target frames per second
    #[structopt(long, default_value = "60")]
    pub frame_rate: u32,

    /// Size of one console pixel on screen
    #[structopt(long, default_value = "2", parse(try_from_str = parse_scale))]
    pub scale: u32,

    /// Halt on undefined opcodes instead of skipping them
    #[structopt(long)]
    pub strict_opcodes: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            cartridge_path: PathBuf::from(DEFAULT_CARTRIDGE),
            opcodes_per_frame: 10,
            frame_rate: 60,
            scale: 2,
            strict_opcodes: false,
        }
    }
}
