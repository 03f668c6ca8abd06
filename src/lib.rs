/*!

An emulator for the (not)SEGA BIRTH, a tiny fictional 8/16-bit console.

A cartridge (`.BGF`) holds code and a tile bitmap. The code is loaded into 32 KiB of
code memory, the bitmap into 64 KiB of graphics memory, and the console then runs a few
instructions per frame, drawing bitmaps whenever the program asks for it.

# Crossterm Frontend

If you want to try a cartridge, there is a ready-to-use terminal frontend
you can run with `cargo run --release --bin crossterm_frontend -- game.BGF`.
Press `q` or `Esc` to quit. Cartridges can be built with the assembler:
`cargo run --bin birth_asm -- game.asm --graphics sprite.btp -o game.BGF`.

# Library

The main way of running a program is to load a cartridge into a `Console` and step it.

```rust
use birth_console::emulator::cartridge::Cartridge;
use birth_console::emulator::console::Console;

let mut console = Console::new();

// SET_A 42, HALT
console.load(&Cartridge::new(vec![0x01, 0x2A, 0xFF], Vec::new())).unwrap();
while console.step().unwrap() {}

assert_eq!(console.registers().a, 42);
assert!(console.is_halted());
```

Alternatively, write the program in assembly.

```rust
use birth_console::assembler;

let code = assembler::assemble("
    @Top:
    SET_X 65535
    JMP @Top
").unwrap();
assert_eq!(code, vec![0x02, 0xFF, 0xFF, 0x04, 0x00, 0x00]);
```

## Custom output

To see anything you must implement `EmulatorOutput`, which represents a window
that can be cleared and filled with rectangles and text. Take a look at
`src/emulator/output.rs` to see how to implement it, then do the following.

```ignore
use birth_console::emulator::{Emulator, config::Config};

let mut emulator = Emulator::with_output(MyWindow::new(), Config::default());
emulator.boot(&HostFilesystem)?;
emulator.run();
```

`DummyOutput` records draw calls instead, which is handy for tests.

```rust
use birth_console::emulator::{Emulator, cartridge::Cartridge, config::Config};
use birth_console::emulator::output::DummyOutput;

let mut emulator = Emulator::with_output(DummyOutput::with_frame_limit(2), Config::default());
emulator.load(&Cartridge::new(vec![0xFF], Vec::new())).unwrap();
emulator.run();
assert_eq!(emulator.output().frames(), 2);
```
*/

pub mod assembler;
pub mod emulator;
pub mod util;
