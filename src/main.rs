use chip8vm::config::{Config, Quirks};
use chip8vm::display::MonoTermDisplay;
use chip8vm::environment::Environment;
use chip8vm::framebuffer::{HEIGHT, WIDTH};
use chip8vm::input::TermInput;
use chip8vm::interpreter::Chip8Interpreter;
use chip8vm::sound::{Mute, SimpleBeep, Sound};
use clap::Parser;
use std::error::Error;
use std::fs::File;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "chip8vm")]
#[command(about = "A CHIP-8 interpreter for the terminal")]
struct Args {
    #[arg(help = "ROM file to load; runs a built-in demo when omitted")]
    rom: Option<PathBuf>,

    #[arg(long, help = "Seed for the random number generator")]
    seed: Option<u64>,

    #[arg(long, help = "Don't use the buzzer")]
    mute: bool,

    #[arg(long, help = "Log debug info to stderr")]
    debug: bool,

    #[arg(long, help = "Shifts read Vy (COSMAC VIP behaviour)")]
    shift_vy: bool,

    #[arg(long, help = "Bnnn jumps to nnn + Vx (SUPER-CHIP behaviour)")]
    jump_vx: bool,

    #[arg(long, help = "Clip sprites at the screen edges instead of wrapping")]
    clip: bool,

    #[arg(long, default_value_t = 2000, help = "Microseconds per instruction")]
    cycle_us: u64,

    #[arg(long, help = "Stop after this many frames")]
    max_frames: Option<u64>,
}

impl Args {
    fn config(&self) -> Config {
        Config {
            cycle_period: Duration::from_micros(self.cycle_us),
            seed: self.seed,
            quirks: Quirks {
                shift_uses_vy: self.shift_vy,
                jump_uses_vx: self.jump_vx,
                clip_sprites: self.clip,
            },
            ..Config::default()
        }
    }
}

/// draws 0-F, waits for a key, beeps, starts again
#[rustfmt::skip]
const DEMO_PROGRAM: [u8; 36] = [
    0x00, 0xe0, // 200: CLS
    0x60, 0x00, // 202: LD   V0, 0x00     digit
    0x61, 0x00, // 204: LD   V1, 0x00     x
    0x62, 0x00, // 206: LD   V2, 0x00     y
    0xf0, 0x29, // 208: LD   F, V0
    0xd1, 0x25, // 20a: DRW  V1, V2, 5
    0x70, 0x01, // 20c: ADD  V0, 0x01
    0x71, 0x08, // 20e: ADD  V1, 0x08
    0x31, 0x40, // 210: SE   V1, 0x40
    0x12, 0x08, // 212: JP   0x208
    0x61, 0x00, // 214: LD   V1, 0x00
    0x72, 0x08, // 216: ADD  V2, 0x08
    0x30, 0x10, // 218: SE   V0, 0x10
    0x12, 0x08, // 21a: JP   0x208
    0xf3, 0x0a, // 21c: LD   V3, K
    0x64, 0x1e, // 21e: LD   V4, 0x1e
    0xf4, 0x18, // 220: LD   ST, V4
    0x12, 0x00, // 222: JP   0x200
];

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    let config = args.config();

    // stdout belongs to the display, so logs go to stderr
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Warn)
        .filter_module(
            "chip8vm",
            if args.debug {
                log::LevelFilter::Debug
            } else {
                log::LevelFilter::Warn
            },
        )
        .parse_default_env()
        .init();

    let mut interpreter = match config.seed {
        Some(seed) => Chip8Interpreter::with_seed(config.quirks, seed),
        None => Chip8Interpreter::new(config.quirks),
    };
    match &args.rom {
        Some(path) => {
            let mut f = File::open(path)?;
            interpreter.load_program(&mut f)?;
        }
        None => {
            interpreter.load_program(&mut DEMO_PROGRAM.as_slice())?;
        }
    }

    let mut sound: Box<dyn Sound> = if args.mute {
        Box::new(Mute::new())
    } else {
        Box::new(SimpleBeep::new(config.tone_hz))
    };
    let mut input = TermInput::new(config.key_hold)?;
    let mut display = MonoTermDisplay::new(WIDTH, HEIGHT)?;

    let result = Environment::new(
        interpreter,
        &mut display,
        &mut input,
        sound.as_mut(),
        config,
    )
    .and_then(|mut env| env.main_loop(args.max_frames));

    // shove some junk on stdout to stop the cli messing up the last frame
    drop(display);
    drop(input);
    for _ in 0..(HEIGHT / 2) {
        println!();
    }
    result?;
    Ok(())
}
