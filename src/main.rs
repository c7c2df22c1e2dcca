//! Crossterm terminal frontend: loads a program, maps the keyboard onto
//! the 16 logical keys, drives the step loop and renders the framebuffer.

use std::io::{stdout, Stdout, Write};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use crossterm::cursor;
use crossterm::event::{poll, read, Event, KeyCode};
use crossterm::terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{execute, queue};
use structopt::StructOpt;

use chip8_vm::emulator::display::{self, Display};
use chip8_vm::emulator::{Emulator, EmulatorError, TimerPolicy};

/// How long a key counts as held after its event, since terminals report
/// no key releases.
const KEY_HOLD: Duration = Duration::from_millis(150);

/// The fixed rate for the delay and sound timers.
const TIMER_INTERVAL: Duration = Duration::from_micros(16_667);

/// The program options.
#[derive(StructOpt)]
struct Opt {
    /// The program to execute
    #[structopt(parse(from_os_str))]
    input: PathBuf,

    /// Instruction rate in steps per second
    #[structopt(long, default_value = "500")]
    hz: u64,

    /// Seed for the random-number instruction
    #[structopt(long)]
    seed: Option<u64>,

    /// Start paused and step one instruction at a time with 'n'
    #[structopt(short, long)]
    debug: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();

    let opt = Opt::from_args();
    log::info!("Executing {:?}", &opt.input);
    let program = std::fs::read(&opt.input)?;

    let mut emulator = match opt.seed {
        Some(seed) => Emulator::with_seed(seed),
        None => Emulator::new(),
    };
    emulator.set_timer_policy(TimerPolicy::External);
    emulator.set_debug(opt.debug);
    emulator.load(&program)?;

    let mut screen = Screen::new()?;
    let result = run(&mut emulator, &opt, &mut screen);
    drop(screen); // Restore the terminal before reporting errors
    result
}

fn run(
    emulator: &mut Emulator,
    opt: &Opt,
    screen: &mut Screen,
) -> Result<(), Box<dyn std::error::Error>> {
    let step_interval = Duration::from_nanos(1_000_000_000 / opt.hz.max(1));
    let mut held: [Option<Instant>; 16] = [None; 16];
    let mut paused = opt.debug;
    let mut last_timer_tick = Instant::now();

    loop {
        let mut advance_once = false;
        while poll(Duration::from_millis(0))? {
            if let Event::Key(event) = read()? {
                match event.code {
                    KeyCode::Esc => return Ok(()),
                    KeyCode::Char(' ') => paused = !paused,
                    KeyCode::Char('n') => advance_once = true,
                    KeyCode::Char(c) => {
                        if let Some(key) = logical_key(c) {
                            held[key as usize] = Some(Instant::now());
                            emulator.keypad_mut().press(key);
                        }
                    }
                    _ => {}
                }
            }
        }

        for (key, since) in held.iter_mut().enumerate() {
            if since.map_or(false, |t| t.elapsed() > KEY_HOLD) {
                *since = None;
                emulator.keypad_mut().release(key as u8);
            }
        }

        if last_timer_tick.elapsed() >= TIMER_INTERVAL {
            emulator.tick_timers();
            last_timer_tick = Instant::now();
        }

        if !paused || advance_once {
            match emulator.step() {
                Ok(()) => {}
                Err(err @ EmulatorError::UnknownInstruction { .. }) => {
                    log::warn!("{}, skipping", err);
                    emulator.skip_instruction();
                }
                Err(err) => return Err(err.into()),
            }
        }

        screen.draw(emulator.display())?;
        std::thread::sleep(step_interval);
    }
}

/// Map a keyboard character onto a logical key, using the conventional
/// `1234 qwer asdf zxcv` layout for the hexadecimal keypad.
fn logical_key(c: char) -> Option<u8> {
    let key = match c {
        '1' => 0x1,
        '2' => 0x2,
        '3' => 0x3,
        '4' => 0xC,
        'q' => 0x4,
        'w' => 0x5,
        'e' => 0x6,
        'r' => 0xD,
        'a' => 0x7,
        's' => 0x8,
        'd' => 0x9,
        'f' => 0xE,
        'z' => 0xA,
        'x' => 0x0,
        'c' => 0xB,
        'v' => 0xF,
        _ => return None,
    };
    Some(key)
}

/// The terminal surface. Tracks the last frame so only changed cells are
/// redrawn, two columns per pixel.
struct Screen {
    stdout: Stdout,
    cells: [[u8; display::WIDTH]; display::HEIGHT],
}

impl Screen {
    fn new() -> crossterm::Result<Screen> {
        let mut stdout = stdout();
        execute!(stdout, EnterAlternateScreen, cursor::Hide, Clear(ClearType::All))?;
        terminal::enable_raw_mode()?;
        Ok(Screen {
            stdout,
            cells: [[0; display::WIDTH]; display::HEIGHT],
        })
    }

    fn draw(&mut self, display: &Display) -> crossterm::Result<()> {
        let mut dirty = false;
        for y in 0..display::HEIGHT {
            for x in 0..display::WIDTH {
                let pixel = display.get(x, y);
                if self.cells[y][x] != pixel {
                    self.cells[y][x] = pixel;
                    queue!(self.stdout, cursor::MoveTo(2 * x as u16, y as u16))?;
                    write!(self.stdout, "{}", if pixel == 1 { "██" } else { "  " })?;
                    dirty = true;
                }
            }
        }
        if dirty {
            self.stdout.flush()?;
        }
        Ok(())
    }
}

impl Drop for Screen {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
        let _ = execute!(self.stdout, LeaveAlternateScreen, cursor::Show);
    }
}
