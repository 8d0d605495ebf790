/// Terminal frame loop for the softraster renderer
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self, ClearType},
};
use softraster_core::{FrameStats, Key, KeyState, RenderContext};
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};

pub mod options;
pub mod renderer;

pub use options::LaunchOptions;
pub use renderer::HalfBlockRenderer;

/// Terminal rows reserved for the status line
const STATUS_ROWS: u16 = 1;

/// Map a terminal key to a camera control key
pub fn control_key(code: KeyCode) -> Option<Key> {
    match code {
        KeyCode::Up => Some(Key::Up),
        KeyCode::Down => Some(Key::Down),
        KeyCode::Left => Some(Key::Left),
        KeyCode::Right => Some(Key::Right),
        KeyCode::Char(c) => match c.to_ascii_lowercase() {
            'w' => Some(Key::W),
            'a' => Some(Key::A),
            's' => Some(Key::S),
            'd' => Some(Key::D),
            'f' => Some(Key::F),
            'g' => Some(Key::G),
            _ => None,
        },
        _ => None,
    }
}

/// Main application struct for terminal rendering
pub struct TerminalApp {
    context: RenderContext,
    renderer: HalfBlockRenderer,
    keys: KeyState,
    running: bool,
    last_tick: Instant,
    last_fps_sample: Instant,
    frame_count: u32,
    fps: f32,
    stats: FrameStats,
}

impl TerminalApp {
    pub fn new(mut context: RenderContext) -> io::Result<Self> {
        let (columns, rows) = terminal::size()?;
        let rows = rows.saturating_sub(STATUS_ROWS);

        let renderer = HalfBlockRenderer::new(columns as usize, rows as usize, STATUS_ROWS);
        let (width, height) = renderer.pixel_size();
        context.resize(width, height);

        Ok(Self {
            context,
            renderer,
            keys: KeyState::new(),
            running: true,
            last_tick: Instant::now(),
            last_fps_sample: Instant::now(),
            frame_count: 0,
            fps: 0.0,
            stats: FrameStats::default(),
        })
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;

        let result = self.main_loop();

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(stdout(), terminal::LeaveAlternateScreen, cursor::Show)?;

        result
    }

    fn main_loop(&mut self) -> io::Result<()> {
        let target_frame_time = Duration::from_millis(1000 / 30); // 30 FPS target

        while self.running {
            let frame_start = Instant::now();

            // Keys seen during this frame form the snapshot
            self.keys.clear();
            while event::poll(Duration::from_millis(0))? {
                self.handle_event(event::read()?)?;
            }

            // Update
            let seconds = self.last_tick.elapsed().as_secs_f32();
            self.last_tick = Instant::now();
            self.context.update(seconds, &self.keys);

            // Render
            self.render()?;

            // Frame timing
            self.frame_count += 1;
            let elapsed = frame_start.elapsed();
            if elapsed < target_frame_time {
                std::thread::sleep(target_frame_time - elapsed);
            }

            // Update FPS counter
            let now = Instant::now();
            if (now - self.last_fps_sample).as_secs() >= 1 {
                self.fps =
                    self.frame_count as f32 / (now - self.last_fps_sample).as_secs_f32();
                self.frame_count = 0;
                self.last_fps_sample = now;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) -> io::Result<()> {
        match event {
            Event::Key(KeyEvent { code, kind, .. }) => {
                if matches!(code, KeyCode::Char('q' | 'Q') | KeyCode::Esc) {
                    self.running = false;
                } else if let Some(key) = control_key(code) {
                    if kind == KeyEventKind::Release {
                        self.keys.release(key);
                    } else {
                        self.keys.press(key);
                    }
                }
            }
            Event::Resize(columns, rows) => self.resize(columns, rows)?,
            _ => {}
        }
        Ok(())
    }

    fn resize(&mut self, columns: u16, rows: u16) -> io::Result<()> {
        let rows = rows.saturating_sub(STATUS_ROWS);
        self.renderer.resize(columns as usize, rows as usize);
        let (width, height) = self.renderer.pixel_size();
        self.context.resize(width, height);
        execute!(stdout(), terminal::Clear(ClearType::All))
    }

    fn render(&mut self) -> io::Result<()> {
        self.stats = self.context.render(self.renderer.color_buffer_mut());

        // Output to terminal
        let mut stdout = stdout();
        self.renderer.draw(&mut stdout)?;

        // Draw UI overlay
        let camera = self.context.camera();
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            terminal::Clear(ClearType::CurrentLine),
            SetForegroundColor(Color::Yellow),
            Print(format!(
                "softraster | FPS: {:.1} | tris {}/{} | fov {:.1} | eye ({:.1}, {:.1}) | Arrows=Eye WASD=Center F/G=FOV Q=Quit",
                self.fps,
                self.stats.drawn,
                self.stats.triangles,
                camera.fov,
                camera.eye.x,
                camera.eye.y,
            )),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_control_key_mapping() {
        assert_eq!(control_key(KeyCode::Up), Some(Key::Up));
        assert_eq!(control_key(KeyCode::Char('W')), Some(Key::W));
        assert_eq!(control_key(KeyCode::Char('g')), Some(Key::G));
        assert_eq!(control_key(KeyCode::Char('x')), None);
        assert_eq!(control_key(KeyCode::Enter), None);
    }
}
