/// Terminal front end: interactive ASCII viewer and PNG export
use anyhow::Result;
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self, ClearType},
};
use facewire_core::params::{param_spec, ResetFlags, RESET_ALL};
use facewire_core::{render, RenderRequest};
use log::debug;
use std::io::{self, stdout, Write};
use std::time::Duration;

pub mod export;
pub mod renderer;

pub use renderer::AsciiRenderer;

/// Slider steps moved per key press
const ROTATE_STEPS: f32 = 10.0;
const ZOOM_STEPS: f32 = 1.0;

/// Interactive viewer that re-renders the face whenever a key changes it
pub struct TerminalApp {
    request: RenderRequest,
    renderer: AsciiRenderer,
    running: bool,
    dirty: bool,
}

impl TerminalApp {
    pub fn new(request: RenderRequest) -> io::Result<Self> {
        let (width, height) = terminal::size()?;
        Ok(Self::with_size(request, width, height))
    }

    /// Viewer for a terminal of `cols` x `rows` cells; the top row holds
    /// the status line.
    pub fn with_size(request: RenderRequest, cols: u16, rows: u16) -> Self {
        Self {
            request,
            renderer: AsciiRenderer::new(cols as usize, rows.saturating_sub(1) as usize),
            running: true,
            dirty: true,
        }
    }

    pub fn request(&self) -> &RenderRequest {
        &self.request
    }

    pub fn renderer(&self) -> &AsciiRenderer {
        &self.renderer
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn run(&mut self) -> Result<()> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;

        let result = self.main_loop();

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(stdout(), terminal::LeaveAlternateScreen, cursor::Show)?;

        result
    }

    fn main_loop(&mut self) -> Result<()> {
        while self.running {
            if self.dirty {
                self.rasterize()?;
                self.draw()?;
                self.dirty = false;
            }

            if event::poll(Duration::from_millis(100))? {
                match event::read()? {
                    Event::Key(KeyEvent {
                        code,
                        kind: KeyEventKind::Press,
                        ..
                    }) => self.handle_key(code),
                    Event::Resize(cols, rows) => self.resize(cols, rows),
                    _ => {}
                }
            }
        }

        Ok(())
    }

    pub fn handle_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.running = false;
            }
            KeyCode::Char('a') | KeyCode::Left => self.nudge("yaw", -ROTATE_STEPS),
            KeyCode::Char('d') | KeyCode::Right => self.nudge("yaw", ROTATE_STEPS),
            KeyCode::Char('w') | KeyCode::Up => self.nudge("pitch", ROTATE_STEPS),
            KeyCode::Char('s') | KeyCode::Down => self.nudge("pitch", -ROTATE_STEPS),
            // plus moves the camera closer
            KeyCode::Char('+') | KeyCode::Char('=') => self.nudge("camera_distance", -ZOOM_STEPS),
            KeyCode::Char('-') | KeyCode::Char('_') => self.nudge("camera_distance", ZOOM_STEPS),
            KeyCode::Char('r') => self.reset(),
            _ => {}
        }
    }

    pub fn resize(&mut self, cols: u16, rows: u16) {
        self.renderer
            .resize(cols as usize, rows.saturating_sub(1) as usize);
        self.dirty = true;
    }

    /// Move a slider by whole steps, staying inside its declared range
    fn nudge(&mut self, name: &str, steps: f32) {
        let Some(spec) = param_spec(name) else {
            return;
        };
        let Ok(value) = self.request.params.get(name) else {
            return;
        };
        if self
            .request
            .params
            .set(name, spec.clamp(value + steps * spec.step))
            .is_ok()
        {
            self.dirty = true;
        }
    }

    fn reset(&mut self) {
        let all = ResetFlags::from([(RESET_ALL.to_string(), true)]);
        if let Ok(params) = self.request.params.with_resets(&all, self.request.preset) {
            self.request.params = params;
            self.dirty = true;
        }
    }

    /// Render at two pixels per cell vertically, roughly matching the
    /// shape of a terminal cell
    pub fn rasterize(&mut self) -> Result<()> {
        let mut request = self.request.clone();
        request.options.width = self.renderer.width() as u32;
        request.options.height = self.renderer.height() as u32 * 2;
        request.options.line_thickness = 1;

        let canvas = render(&request)?;
        self.renderer
            .render_canvas(&canvas, request.options.style.background);
        debug!(
            "viewer frame {}x{} cells",
            self.renderer.width(),
            self.renderer.height()
        );
        Ok(())
    }

    pub fn status_line(&self) -> String {
        let params = &self.request.params;
        format!(
            "Facewire | {} {} | yaw {:.0} pitch {:.0} dist {:.1} | Arrows/WASD=Rotate +/-=Zoom R=Reset Q=Quit",
            self.request.preset,
            self.request.model,
            params.yaw,
            params.pitch,
            params.camera_distance
        )
    }

    fn draw(&self) -> Result<()> {
        let mut stdout = stdout();
        queue!(stdout, terminal::Clear(ClearType::All))?;

        self.renderer.draw(&mut stdout, 1)?;

        // Draw UI overlay
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            SetForegroundColor(Color::Yellow),
            Print(self.status_line()),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use facewire_core::{ModelKind, Preset};

    fn app() -> TerminalApp {
        TerminalApp::with_size(RenderRequest::new(Preset::Male, ModelKind::Landmarks), 40, 21)
    }

    #[test]
    fn test_status_row_is_reserved() {
        let app = app();
        assert_eq!(app.renderer().width(), 40);
        assert_eq!(app.renderer().height(), 20);
        assert!(app.status_line().contains("male landmarks"));
    }

    #[test]
    fn test_keys_rotate_and_zoom() {
        let mut app = app();
        app.handle_key(KeyCode::Right);
        app.handle_key(KeyCode::Char('w'));
        app.handle_key(KeyCode::Char('+'));
        let params = app.request().params;
        assert_eq!(params.yaw, 5.0);
        assert_eq!(params.pitch, 5.0);
        assert!(params.camera_distance < 2.5);
    }

    #[test]
    fn test_rotation_stops_at_range_limit() {
        let mut app = app();
        for _ in 0..100 {
            app.handle_key(KeyCode::Down);
        }
        assert_eq!(app.request().params.pitch, -60.0);
    }

    #[test]
    fn test_reset_restores_preset() {
        let mut app = app();
        app.handle_key(KeyCode::Left);
        app.handle_key(KeyCode::Char('-'));
        app.handle_key(KeyCode::Char('r'));
        assert_eq!(app.request().params, facewire_core::FaceParams::preset_defaults(Preset::Male));
    }

    #[test]
    fn test_quit_keys() {
        let mut app = app();
        assert!(app.is_running());
        app.handle_key(KeyCode::Esc);
        assert!(!app.is_running());
    }

    #[test]
    fn test_frame_has_ink() {
        let mut app = app();
        app.rasterize().unwrap();
        let rows: Vec<String> = (0..app.renderer().height())
            .map(|y| app.renderer().row(y))
            .collect();
        assert!(rows.iter().any(|row| !row.trim().is_empty()));
    }
}
