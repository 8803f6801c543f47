/// Terminal driver for the collide-and-slide core
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self},
};
use log::info;
use nalgebra::{Point3, Vector3};
use std::collections::VecDeque;
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};
use thiserror::Error;
use slide3d_core::{Mesh, PhysicsPlayer, PlayerInput, StlError, Transform, World, WorldError};

pub mod logging;
pub mod trace;

pub use trace::TracePlot;

/// Fixed simulation step.
pub const TICK: f32 = 1.0 / 60.0;
/// Level rotation applied per tilt key press, in radians.
const TILT_STEP: f32 = 0.05;
const TRAIL_LEN: usize = 240;
const PLOT_SCALE: f32 = 0.1;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("terminal I/O failed: {0}")]
    Io(#[from] io::Error),
    #[error(transparent)]
    World(#[from] WorldError),
    #[error("failed to load mesh: {0}")]
    Stl(#[from] StlError),
}

/// The default level: a floor with a short flight of stairs.
pub fn demo_level() -> Mesh {
    let mut mesh = Mesh::floor(20.0, 0.0);
    mesh.extend(Mesh::stairs(4, 0.2, 0.5, 4.0));
    mesh
}

/// A player walking over a level that can be tilted at runtime.
pub struct SimulationApp {
    mesh: Mesh,
    transform: Transform,
    world: World,
    player: PhysicsPlayer,
    trail: VecDeque<Point3<f32>>,
    running: bool,
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
}

impl SimulationApp {
    pub fn new(mesh: Mesh, radius: Vector3<f32>, start: Point3<f32>) -> Result<Self, AppError> {
        let transform = Transform::identity();
        let world = World::from_mesh(&mesh, &transform.matrix(), radius)?;
        info!(
            "level baked: {} of {} faces usable",
            world.triangles().len(),
            mesh.faces.len()
        );

        Ok(Self {
            mesh,
            transform,
            world,
            player: PhysicsPlayer::new(start),
            trail: VecDeque::with_capacity(TRAIL_LEN),
            running: true,
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        })
    }

    pub fn player(&self) -> &PhysicsPlayer {
        &self.player
    }

    /// Advance one tick and remember where the player went.
    pub fn step(&mut self, input: PlayerInput) {
        self.player.tick(&self.world, input, TICK);
        if self.trail.len() == TRAIL_LEN {
            self.trail.pop_front();
        }
        self.trail.push_back(self.player.position);
    }

    /// Rotate the level about Z and rebake the World.
    pub fn tilt(&mut self, angle: f32) {
        self.transform.rotation.rotate(0.0, 0.0, angle);
        self.world.rebuild(&self.mesh, &self.transform.matrix());
        info!("level tilted to {:.2} rad", self.transform.rotation.z);
    }

    /// Walk along +X for `ticks` ticks without a terminal, logging each one.
    pub fn run_headless(&mut self, ticks: usize) {
        let walk = PlayerInput {
            wish: Vector3::x(),
            jump: false,
        };
        for tick in 0..ticks {
            self.step(walk);
            let p = self.player.position;
            info!(
                "tick {tick:>4}: position ({:.3}, {:.3}, {:.3}) grounded={}",
                p.x,
                p.y,
                p.z,
                self.player.grounded()
            );
        }
    }

    pub fn run(&mut self) -> Result<(), AppError> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;

        let result = self.main_loop();

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(stdout(), terminal::LeaveAlternateScreen, cursor::Show)?;

        result
    }

    fn main_loop(&mut self) -> Result<(), AppError> {
        let target_frame_time = Duration::from_secs_f32(TICK);

        while self.running {
            let frame_start = Instant::now();

            let input = if event::poll(Duration::from_millis(0))? {
                self.handle_input()?
            } else {
                PlayerInput::default()
            };
            self.step(input);
            self.render()?;

            self.frame_count += 1;
            let elapsed = frame_start.elapsed();
            if elapsed < target_frame_time {
                std::thread::sleep(target_frame_time - elapsed);
            }

            let now = Instant::now();
            if (now - self.last_frame).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.last_frame).as_secs_f32();
                self.frame_count = 0;
                self.last_frame = now;
            }
        }

        Ok(())
    }

    fn handle_input(&mut self) -> io::Result<PlayerInput> {
        let mut input = PlayerInput::default();
        if let Event::Key(KeyEvent { code, .. }) = event::read()? {
            match code {
                KeyCode::Char('q') | KeyCode::Esc => self.running = false,
                KeyCode::Char('a') | KeyCode::Left => input.wish = -Vector3::x(),
                KeyCode::Char('d') | KeyCode::Right => input.wish = Vector3::x(),
                KeyCode::Char('w') | KeyCode::Up => input.wish = -Vector3::z(),
                KeyCode::Char('s') | KeyCode::Down => input.wish = Vector3::z(),
                KeyCode::Char(' ') => input.jump = true,
                KeyCode::Char('t') => self.tilt(TILT_STEP),
                KeyCode::Char('r') => self.tilt(-TILT_STEP),
                _ => {}
            }
        }
        Ok(input)
    }

    fn render(&mut self) -> io::Result<()> {
        let (width, height) = terminal::size()?;
        let focus = self.player.position;
        let mut plot = TracePlot::new(width as usize, height.saturating_sub(1) as usize, PLOT_SCALE);
        plot.plot_player(&focus);
        plot.plot_world(&self.world, &focus);
        plot.plot_trail(&self.trail, &focus);

        let mut stdout = stdout();
        queue!(stdout, cursor::MoveTo(0, 1))?;
        plot.draw(&mut stdout)?;

        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            SetForegroundColor(Color::Yellow),
            Print(format!(
                "Slide3D | FPS: {:.1} | pos ({:.2}, {:.2}, {:.2}) {} | A/D/W/S=Walk Space=Jump T/R=Tilt Q=Quit",
                self.fps,
                focus.x,
                focus.y,
                focus.z,
                if self.player.grounded() { "grounded" } else { "airborne" },
            )),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}
