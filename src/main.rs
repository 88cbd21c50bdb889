use std::collections::HashSet;
use std::num::NonZeroU32;
use std::rc::Rc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result, bail};
use log::{debug, error, info, trace, warn};
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use crate::camera::{Pose, ViewConfig};
use crate::grid::TileGrid;
use crate::motion::{KeyState, MotionController};
use crate::scaler::{ScaleLut, blit_nearest_stretch, build_scale_lut};

mod camera;
mod caster;
mod grid;
mod motion;
mod projector;
mod renderer;
mod scaler;

const TICK: Duration = Duration::from_micros(16_667);
const MAX_CATCH_UP: Duration = Duration::from_millis(100);

type Surface = softbuffer::Surface<Rc<Window>, Rc<Window>>;

// softbuffer and winit errors are not all `Send + Sync`, so keep only the message.
fn display_err<E: std::fmt::Display>(e: E) -> anyhow::Error {
    anyhow::anyhow!("{e}")
}

struct App {
    window: Option<Rc<Window>>,
    surface: Option<Surface>,
    grid: TileGrid,
    view: ViewConfig,
    pose: Pose,
    motion: MotionController,
    parallel: bool,

    // HUD
    frame_counter: u32,
    last_fps_print: Instant,

    // Internal buffer, one column per ray
    fb: Vec<u32>,
    fb_w: usize,
    fb_h: usize,

    scale_lut: ScaleLut,

    // Input and fixed-rate simulation
    keys_down: HashSet<KeyCode>,
    last_tick: Instant,
    pending: Duration,
}

impl App {
    fn new(grid: TileGrid, view: ViewConfig, pose: Pose, parallel: bool) -> Self {
        let fb_w = view.ray_count;
        let fb_h = view.screen_height as usize;
        Self {
            window: None,
            surface: None,
            grid,
            view,
            pose,
            motion: MotionController::default(),
            parallel,

            frame_counter: 0,
            last_fps_print: Instant::now(),

            fb: vec![0; fb_w * fb_h],
            fb_w,
            fb_h,

            scale_lut: ScaleLut::empty(),

            keys_down: HashSet::new(),
            last_tick: Instant::now(),
            pending: Duration::ZERO,
        }
    }

    fn create_window(&self, event_loop: &ActiveEventLoop) -> Result<(Rc<Window>, Surface)> {
        let attributes = Window::default_attributes()
            .with_title("Tile Raycaster")
            .with_inner_size(LogicalSize::new(self.fb_w as f64, self.fb_h as f64));

        let window = Rc::new(
            event_loop
                .create_window(attributes)
                .map_err(display_err)
                .context("create window")?,
        );
        let context = softbuffer::Context::new(window.clone())
            .map_err(display_err)
            .context("softbuffer context")?;
        let surface = softbuffer::Surface::new(&context, window.clone())
            .map_err(display_err)
            .context("softbuffer surface")?;
        Ok((window, surface))
    }

    fn keys(&self) -> KeyState {
        let down =
            |a: KeyCode, b: KeyCode| self.keys_down.contains(&a) || self.keys_down.contains(&b);
        KeyState {
            forward: down(KeyCode::KeyW, KeyCode::ArrowUp),
            back: down(KeyCode::KeyS, KeyCode::ArrowDown),
            turn_left: down(KeyCode::KeyA, KeyCode::ArrowLeft),
            turn_right: down(KeyCode::KeyD, KeyCode::ArrowRight),
        }
    }

    /// Runs as many fixed ticks as wall-clock time allows, capped so a stall
    /// does not replay seconds of input at once.
    fn tick(&mut self) {
        let now = Instant::now();
        self.pending += now.duration_since(self.last_tick);
        self.last_tick = now;
        if self.pending > MAX_CATCH_UP {
            self.pending = MAX_CATCH_UP;
        }

        let keys = self.keys();
        while self.pending >= TICK {
            self.pending -= TICK;
            self.pose = self.motion.step(self.pose, keys, &self.grid);
        }
    }

    fn redraw(&mut self, id: WindowId) -> Result<()> {
        self.tick();

        let (window, surface) = match (&self.window, &mut self.surface) {
            (Some(w), Some(s)) if w.id() == id => (w, s),
            _ => return Ok(()),
        };

        let size = window.inner_size();
        let (Some(dw), Some(dh)) = (NonZeroU32::new(size.width), NonZeroU32::new(size.height))
        else {
            return Ok(()); // Minimized window, skip drawing
        };
        let (dst_w, dst_h) = (dw.get() as usize, dh.get() as usize);
        if self.scale_lut.dst_size() != (dst_w, dst_h) {
            self.scale_lut = build_scale_lut(dst_w, dst_h, self.fb_w, self.fb_h);
        }

        surface
            .resize(dw, dh)
            .map_err(display_err)
            .context("resize surface")?;

        // Snapshot the pose so the whole frame sees one viewer position.
        let pose = self.pose;
        let spans = if self.parallel {
            projector::project_par(&pose, &self.view, &self.grid)
        } else {
            projector::project(&pose, &self.view, &self.grid)
        };
        trace!("projected {} spans at {:?}", spans.len(), pose);
        renderer::render_frame(&mut self.fb, self.fb_w, self.fb_h, &spans);

        let mut buf = surface
            .buffer_mut()
            .map_err(display_err)
            .context("buffer_mut")?;
        blit_nearest_stretch(&mut buf, dst_w, &self.fb, self.fb_w, &self.scale_lut);
        buf.present().map_err(display_err).context("present")?;

        self.frame_counter += 1;
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_fps_print).as_secs_f32();
        if elapsed >= 1.0 {
            info!("FPS: {:.1}", self.frame_counter as f32 / elapsed);
            self.frame_counter = 0;
            self.last_fps_print = now;
        }

        window.request_redraw();
        Ok(())
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        match self.create_window(event_loop) {
            Ok((window, surface)) => {
                debug!("window created: {:?}", window.inner_size());
                window.request_redraw();
                self.surface = Some(surface);
                self.window = Some(window);
                self.last_tick = Instant::now();
                self.pending = Duration::ZERO;
            }
            Err(e) => {
                error!("{e:#}");
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                info!("The close button was pressed; stopping");
                event_loop.exit();
            }

            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state,
                        ..
                    },
                ..
            } => match state {
                ElementState::Pressed => {
                    if code == KeyCode::Escape {
                        event_loop.exit();
                    }
                    self.keys_down.insert(code);
                }
                ElementState::Released => {
                    self.keys_down.remove(&code);
                }
            },

            WindowEvent::RedrawRequested => {
                if let Err(e) = self.redraw(id) {
                    error!("{e:#}");
                    event_loop.exit();
                }
            }

            WindowEvent::Resized(new_size) => {
                debug!("resized to {}x{}", new_size.width, new_size.height);
            }
            _ => (),
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

const USAGE: &str = "Usage: tile-raycaster [--serial] [MAP FILE]";

struct Args {
    map: Option<String>,
    serial: bool,
}

fn parse_args() -> Result<Args> {
    let mut args = Args {
        map: None,
        serial: false,
    };
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--serial" => args.serial = true,
            flag if flag.starts_with("--") => bail!("unknown flag {flag}\n{USAGE}"),
            _ if args.map.is_some() => bail!("more than one map file given"),
            _ => args.map = Some(arg),
        }
    }
    Ok(args)
}

fn load_grid(path: Option<&str>) -> Result<TileGrid> {
    let Some(path) = path else {
        info!("no map file given, using built-in map");
        return Ok(TileGrid::default());
    };
    let text = std::fs::read_to_string(&path).with_context(|| format!("read map {path}"))?;
    let grid = TileGrid::parse(&text).inspect_err(|e| warn!("rejected map {path}: {e}"))?;
    info!("loaded map {path}");
    Ok(grid)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = parse_args()?;
    let grid = load_grid(args.map.as_deref()).context("Failed to load map")?;
    let view = ViewConfig::default();
    view.validate().context("invalid view config")?;

    let pose = Pose::default();
    if grid.tile_at(pose.x, pose.y) != Some(grid::Tile::Open) {
        bail!("start position ({}, {}) is not an open tile", pose.x, pose.y);
    }
    info!(
        "map {}x{}, {} rays, fov {:.3} rad, depth {}",
        grid.width(),
        grid.height(),
        view.ray_count,
        view.fov,
        view.max_depth
    );

    let event_loop = EventLoop::new()
        .map_err(display_err)
        .context("create event loop")?;
    // Redraws are requested continuously, so the loop stays busy without Poll.
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = App::new(grid, view, pose, !args.serial);
    event_loop
        .run_app(&mut app)
        .map_err(display_err)
        .context("event loop")?;
    Ok(())
}
