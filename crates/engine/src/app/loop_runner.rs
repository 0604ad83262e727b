use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use std::time::{Duration, Instant};

use pixels::Error as PixelsError;
use thiserror::Error;
use tracing::{error, info, warn};
use winit::dpi::LogicalSize;
use winit::error::{EventLoopError, OsError};
use winit::event::{ElementState, Event, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::WindowBuilder;

use super::assets::Assets;
use super::input::{InputSnapshot, Key, KeyStates};
use super::rendering::{Color, DrawSurface, Renderer};
use super::scene::{Scene, SceneError};
use super::stack::{SceneStack, StackStatus};

#[derive(Debug, Clone)]
pub struct LoopConfig {
    pub window_title: String,
    pub window_width: u32,
    pub window_height: u32,
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub target_tps: u32,
    pub max_frame_delta: Duration,
    pub max_ticks_per_frame: u32,
    pub background: Color,
    pub metrics_log_interval: Duration,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            window_title: "canvas-lord".to_string(),
            window_width: 960,
            window_height: 540,
            canvas_width: 480,
            canvas_height: 270,
            target_tps: 60,
            max_frame_delta: Duration::from_millis(250),
            max_ticks_per_frame: 5,
            background: Color::rgb(20, 22, 28),
            metrics_log_interval: Duration::from_secs(5),
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("failed to create event loop: {0}")]
    CreateEventLoop(#[source] EventLoopError),
    #[error("failed to create application window: {0}")]
    CreateWindow(#[source] OsError),
    #[error("failed to initialize renderer: {0}")]
    CreateRenderer(#[source] PixelsError),
    #[error("event loop failed: {0}")]
    EventLoopRun(#[source] EventLoopError),
    #[error("scene failure: {0}")]
    Scene(#[from] SceneError),
}

/// Opens the window, pushes `root`, and drives the scene stack at a fixed
/// tick rate until a scene quits, the stack empties, or the window closes.
pub fn run_app(
    config: LoopConfig,
    assets: Arc<Assets>,
    root: Box<dyn Scene>,
) -> Result<(), AppError> {
    let mut stack = SceneStack::new(config.canvas_width, config.canvas_height);
    stack.push(root)?;

    let event_loop = EventLoop::new().map_err(AppError::CreateEventLoop)?;
    let window: &'static winit::window::Window = Box::leak(Box::new(
        WindowBuilder::new()
            .with_title(config.window_title.clone())
            .with_inner_size(LogicalSize::new(
                config.window_width as f64,
                config.window_height as f64,
            ))
            .build(&event_loop)
            .map_err(AppError::CreateWindow)?,
    ));
    let mut renderer = Renderer::new(window, config.canvas_width, config.canvas_height, assets)
        .map_err(AppError::CreateRenderer)?;

    event_loop.set_control_flow(ControlFlow::Poll);

    let target_tps = config.target_tps.max(1);
    let max_frame_delta =
        normalize_non_zero_duration(config.max_frame_delta, Duration::from_millis(250));
    let max_ticks_per_frame = config.max_ticks_per_frame.max(1);
    let metrics_log_interval =
        normalize_non_zero_duration(config.metrics_log_interval, Duration::from_secs(5));
    let fixed_dt = Duration::from_secs_f64(1.0 / target_tps as f64);
    let background = config.background;

    info!(
        target_tps,
        max_frame_delta_ms = max_frame_delta.as_millis() as u64,
        max_ticks_per_frame,
        canvas_width = config.canvas_width,
        canvas_height = config.canvas_height,
        "loop_config"
    );

    let failure: Rc<RefCell<Option<SceneError>>> = Rc::new(RefCell::new(None));
    let failure_in_loop = Rc::clone(&failure);
    let mut input_collector = InputCollector::default();
    let mut accumulator = Duration::ZERO;
    let mut last_frame_instant = Instant::now();
    let mut metrics = MetricsAccumulator::new(metrics_log_interval);

    event_loop
        .run(move |event, window_target| match event {
            Event::WindowEvent { window_id, event } if window_id == window.id() => match event {
                WindowEvent::CloseRequested => {
                    input_collector.mark_quit_requested();
                    info!(reason = "window_close", "shutdown_requested");
                    window_target.exit();
                }
                WindowEvent::Resized(new_size) => {
                    if let Err(error) = renderer.resize(new_size.width, new_size.height) {
                        warn!(error = %error, "renderer_resize_failed");
                        window_target.exit();
                    }
                }
                WindowEvent::ScaleFactorChanged { .. } => {
                    let size = window.inner_size();
                    if let Err(error) = renderer.resize(size.width, size.height) {
                        warn!(error = %error, "renderer_resize_failed");
                        window_target.exit();
                    }
                }
                WindowEvent::Focused(false) => {
                    input_collector.release_all();
                    match stack.blur_top() {
                        Ok(status) => {
                            if stop_requested(status) {
                                window_target.exit();
                            }
                        }
                        Err(source) => {
                            error!(error = %source, "scene_blur_failed");
                            *failure_in_loop.borrow_mut() = Some(source);
                            window_target.exit();
                        }
                    }
                }
                WindowEvent::KeyboardInput { event, .. } => {
                    input_collector
                        .handle_physical_key(event.physical_key, event.state == ElementState::Pressed);
                }
                WindowEvent::RedrawRequested => {
                    let now = Instant::now();
                    let raw_frame_dt = now.saturating_duration_since(last_frame_instant);
                    last_frame_instant = now;

                    accumulator =
                        accumulator.saturating_add(clamp_frame_delta(raw_frame_dt, max_frame_delta));
                    let step_plan = plan_sim_steps(accumulator, fixed_dt, max_ticks_per_frame);
                    for _ in 0..step_plan.ticks_to_run {
                        let input_snapshot = input_collector.snapshot_for_tick();
                        if input_snapshot.quit_requested() {
                            window_target.exit();
                            break;
                        }
                        match stack.update_top(&input_snapshot) {
                            Ok(status) => {
                                metrics.record_tick();
                                if stop_requested(status) {
                                    info!(status = ?status, "shutdown_requested");
                                    window_target.exit();
                                    break;
                                }
                            }
                            Err(source) => {
                                error!(
                                    scene = stack.top_name().unwrap_or("<none>"),
                                    error = %source,
                                    "scene_update_failed"
                                );
                                *failure_in_loop.borrow_mut() = Some(source);
                                window_target.exit();
                                break;
                            }
                        }
                    }
                    accumulator = step_plan.remaining_accumulator;

                    if step_plan.dropped_backlog > Duration::ZERO {
                        warn!(
                            dropped_backlog_ms = step_plan.dropped_backlog.as_millis() as u64,
                            max_ticks_per_frame, "sim_clamp_triggered"
                        );
                    }

                    let draw_result = renderer.render_frame(|surface| {
                        surface.clear(background);
                        stack.render_all(surface);
                    });
                    if let Err(error) = draw_result {
                        warn!(error = %error, "renderer_draw_failed");
                        window_target.exit();
                    }
                    metrics.record_frame(raw_frame_dt);

                    if let Some(snapshot) = metrics.maybe_snapshot(now) {
                        info!(
                            fps = snapshot.fps,
                            tps = snapshot.tps,
                            frame_time_ms = snapshot.frame_time_ms,
                            scene = stack.top_name().unwrap_or("<none>"),
                            stack_depth = stack.len(),
                            "loop_metrics"
                        );
                    }
                }
                _ => {}
            },
            Event::AboutToWait => {
                window.request_redraw();
            }
            Event::LoopExiting => {
                stack.shutdown_all();
                info!("shutdown");
            }
            _ => {}
        })
        .map_err(AppError::EventLoopRun)?;

    let failed = failure.borrow_mut().take();
    match failed {
        Some(source) => Err(AppError::Scene(source)),
        None => Ok(()),
    }
}

fn stop_requested(status: StackStatus) -> bool {
    matches!(status, StackStatus::Quit | StackStatus::Empty)
}

#[derive(Debug, Default)]
struct InputCollector {
    quit_requested: bool,
    held: KeyStates,
    pressed_edges: KeyStates,
}

impl InputCollector {
    fn mark_quit_requested(&mut self) {
        self.quit_requested = true;
    }

    fn handle_physical_key(&mut self, key: PhysicalKey, is_pressed: bool) {
        let Some(key) = map_physical_key(key) else {
            return;
        };
        if is_pressed && !self.held.is_down(key) {
            self.pressed_edges.set(key, true);
        }
        self.held.set(key, is_pressed);
    }

    /// Focus loss swallows key releases; forget everything held.
    fn release_all(&mut self) {
        self.held.clear();
    }

    fn snapshot_for_tick(&mut self) -> InputSnapshot {
        let snapshot = InputSnapshot::new(self.held, self.pressed_edges, self.quit_requested);
        self.pressed_edges.clear();
        snapshot
    }
}

fn map_physical_key(key: PhysicalKey) -> Option<Key> {
    let PhysicalKey::Code(code) = key else {
        return None;
    };
    let key = match code {
        KeyCode::KeyW => Key::W,
        KeyCode::KeyA => Key::A,
        KeyCode::KeyS => Key::S,
        KeyCode::KeyD => Key::D,
        KeyCode::KeyQ => Key::Q,
        KeyCode::KeyE => Key::E,
        KeyCode::KeyZ => Key::Z,
        KeyCode::KeyX => Key::X,
        KeyCode::KeyP => Key::P,
        KeyCode::ArrowUp => Key::ArrowUp,
        KeyCode::ArrowDown => Key::ArrowDown,
        KeyCode::ArrowLeft => Key::ArrowLeft,
        KeyCode::ArrowRight => Key::ArrowRight,
        KeyCode::Space => Key::Space,
        KeyCode::Enter | KeyCode::NumpadEnter => Key::Enter,
        KeyCode::Escape => Key::Escape,
        _ => return None,
    };
    Some(key)
}

#[derive(Debug, Clone, Copy)]
struct StepPlan {
    ticks_to_run: u32,
    remaining_accumulator: Duration,
    dropped_backlog: Duration,
}

fn plan_sim_steps(
    mut accumulator: Duration,
    fixed_dt: Duration,
    max_ticks_per_frame: u32,
) -> StepPlan {
    let mut ticks_to_run = 0u32;

    while accumulator >= fixed_dt && ticks_to_run < max_ticks_per_frame {
        accumulator = accumulator.saturating_sub(fixed_dt);
        ticks_to_run = ticks_to_run.saturating_add(1);
    }

    if accumulator >= fixed_dt {
        StepPlan {
            ticks_to_run,
            remaining_accumulator: Duration::ZERO,
            dropped_backlog: accumulator,
        }
    } else {
        StepPlan {
            ticks_to_run,
            remaining_accumulator: accumulator,
            dropped_backlog: Duration::ZERO,
        }
    }
}

fn clamp_frame_delta(frame_dt: Duration, max_frame_delta: Duration) -> Duration {
    frame_dt.min(max_frame_delta)
}

fn normalize_non_zero_duration(value: Duration, fallback: Duration) -> Duration {
    if value.is_zero() {
        fallback
    } else {
        value
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct LoopMetricsSnapshot {
    fps: f32,
    tps: f32,
    frame_time_ms: f32,
}

#[derive(Debug)]
struct MetricsAccumulator {
    interval_start: Instant,
    interval: Duration,
    frames: u32,
    ticks: u32,
    frame_time_sum: Duration,
}

impl MetricsAccumulator {
    fn new(interval: Duration) -> Self {
        Self {
            interval_start: Instant::now(),
            interval,
            frames: 0,
            ticks: 0,
            frame_time_sum: Duration::ZERO,
        }
    }

    fn record_frame(&mut self, frame_dt: Duration) {
        self.frames = self.frames.saturating_add(1);
        self.frame_time_sum = self.frame_time_sum.saturating_add(frame_dt);
    }

    fn record_tick(&mut self) {
        self.ticks = self.ticks.saturating_add(1);
    }

    fn maybe_snapshot(&mut self, now: Instant) -> Option<LoopMetricsSnapshot> {
        let elapsed = now.saturating_duration_since(self.interval_start);
        if elapsed < self.interval {
            return None;
        }

        let elapsed_seconds = elapsed.as_secs_f32().max(f32::EPSILON);
        let frame_time_ms = if self.frames == 0 {
            0.0
        } else {
            (self.frame_time_sum.as_secs_f32() / self.frames as f32) * 1000.0
        };
        let snapshot = LoopMetricsSnapshot {
            fps: self.frames as f32 / elapsed_seconds,
            tps: self.ticks as f32 / elapsed_seconds,
            frame_time_ms,
        };

        self.interval_start = now;
        self.frames = 0;
        self.ticks = 0;
        self.frame_time_sum = Duration::ZERO;
        Some(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_frame_delta_caps_large_frame() {
        let max_frame_delta = Duration::from_millis(250);
        assert_eq!(
            clamp_frame_delta(Duration::from_millis(600), max_frame_delta),
            max_frame_delta
        );
    }

    #[test]
    fn plan_sim_steps_runs_expected_ticks_without_drop() {
        let fixed_dt = Duration::from_millis(16);
        let result = plan_sim_steps(Duration::from_millis(48), fixed_dt, 5);

        assert_eq!(result.ticks_to_run, 3);
        assert_eq!(result.remaining_accumulator, Duration::ZERO);
        assert_eq!(result.dropped_backlog, Duration::ZERO);
    }

    #[test]
    fn plan_sim_steps_drops_backlog_when_tick_cap_hit() {
        let fixed_dt = Duration::from_millis(10);
        let result = plan_sim_steps(Duration::from_millis(95), fixed_dt, 5);

        assert_eq!(result.ticks_to_run, 5);
        assert_eq!(result.remaining_accumulator, Duration::ZERO);
        assert_eq!(result.dropped_backlog, Duration::from_millis(45));
    }

    #[test]
    fn key_press_is_edge_triggered_for_single_tick() {
        let mut input = InputCollector::default();
        input.handle_physical_key(PhysicalKey::Code(KeyCode::Space), true);

        let first = input.snapshot_for_tick();
        let second = input.snapshot_for_tick();

        assert!(first.key_pressed(&Key::Space));
        assert!(!second.key_pressed(&Key::Space));
        assert!(second.key_check(&Key::Space));
    }

    #[test]
    fn held_key_repeat_does_not_spam_press_edges() {
        let mut input = InputCollector::default();

        input.handle_physical_key(PhysicalKey::Code(KeyCode::KeyZ), true);
        let first = input.snapshot_for_tick();
        input.handle_physical_key(PhysicalKey::Code(KeyCode::KeyZ), true);
        let second = input.snapshot_for_tick();
        input.handle_physical_key(PhysicalKey::Code(KeyCode::KeyZ), false);
        input.handle_physical_key(PhysicalKey::Code(KeyCode::KeyZ), true);
        let third = input.snapshot_for_tick();

        assert!(first.key_pressed(&Key::Z));
        assert!(!second.key_pressed(&Key::Z));
        assert!(third.key_pressed(&Key::Z));
    }

    #[test]
    fn tap_within_one_frame_still_registers_press() {
        let mut input = InputCollector::default();
        input.handle_physical_key(PhysicalKey::Code(KeyCode::Enter), true);
        input.handle_physical_key(PhysicalKey::Code(KeyCode::Enter), false);

        let snapshot = input.snapshot_for_tick();
        assert!(snapshot.key_pressed(&Key::Enter));
        assert!(!snapshot.key_check(&Key::Enter));
    }

    #[test]
    fn wasd_and_arrow_keys_map_to_distinct_keys() {
        let mut input = InputCollector::default();
        input.handle_physical_key(PhysicalKey::Code(KeyCode::KeyW), true);
        input.handle_physical_key(PhysicalKey::Code(KeyCode::ArrowLeft), true);
        input.handle_physical_key(PhysicalKey::Code(KeyCode::F3), true);

        let snapshot = input.snapshot_for_tick();
        assert!(snapshot.key_check(&[Key::W, Key::ArrowUp]));
        assert!(snapshot.key_check(&Key::ArrowLeft));
        assert!(!snapshot.key_check(&Key::A));
    }

    #[test]
    fn focus_loss_releases_held_keys() {
        let mut input = InputCollector::default();
        input.handle_physical_key(PhysicalKey::Code(KeyCode::KeyD), true);
        input.release_all();
        assert!(!input.snapshot_for_tick().key_check(&Key::D));
    }

    #[test]
    fn metrics_snapshot_waits_for_interval() {
        let start = Instant::now();
        let mut metrics = MetricsAccumulator::new(Duration::from_secs(1));
        metrics.interval_start = start;
        metrics.record_tick();
        metrics.record_frame(Duration::from_millis(16));

        assert!(metrics
            .maybe_snapshot(start + Duration::from_millis(500))
            .is_none());
        let snapshot = metrics
            .maybe_snapshot(start + Duration::from_secs(1))
            .expect("snapshot");
        assert_eq!(snapshot.tps, 1.0);
        assert_eq!(snapshot.fps, 1.0);
    }
}
