use crate::config::{AnimationConfig, ConfigError, DeviceClass};
use crate::field::Field;
use crate::geometry::Point;
use crate::motion::MotionDriver;
use crate::render::{render_frame, CanvasSettings, DrawSurface, FrameStats};
use crate::viewport::{ResizeDebouncer, TargetMode, Viewport};
use rand::SeedableRng;
use rand_chacha::ChaCha12Rng;
use std::time::Duration;
use std::{error::Error, fmt};

/// The mount-point collaborator observed at startup: a rectangular region
/// with a size, a display density, and a touch capability flag.
#[derive(Clone, Copy, Debug)]
pub struct Mount {
    pub width: f64,
    pub height: f64,
    pub device_pixel_ratio: f64,
    pub touch: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SetupError {
    Config(ConfigError),
    /// The host provided no mount region. Fatal; never retried.
    MissingMount,
    /// The host provided no drawable surface. Fatal; never retried.
    MissingSurface,
}

impl fmt::Display for SetupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SetupError::Config(e) => write!(f, "{}", e),
            SetupError::MissingMount => write!(f, "mount region not found"),
            SetupError::MissingSurface => write!(f, "drawable surface not found"),
        }
    }
}

impl From<ConfigError> for SetupError {
    fn from(err: ConfigError) -> Self {
        SetupError::Config(err)
    }
}

impl Error for SetupError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            SetupError::Config(e) => Some(e),
            _ => None,
        }
    }
}

/// Owner of all animation state: viewport, field, motion driver, target and
/// guards. One instance per mounted animation; no globals, so independent
/// instances coexist (and tests construct as many as they like).
///
/// Everything runs on the caller's single thread: `tick` (motion) and
/// `render` (drawing) interleave as plain sequential calls, which is the
/// confinement that makes the shared particle positions safe.
pub struct AnimationController {
    config: AnimationConfig,
    viewport: Viewport,
    field: Field,
    motion: MotionDriver,
    target: Point,
    mode: TargetMode,
    enabled: bool,
    armed: bool,
    elapsed: Duration,
    generation: u64,
    debouncer: ResizeDebouncer,
    needs_configure: bool,
    rng: ChaCha12Rng,
}

impl AnimationController {
    /// Like [`AnimationController::try_new`] but panics on setup failure.
    pub fn new<S: DrawSurface>(
        config: AnimationConfig,
        mount: Option<Mount>,
        surface: Option<&mut S>,
    ) -> Self {
        Self::try_new(config, mount, surface).unwrap_or_else(|e| panic!("{e}"))
    }

    /// Validate the config, capture the initial viewport, build the first
    /// field and motion driver, pin the target to center, and configure the
    /// surface. Missing collaborators are fatal setup errors.
    pub fn try_new<S: DrawSurface>(
        config: AnimationConfig,
        mount: Option<Mount>,
        surface: Option<&mut S>,
    ) -> Result<Self, SetupError> {
        config.validate()?;
        let mount = mount.ok_or(SetupError::MissingMount)?;
        let surface = surface.ok_or(SetupError::MissingSurface)?;

        let viewport = Viewport::new(
            mount.width,
            mount.height,
            mount.device_pixel_ratio,
            mount.touch,
        );
        let mut rng = ChaCha12Rng::seed_from_u64(config.seed);
        let field = Field::build(
            viewport.width(),
            viewport.initial_height(),
            DeviceClass::from_width(viewport.width()),
            0,
            &mut rng,
        );
        let motion = MotionDriver::new(&field, &config, &mut rng);
        let target = viewport.center();
        let debouncer = ResizeDebouncer::new(config.resize_debounce);

        let settings = CanvasSettings::compute(
            viewport.width(),
            viewport.initial_height(),
            viewport.pixel_ratio(),
        );
        surface.configure(settings);

        log::info!(
            "animation mounted: {}x{} density {} ({} particles)",
            viewport.width(),
            viewport.initial_height(),
            field.density,
            field.len()
        );

        Ok(Self {
            config,
            viewport,
            field,
            motion,
            target,
            mode: TargetMode::Static,
            enabled: true,
            armed: false,
            elapsed: Duration::ZERO,
            generation: 0,
            debouncer,
            needs_configure: false,
            rng,
        })
    }

    pub fn field(&self) -> &Field {
        &self.field
    }

    pub fn target(&self) -> Point {
        self.target
    }

    pub fn mode(&self) -> TargetMode {
        self.mode
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Current backing-buffer configuration; pure in the viewport state, so
    /// recomputing without changes yields an identical value.
    pub fn canvas_settings(&self) -> CanvasSettings {
        CanvasSettings::compute(
            self.viewport.width(),
            self.viewport.initial_height(),
            self.viewport.pixel_ratio(),
        )
    }

    /// Pointer-move: moves the target instantly, interactive mode only.
    pub fn pointer_moved(&mut self, x: f64, y: f64) {
        if self.mode == TargetMode::Interactive {
            self.target = Point::new(x, y);
        }
    }

    /// Scroll: toggles the render guard; the frame loop itself never stops.
    pub fn scrolled(&mut self, y: f64) {
        self.enabled = self.viewport.animation_enabled_at(y);
    }

    /// Viewport resize. Every event is observed so the debouncer always
    /// holds the latest width (a resize back to the current width must
    /// supersede an earlier pending one); `tick` drops the release when the
    /// width did not actually change. Height changes alone never reach the
    /// field builder, by the fixed-height policy.
    pub fn resized(&mut self, width: f64, _height: f64) {
        self.debouncer.observe(width, self.elapsed);
    }

    /// Visual-viewport zoom change: reconfigures the backing buffer, never
    /// rebuilds the field.
    pub fn zoom_changed(&mut self, scale: f64) {
        self.viewport.set_zoom(scale);
        self.needs_configure = true;
        log::debug!("zoom {scale}: pixel ratio now {}", self.viewport.pixel_ratio());
    }

    /// Display density change (e.g. window dragged across monitors); same
    /// backing-buffer-only treatment as zoom.
    pub fn device_pixel_ratio_changed(&mut self, ratio: f64) {
        self.viewport.set_device_pixel_ratio(ratio);
        self.needs_configure = true;
    }

    /// Advance the animation clock by `dt`: arms pointer interaction once the
    /// fade delay elapses, fires any debounced rebuild, and drives particle
    /// motion.
    pub fn tick(&mut self, dt: Duration) {
        self.elapsed += dt;
        if !self.armed && self.elapsed.as_secs_f64() >= self.config.fade_duration_secs {
            self.armed = true;
            self.refresh_mode();
        }
        if let Some(width) = self.debouncer.poll(self.elapsed) {
            if width != self.viewport.width() {
                self.rebuild(width);
            }
        }
        self.motion
            .advance(&mut self.field, dt.as_secs_f64(), &mut self.rng);
    }

    /// Draw one frame, honoring the scroll guard. Reapplies the surface
    /// configuration first when zoom/density/width changed since the last
    /// frame.
    pub fn render<S: DrawSurface>(&mut self, surface: &mut S) -> FrameStats {
        if self.needs_configure {
            surface.configure(self.canvas_settings());
            self.needs_configure = false;
        }
        render_frame(
            &mut self.field,
            self.target,
            self.viewport.pixel_ratio(),
            self.enabled,
            surface,
        )
    }

    /// Full structural rebuild after a debounced width change: the old
    /// field's drifts are cancelled by the generation bump, then everything
    /// downstream is rebuilt against the new width (height stays frozen).
    fn rebuild(&mut self, width: f64) {
        self.viewport.set_width(width);
        self.generation += 1;
        self.field = Field::build(
            width,
            self.viewport.initial_height(),
            DeviceClass::from_width(width),
            self.generation,
            &mut self.rng,
        );
        self.motion = MotionDriver::new(&self.field, &self.config, &mut self.rng);
        self.target = self.viewport.center();
        self.refresh_mode();
        self.needs_configure = true;
        log::info!(
            "field rebuilt for width {width}: generation {}, density {}, {} particles",
            self.generation,
            self.field.density,
            self.field.len()
        );
    }

    fn refresh_mode(&mut self) {
        let mode = self
            .viewport
            .target_mode(self.config.interactive_breakpoint, self.armed);
        if mode == TargetMode::Static {
            self.target = self.viewport.center();
        }
        if mode != self.mode {
            log::debug!("target mode -> {mode:?}");
            self.mode = mode;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::RecordingSurface;

    fn desktop_mount() -> Mount {
        Mount {
            width: 800.0,
            height: 600.0,
            device_pixel_ratio: 1.0,
            touch: false,
        }
    }

    fn wide_mount() -> Mount {
        Mount {
            width: 1280.0,
            height: 720.0,
            device_pixel_ratio: 1.0,
            touch: false,
        }
    }

    fn controller_with(mount: Mount) -> (AnimationController, RecordingSurface) {
        let mut surface = RecordingSurface::default();
        let controller = AnimationController::try_new(
            AnimationConfig {
                seed: 42,
                ..AnimationConfig::default()
            },
            Some(mount),
            Some(&mut surface),
        )
        .expect("setup");
        (controller, surface)
    }

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn missing_mount_is_a_fatal_setup_error() {
        let mut surface = RecordingSurface::default();
        let result = AnimationController::try_new(
            AnimationConfig::default(),
            None,
            Some(&mut surface),
        );
        assert_eq!(result.err(), Some(SetupError::MissingMount));
    }

    #[test]
    fn missing_surface_is_a_fatal_setup_error() {
        let result = AnimationController::try_new::<RecordingSurface>(
            AnimationConfig::default(),
            Some(desktop_mount()),
            None,
        );
        assert_eq!(result.err(), Some(SetupError::MissingSurface));
    }

    #[test]
    fn invalid_config_is_rejected_at_setup() {
        let mut surface = RecordingSurface::default();
        let config = AnimationConfig {
            fade_duration_secs: -1.0,
            ..AnimationConfig::default()
        };
        let result = AnimationController::try_new(config, Some(desktop_mount()), Some(&mut surface));
        assert!(matches!(result, Err(SetupError::Config(_))));
    }

    #[test]
    fn end_to_end_desktop_800_by_600_scenario() {
        let (mut controller, mut surface) = controller_with(desktop_mount());
        // clamp(floor(800/50), 20, 40) = 20 → 400 grid cells.
        assert_eq!(controller.field().density, 20);
        assert_eq!(controller.field().len(), 400);
        // Target pinned at the viewport center before any interaction.
        assert_eq!(controller.target(), Point::new(400.0, 300.0));

        // A particle sitting exactly on the target is fully active on the
        // first frame.
        controller.field.particles[0].position = Point::new(400.0, 300.0);
        let stats = controller.render(&mut surface);
        assert!(stats.drawn);
        assert_eq!(controller.field().particles[0].activity, 0.3);
        assert_eq!(controller.field().particles[0].circle_activity, 0.6);
        assert!(stats.active >= 1);
    }

    #[test]
    fn setup_configures_the_surface_backing_buffer() {
        let (_, surface) = controller_with(desktop_mount());
        assert_eq!(
            surface.configured,
            vec![CanvasSettings::compute(800.0, 600.0, 1.0)]
        );
    }

    #[test]
    fn pointer_is_ignored_until_armed_and_interactive() {
        let (mut controller, _) = controller_with(wide_mount());
        controller.pointer_moved(10.0, 20.0);
        assert_eq!(controller.target(), Point::new(640.0, 360.0));

        // Default fade duration is zero: the first tick arms interaction.
        controller.tick(ms(16));
        assert!(controller.is_armed());
        assert_eq!(controller.mode(), TargetMode::Interactive);
        controller.pointer_moved(10.0, 20.0);
        assert_eq!(controller.target(), Point::new(10.0, 20.0));
    }

    #[test]
    fn fade_delay_postpones_arming() {
        let mut surface = RecordingSurface::default();
        let mut controller = AnimationController::try_new(
            AnimationConfig {
                fade_duration_secs: 1.0,
                ..AnimationConfig::default()
            },
            Some(wide_mount()),
            Some(&mut surface),
        )
        .expect("setup");
        controller.tick(ms(500));
        assert!(!controller.is_armed());
        controller.tick(ms(500));
        assert!(controller.is_armed());
    }

    #[test]
    fn narrow_and_touch_viewports_stay_static_with_centered_target() {
        let mut surface = RecordingSurface::default();
        let mut narrow = AnimationController::try_new(
            AnimationConfig::default(),
            Some(Mount {
                width: 768.0,
                height: 600.0,
                device_pixel_ratio: 1.0,
                touch: false,
            }),
            Some(&mut surface),
        )
        .expect("setup");
        narrow.tick(ms(16));
        assert_eq!(narrow.mode(), TargetMode::Static);
        narrow.pointer_moved(5.0, 5.0);
        assert_eq!(narrow.target(), Point::new(384.0, 300.0));

        let mut touch = AnimationController::try_new(
            AnimationConfig::default(),
            Some(Mount {
                touch: true,
                ..wide_mount()
            }),
            Some(&mut surface),
        )
        .expect("setup");
        touch.tick(ms(16));
        assert_eq!(touch.mode(), TargetMode::Static);
    }

    #[test]
    fn scrolling_past_one_viewport_height_suppresses_drawing() {
        let (mut controller, mut surface) = controller_with(desktop_mount());
        controller.scrolled(601.0);
        assert!(!controller.is_enabled());
        let stats = controller.render(&mut surface);
        assert!(!stats.drawn);

        controller.scrolled(100.0);
        assert!(controller.is_enabled());
        let stats = controller.render(&mut surface);
        assert!(stats.drawn);
    }

    #[test]
    fn width_resize_rebuilds_after_the_debounce_quiet_period() {
        let (mut controller, _) = controller_with(desktop_mount());
        controller.resized(1300.0, 600.0);
        controller.tick(ms(100));
        assert_eq!(controller.generation(), 0, "rebuild before quiet period");
        controller.tick(ms(200));
        assert_eq!(controller.generation(), 1);
        assert_eq!(controller.field().generation, 1);
        // 1300 / 50 = 26, inside desktop's [20, 40].
        assert_eq!(controller.field().density, 26);
        // Height stays frozen at its initial capture.
        assert_eq!(controller.field().height, 600.0);
        // Target recentered against the new width.
        assert_eq!(controller.target(), Point::new(650.0, 300.0));
    }

    #[test]
    fn resize_back_to_original_width_within_quiet_period_does_not_rebuild() {
        let (mut controller, _) = controller_with(desktop_mount());
        controller.resized(1300.0, 600.0);
        controller.tick(ms(100));
        // The viewport snaps back before the quiet period elapses; the later
        // event supersedes the pending 1300.
        controller.resized(800.0, 600.0);
        controller.tick(ms(1000));
        assert_eq!(controller.generation(), 0);
        assert_eq!(controller.field().width, 800.0);
        assert_eq!(controller.field().density, 20);
    }

    #[test]
    fn height_only_resize_never_rebuilds_the_field() {
        let (mut controller, _) = controller_with(desktop_mount());
        controller.resized(800.0, 900.0);
        controller.tick(ms(1000));
        assert_eq!(controller.generation(), 0);
        assert_eq!(controller.field().height, 600.0);
    }

    #[test]
    fn rebuild_detaches_old_particles_from_motion() {
        let (mut controller, _) = controller_with(desktop_mount());
        controller.resized(1300.0, 600.0);
        controller.tick(ms(300));
        assert_eq!(controller.generation(), 1);

        // All motion after the rebuild stays within the new particles' drift
        // bounds; nothing references the discarded field.
        for _ in 0..120 {
            controller.tick(ms(16));
        }
        for p in &controller.field().particles {
            assert!((p.position.x - p.origin.x).abs() <= 50.0 + 1e-9);
            assert!((p.position.y - p.origin.y).abs() <= 50.0 + 1e-9);
        }
    }

    #[test]
    fn zoom_change_reconfigures_surface_without_rebuilding() {
        let (mut controller, mut surface) = controller_with(desktop_mount());
        controller.zoom_changed(2.0);
        assert_eq!(controller.generation(), 0);
        controller.render(&mut surface);
        assert_eq!(
            surface.configured.last(),
            Some(&CanvasSettings::compute(800.0, 600.0, 2.0))
        );
        // Reapplying identical state is idempotent.
        assert_eq!(controller.canvas_settings(), controller.canvas_settings());
    }

    #[test]
    fn independent_controllers_do_not_share_state() {
        let (mut a, _) = controller_with(desktop_mount());
        let (b, _) = controller_with(desktop_mount());
        a.resized(1300.0, 600.0);
        a.tick(ms(300));
        assert_eq!(a.generation(), 1);
        assert_eq!(b.generation(), 0);
        assert_eq!(b.field().density, 20);
    }
}
