//! Hoverkit demo
//!
//! Flies a drone, chases it with a homing missile and parks a hover pad on
//! flat ground, all on the reference integrator. Pass a settings JSON path to
//! override the built-in tuning.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Hoverkit demo starting...");

    let settings = match std::env::args().nth(1) {
        Some(path) => hoverkit::Settings::load(path),
        None => demo::settings(),
    };
    demo::run(&settings, 6.0, 0x5eed);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // No demo on the web; the library is driven by the host engine
}

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use glam::{Vec2, Vec3};
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg32;

    use hoverkit::Settings;
    use hoverkit::audio::RotorAudio;
    use hoverkit::consts::MAX_SUBSTEPS;
    use hoverkit::sim::{
        ContactEvent, DroneConfig, DroneController, DroneInput, FlatGround, ForwardAxis,
        GuidanceConfig, GuidanceMode, GuidanceModel, GuidanceStep, HoverConfig, HoverFieldModel,
        HoverPoint, SimBody, TargetId, TimerConfig, TimerFunction, TimerText, UniversalTimer,
    };

    const DRONE_ID: TargetId = TargetId(1);
    const CRATE_MASS: f32 = 10.0;

    /// Built-in tuning
    pub fn settings() -> Settings {
        Settings {
            drone: DroneConfig {
                movement_speed: 12.0,
                acceleration: 2.0,
                deceleration: 1.5,
                rotation_amount: 2.0,
                rotation_speed: 0.3,
                tilt_amount: 15.0,
                tilt_speed: 0.2,
                ..Default::default()
            },
            hover: HoverConfig {
                hover_force: 200.0,
                hover_distance: 3.0,
                ..Default::default()
            },
            guidance: GuidanceConfig {
                mode: GuidanceMode::Homing,
                forward_axis: ForwardAxis::Z,
                turn_rate: 1.0,
                initial_velocity: 5.0,
                max_velocity: 30.0,
                acceleration_time: 0.02,
                tracking: true,
                ..Default::default()
            },
            timer: TimerConfig {
                function: TimerFunction::CountDown,
                allowed_time: 6,
                text: TimerText::MinutesSeconds,
            },
            ..Default::default()
        }
    }

    fn pad_points() -> Vec<HoverPoint> {
        [(-1.0, -1.0), (1.0, -1.0), (-1.0, 1.0), (1.0, 1.0)]
            .into_iter()
            .map(|(x, z)| HoverPoint::at(Vec3::new(x, 0.0, z)))
            .collect()
    }

    /// Scripted stick input with a little deterministic jitter
    fn drone_input(t: f32, rng: &mut Pcg32) -> DroneInput {
        let mut jitter = || rng.random_range(-0.05f32..0.05);
        let mut input = DroneInput::default();
        if t < 1.0 {
            input.elevation = 0.5;
        }
        if t < 3.0 {
            input.forward = 1.0 + jitter();
        } else {
            input.strafe = 1.0 + jitter();
            input.rotation = 0.5 + jitter();
        }
        input
    }

    struct Scene {
        ground: FlatGround,
        drone_body: SimBody,
        drone: DroneController,
        rotor: RotorAudio,
        missile_body: SimBody,
        missile: GuidanceModel,
        pad_body: SimBody,
        pad: HoverFieldModel,
        timer: UniversalTimer,
        ticks: u32,
    }

    impl Scene {
        fn new(settings: &Settings) -> Self {
            let mut missile_body = SimBody::new(0.5).at(Vec3::new(-20.0, 2.0, -20.0));
            let mut missile = GuidanceModel::new(settings.guidance);
            missile.attach(&mut missile_body);
            missile.set_tracked(Some(DRONE_ID));

            let mut pad_body = SimBody::new(50.0).at(Vec3::new(10.0, 1.5, 0.0));
            let mut pad = HoverFieldModel::new(settings.hover, pad_points());
            pad.attach(&mut pad_body);

            let mut timer = UniversalTimer::new(settings.timer);
            timer.toggle_pause();

            Self {
                ground: FlatGround::default(),
                drone_body: SimBody::new(1.5).at(Vec3::new(0.0, 5.0, 0.0)),
                drone: DroneController::new(settings.drone),
                rotor: RotorAudio::new(),
                missile_body,
                missile,
                pad_body,
                pad,
                timer,
                ticks: 0,
            }
        }

        fn tick(&mut self, input: &DroneInput, dt: f32) {
            let targets = [(DRONE_ID, self.drone_body.position)];
            let step = self
                .missile
                .advance_guidance(&mut self.missile_body, &targets[..], Vec2::ZERO, dt);
            if step == GuidanceStep::MissingTarget {
                log::warn!("Missile lost its target");
            }

            self.drone.tick(&mut self.drone_body, input, dt, &mut self.rotor);
            self.pad.advance_hover(&mut self.pad_body, &self.ground, dt);

            self.drone_body.step(dt);
            self.missile_body.step(dt);
            self.pad_body.step(dt);
            self.timer.advance(dt);
            self.ticks += 1;
        }

        fn log_status(&self) {
            log::info!(
                "[{}] drone pos {:.2} speed {:.2} yaw {:.1} pitch {:.2} | missile dist {:.2} speed {:.2} | pad height {:.2} mass {:.1}",
                self.timer.text(),
                self.drone_body.position,
                self.drone_body.velocity.length(),
                self.drone.yaw(),
                self.rotor.pitch(),
                self.missile_body.position.distance(self.drone_body.position),
                self.missile.current_speed(&self.missile_body),
                self.pad_body.position.y,
                self.pad.total_mass(),
            );
        }
    }

    /// Drive the scene with jittered frame times, stepping at the fixed rate
    pub fn run(settings: &Settings, seconds: f32, seed: u64) {
        let dt = settings.fixed_dt;
        let mut rng = Pcg32::seed_from_u64(seed);
        let mut scene = Scene::new(settings);

        let mut elapsed = 0.0;
        let mut accumulator = 0.0;
        let mut next_report = 0.0;
        let mut crate_resting = false;

        while elapsed < seconds {
            let frame = rng.random_range(1.0f32 / 90.0..1.0 / 30.0);
            elapsed += frame;
            accumulator += frame;

            // Crate sits on the pad between 2 s and 4 s
            let crate_due = (2.0..4.0).contains(&elapsed);
            if crate_due != crate_resting {
                let event = if crate_due {
                    ContactEvent::started(CRATE_MASS)
                } else {
                    ContactEvent::stopped(CRATE_MASS)
                };
                scene.pad.on_contact(event);
                crate_resting = crate_due;
            }

            let mut substeps = 0;
            while accumulator >= dt && substeps < MAX_SUBSTEPS {
                let input = drone_input(scene.ticks as f32 * dt, &mut rng);
                scene.tick(&input, dt);
                accumulator -= dt;
                substeps += 1;
            }
            if substeps == MAX_SUBSTEPS {
                accumulator = 0.0;
            }

            if elapsed >= next_report {
                scene.log_status();
                next_report += 1.0;
            }
        }

        if scene.timer.expired() {
            log::info!("Timer expired");
        }
        log::info!("Demo finished after {} ticks", scene.ticks);
    }
}
