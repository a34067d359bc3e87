use std::time::{Duration, Instant};

use anyhow::{anyhow, Result};
use kick_core::{
    Angle, BallId, MatchConfig, MatchEvent, RemovalReason, TeamColor, Vector2,
};
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::{
    collision::{collide_walls, is_out_of_play},
    scoring::goal_scored,
    Controller, EntityRegistry, MatchObserver, Robot, Scoreboard, TickPacer,
};

/// A two-robot match: balls, robots, score, and the clock state.
///
/// The match is driven from outside, either with [`Match::tick`] by a real-time
/// loop (see `kick-executor`) or directly with [`Match::step`].
///
/// ## Usage
///
/// ```no_run
/// use kick_core::MatchConfig;
/// use kick_simulator::{LogObserver, MatchBuilder, SimpleAi};
///
/// let mut game = MatchBuilder::new(MatchConfig::default())
///     .with_observer(LogObserver::new())
///     .with_controller(SimpleAi::new("yellow"))
///     .build()
///     .unwrap();
///
/// game.start();
/// while game.is_running() {
///     game.step(1.0 / 60.0);
/// }
/// ```
pub struct Match {
    config: MatchConfig,
    world: EntityRegistry,
    scoreboard: Scoreboard,
    observers: Vec<Box<dyn MatchObserver>>,
    controllers: Vec<Box<dyn Controller>>,
    pacer: TickPacer,
    duration: f64,
    running: bool,
    paused: bool,
    finished: bool,
}

/// Sets up a [`Match`] with observers and controllers attached before the first
/// entity is spawned, so observers see every `BallAdded` and `RobotAdded`.
pub struct MatchBuilder {
    config: MatchConfig,
    observers: Vec<Box<dyn MatchObserver>>,
    controllers: Vec<Box<dyn Controller>>,
}

impl MatchBuilder {
    pub fn new(config: MatchConfig) -> Self {
        Self {
            config,
            observers: Vec::new(),
            controllers: Vec::new(),
        }
    }

    pub fn with_observer(mut self, observer: impl MatchObserver + 'static) -> Self {
        self.observers.push(Box::new(observer));
        self
    }

    pub fn with_controller(mut self, controller: impl Controller + 'static) -> Self {
        self.controllers.push(Box::new(controller));
        self
    }

    /// Validate the configuration and spawn the initial balls and robots.
    pub fn build(self) -> Result<Match> {
        self.config.validate()?;

        let mut game = Match {
            world: EntityRegistry::new(self.config.field.clone()),
            pacer: TickPacer::new(self.config.simulation.target_framerate),
            config: self.config,
            scoreboard: Scoreboard::new(),
            observers: self.observers,
            controllers: self.controllers,
            duration: 0.0,
            running: false,
            paused: false,
            finished: false,
        };
        game.init();
        Ok(game)
    }
}

impl Match {
    /// Create a match without observers or controllers.
    pub fn new(config: MatchConfig) -> Result<Self> {
        MatchBuilder::new(config).build()
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    pub fn world(&self) -> &EntityRegistry {
        &self.world
    }

    /// Mutable access to the entities, eg. to command robots by hand.
    pub fn world_mut(&mut self) -> &mut EntityRegistry {
        &mut self.world
    }

    pub fn scoreboard(&self) -> &Scoreboard {
        &self.scoreboard
    }

    pub fn score(&self, color: TeamColor) -> u32 {
        self.scoreboard.score(color)
    }

    pub fn remaining_ball_count(&self) -> u32 {
        self.scoreboard.remaining()
    }

    /// Simulated time since the match started, in seconds.
    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn pacer(&self) -> &TickPacer {
        &self.pacer
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Whether the game-over condition was reached. A finished match only
    /// continues after [`Match::restart`].
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn add_observer(&mut self, observer: Box<dyn MatchObserver>) {
        self.observers.push(observer);
    }

    pub fn add_controller(&mut self, controller: Box<dyn Controller>) {
        self.controllers.push(controller);
    }

    /// Put a new ball into play.
    pub fn add_ball(&mut self, position: Vector2, velocity: Vector2) -> BallId {
        let id = self
            .world
            .add_ball(position, velocity, self.config.ball.radius);
        self.scoreboard.record_added();
        if let Some(ball) = self.world.ball(id) {
            let event = MatchEvent::BallAdded(ball.data());
            self.emit(&event);
        }
        id
    }

    /// Register a robot under `name`, replacing any robot with that name.
    pub fn add_robot(&mut self, name: impl Into<String>, robot: Robot) {
        let name = name.into();
        let event = MatchEvent::RobotAdded {
            name: name.clone(),
            robot: robot.data(),
        };
        self.world.add_robot(name, robot);
        self.emit(&event);
    }

    /// Move a robot to a new pose, reseeding its localizer there.
    pub fn teleport_robot(&mut self, name: &str, position: Vector2, orientation: Angle) -> Result<()> {
        let robot = self
            .world
            .robot_mut(name)
            .ok_or_else(|| anyhow!("No robot named {}", name))?;
        robot.teleport(position, orientation);
        Ok(())
    }

    /// Start the clock. The first tick after starting advances by one target
    /// interval, however long the match was stopped.
    pub fn start(&mut self) {
        if self.finished {
            log::warn!("Match is over, restart it to play again");
            return;
        }
        if !self.running {
            log::info!("Match started");
            self.pacer.pause();
            self.running = true;
        }
    }

    /// Stop the clock. Stopping a stopped match does nothing.
    pub fn stop(&mut self) {
        if self.running {
            log::info!("Match stopped after {:.2}s", self.duration);
            self.running = false;
        }
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    /// Stop, reset scores, entities, duration and pacing, then spawn a fresh
    /// field and start again. Observers get [`MatchEvent::Restarted`] before any
    /// of the new entities.
    pub fn restart(&mut self) {
        self.stop();

        self.world.clear();
        self.scoreboard.reset();
        self.duration = 0.0;
        self.pacer.reset();
        self.finished = false;
        self.emit(&MatchEvent::Restarted);
        for controller in &mut self.controllers {
            controller.reset();
        }

        self.init();
        self.start();
    }

    /// Run one real-time tick at wall time `now`. The time step is the wall time
    /// since the previous tick.
    ///
    /// Returns the delay before the next tick, or `None` once the match is no
    /// longer running. While paused no time passes and nothing moves, but the
    /// caller keeps ticking at the same cadence.
    pub fn tick(&mut self, now: Instant) -> Option<Duration> {
        if !self.running {
            return None;
        }

        if self.paused {
            self.pacer.pause();
        } else {
            let dt = self.pacer.elapsed(now);
            self.step(dt);
            self.pacer.record(dt, now);
        }

        self.running.then(|| self.pacer.next_delay())
    }

    /// Advance the simulation by `dt` seconds: balls, then robots, then
    /// controllers.
    ///
    /// The tick ends right after the ball pass if that pass decided the match.
    pub fn step(&mut self, dt: f64) {
        if self.finished {
            return;
        }

        self.duration += dt;
        self.step_balls(dt);
        if self.scoreboard.is_decided() {
            self.finish();
            return;
        }
        self.step_robots(dt);
        self.step_controllers(dt);
    }

    fn init(&mut self) {
        let mut rng = match self.config.game.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let field = self.config.field.clone();
        let r = self.config.ball.radius;

        for _ in 0..self.config.game.balls / 2 {
            let x = rng.gen_range(r..=(field.width / 2.0 - r).max(r));
            let y = rng.gen_range(r..=(field.height - r).max(r));
            self.add_ball(Vector2::new(x, y), Vector2::zeros());
            self.add_ball(
                Vector2::new(field.width - x, field.height - y),
                Vector2::zeros(),
            );
        }
        self.add_ball(field.center(), Vector2::zeros());

        for side in [TeamColor::Yellow, TeamColor::Blue] {
            let robot = Robot::new(side, self.config.robot(side), &field);
            self.add_robot(side.as_str(), robot);
        }

        log::debug!(
            "Match initialized with {} balls",
            self.world.ball_count()
        );
    }

    /// One pass over all balls, then a second pass applying the queued removals
    /// by id.
    fn step_balls(&mut self, dt: f64) {
        let field = &self.config.field;
        let game = &self.config.game;
        let mut removals: Vec<(BallId, RemovalReason)> = Vec::new();

        for id in self.world.ball_ids() {
            let Some(ball) = self.world.ball(id) else {
                continue;
            };

            let circle = ball.circle();
            let mut collisions = Vec::new();
            for (_, robot) in self.world.robots() {
                if circle.overlaps(&robot.circle()) {
                    collisions.push(circle.center);
                }
            }
            // Each overlapping pair is seen from both sides
            for other in self.world.balls() {
                if other.id() != id && circle.overlaps(&other.circle()) {
                    collisions.push(circle.center);
                }
            }
            let scored_for = goal_scored(ball, field);

            let Some(ball) = self.world.ball_mut(id) else {
                continue;
            };
            match scored_for {
                Some(scored_for) => removals.push((id, RemovalReason::Goal { scored_for })),
                None => {
                    ball.step(dt, self.config.ball.damping);
                    if game.use_walls && collide_walls(ball, field) {
                        collisions.push(ball.position);
                    }
                    if is_out_of_play(ball, field, game.ball_remove_threshold) {
                        removals.push((id, RemovalReason::OutOfPlay));
                    }
                }
            }
            let event = MatchEvent::BallUpdated(ball.data());

            for position in collisions {
                for observer in &mut self.observers {
                    observer.on_collision(position);
                }
            }
            for observer in &mut self.observers {
                observer.on_event(&event);
            }
        }

        for (id, reason) in removals {
            let Some(ball) = self.world.remove_ball(id) else {
                continue;
            };
            match reason {
                RemovalReason::Goal { scored_for } => {
                    let (yellow, blue) = self.scoreboard.award(scored_for);
                    log::info!("Goal for {}: yellow {} - {} blue", scored_for, yellow, blue);
                    self.emit(&MatchEvent::ScoreChanged { yellow, blue });
                }
                RemovalReason::OutOfPlay => {
                    self.scoreboard.record_lost();
                    log::debug!(
                        "Ball {} out of play, {} remaining",
                        id,
                        self.scoreboard.remaining()
                    );
                }
            }
            self.emit(&MatchEvent::BallRemoved {
                ball: ball.data(),
                reason,
            });
        }
    }

    fn step_robots(&mut self, dt: f64) {
        for name in self.world.robot_names() {
            let Some(robot) = self.world.robot_mut(&name) else {
                continue;
            };
            robot.step(dt);
            let kick = robot.take_kick().then(|| {
                (
                    robot.circle(),
                    robot.orientation().unit() * robot.config().kick_speed,
                )
            });
            let data = robot.data();

            if let Some((area, velocity)) = kick {
                let kicked = self.world.kick_balls(&area, velocity);
                log::trace!("{} kicked {} balls", name, kicked);
            }
            self.emit(&MatchEvent::RobotUpdated { name, robot: data });
        }
    }

    fn step_controllers(&mut self, dt: f64) {
        for controller in &mut self.controllers {
            controller.step(dt, &mut self.world);
        }
    }

    fn finish(&mut self) {
        self.stop();
        self.finished = true;

        let (yellow, blue) = (self.scoreboard.yellow(), self.scoreboard.blue());
        log::info!(
            "Game over after {:.2}s: yellow {} - {} blue",
            self.duration,
            yellow,
            blue
        );
        self.emit(&MatchEvent::GameOver {
            yellow,
            blue,
            duration: self.duration,
        });
    }

    fn emit(&mut self, event: &MatchEvent) {
        for observer in &mut self.observers {
            observer.on_event(event);
        }
    }
}
