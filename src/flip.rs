use std::time::{Duration, Instant};

/// Default duration of the hide phase (outgoing face turns edge-on).
pub const HIDE_DURATION: Duration = Duration::from_millis(120);
/// Default duration of the show phase (incoming face turns back to the viewer).
pub const SHOW_DURATION: Duration = Duration::from_millis(320);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Face {
    Front,
    Back,
}

impl Face {
    pub fn other(self) -> Self {
        match self {
            Face::Front => Face::Back,
            Face::Back => Face::Front,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Hiding,
    Showing,
}

/// Where a flip sequence currently is. `since` is the instant the current
/// phase was scheduled to begin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlipState {
    Front,
    TransitioningToBack { phase: Phase, since: Instant },
    Back,
    TransitioningToFront { phase: Phase, since: Instant },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlipTiming {
    pub hide: Duration,
    pub show: Duration,
}

impl Default for FlipTiming {
    fn default() -> Self {
        Self {
            hide: HIDE_DURATION,
            show: SHOW_DURATION,
        }
    }
}

impl FlipTiming {
    /// Build a timing from millisecond values as stored in the config file.
    /// Negative or non-finite values collapse to zero; values above
    /// [`MAX_PHASE_DURATION`] are clamped to it.
    pub fn from_millis(hide_ms: f64, show_ms: f64) -> Self {
        Self {
            hide: phase_duration(hide_ms),
            show: phase_duration(show_ms),
        }
    }

    fn clamped(self) -> Self {
        Self {
            hide: self.hide.min(MAX_PHASE_DURATION),
            show: self.show.min(MAX_PHASE_DURATION),
        }
    }
}

/// Longest accepted duration for a single flip phase.
pub const MAX_PHASE_DURATION: Duration = Duration::from_secs(5);

fn phase_duration(ms: f64) -> Duration {
    if !ms.is_finite() || ms <= 0.0 {
        return Duration::ZERO;
    }
    match Duration::try_from_secs_f64(ms / 1000.0) {
        Ok(d) if d <= MAX_PHASE_DURATION => d,
        _ => {
            log::warn!(
                "Flip phase of {} ms is too long, using {} ms",
                ms,
                MAX_PHASE_DURATION.as_millis()
            );
            MAX_PHASE_DURATION
        }
    }
}

/// Two-phase flip between a front and a back face.
///
/// A transition first hides the outgoing face, then shows the incoming one.
/// The phase change is a deadline polled by [`FlipController::tick`], so the
/// controller never owns a timer and can be driven by any clock.
pub struct FlipController {
    state: FlipState,
    timing: FlipTiming,
    pending: Option<Face>,
}

impl Default for FlipController {
    fn default() -> Self {
        Self::new()
    }
}

impl FlipController {
    pub fn new() -> Self {
        Self::with_timing(FlipTiming::default())
    }

    pub fn with_timing(timing: FlipTiming) -> Self {
        Self {
            state: FlipState::Front,
            timing: timing.clamped(),
            pending: None,
        }
    }

    pub fn state(&self) -> FlipState {
        self.state
    }

    pub fn timing(&self) -> FlipTiming {
        self.timing
    }

    /// Settled face, or `None` while a transition is in flight.
    pub fn face(&self) -> Option<Face> {
        match self.state {
            FlipState::Front => Some(Face::Front),
            FlipState::Back => Some(Face::Back),
            _ => None,
        }
    }

    pub fn front_visible(&self) -> bool {
        self.state == FlipState::Front
    }

    pub fn back_visible(&self) -> bool {
        self.state == FlipState::Back
    }

    pub fn is_animating(&self) -> bool {
        self.face().is_none()
    }

    /// Start a flip toward the opposite face.
    ///
    /// Returns `false` and leaves the schedule untouched if a transition is
    /// already in flight.
    pub fn trigger(&mut self, now: Instant) -> bool {
        self.tick(now);
        let Some(face) = self.face() else {
            log::debug!("Ignoring flip trigger while a transition is in flight");
            return false;
        };
        self.pending = None;
        self.start(face.other(), now);
        true
    }

    /// Ask for `face` to end up showing. While a transition is in flight the
    /// request is coalesced with earlier ones and applied once it settles.
    pub fn request(&mut self, face: Face, now: Instant) {
        self.tick(now);
        match self.face() {
            Some(current) => {
                if current != face {
                    self.start(face, now);
                }
            }
            None => {
                self.pending = if self.heading_to() == Some(face) {
                    None
                } else {
                    Some(face)
                };
            }
        }
    }

    /// Advance any phases whose deadline has passed. Returns true if still animating.
    pub fn tick(&mut self, now: Instant) -> bool {
        while let Some(deadline) = self.next_deadline() {
            if now < deadline {
                break;
            }
            self.state = match self.state {
                FlipState::TransitioningToBack {
                    phase: Phase::Hiding,
                    ..
                } => FlipState::TransitioningToBack {
                    phase: Phase::Showing,
                    since: deadline,
                },
                FlipState::TransitioningToFront {
                    phase: Phase::Hiding,
                    ..
                } => FlipState::TransitioningToFront {
                    phase: Phase::Showing,
                    since: deadline,
                },
                FlipState::TransitioningToBack { .. } => FlipState::Back,
                FlipState::TransitioningToFront { .. } => FlipState::Front,
                settled => settled,
            };

            if let Some(face) = self.face() {
                if let Some(target) = self.pending.take() {
                    if target != face {
                        self.start(target, deadline);
                    }
                }
            }
        }
        self.is_animating()
    }

    /// Instant at which the current phase ends, if a transition is in flight.
    pub fn next_deadline(&self) -> Option<Instant> {
        match self.state {
            FlipState::TransitioningToBack { phase, since }
            | FlipState::TransitioningToFront { phase, since } => {
                let duration = match phase {
                    Phase::Hiding => self.timing.hide,
                    Phase::Showing => self.timing.show,
                };
                // An unrepresentable deadline ends the phase right away.
                Some(since.checked_add(duration).unwrap_or(since))
            }
            _ => None,
        }
    }

    /// Rotation of the front face at `now`: 0 faces the viewer, 1 is edge-on.
    pub fn front_turn(&self, now: Instant) -> f32 {
        self.turn_of(Face::Front, now)
    }

    /// Rotation of the back face at `now`: 0 faces the viewer, 1 is edge-on.
    pub fn back_turn(&self, now: Instant) -> f32 {
        self.turn_of(Face::Back, now)
    }

    /// Face currently turned toward the viewer, fully or partly.
    pub fn drawn_face(&self) -> Face {
        match self.state {
            FlipState::Front => Face::Front,
            FlipState::Back => Face::Back,
            FlipState::TransitioningToBack { phase, .. } => match phase {
                Phase::Hiding => Face::Front,
                Phase::Showing => Face::Back,
            },
            FlipState::TransitioningToFront { phase, .. } => match phase {
                Phase::Hiding => Face::Back,
                Phase::Showing => Face::Front,
            },
        }
    }

    fn heading_to(&self) -> Option<Face> {
        match self.state {
            FlipState::TransitioningToBack { .. } => Some(Face::Back),
            FlipState::TransitioningToFront { .. } => Some(Face::Front),
            _ => None,
        }
    }

    fn start(&mut self, target: Face, at: Instant) {
        self.state = match target {
            Face::Back => FlipState::TransitioningToBack {
                phase: Phase::Hiding,
                since: at,
            },
            Face::Front => FlipState::TransitioningToFront {
                phase: Phase::Hiding,
                since: at,
            },
        };
    }

    fn turn_of(&self, face: Face, now: Instant) -> f32 {
        let (target, phase, since) = match self.state {
            FlipState::Front => return if face == Face::Front { 0.0 } else { 1.0 },
            FlipState::Back => return if face == Face::Back { 0.0 } else { 1.0 },
            FlipState::TransitioningToBack { phase, since } => (Face::Back, phase, since),
            FlipState::TransitioningToFront { phase, since } => (Face::Front, phase, since),
        };

        match phase {
            Phase::Hiding => {
                if face == target {
                    1.0
                } else {
                    ease_in(progress(since, self.timing.hide, now))
                }
            }
            Phase::Showing => {
                if face == target {
                    1.0 - ease_out(progress(since, self.timing.show, now))
                } else {
                    1.0
                }
            }
        }
    }
}

fn progress(since: Instant, duration: Duration, now: Instant) -> f32 {
    if duration.is_zero() {
        return 1.0;
    }
    let elapsed = now.saturating_duration_since(since).as_secs_f32();
    (elapsed / duration.as_secs_f32()).min(1.0)
}

fn ease_in(t: f32) -> f32 {
    t * t * t
}

fn ease_out(t: f32) -> f32 {
    1.0 - (1.0 - t).powi(3)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_initial_state_is_front() {
        let flip = FlipController::new();
        assert_eq!(flip.state(), FlipState::Front);
        assert!(flip.front_visible());
        assert!(!flip.back_visible());
        assert!(!flip.is_animating());
        assert_eq!(flip.next_deadline(), None);
    }

    #[test]
    fn test_trigger_from_front_reaches_back() {
        let t0 = Instant::now();
        let mut flip = FlipController::new();
        assert!(flip.trigger(t0));

        flip.tick(t0 + ms(50));
        assert!(!flip.front_visible());
        assert!(!flip.back_visible());
        assert_eq!(flip.drawn_face(), Face::Front);

        flip.tick(t0 + ms(119));
        assert!(!flip.front_visible());
        assert!(!flip.back_visible());

        flip.tick(t0 + ms(120));
        assert!(!flip.front_visible());
        assert!(!flip.back_visible());
        assert_eq!(
            flip.state(),
            FlipState::TransitioningToBack {
                phase: Phase::Showing,
                since: t0 + ms(120),
            }
        );

        assert!(!flip.tick(t0 + ms(450)));
        assert!(flip.back_visible());
        assert!(!flip.front_visible());
        assert_eq!(flip.face(), Some(Face::Back));
    }

    #[test]
    fn test_never_both_faces_visible() {
        let t0 = Instant::now();
        let mut flip = FlipController::new();
        flip.trigger(t0);
        let mut saw_gap = false;
        for step in 0..=100 {
            flip.tick(t0 + ms(step * 5));
            assert!(!(flip.front_visible() && flip.back_visible()));
            if !flip.front_visible() && !flip.back_visible() {
                saw_gap = true;
            }
        }
        assert!(saw_gap);
        assert!(flip.back_visible());
    }

    #[test]
    fn test_trigger_from_back_mirrors() {
        let t0 = Instant::now();
        let mut flip = FlipController::new();
        flip.trigger(t0);
        flip.tick(t0 + ms(500));
        assert_eq!(flip.state(), FlipState::Back);

        let t1 = t0 + ms(1000);
        assert!(flip.trigger(t1));
        assert_eq!(
            flip.state(),
            FlipState::TransitioningToFront {
                phase: Phase::Hiding,
                since: t1,
            }
        );
        assert_eq!(flip.drawn_face(), Face::Back);

        flip.tick(t1 + ms(200));
        assert!(!flip.front_visible());
        assert!(!flip.back_visible());
        assert_eq!(flip.drawn_face(), Face::Front);

        flip.tick(t1 + ms(441));
        assert_eq!(flip.state(), FlipState::Front);
    }

    #[test]
    fn test_two_triggers_return_to_original_face() {
        let t0 = Instant::now();
        let mut flip = FlipController::new();
        flip.trigger(t0);
        let t1 = t0 + ms(600);
        flip.trigger(t1);
        flip.tick(t1 + ms(600));
        assert_eq!(flip.face(), Some(Face::Front));
    }

    #[test]
    fn test_trigger_ignored_while_transitioning() {
        let t0 = Instant::now();
        let mut flip = FlipController::new();
        flip.trigger(t0);
        let before = flip.state();
        let deadline = flip.next_deadline();

        assert!(!flip.trigger(t0 + ms(60)));
        assert_eq!(flip.state(), before);
        assert_eq!(flip.next_deadline(), deadline);

        // Still in the show phase; a second trigger is also ignored.
        assert!(!flip.trigger(t0 + ms(300)));
        flip.tick(t0 + ms(440));
        assert_eq!(flip.face(), Some(Face::Back));
    }

    #[test]
    fn test_trigger_after_deadline_without_tick() {
        let t0 = Instant::now();
        let mut flip = FlipController::new();
        flip.trigger(t0);
        // No frame ran in between; the late trigger settles first, then flips back.
        assert!(flip.trigger(t0 + ms(1000)));
        assert!(matches!(
            flip.state(),
            FlipState::TransitioningToFront { .. }
        ));
    }

    #[test]
    fn test_request_coalesces_to_last_face() {
        let t0 = Instant::now();
        let mut flip = FlipController::new();
        flip.request(Face::Back, t0);
        flip.request(Face::Front, t0 + ms(10));
        flip.request(Face::Back, t0 + ms(20));
        flip.request(Face::Front, t0 + ms(30));

        flip.tick(t0 + ms(440));
        // First transition settled on Back, pending Front starts at its deadline.
        assert!(matches!(
            flip.state(),
            FlipState::TransitioningToFront {
                phase: Phase::Hiding,
                ..
            }
        ));
        flip.tick(t0 + ms(880));
        assert_eq!(flip.face(), Some(Face::Front));
    }

    #[test]
    fn test_request_matching_target_clears_pending() {
        let t0 = Instant::now();
        let mut flip = FlipController::new();
        flip.request(Face::Back, t0);
        flip.request(Face::Front, t0 + ms(10));
        flip.request(Face::Back, t0 + ms(20));
        assert!(!flip.tick(t0 + ms(440)));
        assert_eq!(flip.face(), Some(Face::Back));
    }

    #[test]
    fn test_request_current_face_is_noop() {
        let t0 = Instant::now();
        let mut flip = FlipController::new();
        flip.request(Face::Front, t0);
        assert_eq!(flip.state(), FlipState::Front);
    }

    #[test]
    fn test_turn_fractions() {
        let t0 = Instant::now();
        let mut flip = FlipController::new();
        assert_eq!(flip.front_turn(t0), 0.0);
        assert_eq!(flip.back_turn(t0), 1.0);

        flip.trigger(t0);
        let mid_hide = flip.front_turn(t0 + ms(60));
        assert!(mid_hide > 0.0 && mid_hide < 1.0);
        assert_eq!(flip.back_turn(t0 + ms(60)), 1.0);

        flip.tick(t0 + ms(120));
        assert_eq!(flip.front_turn(t0 + ms(120)), 1.0);
        assert_eq!(flip.back_turn(t0 + ms(120)), 1.0);
        let mid_show = flip.back_turn(t0 + ms(280));
        assert!(mid_show > 0.0 && mid_show < 1.0);
    }

    #[test]
    fn test_zero_timing_flips_on_next_tick() {
        let t0 = Instant::now();
        let mut flip = FlipController::with_timing(FlipTiming::from_millis(0.0, -5.0));
        flip.trigger(t0);
        assert!(!flip.tick(t0));
        assert_eq!(flip.face(), Some(Face::Back));
    }

    #[test]
    fn test_huge_timing_is_clamped() {
        let timing = FlipTiming::from_millis(1e300, 1.5e22);
        assert_eq!(timing.hide, MAX_PHASE_DURATION);
        assert_eq!(timing.show, MAX_PHASE_DURATION);
        assert_eq!(FlipTiming::from_millis(f64::MAX, 320.0).hide, MAX_PHASE_DURATION);
    }

    #[test]
    fn test_huge_timing_flips_without_overflow() {
        let t0 = Instant::now();
        let timing = FlipTiming {
            hide: Duration::MAX,
            show: Duration::MAX,
        };
        let mut flip = FlipController::with_timing(timing);
        assert_eq!(flip.timing().hide, MAX_PHASE_DURATION);

        assert!(flip.trigger(t0));
        assert_eq!(flip.next_deadline(), Some(t0 + MAX_PHASE_DURATION));
        assert!(flip.tick(t0 + Duration::from_secs(6)));
        assert!(!flip.tick(t0 + Duration::from_secs(11)));
        assert_eq!(flip.face(), Some(Face::Back));

        let mut flip = FlipController::with_timing(FlipTiming::from_millis(1.5e22, 320.0));
        flip.trigger(t0);
        assert_eq!(flip.next_deadline(), Some(t0 + MAX_PHASE_DURATION));
    }

    #[test]
    fn test_timing_from_millis() {
        let timing = FlipTiming::from_millis(120.0, 320.0);
        assert_eq!(timing, FlipTiming::default());
        assert_eq!(FlipTiming::from_millis(f64::NAN, 1.0).hide, Duration::ZERO);
    }
}
