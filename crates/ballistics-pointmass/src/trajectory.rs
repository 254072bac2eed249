use serde::{Deserialize, Serialize};

/// One integrator sample, SI units.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrajectorySample {
    pub x: f64,
    pub y: f64,
    pub t: f64,
    pub vx: f64,
    pub vy: f64,
    pub speed: f64,
}

/// Why the integrator stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    /// The next state fell below the target elevation.
    Impact,
    /// Flight time reached the time cap.
    TimeLimit,
    /// Step count reached the step cap.
    StepLimit,
}

/// Ordered samples from launch (index 0, t = 0) to the last in-bounds state.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Trajectory {
    samples: Vec<TrajectorySample>,
    termination: Termination,
}

/// Result panel numbers derived from a trajectory.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrajectorySummary {
    /// Apex height [m]
    pub max_height: f64,
    /// Downrange position of the apex [m]
    pub max_height_range: f64,
    /// Downrange position of the final sample [m]
    pub distance: f64,
    pub time_of_flight: f64,
    pub impact_velocity: f64,
    /// Flight-path angle at the final sample, negative when descending [deg]
    pub impact_angle_deg: f64,
    /// ½ m v² at the final sample [J]
    pub impact_energy: f64,
}

impl Trajectory {
    pub(crate) fn new(samples: Vec<TrajectorySample>, termination: Termination) -> Self {
        Self { samples, termination }
    }

    pub fn samples(&self) -> &[TrajectorySample] { &self.samples }
    pub fn into_samples(self) -> Vec<TrajectorySample> { self.samples }
    pub fn termination(&self) -> Termination { self.termination }
    pub fn len(&self) -> usize { self.samples.len() }
    pub fn is_empty(&self) -> bool { self.samples.is_empty() }
    pub fn first(&self) -> Option<&TrajectorySample> { self.samples.first() }
    pub fn last(&self) -> Option<&TrajectorySample> { self.samples.last() }

    pub fn iter(&self) -> std::slice::Iter<'_, TrajectorySample> {
        self.samples.iter()
    }

    /// Highest sample (first one on ties).
    pub fn apex(&self) -> Option<&TrajectorySample> {
        self.samples
            .iter()
            .fold(None, |best: Option<&TrajectorySample>, s| match best {
                Some(b) if b.y >= s.y => Some(b),
                _ => Some(s),
            })
    }

    /// Summary with `impact_mass` [kg] used for the impact energy.
    pub fn summary(&self, impact_mass: f64) -> Option<TrajectorySummary> {
        let apex = self.apex()?;
        let last = self.last()?;
        Some(TrajectorySummary {
            max_height: apex.y,
            max_height_range: apex.x,
            distance: last.x,
            time_of_flight: last.t,
            impact_velocity: last.speed,
            impact_angle_deg: last.vy.atan2(last.vx).to_degrees(),
            impact_energy: 0.5 * impact_mass * last.speed * last.speed,
        })
    }
}

impl<'a> IntoIterator for &'a Trajectory {
    type Item = &'a TrajectorySample;
    type IntoIter = std::slice::Iter<'a, TrajectorySample>;

    fn into_iter(self) -> Self::IntoIter {
        self.samples.iter()
    }
}
