/// How often a sensor reports the same body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SensorPolicy {
    /// A pair is reported at most once per `advance`.
    #[default]
    OncePerAdvance,
    /// A pair is reported once and then stays silent until the sensor is
    /// cleared or either entity is removed.
    Latched,
}

#[derive(Debug, Clone)]
pub struct WorldConfig {
    pub tree: quadtree::Config,
    pub sensor_policy: SensorPolicy,
    /// Events handled by one `advance` before the rest of the frame is
    /// simulated without collisions.
    pub max_events_per_advance: usize,
}

impl Default for WorldConfig {
    fn default() -> Self {
        WorldConfig {
            tree: quadtree::Config::default(),
            sensor_policy: SensorPolicy::default(),
            max_events_per_advance: 100_000,
        }
    }
}
