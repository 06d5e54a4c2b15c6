#[derive(Debug, Clone)]
pub struct Config {
    pub center_x: f64,
    pub center_y: f64,
    pub half_length: f64,
    pub leaf_capacity: usize,
    /// Leaves whose children would be smaller than this never split.
    pub min_half_length: f64,
    pub pool_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            center_x: 0.0,
            center_y: 0.0,
            half_length: 512.0,
            leaf_capacity: 8,
            min_half_length: 1.0,
            pool_size: 256,
        }
    }
}
