/// Ordered list of contour levels
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContourValues {
    values: Vec<f64>,
}

impl ContourValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_values(values: Vec<f64>) -> Self {
        Self { values }
    }

    /// `count` evenly spaced levels from `start` to `end`, both inclusive.
    /// A single level sits at `start`.
    pub fn generate(count: usize, start: f64, end: f64) -> Self {
        let increment = if count > 1 {
            (end - start) / (count - 1) as f64
        } else {
            0.0
        };

        Self {
            values: (0..count).map(|i| start + i as f64 * increment).collect(),
        }
    }

    /// Set level `index`, padding with zeros when the list is too short
    pub fn set_value(&mut self, index: usize, value: f64) {
        if index >= self.values.len() {
            self.values.resize(index + 1, 0.0);
        }
        self.values[index] = value;
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
