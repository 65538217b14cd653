use std::collections::BTreeMap;
use std::fmt;

/// Running summary of observed values.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct Summary {
    pub count: u64,
    pub total: f64,
    pub min: f64,
    pub max: f64,
}

impl Summary {
    pub fn observe(&mut self, value: f64) {
        if self.count == 0 {
            self.min = value;
            self.max = value;
        } else {
            self.min = self.min.min(value);
            self.max = self.max.max(value);
        }
        self.count += 1;
        self.total += value;
    }

    pub fn mean(&self) -> Option<f64> {
        (self.count > 0).then(|| self.total / self.count as f64)
    }
}

/// Named counters and summaries for engine diagnostics.
///
/// Keys are kept sorted so [`fmt::Display`] output is reproducible.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Metrics {
    counters: BTreeMap<&'static str, u64>,
    summaries: BTreeMap<&'static str, Summary>,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn incr(&mut self, name: &'static str) {
        self.add(name, 1);
    }

    pub fn add(&mut self, name: &'static str, by: u64) {
        *self.counters.entry(name).or_default() += by;
    }

    pub fn counter(&self, name: &str) -> u64 {
        self.counters.get(name).copied().unwrap_or(0)
    }

    pub fn observe(&mut self, name: &'static str, value: f64) {
        self.summaries.entry(name).or_default().observe(value);
    }

    pub fn summary(&self, name: &str) -> Option<Summary> {
        self.summaries.get(name).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.counters.is_empty() && self.summaries.is_empty()
    }
}

/// `name=value` pairs; summaries print as `name.count`, `name.mean` and `name.max`.
impl fmt::Display for Metrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut sep = "";
        for (name, value) in &self.counters {
            write!(f, "{sep}{name}={value}")?;
            sep = " ";
        }
        for (name, s) in &self.summaries {
            write!(
                f,
                "{sep}{name}.count={} {name}.mean={} {name}.max={}",
                s.count,
                s.mean().unwrap_or(0.0),
                s.max
            )?;
            sep = " ";
        }
        Ok(())
    }
}
