use std::time::Duration;

/// Accumulates durations per stage. Index 0 is preprocessing, 1 inference,
/// 2 output extraction.
#[derive(Debug, Default)]
pub struct TimeCalc {
    runs: usize,
    duration: Vec<Duration>,
}

impl TimeCalc {
    pub fn total(&self) -> Duration {
        self.duration.iter().sum::<Duration>()
    }

    /// Average wall time of one complete run across all stages.
    pub fn avg(&self) -> Option<Duration> {
        if self.runs == 0 {
            return None;
        }
        Some(self.total() / self.runs as u32)
    }

    pub fn avg_i(&self, i: usize) -> Option<Duration> {
        if self.runs == 0 {
            return None;
        }
        self.duration.get(i).map(|d| *d / self.runs as u32)
    }

    pub fn add_or_push(&mut self, i: usize, x: Duration) {
        match self.duration.get_mut(i) {
            Some(elem) => *elem += x,
            None => {
                self.duration.resize(i, Duration::ZERO);
                self.duration.push(x)
            }
        }
    }

    /// Marks the end of one run.
    pub fn finish_run(&mut self) {
        self.runs += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn averages_over_finished_runs() {
        let mut calc = TimeCalc::default();
        assert_eq!(calc.avg(), None);

        for _ in 0..2 {
            calc.add_or_push(0, Duration::from_millis(2));
            calc.add_or_push(1, Duration::from_millis(8));
            calc.finish_run();
        }

        assert_eq!(calc.avg(), Some(Duration::from_millis(10)));
        assert_eq!(calc.avg_i(1), Some(Duration::from_millis(8)));
        assert_eq!(calc.avg_i(5), None);
    }
}
