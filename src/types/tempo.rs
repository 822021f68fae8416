/// 120 BPM, the tempo every canonical sequence is expressed against.
pub const DEFAULT_TEMPO: u32 = 500_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TempoEntry {
    pub micros_per_quarter: u32,
    pub tick: u64,
}

/// Tempo changes ordered strictly by tick, with no two neighbours sharing a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TempoTable {
    entries: Vec<TempoEntry>,
}

impl Default for TempoTable {
    /// The implicit table used when a file carries no tempo events.
    fn default() -> Self {
        Self {
            entries: vec![TempoEntry {
                micros_per_quarter: DEFAULT_TEMPO,
                tick: 0,
            }],
        }
    }
}

impl TempoTable {
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn constant(micros_per_quarter: u32) -> Self {
        Self {
            entries: vec![TempoEntry {
                micros_per_quarter,
                tick: 0,
            }],
        }
    }

    pub fn entries(&self) -> &[TempoEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&TempoEntry> {
        self.entries.get(index)
    }

    /// Appends a tempo change, collapsing runs of equal values.
    ///
    /// A change at the same tick as the last entry replaces it, so ticks stay
    /// strictly ascending. Ticks must be pushed in non-decreasing order.
    pub fn push(&mut self, micros_per_quarter: u32, tick: u64) {
        if let Some(last) = self.entries.last() {
            if last.tick == tick {
                self.entries.pop();
            }
        }
        match self.entries.last() {
            Some(last) if last.micros_per_quarter == micros_per_quarter => {}
            _ => self.entries.push(TempoEntry {
                micros_per_quarter,
                tick,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_120_bpm() {
        let table = TempoTable::default();
        assert_eq!(
            table.entries(),
            &[TempoEntry {
                micros_per_quarter: 500_000,
                tick: 0
            }]
        );
    }

    #[test]
    fn test_push_collapses_runs() {
        let mut table = TempoTable::empty();
        table.push(500_000, 0);
        table.push(500_000, 100);
        table.push(600_000, 200);
        table.push(600_000, 300);
        table.push(500_000, 400);
        let ticks: Vec<u64> = table.entries().iter().map(|e| e.tick).collect();
        assert_eq!(ticks, vec![0, 200, 400]);
    }

    #[test]
    fn test_push_same_tick_replaces() {
        let mut table = TempoTable::empty();
        table.push(500_000, 0);
        table.push(600_000, 10);
        table.push(700_000, 10);
        assert_eq!(table.len(), 2);
        assert_eq!(table.get(1).map(|e| e.micros_per_quarter), Some(700_000));

        // replacing with the previous value folds the run back together
        table.push(500_000, 10);
        assert_eq!(table.len(), 1);
    }
}
