//! Shared result types used by the conversion tools and the output module.

use crate::imaging::compression_ratio;

/// Before/after byte counts for one converted file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileStats {
    pub original_bytes: u64,
    pub output_bytes: u64,
}

impl FileStats {
    /// Percentage size reduction, `None` for an empty source.
    pub fn ratio(&self) -> Option<f64> {
        compression_ratio(self.original_bytes, self.output_bytes)
    }
}

/// Aggregate counters for a batch conversion run.
///
/// Byte totals only include files that converted successfully.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversionReport {
    /// Files discovered and attempted.
    pub attempted: usize,
    pub succeeded: usize,
    pub original_bytes: u64,
    pub output_bytes: u64,
}

impl ConversionReport {
    pub fn new(attempted: usize) -> Self {
        Self {
            attempted,
            ..Self::default()
        }
    }

    pub fn record_success(&mut self, stats: FileStats) {
        self.succeeded += 1;
        self.original_bytes += stats.original_bytes;
        self.output_bytes += stats.output_bytes;
    }

    pub fn failed(&self) -> usize {
        self.attempted - self.succeeded
    }

    /// Overall ratio from summed totals, `None` when nothing succeeded.
    pub fn overall_ratio(&self) -> Option<f64> {
        compression_ratio(self.original_bytes, self.output_bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_accumulates_only_successes() {
        let mut report = ConversionReport::new(3);
        report.record_success(FileStats {
            original_bytes: 1000,
            output_bytes: 200,
        });
        report.record_success(FileStats {
            original_bytes: 3000,
            output_bytes: 800,
        });

        assert_eq!(report.succeeded, 2);
        assert_eq!(report.failed(), 1);
        assert_eq!(report.original_bytes, 4000);
        assert_eq!(report.output_bytes, 1000);
        assert_eq!(report.overall_ratio(), Some(75.0));
    }

    #[test]
    fn empty_report_has_no_ratio() {
        assert_eq!(ConversionReport::new(2).overall_ratio(), None);
    }

    #[test]
    fn file_stats_ratio() {
        let stats = FileStats {
            original_bytes: 400,
            output_bytes: 100,
        };
        assert_eq!(stats.ratio(), Some(75.0));
    }
}
