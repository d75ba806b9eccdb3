use ferrocast_core::{IntervalWidth, Pipeline, PipelineConfig, DEFAULT_LOOKBACK_YEARS};
use time::{Date, OffsetDateTime};

/// Shared, read-only server state. Each request builds its own
/// [`PipelineConfig`] from these defaults.
#[derive(Clone)]
pub struct AppState {
    pipeline: Pipeline,
    lookback_years: u8,
    interval_width: IntervalWidth,
    fixed_date: Option<Date>,
}

impl AppState {
    pub fn new(pipeline: Pipeline) -> Self {
        Self {
            pipeline,
            lookback_years: DEFAULT_LOOKBACK_YEARS,
            interval_width: IntervalWidth::default(),
            fixed_date: None,
        }
    }

    pub fn with_lookback_years(mut self, years: u8) -> Self {
        self.lookback_years = years;
        self
    }

    pub fn with_interval_width(mut self, width: IntervalWidth) -> Self {
        self.interval_width = width;
        self
    }

    /// Pin "today" for reproducible runs.
    pub fn with_fixed_date(mut self, date: Date) -> Self {
        self.fixed_date = Some(date);
        self
    }

    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    pub fn today(&self) -> Date {
        self.fixed_date
            .unwrap_or_else(|| OffsetDateTime::now_utc().date())
    }

    /// Applies server-wide defaults to a per-request config.
    pub fn apply_defaults(&self, config: PipelineConfig) -> PipelineConfig {
        config
            .with_lookback_years(self.lookback_years)
            .with_interval_width(self.interval_width)
    }
}
