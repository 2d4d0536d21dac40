//! One pipeline shape for every chart: load rows, aggregate, derive scales,
//! hand both to a renderer.
//!
//! A [`Chart`] moves through three phases:
//!
//! | Phase      | Reached by                         |
//! |------------|------------------------------------|
//! | `Empty`    | construction                       |
//! | `Loaded`   | a successful [`Chart::load`]       |
//! | `Rendered` | a successful [`Chart::render`]     |
//!
//! A failed load leaves the current phase and data untouched. There is no
//! way back to `Empty`; build a new chart instead.

use crate::aggregate::{cap_sample, sum_by_category, sum_by_category_and_year};
use crate::config::ChartConfig;
use crate::error::{ChartError, LoadError, Result};
use crate::loader::Loader;
use crate::records::{
    CategoryYear, PointRecord, PointSample, ProfitRecord, QuantityRecord, SalesRow, Summary,
};
use crate::render::{Frame, Renderer};
use crate::scale::colour::TABLEAU10;
use crate::scale::linear::DEFAULT_TICK_COUNT;
use crate::scale::{
    BandScale, Interpolator, LegendStop, LinearScale, OrdinalScale, ScaleError,
    SequentialColorScale,
};
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info};

const BAR_PADDING: f64 = 0.1;
const HEATMAP_PADDING: f64 = 0.05;
const LEGEND_STOPS: usize = 5;

/// Which chart a pipeline produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    /// Total profit per category.
    Bar,
    /// Sales against profit, coloured by discount.
    Scatter,
    /// Quantity per category and order year.
    Heatmap,
}

impl ChartKind {
    pub const ALL: [ChartKind; 3] = [ChartKind::Bar, ChartKind::Scatter, ChartKind::Heatmap];

    pub fn name(&self) -> &'static str {
        match self {
            ChartKind::Bar => "bar",
            ChartKind::Scatter => "scatter",
            ChartKind::Heatmap => "heatmap",
        }
    }

    /// Extracts this chart's records from `rows` and reduces them.
    pub fn aggregate(&self, rows: &[SalesRow], config: &ChartConfig) -> Result<ChartData> {
        let data = match self {
            ChartKind::Bar => ChartData::Bar(sum_by_category(&typed::<ProfitRecord>(rows)?)),
            ChartKind::Scatter => {
                ChartData::Scatter(cap_sample(typed::<PointRecord>(rows)?, config.sample_cap))
            }
            ChartKind::Heatmap => {
                ChartData::Heatmap(sum_by_category_and_year(&typed::<QuantityRecord>(rows)?)?)
            }
        };
        Ok(data)
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn typed<R>(rows: &[SalesRow]) -> std::result::Result<Vec<R>, LoadError>
where
    R: for<'a> TryFrom<&'a SalesRow, Error = LoadError>,
{
    rows.iter().map(R::try_from).collect()
}

/// Aggregated data for one chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "entries", rename_all = "snake_case")]
pub enum ChartData {
    Bar(Summary<String>),
    Scatter(PointSample),
    Heatmap(Summary<CategoryYear>),
}

impl ChartData {
    pub fn kind(&self) -> ChartKind {
        match self {
            ChartData::Bar(_) => ChartKind::Bar,
            ChartData::Scatter(_) => ChartKind::Scatter,
            ChartData::Heatmap(_) => ChartKind::Heatmap,
        }
    }

    /// Number of summary entries or sampled points.
    pub fn len(&self) -> usize {
        match self {
            ChartData::Bar(summary) => summary.len(),
            ChartData::Scatter(sample) => sample.len(),
            ChartData::Heatmap(summary) => summary.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Derives fresh scales sized to `config`'s plotting area.
    ///
    /// # Errors
    ///
    /// Returns [`ScaleError::EmptyDomain`] when there is nothing to plot.
    pub fn compute_scales(&self, config: &ChartConfig) -> std::result::Result<ChartScales, ScaleError> {
        let (width, height) = (config.inner_width(), config.inner_height());

        let scales = match self {
            ChartData::Bar(summary) => {
                let categories: Vec<String> = summary.keys().cloned().collect();
                ChartScales::Bar {
                    x: BandScale::new(&categories, [0.0, width], BAR_PADDING)?,
                    y: LinearScale::from_values(
                        summary.values().chain(std::iter::once(0.0)),
                        [height, 0.0],
                    )?,
                }
            }
            ChartData::Scatter(sample) => {
                let points = sample.points();
                let categories: Vec<String> = points
                    .iter()
                    .map(|p| p.category.clone())
                    .collect::<BTreeSet<_>>()
                    .into_iter()
                    .collect();
                ChartScales::Scatter {
                    x: LinearScale::from_values(points.iter().map(|p| p.sales), [0.0, width])?
                        .nice(DEFAULT_TICK_COUNT),
                    y: LinearScale::from_values(points.iter().map(|p| p.profit), [height, 0.0])?
                        .nice(DEFAULT_TICK_COUNT),
                    fill: SequentialColorScale::from_values(
                        points.iter().map(|p| p.discount),
                        Interpolator::named("OrRd")?,
                    )?,
                    category: OrdinalScale::new(&categories, TABLEAU10)?,
                }
            }
            ChartData::Heatmap(summary) => {
                let categories: Vec<String> = summary
                    .keys()
                    .map(|k| k.category.clone())
                    .collect::<BTreeSet<_>>()
                    .into_iter()
                    .collect();
                let years: Vec<i32> = summary
                    .keys()
                    .map(|k| k.year)
                    .collect::<BTreeSet<_>>()
                    .into_iter()
                    .collect();
                let fill = SequentialColorScale::from_values(
                    summary.values().chain(std::iter::once(0.0)),
                    Interpolator::named("YlOrRd")?,
                )?;
                ChartScales::Heatmap {
                    x: BandScale::new(&categories, [0.0, width], HEATMAP_PADDING)?,
                    y: BandScale::new(&years, [0.0, height], HEATMAP_PADDING)?,
                    legend: fill.legend(LEGEND_STOPS),
                    fill,
                }
            }
        };
        Ok(scales)
    }
}

/// Scales for one chart, matching the [`ChartData`] variant they came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChartScales {
    Bar {
        x: BandScale<String>,
        y: LinearScale,
    },
    Scatter {
        x: LinearScale,
        y: LinearScale,
        fill: SequentialColorScale,
        category: OrdinalScale<String>,
    },
    Heatmap {
        x: BandScale<String>,
        y: BandScale<i32>,
        fill: SequentialColorScale,
        legend: Vec<LegendStop>,
    },
}

/// Lifecycle phase of a [`Chart`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Empty,
    Loaded,
    Rendered,
}

#[derive(Debug)]
enum ChartState {
    Empty,
    Loaded(Arc<ChartData>),
    Rendered(Arc<ChartData>),
}

impl ChartState {
    fn phase(&self) -> Phase {
        match self {
            ChartState::Empty => Phase::Empty,
            ChartState::Loaded(_) => Phase::Loaded,
            ChartState::Rendered(_) => Phase::Rendered,
        }
    }
}

/// A single chart instance owning its data exclusively.
pub struct Chart {
    kind: ChartKind,
    config: ChartConfig,
    state: Mutex<ChartState>,
    loading: AtomicBool,
}

impl Chart {
    pub fn new(kind: ChartKind, config: ChartConfig) -> Self {
        Self {
            kind,
            config,
            state: Mutex::new(ChartState::Empty),
            loading: AtomicBool::new(false),
        }
    }

    pub fn kind(&self) -> ChartKind {
        self.kind
    }

    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.state().phase()
    }

    /// Current aggregated data, if any load has succeeded.
    pub fn data(&self) -> Option<Arc<ChartData>> {
        match &*self.state() {
            ChartState::Empty => None,
            ChartState::Loaded(data) | ChartState::Rendered(data) => Some(Arc::clone(data)),
        }
    }

    fn state(&self) -> MutexGuard<'_, ChartState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Loads rows from `source` and replaces the chart's data.
    ///
    /// # Errors
    ///
    /// [`ChartError::ConcurrentLoad`] if another load on this chart has not
    /// finished; otherwise any load, field or date error. On error the
    /// previous data is kept.
    #[tracing::instrument(skip(self, loader), fields(chart = %self.kind))]
    pub async fn load(&self, loader: &dyn Loader, source: &str) -> Result<()> {
        let _guard = LoadGuard::acquire(&self.loading).ok_or(ChartError::ConcurrentLoad)?;

        let rows = loader.load(source).await?;
        let data = self.kind.aggregate(&rows, &self.config)?;
        info!(rows = rows.len(), entries = data.len(), "Chart data loaded");

        *self.state() = ChartState::Loaded(Arc::new(data));
        Ok(())
    }

    /// Derives scales from the current data. Pure; may be called any number
    /// of times once data is loaded.
    pub fn compute_scales(&self) -> Result<ChartScales> {
        let data = self.data().ok_or(ChartError::NotLoaded)?;
        Ok(data.compute_scales(&self.config)?)
    }

    /// Draws the current data with freshly derived scales.
    #[tracing::instrument(skip(self, renderer), fields(chart = %self.kind))]
    pub async fn render(&self, renderer: &dyn Renderer) -> Result<()> {
        let data = self.data().ok_or(ChartError::NotLoaded)?;
        let scales = data.compute_scales(&self.config)?;

        let frame = Frame {
            kind: self.kind,
            config: &self.config,
            data: &data,
            scales: &scales,
        };
        renderer.render(&frame).await.map_err(ChartError::Render)?;

        let mut state = self.state();
        // A load that finished while we were drawing wins.
        let (drawn_current, already_rendered) = match &*state {
            ChartState::Loaded(current) => (Arc::ptr_eq(current, &data), false),
            ChartState::Rendered(current) => (Arc::ptr_eq(current, &data), true),
            ChartState::Empty => (false, false),
        };
        match (drawn_current, already_rendered) {
            (true, false) => {
                *state = ChartState::Rendered(data);
                debug!(phase = ?Phase::Rendered, "Chart rendered");
            }
            (true, true) => debug!(phase = ?Phase::Rendered, "Chart redrawn"),
            (false, _) => {
                debug!(phase = ?state.phase(), "Chart rendered; newer data is waiting")
            }
        }
        Ok(())
    }

    /// Loads `source` and renders it.
    pub async fn refresh(
        &self,
        loader: &dyn Loader,
        source: &str,
        renderer: &dyn Renderer,
    ) -> Result<()> {
        self.load(loader, source).await?;
        self.render(renderer).await
    }
}

/// Marks a load as in flight until dropped.
struct LoadGuard<'a>(&'a AtomicBool);

impl<'a> LoadGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| LoadGuard(flag))
    }
}

impl Drop for LoadGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}
