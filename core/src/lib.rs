mod api;
mod chart;
mod config;
mod error;
mod model;
mod selection;
mod session;
mod store;

pub use api::{parse_population, parse_prefectures};
pub use chart::{
    AXIS_LEN, ChartData, ChartDataset, X_AXIS_LABEL, Y_AXIS_LABEL, YEAR_AXIS, align_to_axis,
    border_color, derive_chart,
};
pub use config::{API_KEY_HEADER, ApiConfig, DEFAULT_BASE_URL};
pub use error::{FetchError, FetchFailure};
pub use model::{Population, PopulationPoint, PrefCode, Prefecture, SeriesRecord};
pub use selection::Selection;
pub use session::{FetchRequest, Session};
pub use store::{SeriesStatus, SeriesStore};
