//! # Ferrocast Web
//!
//! Browser form and JSON endpoint over the ferrocast forecast pipeline.
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/` | Form with defaults (AAPL, 100 days, light theme, static chart) |
//! | POST | `/forecast` | Run a forecast and show chart, summary and downloads |
//! | GET | `/api/forecast` | Same run as JSON, without images |
//! | GET | `/health` | Liveness probe |
//!
//! Every request runs its own pipeline; the only shared state is the price
//! source and the server-wide defaults in [`AppState`].

pub mod form;
pub mod page;
pub mod routes;
pub mod state;

pub use form::{ApiQuery, ForecastForm};
pub use routes::router;
pub use state::AppState;
