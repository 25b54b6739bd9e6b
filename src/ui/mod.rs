//! Terminal playground built on [ratatui](https://github.com/ratatui-org/ratatui).
//!
//! The UI is organized into three layers:
//!
//! - **[`app`]**: application state, keyboard event loop, pane focus, sample cycling
//! - **[`panes`]**: render functions for each visible pane (source, output, status bar)
//! - **[`theme`]**: centralized color palette used by all panes
//!
//! The playground only talks to the [`pipeline`](crate::pipeline) functions and
//! shows the text they return unchanged.

pub mod app;
pub mod panes;
pub mod theme;

pub use app::App;
