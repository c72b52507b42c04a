//! Chart specifications and the assembler that builds them from provider data.

pub mod assembler;
pub mod spec;
pub mod theme;

pub use assembler::{AssembleError, PanelSet, build};
pub use spec::{ChartSpec, Layout, PanelId, Shape, Trace};
