//! Kinocut Timeline Layout
//!
//! The viewport side of the editor, decoupled from any toolkit:
//! - **Zoom:** Discrete levels mapping time to pixels ([`zoom`])
//! - **Viewport:** Screen proxies for clips, playhead, snap indicator
//!   ([`viewport`])
//! - **Scroll:** Canvas extent and paging ([`scroll`])
//! - **Selection:** Selected clips and action sensitivity ([`selection`])
//! - **Commands:** Split/delete/group/ungroup ([`commands`])
//!
//! The engine consumes the model's ordered event queue; it never holds
//! a reference into the model between events.

pub mod commands;
pub mod scroll;
pub mod selection;
pub mod viewport;
pub mod zoom;

pub use commands::{apply_command, refresh_snapping_distance, EditingCommand};
pub use scroll::ScrollRegion;
pub use selection::{Selection, SelectionMode};
pub use viewport::{
    row_y, ScreenElement, ViewportEngine, CONTROL_WIDTH, END_PADDING, EXPANDED_SIZE,
    PLAYHEAD_WIDTH, SNAP_INDICATOR_WIDTH, SPACING,
};
pub use zoom::{
    compute_best_fit_zoom, pixels_per_second, ZoomState, DEFAULT_ZOOM_LEVEL, ZOOM_LEVELS,
};
