//! # annotkit
//!
//! Annotation editing for PDF viewers: selection, resize/move/rotate
//! transforms bounded to the page, and snapshot based undo/redo.
//!
//! ## Architecture
//!
//! annotkit is organized as a workspace with multiple crates:
//!
//! 1. **annotkit-core** - Identifiers, geometry, page bounding, errors, events
//! 2. **annotkit-editor** - Edit controller, transform sessions, undo/redo, tool manager
//! 3. **annotkit-settings** - Configuration persisted as JSON or TOML
//! 4. **annotkit** - Re-exports, logging setup and the replay tool

pub mod replay;

pub use annotkit_core::{
    bound_point_to_rect, bound_rect_to_page, AnnotationId, AnnotationRef, BoundsMode,
    EditError, EditorEvent, Error, EventBus, EventCategory, EventFilter, PageNumber, Point, Rect,
    Result, Size, SnapshotError, Vector,
};

pub use annotkit_editor::{
    Annotation, AnnotationEditController, AnnotationStyle, AnnotationType, Color, DocumentModel,
    EditDelegate, EditState, EditorOptions, GestureEvent, Handle, MemoryDocument,
    PlatformRequest, PlatformUndoFacade, ToolManager, TransformMode, UndoRedoCoordinator,
};

pub use annotkit_settings::{Config, EditingSettings, HistorySettings, LoggingSettings};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize logging from the logging settings
///
/// `RUST_LOG` takes precedence over the configured level. Output goes to
/// stderr so replay output on stdout stays machine readable.
pub fn init_logging(settings: &LoggingSettings) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.level))?;

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_line_number(true);

    if settings.json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer.json())
            .try_init()?;
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()?;
    }

    Ok(())
}
