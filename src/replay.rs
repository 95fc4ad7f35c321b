//! Replay tool
//!
//! Drives a `ToolManager` over an in-memory document from a JSON script and
//! reports the resulting document. Used to reproduce editing sessions
//! outside a viewer.
//!
//! ```json
//! {
//!   "document": { "pages": [{ "crop_box": { "x": 0, "y": 0, "width": 612, "height": 792 } }] },
//!   "steps": [
//!     { "select": { "id": "6f1c…", "page": 1 } },
//!     { "gesture": { "Began": { "x": 110, "y": 60 } } },
//!     { "gesture": { "Ended": { "x": 150, "y": 90 } } },
//!     "undo"
//!   ]
//! }
//! ```

use annotkit_core::{AnnotationId, PageNumber, Point, Rect};
use annotkit_editor::{
    Annotation, Color, DocumentModel, GestureEvent, MemoryDocument, ToolManager,
};
use annotkit_settings::Config;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One scripted editor action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    Select { id: AnnotationId, page: PageNumber },
    Deselect,
    Tap { page: PageNumber, point: Point },
    Gesture(GestureEvent),
    /// Force the aspect lock on or off; `null` restores the per-type default.
    LockAspectRatio(Option<bool>),
    Opacity(f64),
    Border(f64),
    Color(Color),
    AddAnnotation(Annotation),
    RemoveAnnotation { id: AnnotationId, page: PageNumber },
    FillField {
        id: AnnotationId,
        page: PageNumber,
        value: String,
    },
    InsertPage { at: PageNumber, crop_box: Rect },
    MovePage { from: PageNumber, to: PageNumber },
    RemovePage { page: PageNumber },
    TouchPage { page: PageNumber },
    Undo,
    Redo,
}

/// A document and the steps to run against it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplayScript {
    pub document: MemoryDocument,
    #[serde(default)]
    pub steps: Vec<Step>,
}

impl ReplayScript {
    pub fn from_json(json: &str) -> annotkit_core::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> annotkit_core::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }
}

/// What happened to one step
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepOutcome {
    pub step: usize,
    pub applied: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// Result of a replay
#[derive(Debug, Clone, Serialize)]
pub struct ReplayReport {
    pub document: MemoryDocument,
    /// Undo chain descriptions, oldest first.
    pub history: Vec<String>,
    pub outcomes: Vec<StepOutcome>,
}

/// Run every step in order. Steps that fail are reported and skipped.
pub fn run(script: ReplayScript, config: &Config) -> ReplayReport {
    let mut tools = ToolManager::new(
        script.document,
        config.editing.to_editor_options(),
        config.history.max_depth,
    );
    tools
        .undo_coordinator_mut()
        .set_host_enabled(config.history.undo_enabled);

    let outcomes = script
        .steps
        .into_iter()
        .enumerate()
        .map(|(index, step)| {
            let outcome = apply(&mut tools, step);
            tracing::debug!(
                "Step {}: {}",
                index,
                if outcome.0 { "applied" } else { "skipped" }
            );
            StepOutcome {
                step: index,
                applied: outcome.0,
                detail: outcome.1,
            }
        })
        .collect();

    let history = tools
        .undo_coordinator()
        .chain()
        .full_history()
        .into_iter()
        .map(str::to_string)
        .collect();

    ReplayReport {
        document: tools.into_document(),
        history,
        outcomes,
    }
}

fn apply(tools: &mut ToolManager<MemoryDocument>, step: Step) -> (bool, Option<String>) {
    let checked = |result: Result<(), annotkit_core::EditError>| match result {
        Ok(()) => (true, None),
        Err(e) => (false, Some(e.to_string())),
    };

    match step {
        Step::Select { id, page } => (tools.select_annotation(id, page), None),
        Step::Deselect => {
            tools.deselect_annotation();
            (true, None)
        }
        Step::Tap { page, point } => (
            tools.handle_gesture(GestureEvent::Tap { page, point }),
            None,
        ),
        Step::Gesture(event) => (tools.handle_gesture(event), None),
        Step::LockAspectRatio(value) => {
            tools.controller_mut().set_maintain_aspect_ratio(value);
            (true, None)
        }
        Step::Opacity(opacity) => (tools.set_annotation_opacity(opacity), None),
        Step::Border(thickness) => (tools.set_annotation_border(thickness), None),
        Step::Color(color) => (tools.set_annotation_color(color), None),
        Step::AddAnnotation(annotation) => checked(tools.add_annotation(annotation)),
        Step::RemoveAnnotation { id, page } => {
            checked(tools.remove_annotation(id, page).map(|_| ()))
        }
        Step::FillField { id, page, value } => checked(tools.set_form_field_value(id, page, value)),
        Step::InsertPage { at, crop_box } => checked(tools.insert_page(at, crop_box)),
        Step::MovePage { from, to } => checked(tools.move_page(from, to)),
        Step::RemovePage { page } => checked(tools.remove_page(page)),
        Step::TouchPage { page } => checked(tools.modify_page_content(page)),
        Step::Undo => match tools.undo() {
            Some(description) => (true, Some(description)),
            None => (false, None),
        },
        Step::Redo => match tools.redo() {
            Some(description) => (true, Some(description)),
            None => (false, None),
        },
    }
}

/// Page count and annotation count, for the summary line.
pub fn summarize(document: &MemoryDocument) -> (u32, usize) {
    let annotations = (1..=document.page_count())
        .map(|page| document.annotations_on_page(page).len())
        .sum();
    (document.page_count(), annotations)
}
