//! Interactive magnetic selection tool.
//!
//! Drives one gesture at a time:
//!
//! ```text
//! Idle --begin--> Drawing --finish--> Computing --> Committed --acknowledge--> Idle
//!   ^                |                     |
//!   +----cancel------+------(no edge)------+
//! ```
//!
//! The host forwards pointer events, calls [`MagneticSelectTool::preview`]
//! on repaint and pushes the returned [`SelectionCommand`] onto its undo
//! stack.

use tracing::debug;

use crate::error::{Result, SelectError};
use crate::geometry::Point;
use crate::selection::config::MagneticConfig;
use crate::selection::luminance::LuminanceField;
use crate::selection::rasterize::{SelectionAction, SelectionRasterizer};
use crate::selection::trace::{compute_outline, OutlineTrace};

/// Name of the undo command produced by the tool.
pub const COMMAND_NAME: &str = "Path Selection";

/// Tool lifecycle state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToolState {
    Idle,
    Drawing,
    Computing,
    Committed,
}

/// A finished selection, ready for the host's undo stack.
#[derive(Clone, Debug, PartialEq)]
pub struct SelectionCommand<H> {
    pub name: &'static str,
    pub action: SelectionAction,
    pub handle: H,
}

#[derive(Clone, Debug)]
pub struct MagneticSelectTool {
    config: MagneticConfig,
    action: SelectionAction,
    state: ToolState,
    curve: Vec<Point>,
}

impl Default for MagneticSelectTool {
    fn default() -> Self {
        Self {
            config: MagneticConfig::default(),
            action: SelectionAction::default(),
            state: ToolState::Idle,
            curve: Vec::new(),
        }
    }
}

impl MagneticSelectTool {
    pub fn new(config: MagneticConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            ..Self::default()
        })
    }

    pub fn state(&self) -> ToolState {
        self.state
    }

    pub fn config(&self) -> &MagneticConfig {
        &self.config
    }

    pub fn curve(&self) -> &[Point] {
        &self.curve
    }

    pub fn action(&self) -> SelectionAction {
        self.action
    }

    pub fn set_action(&mut self, action: SelectionAction) {
        self.action = action;
    }

    /// Update the search distance; takes effect on the next computation.
    pub fn set_search_distance(&mut self, distance: u32) {
        self.config.set_search_distance(distance);
    }

    /// Start a new curve at `point`.
    pub fn begin(&mut self, point: Point) -> Result<()> {
        match self.state {
            ToolState::Idle | ToolState::Committed => {
                self.curve.clear();
                self.curve.push(point);
                self.transition(ToolState::Drawing);
                Ok(())
            }
            _ => Err(SelectError::InvalidState("a gesture is already in progress")),
        }
    }

    /// Append a point to the curve being drawn.
    pub fn extend(&mut self, point: Point) -> Result<()> {
        if self.state != ToolState::Drawing {
            return Err(SelectError::InvalidState("extend called while not drawing"));
        }
        if self.curve.last() != Some(&point) {
            self.curve.push(point);
        }
        Ok(())
    }

    /// Outline for the curve drawn so far, recomputed from scratch.
    pub fn preview<F>(&self, field: &F) -> Result<OutlineTrace>
    where
        F: LuminanceField + ?Sized,
    {
        if self.state != ToolState::Drawing {
            return Ok(OutlineTrace::default());
        }
        compute_outline(&self.curve, field, &self.config)
    }

    /// Abandon the gesture without side effects.
    pub fn cancel(&mut self) {
        self.curve.clear();
        self.transition(ToolState::Idle);
    }

    /// Compute the boundary and hand it to `rasterizer`.
    ///
    /// Returns `Ok(None)` and goes back to idle when no edge was found.
    pub fn finish<F, R>(&mut self, field: &F, rasterizer: &mut R) -> Result<Option<SelectionCommand<R::Handle>>>
    where
        F: LuminanceField + ?Sized,
        R: SelectionRasterizer,
    {
        if self.state != ToolState::Drawing {
            return Err(SelectError::InvalidState("finish called while not drawing"));
        }

        self.transition(ToolState::Computing);
        let curve = std::mem::take(&mut self.curve);
        let outline = match compute_outline(&curve, field, &self.config) {
            Ok(outline) => outline,
            Err(err) => {
                self.transition(ToolState::Idle);
                return Err(err);
            }
        };

        if outline.is_empty() {
            debug!("no edge found, nothing to select");
            self.transition(ToolState::Idle);
            return Ok(None);
        }

        let handle = rasterizer.rasterize(&outline.boundary, self.config.fill_rule);
        self.transition(ToolState::Committed);
        Ok(Some(SelectionCommand {
            name: COMMAND_NAME,
            action: self.action,
            handle,
        }))
    }

    /// Host has taken the command; ready for the next gesture.
    pub fn acknowledge(&mut self) {
        if self.state == ToolState::Committed {
            self.transition(ToolState::Idle);
        }
    }

    fn transition(&mut self, next: ToolState) {
        if self.state != next {
            debug!(from = ?self.state, to = ?next, "magnetic tool state");
            self.state = next;
        }
    }
}
