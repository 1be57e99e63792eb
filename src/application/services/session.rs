//! Interactive treemap session
//!
//! Holds what a treemap window holds between events: the tree, the bounds it
//! is drawn into, the selected leaf and the status line. Drawing and event
//! polling live elsewhere; this service only applies events.

use std::fmt;
use std::str::FromStr;

use tracing::{debug, info};

use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::{
    adjust_leaf, layout_tree, path, point_to_leaf, select_and_delete, NodeId, Point, PrunePolicy,
    Rect, Tile, WeightedTree,
};

/// One user action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// Primary click: select or deselect the leaf under the point.
    Select(Point),
    /// Secondary click: delete the leaf under the point.
    Delete(Point),
    /// Grow the selected leaf by one percent.
    Grow,
    /// Shrink the selected leaf by one percent.
    Shrink,
}

impl fmt::Display for SessionEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionEvent::Select(p) => write!(f, "select {} {}", p.x, p.y),
            SessionEvent::Delete(p) => write!(f, "delete {} {}", p.x, p.y),
            SessionEvent::Grow => write!(f, "grow"),
            SessionEvent::Shrink => write!(f, "shrink"),
        }
    }
}

impl FromStr for SessionEvent {
    type Err = String;

    /// Parse `select X Y`, `delete X Y`, `grow` or `shrink`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split_whitespace().collect();
        let point = |args: &[&str]| -> Result<Point, String> {
            match args {
                [x, y] => {
                    let x = x.parse().map_err(|_| format!("bad x coordinate: {}", x))?;
                    let y = y.parse().map_err(|_| format!("bad y coordinate: {}", y))?;
                    Ok(Point::new(x, y))
                }
                _ => Err("expected two coordinates".to_string()),
            }
        };

        match parts.as_slice() {
            ["select", args @ ..] => point(args).map(SessionEvent::Select),
            ["delete", args @ ..] => point(args).map(SessionEvent::Delete),
            ["grow"] => Ok(SessionEvent::Grow),
            ["shrink"] => Ok(SessionEvent::Shrink),
            _ => Err(format!("unknown event: {}", s.trim())),
        }
    }
}

/// Parse a script of events, one per line.
///
/// Blank lines and lines starting with `#` are ignored.
pub fn parse_script(script: &str) -> ApplicationResult<Vec<SessionEvent>> {
    script
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
        .map(|(line_no, line)| {
            line.parse()
                .map_err(|message| ApplicationError::InvalidEvent {
                    line: line_no,
                    message,
                })
        })
        .collect()
}

/// State of one interactive treemap view.
#[derive(Debug)]
pub struct TreemapSession {
    tree: WeightedTree,
    bounds: Rect,
    policy: PrunePolicy,
    selected: Option<NodeId>,
    status: String,
}

impl TreemapSession {
    pub fn new(tree: WeightedTree, bounds: Rect, policy: PrunePolicy) -> Self {
        Self {
            tree,
            bounds,
            policy,
            selected: None,
            status: String::new(),
        }
    }

    pub fn tree(&self) -> &WeightedTree {
        &self.tree
    }

    pub fn into_tree(self) -> WeightedTree {
        self.tree
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn selected(&self) -> Option<NodeId> {
        self.selected
    }

    /// Status line text: the selected leaf's path, or empty.
    pub fn status(&self) -> &str {
        &self.status
    }

    /// Current layout of the whole tree.
    pub fn tiles(&self) -> Vec<Tile> {
        layout_tree(&self.tree, self.bounds)
    }

    fn hit(&self, point: Point) -> Option<NodeId> {
        let root = self.tree.root()?;
        point_to_leaf(&self.tree, root, self.bounds, point)
    }

    pub fn apply(&mut self, event: SessionEvent) -> ApplicationResult<()> {
        debug!(%event, "apply");
        match event {
            SessionEvent::Select(point) => self.select(point),
            SessionEvent::Delete(point) => self.delete(point),
            SessionEvent::Grow => self.resize(true),
            SessionEvent::Shrink => self.resize(false),
        }
    }

    /// Toggle selection of the leaf under `point`.
    pub fn select(&mut self, point: Point) -> ApplicationResult<()> {
        let Some(leaf) = self.hit(point) else {
            return Ok(());
        };
        if self.selected == Some(leaf) {
            self.selected = None;
            self.status.clear();
        } else {
            self.status = path(&self.tree, leaf)?;
            self.selected = Some(leaf);
            info!("selected {}", self.status);
        }
        Ok(())
    }

    /// Delete the leaves under `point`; drops the selection if it was hit.
    pub fn delete(&mut self, point: Point) -> ApplicationResult<()> {
        let deleted = select_and_delete(&mut self.tree, self.bounds, point, self.policy)?;
        let selection_gone = self
            .selected
            .is_some_and(|s| deleted.contains(&s) || !self.tree.contains(s));
        if selection_gone {
            self.selected = None;
            self.status.clear();
        }
        if !deleted.is_empty() {
            info!("deleted {} leaf(s) at {}", deleted.len(), point);
        }
        Ok(())
    }

    /// Resize the selected leaf; ignored without a selection.
    pub fn resize(&mut self, grow: bool) -> ApplicationResult<()> {
        let Some(leaf) = self.selected else {
            return Ok(());
        };
        adjust_leaf(&mut self.tree, leaf, grow)?;
        self.status = path(&self.tree, leaf)?;
        Ok(())
    }
}
