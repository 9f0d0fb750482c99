//! Map drawings: user annotations on the starchart

use crate::signal::ChangeSignal;
use serde::{Deserialize, Serialize};

/// Highest drawing color
pub const MAX_COLOR: i32 = 30;

/// Highest marker shape
pub const MAX_MARKER_SHAPE: i32 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DrawingKind {
    Line,
    Rectangle,
    Circle,
    Marker,
}

impl DrawingKind {
    pub fn as_str(self) -> &'static str {
        match self {
            DrawingKind::Line => "Line",
            DrawingKind::Rectangle => "Rectangle",
            DrawingKind::Circle => "Circle",
            DrawingKind::Marker => "Marker",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Drawing {
    pub kind: DrawingKind,
    pub x: i32,
    pub y: i32,
    /// Second corner of lines and rectangles
    pub x2: i32,
    pub y2: i32,
    /// Circle radius
    pub radius: i32,
    /// Marker shape
    pub shape: i32,
    pub color: i32,
    pub tag: i32,
    pub comment: String,
}

impl Drawing {
    pub fn new(kind: DrawingKind, x: i32, y: i32) -> Self {
        Self {
            kind,
            x,
            y,
            x2: x,
            y2: y,
            radius: 0,
            shape: 0,
            color: 9,
            tag: 0,
            comment: String::new(),
        }
    }

    pub fn line(x: i32, y: i32, x2: i32, y2: i32) -> Self {
        Self {
            x2,
            y2,
            ..Self::new(DrawingKind::Line, x, y)
        }
    }

    pub fn circle(x: i32, y: i32, radius: i32) -> Self {
        Self {
            radius,
            ..Self::new(DrawingKind::Circle, x, y)
        }
    }

    pub fn marker(x: i32, y: i32, shape: i32) -> Self {
        Self {
            shape,
            ..Self::new(DrawingKind::Marker, x, y)
        }
    }
}

/// Drawings in slots
///
/// Erasing a drawing leaves an empty slot so that positions of the other
/// drawings, and cursors pointing at them, stay valid.
#[derive(Debug, Default)]
pub struct DrawingContainer {
    slots: Vec<Option<Drawing>>,
    sig_change: ChangeSignal,
}

impl DrawingContainer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a drawing and return its slot
    pub fn add(&mut self, drawing: Drawing) -> usize {
        self.slots.push(Some(drawing));
        self.slots.len() - 1
    }

    /// Erase the drawing in `slot`. Returns false if the slot was empty.
    pub fn erase(&mut self, slot: usize) -> bool {
        match self.slots.get_mut(slot) {
            Some(entry) => entry.take().is_some(),
            None => false,
        }
    }

    pub fn get(&self, slot: usize) -> Option<&Drawing> {
        self.slots.get(slot)?.as_ref()
    }

    pub fn get_mut(&mut self, slot: usize) -> Option<&mut Drawing> {
        self.slots.get_mut(slot)?.as_mut()
    }

    /// First live slot at or after `slot`
    pub fn find_from(&self, slot: usize) -> Option<usize> {
        self.slots
            .iter()
            .enumerate()
            .skip(slot)
            .find(|(_, entry)| entry.is_some())
            .map(|(index, _)| index)
    }

    /// First live slot after `slot`
    pub fn find_next(&self, slot: usize) -> Option<usize> {
        self.find_from(slot + 1)
    }

    pub fn first(&self) -> Option<usize> {
        self.find_from(0)
    }

    /// Number of live drawings
    pub fn count(&self) -> usize {
        self.slots.iter().filter(|entry| entry.is_some()).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &Drawing)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(index, entry)| entry.as_ref().map(|d| (index, d)))
    }

    pub fn sig_change(&self) -> &ChangeSignal {
        &self.sig_change
    }
}
