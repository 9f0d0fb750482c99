//! Drawing context and the `Drawing` collection

use crate::map::drawing::{Drawing, DrawingContainer, DrawingKind, MAX_COLOR};
use quasar_interpreter::arguments::{check_integer_arg, check_integer_arg_range, check_string_arg};
use quasar_interpreter::names::{enum_table, lookup_name, NameTable, PropertyAcceptor, PropertyIndex, TypeHint};
use quasar_interpreter::serialization::{Charset, SaveContext, TagNode};
use quasar_interpreter::value::reject_store;
use quasar_interpreter::{Arguments, BaseValue, CallableValue, Context, Error, ExpectedType, Process, Value, World};
use std::cell::RefCell;
use std::rc::{Rc, Weak};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawingProperty {
    Type,
    Color,
    Comment,
    Tag,
    LocX,
    LocY,
    EndX,
    EndY,
    Radius,
    Shape,
}

pub const DRAWING_MAPPING: &[NameTable<DrawingProperty>] = &[
    NameTable::new("COLOR", DrawingProperty::Color, TypeHint::Int),
    NameTable::new("COMMENT", DrawingProperty::Comment, TypeHint::String),
    NameTable::new("END.X", DrawingProperty::EndX, TypeHint::Int),
    NameTable::new("END.Y", DrawingProperty::EndY, TypeHint::Int),
    NameTable::new("LOC.X", DrawingProperty::LocX, TypeHint::Int),
    NameTable::new("LOC.Y", DrawingProperty::LocY, TypeHint::Int),
    NameTable::new("RADIUS", DrawingProperty::Radius, TypeHint::Int),
    NameTable::new("SHAPE", DrawingProperty::Shape, TypeHint::Int),
    NameTable::new("TAG", DrawingProperty::Tag, TypeHint::Int),
    NameTable::new("TYPE", DrawingProperty::Type, TypeHint::String),
];

/// Read a drawing property. Geometry that does not apply to the drawing's
/// kind is null.
pub fn get_drawing_property(drawing: &Drawing, property: DrawingProperty) -> Option<Value> {
    let has_end = matches!(drawing.kind, DrawingKind::Line | DrawingKind::Rectangle);
    match property {
        DrawingProperty::Type => Some(Value::from(drawing.kind.as_str())),
        DrawingProperty::Color => Some(Value::Integer(drawing.color)),
        DrawingProperty::Comment => Some(Value::from(drawing.comment.as_str())),
        DrawingProperty::Tag => Some(Value::Integer(drawing.tag)),
        DrawingProperty::LocX => Some(Value::Integer(drawing.x)),
        DrawingProperty::LocY => Some(Value::Integer(drawing.y)),
        DrawingProperty::EndX => has_end.then_some(Value::Integer(drawing.x2)),
        DrawingProperty::EndY => has_end.then_some(Value::Integer(drawing.y2)),
        DrawingProperty::Radius => (drawing.kind == DrawingKind::Circle).then_some(Value::Integer(drawing.radius)),
        DrawingProperty::Shape => (drawing.kind == DrawingKind::Marker).then_some(Value::Integer(drawing.shape)),
    }
}

/// Color, comment and tag can be changed; null leaves the drawing unchanged.
/// Returns whether anything was assigned.
pub fn set_drawing_property(drawing: &mut Drawing, property: DrawingProperty, value: Option<&Value>) -> Result<bool, Error> {
    match property {
        DrawingProperty::Color => {
            if let Some(color) = check_integer_arg_range(value, 0, MAX_COLOR)? {
                drawing.color = color;
                return Ok(true);
            }
        }
        DrawingProperty::Comment => {
            if let Some(comment) = check_string_arg(value)? {
                drawing.comment = comment;
                return Ok(true);
            }
        }
        DrawingProperty::Tag => {
            if let Some(tag) = check_integer_arg(value)? {
                drawing.tag = tag;
                return Ok(true);
            }
        }
        _ => return Err(Error::NotAssignable),
    }
    Ok(false)
}

/// Cursor on one drawing slot
///
/// The slot is re-checked on every access. If the drawing is erased while
/// the cursor points at it, its properties read as null and `next` still
/// moves on to the following drawing.
#[derive(Debug, Clone)]
pub struct DrawingContext {
    slot: usize,
    drawings: Weak<RefCell<DrawingContainer>>,
}

impl DrawingContext {
    pub fn new(slot: usize, drawings: Weak<RefCell<DrawingContainer>>) -> Self {
        Self { slot, drawings }
    }

    pub fn slot(&self) -> usize {
        self.slot
    }
}

impl BaseValue for DrawingContext {
    fn to_text(&self, _readable: bool) -> String {
        "#<drawing>".to_string()
    }

    fn store(
        &self,
        _out: &mut TagNode,
        _aux: &mut Vec<u8>,
        _charset: Charset,
        _ctx: Option<&mut dyn SaveContext>,
    ) -> Result<(), Error> {
        reject_store()
    }
}

impl Context for DrawingContext {
    fn lookup(&self, name: &str) -> Option<PropertyIndex> {
        lookup_name(name, DRAWING_MAPPING)
    }

    fn get(&self, index: PropertyIndex) -> Result<Option<Value>, Error> {
        let (entry, drawings) = match (DRAWING_MAPPING.get(index), self.drawings.upgrade()) {
            (Some(entry), Some(drawings)) => (entry, drawings),
            _ => return Ok(None),
        };
        let drawings = drawings.borrow();
        Ok(drawings
            .get(self.slot)
            .and_then(|d| get_drawing_property(d, entry.domain)))
    }

    fn set(&self, index: PropertyIndex, value: Option<&Value>) -> Result<(), Error> {
        let (entry, drawings) = match (DRAWING_MAPPING.get(index), self.drawings.upgrade()) {
            (Some(entry), Some(drawings)) => (entry, drawings),
            _ => return Err(Error::NotAssignable),
        };
        let signal = {
            let mut drawings = drawings.borrow_mut();
            let drawing = drawings.get_mut(self.slot).ok_or(Error::NotAssignable)?;
            if !set_drawing_property(drawing, entry.domain, value)? {
                return Ok(());
            }
            drawings.sig_change().clone()
        };
        signal.raise();
        Ok(())
    }

    fn next(&mut self) -> bool {
        let next = self
            .drawings
            .upgrade()
            .and_then(|drawings| drawings.borrow().find_next(self.slot));
        match next {
            Some(slot) => {
                self.slot = slot;
                true
            }
            None => false,
        }
    }

    fn clone_context(&self) -> Box<dyn Context> {
        Box::new(self.clone())
    }

    fn enum_properties(&self, acceptor: &mut dyn PropertyAcceptor) {
        enum_table(DRAWING_MAPPING, acceptor);
    }
}

/// The `Drawing` collection; only usable for iteration
#[derive(Debug, Clone)]
pub struct DrawingFunction {
    drawings: Weak<RefCell<DrawingContainer>>,
}

impl DrawingFunction {
    pub fn new(drawings: &Rc<RefCell<DrawingContainer>>) -> Self {
        Self {
            drawings: Rc::downgrade(drawings),
        }
    }

    pub fn into_value(self) -> Value {
        Value::Callable(Box::new(self))
    }
}

impl BaseValue for DrawingFunction {
    fn to_text(&self, _readable: bool) -> String {
        "#<array>".to_string()
    }

    fn store(
        &self,
        _out: &mut TagNode,
        _aux: &mut Vec<u8>,
        _charset: Charset,
        _ctx: Option<&mut dyn SaveContext>,
    ) -> Result<(), Error> {
        reject_store()
    }
}

impl CallableValue for DrawingFunction {
    fn call(&self, _process: &mut Process, _world: &mut World, _args: Arguments, _want_result: bool) -> Result<(), Error> {
        Err(Error::Type(ExpectedType::Indexable))
    }

    fn is_procedure_call(&self) -> bool {
        false
    }

    fn get_dimension(&self, which: usize) -> usize {
        let count = self.drawings.upgrade().map_or(0, |d| d.borrow().count());
        match (which, count) {
            (0, _) => 1,
            (_, 0) => 0,
            (_, n) => n + 1,
        }
    }

    fn make_first_context(&self) -> Result<Option<Box<dyn Context>>, Error> {
        let first = self.drawings.upgrade().and_then(|d| d.borrow().first());
        Ok(first.map(|slot| Box::new(DrawingContext::new(slot, self.drawings.clone())) as Box<dyn Context>))
    }

    fn clone_callable(&self) -> Box<dyn CallableValue> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quasar_interpreter::context::{get_property, set_property};

    fn container() -> Rc<RefCell<DrawingContainer>> {
        let mut c = DrawingContainer::new();
        c.add(Drawing::line(1000, 1000, 1100, 1200));
        c.add(Drawing::circle(1500, 1500, 20));
        c.add(Drawing::marker(2000, 2000, 3));
        Rc::new(RefCell::new(c))
    }

    #[test]
    fn test_kind_specific_geometry() {
        let c = container();
        let line = DrawingContext::new(0, Rc::downgrade(&c));
        assert_eq!(get_property(&line, "END.Y").unwrap().unwrap().as_integer(), Some(1200));
        assert!(get_property(&line, "RADIUS").unwrap().is_none());
        assert_eq!(get_property(&line, "TYPE").unwrap().unwrap().as_str(), Some("Line"));

        let circle = DrawingContext::new(1, Rc::downgrade(&c));
        assert_eq!(get_property(&circle, "RADIUS").unwrap().unwrap().as_integer(), Some(20));
        assert!(get_property(&circle, "END.X").unwrap().is_none());
    }

    #[test]
    fn test_set_raises_change() {
        let c = container();
        let changes = Rc::new(RefCell::new(0));
        let counter = changes.clone();
        c.borrow().sig_change().connect(move || *counter.borrow_mut() += 1);

        let ctx = DrawingContext::new(2, Rc::downgrade(&c));
        set_property(&ctx, "COLOR", Some(&Value::Integer(12))).unwrap();
        assert_eq!(c.borrow().get(2).unwrap().color, 12);
        assert_eq!(*changes.borrow(), 1);

        assert_eq!(set_property(&ctx, "COLOR", Some(&Value::Integer(31))), Err(Error::Range));
        assert_eq!(set_property(&ctx, "LOC.X", Some(&Value::Integer(1))), Err(Error::NotAssignable));
        assert_eq!(*changes.borrow(), 1);

        set_property(&ctx, "COMMENT", None).unwrap();
        set_property(&ctx, "TAG", None).unwrap();
        assert_eq!(c.borrow().get(2).unwrap().color, 12);
        assert_eq!(*changes.borrow(), 1);
    }

    #[test]
    fn test_set_on_vanished_drawing_fails() {
        let c = container();
        let ctx = DrawingContext::new(1, Rc::downgrade(&c));
        c.borrow_mut().erase(1);
        assert_eq!(
            set_property(&ctx, "COLOR", Some(&Value::Integer(3))),
            Err(Error::NotAssignable)
        );

        let ctx = DrawingContext::new(0, Rc::downgrade(&c));
        drop(c);
        assert_eq!(
            set_property(&ctx, "TAG", Some(&Value::Integer(3))),
            Err(Error::NotAssignable)
        );
    }

    #[test]
    fn test_erase_current_during_iteration() {
        let c = container();
        let f = DrawingFunction::new(&c);
        let mut ctx = f.make_first_context().unwrap().unwrap();
        assert_eq!(get_property(ctx.as_ref(), "TYPE").unwrap().unwrap().as_str(), Some("Line"));

        c.borrow_mut().erase(0);
        assert!(get_property(ctx.as_ref(), "TYPE").unwrap().is_none());
        assert!(ctx.next());
        assert_eq!(get_property(ctx.as_ref(), "TYPE").unwrap().unwrap().as_str(), Some("Circle"));

        c.borrow_mut().erase(2);
        assert!(!ctx.next());
        assert_eq!(f.get_dimension(1), 2);
    }
}
