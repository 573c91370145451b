//! Shape formatting.
//!
//! Formatting is a pure external collaborator: a function from annotation to
//! optional style, applied whenever a shape is (re)drawn. The overlay never
//! decides visual styling itself.

use std::rc::Rc;

use crate::annotation::Annotation;
use crate::element::{Element, Style};

/// A caller-supplied, pure formatting function.
pub type Formatter = Rc<dyn Fn(&Annotation) -> Option<Style>>;

/// Decorates a rendered element for its annotation.
pub fn apply_formatter(element: &Element, annotation: &Annotation, formatter: Option<&Formatter>) {
    if let Some(formatter) = formatter {
        if let Some(style) = formatter(annotation) {
            element.borrow_mut().set_style(style);
        }
    }
}
