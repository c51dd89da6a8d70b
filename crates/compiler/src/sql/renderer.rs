//! Rendering context threaded through one compile call.

use crate::sql::{
    CompileOptions,
    dialect::{SqlDialect, named_placeholder, param_name},
};
use model::core::value::Value;

/// How bound parameters are referenced in the rendered text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceholderStyle {
    /// The dialect's own style (`$n`, `?` or `@pN`), parameters returned
    /// as an ordered list.
    Dialect,
    /// Always `@pN`, parameters returned keyed by name.
    Named,
}

/// Holds the state of a single compile call: the parameter list and the
/// running placeholder index. A renderer is never shared between calls.
pub struct Renderer<'a> {
    options: &'a CompileOptions,
    style: PlaceholderStyle,
    next_index: usize,
    params: Vec<(String, Value)>,
}

impl<'a> Renderer<'a> {
    pub fn new(options: &'a CompileOptions, style: PlaceholderStyle) -> Self {
        Self {
            options,
            style,
            next_index: options.start_index,
            params: Vec::new(),
        }
    }

    pub fn dialect(&self) -> SqlDialect {
        self.options.dialect
    }

    pub fn quote(&self, ident: &str) -> String {
        match self.options.quote_identifier {
            Some(quote) => quote(ident),
            None => self.options.dialect.quote_identifier(ident),
        }
    }

    /// Quotes each part of a possibly schema-qualified name separately.
    pub fn quote_qualified(&self, name: &str) -> String {
        name.split('.')
            .map(|part| self.quote(part))
            .collect::<Vec<_>>()
            .join(".")
    }

    /// Records `value` as the next parameter and returns its placeholder.
    pub fn add_param(&mut self, value: Value) -> String {
        let index = self.next_index;
        self.next_index += 1;
        self.params.push((param_name(index), value));

        match self.style {
            PlaceholderStyle::Dialect => self.options.dialect.placeholder(index),
            PlaceholderStyle::Named => named_placeholder(index),
        }
    }

    /// Index the next placeholder would receive.
    pub fn next_index(&self) -> usize {
        self.next_index
    }

    /// Consumes the renderer and returns the parameters paired with their
    /// placeholder names, in binding order.
    pub fn finish(self) -> Vec<(String, Value)> {
        self.params
    }
}
