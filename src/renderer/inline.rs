use serde_json::Value;

use crate::{
    appender::SqlAppender,
    ast::Catalog,
    renderer::{NameEscaper, NoEscape, Renderer},
};

/// A visitor writing values as SQL literals, for logging and for
/// statements executed without parameters.
///
/// Strings are quoted with their single quotes doubled, objects are written
/// as quoted JSON text and named placeholders as `:name`.
#[derive(Debug)]
pub struct Inline<'a> {
    appender: SqlAppender<'a>,
    escaper: Box<dyn NameEscaper>,
}

impl<'a> Inline<'a> {
    pub fn with_escaper(catalog: &'a Catalog, escaper: impl NameEscaper + 'static) -> Self {
        Inline {
            appender: SqlAppender::new(catalog),
            escaper: Box::new(escaper),
        }
    }
}

impl<'a> Renderer<'a> for Inline<'a> {
    type Output = String;

    fn new(catalog: &'a Catalog) -> Self {
        Self::with_escaper(catalog, NoEscape)
    }

    fn finish(self) -> String {
        self.appender.template()
    }

    fn appender(&self) -> &SqlAppender<'a> {
        &self.appender
    }

    fn appender_mut(&mut self) -> &mut SqlAppender<'a> {
        &mut self.appender
    }

    fn escaper(&self) -> &dyn NameEscaper {
        self.escaper.as_ref()
    }

    fn visit_value(&mut self, value: &Value) {
        match value {
            Value::Null => self.write("null"),
            Value::Bool(b) => self.write(b),
            Value::Number(n) => self.write(n),
            Value::String(s) => self.write(quote(s)),
            Value::Array(items) => {
                let len = items.len();

                for (i, item) in items.iter().enumerate() {
                    self.visit_value(item);

                    if i < (len - 1) {
                        self.write(", ");
                    }
                }
            }
            Value::Object(_) => self.write(quote(&value.to_string())),
        }
    }

    fn visit_named(&mut self, name: &str, _expandable: bool) {
        self.write(":");
        self.write(name);
    }
}

fn quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}
