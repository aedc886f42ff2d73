//! In-process container backing a single response or CLI render.

use std::sync::{Mutex, PoisonError};

use crate::application::ports::Container;

#[derive(Debug, Default)]
pub struct HtmlBuffer {
    markup: Mutex<Option<String>>,
}

impl HtmlBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_markup(self) -> Option<String> {
        self.markup
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl Container for HtmlBuffer {
    fn replace(&self, markup: String) {
        *self.markup.lock().unwrap_or_else(PoisonError::into_inner) = Some(markup);
    }

    fn current(&self) -> Option<String> {
        self.markup
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}
