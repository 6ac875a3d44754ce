use alloc::{string::String, vec::Vec};

use crate::errors::ResolveErrorKind;

/// Classes currently being resolved, from the requested one to the innermost dependency
#[derive(Debug, Default)]
pub(crate) struct ResolutionPath {
    classes: Vec<String>,
}

impl ResolutionPath {
    #[inline]
    #[must_use]
    pub(crate) const fn new() -> Self {
        Self { classes: Vec::new() }
    }

    /// Pushes the class to the path.
    ///
    /// # Errors
    /// Returns [`ResolveErrorKind::CircularBinding`] if the class is already in progress
    /// or the path already has `max_depth` classes
    pub(crate) fn enter(&mut self, class: &str, max_depth: usize) -> Result<(), ResolveErrorKind> {
        if self.classes.len() >= max_depth || self.classes.iter().any(|in_progress| in_progress == class) {
            let mut chain = self.classes.clone();
            chain.push(class.into());
            return Err(ResolveErrorKind::CircularBinding { chain });
        }

        self.classes.push(class.into());
        Ok(())
    }

    #[inline]
    pub(crate) fn leave(&mut self) {
        self.classes.pop();
    }

    #[inline]
    #[must_use]
    pub(crate) fn depth(&self) -> usize {
        self.classes.len()
    }
}
