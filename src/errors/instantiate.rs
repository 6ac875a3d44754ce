use alloc::boxed::Box;

use super::resolve::ResolveErrorKind;

/// Error of a factory or a constructor
#[derive(thiserror::Error, Debug)]
pub enum InstantiateErrorKind {
    #[error("Missing constructor argument at position {position}")]
    MissingArgument { position: usize },
    #[error("Incorrect constructor argument at position {position}. Actual: {actual}, expected: {expected}")]
    IncorrectArgument {
        position: usize,
        expected: &'static str,
        actual: &'static str,
    },
    #[error(transparent)]
    Resolve(Box<ResolveErrorKind>),
    #[error(transparent)]
    Custom(#[from] anyhow::Error),
}

impl From<ResolveErrorKind> for InstantiateErrorKind {
    #[inline]
    fn from(err: ResolveErrorKind) -> Self {
        Self::Resolve(Box::new(err))
    }
}
