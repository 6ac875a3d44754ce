/// Config for a container
/// ## Fields
/// - `max_depth`:
///   Maximum length of the resolution path (bindings and auto-wired parameters)
///   a single resolution may reach before it fails with [`crate::ResolveErrorKind::CircularBinding`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    pub max_depth: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self { max_depth: 128 }
    }
}
