use crate::Value;

/// Mutable state of one rendering pass.
///
/// Collects the ordered parameter list as placeholders are written; the
/// parameter positions always match the textual order of their placeholders,
/// including across nested sub-queries.
#[derive(Debug, Default)]
pub struct Context {
    pub params: Vec<Value>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn take_params(self) -> Vec<Value> {
        self.params
    }
}
