/// Immutable ordered sequence of child indices from the root of a [`crate::geometry::CellTree`].
///
/// The root has the empty id. Equality and hashing are by sequence, so a `CellId` can be used
/// directly as a graph node key; this replaces the reference implementation's stringly-typed
/// "dotted id", which existed only to satisfy a string-keyed graph library.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellId(Vec<u32>);

impl CellId {
    /// The id of the root cell (the empty sequence).
    pub fn root() -> Self {
        CellId(Vec::new())
    }

    /// The id of the `index`-th child of this cell.
    pub fn child(&self, index: u32) -> Self {
        let mut path = self.0.clone();
        path.push(index);
        CellId(path)
    }

    pub fn depth(&self) -> usize {
        self.0.len()
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.0
    }
}

impl std::fmt::Display for CellId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.0.is_empty() {
            return write!(f, "<root>");
        }
        let parts: Vec<String> = self.0.iter().map(u32::to_string).collect();
        write!(f, "{}", parts.join("."))
    }
}
