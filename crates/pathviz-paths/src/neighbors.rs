use pathviz_core::Pos;

/// Cached neighbor computation helper.
///
/// Enumerates the axis-aligned neighbors of a grid position in the fixed
/// order up, down, left, right, filtered by a predicate. The order feeds the
/// open-list insertion order and so the search's tie-breaking.
pub(crate) struct Neighbors {
    buf: Vec<Pos>,
}

impl Neighbors {
    /// Create a new `Neighbors` helper.
    pub(crate) fn new() -> Self {
        Self {
            buf: Vec::with_capacity(4),
        }
    }

    /// Return the 4-directional neighbors of `p`, keeping only those for
    /// which `keep` returns `true`.
    pub(crate) fn cardinal(&mut self, p: Pos, keep: impl Fn(Pos) -> bool) -> &[Pos] {
        self.buf.clear();
        for n in p.neighbors_4() {
            if keep(n) {
                self.buf.push(n);
            }
        }
        &self.buf
    }
}
