//! Byte ranges into the source text.

/// Half-open byte range `start..end` into a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    pub start: u32,
    pub end: u32,
}

impl Span {
    #[inline]
    pub fn new(start: u32, end: u32) -> Self {
        debug_assert!(start <= end);
        Self { start, end }
    }

    /// Zero-width span at `pos`, used for nodes whose end is not known yet.
    #[inline]
    pub fn empty(pos: u32) -> Self {
        Self::new(pos, pos)
    }

    #[inline]
    pub fn len(&self) -> u32 {
        self.end - self.start
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Whether `offset` lies inside this span.
    ///
    /// The end is exclusive unless `include_right_bound` is set, in which
    /// case an offset sitting exactly on the end also counts.
    #[inline]
    pub fn contains(&self, offset: u32, include_right_bound: bool) -> bool {
        (self.start <= offset && offset < self.end) || (include_right_bound && offset == self.end)
    }

    /// The text this span covers in `source`.
    #[inline]
    pub fn slice<'a>(&self, source: &'a str) -> &'a str {
        &source[self.start as usize..self.end as usize]
    }
}
