use std::collections::hash_map::RandomState;
use std::fmt;
use std::hash::BuildHasher;
use std::hash::Hash;
use std::hash::Hasher;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;
use std::sync::OnceLock;

/// A thread-safe reference-counted smart pointer for GraphQL nodes.
///
/// Similar to [`std::sync::Arc<T>`] but:
///
/// * In addition to `T`, contains an optional [`SourceSpan`].
///   The span lets errors point at the relevant lines of the source document.
/// * [`std::hash::Hash`] is implemented by caching the result of hashing `T`.
/// * Weak references are not supported.
///
/// For the cache to be correct, **`T` is expected to have a stable hash**
/// as long as no `&mut T` exclusive reference to it is given out.
/// Generally this excludes interior mutability.
pub struct Node<T>(triomphe::Arc<NodeInner<T>>);

struct NodeInner<T> {
    span: Option<SourceSpan>,
    hash_cache: AtomicU64,
    node: T,
}

const HASH_NOT_COMPUTED_YET: u64 = 0;

/// The source location of a parsed node: the lines it covers in the document.
///
/// Spans are advisory. They never affect semantics, only error reporting.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub struct SourceSpan {
    /// Line of the first token of the node, starting at 1.
    pub start_line: u32,
    /// Line of the last token of the node, starting at 1.
    pub end_line: u32,
}

impl SourceSpan {
    pub fn new(start_line: u32, end_line: u32) -> Self {
        Self {
            start_line,
            end_line,
        }
    }

    /// A span covering a single line.
    pub fn line(line: u32) -> Self {
        Self::new(line, line)
    }
}

impl<T> Node<T> {
    /// Create a new `Node` for something parsed from the given source span
    #[inline]
    pub fn new_parsed(node: T, span: SourceSpan) -> Self {
        Self::new_opt_span(node, Some(span))
    }

    /// Create a new `Node` for something created programmatically,
    /// not parsed from a source file
    #[inline]
    pub fn new(node: T) -> Self {
        Self::new_opt_span(node, None)
    }

    pub(crate) fn new_opt_span(node: T, span: Option<SourceSpan>) -> Self {
        Self(triomphe::Arc::new(NodeInner {
            span,
            node,
            hash_cache: AtomicU64::new(HASH_NOT_COMPUTED_YET),
        }))
    }

    pub fn span(&self) -> Option<SourceSpan> {
        self.0.span
    }

    /// Returns the given `node` at the same span as `self` (e.g. for a type conversion).
    pub fn same_span<U>(&self, node: U) -> Node<U> {
        Node::new_opt_span(node, self.0.span)
    }

    // `Arc` APIs

    /// Returns whether two `Node`s point to the same memory allocation
    pub fn ptr_eq(&self, other: &Self) -> bool {
        triomphe::Arc::ptr_eq(&self.0, &other.0)
    }

    /// Returns a mutable reference to `T`, cloning it if necessary
    ///
    /// If this `Node` is uniquely owned, `make_mut()` will provide a mutable
    /// reference to the contents. If not, `make_mut()` will create a _new_
    /// `Node` with a clone of the contents, update `self` to point to it,
    /// and provide a mutable reference to its contents.
    pub fn make_mut(&mut self) -> &mut T
    where
        T: Clone,
    {
        let inner = triomphe::Arc::make_mut(&mut self.0);
        // Clear the cache as mutation through the returned `&mut T` may invalidate it
        *inner.hash_cache.get_mut() = HASH_NOT_COMPUTED_YET;
        &mut inner.node
    }

    /// Returns a mutable reference to `T` if this `Node` is uniquely owned
    pub fn get_mut(&mut self) -> Option<&mut T> {
        triomphe::Arc::get_mut(&mut self.0).map(|inner| &mut inner.node)
    }
}

impl<T> std::ops::Deref for Node<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0.node
    }
}

impl<T> Clone for Node<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<T: Default> Default for Node<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: fmt::Debug> fmt::Debug for Node<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(span) = self.span() {
            write!(f, "{}..{} ", span.start_line, span.end_line)?
        }
        self.0.node.fmt(f)
    }
}

impl<T: fmt::Display> fmt::Display for Node<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        T::fmt(self, f)
    }
}

impl<T: Eq> Eq for Node<T> {}

impl<T: PartialEq> PartialEq for Node<T> {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) // fast path
        || self.0.node == other.0.node // span and hash_cache not included
    }
}

impl<T: Hash> Hash for Node<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let hash = self.0.hash_cache.load(Ordering::Relaxed);
        if hash != HASH_NOT_COMPUTED_YET {
            // cache hit
            hash
        } else {
            hash_slow_path(&self.0)
        }
        .hash(state)
    }
}

// It is possible for multiple threads to race and take this path for the same `NodeInner`.
// This is ok as they should compute the same result.
#[cold]
#[inline(never)]
fn hash_slow_path<T: Hash>(inner: &NodeInner<T>) -> u64 {
    /// A single process-wide `BuildHasher`,
    /// so that multiple `NodeInner`s with the same contents have the same hash.
    static SHARED_RANDOM: OnceLock<RandomState> = OnceLock::new();
    let mut hasher = SHARED_RANDOM.get_or_init(RandomState::new).build_hasher();
    inner.node.hash(&mut hasher);
    let mut hash = hasher.finish();
    // The marker value must not collide with an actual hash
    if hash == HASH_NOT_COMPUTED_YET {
        hash += 1
    }
    inner.hash_cache.store(hash, Ordering::Relaxed);
    hash
}

impl<T> AsRef<T> for Node<T> {
    fn as_ref(&self) -> &T {
        self
    }
}

impl<T> From<T> for Node<T> {
    fn from(node: T) -> Self {
        Self::new(node)
    }
}

impl<T: Clone> Clone for NodeInner<T> {
    fn clone(&self) -> Self {
        Self {
            span: self.span,
            hash_cache: AtomicU64::new(self.hash_cache.load(Ordering::Relaxed)),
            node: self.node.clone(),
        }
    }
}
