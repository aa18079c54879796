//! Memoizing chain evaluator for recursive parent-chain computations.
//!
//! A [`Recursive<T>`] represents a lazily computed value attached to one node
//! of a parent chain, where the node's value is defined in terms of its
//! parent's value (for example "this node's weight plus the accumulated
//! weight of every ancestor"). Written as a literal recursive call, a chain
//! of a few hundred thousand links overflows the call stack; [`value()`]
//! instead flattens the chain into an explicit pending list and folds it
//! back down iteratively, so stack usage stays constant regardless of chain
//! length.
//!
//! [`value()`]: Recursive::value
//!
//! # Memoization
//!
//! [`Recursive::recurse`] writes the computed value into a fill-once slot on
//! every node it folds through. Give each node in the chain its own
//! `Rc<Recursive<T>>` and hand that same handle out from the child's
//! recursion closure; once any descendant has been evaluated, every node on
//! the walked path answers `value()` in O(1) without touching the chain
//! again.
//!
//! [`Recursive::recurse_no_cache`] runs the same algorithm but never reads
//! or writes the cache slot. This is only useful when the per-node
//! contributions can change between calls: querying every node of a
//! 5,000-link chain is a few milliseconds cached and re-walks quadratically
//! (hundreds of milliseconds) uncached.
//!
//! # Threading
//!
//! Evaluation is single-threaded by contract and by type. The cache slot is
//! an unsynchronized [`OnceCell`] and handles are [`Rc`], so `Recursive<T>`
//! is neither `Send` nor `Sync`; a graph that must serve several threads
//! needs one owning thread serializing the queries.

use std::cell::OnceCell;
use std::fmt;
use std::rc::Rc;

use smallvec::SmallVec;
use tracing::trace;

/// A lazily computed value attached to one node of a parent chain.
///
/// Construct terminals with [`Recursive::stop`] and computing nodes with
/// [`Recursive::recurse`] / [`Recursive::recurse_no_cache`], then query with
/// [`Recursive::value`].
pub enum Recursive<T: 'static> {
    /// Terminal node holding an already-known value; forward traversal
    /// stops here.
    Stop(T),
    /// Node whose value still has to be computed from the parent chain.
    Active(Active<T>),
}

/// Payload of [`Recursive::Active`]: the node's reducer, its link to the
/// parent evaluator, and the fill-once cache slot.
pub struct Active<T: 'static> {
    reducer: Box<dyn Fn(T) -> T>,
    recursion: Box<dyn Fn() -> Rc<Recursive<T>>>,
    caching: bool,
    cached: OnceCell<T>,
}

impl<T: 'static> Recursive<T> {
    /// A terminal evaluator holding `identity`. This is where a chain walk
    /// stops; typically the recursion closure of the chain's first node
    /// returns `Rc::new(Recursive::stop(identity))`.
    #[inline]
    pub fn stop(identity: T) -> Self {
        Recursive::Stop(identity)
    }

    /// A caching evaluator.
    ///
    /// `reducer` receives the parent's computed value and combines it with
    /// this node's own contribution (available to the closure by capture).
    /// `recursion` must yield the parent node's evaluator handle - the same
    /// `Rc` every time, or memoization degenerates into re-walking.
    pub fn recurse<F, G>(reducer: F, recursion: G) -> Self
    where
        F: Fn(T) -> T + 'static,
        G: Fn() -> Rc<Recursive<T>> + 'static,
    {
        Recursive::Active(Active {
            reducer: Box::new(reducer),
            recursion: Box::new(recursion),
            caching: true,
            cached: OnceCell::new(),
        })
    }

    /// A variant of [`Recursive::recurse`] that never caches. Only useful
    /// when the values in the chain can change from invocation to
    /// invocation; if the chain is long and every node gets queried, this
    /// is quadratic where the caching variant is linear.
    pub fn recurse_no_cache<F, G>(reducer: F, recursion: G) -> Self
    where
        F: Fn(T) -> T + 'static,
        G: Fn() -> Rc<Recursive<T>> + 'static,
    {
        Recursive::Active(Active {
            reducer: Box::new(reducer),
            recursion: Box::new(recursion),
            caching: false,
            cached: OnceCell::new(),
        })
    }
}

impl<T: Clone + 'static> Recursive<T> {
    /// The fully reduced value for this node's position in the chain:
    /// either the cached/terminal value, or the result of walking the chain
    /// forward to the nearest node with a known value and folding the
    /// reducers back down. Stack usage is constant in the chain length.
    pub fn value(&self) -> T {
        match self {
            Recursive::Stop(identity) => identity.clone(),
            Recursive::Active(active) => active.value(),
        }
    }

    /// The value this node can produce without any walk: the terminal
    /// identity, or a previously cached result.
    #[inline]
    fn known_value(&self) -> Option<T> {
        match self {
            Recursive::Stop(identity) => Some(identity.clone()),
            Recursive::Active(active) => active.cached.get().cloned(),
        }
    }
}

impl<T: Clone + 'static> Active<T> {
    fn value(&self) -> T {
        if let Some(cached) = self.cached.get() {
            return cached.clone();
        }

        // Immediate parent; an active node always has one. If the chain is
        // being traversed child-by-child from its start, every query after
        // the first lands here and no pending list is ever allocated.
        let parent = (self.recursion)();
        if let Some(parent_value) = parent.known_value() {
            let value = (self.reducer)(parent_value);
            self.store(&value);
            return value;
        }

        // Forward walk: flatten the chain into a pending list until a node
        // with a known value is found. A flat loop, not recursion - the
        // chain may be millions of links long.
        let mut pending: SmallVec<[Rc<Recursive<T>>; 8]> = SmallVec::new();
        let mut cursor = parent;
        let seed = loop {
            let next = match cursor.as_ref() {
                Recursive::Active(active) => (active.recursion)(),
                Recursive::Stop(_) => unreachable!("walked nodes have no known value"),
            };
            pending.push(cursor);
            match next.known_value() {
                Some(value) => break value,
                None => cursor = next,
            }
        };

        trace!(
            target: "stackfold::recursive",
            pending = pending.len(),
            "chain flattened, folding back"
        );

        // Backward fold: apply reducers from the node nearest the terminal
        // out to this one, committing each node's slot as its reducer
        // returns. Order matters for non-commutative reducers.
        let mut value = seed;
        for node in pending.iter().rev() {
            let Recursive::Active(active) = node.as_ref() else {
                unreachable!("walked nodes have no known value");
            };
            value = (active.reducer)(value);
            active.store(&value);
        }
        let value = (self.reducer)(value);
        self.store(&value);
        value
    }

    /// Commit a computed value to this node's slot, if this node caches.
    /// The slot is fill-once; a slot that somehow got filled mid-fold (a
    /// reducer re-entering the chain) keeps its first value.
    #[inline]
    fn store(&self, value: &T) {
        if self.caching {
            let _ = self.cached.set(value.clone());
        }
    }
}

impl<T: fmt::Debug + 'static> fmt::Debug for Recursive<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Recursive::Stop(identity) => f.debug_tuple("Stop").field(identity).finish(),
            Recursive::Active(active) => f
                .debug_struct("Active")
                .field("caching", &active.caching)
                .field("cached", &active.cached.get())
                .finish_non_exhaustive(),
        }
    }
}
