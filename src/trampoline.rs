//! One-shot fold trampoline for tail-style recursive definitions.
//!
//! A [`Trampoline<I, R>`] is a single step of a recursive fold. Each step
//! carries the input it was created for, a reducer combining that input
//! with the parent step's result, and a continuation producing the next
//! step. [`compute()`] runs the chain of continuations in a flat loop and
//! folds the reducers back down, so a definition like
//!
//! ```rust
//! use stackfold::Trampoline;
//!
//! fn factorial(n: i64) -> Trampoline<i64, f64> {
//!     if n == 0 {
//!         return Trampoline::stop(1.0);
//!     }
//!     Trampoline::recurse(n, |n, parent| *n as f64 * parent, |n| factorial(n - 1))
//! }
//!
//! assert_eq!(factorial(8).compute(), 40_320.0);
//! ```
//!
//! stays stack-safe at any depth. Noticeably slower than writing the loop
//! by hand - the point is keeping a recursive shape without the stack.
//!
//! Unlike [`Recursive`](crate::Recursive) there is no cache: step objects
//! are typically constructed fresh per logical recursion level by the
//! continuation, so there is no node identity to hang a cache on. Repeated
//! [`compute()`] calls on one step re-walk and re-fold deterministically,
//! assuming pure reducer and continuation functions.
//!
//! [`compute()`]: Trampoline::compute

use std::fmt;

use tracing::trace;

/// One step of a recursive fold: either a finished value or a pending
/// computation over an input.
pub enum Trampoline<I: 'static, R: 'static> {
    /// Terminal step holding the finished value.
    Stop(R),
    /// Pending step; [`compute`](Trampoline::compute) runs the chain it
    /// starts.
    Recurse(Step<I, R>),
}

/// Payload of [`Trampoline::Recurse`]: the step's input plus the reducer
/// and continuation working on it.
pub struct Step<I: 'static, R: 'static> {
    input: I,
    reducer: Box<dyn Fn(&I, R) -> R>,
    recursion: Box<dyn Fn(&I) -> Trampoline<I, R>>,
}

impl<I: 'static, R: 'static> Trampoline<I, R> {
    /// A terminal step holding `value`. The recursive definition returns
    /// this at its base case.
    #[inline]
    pub fn stop(value: R) -> Self {
        Trampoline::Stop(value)
    }

    /// A pending step over `input`.
    ///
    /// `recursion(input)` must produce the next step (terminal or pending);
    /// `reducer(input, parent_result)` combines this step's input with the
    /// result computed for the chain above it.
    pub fn recurse<F, G>(input: I, reducer: F, recursion: G) -> Self
    where
        F: Fn(&I, R) -> R + 'static,
        G: Fn(&I) -> Trampoline<I, R> + 'static,
    {
        Trampoline::Recurse(Step {
            input,
            reducer: Box::new(reducer),
            recursion: Box::new(recursion),
        })
    }
}

impl<I: 'static, R: Clone + 'static> Trampoline<I, R> {
    /// The fold result for the chain starting at this step: run the
    /// continuations forward to the first terminal, then apply the reducers
    /// backward, terminal first. Stack usage is constant in the chain
    /// length; every call re-walks from scratch.
    pub fn compute(&self) -> R {
        let step = match self {
            Trampoline::Stop(value) => return value.clone(),
            Trampoline::Recurse(step) => step,
        };

        // Immediate parent; a pending step always has one.
        let mut cursor = match (step.recursion)(&step.input) {
            Trampoline::Stop(value) => return (step.reducer)(&step.input, value),
            Trampoline::Recurse(parent) => parent,
        };

        // Forward walk: run the chain of continuations to the terminal,
        // keeping ownership of every intermediate step for the fold.
        let mut pending: Vec<Step<I, R>> = Vec::new();
        let seed = loop {
            let next = (cursor.recursion)(&cursor.input);
            pending.push(cursor);
            match next {
                Trampoline::Stop(value) => break value,
                Trampoline::Recurse(step) => cursor = step,
            }
        };

        trace!(
            target: "stackfold::trampoline",
            pending = pending.len(),
            "chain flattened, folding back"
        );

        // Backward fold, terminal first, each step reducing over its own
        // stored input; this step's reducer runs last.
        let mut value = seed;
        for step in pending.iter().rev() {
            value = (step.reducer)(&step.input, value);
        }
        (step.reducer)(&step.input, value)
    }
}

impl<I: fmt::Debug + 'static, R: fmt::Debug + 'static> fmt::Debug for Trampoline<I, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Trampoline::Stop(value) => f.debug_tuple("Stop").field(value).finish(),
            Trampoline::Recurse(step) => f
                .debug_struct("Recurse")
                .field("input", &step.input)
                .finish_non_exhaustive(),
        }
    }
}
