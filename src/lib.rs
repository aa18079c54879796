//! Stackfold - Stack-Safe Recursive Chain Evaluation
//!
//! This library evaluates logically-recursive computations over linked parent
//! chains ("this node's value combined with its parent's computed value")
//! without consuming call stack proportional to chain length, so chains of
//! millions of links evaluate safely.
//!
//! # Architecture
//!
//! Two independent components share one algorithm shape: probe one step to
//! see if it terminates immediately; if not, walk forward through the chain
//! in a flat loop, accumulating pending steps until a terminal (or already
//! cached) step is found; then fold backward through the pending list,
//! applying each step's reducer to build the final value.
//!
//! 1. **Memoizing chain evaluator** (`recursive` module)
//!    - [`Recursive<T>`] attaches a lazily computed value to one node
//!    - Caches results in a fill-once slot per node, so repeated queries,
//!      and queries from descendant nodes, are O(1) after the first walk
//!    - A no-cache variant trades that speed for freshness when the
//!      underlying per-node values can change between calls
//!
//! 2. **One-shot fold trampoline** (`trampoline` module)
//!    - [`Trampoline<I, R>`] represents a single step of a recursive fold:
//!      an input, a reducer `(input, parent_result) -> result`, and a
//!      continuation `(input) -> next_step`
//!    - Carries no cache; every `compute()` re-walks and re-folds
//!
//! # Example
//!
//! ```rust
//! use stackfold::Trampoline;
//!
//! fn triangular(n: i64) -> Trampoline<i64, i64> {
//!     if n == 0 {
//!         return Trampoline::stop(0);
//!     }
//!     Trampoline::recurse(n, |n, parent| *n + parent, |n| triangular(n - 1))
//! }
//!
//! // Deep enough to overflow the stack if computed by literal recursion.
//! assert_eq!(triangular(100_000).compute(), 5_000_050_000);
//! ```
//!
//! # Contract
//!
//! Caller-supplied closures are trusted: a recursion closure must always
//! yield a next evaluator, the chain it describes must be finite, and a
//! chain that never reaches a terminal loops forever (the library does not
//! attempt cycle detection). Panics raised inside caller closures propagate
//! unmodified; cache slots are only written after a reducer has returned, so
//! a panicking reducer leaves every uncommitted slot empty.

pub mod recursive;
pub mod trampoline;

pub use recursive::Recursive;
pub use trampoline::Trampoline;
