//! Scenario tests for the one-shot fold trampoline: classic recursive
//! definitions written against `Trampoline` and checked against known
//! values, including chains deep enough that literal recursion would
//! overflow the stack.

use stackfold::Trampoline;

fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn compute_triangular(n: i64) -> Trampoline<i64, i64> {
    if n == 0 {
        return Trampoline::stop(0);
    }
    Trampoline::recurse(n, |n, parent| *n + parent, |n| compute_triangular(n - 1))
}

fn compute_factorial(n: i64) -> Trampoline<i64, f64> {
    if n == 0 {
        return Trampoline::stop(1.0);
    }
    Trampoline::recurse(
        n,
        |n, parent| *n as f64 * parent,
        |n| compute_factorial(n - 1),
    )
}

/// Fibonacci pair state: `a` is fib(n), `b` is fib(n + 1). Additions wrap,
/// matching two's-complement 64-bit accumulation for large n.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct FibPair {
    a: i64,
    b: i64,
}

fn compute_fibonacci(n: i64) -> Trampoline<i64, FibPair> {
    if n == 0 {
        return Trampoline::stop(FibPair { a: 0, b: 1 });
    }
    Trampoline::recurse(
        n,
        |_n, parent: FibPair| FibPair {
            a: parent.b,
            b: parent.a.wrapping_add(parent.b),
        },
        |n| compute_fibonacci(n - 1),
    )
}

fn is_palindrome(s: &str) -> Trampoline<String, bool> {
    if s.len() <= 1 {
        return Trampoline::stop(true);
    }
    let bytes = s.as_bytes();
    if bytes[0] != bytes[bytes.len() - 1] {
        return Trampoline::stop(false);
    }
    Trampoline::recurse(
        s.to_string(),
        |_s, parent| parent,
        |s| is_palindrome(&s[1..s.len() - 1]),
    )
}

fn triangular(n: i64) -> i64 {
    n * (n + 1) / 2
}

#[test]
fn test_triangular() {
    init_tracing();
    for n in [0, 1, 2, 3, 4, 500, 10_000] {
        assert_eq!(compute_triangular(n).compute(), triangular(n), "n = {n}");
    }
}

#[test]
fn test_triangular_deep_chain() {
    // Far past any plausible stack limit for literal recursion.
    let n = 2_539_071;
    assert_eq!(compute_triangular(n).compute(), triangular(n));
}

#[test]
fn test_factorial() {
    assert_eq!(compute_factorial(0).compute(), 1.0);
    assert_eq!(compute_factorial(1).compute(), 1.0);
    assert_eq!(compute_factorial(8).compute(), 40_320.0);
    // Ascending multiplication order makes this IEEE-exact.
    assert_eq!(compute_factorial(100).compute(), 9.33262154439441e157);
}

#[test]
fn test_fibonacci() {
    assert_eq!(compute_fibonacci(0).compute(), FibPair { a: 0, b: 1 });
    assert_eq!(compute_fibonacci(1).compute().a, 1);
    assert_eq!(compute_fibonacci(2).compute().a, 1);
    assert_eq!(compute_fibonacci(3).compute().a, 2);
}

#[test]
fn test_fibonacci_wraps_at_64_bits() {
    // fib(1200) mod 2^64, reproduced bit for bit.
    assert_eq!(compute_fibonacci(1200).compute().a, 8665637060948656192);
}

#[test]
fn test_palindromes() {
    assert!(is_palindrome("").compute());
    assert!(is_palindrome("x").compute());
    assert!(is_palindrome("xx").compute());
    assert!(is_palindrome("xax").compute());
    assert!(is_palindrome("testset").compute());
    assert!(is_palindrome("amanaplanacanalpanama").compute());
}

#[test]
fn test_non_palindromes() {
    assert!(!is_palindrome("xaf").compute());
    assert!(!is_palindrome("amanaplanacanalpanamx").compute());
    assert!(!is_palindrome("amanaplanacxnalpanama").compute());
    assert!(!is_palindrome("amanaplanacxanalpanama").compute());
}
