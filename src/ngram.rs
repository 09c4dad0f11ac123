//! N-gram extraction over the token stream.
//!
//! Windows of `n` consecutive tokens, stride 1, joined with a single space.
//! Runs in O(total token bytes).

/// Build the n-gram sequence for `tokens`.
///
/// - No tokens: no n-grams.
/// - `tokens.len() <= n`: exactly one n-gram, all tokens joined.
/// - Otherwise `tokens.len() - n + 1` n-grams, the i-th being tokens `[i, i + n)`.
///
/// `n` must be at least 1; configuration validation guarantees that upstream.
pub fn ngrams<S: AsRef<str>>(tokens: &[S], n: usize) -> Vec<String> {
    if tokens.is_empty() {
        return Vec::new();
    }
    if tokens.len() <= n {
        return vec![join(tokens)];
    }

    tokens.windows(n).map(join).collect()
}

fn join<S: AsRef<str>>(window: &[S]) -> String {
    let len = window.iter().map(|t| t.as_ref().len() + 1).sum::<usize>();
    let mut gram = String::with_capacity(len);
    for (i, token) in window.iter().enumerate() {
        if i > 0 {
            gram.push(' ');
        }
        gram.push_str(token.as_ref());
    }
    gram
}
