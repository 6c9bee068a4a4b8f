//! Hint label generation
//!
//! Produces a balanced, prefix-free label set over the configured
//! character set. Labels are base-`k` strings in charset order: pick the
//! smallest length `L` with `k^L >= n`, enumerate the first `n` length-`L`
//! strings, then collapse the tail parent to its shorter prefix when it
//! has exactly one used descendant. Every label ends up at depth `L` or
//! `L-1`, so no pick needs a disambiguation delay and no label is longer
//! than `ceil(log_k n)`.

use crate::error::{Error, Result};

/// Generate `n` distinct uppercase prefix-free labels over `chars`.
///
/// Deterministic in `(n, chars)`; ties follow charset order. Runs in
/// O(n·L) for `L = ceil(log_k n)`.
pub fn generate_labels(n: usize, chars: &str) -> Result<Vec<String>> {
    let alphabet: Vec<char> = chars.chars().map(|c| c.to_ascii_uppercase()).collect();
    let k = alphabet.len();
    if k < 2 {
        return Err(Error::Config(format!(
            "hint character set needs at least 2 characters, got {k}"
        )));
    }
    if n == 0 {
        return Ok(Vec::new());
    }
    if n == 1 {
        return Ok(vec![alphabet[0].to_string()]);
    }

    // Smallest L with k^L >= n
    let mut len = 1usize;
    let mut capacity = k;
    while capacity < n {
        capacity = capacity.saturating_mul(k);
        len += 1;
    }

    // First n length-L strings, counting in base k over the charset
    let mut labels = Vec::with_capacity(n);
    let mut digits = vec![0usize; len];
    for _ in 0..n {
        labels.push(digits.iter().map(|&d| alphabet[d]).collect::<String>());
        for pos in (0..len).rev() {
            digits[pos] += 1;
            if digits[pos] < k {
                break;
            }
            digits[pos] = 0;
        }
    }

    // The used strings form a charset-order prefix, so at most the final
    // parent holds a single used descendant; collapse it to the parent.
    if len > 1 && n % k == 1 {
        if let Some(last) = labels.last_mut() {
            last.pop();
        }
    }

    Ok(labels)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_prefix_free(labels: &[String]) {
        for (i, a) in labels.iter().enumerate() {
            for (j, b) in labels.iter().enumerate() {
                if i != j {
                    assert!(
                        !b.starts_with(a.as_str()),
                        "{a:?} is a prefix of {b:?}"
                    );
                }
            }
        }
    }

    fn max_len(n: usize, k: usize) -> usize {
        // ceil(log_k n) computed the same way as the generator
        let mut len = 1;
        let mut capacity = k;
        while capacity < n {
            capacity *= k;
            len += 1;
        }
        len
    }

    #[test]
    fn test_three_elements_single_chars() {
        let labels = generate_labels(3, "asdf").unwrap();
        assert_eq!(labels, vec!["A", "S", "D"]);
    }

    #[test]
    fn test_tail_collapse() {
        // 5 over k=4: four length-2 labels plus one collapsed single
        let labels = generate_labels(5, "asdf").unwrap();
        assert_eq!(labels, vec!["AA", "AS", "AD", "AF", "S"]);
    }

    #[test]
    fn test_exact_power_stays_flat() {
        let labels = generate_labels(4, "ab").unwrap();
        assert_eq!(labels, vec!["AA", "AB", "BA", "BB"]);
    }

    #[test]
    fn test_empty_and_singleton() {
        assert!(generate_labels(0, "ab").unwrap().is_empty());
        assert_eq!(generate_labels(1, "xyz").unwrap(), vec!["X"]);
    }

    #[test]
    fn test_small_charset_rejected() {
        assert!(generate_labels(3, "a").is_err());
        assert!(generate_labels(3, "").is_err());
    }

    #[test]
    fn test_properties_hold_across_sizes() {
        for chars in ["ab", "asdf", "asdfghjkl", "asdfghjklqwertyuiopzxcvbnm"] {
            let k = chars.len();
            for n in 0..200 {
                let labels = generate_labels(n, chars).unwrap();
                assert_eq!(labels.len(), n);
                assert_prefix_free(&labels);
                let mut sorted = labels.clone();
                sorted.sort();
                sorted.dedup();
                assert_eq!(sorted.len(), n, "duplicates for n={n} chars={chars}");
                for label in &labels {
                    assert!(label.chars().all(|c| c.is_ascii_uppercase()
                        && chars.to_ascii_uppercase().contains(c)));
                    if n >= 2 {
                        assert!(label.len() <= max_len(n, k));
                        assert!(label.len() + 1 >= max_len(n, k), "unbalanced label {label:?}");
                    }
                }
            }
        }
    }

    #[test]
    fn test_deterministic() {
        let a = generate_labels(57, "asdfghjkl").unwrap();
        let b = generate_labels(57, "asdfghjkl").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_charset_order_not_ascii_order() {
        // "sa" orders S before A
        let labels = generate_labels(3, "sa").unwrap();
        assert_eq!(labels, vec!["SS", "SA", "A"]);
    }
}
