//! Matching-blocks string similarity.
//!
//! The score is `2 * M / (len(a) + len(b))` where `M` is the total length
//! of the matching blocks found by repeatedly taking the longest common
//! substring and recursing on the unmatched pieces either side of it.
//! Range 0.0–1.0, 1.0 meaning identical. Thresholds used by the duplicate
//! detector are calibrated against this measure; swapping the scorer
//! means re-tuning them.

/// Similarity ratio between two strings.
pub fn ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    let matched = matched_len(&a, &b);
    2.0 * matched as f64 / total as f64
}

fn matched_len(a: &[char], b: &[char]) -> usize {
    let (ai, bi, len) = longest_common_block(a, b);
    if len == 0 {
        return 0;
    }
    len + matched_len(&a[..ai], &b[..bi]) + matched_len(&a[ai + len..], &b[bi + len..])
}

/// Earliest longest common substring of `a` and `b`, as
/// `(start_a, start_b, len)`. Single rolling row keeps this O(len(b))
/// in memory.
fn longest_common_block(a: &[char], b: &[char]) -> (usize, usize, usize) {
    let mut best = (0, 0, 0);
    let mut prev = vec![0usize; b.len() + 1];
    for (i, ca) in a.iter().enumerate() {
        let mut row = vec![0usize; b.len() + 1];
        for (j, cb) in b.iter().enumerate() {
            if ca == cb {
                let len = prev[j] + 1;
                row[j + 1] = len;
                if len > best.2 {
                    best = (i + 1 - len, j + 1 - len, len);
                }
            }
        }
        prev = row;
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_strings_score_one() {
        assert_eq!(ratio("barcelonarealmadrid", "barcelonarealmadrid"), 1.0);
        assert_eq!(ratio("", ""), 1.0);
    }

    #[test]
    fn disjoint_strings_score_zero() {
        assert_eq!(ratio("abc", "xyz"), 0.0);
        assert_eq!(ratio("", "abc"), 0.0);
    }

    #[test]
    fn known_value() {
        // Blocks: "bcd" (3). 2 * 3 / 8 = 0.75.
        assert!((ratio("abcd", "bcde") - 0.75).abs() < 1e-9);
    }

    #[test]
    fn is_symmetric() {
        let pairs = [
            ("manchesterchelsea", "manchelsea"),
            ("abcd", "bcde"),
            ("barcelona", "barca"),
        ];
        for (a, b) in pairs {
            assert_eq!(ratio(a, b), ratio(b, a), "asymmetric for {a:?}/{b:?}");
        }
    }

    #[test]
    fn abbreviated_matchup_stays_above_threshold() {
        // "Manchester United vs Chelsea" against "Man Utd vs Chelsea",
        // after normalization strips the noise tokens.
        let score = ratio("manchesterchelsea", "manchelsea");
        assert!(score > 0.60, "got {score}");
    }
}
