//! Sketch keys: short MD5-8 fingerprints used only to narrow candidate
//! lookup in the bucket index. Never a correctness filter — the scorer
//! remains the sole acceptance authority regardless of which keys a
//! fragment carries.

use crate::model::SketchKeys;

/// First 4 bytes of the MD5 digest of `s`, packed big-endian into a `u32`.
/// Equivalent to the source's `hashlib.md5(s).hexdigest()[:8]` truncated
/// hex signature, just without the hex round-trip.
fn md5_8(s: &str) -> u32 {
    let digest = md5::compute(s.as_bytes());
    u32::from_be_bytes([digest[0], digest[1], digest[2], digest[3]])
}

/// Compute a fragment's sketch keys from its `display_text` and whether
/// every token in the fragment is Chinese.
///
/// Pure-Chinese fragments have no word boundaries, so the keys are taken
/// over raw codepoints (first/last 4). Mixed fragments have word-like
/// boundaries marked by the separator spaces `display_text` carries, so
/// the keys are taken over those words, joined back with spaces before
/// hashing (matching the fingerprint the equivalent lookup key would
/// produce on the other document).
pub fn compute_sketch_keys(display_text: &str, is_pure_chinese: bool) -> SketchKeys {
    let mut keys = SketchKeys::new();

    if is_pure_chinese {
        let chars: Vec<char> = display_text.chars().collect();
        let n = chars.len();
        if n > 0 {
            let first_n = n.min(4);
            let first: String = chars[..first_n].iter().collect();
            keys.push(md5_8(&first));
        }
        if n >= 8 {
            let last: String = chars[n - 4..].iter().collect();
            keys.push(md5_8(&last));
        }
    } else {
        let words: Vec<&str> = display_text.split(' ').filter(|w| !w.is_empty()).collect();
        let wn = words.len();

        if wn >= 4 {
            keys.push(md5_8(&words[..4].join(" ")));
            keys.push(md5_8(&words[wn - 4..].join(" ")));
        } else if wn > 0 {
            keys.push(md5_8(&words.join(" ")));
        }

        if wn >= 8 {
            let stride: Vec<&str> = (0..8).step_by(2).map(|i| words[i]).collect();
            keys.push(md5_8(&stride.join(" ")));
        }
    }

    let mut seen = rustc_hash::FxHashSet::default();
    keys.retain(|k| seen.insert(*k));

    if keys.is_empty() {
        keys.push(md5_8(display_text));
    }

    keys
}
