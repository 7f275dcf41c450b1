use rand::Rng;

const SUFFIX_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const SUFFIX_LEN: usize = 9;

/// `<prefix>_<epoch millis>_<9 base36 chars>`. Unique within a process with
/// overwhelming probability, nothing stronger.
pub fn new_result_id(prefix: &str) -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..SUFFIX_LEN)
        .map(|_| SUFFIX_ALPHABET[rng.gen_range(0..SUFFIX_ALPHABET.len())] as char)
        .collect();

    format!("{}_{}_{}", prefix, chrono::Utc::now().timestamp_millis(), suffix)
}
