const MAX_BATCH_CONCURRENCY: usize = 32;

/// Environment variable overriding the CPU-derived batch concurrency
pub const BATCH_CONCURRENCY_ENV: &str = "NFPREP_BATCH_CONCURRENCY";

fn default_batch_concurrency() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
        .clamp(1, MAX_BATCH_CONCURRENCY)
}

fn parse_batch_concurrency(raw: Option<&str>, default_value: usize) -> usize {
    raw.map(str::trim)
        .filter(|v| !v.is_empty())
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(default_value)
        .clamp(1, MAX_BATCH_CONCURRENCY)
}

/// Files processed at once: `configured` if set, else the environment,
/// else the CPU count; always within `1..=32`
pub fn batch_concurrency(configured: Option<usize>) -> usize {
    if let Some(value) = configured {
        return value.clamp(1, MAX_BATCH_CONCURRENCY);
    }
    let raw = std::env::var(BATCH_CONCURRENCY_ENV).ok();
    parse_batch_concurrency(raw.as_deref(), default_batch_concurrency())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_batch_concurrency_defaults_and_clamps() {
        let default_value = default_batch_concurrency();
        assert_eq!(parse_batch_concurrency(None, default_value), default_value);
        assert_eq!(
            parse_batch_concurrency(Some("   "), default_value),
            default_value
        );
        assert_eq!(parse_batch_concurrency(Some("2"), default_value), 2);
        assert_eq!(parse_batch_concurrency(Some("0"), default_value), 1);
        assert_eq!(
            parse_batch_concurrency(Some("999"), default_value),
            MAX_BATCH_CONCURRENCY
        );
        assert_eq!(
            parse_batch_concurrency(Some("abc"), default_value),
            default_value
        );
        assert_eq!(parse_batch_concurrency(Some(" 5 "), default_value), 5);
    }

    #[test]
    fn configured_value_wins_and_is_clamped() {
        assert_eq!(batch_concurrency(Some(4)), 4);
        assert_eq!(batch_concurrency(Some(0)), 1);
        assert_eq!(batch_concurrency(Some(100)), MAX_BATCH_CONCURRENCY);
    }
}
