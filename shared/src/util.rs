/// 获取当前 UTC 时间戳（毫秒）
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Milliseconds in one day
pub const MILLIS_PER_DAY: i64 = 86_400_000;

/// Generate a Snowflake-style i64 for embedded sub-document IDs.
///
/// Layout (53 bits, fits in JavaScript's Number.MAX_SAFE_INTEGER):
///   - 41 bits: milliseconds since 2024-01-01 UTC (~69 years)
///   - 12 bits: random (4096 values per ms)
///
/// Reviews, employees, inventory items, payments and fees live inside their
/// parent document and are addressed by these ids.
pub fn snowflake_id() -> i64 {
    use rand::Rng;
    // Custom epoch: 2024-01-01 00:00:00 UTC
    const EPOCH_MS: i64 = 1_704_067_200_000;
    let now = now_millis();
    let ts = (now - EPOCH_MS) & 0x1FF_FFFF_FFFF; // 41 bits
    let rand_bits: i64 = rand::thread_rng().gen_range(0..0x1000); // 12 bits
    (ts << 12) | rand_bits
}

/// Random 20-character record key, the same alphabet SurrealDB uses for
/// generated ids. Lets a record id be known before the record is written.
pub fn record_key() -> String {
    use rand::Rng;
    use rand::distributions::Alphanumeric;
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(20)
        .map(|b| char::from(b).to_ascii_lowercase())
        .collect()
}

/// Whole days elapsed from `from` to `to`, rounded up. Zero when `to <= from`.
pub fn days_between_ceil(from: i64, to: i64) -> i64 {
    if to <= from {
        return 0;
    }
    (to - from + MILLIS_PER_DAY - 1) / MILLIS_PER_DAY
}
