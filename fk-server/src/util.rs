pub fn current_time_u64() -> Result<u64, crate::Error> {
    let n = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map_err(|_e| crate::Error::Unexpected)?
        .as_secs();

    Ok(n)
}

/// Whether `next` may be used as a redirect target after a submission.
///
/// Absolute http(s) URLs and paths on the posting site are accepted.
pub(crate) fn is_redirect_target(next: &str) -> bool {
    next.starts_with("https://")
        || next.starts_with("http://")
        || (next.starts_with('/') && !next.starts_with("//"))
}
