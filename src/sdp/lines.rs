//! Line-level queries over a single SDP text block (session or media).
//!
//! These are free functions rather than methods on [`super::snapshot::SdpSnapshot`]
//! because they apply equally to the session block and to any one media block —
//! exactly the `findLine`/`findLines` primitives the codec and differ build on.

/// First line in `block` starting with `prefix`; if absent and `session_fallback`
/// is given, search that too.
#[must_use]
pub fn find_line<'a>(block: &'a str, prefix: &str, session_fallback: Option<&'a str>) -> Option<&'a str> {
    find_line_in(block, prefix).or_else(|| session_fallback.and_then(|s| find_line_in(s, prefix)))
}

fn find_line_in<'a>(block: &'a str, prefix: &str) -> Option<&'a str> {
    block.lines().map(str::trim_end).find(|line| line.starts_with(prefix))
}

/// All lines in `block` starting with `prefix`, in order.
#[must_use]
pub fn find_lines<'a>(block: &'a str, prefix: &str) -> Vec<&'a str> {
    block
        .lines()
        .map(str::trim_end)
        .filter(|line| line.starts_with(prefix))
        .collect()
}

/// `true` iff `block` contains an `a=ssrc:<ssrc> ` line.
#[must_use]
pub fn contains_ssrc(block: &str, ssrc: u32) -> bool {
    let needle = format!("a=ssrc:{ssrc} ");
    block.lines().any(|line| line.starts_with(&needle))
}
