//! `SdpSnapshot`: the session/media-block value object.
//!
//! Deliberately *not* a grammar-level SDP parser: a snapshot only knows where
//! the session block ends and each `m=` section begins, and exposes
//! [`super::lines::find_line`]/[`find_lines`](super::lines::find_lines) for
//! everything else. Callers needing the `rtpmap`/`fmtp`/`ssrc` contents of a
//! media block get there through those line queries, not through typed
//! fields.

use crate::sdp::lines::{contains_ssrc, find_line, find_lines};
use crate::sdp::sdp_error::SdpError;

/// Session block plus an ordered sequence of per-`m=`-line blocks.
///
/// `raw` always reproduces `session` followed by the concatenation of
/// `media` in order; every mutator on this type preserves that invariant.
#[derive(Debug, Clone, Default)]
pub struct SdpSnapshot {
    pub(crate) session: String,
    pub(crate) media: Vec<String>,
}

impl SdpSnapshot {
    /// Parse a raw SDP text into a snapshot.
    ///
    /// Accepts `\n` or `\r\n` input; every retained line is normalized to a
    /// `\r\n` ending. Lines before the first `m=` line become the session
    /// block; everything from an `m=` line onward becomes that media block's
    /// text, continuing until the next `m=` line.
    ///
    /// # Errors
    /// Returns [`SdpError::Missing`] if the text has no session-level content
    /// at all (an empty session block is never valid SDP).
    pub fn parse(raw: &str) -> Result<Self, SdpError> {
        let mut session = String::new();
        let mut media: Vec<String> = Vec::new();

        for line in raw.split('\n') {
            let line = line.trim_end_matches('\r');
            if line.is_empty() {
                continue;
            }
            if let Some(block) = media.last_mut().filter(|_| !line.starts_with("m=")) {
                block.push_str(line);
                block.push_str("\r\n");
            } else if line.starts_with("m=") {
                media.push(format!("{line}\r\n"));
            } else {
                session.push_str(line);
                session.push_str("\r\n");
            }
        }

        if session.is_empty() {
            return Err(SdpError::Missing("v="));
        }
        Ok(Self { session, media })
    }

    /// Build a snapshot directly from parts, e.g. when synthesizing SDP from
    /// a Jingle `session-initiate`/`-accept` rather than parsing existing
    /// text.
    #[must_use]
    pub fn from_parts(session: String, media: Vec<String>) -> Self {
        Self { session, media }
    }

    #[must_use]
    pub fn session(&self) -> &str {
        &self.session
    }

    #[must_use]
    pub fn media(&self) -> &[String] {
        &self.media
    }

    /// The concatenation `session + join(media)`.
    #[must_use]
    pub fn raw(&self) -> String {
        let mut out = self.session.clone();
        for block in &self.media {
            out.push_str(block);
        }
        out
    }

    #[must_use]
    pub fn find_line<'a>(&'a self, media_index: usize, prefix: &str) -> Option<&'a str> {
        self.media
            .get(media_index)
            .and_then(|block| find_line(block, prefix, Some(&self.session)))
    }

    #[must_use]
    pub fn find_lines(&self, media_index: usize, prefix: &str) -> Vec<&str> {
        self.media.get(media_index).map(|block| find_lines(block, prefix)).unwrap_or_default()
    }

    #[must_use]
    pub fn find_session_line(&self, prefix: &str) -> Option<&str> {
        find_line(&self.session, prefix, None)
    }

    /// `true` iff any media block contains `a=ssrc:<ssrc> `.
    #[must_use]
    pub fn contains_ssrc(&self, ssrc: u32) -> bool {
        self.media.iter().any(|block| contains_ssrc(block, ssrc))
    }

    /// Index of the media block whose `a=mid:` line equals `mid`, if any.
    #[must_use]
    pub fn mid_index(&self, mid: &str) -> Option<usize> {
        let needle = format!("a=mid:{mid}");
        self.media.iter().position(|block| find_line(block, "a=mid:", None) == Some(needle.as_str()))
    }

    /// Append one or more already-CRLF-terminated lines to a media block.
    ///
    /// # Errors
    /// Returns [`SdpError::Invalid`] if `media_index` is out of range.
    pub fn append_lines(&mut self, media_index: usize, lines: impl IntoIterator<Item = String>) -> Result<(), SdpError> {
        let block = self.media.get_mut(media_index).ok_or(SdpError::Invalid("media_index"))?;
        for line in lines {
            block.push_str(line.trim_end_matches(['\r', '\n']));
            block.push_str("\r\n");
        }
        Ok(())
    }

    /// Remove every line in a media block for which `predicate` returns
    /// `true`. Used by the source-remove inbound handler to strip
    /// `a=ssrc:`/`a=ssrc-group:` lines that named a removed source.
    ///
    /// # Errors
    /// Returns [`SdpError::Invalid`] if `media_index` is out of range.
    pub fn remove_lines(&mut self, media_index: usize, mut predicate: impl FnMut(&str) -> bool) -> Result<(), SdpError> {
        let block = self.media.get_mut(media_index).ok_or(SdpError::Invalid("media_index"))?;
        let kept: String = block
            .lines()
            .filter(|line| !predicate(line))
            .map(|line| format!("{line}\r\n"))
            .collect();
        *block = kept;
        Ok(())
    }

    /// Replace the whole media section list, e.g. after a full renegotiation
    /// produced a fresh local description.
    pub fn set_media(&mut self, media: Vec<String>) {
        self.media = media;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const OFFER: &str = "v=0\r\no=- 1 1 IN IP4 0.0.0.0\r\ns=-\r\nt=0 0\r\na=group:BUNDLE audio0 video0\r\nm=audio 1 RTP/AVP 111\r\na=mid:audio0\r\na=ssrc:111 cname:x\r\nm=video 1 RTP/AVP 96\r\na=mid:video0\r\na=ssrc:222 cname:x\r\na=ssrc:223 cname:x\r\na=ssrc-group:FID 222 223\r\n";

    #[test]
    fn parse_splits_session_and_media() {
        let snap = SdpSnapshot::parse(OFFER).unwrap();
        assert_eq!(snap.media.len(), 2);
        assert!(snap.session.starts_with("v=0"));
        assert!(snap.session.contains("a=group:BUNDLE"));
    }

    #[test]
    fn raw_reproduces_input_modulo_line_endings() {
        let snap = SdpSnapshot::parse(OFFER).unwrap();
        let raw = snap.raw();
        assert!(raw.contains("m=audio"));
        assert!(raw.contains("m=video"));
        assert!(raw.ends_with("FID 222 223\r\n"));
    }

    #[test]
    fn parse_rejects_empty_session() {
        assert!(matches!(SdpSnapshot::parse("m=audio 1 RTP/AVP 0\r\n"), Err(SdpError::Missing("v="))));
    }

    #[test]
    fn find_line_falls_back_to_session_group() {
        let snap = SdpSnapshot::parse(OFFER).unwrap();
        assert_eq!(snap.find_line(0, "a=group:"), Some("a=group:BUNDLE audio0 video0"));
    }

    #[test]
    fn mid_index_locates_media_section() {
        let snap = SdpSnapshot::parse(OFFER).unwrap();
        assert_eq!(snap.mid_index("video0"), Some(1));
        assert_eq!(snap.mid_index("nope"), None);
    }

    #[test]
    fn contains_ssrc_checks_all_media() {
        let snap = SdpSnapshot::parse(OFFER).unwrap();
        assert!(snap.contains_ssrc(222));
        assert!(!snap.contains_ssrc(999));
    }

    #[test]
    fn append_and_remove_lines_round_trip() {
        let mut snap = SdpSnapshot::parse(OFFER).unwrap();
        snap.append_lines(1, [String::from("a=ssrc:333 cname:x")]).unwrap();
        assert!(snap.contains_ssrc(333));
        snap.remove_lines(1, |l| l.starts_with("a=ssrc:333")).unwrap();
        assert!(!snap.contains_ssrc(333));
    }
}
