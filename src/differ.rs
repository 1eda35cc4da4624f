//! SDP Differ.
//!
//! `SdpDiffer(a, b)` finds the ssrc lines and ssrc-groups present in `a` but
//! absent from `b`, grouped by media-section index, and can render the
//! result as a Jingle `source-add`/`source-remove` payload. Two calls per
//! renegotiation compute the removal and addition sets:
//! `Differ(new, old).to_jingle(...)` for `source-remove`,
//! `Differ(old, new).to_jingle(...)` for `source-add`.

use std::collections::HashSet;

use minidom::Element;

use crate::jingle::action::Action;
use crate::jingle::codec::{build_source_element, build_ssrc_group, group_ssrc_lines};
use crate::jingle::creator::Creator;
use crate::jingle::ns;
use crate::sdp::SdpSnapshot;
use crate::sdp::lines::find_lines;

/// The `a=ssrc:`/`a=ssrc-group:` lines present in `a` but not `b`, for one
/// media section.
#[derive(Debug, Default)]
struct SectionDiff {
    mid: Option<String>,
    ssrc_lines: Vec<String>,
    group_lines: Vec<String>,
}

impl SectionDiff {
    fn is_empty(&self) -> bool {
        self.ssrc_lines.is_empty() && self.group_lines.is_empty()
    }
}

/// Computes the per-media-section source/ssrc-group set difference between
/// two SDP snapshots.
pub struct SdpDiffer<'a> {
    a: &'a SdpSnapshot,
    b: &'a SdpSnapshot,
}

impl<'a> SdpDiffer<'a> {
    #[must_use]
    pub fn new(a: &'a SdpSnapshot, b: &'a SdpSnapshot) -> Self {
        Self { a, b }
    }

    fn diff_sections(&self) -> Vec<SectionDiff> {
        let count = self.a.media.len();
        (0..count)
            .map(|i| {
                let mid = self.a.find_line(i, "a=mid:").map(|l| l.trim_start_matches("a=mid:").to_owned());

                let a_ssrc: HashSet<&str> = find_lines(&self.a.media[i], "a=ssrc:").into_iter().collect();
                let b_ssrc: HashSet<&str> = self.b.media.get(i).map(|block| find_lines(block, "a=ssrc:").into_iter().collect()).unwrap_or_default();
                let ssrc_lines: Vec<String> = a_ssrc.difference(&b_ssrc).map(|l| (*l).to_owned()).collect();

                let a_group: HashSet<&str> = find_lines(&self.a.media[i], "a=ssrc-group:").into_iter().collect();
                let b_group: HashSet<&str> =
                    self.b.media.get(i).map(|block| find_lines(block, "a=ssrc-group:").into_iter().collect()).unwrap_or_default();
                let group_lines: Vec<String> = a_group.difference(&b_group).map(|l| (*l).to_owned()).collect();

                SectionDiff { mid, ssrc_lines, group_lines }
            })
            .collect()
    }

    /// `true` iff this diff contains no ssrc or ssrc-group additions at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.diff_sections().iter().all(SectionDiff::is_empty)
    }

    /// The bare ssrc ids this diff covers, across all media sections —
    /// handed to [`crate::conference::ConferenceSink::on_ssrc_update`]
    /// without the caller needing to re-walk any XML.
    #[must_use]
    pub fn changed_ssrcs(&self) -> Vec<u32> {
        self.diff_sections()
            .iter()
            .flat_map(|s| group_ssrc_lines(s.ssrc_lines.iter().map(String::as_str).collect()))
            .filter_map(|(ssrc, _)| ssrc.parse().ok())
            .collect()
    }

    /// Render the diff as a `<jingle>` element with one `<content>` per
    /// affected media section. Returns `None` if nothing would be emitted —
    /// callers should skip sending the stanza in that case.
    #[must_use]
    pub fn to_jingle(&self, action: Action, session_id: &str, our_role: Creator) -> Option<Element> {
        let sections: Vec<SectionDiff> = self.diff_sections().into_iter().filter(|s| !s.is_empty()).collect();
        if sections.is_empty() {
            return None;
        }

        let mut jingle = Element::builder("jingle", ns::JINGLE).attr("action", action.as_str()).attr("sid", session_id);
        for section in &sections {
            let name = section.mid.clone().unwrap_or_default();
            let mut desc = Element::builder("description", ns::JINGLE_RTP);
            for source in group_ssrc_lines(section.ssrc_lines.iter().map(String::as_str).collect()) {
                desc = desc.append(build_source_element(&source));
            }
            for group_line in &section.group_lines {
                desc = desc.append(build_ssrc_group(group_line));
            }
            let content = Element::builder("content", ns::JINGLE).attr("creator", our_role.as_str()).attr("name", name).append(desc.build()).build();
            jingle = jingle.append(content);
        }
        Some(jingle.build())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "v=0\r\no=- 1 1 IN IP4 0.0.0.0\r\ns=-\r\nt=0 0\r\nm=video 9 UDP/TLS/RTP/SAVPF 96\r\na=mid:video0\r\na=ssrc:222 cname:x\r\na=ssrc:223 cname:x\r\na=ssrc-group:FID 222 223\r\n";

    fn with_added_source(base: &str) -> String {
        base.replacen("a=ssrc-group:FID 222 223\r\n", "a=ssrc-group:FID 222 223\r\na=ssrc:333 cname:x\r\na=ssrc-group:FID 333 334\r\n", 1)
    }

    #[test]
    fn diff_of_identical_snapshots_is_empty() {
        let snap = SdpSnapshot::parse(BASE).unwrap();
        let differ = SdpDiffer::new(&snap, &snap);
        assert!(differ.is_empty());
        assert!(differ.to_jingle(Action::SourceAdd, "sid", Creator::Initiator).is_none());
    }

    #[test]
    fn diff_finds_added_source_and_group() {
        let old = SdpSnapshot::parse(BASE).unwrap();
        let added_text = with_added_source(BASE);
        let new = SdpSnapshot::parse(&added_text).unwrap();

        let added = SdpDiffer::new(&new, &old);
        assert!(!added.is_empty());
        let jingle = added.to_jingle(Action::SourceAdd, "sid", Creator::Initiator).unwrap();
        let content = jingle.get_child("content", ns::JINGLE).unwrap();
        let desc = content.get_child("description", ns::JINGLE_RTP).unwrap();
        assert!(desc.children().any(|c| c.is("source", ns::JINGLE_RTP_SSMA) && c.attr("ssrc") == Some("333")));
        assert!(desc.children().any(|c| c.is("ssrc-group", ns::JINGLE_RTP_SSMA)));

        let removed = SdpDiffer::new(&old, &new);
        assert!(removed.is_empty());
    }

    #[test]
    fn symmetric_difference_covers_both_directions() {
        let old = SdpSnapshot::parse(BASE).unwrap();
        let added_text = with_added_source(BASE);
        let new = SdpSnapshot::parse(&added_text).unwrap();

        let add_jingle = SdpDiffer::new(&new, &old).to_jingle(Action::SourceAdd, "sid", Creator::Initiator);
        let remove_jingle = SdpDiffer::new(&old, &new).to_jingle(Action::SourceRemove, "sid", Creator::Initiator);
        assert!(add_jingle.is_some());
        assert!(remove_jingle.is_none());
    }
}
