//! SDP ↔ Jingle Codec.
//!
//! `from_jingle` walks an inbound `<jingle>` element's `<content>` children
//! in document order and synthesizes SDP text. `to_jingle`/
//! `transport_to_jingle` do the inverse, reading an [`SdpSnapshot`]'s media
//! blocks back into `<content>` elements.

use std::fmt;

use minidom::Element;

use crate::config::SessionConfig;
use crate::ice::{IceCandidate, IceCredentials, filter_candidates};
use crate::jingle::action::Action;
use crate::jingle::content::{Fingerprint, IceUdpTransport, JingleContent, PayloadType, RtpDescription, Source, SsrcGroup};
use crate::jingle::creator::Creator;
use crate::jingle::ns;
use crate::jingle::senders::Senders;
use crate::sdp::SdpSnapshot;
use crate::sdp::lines::{find_line, find_lines};

#[derive(Debug)]
pub enum CodecError {
    MissingDescription,
    MissingTransport,
    InvalidPayloadId(String),
    InvalidSsrc(String),
    MediaIndexOutOfRange(usize),
    Sdp(crate::sdp::SdpError),
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingDescription => write!(f, "content is missing a <description>"),
            Self::MissingTransport => write!(f, "content is missing a <transport>"),
            Self::InvalidPayloadId(s) => write!(f, "invalid payload-type id: {s}"),
            Self::InvalidSsrc(s) => write!(f, "invalid ssrc: {s}"),
            Self::MediaIndexOutOfRange(i) => write!(f, "media index {i} out of range"),
            Self::Sdp(e) => write!(f, "{e:?}"),
        }
    }
}

impl std::error::Error for CodecError {}

impl From<crate::sdp::SdpError> for CodecError {
    fn from(e: crate::sdp::SdpError) -> Self {
        Self::Sdp(e)
    }
}

/// `fromJingle`: convert an inbound `<jingle>` element into an [`SdpSnapshot`].
///
/// # Errors
/// Propagates [`CodecError`] if any `<content>` is malformed.
pub fn from_jingle(jingle: &Element, we_are_initiator: bool) -> Result<SdpSnapshot, CodecError> {
    let contents: Vec<JingleContent> = jingle.children().filter(|c| c.is("content", ns::JINGLE)).map(parse_content).collect::<Result<_, _>>()?;

    let mids: Vec<&str> = contents.iter().map(|c| c.name.as_str()).collect();
    let mut session = String::from("v=0\r\no=- 0 0 IN IP4 0.0.0.0\r\ns=-\r\nt=0 0\r\n");
    if !mids.is_empty() {
        session.push_str(&format!("a=group:BUNDLE {}\r\n", mids.join(" ")));
    }

    let media = contents.iter().map(|c| render_content_block(c, we_are_initiator)).collect();
    Ok(SdpSnapshot::from_parts(session, media))
}

fn parse_content(content: &Element) -> Result<JingleContent, CodecError> {
    let name = content.attr("name").unwrap_or("").to_owned();
    let senders = content.attr("senders").and_then(Senders::from_str);

    let description = content
        .get_child("description", ns::JINGLE_RTP)
        .map(parse_description)
        .transpose()?;
    let transport = content.get_child("transport", ns::JINGLE_ICE_UDP).map(|t| parse_transport(t, &name)).transpose()?;

    Ok(JingleContent { name, senders, description, transport })
}

fn parse_description(description: &Element) -> Result<RtpDescription, CodecError> {
    let media = description.attr("media").unwrap_or("audio").to_owned();
    let rtcp_mux = description.get_child("rtcp-mux", ns::JINGLE_RTP).is_some();

    let payload_types = description
        .children()
        .filter(|c| c.is("payload-type", ns::JINGLE_RTP))
        .map(parse_payload_type)
        .collect::<Result<_, _>>()?;

    let sources = description
        .children()
        .filter(|c| c.is("source", ns::JINGLE_RTP_SSMA))
        .map(parse_source)
        .collect::<Result<_, _>>()?;

    let ssrc_groups = description
        .children()
        .filter(|c| c.is("ssrc-group", ns::JINGLE_RTP_SSMA))
        .map(parse_ssrc_group)
        .collect::<Result<_, _>>()?;

    Ok(RtpDescription { media, payload_types, sources, ssrc_groups, rtcp_mux })
}

fn parse_payload_type(pt: &Element) -> Result<PayloadType, CodecError> {
    let id: u8 = pt.attr("id").unwrap_or("0").parse().map_err(|_| CodecError::InvalidPayloadId(pt.attr("id").unwrap_or("").to_owned()))?;
    let name = pt.attr("name").map(str::to_owned);
    let clockrate = pt.attr("clockrate").and_then(|s| s.parse().ok());
    let channels = pt.attr("channels").and_then(|s| s.parse().ok());

    let parameters = pt
        .children()
        .filter(|c| c.name() == "parameter")
        .filter_map(|c| Some((c.attr("name")?.to_owned(), c.attr("value").unwrap_or("").to_owned())))
        .collect();

    let feedback = pt
        .children()
        .filter(|c| c.name() == "rtcp-fb")
        .filter_map(|c| {
            let ty = c.attr("type")?;
            Some(match c.attr("subtype") {
                Some(sub) => format!("{ty} {sub}"),
                None => ty.to_owned(),
            })
        })
        .collect();

    Ok(PayloadType { id, name, clockrate, channels, parameters, feedback })
}

fn parse_source(source: &Element) -> Result<Source, CodecError> {
    let ssrc_attr = source.attr("ssrc").unwrap_or("0");
    let ssrc: u32 = ssrc_attr.parse().map_err(|_| CodecError::InvalidSsrc(ssrc_attr.to_owned()))?;
    let parameters = source
        .children()
        .filter(|c| c.name() == "parameter")
        .filter_map(|c| Some((c.attr("name")?.to_owned(), c.attr("value").map(str::to_owned))))
        .collect();
    Ok(Source { ssrc, parameters })
}

fn parse_ssrc_group(group: &Element) -> Result<SsrcGroup, CodecError> {
    let semantics = group.attr("semantics").unwrap_or("").to_owned();
    let ssrcs = group
        .children()
        .filter(|c| c.name() == "source")
        .filter_map(|c| c.attr("ssrc"))
        .filter_map(|s| s.parse().ok())
        .collect();
    Ok(SsrcGroup { semantics, ssrcs })
}

fn parse_transport(transport: &Element, mid: &str) -> Result<IceUdpTransport, CodecError> {
    let credentials = IceCredentials::new(transport.attr("ufrag").map(str::to_owned), transport.attr("pwd").map(str::to_owned));

    let fingerprint = transport.get_child("fingerprint", ns::JINGLE_DTLS).map(|fp| Fingerprint {
        hash: fp.attr("hash").unwrap_or("").to_owned(),
        value: fp.text(),
        setup: fp.attr("setup").map(str::to_owned),
        required: fp.attr("required") == Some("true"),
    });

    let candidates = transport
        .children()
        .filter(|c| c.name() == "candidate")
        .enumerate()
        .map(|(i, c)| candidate_element_to_sdp(c, mid, i as u32))
        .collect();

    Ok(IceUdpTransport { credentials, fingerprint, candidates })
}

/// Build the raw `candidate:` attribute value XEP-0176 would encode, from a
/// `<candidate>` element's attributes.
fn candidate_element_to_sdp(c: &Element, mid: &str, mline_index: u32) -> IceCandidate {
    let attr = |k: &str| c.attr(k).unwrap_or("0");
    let transport = c.attr("protocol").unwrap_or("udp");
    let mut line = format!(
        "candidate:{} {} {} {} {} {} typ {}",
        attr("foundation"),
        attr("component"),
        transport,
        attr("priority"),
        attr("ip"),
        attr("port"),
        attr("type"),
    );
    if let (Some(raddr), Some(rport)) = (c.attr("rel-addr"), c.attr("rel-port")) {
        line.push_str(&format!(" raddr {raddr} rport {rport}"));
    }
    if transport.eq_ignore_ascii_case("tcp") {
        if let Some(tcptype) = c.attr("tcptype") {
            line.push_str(&format!(" tcptype {tcptype}"));
        }
    }
    if let Some(generation) = c.attr("generation") {
        line.push_str(&format!(" generation {generation}"));
    }
    IceCandidate::new(line, mid.to_owned(), mline_index).unwrap_or(IceCandidate {
        candidate: String::new(),
        sdp_mid: mid.to_owned(),
        sdp_mline_index: mline_index,
        protocol: crate::ice::Protocol::Udp,
    })
}

fn render_content_block(content: &JingleContent, we_are_initiator: bool) -> String {
    let mut out = String::new();
    let Some(desc) = &content.description else {
        return out;
    };
    let fmt_ids: Vec<String> = desc.payload_types.iter().map(|p| p.id.to_string()).collect();
    out.push_str(&format!("m={} 9 UDP/TLS/RTP/SAVPF {}\r\n", desc.media, fmt_ids.join(" ")));
    out.push_str("c=IN IP4 0.0.0.0\r\n");
    out.push_str(&format!("a=mid:{}\r\n", content.name));

    if let Some(senders) = content.senders {
        out.push_str(&format!("a={}\r\n", senders.to_sdp_direction(we_are_initiator)));
    }

    if let Some(transport) = &content.transport {
        if let Some(ufrag) = &transport.credentials.ufrag {
            out.push_str(&format!("a=ice-ufrag:{ufrag}\r\n"));
        }
        if let Some(pwd) = &transport.credentials.pwd {
            out.push_str(&format!("a=ice-pwd:{pwd}\r\n"));
        }
        if let Some(fp) = &transport.fingerprint {
            out.push_str(&format!("a=fingerprint:{} {}\r\n", fp.hash, fp.value));
            if let Some(setup) = &fp.setup {
                out.push_str(&format!("a=setup:{setup}\r\n"));
            }
        }
        for cand in &transport.candidates {
            out.push_str(&format!("a={}\r\n", cand.candidate));
        }
    }

    if desc.rtcp_mux {
        out.push_str("a=rtcp-mux\r\n");
    }

    for pt in &desc.payload_types {
        let mut rtpmap = format!("a=rtpmap:{} {}/{}", pt.id, pt.name.as_deref().unwrap_or("unknown"), pt.clockrate.unwrap_or(0));
        if let Some(ch) = pt.channels {
            rtpmap.push_str(&format!("/{ch}"));
        }
        out.push_str(&rtpmap);
        out.push_str("\r\n");
        if !pt.parameters.is_empty() {
            let params: Vec<String> = pt.parameters.iter().map(|(k, v)| format!("{k}={v}")).collect();
            out.push_str(&format!("a=fmtp:{} {}\r\n", pt.id, params.join(";")));
        }
        for fb in &pt.feedback {
            out.push_str(&format!("a=rtcp-fb:{} {}\r\n", pt.id, fb));
        }
    }

    for source in &desc.sources {
        if source.parameters.is_empty() {
            out.push_str(&format!("a=ssrc:{}\r\n", source.ssrc));
            continue;
        }
        for (name, value) in &source.parameters {
            match value {
                Some(v) => out.push_str(&format!("a=ssrc:{} {}:{}\r\n", source.ssrc, name, v)),
                None => out.push_str(&format!("a=ssrc:{} {}\r\n", source.ssrc, name)),
            }
        }
    }

    for group in &desc.ssrc_groups {
        let ssrcs: Vec<String> = group.ssrcs.iter().map(u32::to_string).collect();
        out.push_str(&format!("a=ssrc-group:{} {}\r\n", group.semantics, ssrcs.join(" ")));
    }

    out
}

/// `toJingle`: build a full `<jingle>` element (description + transport per
/// content) from the current local SDP, for `session-accept` and similar.
///
/// # Errors
/// Propagates [`CodecError`] if a media block lacks an `a=mid:` line.
pub fn to_jingle(
    action: Action,
    session_id: &str,
    our_role: Creator,
    snapshot: &SdpSnapshot,
    cfg: &SessionConfig,
) -> Result<Element, CodecError> {
    let mut builder = Element::builder("jingle", ns::JINGLE).attr("action", action.as_str()).attr("sid", session_id);
    for (index, _) in snapshot.media.iter().enumerate() {
        builder = builder.append(build_content_element(snapshot, index, our_role, cfg, true)?);
    }
    Ok(builder.build())
}

/// `transportToJingle`: build a `<jingle>` element carrying only the
/// transport (no `<description>`) for one media section, for
/// `transport-accept`/`transport-info`.
///
/// # Errors
/// Propagates [`CodecError`] if `media_index` is out of range or the block
/// lacks an `a=mid:` line.
pub fn transport_to_jingle(
    action: Action,
    session_id: &str,
    our_role: Creator,
    snapshot: &SdpSnapshot,
    media_index: usize,
    cfg: &SessionConfig,
) -> Result<Element, CodecError> {
    if media_index >= snapshot.media.len() {
        return Err(CodecError::MediaIndexOutOfRange(media_index));
    }
    let content = build_content_element(snapshot, media_index, our_role, cfg, false)?;
    Ok(Element::builder("jingle", ns::JINGLE).attr("action", action.as_str()).attr("sid", session_id).append(content).build())
}

/// Same as [`transport_to_jingle`], but the `<candidate>` children come
/// straight from `candidates` instead of being re-derived from whatever
/// `a=candidate:` lines are already baked into `snapshot`'s media block.
/// Used to flush a drip-batched set of freshly gathered local candidates,
/// where the caller has the candidates in hand and the stored snapshot may
/// not reflect them yet.
///
/// # Errors
/// Propagates [`CodecError`] if `media_index` is out of range or the block
/// lacks an `a=mid:` line.
pub fn transport_to_jingle_for_candidates(
    action: Action,
    session_id: &str,
    our_role: Creator,
    snapshot: &SdpSnapshot,
    media_index: usize,
    cfg: &SessionConfig,
    candidates: &[IceCandidate],
) -> Result<Element, CodecError> {
    if media_index >= snapshot.media.len() {
        return Err(CodecError::MediaIndexOutOfRange(media_index));
    }
    let block = &snapshot.media[media_index];
    let mid = find_line(block, "a=mid:", None).map(|l| l.trim_start_matches("a=mid:").to_owned()).unwrap_or_else(|| media_index.to_string());
    let content = Element::builder("content", ns::JINGLE)
        .attr("creator", our_role.as_str())
        .attr("name", mid.as_str())
        .append(build_transport_element(snapshot, media_index, &mid, cfg, Some(candidates))?)
        .build();
    Ok(Element::builder("jingle", ns::JINGLE).attr("action", action.as_str()).attr("sid", session_id).append(content).build())
}

fn build_content_element(snapshot: &SdpSnapshot, media_index: usize, our_role: Creator, cfg: &SessionConfig, with_description: bool) -> Result<Element, CodecError> {
    let block = &snapshot.media[media_index];
    let mid = find_line(block, "a=mid:", None).map(|l| l.trim_start_matches("a=mid:").to_owned()).unwrap_or_else(|| media_index.to_string());

    let mut content = Element::builder("content", ns::JINGLE).attr("creator", our_role.as_str()).attr("name", mid.as_str());

    if with_description {
        content = content.append(build_description_element(block, &mid)?);
    }
    content = content.append(build_transport_element(snapshot, media_index, &mid, cfg, None)?);
    Ok(content.build())
}

fn build_description_element(block: &str, mid: &str) -> Result<Element, CodecError> {
    let media = block.strip_prefix("m=").and_then(|rest| rest.split_whitespace().next()).unwrap_or("audio").to_owned();
    let mut desc = Element::builder("description", ns::JINGLE_RTP).attr("media", media);

    for rtpmap in find_lines(block, "a=rtpmap:") {
        desc = desc.append(build_payload_type(block, rtpmap));
    }
    if find_line(block, "a=rtcp-mux", None).is_some() {
        desc = desc.append(Element::builder("rtcp-mux", ns::JINGLE_RTP).build());
    }
    for source in group_ssrc_lines(find_lines(block, "a=ssrc:")) {
        desc = desc.append(build_source_element(&source));
    }
    for group_line in find_lines(block, "a=ssrc-group:") {
        desc = desc.append(build_ssrc_group(group_line));
    }
    let _ = mid;
    Ok(desc.build())
}

/// Group consecutive `a=ssrc:<id> <name>[:<value>]` lines sharing the same
/// id into one `(ssrc, parameters)` entry, preserving first-seen order.
pub(crate) fn group_ssrc_lines(lines: Vec<&str>) -> Vec<(String, Vec<(String, Option<String>)>)> {
    let mut grouped: Vec<(String, Vec<(String, Option<String>)>)> = Vec::new();
    for line in lines {
        let rest = line.trim_start_matches("a=ssrc:");
        let mut parts = rest.splitn(2, ' ');
        let Some(ssrc) = parts.next() else { continue };
        let param = parts.next().map(|p| {
            let mut kv = p.splitn(2, ':');
            let name = kv.next().unwrap_or("").to_owned();
            let value = kv.next().map(str::to_owned);
            (name, value)
        });

        match grouped.last_mut().filter(|(existing, _)| existing == ssrc) {
            Some((_, params)) => {
                if let Some(p) = param {
                    params.push(p);
                }
            }
            None => {
                let mut params = Vec::new();
                if let Some(p) = param {
                    params.push(p);
                }
                grouped.push((ssrc.to_owned(), params));
            }
        }
    }
    grouped
}

pub(crate) fn build_source_element(source: &(String, Vec<(String, Option<String>)>)) -> Element {
    let mut el = Element::builder("source", ns::JINGLE_RTP_SSMA).attr("ssrc", source.0.as_str());
    for (name, value) in &source.1 {
        let mut param = Element::builder("parameter", ns::JINGLE_RTP_SSMA).attr("name", name.as_str());
        if let Some(v) = value {
            param = param.attr("value", v.as_str());
        }
        el = el.append(param.build());
    }
    el.build()
}

fn build_payload_type(block: &str, rtpmap_line: &str) -> Element {
    let rest = rtpmap_line.trim_start_matches("a=rtpmap:");
    let mut parts = rest.splitn(2, ' ');
    let id = parts.next().unwrap_or("0");
    let codec = parts.next().unwrap_or("unknown/0");
    let mut codec_parts = codec.split('/');
    let name = codec_parts.next().unwrap_or("unknown");
    let clockrate = codec_parts.next().unwrap_or("0");
    let channels = codec_parts.next();

    let mut pt = Element::builder("payload-type", ns::JINGLE_RTP).attr("id", id).attr("name", name).attr("clockrate", clockrate);
    if let Some(ch) = channels {
        pt = pt.attr("channels", ch);
    }

    if let Some(fmtp) = find_line(block, &format!("a=fmtp:{id} "), None) {
        let params = fmtp.splitn(2, ' ').nth(1).unwrap_or("");
        for kv in params.split(';') {
            let mut kv = kv.splitn(2, '=');
            if let (Some(k), Some(v)) = (kv.next(), kv.next()) {
                pt = pt.append(Element::builder("parameter", ns::JINGLE_RTP).attr("name", k.trim()).attr("value", v.trim()).build());
            }
        }
    }
    for fb in find_lines(block, &format!("a=rtcp-fb:{id} ")) {
        let rest = fb.trim_start_matches(&format!("a=rtcp-fb:{id} "));
        let mut fb_parts = rest.splitn(2, ' ');
        let mut elem = Element::builder("rtcp-fb", ns::JINGLE_RTP).attr("type", fb_parts.next().unwrap_or(""));
        if let Some(sub) = fb_parts.next() {
            elem = elem.attr("subtype", sub);
        }
        pt = pt.append(elem.build());
    }
    pt.build()
}

pub(crate) fn build_ssrc_group(group_line: &str) -> Element {
    let rest = group_line.trim_start_matches("a=ssrc-group:");
    let mut parts = rest.split_whitespace();
    let semantics = parts.next().unwrap_or("");
    let mut group = Element::builder("ssrc-group", ns::JINGLE_RTP_SSMA).attr("semantics", semantics);
    for ssrc in parts {
        group = group.append(Element::builder("source", ns::JINGLE_RTP_SSMA).attr("ssrc", ssrc).build());
    }
    group.build()
}

/// `override_candidates`, when given, replaces whatever `a=candidate:`
/// lines already happen to be baked into `snapshot`'s media block — used
/// for transport-info batches built straight from a drip flush rather than
/// from the stored local description.
fn build_transport_element(
    snapshot: &SdpSnapshot,
    media_index: usize,
    mid: &str,
    cfg: &SessionConfig,
    override_candidates: Option<&[IceCandidate]>,
) -> Result<Element, CodecError> {
    let block = &snapshot.media[media_index];
    let mut transport = Element::builder("transport", ns::JINGLE_ICE_UDP);

    if let Some(ufrag) = find_line(block, "a=ice-ufrag:", Some(&snapshot.session)) {
        transport = transport.attr("ufrag", ufrag.trim_start_matches("a=ice-ufrag:"));
    }
    if let Some(pwd) = find_line(block, "a=ice-pwd:", Some(&snapshot.session)) {
        transport = transport.attr("pwd", pwd.trim_start_matches("a=ice-pwd:"));
    }
    if let Some(fp_line) = find_line(block, "a=fingerprint:", None) {
        let rest = fp_line.trim_start_matches("a=fingerprint:");
        let mut parts = rest.splitn(2, ' ');
        let hash = parts.next().unwrap_or("");
        let value = parts.next().unwrap_or("");
        let setup = find_line(block, "a=setup:", None).map(|l| l.trim_start_matches("a=setup:"));
        let mut fp = Element::builder("fingerprint", ns::JINGLE_DTLS).attr("hash", hash).attr("required", "true");
        if let Some(setup) = setup {
            fp = fp.attr("setup", setup);
        }
        transport = transport.append(fp.append(value.to_owned()).build());
    }

    let filtered = match override_candidates {
        Some(cands) => filter_candidates(cands.to_vec(), cfg.webrtc_ice_udp_disable, cfg.webrtc_ice_tcp_disable),
        None => {
            let raw_candidates: Vec<IceCandidate> = find_lines(block, "a=candidate:")
                .into_iter()
                .filter_map(|line| IceCandidate::new(line.to_owned(), mid.to_owned(), media_index as u32))
                .collect();
            filter_candidates(raw_candidates, cfg.webrtc_ice_udp_disable, cfg.webrtc_ice_tcp_disable)
        }
    };
    for (i, cand) in filtered.iter().enumerate() {
        transport = transport.append(candidate_to_element(cand, i as u32, cfg.fail_ice));
    }

    Ok(transport.build())
}

fn candidate_to_element(cand: &IceCandidate, generation_fallback: u32, fail_ice: bool) -> Element {
    let wire = cand.candidate_for_wire(fail_ice);
    let body = wire.trim_start_matches("candidate:");
    let mut tokens = body.split_whitespace();
    let foundation = tokens.next().unwrap_or("0");
    let component = tokens.next().unwrap_or("1");
    let protocol = tokens.next().unwrap_or("udp");
    let priority = tokens.next().unwrap_or("0");
    let ip = tokens.next().unwrap_or("0.0.0.0");
    let port = tokens.next().unwrap_or("0");
    let remaining: Vec<&str> = tokens.collect();
    let cand_type = remaining.windows(2).find(|w| w[0] == "typ").map(|w| w[1]).unwrap_or("host");
    let generation = remaining.windows(2).find(|w| w[0] == "generation").map(|w| w[1].to_owned()).unwrap_or_else(|| generation_fallback.to_string());

    let mut el = Element::builder("candidate", ns::JINGLE_ICE_UDP)
        .attr("foundation", foundation)
        .attr("component", component)
        .attr("protocol", protocol)
        .attr("priority", priority)
        .attr("ip", ip)
        .attr("port", port)
        .attr("type", cand_type)
        .attr("generation", generation)
        .attr("id", foundation);
    if let Some(pos) = remaining.windows(2).position(|w| w[0] == "tcptype") {
        el = el.attr("tcptype", remaining[pos + 1]);
    }
    el.build()
}
