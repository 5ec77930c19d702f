//! Response envelope parsing.
//!
//! Every REST response is an XML document rooted at `rsp`, whose `stat`
//! attribute separates success from failure:
//!
//! ```xml
//! <rsp stat="ok"><tasks rev="4">...</tasks></rsp>
//! <rsp stat="fail"><err code="98" msg="Login failed"/></rsp>
//! ```
//!
//! On success the caller receives the raw bytes between the envelope tags, so
//! per-method decoding stays out of the engine. Failure envelopes become
//! [`ProtocolError`]s without inventing codes: only an explicit `err` element
//! carries service semantics, every other malformation stays a [`DecodeError`].

// crates.io
use quick_xml::{
	Reader,
	events::{BytesStart, Event},
};
// self
use crate::{
	_prelude::*,
	error::{DecodeError, ProtocolError},
};

/// Extracts the success payload from a response envelope.
///
/// Returns the raw XML fragment between `<rsp ...>` and `</rsp>` when the
/// envelope reports `stat="ok"`. A reported `err` element wins over any `stat`
/// value, and a `stat` that is neither `ok` nor backed by an `err` element is
/// surfaced with [`ProtocolError::UNEXPECTED_STAT_CODE`]. Content after the
/// closing tag is not examined.
pub fn parse(body: &[u8]) -> Result<Vec<u8>> {
	let text = std::str::from_utf8(body).map_err(DecodeError::from)?;
	let mut reader = Reader::from_str(text);
	let root = loop {
		match reader.read_event().map_err(DecodeError::from)? {
			Event::Start(e) => break Root::Open(e.into_owned()),
			Event::Empty(e) => break Root::Empty(e.into_owned()),
			Event::Eof => return Err(DecodeError::MissingRoot.into()),
			// Declarations, comments, processing instructions, and stray
			// character data before the root are all skipped.
			_ => continue,
		}
	};
	let start = match &root {
		Root::Open(e) | Root::Empty(e) => e,
	};

	if start.name().as_ref() != b"rsp" {
		return Err(DecodeError::UnexpectedRoot {
			found: String::from_utf8_lossy(start.name().as_ref()).into_owned(),
		}
		.into());
	}

	let stat = attribute(start, "stat")?.unwrap_or_default();

	let (payload, err) = match &root {
		Root::Empty(_) => (Vec::new(), None),
		Root::Open(_) => {
			let inner_start = reader.buffer_position() as usize;
			let mut depth = 0_usize;
			let mut err = None;

			loop {
				let pos = reader.buffer_position() as usize;

				match reader.read_event().map_err(DecodeError::from)? {
					Event::Start(e) => {
						if depth == 0 && e.name().as_ref() == b"err" {
							err = Some(err_element(&e)?);
						}

						depth += 1;
					},
					Event::Empty(e) =>
						if depth == 0 && e.name().as_ref() == b"err" {
							err = Some(err_element(&e)?);
						},
					Event::End(_) =>
						if depth == 0 {
							break (text.as_bytes()[inner_start..pos].to_vec(), err);
						} else {
							depth -= 1;
						},
					Event::Eof => return Err(DecodeError::Truncated.into()),
					_ => (),
				}
			}
		},
	};

	if let Some(err) = err {
		return Err(err.into());
	}
	if stat != "ok" {
		return Err(ProtocolError::unexpected_stat(&stat).into());
	}

	Ok(payload)
}

/// Reads an `err` element's `code`/`msg` attributes into a [`ProtocolError`].
///
/// A missing attribute falls back to the zero value; a `code` that is present
/// but non-numeric is a decode failure rather than a guessed report.
fn err_element(start: &BytesStart) -> Result<ProtocolError, DecodeError> {
	let code = match attribute(start, "code")? {
		Some(raw) => raw.parse().map_err(|source| DecodeError::ErrCode { source })?,
		None => 0,
	};
	let msg = attribute(start, "msg")?.unwrap_or_default();

	Ok(ProtocolError { code, msg })
}

fn attribute(start: &BytesStart, name: &str) -> Result<Option<String>, DecodeError> {
	let Some(attr) = start.try_get_attribute(name).map_err(quick_xml::Error::from)? else {
		return Ok(None);
	};

	Ok(Some(attr.unescape_value()?.into_owned()))
}

enum Root {
	Open(BytesStart<'static>),
	Empty(BytesStart<'static>),
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::error::Error;

	fn parse_err(body: &str) -> Error {
		parse(body.as_bytes()).expect_err("Envelope fixture should be rejected.")
	}

	#[test]
	fn ok_envelope_yields_the_raw_inner_fragment() {
		let payload = parse(br#"<rsp stat="ok"> <tasks rev="1"/> </rsp>"#)
			.expect("Success envelope should parse.");

		assert_eq!(payload, br#" <tasks rev="1"/> "#);
	}

	#[test]
	fn inner_whitespace_stays_in_the_payload() {
		let payload = parse(b"<rsp stat=\"ok\">\n\t<tasks rev=\"1\"/>\n</rsp>")
			.expect("Envelope with surrounding whitespace should parse.");

		assert_eq!(payload, b"\n\t<tasks rev=\"1\"/>\n");

		let payload =
			parse(br#"<rsp stat="ok"> </rsp>"#).expect("Whitespace-only payload should parse.");

		assert_eq!(payload, b" ");
	}

	#[test]
	fn mixed_content_passes_through_unparsed() {
		let payload = parse(br#"<rsp stat="ok">a &amp; <![CDATA[<raw/>]]> b</rsp>"#)
			.expect("Mixed-content envelope should parse.");

		assert_eq!(payload, br#"a &amp; <![CDATA[<raw/>]]> b"#);
	}

	#[test]
	fn self_closing_ok_envelope_yields_an_empty_payload() {
		let payload =
			parse(br#"<rsp stat="ok"/>"#).expect("Self-closing success envelope should parse.");

		assert!(payload.is_empty());
	}

	#[test]
	fn empty_ok_envelope_yields_an_empty_payload() {
		let payload =
			parse(br#"<rsp stat="ok"></rsp>"#).expect("Empty success envelope should parse.");

		assert!(payload.is_empty());
	}

	#[test]
	fn prolog_and_comments_before_the_root_are_skipped() {
		let body = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<!-- served -->\n<rsp stat=\"ok\"><frob>f</frob></rsp>";
		let payload = parse(body.as_bytes()).expect("Prologued envelope should parse.");

		assert_eq!(payload, b"<frob>f</frob>");
	}

	#[test]
	fn trailing_bytes_after_the_envelope_are_ignored() {
		let payload = parse(br#"<rsp stat="ok"><frob>f</frob></rsp>trailing"#)
			.expect("Envelope with trailing bytes should parse.");

		assert_eq!(payload, b"<frob>f</frob>");
	}

	#[test]
	fn err_element_becomes_a_protocol_error() {
		let err = parse_err(r#"<rsp stat="fail"><err code="98" msg="Login failed"/></rsp>"#);

		let Error::Protocol(err) = err else {
			panic!("Failure envelope should surface as a protocol error.");
		};

		assert_eq!(err.code, 98);
		assert_eq!(err.msg, "Login failed");
		assert_eq!(err.to_string(), "98: Login failed");
	}

	#[test]
	fn err_message_attributes_are_unescaped() {
		let err = parse_err(r#"<rsp stat="fail"><err code="112" msg="Method &quot;x&quot; &amp; gone"/></rsp>"#);

		let Error::Protocol(err) = err else {
			panic!("Failure envelope should surface as a protocol error.");
		};

		assert_eq!(err.msg, r#"Method "x" & gone"#);
	}

	#[test]
	fn err_element_wins_over_an_ok_stat() {
		let err = parse_err(r#"<rsp stat="ok"><err code="5" msg="nope"/></rsp>"#);

		assert!(matches!(err, Error::Protocol(ProtocolError { code: 5, .. })));
	}

	#[test]
	fn missing_err_attributes_fall_back_to_zero_values() {
		let err = parse_err(r#"<rsp stat="fail"><err/></rsp>"#);

		let Error::Protocol(err) = err else {
			panic!("Failure envelope should surface as a protocol error.");
		};

		assert_eq!(err.code, 0);
		assert_eq!(err.msg, "");
	}

	#[test]
	fn nested_err_elements_belong_to_the_payload() {
		let payload = parse(br#"<rsp stat="ok"><list><err code="1" msg="inner"/></list></rsp>"#)
			.expect("Nested err elements should stay payload data.");

		assert_eq!(payload, br#"<list><err code="1" msg="inner"/></list>"#);
	}

	#[test]
	fn unexpected_stat_carries_the_sentinel_code() {
		let err = parse_err(r#"<rsp stat="partial"><tasks/></rsp>"#);

		let Error::Protocol(err) = err else {
			panic!("Unexpected stat should surface as a protocol error.");
		};

		assert_eq!(err.code, ProtocolError::UNEXPECTED_STAT_CODE);
		assert!(err.msg.contains("\"partial\""));
	}

	#[test]
	fn missing_stat_reads_as_an_empty_stat() {
		let err = parse_err(r#"<rsp><tasks/></rsp>"#);

		let Error::Protocol(err) = err else {
			panic!("Missing stat should surface as a protocol error.");
		};

		assert_eq!(err.code, ProtocolError::UNEXPECTED_STAT_CODE);
		assert!(err.msg.contains("\"\""));
	}

	#[test]
	fn foreign_root_elements_are_rejected() {
		let err = parse_err("<html><body>gateway</body></html>");

		assert!(matches!(
			err,
			Error::Decode(DecodeError::UnexpectedRoot { found }) if found == "html"
		));
	}

	#[test]
	fn plain_text_bodies_have_no_root() {
		assert!(matches!(parse_err("service unavailable"), Error::Decode(DecodeError::MissingRoot)));
		assert!(matches!(parse_err(""), Error::Decode(DecodeError::MissingRoot)));
	}

	#[test]
	fn malformed_xml_is_a_decode_failure() {
		assert!(matches!(parse_err("<rsp stat='ok'><tasks"), Error::Decode(_)));
	}

	#[test]
	fn truncated_envelopes_are_reported_as_such() {
		let err = parse_err(r#"<rsp stat="ok"><tasks></tasks>"#);

		assert!(matches!(err, Error::Decode(DecodeError::Truncated)));
	}

	#[test]
	fn non_numeric_err_codes_are_a_decode_failure() {
		let err = parse_err(r#"<rsp stat="fail"><err code="banana" msg="?"/></rsp>"#);

		assert!(matches!(err, Error::Decode(DecodeError::ErrCode { .. })));
	}

	#[test]
	fn non_utf8_bodies_are_a_decode_failure() {
		assert!(matches!(
			parse(&[0xff, 0xfe, 0x00]).expect_err("Invalid UTF-8 should be rejected."),
			Error::Decode(DecodeError::Utf8(_))
		));
	}
}
