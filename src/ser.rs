/*!
# Minweb: Serialization.
*/

use crate::{
	Document,
	NodeId,
	NodeKind,
	dom::node::{
		Element,
		write_trimmed_text,
	},
};



#[derive(Debug, Clone, Copy, Eq, PartialEq)]
/// # Serialization Flavor.
pub(crate) enum Flavor {
	/// # Source Reconstruction.
	Raw,

	/// # Minified.
	Minified {
		/// # Close Everything?
		auto_repair: bool,
	},
}



/// # Serialize.
///
/// Write the node and its subtree back out as HTML. This uses its own stack
/// rather than recursion, so deeply-nested trees are not a problem.
pub(crate) fn serialize(doc: &Document, id: NodeId, flavor: Flavor) -> String {
	#[derive(Debug, Clone, Copy)]
	enum Stage {
		/// # Open Tag (and Content).
		Open(NodeId),

		/// # Close Tag.
		Close(NodeId),
	}

	let mut out = String::new();
	let mut stack = vec![Stage::Open(id)];
	while let Some(op) = stack.pop() {
		match op {
			Stage::Open(id) => {
				let descend = match doc.kind(id) {
					NodeKind::Document => true,
					NodeKind::Text(t) => {
						if matches!(flavor, Flavor::Raw) { out.push_str(t); }
						else { write_trimmed_text(t, &mut out); }
						false
					},
					NodeKind::Comment { content, not_closed } => {
						if matches!(flavor, Flavor::Raw) {
							out.push_str("<!--");
							out.push_str(content);
							if ! not_closed { out.push_str("-->"); }
						}
						false
					},
					NodeKind::Command(c) => {
						out.push_str("<!");
						out.push_str(&c.name);
						if matches!(flavor, Flavor::Raw) { c.attrs.write_raw(&mut out); }
						else { c.attrs.write_minified(&mut out); }
						out.push('>');
						false
					},
					NodeKind::Element(el) => {
						write_open(el, flavor, &mut out);
						stack.push(Stage::Close(id));
						true
					},
					NodeKind::Style(raw) | NodeKind::Script(raw) => {
						write_open(&raw.element, flavor, &mut out);
						if ! raw.element.no_body {
							if matches!(flavor, Flavor::Raw) { out.push_str(&raw.content); }
							else {
								let script = matches!(doc.kind(id), NodeKind::Script(_));
								out.push_str(&raw.minified_content(script));
							}
						}
						write_close(&raw.element, flavor, &mut out);
						false
					},
				};

				if descend {
					stack.extend(doc.children(id).iter().rev().map(|c| Stage::Open(*c)));
				}
			},
			Stage::Close(id) =>
				if let Some(el) = doc.kind(id).as_element() {
					write_close(el, flavor, &mut out);
				},
		}
	}

	out
}

/// # Write Opening Tag.
fn write_open(el: &Element, flavor: Flavor, out: &mut String) {
	match flavor {
		Flavor::Raw => {
			if el.extra_closing || el.reopened { return; }
			out.push('<');
			out.push_str(&el.name);
			el.attrs.write_raw(out);
			if el.self_closing { out.push_str("/>"); }
			else { out.push('>'); }
		},
		Flavor::Minified { .. } => {
			if el.extra_closing { return; }
			out.push('<');
			out.push_str(&el.name);
			el.attrs.write_minified(out);
			if el.no_body { out.push_str("/>"); }
			else { out.push('>'); }
		},
	}
}

/// # Write Closing Tag.
fn write_close(el: &Element, flavor: Flavor, out: &mut String) {
	match flavor {
		Flavor::Raw => {
			if el.extra_closing {
				if let Some(raw) = el.close_raw.as_deref() { out.push_str(raw); }
				else { push_close(&el.name, out); }
			}
			else if ! el.no_body && ! el.not_closed {
				if let Some(raw) = el.close_raw.as_deref() { out.push_str(raw); }
				else { push_close(&el.name, out); }
			}
		},
		Flavor::Minified { auto_repair } =>
			if ! el.extra_closing && ! el.no_body && (auto_repair || ! el.not_closed) {
				push_close(&el.name, out);
			},
	}
}

/// # Push `</name>`.
fn push_close(name: &str, out: &mut String) {
	out.push_str("</");
	out.push_str(name);
	out.push('>');
}
