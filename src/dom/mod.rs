/*!
# Minweb: DOM.

The tree is an arena: every node lives in one `Vec`, and nodes point at one
another by index. Detached nodes simply stay behind as garbage until the
document is dropped (or cloned, which compacts).
*/

pub(super) mod node;
pub(super) mod parse;

use crate::{
	ParseError,
	ser::{
		self,
		Flavor,
	},
	spec,
};
use node::{
	Node,
	NodeId,
	NodeKind,
};
use parse::{
	ParseOptions,
	Parser,
};
use std::{
	fmt,
	ops::{
		Index,
		IndexMut,
	},
};



/// # Root ID.
const ROOT: NodeId = NodeId(0);



#[derive(Debug)]
/// # HTML Document.
///
/// This holds the complete node tree for a parsed (or synthesized) document.
/// The root is always a `NodeKind::Document`.
pub struct Document {
	/// # Node Arena.
	nodes: Vec<Node>,
}

impl Clone for Document {
	/// # Deep Clone.
	///
	/// Only nodes reachable from the root are copied, so the clone comes out
	/// compacted, with freshly numbered IDs.
	fn clone(&self) -> Self {
		let mut out = Self::default();
		let mut stack = vec![(ROOT, ROOT)];
		while let Some((src, dst)) = stack.pop() {
			for &child in &self.nodes[src.0].children {
				let new = out.append(dst, self.nodes[child.0].kind.clone());
				stack.push((child, new));
			}
		}
		out
	}
}

impl Default for Document {
	#[inline]
	fn default() -> Self {
		Self { nodes: vec![Node::new(NodeKind::Document)] }
	}
}

impl fmt::Display for Document {
	/// # Raw (Source) HTML.
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.outer_html(ROOT))
	}
}

impl Index<NodeId> for Document {
	type Output = Node;

	#[inline]
	fn index(&self, idx: NodeId) -> &Self::Output { &self.nodes[idx.0] }
}

impl IndexMut<NodeId> for Document {
	#[inline]
	fn index_mut(&mut self, idx: NodeId) -> &mut Self::Output { &mut self.nodes[idx.0] }
}

/// # Parsing.
impl Document {
	/// # Parse.
	///
	/// Parse an HTML document or fragment into a tree using the default
	/// options.
	///
	/// ## Errors
	///
	/// An error is returned only when a mandatory token, like a tag name, is
	/// missing outright. Unbalanced markup is repaired, not rejected.
	pub fn parse(html: &str) -> Result<Self, ParseError> {
		Self::parse_with(html, ParseOptions::default())
	}

	/// # Parse With Options.
	///
	/// ## Errors
	///
	/// See [`Document::parse`].
	pub fn parse_with(html: &str, opts: ParseOptions) -> Result<Self, ParseError> {
		Parser::new(html, opts).run()
	}
}

/// # Structure.
impl Document {
	#[must_use]
	/// # Root ID.
	pub const fn root(&self) -> NodeId { ROOT }

	#[must_use]
	/// # Get Node.
	pub fn get(&self, id: NodeId) -> Option<&Node> { self.nodes.get(id.0) }

	/// # Get Node (Mutable).
	pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> { self.nodes.get_mut(id.0) }

	#[must_use]
	/// # Node Kind.
	pub fn kind(&self, id: NodeId) -> &NodeKind { &self.nodes[id.0].kind }

	/// # Node Kind (Mutable).
	pub fn kind_mut(&mut self, id: NodeId) -> &mut NodeKind { &mut self.nodes[id.0].kind }

	#[must_use]
	/// # Children.
	pub fn children(&self, id: NodeId) -> &[NodeId] { &self.nodes[id.0].children }

	#[must_use]
	/// # Parent.
	pub fn parent(&self, id: NodeId) -> Option<NodeId> { self.nodes[id.0].parent }

	#[must_use]
	/// # Arena Size.
	///
	/// This includes detached garbage.
	pub fn arena_len(&self) -> usize { self.nodes.len() }

	/// # Create (Detached) Node.
	pub fn create(&mut self, kind: NodeKind) -> NodeId {
		let id = NodeId(self.nodes.len());
		self.nodes.push(Node::new(kind));
		id
	}

	/// # Create and Append.
	///
	/// Create a new node and attach it as the last child of `parent`.
	pub fn append(&mut self, parent: NodeId, kind: NodeKind) -> NodeId {
		let id = self.create(kind);
		self.nodes[id.0].parent = Some(parent);
		self.nodes[parent.0].children.push(id);
		id
	}

	/// # Append Existing Node.
	///
	/// The child is detached from its current parent first, if any.
	pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
		self.detach(child);
		self.nodes[child.0].parent = Some(parent);
		self.nodes[parent.0].children.push(child);
	}

	/// # Insert Existing Node.
	///
	/// Insert `child` into `parent`'s child list at `idx` (clamped). The
	/// child is detached from its current parent first, if any.
	pub fn insert_child(&mut self, parent: NodeId, idx: usize, child: NodeId) {
		self.detach(child);
		self.nodes[child.0].parent = Some(parent);
		let list = &mut self.nodes[parent.0].children;
		let idx = usize::min(idx, list.len());
		list.insert(idx, child);
	}

	/// # Detach.
	///
	/// Remove the node (and by extension its subtree) from its parent.
	/// Returns `false` if it was already detached.
	pub fn detach(&mut self, id: NodeId) -> bool {
		if let Some(parent) = self.nodes[id.0].parent.take() {
			self.nodes[parent.0].children.retain(|c| *c != id);
			true
		}
		else { false }
	}

	/// # Replace With Children.
	///
	/// Splice a node's children into its place within its parent's child
	/// list, detaching the (now empty) node. Returns `false` if the node had
	/// no parent.
	pub fn replace_with_children(&mut self, id: NodeId) -> bool {
		let Some(parent) = self.nodes[id.0].parent else { return false; };
		let Some(pos) = self.nodes[parent.0].children.iter().position(|c| *c == id)
		else { return false; };

		let kids = std::mem::take(&mut self.nodes[id.0].children);
		for &k in &kids { self.nodes[k.0].parent = Some(parent); }
		self.nodes[id.0].parent = None;

		let list = &mut self.nodes[parent.0].children;
		let tail = list.split_off(pos + 1);
		list.pop();
		list.extend(kids);
		list.extend(tail);
		true
	}

	/// # Replace Children.
	///
	/// Detach all of a node's current children, replacing them with a
	/// single new node of the given kind.
	pub fn set_only_child(&mut self, id: NodeId, kind: NodeKind) -> NodeId {
		for k in std::mem::take(&mut self.nodes[id.0].children) {
			self.nodes[k.0].parent = None;
		}
		self.append(id, kind)
	}

	/// # Adopt.
	///
	/// Deep-copy the top-level nodes of another document into this one,
	/// returning the (detached) copies in order.
	pub fn adopt(&mut self, other: &Self) -> Vec<NodeId> {
		let mut out = Vec::with_capacity(other.nodes[ROOT.0].children.len());
		for &top in &other.nodes[ROOT.0].children {
			let new = self.create(other.nodes[top.0].kind.clone());
			out.push(new);

			let mut stack = vec![(top, new)];
			while let Some((src, dst)) = stack.pop() {
				for &child in &other.nodes[src.0].children {
					let copy = self.append(dst, other.nodes[child.0].kind.clone());
					stack.push((child, copy));
				}
			}
		}
		out
	}

	#[must_use]
	/// # Is Attached?
	///
	/// Returns `true` if the node can be reached from the root.
	pub fn is_attached(&self, mut id: NodeId) -> bool {
		while let Some(parent) = self.nodes[id.0].parent { id = parent; }
		id == ROOT
	}

	#[must_use]
	/// # Descendants.
	///
	/// Iterate over a node's descendants in pre-order. The node itself is
	/// not included.
	pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
		Descendants {
			doc: self,
			stack: self.nodes[id.0].children.iter().rev().copied().collect(),
		}
	}

	/// # Merge Adjacent Text.
	///
	/// Merge runs of sibling text nodes throughout the tree.
	pub fn merge_text(&mut self) {
		let mut stack = vec![ROOT];
		while let Some(id) = stack.pop() {
			let kids = std::mem::take(&mut self.nodes[id.0].children);
			let mut out: Vec<NodeId> = Vec::with_capacity(kids.len());
			for k in kids {
				if
					let Some(&last) = out.last() &&
					let NodeKind::Text(next) = &self.nodes[k.0].kind
				{
					let next = next.clone();
					if let NodeKind::Text(prev) = &mut self.nodes[last.0].kind {
						prev.push_str(&next);
						self.nodes[k.0].parent = None;
						continue;
					}
				}

				if ! self.nodes[k.0].children.is_empty() { stack.push(k); }
				out.push(k);
			}
			self.nodes[id.0].children = out;
		}
	}
}

/// # Queries.
impl Document {
	#[must_use]
	/// # Is Tag Name?
	///
	/// Case-insensitive.
	pub fn is_tag_name(&self, id: NodeId, name: &str) -> bool {
		self.nodes[id.0].kind.is_tag_name(name)
	}

	#[must_use]
	/// # Is Any Tag Name?
	pub fn is_any_tag_name(&self, id: NodeId, names: &[&str]) -> bool {
		self.nodes[id.0].kind.is_any_tag_name(names)
	}

	#[must_use]
	/// # Has Text?
	///
	/// Returns `true` if any descendant is a text node.
	pub fn has_text(&self, id: NodeId) -> bool {
		self.descendants(id).any(|d| self.nodes[d.0].kind.is_text())
	}

	#[must_use]
	/// # Has Element By Tag Name?
	///
	/// This checks the node itself too.
	pub fn has_element_by_tag_name(&self, id: NodeId, name: &str) -> bool {
		self.is_tag_name(id, name) ||
		self.descendants(id).any(|d| self.is_tag_name(d, name))
	}

	#[must_use]
	/// # Has Element By Any Tag Name?
	///
	/// This checks the node itself too.
	pub fn has_element_by_any_tag_name(&self, id: NodeId, names: &[&str]) -> bool {
		self.is_any_tag_name(id, names) ||
		self.descendants(id).any(|d| self.is_any_tag_name(d, names))
	}

	#[must_use]
	/// # Get Elements By Tag Name.
	///
	/// Return all matching descendants (and the node itself, if it matches)
	/// in pre-order.
	pub fn get_elements_by_tag_name(&self, id: NodeId, name: &str) -> Vec<NodeId> {
		std::iter::once(id)
			.chain(self.descendants(id))
			.filter(|d| self.is_tag_name(*d, name))
			.collect()
	}

	#[must_use]
	/// # Has Ancestor By Tag Name?
	pub fn has_parent_element_by_tag_name(&self, id: NodeId, name: &str) -> bool {
		let mut next = self.nodes[id.0].parent;
		while let Some(p) = next {
			if self.is_tag_name(p, name) { return true; }
			next = self.nodes[p.0].parent;
		}
		false
	}

	#[must_use]
	/// # First Element By Tag Name.
	pub fn find(&self, name: &str) -> Option<NodeId> {
		self.descendants(ROOT).find(|d| self.is_tag_name(*d, name))
	}

	#[must_use]
	/// # `<html>` Element.
	pub fn html(&self) -> Option<NodeId> { self.find("html") }

	#[must_use]
	/// # `<head>` Element.
	pub fn head(&self) -> Option<NodeId> { self.find("head") }

	#[must_use]
	/// # `<body>` Element.
	pub fn body(&self) -> Option<NodeId> { self.find("body") }

	#[must_use]
	/// # Text Content.
	///
	/// Concatenate the descendant text nodes. Style and script bodies are
	/// not text.
	pub fn text_content(&self, id: NodeId) -> String {
		let mut out = String::new();
		for d in self.descendants(id) {
			if let NodeKind::Text(t) = &self.nodes[d.0].kind { out.push_str(t); }
		}
		out
	}

	#[must_use]
	/// # Is Blank?
	///
	/// Returns `true` if the node's minified inner content would be nothing
	/// but whitespace: every child is whitespace text, a comment, or an
	/// orphan closing marker.
	pub fn is_blank(&self, id: NodeId) -> bool {
		self.nodes[id.0].children.iter().all(|c| match &self.nodes[c.0].kind {
			NodeKind::Text(t) => spec::is_whitespace_str(t),
			NodeKind::Comment { .. } => true,
			NodeKind::Element(e) => e.extra_closing,
			_ => false,
		})
	}
}

/// # Serialization.
impl Document {
	#[must_use]
	/// # Outer HTML.
	///
	/// Reconstruct the source markup for the node and its subtree. For a
	/// freshly parsed tree without orphan or mismatched tags, this matches
	/// the original byte for byte.
	pub fn outer_html(&self, id: NodeId) -> String {
		ser::serialize(self, id, Flavor::Raw)
	}

	#[must_use]
	/// # Minified Outer HTML.
	///
	/// When `auto_repair` is true, elements the source left open are closed
	/// anyway.
	pub fn minified_outer_html(&self, id: NodeId, auto_repair: bool) -> String {
		ser::serialize(self, id, Flavor::Minified { auto_repair })
	}

	#[must_use]
	/// # Minified Inner HTML.
	pub fn inner_html_minified(&self, id: NodeId, auto_repair: bool) -> String {
		let mut out = String::new();
		for &c in &self.nodes[id.0].children {
			out.push_str(&ser::serialize(self, c, Flavor::Minified { auto_repair }));
		}
		out
	}
}



#[derive(Debug)]
/// # Pre-Order Descendant Iterator.
pub struct Descendants<'a> {
	/// # Document.
	doc: &'a Document,

	/// # Pending.
	stack: Vec<NodeId>,
}

impl Iterator for Descendants<'_> {
	type Item = NodeId;

	fn next(&mut self) -> Option<Self::Item> {
		let next = self.stack.pop()?;
		self.stack.extend(self.doc.nodes[next.0].children.iter().rev().copied());
		Some(next)
	}
}



#[cfg(test)]
mod tests {
	use super::*;
	use node::Element;

	/// # Build a Small Tree.
	fn sample() -> (Document, NodeId, NodeId) {
		let mut doc = Document::default();
		let div = doc.append(ROOT, NodeKind::Element(Element::new("DIV")));
		let p = doc.append(div, NodeKind::Element(Element::new("p")));
		doc.append(p, NodeKind::Text("Hello".to_owned()));
		doc.append(div, NodeKind::Text(" ".to_owned()));
		doc.append(div, NodeKind::Text("World".to_owned()));
		(doc, div, p)
	}

	#[test]
	fn t_queries() {
		let (doc, div, p) = sample();
		assert!(doc.is_tag_name(div, "div"));
		assert!(doc.is_any_tag_name(p, &["a", "p"]));
		assert!(doc.has_text(div));
		assert!(doc.has_element_by_tag_name(div, "P"));
		assert!(doc.has_element_by_tag_name(div, "div"));
		assert!(! doc.has_element_by_tag_name(div, "span"));
		assert!(doc.has_parent_element_by_tag_name(p, "div"));
		assert!(! doc.has_parent_element_by_tag_name(div, "div"));
		assert_eq!(doc.get_elements_by_tag_name(ROOT, "p"), vec![p]);
		assert_eq!(doc.text_content(div), "Hello World");
		assert_eq!(doc.body(), None);
	}

	#[test]
	fn t_clone() {
		let (mut doc, div, p) = sample();
		doc.detach(p);
		assert!(! doc.is_attached(p));

		let copy = doc.clone();
		assert_eq!(copy.to_string(), doc.to_string());
		assert!(copy.arena_len() < doc.arena_len(), "Clones should be compact.");

		// Changing the original leaves the copy alone.
		if let Some(attrs) = doc.kind_mut(div).attrs_mut() {
			attrs.set("id", Some("\"x\""));
		}
		assert_eq!(doc.to_string(), "<DIV id=\"x\"> World</DIV>");
		assert_eq!(copy.to_string(), "<DIV> World</DIV>");
	}

	#[test]
	fn t_splice() {
		let (mut doc, div, p) = sample();
		assert!(doc.replace_with_children(div));
		assert_eq!(doc.children(ROOT).len(), 3);
		assert_eq!(doc.parent(p), Some(ROOT));
		assert!(! doc.is_attached(div));

		doc.merge_text();
		assert_eq!(doc.children(ROOT).len(), 2);
		assert_eq!(doc.to_string(), "<p>Hello</p> World");
	}
}
