/*!
# Minweb: Tree Walking.

Both walkers hand each node to a callback which can inspect or mutate it (or
its subtree), and then decide what should happen to it by returning an
`Action`.
*/

use crate::{
	Document,
	NodeId,
};



#[derive(Debug, Clone, Copy, Eq, PartialEq)]
/// # Walk Action.
pub enum Action {
	/// # Keep, and Descend.
	Continue,

	/// # Keep, but Don't Descend.
	///
	/// For post-order walks, this is the same as `Continue`.
	Skip,

	/// # Remove the Node and Its Subtree.
	Detach,

	/// # Replace the Node With Its Children.
	Fold,
}



/// # Walk (Pre-Order).
///
/// Visit every node beneath the root, parents before children, in document
/// order. The root itself is not visited.
///
/// The callback may freely change the node it is given, including its
/// children, but should leave its siblings alone.
pub fn walk<F>(doc: &mut Document, mut cb: F)
where F: FnMut(&mut Document, NodeId) -> Action {
	let mut stack = vec![(doc.root(), 0_usize)];
	while let Some((parent, idx)) = stack.pop() {
		let Some(&id) = doc.children(parent).get(idx) else { continue; };
		match cb(doc, id) {
			Action::Continue => {
				stack.push((parent, idx + 1));
				stack.push((id, 0));
			},
			Action::Skip => { stack.push((parent, idx + 1)); },
			Action::Detach => {
				doc.detach(id);
				stack.push((parent, idx));
			},
			// The children take the node's place, so get visited next.
			Action::Fold => {
				doc.replace_with_children(id);
				stack.push((parent, idx));
			},
		}
	}
}

/// # Walk (Post-Order).
///
/// Visit every node beneath the root, children before parents, last sibling
/// first. For an unchanging tree, this is the exact reverse of the pre-order
/// sequence. The root itself is not visited.
///
/// The live child lists are followed, so the callback may also alter
/// earlier siblings (e.g. merging them); nodes removed before their turn
/// are never visited.
pub fn walk_reversed<F>(doc: &mut Document, mut cb: F)
where F: FnMut(&mut Document, NodeId) -> Action {
	let root = doc.root();

	// Each frame is a node and the number of its children still to visit.
	let mut stack = vec![(root, doc.children(root).len())];
	while let Some(&(id, left)) = stack.last() {
		let left = usize::min(left, doc.children(id).len());
		if 0 < left {
			let idx = left - 1;
			if let Some(frame) = stack.last_mut() { frame.1 = idx; }
			let child = doc.children(id)[idx];
			stack.push((child, doc.children(child).len()));
			continue;
		}

		stack.pop();
		let Some(parent) = stack.last_mut() else { continue; };
		match cb(doc, id) {
			Action::Continue | Action::Skip => {},
			Action::Detach => { doc.detach(id); },
			Action::Fold => { doc.replace_with_children(id); },
		}

		// Earlier siblings may have been removed; find our place again.
		let kids = doc.children(parent.0);
		if kids.get(parent.1) != Some(&id) {
			let end = usize::min(parent.1, kids.len());
			if let Some(pos) = kids[..end].iter().rposition(|c| *c == id) {
				parent.1 = pos;
			}
		}
	}
}



#[cfg(test)]
mod tests {
	use super::*;
	use crate::NodeKind;

	#[test]
	fn t_walk() {
		let mut doc = Document::parse("<div><p>a</p><span>b</span><i>c</i></div>d")
			.expect("Parse failed.");

		let mut seen = Vec::new();
		walk(&mut doc, |doc, id| {
			match doc.kind(id) {
				NodeKind::Text(t) => { seen.push(t.clone()); },
				k => { seen.push(k.tag_name().unwrap_or_default().to_owned()); },
			}

			if doc.is_tag_name(id, "p") { Action::Detach }
			else if doc.is_tag_name(id, "span") { Action::Fold }
			else if doc.is_tag_name(id, "i") { Action::Skip }
			else { Action::Continue }
		});

		assert_eq!(seen, ["div", "p", "span", "b", "i", "d"]);
		assert_eq!(doc.to_string(), "<div>b<i>c</i></div>d");
	}

	#[test]
	fn t_walk_reversed() {
		let mut doc = Document::parse("<div><div><div>x</div></div></div><b>y</b>")
			.expect("Parse failed.");

		let mut seen = Vec::new();
		walk_reversed(&mut doc, |doc, id| {
			seen.push(id);
			if doc.is_tag_name(id, "div") && doc.children(id).len() == 1 { Action::Fold }
			else { Action::Continue }
		});

		let mut expected: Vec<NodeId> = Document::parse("<div><div><div>x</div></div></div><b>y</b>")
			.expect("Parse failed.")
			.descendants(doc.root())
			.collect();
		expected.reverse();
		assert_eq!(seen, expected);

		// Every level was flattened.
		assert_eq!(doc.to_string(), "x<b>y</b>");
	}

	#[test]
	fn t_walk_reversed_siblings() {
		// Removing an earlier sibling takes its subtree out of the walk.
		let mut doc = Document::parse("<i>a</i><b>b</b><u>c</u>").expect("Parse failed.");
		let mut seen = Vec::new();
		walk_reversed(&mut doc, |doc, id| {
			if let NodeKind::Text(t) = doc.kind(id) { seen.push(t.clone()); }
			if doc.is_tag_name(id, "b") {
				let prev = doc.children(doc.root())[0];
				doc.detach(prev);
			}
			Action::Continue
		});

		assert_eq!(seen, ["c", "b"]);
		assert_eq!(doc.to_string(), "<b>b</b><u>c</u>");
	}

	#[test]
	fn t_walk_reversed_deep() {
		let raw = "<div><p>".repeat(50_000);
		let mut doc = Document::parse(&raw).expect("Parse failed.");

		let mut count = 0_usize;
		walk_reversed(&mut doc, |doc, id| {
			count += 1;
			if doc.is_tag_name(id, "div") { Action::Fold }
			else { Action::Continue }
		});

		assert_eq!(count, 100_000);
		assert_eq!(doc.minified_outer_html(doc.root(), false), "<p>".repeat(50_000));
	}
}
