use crate::growth::GrowthError;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Parent name to ordered child names. A name absent from the map is
/// treated as childless, so leaf people never need an entry.
///
/// The map is plain injectable data; the visualizer takes it as
/// configuration rather than a compiled-in constant.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FamilyMap {
	children: HashMap<String, Vec<String>>,
}

impl FamilyMap {
	pub fn new() -> Self {
		Self { children: HashMap::new() }
	}

	/// Build from `(parent, children)` pairs.
	pub fn from_pairs<I, P, C>(pairs: I) -> Self
	where
		I: IntoIterator<Item = (P, Vec<C>)>,
		P: Into<String>,
		C: Into<String>,
	{
		let children = pairs
			.into_iter()
			.map(|(parent, kids)| {
				(parent.into(), kids.into_iter().map(Into::into).collect())
			})
			.collect();
		Self { children }
	}

	/// The family the original demo ships with.
	pub fn demo() -> Self {
		Self::from_pairs([
			("Zahra Rajab", vec!["Yunus Habib", "Mustafa Habib", "Elly Sirunya"]),
			("Yunus Habib", vec!["Nuriat Habib", "Zahra Habib"]),
			("Mustafa Habib", vec!["Humail Mustafa"]),
		])
	}

	pub fn children_of(&self, name: &str) -> &[String] {
		self.children.get(name).map(Vec::as_slice).unwrap_or(&[])
	}

	/// True if the name appears anywhere in the map, as a parent or a child.
	pub fn contains(&self, name: &str) -> bool {
		self.children.contains_key(name)
			|| self.children.values().any(|kids| kids.iter().any(|c| c == name))
	}

	pub fn len(&self) -> usize {
		self.children.len()
	}

	pub fn is_empty(&self) -> bool {
		self.children.is_empty()
	}

	/// Append a child under an existing person.
	///
	/// The parent must already be known; the child must not, so the map
	/// stays a forest (no person is a child of two parents).
	pub fn add_child(&mut self, parent: &str, child: impl Into<String>) -> Result<(), GrowthError> {
		let child = child.into();
		if !self.contains(parent) {
			return Err(GrowthError::UnknownRoot { name: parent.to_string() });
		}
		if self.contains(&child) {
			return Err(GrowthError::DuplicateChild { name: child });
		}
		self.children.entry(parent.to_string()).or_default().push(child);
		Ok(())
	}

	/// Check the structural invariants: every person is a child of at most
	/// one parent, and no child list reaches back to an ancestor.
	pub fn validate(&self) -> Result<(), GrowthError> {
		let mut seen = HashSet::new();
		for kids in self.children.values() {
			for child in kids {
				if !seen.insert(child.as_str()) {
					return Err(GrowthError::DuplicateChild { name: child.clone() });
				}
			}
		}

		for root in self.children.keys() {
			let mut stack = Vec::new();
			self.check_cycles(root, &mut stack)?;
		}
		Ok(())
	}

	fn check_cycles<'a>(
		&'a self,
		name: &'a str,
		stack: &mut Vec<&'a str>,
	) -> Result<(), GrowthError> {
		if stack.contains(&name) {
			return Err(GrowthError::CyclicFamilyMap { name: name.to_string() });
		}
		stack.push(name);
		for child in self.children_of(name) {
			self.check_cycles(child, stack)?;
		}
		stack.pop();
		Ok(())
	}
}
