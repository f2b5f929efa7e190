use bevy::math::Vec3;

/// One generated branch: a curved, tapered segment ending at a family
/// member, plus that member's children as sub-branches.
///
/// A tree of these is a geometric realization of the `FamilyMap`; it is
/// rebuilt wholesale whenever the map or the seed changes.
#[derive(Debug, Clone)]
pub struct BranchNode {
	/// The family member this branch terminates at.
	pub person_name: String,
	/// Sampled curve from the branch's start to its tip, at least 2 points.
	pub path: Vec<Vec3>,
	/// Radius where the branch leaves its parent.
	pub base_radius: f32,
	/// Radius at the tip, `tip_radius <= base_radius`.
	pub tip_radius: f32,
	/// Distance in tree edges from the root person.
	pub generation: usize,
	pub children: Vec<BranchNode>,
}

impl BranchNode {
	/// Where the branch starts.
	pub fn origin(&self) -> Vec3 {
		self.path[0]
	}

	/// Terminal point of the path; labels, markers and child branches
	/// attach here.
	pub fn tip(&self) -> Vec3 {
		self.path[self.path.len() - 1]
	}

	/// All nodes in pre-order, self first.
	pub fn iter_preorder(&self) -> impl Iterator<Item = &BranchNode> {
		PreorderIter { stack: vec![self] }
	}

	/// Total number of nodes in the subtree.
	pub fn count(&self) -> usize {
		1 + self.children.iter().map(BranchNode::count).sum::<usize>()
	}

	pub fn find(&self, name: &str) -> Option<&BranchNode> {
		self.iter_preorder().find(|node| node.person_name == name)
	}
}

struct PreorderIter<'a> {
	stack: Vec<&'a BranchNode>,
}

impl<'a> Iterator for PreorderIter<'a> {
	type Item = &'a BranchNode;

	fn next(&mut self) -> Option<Self::Item> {
		let node = self.stack.pop()?;
		for child in node.children.iter().rev() {
			self.stack.push(child);
		}
		Some(node)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn leaf(name: &str, tip: Vec3) -> BranchNode {
		BranchNode {
			person_name: name.to_string(),
			path: vec![Vec3::ZERO, tip],
			base_radius: 0.1,
			tip_radius: 0.05,
			generation: 1,
			children: vec![],
		}
	}

	fn sample_tree() -> BranchNode {
		BranchNode {
			person_name: "Root".to_string(),
			path: vec![Vec3::ZERO, Vec3::Y],
			base_radius: 0.2,
			tip_radius: 0.1,
			generation: 0,
			children: vec![leaf("A", Vec3::X), leaf("B", Vec3::Z)],
		}
	}

	#[test]
	fn test_tip_is_last_path_point() {
		let tree = sample_tree();
		assert_eq!(tree.origin(), Vec3::ZERO);
		assert_eq!(tree.tip(), Vec3::Y);
	}

	#[test]
	fn test_preorder_visits_self_first() {
		let tree = sample_tree();
		let names: Vec<_> = tree.iter_preorder().map(|n| n.person_name.as_str()).collect();
		assert_eq!(names, ["Root", "A", "B"]);
	}

	#[test]
	fn test_count_and_find() {
		let tree = sample_tree();
		assert_eq!(tree.count(), 3);
		assert_eq!(tree.find("B").map(|n| n.tip()), Some(Vec3::Z));
		assert!(tree.find("C").is_none());
	}
}
