/// Seeded counter-based pseudo-random source for branch geometry.
///
/// Every node derives its own generator by hashing the tree seed with the
/// person's name, so a branch keeps the same shape across rebuilds and is
/// independent of sibling order.
#[derive(Debug, Clone)]
pub struct BranchRng {
	state: u64,
}

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

impl BranchRng {
	pub fn new(seed: u64) -> Self {
		Self { state: seed }
	}

	/// Generator for one person's branch: FNV-1a over the name, mixed with
	/// the tree seed.
	pub fn for_person(seed: u64, name: &str) -> Self {
		let mut hash = FNV_OFFSET ^ seed;
		for byte in name.bytes() {
			hash ^= byte as u64;
			hash = hash.wrapping_mul(FNV_PRIME);
		}
		Self { state: hash }
	}

	/// splitmix64 step.
	pub fn next_u64(&mut self) -> u64 {
		self.state = self.state.wrapping_add(0x9e37_79b9_7f4a_7c15);
		let mut z = self.state;
		z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
		z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
		z ^ (z >> 31)
	}

	/// Uniform in [0, 1).
	pub fn next_f32(&mut self) -> f32 {
		// 24 mantissa bits keep the conversion exact
		(self.next_u64() >> 40) as f32 / (1u64 << 24) as f32
	}

	/// Uniform in [-1, 1).
	pub fn next_symmetric(&mut self) -> f32 {
		self.next_f32() * 2.0 - 1.0
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_same_seed_same_sequence() {
		let mut a = BranchRng::new(7);
		let mut b = BranchRng::new(7);
		for _ in 0..32 {
			assert_eq!(a.next_u64(), b.next_u64());
		}
	}

	#[test]
	fn test_person_rng_depends_on_name_and_seed() {
		let mut a = BranchRng::for_person(1, "Yunus Habib");
		let mut b = BranchRng::for_person(1, "Mustafa Habib");
		let mut c = BranchRng::for_person(2, "Yunus Habib");
		let first = a.next_u64();
		assert_ne!(first, b.next_u64());
		assert_ne!(first, c.next_u64());
	}

	#[test]
	fn test_unit_range() {
		let mut rng = BranchRng::new(42);
		for _ in 0..1000 {
			let x = rng.next_f32();
			assert!((0.0..1.0).contains(&x), "out of range: {}", x);
			let s = rng.next_symmetric();
			assert!((-1.0..1.0).contains(&s), "out of range: {}", s);
		}
	}
}
