use bevy::prelude::*;
use family_playground::FamilyTreePlugin;

fn main() {
	// Parse seed from command line or use default
	let seed = std::env::args().nth(1).and_then(|s| s.parse::<u64>().ok()).unwrap_or(12345);

	println!("Starting family tree playground with seed: {}", seed);

	App::new()
		.add_plugins(DefaultPlugins.set(WindowPlugin {
			primary_window: Some(Window {
				title: "Family Tree Playground".to_string(),
				resolution: (1280, 720).into(),
				..default()
			}),
			..default()
		}))
		.add_plugins(FamilyTreePlugin { seed })
		.run();
}
