use crate::{SelectedPerson, TreeState};
use bevy::prelude::*;
use lineage::BranchNode;

#[derive(Component)]
pub struct OverlayDisplay;

const HELP: &str =
	"Click marker: select   N: add child   G: regenerate   L: leaves   R: reset view";

pub fn setup_overlay(mut commands: Commands) {
	log::info!("Setting up overlay UI");

	commands
		.spawn((
			Node {
				position_type: PositionType::Absolute,
				top: Val::Px(10.0),
				left: Val::Px(10.0),
				padding: UiRect::all(Val::Px(10.0)),
				..default()
			},
			BackgroundColor(Color::hsla(201.0, 0.4, 0.3, 0.7)),
			OverlayDisplay,
		))
		.with_children(|parent| {
			parent.spawn((
				Text::new(format!("Selected: none\n{}", HELP)),
				TextFont { font_size: 16.0, ..default() },
				TextColor(Color::WHITE),
			));
		});
}

pub fn update_overlay(
	selected: Res<SelectedPerson>,
	state: Res<TreeState>,
	mut text_query: Query<&mut Text>,
	overlay_query: Query<Entity, With<OverlayDisplay>>,
	children_query: Query<&Children>,
) {
	if !selected.is_changed() && !state.is_changed() {
		return;
	}

	if let Ok(overlay_entity) = overlay_query.single() {
		if let Ok(children) = children_query.get(overlay_entity) {
			if let Some(&text_entity) = children.first() {
				if let Ok(mut text) = text_query.get_mut(text_entity) {
					let name = selected.0.as_deref().unwrap_or("none");
					let members = state.tree.as_ref().map(BranchNode::count).unwrap_or(0);
					text.0 = format!("Selected: {}   Members: {}\n{}", name, members, HELP);
				}
			}
		}
	}
}
