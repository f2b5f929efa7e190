use bevy::prelude::*;

pub const RADIAL_SEGMENTS: usize = 10;

/// Extrude a tapered tube along a sampled curve.
///
/// One vertex ring per path point, radius interpolated from `base_radius`
/// at the start to `tip_radius` at the end. The ring frame is carried
/// along the curve by projecting the previous frame onto each new tangent
/// plane, which keeps the tube from twisting at bends. Ends are left open;
/// the tip is covered by the node marker sphere and the base sits inside
/// its parent.
pub fn tapered_tube(
	path: &[Vec3],
	base_radius: f32,
	tip_radius: f32,
	radial_segments: usize,
) -> Mesh {
	debug_assert!(path.len() >= 2, "a branch path needs at least 2 points");
	debug_assert!(radial_segments >= 3);

	let rings = path.len();
	let ring_vertices = radial_segments + 1; // duplicated seam vertex for uvs

	let mut vertices: Vec<[f32; 3]> = Vec::with_capacity(rings * ring_vertices);
	let mut normals: Vec<[f32; 3]> = Vec::with_capacity(rings * ring_vertices);
	let mut uvs: Vec<[f32; 2]> = Vec::with_capacity(rings * ring_vertices);
	let mut indices: Vec<u32> = Vec::with_capacity((rings - 1) * radial_segments * 6);

	let mut right = Vec3::ZERO;
	for (i, center) in path.iter().enumerate() {
		let tangent = ring_tangent(path, i);

		if i == 0 {
			// Pick a reference axis that is NOT parallel
			let reference = if tangent.y.abs() < 0.99 { Vec3::Y } else { Vec3::X };
			right = tangent.cross(reference).normalize();
		} else {
			// carry the previous frame forward to avoid twist
			right = (right - tangent * right.dot(tangent)).try_normalize().unwrap_or(right);
		}
		let forward = tangent.cross(right);

		let t = i as f32 / (rings - 1) as f32;
		let radius = base_radius + (tip_radius - base_radius) * t;

		for j in 0..=radial_segments {
			let angle = j as f32 / radial_segments as f32 * std::f32::consts::TAU;
			let radial = right * angle.cos() + forward * angle.sin();
			let position = *center + radial * radius;
			vertices.push([position.x, position.y, position.z]);
			normals.push([radial.x, radial.y, radial.z]);
			uvs.push([j as f32 / radial_segments as f32, t]);
		}
	}

	for i in 0..rings - 1 {
		for j in 0..radial_segments {
			let a = (i * ring_vertices + j) as u32;
			let b = a + 1;
			let c = ((i + 1) * ring_vertices + j) as u32;
			let d = c + 1;
			indices.extend([a, b, d, a, d, c]);
		}
	}

	let mut mesh = Mesh::new(
		bevy::mesh::PrimitiveTopology::TriangleList,
		bevy::asset::RenderAssetUsages::RENDER_WORLD,
	);
	mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, vertices);
	mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, normals);
	mesh.insert_attribute(Mesh::ATTRIBUTE_UV_0, uvs);
	mesh.insert_indices(bevy::mesh::Indices::U32(indices));
	mesh
}

/// Central-difference tangent at ring `i`, clamped at the ends.
fn ring_tangent(path: &[Vec3], i: usize) -> Vec3 {
	let ahead = path[(i + 1).min(path.len() - 1)];
	let behind = path[i.saturating_sub(1)];
	(ahead - behind).try_normalize().unwrap_or(Vec3::Y)
}

#[cfg(test)]
mod tests {
	use super::*;
	use bevy::mesh::VertexAttributeValues;

	fn positions(mesh: &Mesh) -> Vec<Vec3> {
		match mesh.attribute(Mesh::ATTRIBUTE_POSITION) {
			Some(VertexAttributeValues::Float32x3(values)) => {
				values.iter().map(|v| Vec3::from_array(*v)).collect()
			}
			_ => panic!("missing positions"),
		}
	}

	#[test]
	fn test_vertex_and_index_counts() {
		let path = [Vec3::ZERO, Vec3::Y, Vec3::Y * 2.0];
		let mesh = tapered_tube(&path, 0.2, 0.1, 8);

		assert_eq!(positions(&mesh).len(), 3 * 9);
		match mesh.indices() {
			Some(bevy::mesh::Indices::U32(indices)) => {
				assert_eq!(indices.len(), 2 * 8 * 6);
			}
			_ => panic!("missing indices"),
		}
	}

	#[test]
	fn test_ring_radii_taper() {
		let path = [Vec3::ZERO, Vec3::Y];
		let mesh = tapered_tube(&path, 0.2, 0.05, 6);
		let positions = positions(&mesh);

		for vertex in &positions[..7] {
			assert!((vertex.distance(Vec3::ZERO) - 0.2).abs() < 1e-5);
		}
		for vertex in &positions[7..] {
			assert!((vertex.distance(Vec3::Y) - 0.05).abs() < 1e-5);
		}
	}

	#[test]
	fn test_normals_point_outward() {
		let path = [Vec3::ZERO, Vec3::Y];
		let mesh = tapered_tube(&path, 0.1, 0.1, 6);
		let positions = positions(&mesh);
		let normals = match mesh.attribute(Mesh::ATTRIBUTE_NORMAL) {
			Some(VertexAttributeValues::Float32x3(values)) => values.clone(),
			_ => panic!("missing normals"),
		};

		// a straight vertical tube has horizontal, unit-length normals that
		// agree with the vertex's radial offset
		for (vertex, normal) in positions.iter().zip(&normals) {
			let normal = Vec3::from_array(*normal);
			assert!((normal.length() - 1.0).abs() < 1e-5);
			assert!(normal.y.abs() < 1e-5);
			let radial = Vec3::new(vertex.x, 0.0, vertex.z);
			assert!(normal.dot(radial) > 0.0);
		}
	}
}
