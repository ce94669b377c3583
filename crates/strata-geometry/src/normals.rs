use glam::Vec3;

/// Area-weighted per-vertex normals.
///
/// Each triangle's unnormalized face normal is added to its three vertices,
/// then every accumulated normal is normalized. Vertices touched by no
/// triangle, or only by degenerate ones, get a zero normal.
pub fn vertex_normals(positions: &[f32], indices: &[u32]) -> Vec<f32> {
    let vertex_count = positions.len() / 3;
    let mut accumulated = vec![Vec3::ZERO; vertex_count];
    let vertex = |i: u32| Vec3::from_slice(&positions[i as usize * 3..i as usize * 3 + 3]);

    for tri in indices.chunks_exact(3) {
        let (a, b, c) = (vertex(tri[0]), vertex(tri[1]), vertex(tri[2]));
        let face = (c - b).cross(a - b);
        for &i in tri {
            accumulated[i as usize] += face;
        }
    }

    accumulated
        .into_iter()
        .flat_map(|n| n.normalize_or_zero().to_array())
        .collect()
}
