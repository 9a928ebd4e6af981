use lyon::math::point;
use lyon::path::Path;
use lyon::tessellation::{
    BuffersBuilder, FillOptions, FillTessellator, FillVertex, TessellationError, VertexBuffers,
};

use crate::vertex::Vertex;

/// Arrow-head ship, nose at (0, -1).
pub fn ship_mesh() -> Result<Vec<Vertex>, TessellationError> {
    let mut builder = Path::builder();
    builder.begin(point(0.0, -1.0));
    builder.line_to(point(-1.0, 1.0));
    builder.line_to(point(0.0, 0.0));
    builder.line_to(point(1.0, 1.0));
    builder.close();

    fill(&builder.build(), &FillOptions::default())
}

/// Lumpy rock centred on the origin, inside [-1, 1] on both axes.
pub fn asteroid_mesh() -> Result<Vec<Vertex>, TessellationError> {
    let mut builder = Path::builder();
    builder.begin(point(-0.2, -0.9));
    builder.line_to(point(0.4, -0.8));
    builder.quadratic_bezier_to(point(0.95, -0.6), point(0.85, 0.0));
    builder.line_to(point(0.6, 0.35));
    builder.cubic_bezier_to(point(0.9, 0.8), point(0.2, 0.95), point(-0.1, 0.7));
    builder.quadratic_bezier_to(point(-0.6, 0.9), point(-0.85, 0.3));
    builder.line_to(point(-0.6, -0.1));
    builder.quadratic_bezier_to(point(-0.9, -0.6), point(-0.2, -0.9));
    builder.close();

    fill(&builder.build(), &FillOptions::default().with_tolerance(0.001))
}

/// Tessellates `path` and expands the indexed output into a plain triangle
/// list.
fn fill(path: &Path, options: &FillOptions) -> Result<Vec<Vertex>, TessellationError> {
    let mut geometry: VertexBuffers<Vertex, u16> = VertexBuffers::new();
    FillTessellator::new().tessellate_path(
        path,
        options,
        &mut BuffersBuilder::new(&mut geometry, |vertex: FillVertex| Vertex {
            position: vertex.position().to_array(),
        }),
    )?;

    Ok(geometry
        .indices
        .iter()
        .map(|&i| geometry.vertices[usize::from(i)])
        .collect())
}
