use egui::epaint::{Mesh, Vertex, WHITE_UV};
use egui::{Color32, Pos2, Vec2};
use lyon::math::point;
use lyon::path::Path;
use lyon::tessellation::{
    BuffersBuilder, FillOptions, FillTessellator, FillVertex, FillVertexConstructor,
    VertexBuffers,
};
use meteo::meteo_types::Point2d;
use meteo::render::RenderedLayer;
use meteo::{Color, ViewTransform};

/// Triangulated polygons of a [`RenderedLayer`].
///
/// Vertices are kept in the canvas coordinates of the layer, so the same mesh is reused while the
/// map is panned and zoomed.
pub struct LayerMesh {
    generation: u64,
    transform: ViewTransform,
    vertices: Vec<MeshVertex>,
    indices: Vec<u32>,
}

#[derive(Debug, Clone, Copy)]
struct MeshVertex {
    position: [f32; 2],
    color: Color32,
}

struct PolygonVertexConstructor {
    color: Color32,
}

impl FillVertexConstructor<MeshVertex> for PolygonVertexConstructor {
    fn new_vertex(&mut self, vertex: FillVertex) -> MeshVertex {
        MeshVertex {
            position: vertex.position().to_array(),
            color: self.color,
        }
    }
}

impl LayerMesh {
    /// Tessellates the polygons of the layer. `generation` identifies the layer on the surface.
    pub fn new(layer: &RenderedLayer, generation: u64) -> Self {
        let mut buffers: VertexBuffers<MeshVertex, u32> = VertexBuffers::new();
        let mut tessellator = FillTessellator::new();

        let mut polygons: Vec<_> = layer.polygons().iter().collect();
        polygons.sort_by_key(|polygon| polygon.z_index);

        for polygon in polygons {
            let Some(path) = polygon_path(&polygon.points) else {
                continue;
            };

            let vertex_count = buffers.vertices.len();
            let index_count = buffers.indices.len();
            let vertex_constructor = PolygonVertexConstructor {
                color: color32(polygon.fill.color),
            };

            if let Err(err) = tessellator.tessellate_path(
                &path,
                &FillOptions::DEFAULT,
                &mut BuffersBuilder::new(&mut buffers, vertex_constructor),
            ) {
                log::warn!("Failed to tessellate polygon: {err:?}");
                buffers.vertices.truncate(vertex_count);
                buffers.indices.truncate(index_count);
            }
        }

        log::debug!(
            "Tessellated {} polygons into {} triangles",
            layer.polygons().len(),
            buffers.indices.len() / 3
        );

        Self {
            generation,
            transform: *layer.transform(),
            vertices: buffers.vertices,
            indices: buffers.indices,
        }
    }

    /// Surface generation of the layer the mesh was built for.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Number of triangles in the mesh.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Returns an egui mesh placed for `view`, with the canvas origin at `origin` on screen.
    pub fn to_mesh(&self, view: &ViewTransform, origin: Pos2) -> Mesh {
        let vertices = self
            .vertices
            .iter()
            .map(|vertex| {
                let position = view.reproject(
                    &self.transform,
                    Point2d::new(vertex.position[0] as f64, vertex.position[1] as f64),
                );
                Vertex {
                    pos: origin + Vec2::new(position.x as f32, position.y as f32),
                    uv: WHITE_UV,
                    color: vertex.color,
                }
            })
            .collect();

        Mesh {
            indices: self.indices.clone(),
            vertices,
            ..Default::default()
        }
    }
}

/// Converts a color into its egui counterpart.
pub fn color32(color: Color) -> Color32 {
    let [r, g, b, a] = color.to_u8_array();
    Color32::from_rgba_unmultiplied(r, g, b, a)
}

fn polygon_path(points: &[Point2d]) -> Option<Path> {
    let (first, rest) = points.split_first()?;

    let mut builder = Path::builder();
    builder.begin(point(first.x as f32, first.y as f32));
    for p in rest {
        builder.line_to(point(p.x as f32, p.y as f32));
    }
    builder.end(true);

    Some(builder.build())
}
