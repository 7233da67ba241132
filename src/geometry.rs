//! Geometry containers the adapter can index.
//!
//! Only the parts the adapter reads are modelled: point and vertex lists,
//! plus enough of `Image` to be rejected by type.

use ndarray::{Array2, ArrayView2};

use crate::error::Result;

/// A 3-D point or vertex.
pub type Point3 = [f64; 3];

/// Type tag of a [`Geometry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryType {
    Unspecified,
    PointCloud,
    TriangleMesh,
    HalfEdgeTriangleMesh,
    Image,
}

impl std::fmt::Display for GeometryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GeometryType::Unspecified => write!(f, "unspecified"),
            GeometryType::PointCloud => write!(f, "point_cloud"),
            GeometryType::TriangleMesh => write!(f, "triangle_mesh"),
            GeometryType::HalfEdgeTriangleMesh => write!(f, "half_edge_triangle_mesh"),
            GeometryType::Image => write!(f, "image"),
        }
    }
}

/// View a list of 3-D points as a `3 x N` matrix without copying.
fn points_view(points: &[Point3]) -> Result<ArrayView2<'_, f64>> {
    let flat = points.as_flattened();
    Ok(ArrayView2::from_shape((points.len(), 3), flat)?.reversed_axes())
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointCloud {
    pub points: Vec<Point3>,
}

impl PointCloud {
    pub fn new(points: Vec<Point3>) -> Self {
        Self { points }
    }

    /// The points as a `3 x N` matrix view.
    pub fn points_view(&self) -> Result<ArrayView2<'_, f64>> {
        points_view(&self.points)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TriangleMesh {
    pub vertices: Vec<Point3>,
    pub triangles: Vec<[usize; 3]>,
}

impl TriangleMesh {
    pub fn new(vertices: Vec<Point3>, triangles: Vec<[usize; 3]>) -> Self {
        Self {
            vertices,
            triangles,
        }
    }

    /// The vertices as a `3 x N` matrix view.
    pub fn vertices_view(&self) -> Result<ArrayView2<'_, f64>> {
        points_view(&self.vertices)
    }
}

/// A triangle mesh carried in half-edge form. Indexing only looks at the
/// vertex list, exactly as for [`TriangleMesh`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HalfEdgeTriangleMesh {
    pub vertices: Vec<Point3>,
    pub triangles: Vec<[usize; 3]>,
}

impl HalfEdgeTriangleMesh {
    pub fn vertices_view(&self) -> Result<ArrayView2<'_, f64>> {
        points_view(&self.vertices)
    }
}

impl From<TriangleMesh> for HalfEdgeTriangleMesh {
    fn from(mesh: TriangleMesh) -> Self {
        Self {
            vertices: mesh.vertices,
            triangles: mesh.triangles,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Image {
    pub width: usize,
    pub height: usize,
    pub num_channels: usize,
    pub bytes_per_channel: usize,
    pub data: Vec<u8>,
}

/// Any geometry the adapter may be handed.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Unspecified,
    PointCloud(PointCloud),
    TriangleMesh(TriangleMesh),
    HalfEdgeTriangleMesh(HalfEdgeTriangleMesh),
    Image(Image),
}

impl Geometry {
    pub fn geometry_type(&self) -> GeometryType {
        match self {
            Geometry::Unspecified => GeometryType::Unspecified,
            Geometry::PointCloud(_) => GeometryType::PointCloud,
            Geometry::TriangleMesh(_) => GeometryType::TriangleMesh,
            Geometry::HalfEdgeTriangleMesh(_) => GeometryType::HalfEdgeTriangleMesh,
            Geometry::Image(_) => GeometryType::Image,
        }
    }
}

impl From<PointCloud> for Geometry {
    fn from(pc: PointCloud) -> Self {
        Geometry::PointCloud(pc)
    }
}

impl From<TriangleMesh> for Geometry {
    fn from(mesh: TriangleMesh) -> Self {
        Geometry::TriangleMesh(mesh)
    }
}

impl From<HalfEdgeTriangleMesh> for Geometry {
    fn from(mesh: HalfEdgeTriangleMesh) -> Self {
        Geometry::HalfEdgeTriangleMesh(mesh)
    }
}

impl From<Image> for Geometry {
    fn from(image: Image) -> Self {
        Geometry::Image(image)
    }
}

/// A per-point feature descriptor matrix (rows = feature dimension,
/// columns = points), as produced by registration pipelines.
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    pub data: Array2<f64>,
}

impl Feature {
    /// A zero-filled feature matrix of `dimension` rows and `num` columns.
    pub fn new(dimension: usize, num: usize) -> Self {
        Self {
            data: Array2::zeros((dimension, num)),
        }
    }

    /// Reset to a zero-filled `dimension x num` matrix.
    pub fn resize(&mut self, dimension: usize, num: usize) {
        self.data = Array2::zeros((dimension, num));
    }

    pub fn dimension(&self) -> usize {
        self.data.nrows()
    }

    pub fn num(&self) -> usize {
        self.data.ncols()
    }
}

impl From<Array2<f64>> for Feature {
    fn from(data: Array2<f64>) -> Self {
        Self { data }
    }
}
