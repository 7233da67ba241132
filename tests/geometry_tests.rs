mod common;

use ndarray::Array2;

use common::points::{random_cloud, random_points};

use flatknn::error::{ErrorCategory, FlatKnnError};
use flatknn::geometry::{
    Feature, Geometry, GeometryType, HalfEdgeTriangleMesh, Image, PointCloud, TriangleMesh,
};
use flatknn::metrics::INGESTIONS_TOTAL;
use flatknn::FlatKnn;

fn nearest(knn: &FlatKnn, query: &[f64; 3]) -> i64 {
    let mut indices = Vec::new();
    let mut distance2 = Vec::new();
    knn.search_knn(query, 1, &mut indices, &mut distance2)
        .unwrap();
    indices[0]
}

#[test]
fn test_point_cloud_indexes_points() {
    let cloud = random_cloud(64, 21);
    let target = cloud.points[40];
    let knn = FlatKnn::from_geometry(&Geometry::PointCloud(cloud)).unwrap();
    assert_eq!(knn.dimension(), 3);
    assert_eq!(knn.dataset_size(), 64);
    assert_eq!(nearest(&knn, &target), 40);
}

#[test]
fn test_triangle_mesh_indexes_vertices() {
    let vertices = random_points(12, 22);
    let target = vertices[5];
    let mesh = TriangleMesh::new(vertices, vec![[0, 1, 2], [2, 3, 4]]);
    let knn = FlatKnn::from_geometry(&mesh.into()).unwrap();
    assert_eq!(knn.dataset_size(), 12);
    assert_eq!(nearest(&knn, &target), 5);
}

#[test]
fn test_half_edge_mesh_indexes_vertices() {
    let vertices = random_points(9, 23);
    let target = vertices[8];
    let mesh: HalfEdgeTriangleMesh = TriangleMesh::new(vertices, vec![[0, 1, 2]]).into();
    let knn = FlatKnn::from_geometry(&Geometry::HalfEdgeTriangleMesh(mesh)).unwrap();
    assert_eq!(knn.dataset_size(), 9);
    assert_eq!(nearest(&knn, &target), 8);
}

#[test]
fn test_unsupported_geometries_rejected() {
    let mut knn = FlatKnn::new();
    for geometry in [Geometry::Unspecified, Geometry::Image(Image::default())] {
        let expected = geometry.geometry_type();
        match knn.set_geometry(&geometry) {
            Err(FlatKnnError::UnsupportedGeometry { geometry_type }) => {
                assert_eq!(geometry_type, expected)
            }
            other => panic!("expected UnsupportedGeometry, got: {other:?}"),
        }
    }
    assert!(knn.is_empty());
}

#[test]
fn test_unsupported_geometry_error_category() {
    let err = FlatKnn::from_geometry(&Geometry::Image(Image {
        width: 2,
        height: 2,
        num_channels: 1,
        bytes_per_channel: 1,
        data: vec![0; 4],
    }))
    .unwrap_err();
    assert_eq!(err.category(), ErrorCategory::InvalidInput);
    assert_eq!(err.to_string(), format!("unsupported geometry type: {}", GeometryType::Image));
}

#[test]
fn test_empty_point_cloud_rejected() {
    let mut knn = FlatKnn::new();
    let result = knn.set_geometry(&PointCloud::default().into());
    assert!(matches!(result, Err(FlatKnnError::EmptyData { rows: 3, cols: 0 })));
    assert_eq!(knn.dimension(), 0);
}

#[test]
fn test_feature_indexes_columns() {
    let mut feature = Feature::new(33, 4);
    for (i, mut col) in feature.data.columns_mut().into_iter().enumerate() {
        col.fill(i as f64);
    }
    let knn = FlatKnn::from_feature(&feature).unwrap();
    assert_eq!(knn.dimension(), 33);
    assert_eq!(knn.dataset_size(), 4);

    let mut indices = Vec::new();
    let mut distance2 = Vec::new();
    let query = vec![2.1; 33];
    knn.search_knn(&query, 2, &mut indices, &mut distance2)
        .unwrap();
    assert_eq!(indices, vec![2, 3]);
}

#[test]
fn test_empty_feature_rejected() {
    let feature = Feature::from(Array2::<f64>::zeros((33, 0)));
    assert!(matches!(
        FlatKnn::from_feature(&feature),
        Err(FlatKnnError::EmptyData { rows: 33, cols: 0 })
    ));
}

#[test]
fn test_geometry_ingestion_counted_as_geometry() {
    let counter = INGESTIONS_TOTAL.with_label_values(&["geometry", "ok"]);
    let before = counter.get();
    FlatKnn::from_geometry(&Geometry::PointCloud(random_cloud(8, 30))).unwrap();
    // Other tests may ingest geometries concurrently.
    assert!(counter.get() > before);

    let feature = INGESTIONS_TOTAL.with_label_values(&["feature", "ok"]);
    let before_feature = feature.get();
    FlatKnn::from_feature(&Feature::from(Array2::<f64>::ones((4, 6)))).unwrap();
    assert!(feature.get() > before_feature);
}
