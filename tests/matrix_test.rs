use winograd_viz::matrix::{elementwise_product, multiply, transpose, Matrix, Shape};
use winograd_viz::WinogradError;

#[test]
fn matrix_get_set() {
    let mut m = Matrix::zeros(2, 3);
    m.set(1, 2, 42.0);
    assert_eq!(m.get(1, 2), 42.0);
    assert_eq!(m[(1, 2)], 42.0);
    assert_eq!(m.shape(), Shape::new(2, 3));
}

#[test]
fn matrix_from_rows() {
    let m = Matrix::from_rows(&[vec![1.0, 2.0], vec![3.0, 4.0], vec![5.0, 6.0]]).unwrap();
    assert_eq!(m.rows(), 3);
    assert_eq!(m.cols(), 2);
    assert_eq!(m.row(2), &[5.0, 6.0]);
    assert_eq!(m.to_rows()[1], vec![3.0, 4.0]);
}

#[test]
fn matrix_from_rows_ragged() {
    let err = Matrix::from_rows(&[vec![1.0, 2.0, 3.0], vec![4.0, 5.0]]).unwrap_err();
    assert!(matches!(err, WinogradError::RaggedRows { row: 1, expected: 3, found: 2 }));
}

#[test]
fn matrix_empty() {
    let rows: [Vec<f64>; 0] = [];
    let m = Matrix::from_rows(&rows).unwrap();
    assert!(m.shape().is_empty());
}

#[test]
fn multiply_rectangular() {
    // 2x4 * 4x2 like A * (M * A^T)
    let a = Matrix::from_array([[1.0, 1.0, 1.0, 0.0], [0.0, 1.0, -1.0, -1.0]]);
    let b = Matrix::from_array([[1.0, 2.0], [3.0, 4.0], [5.0, 6.0], [7.0, 8.0]]);
    let c = multiply(&a, &b).unwrap();
    assert_eq!(c, Matrix::from_array([[9.0, 12.0], [-9.0, -10.0]]));
}

#[test]
fn multiply_mismatch_reports_shapes() {
    let a = Matrix::zeros(2, 4);
    let b = Matrix::zeros(2, 4);
    match multiply(&a, &b) {
        Err(WinogradError::DimensionMismatch { left, right, .. }) => {
            assert_eq!(left, Shape::new(2, 4));
            assert_eq!(right, Shape::new(2, 4));
        }
        other => panic!("expected DimensionMismatch, got {:?}", other),
    }
}

#[test]
fn transpose_swaps_shape() {
    let m = Matrix::from_fn(2, 4, |r, c| (r * 4 + c) as f64);
    let t = transpose(&m);
    assert_eq!(t.shape(), Shape::new(4, 2));
    assert_eq!(t.get(3, 1), m.get(1, 3));
}

#[test]
fn elementwise_known_values() {
    let u = Matrix::from_array([[1.0, -2.0], [0.5, 4.0]]);
    let v = Matrix::from_array([[3.0, 3.0], [2.0, 0.25]]);
    let m = elementwise_product(&u, &v).unwrap();
    assert_eq!(m, Matrix::from_array([[3.0, -6.0], [1.0, 1.0]]));
}

#[test]
fn matrix_json_round_trip() {
    let m = Matrix::from_array([[1.0, 0.5], [-1.0, 2.0]]);
    let json = serde_json::to_string(&m).unwrap();
    assert_eq!(json, "[[1.0,0.5],[-1.0,2.0]]");
    let back: Matrix = serde_json::from_str(&json).unwrap();
    assert_eq!(back, m);
}

#[test]
fn matrix_json_rejects_ragged() {
    assert!(serde_json::from_str::<Matrix>("[[1.0, 2.0], [3.0]]").is_err());
}
