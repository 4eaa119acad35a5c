use nalgebra::{Matrix3, Point3, SymmetricEigen, Vector3};

pub fn centroid(coords: &[Point3<f64>]) -> Option<Point3<f64>> {
    if coords.is_empty() {
        return None;
    }
    let sum = coords
        .iter()
        .fold(Vector3::zeros(), |acc, p| acc + p.coords);
    Some(Point3::from(sum / coords.len() as f64))
}

pub fn euclidean_distance(p1: &Point3<f64>, p2: &Point3<f64>) -> f64 {
    (p1 - p2).norm()
}

/// Unit normal of the least-squares plane through `coords`.
///
/// The normal is the eigenvector of the covariance matrix with the smallest
/// eigenvalue. Fewer than three points do not define a plane and yield `None`.
pub fn plane_normal(coords: &[Point3<f64>]) -> Option<Vector3<f64>> {
    if coords.len() < 3 {
        return None;
    }
    let center = centroid(coords)?;

    let mut covariance = Matrix3::<f64>::zeros();
    for p in coords {
        let d = p - center;
        covariance += d * d.transpose();
    }

    let eigen = SymmetricEigen::new(covariance);
    let (min_idx, _) = eigen
        .eigenvalues
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))?;

    let normal: Vector3<f64> = eigen.eigenvectors.column(min_idx).into_owned();
    let norm = normal.norm();
    if norm <= f64::EPSILON {
        None
    } else {
        Some(normal / norm)
    }
}
