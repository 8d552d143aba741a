use crate::kernel::GeometryKernel;

/// Parameter on `reference` of the arc-length midpoint of `curve`.
fn ordering_key<K: GeometryKernel>(kernel: &K, reference: &K::Curve, curve: &K::Curve) -> f64 {
    kernel.closest_parameter(reference, &kernel.point_at_normalized_length(curve, 0.5))
}

/// Indices of `curves` sorted along `reference`.
///
/// Each curve is placed by projecting its arc-length midpoint onto
/// `reference`. The sort is stable, so curves projecting to the same
/// parameter keep their input order.
#[must_use]
pub fn order_along_curve<K: GeometryKernel>(
    kernel: &K,
    reference: &K::Curve,
    curves: &[K::Curve],
) -> Vec<usize> {
    let keys: Vec<f64> = curves
        .iter()
        .map(|c| ordering_key(kernel, reference, c))
        .collect();
    let mut order: Vec<usize> = (0..curves.len()).collect();
    order.sort_by(|&a, &b| keys[a].total_cmp(&keys[b]));
    order
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::kernel::StripKernel;
    use crate::math::Point3;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    #[test]
    fn any_permutation_sorts_left_to_right() {
        let kernel = StripKernel::default();
        let reference = kernel
            .interpolate(&[p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0), p(1.0, 1.0, 0.0)])
            .unwrap();
        let pieces = [
            kernel.line(p(0.0, 0.0, 0.0), p(0.5, 0.0, 0.0)).unwrap(),
            kernel.line(p(0.5, 0.0, 0.0), p(1.0, 0.0, 0.0)).unwrap(),
            kernel.line(p(1.0, 0.0, 0.0), p(1.0, 0.4, 0.0)).unwrap(),
            kernel.line(p(1.0, 0.4, 0.0), p(1.0, 1.0, 0.0)).unwrap(),
        ];
        let permutations: [[usize; 4]; 4] = [[0, 1, 2, 3], [3, 2, 1, 0], [2, 0, 3, 1], [1, 3, 0, 2]];
        for perm in permutations {
            let shuffled: Vec<_> = perm.iter().map(|&i| pieces[i].clone()).collect();
            let order = order_along_curve(&kernel, &reference, &shuffled);
            let restored: Vec<usize> = order.iter().map(|&i| perm[i]).collect();
            assert_eq!(restored, vec![0, 1, 2, 3]);

            let keys: Vec<f64> = order
                .iter()
                .map(|&i| ordering_key(&kernel, &reference, &shuffled[i]))
                .collect();
            assert!(keys.windows(2).all(|w| w[0] < w[1]));
        }
    }
}
