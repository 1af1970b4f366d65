use std::cmp::Ordering;

use num::Float;
use sprs::CsVecView;

/// ドット積
/// Merge-join over two sorted index lists.
#[inline]
pub fn dot<N: Float>(a_inds: &[usize], a_vals: &[N], b_inds: &[usize], b_vals: &[N]) -> N {
    debug_assert_eq!(a_inds.len(), a_vals.len());
    debug_assert_eq!(b_inds.len(), b_vals.len());

    let mut result = N::zero();
    let (mut i, mut j) = (0, 0);
    while i < a_inds.len() && j < b_inds.len() {
        match a_inds[i].cmp(&b_inds[j]) {
            Ordering::Equal => {
                result = result + a_vals[i] * b_vals[j];
                i += 1;
                j += 1;
            }
            Ordering::Less => i += 1,
            Ordering::Greater => j += 1,
        }
    }
    result
}

/// Dot product of two sparse rows
#[inline]
pub fn row_dot(a: &CsVecView<f64>, b: &CsVecView<f64>) -> f64 {
    dot(a.indices(), a.data(), b.indices(), b.data())
}

#[inline]
pub fn norm<N: Float>(vals: &[N]) -> N {
    vals.iter().fold(N::zero(), |acc, &v| acc + v * v).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dot_skips_disjoint_indices() {
        let r = dot(&[0, 2, 5], &[1.0, 2.0, 3.0], &[1, 2, 5, 7], &[9.0, 4.0, 0.5, 8.0]);
        assert_eq!(r, 2.0 * 4.0 + 3.0 * 0.5);
        let empty: f64 = dot(&[], &[], &[1], &[1.0]);
        assert_eq!(empty, 0.0);
    }

    #[test]
    fn norm_of_row() {
        assert_eq!(norm(&[3.0f32, 4.0]), 5.0);
        assert_eq!(norm::<f64>(&[]), 0.0);
    }
}
