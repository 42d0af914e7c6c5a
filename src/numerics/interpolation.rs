/// Linear interpolation of `(xs, ys)` at `x`. `xs` must be sorted in non-decreasing order.
///
/// Returns `None` when `x` lies outside `[xs[0], xs[last]]` or the inputs are empty.
pub fn linear_interp(xs: &[f64], ys: &[f64], x: f64) -> Option<f64> {
    let n = xs.len().min(ys.len());
    if n == 0 || x < xs[0] || x > xs[n - 1] {
        return None;
    }
    // first index with xs[i] > x
    let upper = xs[..n].partition_point(|&xi| xi <= x);
    if upper == n {
        return Some(ys[n - 1]);
    }
    let lower = upper - 1;
    let dx = xs[upper] - xs[lower];
    if dx == 0.0 {
        return Some(ys[lower]);
    }
    let w = (x - xs[lower]) / dx;
    Some(ys[lower] + w * (ys[upper] - ys[lower]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interpolates_between_samples() {
        let xs = [0.0, 1.0, 3.0];
        let ys = [0.0, 10.0, 30.0];
        assert_eq!(linear_interp(&xs, &ys, 0.5), Some(5.0));
        assert_eq!(linear_interp(&xs, &ys, 2.0), Some(20.0));
        assert_eq!(linear_interp(&xs, &ys, 3.0), Some(30.0));
        assert_eq!(linear_interp(&xs, &ys, 0.0), Some(0.0));
    }

    #[test]
    fn outside_range_is_none() {
        let xs = [1.0, 2.0];
        let ys = [1.0, 2.0];
        assert_eq!(linear_interp(&xs, &ys, 0.99), None);
        assert_eq!(linear_interp(&xs, &ys, 2.01), None);
        assert_eq!(linear_interp(&[], &[], 0.0), None);
    }
}
