//! Population mean and standard deviation (divides by N, not N-1).

pub fn mean_and_stddev(window: &[f64]) -> (f64, f64) {
    if window.is_empty() {
        return (0.0, 0.0);
    }
    let n = window.len() as f64;
    let mean = window.iter().sum::<f64>() / n;
    let variance = window
        .iter()
        .map(|v| {
            let diff = v - mean;
            diff * diff
        })
        .sum::<f64>()
        / n;
    (mean, variance.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stddev_constant_values() {
        let (mean, sd) = mean_and_stddev(&[100.0, 100.0, 100.0]);
        assert!((mean - 100.0).abs() < f64::EPSILON);
        assert!(sd.abs() < f64::EPSILON);
    }

    #[test]
    fn stddev_is_population() {
        // mean 5, squared diffs 9+1+1+9 = 20, /4 = 5
        let (mean, sd) = mean_and_stddev(&[2.0, 4.0, 6.0, 8.0]);
        assert!((mean - 5.0).abs() < f64::EPSILON);
        assert!((sd - 5.0_f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn stddev_empty_window() {
        assert_eq!(mean_and_stddev(&[]), (0.0, 0.0));
    }
}
