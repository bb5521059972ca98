//! Directional index (Wilder).
//!
//! Per step:
//! - TR  = max(H - L, |H - C_prev|, |L - C_prev|)
//! - up  = H - H_prev, down = L_prev - L
//! - +DM = up if up > down and up > 0, else 0
//! - -DM = down if down > up and down > 0, else 0
//!
//! Over the trailing n steps: ATR, +DM and -DM are averaged, then
//! +DI = 100 × avg(+DM) / ATR, -DI = 100 × avg(-DM) / ATR and
//! DX = 100 × |+DI - -DI| / (+DI + -DI). Both denominators are
//! epsilon-guarded. Needs n + 1 points.

use crate::domain::error::IndicatorError;
use crate::domain::indicator::{check_period, require_len, EPSILON};

pub fn true_range(high: f64, low: f64, prev_close: f64) -> f64 {
    let hl = high - low;
    let hc = (high - prev_close).abs();
    let lc = (low - prev_close).abs();
    hl.max(hc).max(lc)
}

pub fn adx(
    highs: &[f64],
    lows: &[f64],
    closes: &[f64],
    period: usize,
) -> Result<f64, IndicatorError> {
    check_period(period)?;
    let len = highs.len().min(lows.len()).min(closes.len());
    require_len(len, period + 1)?;

    let start = len - period;
    let mut tr_sum = 0.0;
    let mut plus_dm_sum = 0.0;
    let mut minus_dm_sum = 0.0;

    for i in start..len {
        tr_sum += true_range(highs[i], lows[i], closes[i - 1]);

        let up = highs[i] - highs[i - 1];
        let down = lows[i - 1] - lows[i];
        if up > down && up > 0.0 {
            plus_dm_sum += up;
        }
        if down > up && down > 0.0 {
            minus_dm_sum += down;
        }
    }

    let n = period as f64;
    let atr = tr_sum / n;
    let plus_di = 100.0 * (plus_dm_sum / n) / (atr + EPSILON);
    let minus_di = 100.0 * (minus_dm_sum / n) / (atr + EPSILON);

    Ok(100.0 * (plus_di - minus_di).abs() / (plus_di + minus_di + EPSILON))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trending_up(n: usize) -> (Vec<f64>, Vec<f64>, Vec<f64>) {
        let closes: Vec<f64> = (0..n).map(|i| 100.0 + 2.0 * i as f64).collect();
        let highs = closes.iter().map(|c| c + 1.0).collect();
        let lows = closes.iter().map(|c| c - 1.0).collect();
        (highs, lows, closes)
    }

    #[test]
    fn true_range_components() {
        assert!((true_range(110.0, 90.0, 100.0) - 20.0).abs() < f64::EPSILON);
        assert!((true_range(110.0, 90.0, 70.0) - 40.0).abs() < f64::EPSILON);
        assert!((true_range(110.0, 90.0, 130.0) - 40.0).abs() < f64::EPSILON);
    }

    #[test]
    fn adx_strong_uptrend_near_100() {
        let (h, l, c) = trending_up(20);
        let value = adx(&h, &l, &c, 14).unwrap();
        assert!(value > 99.0, "got {value}");
    }

    #[test]
    fn adx_flat_market_is_zero() {
        let flat = vec![100.0; 20];
        let value = adx(&flat, &flat, &flat, 14).unwrap();
        assert!(value.abs() < 1e-9, "got {value}");
    }

    #[test]
    fn adx_balanced_moves_is_low() {
        // alternating up/down moves of equal size cancel out
        let closes: Vec<f64> = (0..15)
            .map(|i| if i % 2 == 0 { 100.0 } else { 102.0 })
            .collect();
        let highs: Vec<f64> = closes.iter().map(|c| c + 1.0).collect();
        let lows: Vec<f64> = closes.iter().map(|c| c - 1.0).collect();
        let value = adx(&highs, &lows, &closes, 14).unwrap();
        assert!(value < 1.0, "got {value}");
    }

    #[test]
    fn adx_in_range() {
        let closes: Vec<f64> = (0..40).map(|i| 100.0 + (i as f64 * 0.7).sin() * 5.0).collect();
        let highs: Vec<f64> = closes.iter().map(|c| c + 1.5).collect();
        let lows: Vec<f64> = closes.iter().map(|c| c - 1.5).collect();
        let value = adx(&highs, &lows, &closes, 10).unwrap();
        assert!((0.0..=100.0).contains(&value));
    }

    #[test]
    fn adx_insufficient_data() {
        let (h, l, c) = trending_up(14);
        assert_eq!(
            adx(&h, &l, &c, 14),
            Err(IndicatorError::InsufficientData { needed: 15, got: 14 })
        );
    }
}
