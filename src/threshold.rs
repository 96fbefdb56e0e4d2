/// Alert decision for one run: true only when a price was extracted and it
/// is strictly below the target. Every run is evaluated independently
/// against the same static threshold.
pub fn below_target(success: bool, price: Option<f64>, target_price: f64) -> bool {
    match price {
        Some(price) if success => price < target_price,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn true_only_when_successful_and_strictly_below() {
        assert!(below_target(true, Some(18.99), 21.00));
        assert!(!below_target(true, Some(21.00), 21.00));
        assert!(!below_target(true, Some(23.50), 21.00));
    }

    #[test]
    fn never_true_without_a_price() {
        assert!(!below_target(false, None, 21.00));
        assert!(!below_target(true, None, 21.00));
    }

    #[test]
    fn failed_extraction_never_alerts() {
        assert!(!below_target(false, Some(1.00), 21.00));
    }
}
