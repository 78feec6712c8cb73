//! Economy - the scrap balance and the smoothed income estimate
//!
//! Scrap is a single clamped f64. Every credit and debit flows through
//! [`Economy::add_scrap`], which refuses non-finite amounts and never lets
//! the balance dip below zero, so an overpriced purchase simply empties
//! the wallet.

pub struct Economy {
    scrap: f64,
    /// Exponentially smoothed scrap-per-second estimate for the HUD
    sps_smoothing: f64,
}

impl Economy {
    pub fn new(starting_scrap: f64) -> Self {
        Self {
            scrap: if starting_scrap.is_finite() {
                starting_scrap.max(0.0)
            } else {
                0.0
            },
            sps_smoothing: 0.0,
        }
    }

    /// Credit (or debit, with a negative amount) the balance. Non-finite
    /// amounts are dropped; the balance is clamped at zero.
    pub fn add_scrap(&mut self, amount: f64) {
        if !amount.is_finite() {
            return;
        }
        self.scrap = (self.scrap + amount).max(0.0);
    }

    pub fn scrap(&self) -> f64 {
        self.scrap
    }

    /// Smoothed scrap-per-second estimate. While the drone is active the
    /// estimate eases toward the theoretical rate; while idle it reads
    /// discounted without updating, so income blips decay instead of
    /// sticking.
    pub fn estimate_sps(
        &mut self,
        drone_level: u32,
        drone_interval: f32,
        avg_shot_reward: f64,
    ) -> f64 {
        if drone_level == 0 {
            return self.sps_smoothing * 0.65;
        }
        let raw = (1.0 / drone_interval as f64) * avg_shot_reward;
        self.sps_smoothing += (raw - self.sps_smoothing) * 0.1;
        self.sps_smoothing
    }
}

impl Default for Economy {
    fn default() -> Self {
        Self::new(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn balance_never_goes_negative() {
        let mut economy = Economy::new(5.0);
        economy.add_scrap(-12.0);
        assert_eq!(economy.scrap(), 0.0);
        economy.add_scrap(3.5);
        assert_eq!(economy.scrap(), 3.5);
    }

    #[test]
    fn non_finite_amounts_are_dropped() {
        let mut economy = Economy::new(7.0);
        economy.add_scrap(f64::NAN);
        economy.add_scrap(f64::INFINITY);
        economy.add_scrap(f64::NEG_INFINITY);
        assert_eq!(economy.scrap(), 7.0);
    }

    #[test]
    fn non_finite_starting_balance_resets_to_zero() {
        assert_eq!(Economy::new(f64::NAN).scrap(), 0.0);
        assert_eq!(Economy::new(f64::INFINITY).scrap(), 0.0);
    }

    #[test]
    fn sps_estimate_eases_toward_the_rate() {
        let mut economy = Economy::default();
        // Interval 2.0s, 0.56 per shot: the true rate is 0.28/s.
        let first = economy.estimate_sps(1, 2.0, 0.56);
        let second = economy.estimate_sps(1, 2.0, 0.56);

        assert!((first - 0.028).abs() < 1e-9);
        assert!((second - 0.0532).abs() < 1e-9);
        assert!(second > first);
        assert!(second < 0.28);
    }

    #[test]
    fn idle_estimate_reads_discounted_without_updating() {
        let mut economy = Economy::default();
        for _ in 0..50 {
            economy.estimate_sps(1, 2.0, 0.56);
        }
        let idle_a = economy.estimate_sps(0, 2.0, 0.56);
        let idle_b = economy.estimate_sps(0, 2.0, 0.56);

        assert!(idle_a < 0.28);
        assert_eq!(idle_a, idle_b);
    }
}
