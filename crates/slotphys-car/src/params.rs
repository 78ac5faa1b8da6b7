use serde::{Deserialize, Serialize};
use slotphys_core::Scalar;

/// Live tunables for one car, in the units the control surface exposes.
///
/// A whole snapshot is replaceable between steps; it is validated once
/// at that boundary, never per force call. Out-of-range but physical
/// values are accepted and simply produce extreme dynamics.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CarParams {
    /// Rail input voltage (V).
    pub voltage: Scalar,
    /// Magnet max energy product (MGOe); feeds linear downforce.
    pub magnet: Scalar,
    /// Car mass (grams).
    pub mass_g: Scalar,
    /// Static lateral friction coefficient.
    pub static_friction: Scalar,
    /// Dynamic (sliding) lateral friction coefficient.
    pub dynamic_friction: Scalar,
    /// Wheel radius (mm).
    pub wheel_radius_mm: Scalar,
    /// Motor torque constant, in 0.01 Nm/A units.
    pub torque_c: Scalar,
    /// Motor back-EMF constant, in 0.01 V·s/rad units.
    pub back_emf_c: Scalar,
    /// Gearbox reduction ratio.
    pub gear_ratio: Scalar,
    /// Geartrain efficiency (percent).
    pub efficiency_pct: Scalar,
}

impl Default for CarParams {
    /// Mid-range values of the usual control-panel sliders.
    fn default() -> Self {
        Self {
            voltage: 6.0,
            magnet: 25.0,
            mass_g: 100.0,
            static_friction: 1.0,
            dynamic_friction: 1.0,
            wheel_radius_mm: 7.0,
            torque_c: 1.4,
            back_emf_c: 3.0,
            gear_ratio: 3.2,
            efficiency_pct: 90.0,
        }
    }
}

impl CarParams {
    #[inline]
    pub fn mass_kg(&self) -> Scalar {
        self.mass_g / 1000.0
    }

    #[inline]
    pub fn wheel_radius_m(&self) -> Scalar {
        self.wheel_radius_mm / 1000.0
    }

    /// Geartrain efficiency as a fraction.
    #[inline]
    pub fn efficiency(&self) -> Scalar {
        self.efficiency_pct / 100.0
    }

    /// Torque constant k_t (Nm/A).
    #[inline]
    pub fn k_t(&self) -> Scalar {
        self.torque_c * 0.01
    }

    /// Back-EMF constant k_e (V·s/rad).
    #[inline]
    pub fn k_e(&self) -> Scalar {
        self.back_emf_c * 0.01
    }

    /// Reject values that make the force model degenerate (divide by
    /// zero or flip signs), not merely extreme.
    pub fn validate(&self) -> Result<(), ParamError> {
        let checks: [(&'static str, Scalar, bool); 6] = [
            ("mass_g", self.mass_g, self.mass_g > 0.0),
            ("wheel_radius_mm", self.wheel_radius_mm, self.wheel_radius_mm > 0.0),
            ("gear_ratio", self.gear_ratio, self.gear_ratio > 0.0),
            (
                "efficiency_pct",
                self.efficiency_pct,
                self.efficiency_pct > 0.0 && self.efficiency_pct <= 100.0,
            ),
            ("static_friction", self.static_friction, self.static_friction >= 0.0),
            ("dynamic_friction", self.dynamic_friction, self.dynamic_friction >= 0.0),
        ];
        for (field, value, ok) in checks {
            if !ok || !value.is_finite() {
                return Err(ParamError::NonPhysical { field, value });
            }
        }
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ParamError {
    #[error("non-physical parameter {field} = {value}")]
    NonPhysical { field: &'static str, value: Scalar },
}
